use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use senteval_setup::{Bootstrap, BootstrapConfig, EvalConfig, RetryConfig, SystemRunner};
use senteval_text::{StopWords, TextNormalizer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "senteval",
    about = "Text preparation and toolkit setup for SentEval runs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize text into lowercase, stop-word-free bag-of-words lines
    Normalize {
        /// Text to normalize; may be repeated. Reads lines from --input or stdin when absent
        #[arg(long)]
        text: Vec<String>,
        /// File with one text per line
        #[arg(long, conflicts_with = "text")]
        input: Option<PathBuf>,
        /// Stop word list (one word per line, matched lowercase) replacing the bundled English list
        #[arg(long, env = "SENTEVAL_STOP_WORDS")]
        stop_words: Option<PathBuf>,
    },
    /// Clone the toolkit and fetch its datasets into a working directory
    Bootstrap {
        #[arg(long, env = "SENTEVAL_WORKDIR", default_value = ".")]
        workdir: PathBuf,
        /// Remove any existing checkout first
        #[arg(long)]
        force: bool,
        /// Also download and unpack the prepackaged data archive
        #[arg(long)]
        fetch_archive: bool,
        #[arg(long, default_value_t = 3)]
        max_retries: u32,
        #[arg(long)]
        repo_url: Option<String>,
    },
    /// Print the evaluation parameters and task list as JSON
    Params {
        /// Config file to load; falls back to $SENTEVAL_CONFIG, then the defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the validated config here instead of printing it
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    init_observability();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            text,
            input,
            stop_words,
        } => normalize(text, input.as_deref(), stop_words.as_deref())?,
        Commands::Bootstrap {
            workdir,
            force,
            fetch_archive,
            max_retries,
            repo_url,
        } => {
            let mut config = BootstrapConfig::new(workdir);
            config.force = force;
            config.fetch_archive = fetch_archive;
            if let Some(url) = repo_url {
                config.repo_url = url;
            }
            let report = Bootstrap::new(config, SystemRunner)
                .with_retry(RetryConfig::with_max_retries(max_retries))
                .ensure()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Params { config, write } => {
            let config = match config {
                Some(path) => EvalConfig::from_path(&path)?,
                None => EvalConfig::from_env_or_default()?,
            };
            config.validate()?;
            match write {
                Some(path) => {
                    config.to_path(&path)?;
                    info!(path = ?path, "wrote evaluation config");
                }
                None => println!("{}", serde_json::to_string_pretty(&config)?),
            }
        }
    }

    Ok(())
}

fn normalize(
    texts: Vec<String>,
    input: Option<&Path>,
    stop_words: Option<&Path>,
) -> anyhow::Result<()> {
    // Load the list before reading any input so a bad resource fails fast.
    let normalizer = match stop_words {
        Some(path) => TextNormalizer::new(Arc::new(StopWords::from_file(path)?)),
        None => TextNormalizer::english()?,
    };

    let texts = if !texts.is_empty() {
        texts
    } else {
        match input {
            Some(path) => read_lines(BufReader::new(File::open(path)?))?,
            None => read_lines(io::stdin().lock())?,
        }
    };
    info!(texts = texts.len(), stop_words = normalizer.stop_words().len(), "normalizing");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in normalizer.normalize_batch(&texts) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Split on `\n`, dropping a trailing `\r`. Invalid UTF-8 is replaced rather than
/// rejected; the normalizer deletes non-ASCII characters anyway.
fn read_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    reader
        .split(b'\n')
        .map(|line| {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(String::from_utf8_lossy(&line).into_owned())
        })
        .collect()
}

fn init_observability() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .json();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,senteval_setup=debug".into());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}
