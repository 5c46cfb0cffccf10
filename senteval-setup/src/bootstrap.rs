//! Toolkit Bootstrap
//!
//! Fetches the SentEval toolkit and its datasets into a working directory.
//! [`Bootstrap::ensure`] can be called repeatedly: each step leaves a marker
//! behind and is skipped once its marker is present.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, SetupError};
use crate::retry::{with_retry, RetryConfig};
use crate::runner::{CommandRunner, CommandSpec};

pub const DEFAULT_REPO_URL: &str = "https://github.com/facebookresearch/SentEval.git";
pub const DEFAULT_ARCHIVE_URL: &str = "https://dl.fbaipublicfiles.com/senteval/senteval_data.tar";

/// Written into `data/downstream` once the transfer script succeeded.
pub const TRANSFER_MARKER: &str = ".transfer-data-ready";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Directory the toolkit is cloned into.
    pub workdir: PathBuf,
    #[serde(default = "default_repo_url")]
    pub repo_url: String,
    #[serde(default = "default_repo_dir")]
    pub repo_dir: String,
    /// Script under `data/downstream` that downloads the transfer datasets.
    #[serde(default = "default_transfer_script")]
    pub transfer_script: String,
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default = "default_archive_name")]
    pub archive_name: String,
    /// Wipe any existing checkout and archive state before running.
    #[serde(default)]
    pub force: bool,
    /// Also download and unpack the prepackaged data archive.
    #[serde(default)]
    pub fetch_archive: bool,
}

fn default_repo_url() -> String {
    DEFAULT_REPO_URL.to_string()
}

fn default_repo_dir() -> String {
    "SentEval".to_string()
}

fn default_transfer_script() -> String {
    "get_transfer_data.bash".to_string()
}

fn default_archive_url() -> String {
    DEFAULT_ARCHIVE_URL.to_string()
}

fn default_archive_name() -> String {
    "senteval_data.tar".to_string()
}

impl BootstrapConfig {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            repo_url: default_repo_url(),
            repo_dir: default_repo_dir(),
            transfer_script: default_transfer_script(),
            archive_url: default_archive_url(),
            archive_name: default_archive_name(),
            force: false,
            fetch_archive: false,
        }
    }

    /// Root of the cloned toolkit.
    pub fn toolkit_root(&self) -> PathBuf {
        self.workdir.join(&self.repo_dir)
    }

    pub fn downstream_dir(&self) -> PathBuf {
        self.toolkit_root().join("data").join("downstream")
    }

    pub fn archive_path(&self) -> PathBuf {
        self.workdir.join(&self.archive_name)
    }

    fn archive_marker(&self) -> PathBuf {
        self.workdir.join(format!(".{}.extracted", self.archive_name))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStep {
    Clone,
    TransferData,
    Archive,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapStep::Clone => "clone",
            BootstrapStep::TransferData => "transfer-data",
            BootstrapStep::Archive => "archive",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Ran,
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: BootstrapStep,
    pub status: StepStatus,
}

/// What [`Bootstrap::ensure`] did and where the toolkit lives.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BootstrapReport {
    pub toolkit_root: PathBuf,
    pub steps: Vec<StepOutcome>,
}

impl BootstrapReport {
    pub fn status(&self, step: BootstrapStep) -> Option<StepStatus> {
        self.steps
            .iter()
            .find(|outcome| outcome.step == step)
            .map(|outcome| outcome.status)
    }
}

pub struct Bootstrap<R> {
    config: BootstrapConfig,
    runner: R,
    retry: RetryConfig,
}

impl<R: CommandRunner> Bootstrap<R> {
    pub fn new(config: BootstrapConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Bring the working directory to a ready toolkit checkout.
    ///
    /// Commands run with an explicit working directory; the process-wide
    /// current directory is left untouched.
    pub fn ensure(&self) -> Result<BootstrapReport> {
        fs::create_dir_all(&self.config.workdir)?;
        info!(workdir = ?self.config.workdir, force = self.config.force, "bootstrapping toolkit");

        let mut steps = vec![
            StepOutcome {
                step: BootstrapStep::Clone,
                status: self.clone_toolkit()?,
            },
            StepOutcome {
                step: BootstrapStep::TransferData,
                status: self.fetch_transfer_data()?,
            },
        ];
        if self.config.fetch_archive {
            steps.push(StepOutcome {
                step: BootstrapStep::Archive,
                status: self.fetch_archive()?,
            });
        }

        let report = BootstrapReport {
            toolkit_root: self.config.toolkit_root(),
            steps,
        };
        info!(toolkit_root = ?report.toolkit_root, "toolkit ready");
        Ok(report)
    }

    /// Download the prepackaged data archive and unpack it into the workdir.
    pub fn fetch_archive(&self) -> Result<StepStatus> {
        fs::create_dir_all(&self.config.workdir)?;
        let marker = self.config.archive_marker();
        if marker.exists() && !self.config.force {
            debug!(marker = ?marker, "archive already extracted");
            return Ok(StepStatus::Skipped);
        }

        let download = CommandSpec::new("curl")
            .arg("-L")
            .arg("-f")
            .arg("-o")
            .arg(&self.config.archive_name)
            .arg(&self.config.archive_url)
            .current_dir(&self.config.workdir);
        info!(url = %self.config.archive_url, "downloading data archive");
        with_retry(&self.retry, || self.runner.run(&download))?;
        expect_path(BootstrapStep::Archive, &self.config.archive_path())?;

        let extract = CommandSpec::new("tar")
            .arg("-xf")
            .arg(&self.config.archive_name)
            .current_dir(&self.config.workdir);
        self.runner.run(&extract)?;

        fs::write(&marker, b"")?;
        Ok(StepStatus::Ran)
    }

    fn clone_toolkit(&self) -> Result<StepStatus> {
        let root = self.config.toolkit_root();
        if root.exists() {
            if self.config.force {
                info!(path = ?root, "removing existing checkout");
                fs::remove_dir_all(&root)?;
            } else if root.join(".git").is_dir() {
                debug!(path = ?root, "checkout already present");
                return Ok(StepStatus::Skipped);
            } else {
                warn!(path = ?root, "removing incomplete checkout");
                fs::remove_dir_all(&root)?;
            }
        }

        let clone = CommandSpec::new("git")
            .arg("clone")
            .arg(&self.config.repo_url)
            .arg(&self.config.repo_dir)
            .current_dir(&self.config.workdir);
        info!(url = %self.config.repo_url, "cloning toolkit");
        with_retry(&self.retry, || {
            // git refuses to clone into a non-empty directory left by a failed attempt
            if root.exists() {
                fs::remove_dir_all(&root)?;
            }
            self.runner.run(&clone)
        })?;

        expect_path(BootstrapStep::Clone, &root)?;
        Ok(StepStatus::Ran)
    }

    fn fetch_transfer_data(&self) -> Result<StepStatus> {
        let downstream = self.config.downstream_dir();
        let marker = downstream.join(TRANSFER_MARKER);
        if marker.exists() {
            debug!(marker = ?marker, "transfer data already present");
            return Ok(StepStatus::Skipped);
        }

        expect_path(
            BootstrapStep::TransferData,
            &downstream.join(&self.config.transfer_script),
        )?;

        let script = CommandSpec::new("bash")
            .arg(&self.config.transfer_script)
            .current_dir(&downstream);
        info!(script = %self.config.transfer_script, "fetching transfer datasets");
        with_retry(&self.retry, || self.runner.run(&script))?;

        fs::write(&marker, b"")?;
        Ok(StepStatus::Ran)
    }
}

fn expect_path(step: BootstrapStep, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(SetupError::MissingArtifact {
            step,
            path: path.to_path_buf(),
        })
    }
}
