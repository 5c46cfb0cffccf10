use std::path::PathBuf;

use thiserror::Error;

use crate::bootstrap::BootstrapStep;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid evaluation config: {0}")]
    InvalidConfig(String),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code:?}: {stderr}")]
    CommandFailed {
        program: String,
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{step} step: expected {path:?} to exist")]
    MissingArtifact { step: BootstrapStep, path: PathBuf },
}

pub type Result<T, E = SetupError> = std::result::Result<T, E>;
