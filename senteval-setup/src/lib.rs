//! Evaluation config and environment bootstrap for SentEval runs.

mod error;

pub mod bootstrap;
pub mod params;
pub mod retry;
pub mod runner;

pub use bootstrap::{
    Bootstrap, BootstrapConfig, BootstrapReport, BootstrapStep, StepOutcome, StepStatus,
};
pub use error::{Result, SetupError};
pub use params::{EvalConfig, EvalParams, EvalTask, CONFIG_ENV};
pub use retry::{is_retryable, with_retry, RetryConfig};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
