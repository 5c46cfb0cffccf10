//! Evaluation parameters handed through to the SentEval toolkit.
//!
//! Field names on the wire match the toolkit's own keys (`usepytorch`,
//! `cudaEfficient`, ...) so a serialized config can be passed along unchanged.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// Environment variable pointing at an evaluation config file.
pub const CONFIG_ENV: &str = "SENTEVAL_CONFIG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalParams {
    #[serde(default = "default_task_path")]
    pub task_path: PathBuf,
    #[serde(rename = "usepytorch", default = "default_true")]
    pub use_pytorch: bool,
    #[serde(default = "default_kfold")]
    pub kfold: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(rename = "cudaEfficient", default = "default_true")]
    pub cuda_efficient: bool,
}

fn default_task_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_true() -> bool {
    true
}

fn default_kfold() -> u32 {
    10
}

fn default_seed() -> u64 {
    1111
}

fn default_batch_size() -> u32 {
    16
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            task_path: default_task_path(),
            use_pytorch: true,
            kfold: default_kfold(),
            seed: default_seed(),
            batch_size: default_batch_size(),
            cuda_efficient: true,
        }
    }
}

/// Transfer and similarity tasks known to the toolkit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum EvalTask {
    #[serde(rename = "MR")]
    Mr,
    #[serde(rename = "CR")]
    Cr,
    #[serde(rename = "SUBJ")]
    Subj,
    #[serde(rename = "MPQA")]
    Mpqa,
    #[serde(rename = "SST2")]
    Sst2,
    #[serde(rename = "SST5")]
    Sst5,
    #[serde(rename = "TREC")]
    Trec,
    #[serde(rename = "MRPC")]
    Mrpc,
    #[serde(rename = "SNLI")]
    Snli,
    #[serde(rename = "SICKEntailment")]
    SickEntailment,
    #[serde(rename = "SICKRelatedness")]
    SickRelatedness,
    #[serde(rename = "STSBenchmark")]
    StsBenchmark,
    #[serde(rename = "STS12")]
    Sts12,
    #[serde(rename = "STS13")]
    Sts13,
    #[serde(rename = "STS14")]
    Sts14,
    #[serde(rename = "STS15")]
    Sts15,
    #[serde(rename = "STS16")]
    Sts16,
    ImageCaptionRetrieval,
}

impl EvalTask {
    pub const ALL: &'static [EvalTask] = &[
        EvalTask::Mr,
        EvalTask::Cr,
        EvalTask::Subj,
        EvalTask::Mpqa,
        EvalTask::Sst2,
        EvalTask::Sst5,
        EvalTask::Trec,
        EvalTask::Mrpc,
        EvalTask::Snli,
        EvalTask::SickEntailment,
        EvalTask::SickRelatedness,
        EvalTask::StsBenchmark,
        EvalTask::Sts12,
        EvalTask::Sts13,
        EvalTask::Sts14,
        EvalTask::Sts15,
        EvalTask::Sts16,
        EvalTask::ImageCaptionRetrieval,
    ];

    /// Identifier used by the toolkit.
    pub fn name(&self) -> &'static str {
        match self {
            EvalTask::Mr => "MR",
            EvalTask::Cr => "CR",
            EvalTask::Subj => "SUBJ",
            EvalTask::Mpqa => "MPQA",
            EvalTask::Sst2 => "SST2",
            EvalTask::Sst5 => "SST5",
            EvalTask::Trec => "TREC",
            EvalTask::Mrpc => "MRPC",
            EvalTask::Snli => "SNLI",
            EvalTask::SickEntailment => "SICKEntailment",
            EvalTask::SickRelatedness => "SICKRelatedness",
            EvalTask::StsBenchmark => "STSBenchmark",
            EvalTask::Sts12 => "STS12",
            EvalTask::Sts13 => "STS13",
            EvalTask::Sts14 => "STS14",
            EvalTask::Sts15 => "STS15",
            EvalTask::Sts16 => "STS16",
            EvalTask::ImageCaptionRetrieval => "ImageCaptionRetrieval",
        }
    }
}

impl fmt::Display for EvalTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvalTask {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        EvalTask::ALL
            .iter()
            .copied()
            .find(|task| task.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SetupError::InvalidConfig(format!("unknown task `{s}`")))
    }
}

fn default_tasks() -> Vec<EvalTask> {
    vec![EvalTask::SickRelatedness, EvalTask::StsBenchmark]
}

/// Parameters plus the tasks to run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub params: EvalParams,
    #[serde(default = "default_tasks")]
    pub tasks: Vec<EvalTask>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            params: EvalParams::default(),
            tasks: default_tasks(),
        }
    }
}

impl EvalConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(SetupError::from)
    }

    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.params.kfold < 2 {
            return Err(SetupError::InvalidConfig(format!(
                "kfold must be at least 2, got {}",
                self.params.kfold
            )));
        }
        if self.params.batch_size == 0 {
            return Err(SetupError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.tasks.is_empty() {
            return Err(SetupError::InvalidConfig("no tasks selected".into()));
        }
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task) {
                return Err(SetupError::InvalidConfig(format!(
                    "task {task} is listed more than once"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_toolkit_setup() {
        let config = EvalConfig::default();
        assert_eq!(config.params.task_path, PathBuf::from("./data"));
        assert!(config.params.use_pytorch);
        assert_eq!(config.params.kfold, 10);
        assert_eq!(config.params.seed, 1111);
        assert_eq!(config.params.batch_size, 16);
        assert!(config.params.cuda_efficient);
        assert_eq!(
            config.tasks,
            vec![EvalTask::SickRelatedness, EvalTask::StsBenchmark]
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_serializes_with_toolkit_keys() {
        let value = serde_json::to_value(EvalConfig::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "params": {
                    "task_path": "./data",
                    "usepytorch": true,
                    "kfold": 10,
                    "seed": 1111,
                    "batch_size": 16,
                    "cudaEfficient": true
                },
                "tasks": ["SICKRelatedness", "STSBenchmark"]
            })
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EvalConfig =
            serde_json::from_value(json!({ "params": { "kfold": 5 }, "tasks": ["STS12"] }))
                .unwrap();
        assert_eq!(config.params.kfold, 5);
        assert_eq!(config.params.seed, 1111);
        assert_eq!(config.tasks, vec![EvalTask::Sts12]);
    }

    #[test]
    fn test_task_names_round_trip_through_from_str() {
        for task in EvalTask::ALL {
            assert_eq!(task.name().parse::<EvalTask>().unwrap(), *task);
        }
        assert_eq!("stsbenchmark".parse::<EvalTask>().unwrap(), EvalTask::StsBenchmark);
        assert!("Parsing".parse::<EvalTask>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EvalConfig::default();
        config.params.kfold = 1;
        assert!(config.validate().is_err());

        let mut config = EvalConfig::default();
        config.params.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = EvalConfig::default();
        config.tasks.clear();
        assert!(config.validate().is_err());

        let mut config = EvalConfig::default();
        config.tasks.push(EvalTask::StsBenchmark);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("STSBenchmark"));
    }
}
