//! Process Boundary
//!
//! Every external tool (git, curl, tar, bash) is reached through
//! [`CommandRunner`], so bootstrap logic can be exercised without a network.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SetupError};

/// Bytes of stderr kept in [`SetupError::CommandFailed`].
const STDERR_TAIL: usize = 2048;

/// A single external command and the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run in `dir` instead of the caller's working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes external commands.
///
/// Implementations must report a non-zero exit as [`SetupError::CommandFailed`]
/// and a failure to launch as [`SetupError::Spawn`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(command)
    }
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        debug!(command = %spec, cwd = ?spec.cwd, "running external command");
        let output = command.output().map_err(|source| SetupError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(SetupError::CommandFailed {
                program: spec.program.clone(),
                command: spec.to_string(),
                code: output.status.code(),
                stderr: tail(&stderr, STDERR_TAIL).trim().to_string(),
            });
        }

        debug!(command = %spec, "external command finished");
        Ok(CommandOutput { stdout, stderr })
    }
}

/// Last `max` bytes of `text`, cut on a char boundary.
fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let spec = CommandSpec::new("git")
            .arg("clone")
            .arg("https://example.com/repo.git")
            .arg("repo");
        assert_eq!(spec.to_string(), "git clone https://example.com/repo.git repo");
        assert!(spec.cwd.is_none());
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        assert_eq!(tail("short", 10), "short");
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("aé", 1), "");
        assert_eq!(tail("aéb", 2), "b");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("sh")
            .arg("-c")
            .arg("pwd")
            .current_dir(dir.path());
        let output = SystemRunner.run(&spec).unwrap();
        let reported = std::fs::canonicalize(output.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let spec = CommandSpec::new("sh").arg("-c").arg("echo boom >&2; exit 3");
        match SystemRunner.run(&spec).unwrap_err() {
            SetupError::CommandFailed {
                program,
                code,
                stderr,
                ..
            } => {
                assert_eq!(program, "sh");
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_system_runner_reports_spawn_failure() {
        let spec = CommandSpec::new("senteval-definitely-not-a-real-binary");
        assert!(matches!(
            SystemRunner.run(&spec),
            Err(SetupError::Spawn { .. })
        ));
    }
}
