use crate::error::{ReleaseError, Result};
use crate::process::{CommandRunner, CommandSpec, ProcessOutcome, RunMode};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Spawns real child processes and waits for each to exit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }

    /// Locate the program: paths are taken relative to `cwd`, bare names are
    /// looked up on `PATH` (which also finds `npm.cmd` on Windows)
    fn resolve_program(command: &CommandSpec, cwd: &Path) -> Result<PathBuf> {
        let program = Path::new(&command.program);
        if program.components().count() > 1 {
            return Ok(if program.is_absolute() {
                program.to_path_buf()
            } else {
                cwd.join(program)
            });
        }

        which::which(&command.program).map_err(|e| {
            ReleaseError::spawn(
                command.to_string(),
                format!("cannot find program '{}': {}", command.program, e),
            )
        })
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &CommandSpec, mode: RunMode, cwd: &Path) -> Result<ProcessOutcome> {
        let program = Self::resolve_program(command, cwd)?;
        tracing::debug!(command = %command, cwd = %cwd.display(), ?mode, "spawning");

        let mut cmd = Command::new(&program);
        cmd.args(&command.args).current_dir(cwd);

        match mode {
            RunMode::Captured => {
                let output = cmd
                    .stdin(Stdio::null())
                    .output()
                    .map_err(|e| ReleaseError::spawn(command.to_string(), e.to_string()))?;

                let code = output.status.code();
                tracing::debug!(command = %command, ?code, "captured command exited");

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    return Err(ReleaseError::Process {
                        command: command.to_string(),
                        code,
                        detail: if stderr.is_empty() {
                            "process exited unsuccessfully".to_string()
                        } else {
                            stderr
                        },
                    });
                }

                Ok(ProcessOutcome {
                    exit_code: code.unwrap_or(0),
                    captured_output: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
                })
            }
            RunMode::Streamed => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .map_err(|e| ReleaseError::spawn(command.to_string(), e.to_string()))?;

                let code = status.code();
                tracing::debug!(command = %command, ?code, "streamed command exited");

                if !status.success() {
                    return Err(ReleaseError::exited(command.to_string(), code));
                }

                Ok(ProcessOutcome {
                    exit_code: code.unwrap_or(0),
                    captured_output: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("pkg-release-no-such-program", Vec::<String>::new());
        let err = runner
            .run(&spec, RunMode::Captured, Path::new("."))
            .unwrap_err();
        assert_eq!(err.exit_code(), None);
        assert!(err.to_string().contains("cannot find program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captured_returns_stdout() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("echo", ["hello"]);
        let out = runner.run_captured(&spec, Path::new(".")).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_captured_empty_output_is_empty_string() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("true", Vec::<String>::new());
        assert_eq!(runner.run_captured(&spec, Path::new(".")).unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_captured_nonzero_exit_fails_with_code() {
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("sh", ["-c", "echo broken >&2; exit 3"]);
        let err = runner.run_captured(&spec, Path::new(".")).unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert!(err.to_string().contains("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn test_streamed_success_and_failure() {
        let mut runner = SystemRunner::new();
        let ok = CommandSpec::new("true", Vec::<String>::new());
        assert!(runner.run_streamed(&ok, Path::new(".")).is_ok());

        let bad = CommandSpec::new("false", Vec::<String>::new());
        let err = runner.run_streamed(&bad, Path::new(".")).unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_given_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut runner = SystemRunner::new();
        let spec = CommandSpec::new("pwd", Vec::<String>::new());
        let out = runner.run_captured(&spec, dir.path()).unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(Path::new(out.trim()).canonicalize().unwrap(), expected);
    }
}
