//! External command execution
//!
//! Commands come from configuration as shell-style command lines and run
//! without a shell. Two modes exist:
//!
//! - [RunMode::Captured]: standard output is buffered and returned
//! - [RunMode::Streamed]: standard streams are inherited so output appears live
//!
//! Implementations:
//!
//! - [system::SystemRunner]: spawns real child processes
//! - [mock::ScriptedRunner]: records invocations and replays scripted results

pub mod mock;
pub mod system;

pub use mock::ScriptedRunner;
pub use system::SystemRunner;

use crate::config::VERSION_PLACEHOLDER;
use crate::error::{ReleaseError, Result};
use std::fmt;
use std::path::Path;

/// A program plus its arguments, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line shell-style (quotes respected, no expansion)
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = shell_words::split(line)
            .map_err(|e| ReleaseError::config(format!("cannot parse command `{}`: {}", line, e)))?
            .into_iter();

        let program = words
            .next()
            .ok_or_else(|| ReleaseError::config("empty command line"))?;

        Ok(CommandSpec {
            program,
            args: words.collect(),
        })
    }

    /// Replace `{version}` in every argument
    pub fn with_version(mut self, version: &str) -> Self {
        for arg in &mut self.args {
            if arg.contains(VERSION_PLACEHOLDER) {
                *arg = arg.replace(VERSION_PLACEHOLDER, version);
            }
        }
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(self.args.iter());
        write!(f, "{}", shell_words::join(words))
    }
}

/// Parse every non-blank line of a configured step
pub fn parse_step(lines: &[String]) -> Result<Vec<CommandSpec>> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| CommandSpec::parse(line))
        .collect()
}

/// How a command's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Buffer standard output and return it
    Captured,
    /// Inherit the caller's standard streams
    Streamed,
}

/// Result of a single command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    /// Standard output, present only in [RunMode::Captured]
    pub captured_output: Option<String>,
}

/// Runs external commands to completion, one at a time
///
/// `run` only returns `Ok` for a zero exit status; anything else, including
/// a failure to start the program, is a [ReleaseError::Process].
pub trait CommandRunner {
    fn run(&mut self, command: &CommandSpec, mode: RunMode, cwd: &Path) -> Result<ProcessOutcome>;

    /// Run with buffered output and return it (empty if none)
    fn run_captured(&mut self, command: &CommandSpec, cwd: &Path) -> Result<String> {
        let outcome = self.run(command, RunMode::Captured, cwd)?;
        Ok(outcome.captured_output.unwrap_or_default())
    }

    /// Run with output streamed live to the terminal
    fn run_streamed(&mut self, command: &CommandSpec, cwd: &Path) -> Result<()> {
        self.run(command, RunMode::Streamed, cwd)?;
        Ok(())
    }
}
