use crate::error::{ReleaseError, Result};
use crate::process::{CommandRunner, CommandSpec, ProcessOutcome, RunMode};
use std::collections::HashMap;
use std::path::Path;

/// Command runner for testing without spawning processes
///
/// Every invocation is recorded. Commands succeed with empty output unless a
/// failure or an output has been scripted for their command line.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    invocations: Vec<(String, RunMode)>,
    failures: HashMap<String, i32>,
    outputs: HashMap<String, String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command whose line starts with `prefix` exit with `code`
    pub fn fail_on(mut self, prefix: &str, code: i32) -> Self {
        self.failures.insert(prefix.to_string(), code);
        self
    }

    /// Make captured runs of `line` return `output`
    pub fn with_output(mut self, line: &str, output: &str) -> Self {
        self.outputs.insert(line.to_string(), output.to_string());
        self
    }

    /// Command lines run so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.invocations.iter().map(|(line, _)| line.clone()).collect()
    }

    pub fn invocations(&self) -> &[(String, RunMode)] {
        &self.invocations
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, command: &CommandSpec, mode: RunMode, _cwd: &Path) -> Result<ProcessOutcome> {
        let line = command.to_string();
        self.invocations.push((line.clone(), mode));

        let failure = self
            .failures
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, code)| *code);

        if let Some(code) = failure {
            return Err(ReleaseError::exited(line, Some(code)));
        }

        let captured_output = match mode {
            RunMode::Captured => Some(self.outputs.get(&line).cloned().unwrap_or_default()),
            RunMode::Streamed => None,
        };

        Ok(ProcessOutcome {
            exit_code: 0,
            captured_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_invocations_in_order() {
        let mut runner = ScriptedRunner::new();
        let cwd = Path::new(".");
        runner
            .run_streamed(&CommandSpec::parse("npm run clean").unwrap(), cwd)
            .unwrap();
        runner
            .run_captured(&CommandSpec::parse("git status").unwrap(), cwd)
            .unwrap();

        assert_eq!(runner.commands(), vec!["npm run clean", "git status"]);
        assert_eq!(runner.invocations()[1].1, RunMode::Captured);
    }

    #[test]
    fn test_scripted_failure_carries_exit_code() {
        let mut runner = ScriptedRunner::new().fail_on("npm publish", 1);
        let err = runner
            .run_streamed(&CommandSpec::parse("npm publish --access public").unwrap(), Path::new("."))
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_scripted_output() {
        let mut runner = ScriptedRunner::new().with_output("git rev-parse HEAD", "abc123\n");
        let out = runner
            .run_captured(&CommandSpec::parse("git rev-parse HEAD").unwrap(), Path::new("."))
            .unwrap();
        assert_eq!(out, "abc123\n");
    }
}
