use std::collections::VecDeque;

use crate::error::{ReleaseError, Result};
use crate::ui::prompt::{MenuOption, Prompter};

/// A scripted user response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Pick the option with this key
    Choose(String),
    /// Press Escape
    Cancel,
    /// Type this text into a query
    Answer(String),
}

/// Prompter for testing without a terminal
///
/// Replays responses in order and records every question asked. Running out
/// of responses, or choosing a key the menu does not offer, is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    responses: VecDeque<Response>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        ScriptedPrompter {
            responses: responses.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Shorthand for a run of `Choose` responses
    pub fn choosing(keys: &[&str]) -> Self {
        Self::new(keys.iter().map(|key| Response::Choose(key.to_string())))
    }

    /// Questions and query prompts seen so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }

    fn next(&mut self, what: &str) -> Result<Response> {
        self.asked.push(what.to_string());
        self.responses
            .pop_front()
            .ok_or_else(|| ReleaseError::prompt(format!("no scripted response for '{}'", what)))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, question: Option<&str>, options: &[MenuOption]) -> Result<String> {
        if options.is_empty() {
            return Err(ReleaseError::prompt("menu has no options"));
        }
        match self.next(question.unwrap_or_default())? {
            Response::Choose(key) if options.iter().any(|o| o.key == key) => Ok(key),
            Response::Choose(key) => Err(ReleaseError::prompt(format!(
                "scripted choice '{}' is not offered",
                key
            ))),
            Response::Cancel => Err(ReleaseError::Cancelled),
            Response::Answer(text) => Err(ReleaseError::prompt(format!(
                "scripted answer '{}' given to a menu",
                text
            ))),
        }
    }

    fn query(&mut self, prompt: &str) -> Result<String> {
        match self.next(prompt)? {
            Response::Answer(text) => Ok(text),
            Response::Cancel => Err(ReleaseError::Cancelled),
            Response::Choose(key) => Err(ReleaseError::prompt(format!(
                "scripted choice '{}' given to a query",
                key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_offered_key() {
        let mut prompter = ScriptedPrompter::choosing(&["build"]);
        let options = vec![MenuOption::plain("publish"), MenuOption::plain("build")];
        assert_eq!(prompter.select(Some("Action"), &options).unwrap(), "build");
        assert_eq!(prompter.asked(), ["Action".to_string()]);
    }

    #[test]
    fn test_choose_unknown_key_fails() {
        let mut prompter = ScriptedPrompter::choosing(&["deploy"]);
        let options = vec![MenuOption::plain("publish")];
        assert!(prompter.select(None, &options).is_err());
    }

    #[test]
    fn test_cancel_and_answer() {
        let mut prompter =
            ScriptedPrompter::new([Response::Answer(String::new()), Response::Cancel]);
        assert_eq!(prompter.query("OTP").unwrap(), "");
        let options = vec![MenuOption::plain("yes")];
        assert!(prompter.select(None, &options).unwrap_err().is_cancelled());
        assert_eq!(prompter.remaining(), 0);
    }
}
