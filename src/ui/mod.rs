//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `prompt` - Keypress-driven menus and line queries
//! - `mock` - Scripted prompter for tests

pub mod formatter;
pub mod mock;
pub mod prompt;

// Re-export formatter functions for convenience
pub use formatter::{display_error, display_status, display_step, display_success};
pub use mock::{Response, ScriptedPrompter};
pub use prompt::{MenuOption, MenuState, Prompter, TerminalPrompter};
