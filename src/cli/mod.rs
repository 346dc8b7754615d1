//! Menu-driven entry point
//!
//! Keeps the interactive routing separate from `main.rs` so the whole menu
//! tree can be driven programmatically with a scripted prompter.

pub mod menu;

pub use menu::{run, Action, MenuOutcome};
