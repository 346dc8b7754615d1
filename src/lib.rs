pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod process;
pub mod release;
pub mod ui;

pub use error::{ReleaseError, Result};
