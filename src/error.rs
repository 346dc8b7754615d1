use thiserror::Error;

/// Unified error type for pkg-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Command `{}` failed{}: {}", .command, exit_suffix(.code), .detail)]
    Process {
        command: String,
        code: Option<i32>,
        detail: String,
    },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Cancelled by user")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

/// Convenience type alias for Results in pkg-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a process error for a command that ran and exited nonzero
    pub fn exited(command: impl Into<String>, code: Option<i32>) -> Self {
        ReleaseError::Process {
            command: command.into(),
            code,
            detail: "process exited unsuccessfully".to_string(),
        }
    }

    /// Create a process error for a command that could not be started
    pub fn spawn(command: impl Into<String>, detail: impl Into<String>) -> Self {
        ReleaseError::Process {
            command: command.into(),
            code: None,
            detail: detail.into(),
        }
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a prompt error with context
    pub fn prompt(msg: impl Into<String>) -> Self {
        ReleaseError::Prompt(msg.into())
    }

    /// True for the user-cancellation signal, which is not reported as a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ReleaseError::Cancelled)
    }

    /// Exit code of the failed process, if it ran at all
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ReleaseError::Process { code, .. } => *code,
            _ => None,
        }
    }
}
