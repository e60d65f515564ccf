//! CLI error types
//!
//! All CLI errors are fatal. `main` prints them and exits with
//! [`CliError::exit_code`], so scripts can tell a bad config file apart
//! from a service that failed to come up.

use thiserror::Error;

/// Fatal CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file missing, unreadable or invalid
    #[error("ROLLCALL_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    /// Store client, runtime or listener could not start
    #[error("ROLLCALL_CLI_BOOT_FAILED: {0}")]
    Boot(String),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::Boot(msg.into())
    }

    /// Stable code for the error class
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "ROLLCALL_CLI_CONFIG_ERROR",
            Self::Boot(_) => "ROLLCALL_CLI_BOOT_FAILED",
        }
    }

    /// Message without the code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Config(msg) | Self::Boot(msg) => msg,
        }
    }

    /// Process exit status (sysexits: EX_CONFIG, EX_UNAVAILABLE)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,
            Self::Boot(_) => 69,
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
