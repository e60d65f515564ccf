//! CLI module for rollcall
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, LogFormat};
pub use commands::{
    check_config, run_command, serve, Config, StoreBackend, StoreConfig, AUTH_TOKEN_ENV,
};
pub use errors::{CliError, CliResult};
