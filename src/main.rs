//! rollcall CLI entry point
//!
//! Parses arguments, installs structured logging, then dispatches to the
//! CLI module. Errors are printed to stderr and the process exits with the
//! error's class code.

use rollcall::cli::{self, Cli, LogFormat};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();

    // RUST_LOG overrides; secrets are never logged at any level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rollcall=info,tower_http=info"));

    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
    }

    if let Err(e) = cli::run_command(cli.command) {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
