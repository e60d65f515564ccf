//! CLI command implementations
//!
//! `serve` wires config → store → resolution service → HTTP server and runs
//! it on a tokio runtime. The store is built exactly once here and handed
//! down; nothing below this layer reaches for a global handle.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::records::{FirebaseConfig, FirebaseRecordStore, InMemoryRecordStore, RecordStore};
use crate::resolution::{ResolutionConfig, ResolutionService};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Environment variable consulted when `store.auth_token` is absent
pub const AUTH_TOKEN_ENV: &str = "ROLLCALL_STORE_TOKEN";

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Firebase,
    /// Process-local, lost on exit
    Memory,
}

/// Record store settings
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database root URL (required for firebase)
    #[serde(default)]
    pub database_url: Option<String>,

    /// Collection path under the root (default: "users")
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Database secret or ID token
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,

    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_collection() -> String {
    "users".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            collection: default_collection(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url)
            .field("collection", &self.collection)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    /// Configured token, else the one from the environment
    pub fn auth_token(&self) -> Option<String> {
        self.auth_token_with(|key| std::env::var(key).ok())
    }

    fn auth_token_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.auth_token
            .clone()
            .or_else(|| env(AUTH_TOKEN_ENV))
            .filter(|t| !t.is_empty())
    }

    /// Build the configured store
    pub fn build(&self) -> CliResult<Arc<dyn RecordStore>> {
        match self.backend {
            StoreBackend::Memory => Ok(Arc::new(InMemoryRecordStore::new())),
            StoreBackend::Firebase => {
                let database_url = self
                    .database_url
                    .clone()
                    .ok_or_else(|| CliError::config_error("store.database_url is required"))?;

                let store = FirebaseRecordStore::new(FirebaseConfig {
                    database_url,
                    collection: self.collection.clone(),
                    auth_token: self.auth_token(),
                    timeout: Duration::from_secs(self.timeout_secs),
                })
                .map_err(|e| CliError::boot_failed(e.to_string()))?;

                Ok(Arc::new(store))
            }
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        self.http
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))?;

        if self.store.timeout_secs == 0 {
            return Err(CliError::config_error("store.timeout_secs must be > 0"));
        }

        if self.store.backend == StoreBackend::Firebase {
            let url = self
                .store
                .database_url
                .as_deref()
                .ok_or_else(|| CliError::config_error("store.database_url is required"))?;

            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(CliError::config_error(format!(
                    "store.database_url must be an http(s) URL, got '{}'",
                    url
                )));
            }

            if self.store.collection.trim_matches('/').is_empty() {
                return Err(CliError::config_error("store.collection must not be empty"));
            }
        }

        Ok(())
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Start the HTTP server
///
/// 1. Load and validate config
/// 2. Build the store once and inject it into the service
/// 3. Run the Axum server until Ctrl-C
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = config.store.build()?;
        info!(
            event = "STORE_READY",
            backend = ?config.store.backend,
            collection = %config.store.collection,
            ambiguity = ?config.resolution.ambiguity,
            name_matching = ?config.resolution.name_matching,
            "store configured"
        );

        let service = Arc::new(ResolutionService::new(store, config.resolution));
        HttpServer::new(&config.http, service)
            .map_err(|e| CliError::config_error(e.to_string()))?
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate a config file and print the effective settings (token omitted)
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let rendered = serde_json::to_string_pretty(&config)
        .map_err(|e| CliError::config_error(format!("Failed to render config: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
