//! Configuration loading and management.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides `database.path`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Validation errors for configuration.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("database.max_connections must be at least 1")]
    ZeroConnections,
    #[error("database.path is required for the sqlite backend")]
    MissingDatabasePath,
    #[error("database.path parent is not a directory: {0}")]
    DatabasePathInvalid(String),
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name shown in the service banner.
    pub name: String,
    /// Address to bind the API to (e.g., "0.0.0.0:8000").
    pub listen: SocketAddr,
    /// Prometheus metrics HTTP port. `None` or `0` disables the endpoint.
    pub metrics_port: Option<u16>,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Path to SQLite database file, or ":memory:".
    #[serde(default = "default_database_path")]
    pub path: String,
    /// Pool size for file databases.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_path() -> String {
    "quillpost.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `DATABASE_URL` if it is set.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            self.database.apply_url(&url);
        }
    }

    /// Metrics port, if the endpoint is enabled.
    pub fn metrics_port(&self) -> Option<u16> {
        self.server.metrics_port.filter(|port| *port != 0)
    }
}

impl DatabaseConfig {
    /// Point the SQLite backend at a connection string such as
    /// `sqlite://data/app.db`, `sqlite::memory:` or a bare path.
    pub fn apply_url(&mut self, url: &str) {
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        self.backend = Backend::Sqlite;
        self.path = path.to_string();
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    let db = &config.database;
    if db.backend == Backend::Sqlite {
        if db.max_connections == 0 {
            errors.push(ValidationError::ZeroConnections);
        }
        if db.path.is_empty() {
            errors.push(ValidationError::MissingDatabasePath);
        } else if db.path != ":memory:" {
            // Missing directories are created on open; only a file sitting
            // where a directory should be is fatal.
            let db_path = Path::new(&db.path);
            if let Some(parent) = db_path.parent()
                && parent
                    .ancestors()
                    .find(|dir| dir.exists())
                    .is_some_and(|dir| !dir.is_dir())
            {
                errors.push(ValidationError::DatabasePathInvalid(db.path.clone()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
