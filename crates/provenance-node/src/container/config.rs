//! # Node Configuration
//!
//! Defaults overridden from `PV_*` environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PV_STORAGE_BACKEND` | `memory` | `memory` or `rocksdb` |
//! | `PV_DATA_DIR` | `./data/provenance` | RocksDB directory |
//! | `PV_SYNC_WRITES` | `true` | fsync each RocksDB write |
//! | `PV_LOG_LEVEL` | `info` | tracing filter, `RUST_LOG` wins when set |
//! | `PV_JSON_LOGS` | `false` | JSON log lines on stderr |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PV_STORAGE_BACKEND") {
            config.storage.backend = raw.parse()?;
        }
        if let Some(dir) = lookup("PV_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("PV_SYNC_WRITES") {
            config.storage.sync_writes = parse_flag("PV_SYNC_WRITES", &raw)?;
        }
        if let Some(level) = lookup("PV_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(raw) = lookup("PV_JSON_LOGS") {
            config.logging.json = parse_flag("PV_JSON_LOGS", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings this build cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendNotCompiled {
                backend: self.storage.backend,
            });
        }
        Ok(())
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Ledger implementation.
    pub backend: StorageBackend,
    /// Data directory for the persistent ledger.
    pub data_dir: PathBuf,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data/provenance"),
            sync_writes: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "rocksdb" => Ok(Self::RocksDb),
            _ => Err(ConfigError::UnknownBackend {
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::RocksDb => f.write_str("rocksdb"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown storage backend {value:?} (expected \"memory\" or \"rocksdb\")")]
    UnknownBackend { value: String },

    #[error("{variable} must be true or false, got {value:?}")]
    InvalidFlag { variable: &'static str, value: String },

    #[error("storage backend {backend} is not compiled in; rebuild with --features {backend}")]
    BackendNotCompiled { backend: StorageBackend },
}

fn parse_flag(variable: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            variable,
            value: raw.to_string(),
        }),
    }
}
