//! # Ledger Container
//!
//! Builds the ledger and the router from a [`NodeConfig`].

pub mod config;

pub use config::{ConfigError, LoggingConfig, NodeConfig, StorageBackend, StorageConfig};

use provenance_core::{InMemoryLedger, LedgerStore, ProvenanceService, Router};
use std::sync::Arc;
use tracing::info;

/// Ledger shared by the service for the lifetime of the node.
pub type SharedLedger = Arc<dyn LedgerStore>;

/// Router type served by the node.
pub type NodeRouter = Router<ProvenanceService<SharedLedger>>;

/// Open the ledger selected by `config.backend`.
pub fn open_ledger(config: &StorageConfig) -> anyhow::Result<SharedLedger> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory ledger; state is lost on exit");
            Ok(Arc::new(InMemoryLedger::new()))
        }
        StorageBackend::RocksDb => open_rocksdb(config),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: &StorageConfig) -> anyhow::Result<SharedLedger> {
    use crate::adapters::{RocksDbLedger, RocksDbLedgerConfig};
    use anyhow::Context;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;
    let ledger = RocksDbLedger::open(RocksDbLedgerConfig {
        path: config.data_dir.clone(),
        sync_writes: config.sync_writes,
        ..Default::default()
    })?;
    Ok(Arc::new(ledger))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(config: &StorageConfig) -> anyhow::Result<SharedLedger> {
    Err(ConfigError::BackendNotCompiled {
        backend: config.backend,
    }
    .into())
}

/// Wire the ledger into a service and router.
pub fn build_router(ledger: SharedLedger) -> NodeRouter {
    Router::new(ProvenanceService::new(ledger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_serves_requests() {
        let ledger = open_ledger(&StorageConfig::default()).unwrap();
        let router = build_router(ledger);
        let args = vec!["D1".to_string(), "X1".to_string(), "Acme".to_string()];
        assert!(router.dispatch("enrollDevice", &args).ok);
    }

    #[cfg(not(feature = "rocksdb"))]
    #[test]
    fn test_rocksdb_backend_unavailable_without_feature() {
        let config = StorageConfig {
            backend: StorageBackend::RocksDb,
            ..Default::default()
        };
        let err = open_ledger(&config).err().unwrap();
        assert!(err.to_string().contains("not compiled in"));
    }

    #[cfg(feature = "rocksdb")]
    #[test]
    fn test_rocksdb_backend_opens_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::RocksDb,
            data_dir: dir.path().join("ledger"),
            sync_writes: false,
        };
        let ledger = open_ledger(&config).unwrap();
        ledger.put_state("deviceD1", b"{}").unwrap();
        assert_eq!(ledger.get_state("deviceD1").unwrap(), Some(b"{}".to_vec()));
    }
}
