//! # Adapters
//!
//! Host-side implementations of the core's outbound ports.
//!
//! The in-memory ledger lives in `provenance-core`; the persistent ledger is
//! only built with the `rocksdb` feature.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_ledger;

#[cfg(feature = "rocksdb")]
pub use rocksdb_ledger::{RocksDbLedger, RocksDbLedgerConfig};
