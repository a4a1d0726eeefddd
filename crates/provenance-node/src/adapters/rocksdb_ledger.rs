//! # RocksDB Ledger Adapter
//!
//! Persistent implementation of the `LedgerStore` port.
//!
//! ## Column Families
//!
//! - `state` - current value per ledger key
//! - `versions` - number of versions written per ledger key (u64, big-endian)
//! - `history` - one entry per version, keyed by `len(key) ‖ key ‖ seq`
//!
//! The length prefix keeps one key's history range from overlapping another
//! key that merely starts with the same bytes. Sequence numbers are
//! big-endian so RocksDB's byte order is write order: history is returned
//! oldest-first.
//!
//! A put, or a batch of puts across keys, writes all three families in one
//! atomic `WriteBatch` under a single transaction id.

use parking_lot::Mutex;
use provenance_core::{
    HistoryIterator, KeyModification, LedgerStore, StoreError, SystemTimeSource, TimeSource,
    Timestamp,
};
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DBIterator, Direction, IteratorMode, Options,
    WriteBatch, WriteOptions, DB,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

pub const CF_STATE: &str = "state";
pub const CF_VERSIONS: &str = "versions";
pub const CF_HISTORY: &str = "history";

/// All column families used by the ledger
pub const COLUMN_FAMILIES: &[&str] = &[CF_STATE, CF_VERSIONS, CF_HISTORY];

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbLedgerConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbLedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/provenance"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbLedgerConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }
}

/// On-disk form of one history entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredModification {
    tx_id: String,
    seconds: i64,
    nanos: u32,
    value: Vec<u8>,
}

impl StoredModification {
    fn into_modification(self, key: &str) -> Result<KeyModification, StoreError> {
        let timestamp =
            Timestamp::checked(self.seconds, self.nanos).ok_or_else(|| StoreError::Corrupted {
                key: key.to_string(),
                reason: format!("history entry has {} nanoseconds", self.nanos),
            })?;
        Ok(KeyModification {
            tx_id: self.tx_id,
            timestamp,
            value: self.value,
        })
    }
}

/// RocksDB-backed versioned ledger
pub struct RocksDbLedger {
    db: DB,
    config: RocksDbLedgerConfig,
    clock: Box<dyn TimeSource>,
    /// Serializes the version-counter read-modify-write across puts.
    write_lock: Mutex<()>,
}

impl RocksDbLedger {
    /// Open or create a ledger database
    pub fn open(config: RocksDbLedgerConfig) -> Result<Self, StoreError> {
        Self::open_with_clock(config, SystemTimeSource)
    }

    pub fn open_with_clock(
        config: RocksDbLedgerConfig,
        clock: impl TimeSource + 'static,
    ) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors).map_err(|e| {
            StoreError::Unavailable {
                message: format!("Failed to open RocksDB at {}: {}", config.path.display(), e),
            }
        })?;

        info!(
            path = %config.path.display(),
            sync_writes = config.sync_writes,
            "Opened RocksDB ledger"
        );
        Ok(Self {
            db,
            config,
            clock: Box::new(clock),
            write_lock: Mutex::new(()),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, StoreError> {
        self.db.cf_handle(name).ok_or_else(|| StoreError::Unavailable {
            message: format!("column family {name} missing"),
        })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    fn version_count(&self, key: &str) -> Result<u64, StoreError> {
        let raw = self
            .db
            .get_cf(self.cf(CF_VERSIONS)?, key.as_bytes())
            .map_err(|e| io_error("get", e))?;
        match raw {
            None => Ok(0),
            Some(bytes) => {
                let array: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corrupted {
                        key: key.to_string(),
                        reason: format!("version counter has {} bytes", bytes.len()),
                    }
                })?;
                Ok(u64::from_be_bytes(array))
            }
        }
    }
}

impl LedgerStore for RocksDbLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.db
            .get_cf(self.cf(CF_STATE)?, key.as_bytes())
            .map_err(|e| io_error("get", e))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.put_states(&[(key, value)])
    }

    fn put_states(&self, writes: &[(&str, &[u8])]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        let tx_id = Uuid::new_v4().to_string();
        let timestamp = self.clock.now();
        let mut next_seq: HashMap<&str, u64> = HashMap::new();
        let mut batch = WriteBatch::default();

        for &(key, value) in writes {
            let seq = match next_seq.get(key) {
                Some(seq) => *seq,
                None => self.version_count(key)?,
            };
            let stored = StoredModification {
                tx_id: tx_id.clone(),
                seconds: timestamp.seconds,
                nanos: timestamp.nanos,
                value: value.to_vec(),
            };
            let entry = bincode::serialize(&stored).map_err(|e| StoreError::Io {
                message: format!("cannot encode history entry for {key}: {e}"),
            })?;

            batch.put_cf(self.cf(CF_STATE)?, key.as_bytes(), value);
            batch.put_cf(self.cf(CF_VERSIONS)?, key.as_bytes(), (seq + 1).to_be_bytes());
            batch.put_cf(self.cf(CF_HISTORY)?, history_key(key, seq), entry);
            next_seq.insert(key, seq + 1);
        }

        self.db
            .write_opt(batch, &self.write_options())
            .map_err(|e| io_error("batch write", e))?;

        debug!(keys = writes.len(), tx_id = %tx_id, "Ledger put");
        Ok(())
    }

    fn history_for_key<'a>(
        &'a self,
        key: &str,
    ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError> {
        let prefix = history_prefix(key);
        let iter = self.db.iterator_cf(
            self.cf(CF_HISTORY)?,
            IteratorMode::From(&prefix[..], Direction::Forward),
        );
        Ok(Box::new(RocksDbHistoryCursor {
            key: key.to_string(),
            prefix,
            iter: Some(iter),
        }))
    }
}

/// Streams one key's history straight off a RocksDB iterator.
struct RocksDbHistoryCursor<'a> {
    key: String,
    prefix: Vec<u8>,
    iter: Option<DBIterator<'a>>,
}

impl Iterator for RocksDbHistoryCursor<'_> {
    type Item = Result<KeyModification, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.as_mut()?.next();
        match item {
            Some(Ok((k, v))) if k.starts_with(&self.prefix) => Some(
                bincode::deserialize::<StoredModification>(&v)
                    .map_err(|e| StoreError::Corrupted {
                        key: self.key.clone(),
                        reason: e.to_string(),
                    })
                    .and_then(|stored| stored.into_modification(&self.key)),
            ),
            Some(Ok(_)) | None => {
                self.close();
                None
            }
            Some(Err(e)) => {
                self.close();
                Some(Err(io_error("scan", e)))
            }
        }
    }
}

impl HistoryIterator for RocksDbHistoryCursor<'_> {
    fn close(&mut self) {
        self.iter = None;
    }
}

fn history_prefix(key: &str) -> Vec<u8> {
    let bytes = key.as_bytes();
    let mut prefix = Vec::with_capacity(4 + bytes.len() + 8);
    prefix.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    prefix.extend_from_slice(bytes);
    prefix
}

fn history_key(key: &str, seq: u64) -> Vec<u8> {
    let mut full = history_prefix(key);
    full.extend_from_slice(&seq.to_be_bytes());
    full
}

fn io_error(op: &str, e: rocksdb::Error) -> StoreError {
    StoreError::Io {
        message: format!("RocksDB {op} failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenance_core::{
        AuditRecord, HistoryScope, ProvenanceService, Router, SequentialTimeSource,
    };
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> RocksDbLedger {
        RocksDbLedger::open_with_clock(
            RocksDbLedgerConfig::for_testing(dir.path()),
            SequentialTimeSource::default(),
        )
        .unwrap()
    }

    fn owners(ledger: &RocksDbLedger, key: &str) -> Vec<Vec<u8>> {
        HistoryScope::new(ledger.history_for_key(key).unwrap())
            .map(|m| m.unwrap().value)
            .collect()
    }

    #[test]
    fn test_get_missing_key() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        assert_eq!(ledger.get_state("deviceD1").unwrap(), None);
        assert!(owners(&ledger, "deviceD1").is_empty());
    }

    #[test]
    fn test_put_overwrites_and_keeps_history() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        ledger.put_state("wineD1", b"alice").unwrap();
        ledger.put_state("wineD1", b"bob").unwrap();
        ledger.put_state("wineD1", b"carol").unwrap();

        assert_eq!(ledger.get_state("wineD1").unwrap(), Some(b"carol".to_vec()));
        assert_eq!(
            owners(&ledger, "wineD1"),
            vec![b"alice".to_vec(), b"bob".to_vec(), b"carol".to_vec()]
        );
    }

    #[test]
    fn test_history_entries_carry_metadata() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        ledger.put_state("wineD1", b"a").unwrap();
        ledger.put_state("wineD1", b"b").unwrap();

        let cursor = HistoryScope::new(ledger.history_for_key("wineD1").unwrap());
        let entries: Vec<KeyModification> = cursor.collect::<Result<_, _>>().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].timestamp < entries[1].timestamp);
        assert_ne!(entries[0].tx_id, entries[1].tx_id);
    }

    #[test]
    fn test_history_does_not_leak_into_longer_keys() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        ledger.put_state("wineD1", b"one").unwrap();
        ledger.put_state("wineD10", b"ten").unwrap();
        ledger.put_state("wineD1", b"one-again").unwrap();

        assert_eq!(
            owners(&ledger, "wineD1"),
            vec![b"one".to_vec(), b"one-again".to_vec()]
        );
        assert_eq!(owners(&ledger, "wineD10"), vec![b"ten".to_vec()]);
    }

    #[test]
    fn test_ordering_survives_many_versions() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        for i in 0..300u32 {
            ledger.put_state("k", &i.to_be_bytes()).unwrap();
        }
        let values = owners(&ledger, "k");
        assert_eq!(values.len(), 300);
        assert_eq!(values[255], 255u32.to_be_bytes().to_vec());
        assert_eq!(values[256], 256u32.to_be_bytes().to_vec());
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let ledger = open(&dir);
            ledger.put_state("wineD1", b"alice").unwrap();
            ledger.put_state("wineD1", b"bob").unwrap();
        }
        let ledger = open(&dir);
        ledger.put_state("wineD1", b"carol").unwrap();
        assert_eq!(
            owners(&ledger, "wineD1"),
            vec![b"alice".to_vec(), b"bob".to_vec(), b"carol".to_vec()]
        );
    }

    #[test]
    fn test_closed_cursor_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        ledger.put_state("k", b"1").unwrap();
        ledger.put_state("k", b"2").unwrap();

        let mut cursor = ledger.history_for_key("k").unwrap();
        assert!(cursor.next().is_some());
        cursor.close();
        cursor.close();
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_batch_put_shares_one_transaction() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        ledger.put_state("deviceD1", b"enrolled").unwrap();

        ledger
            .put_states(&[("deviceD1", b"bound".as_slice()), ("wineD1", b"alice".as_slice())])
            .unwrap();

        assert_eq!(ledger.get_state("deviceD1").unwrap(), Some(b"bound".to_vec()));
        assert_eq!(ledger.get_state("wineD1").unwrap(), Some(b"alice".to_vec()));
        let device: Vec<KeyModification> =
            HistoryScope::new(ledger.history_for_key("deviceD1").unwrap())
                .collect::<Result<_, _>>()
                .unwrap();
        let wine: Vec<KeyModification> =
            HistoryScope::new(ledger.history_for_key("wineD1").unwrap())
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(device.len(), 2);
        assert_eq!(wine.len(), 1);
        assert_eq!(device[1].tx_id, wine[0].tx_id);
        assert_eq!(device[1].timestamp, wine[0].timestamp);
        assert_ne!(device[0].tx_id, device[1].tx_id);
    }

    #[test]
    fn test_batch_repeating_a_key_keeps_both_versions() {
        let dir = TempDir::new().unwrap();
        let ledger = open(&dir);
        ledger
            .put_states(&[("wineD1", b"alice".as_slice()), ("wineD1", b"bob".as_slice())])
            .unwrap();

        assert_eq!(ledger.get_state("wineD1").unwrap(), Some(b"bob".to_vec()));
        assert_eq!(
            owners(&ledger, "wineD1"),
            vec![b"alice".to_vec(), b"bob".to_vec()]
        );
        ledger.put_state("wineD1", b"carol").unwrap();
        assert_eq!(owners(&ledger, "wineD1").len(), 3);
    }

    #[test]
    fn test_history_entry_with_overflowing_nanos_is_corrupted() {
        let stored = StoredModification {
            tx_id: "tx".to_string(),
            seconds: 1,
            nanos: 1_500_000_000,
            value: b"alice".to_vec(),
        };

        let err = stored.into_modification("wineD1").unwrap_err();

        assert!(matches!(err, StoreError::Corrupted { ref key, .. } if key == "wineD1"));
    }

    #[test]
    fn test_stored_entry_with_valid_nanos_converts() {
        let stored = StoredModification {
            tx_id: "tx".to_string(),
            seconds: 1,
            nanos: 999_999_999,
            value: b"alice".to_vec(),
        };

        let modification = stored.into_modification("wineD1").unwrap();

        assert_eq!(modification.timestamp, Timestamp::new(1, 999_999_999));
        assert_eq!(modification.value, b"alice".to_vec());
    }

    #[test]
    fn test_full_flow_through_router() {
        let dir = TempDir::new().unwrap();
        let router = Router::new(ProvenanceService::new(open(&dir)));
        let call = |f: &str, a: &[&str]| {
            let args: Vec<String> = a.iter().map(|s| s.to_string()).collect();
            router.dispatch(f, &args)
        };

        assert!(call("enrollDevice", &["D1", "X1", "Acme"]).ok);
        assert!(
            call(
                "enrollWine",
                &["D1", "alice", "M1", "2020-01-01", "PlaceA", "2020-06-01", "PlaceB"]
            )
            .ok
        );
        assert!(call("transferWine", &["D1", "bob"]).ok);

        let payload = call("queryAllCars", &["D1"]).payload.unwrap();
        let record: AuditRecord = serde_json::from_slice(&payload).unwrap();
        assert_eq!(record.owner_trail(), vec!["alice", "bob"]);
    }
}
