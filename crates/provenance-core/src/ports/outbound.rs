//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the provenance service requires from its host.
//!
//! The ledger owns durability, versioning and concurrency control. This crate
//! only needs point reads, last-write-wins puts (single or atomic batch) and
//! an ordered per-key history that must be released after use.
//!
//! Production: `RocksDbLedger` (provenance-node, feature `rocksdb`)
//! Testing: `InMemoryLedger` (adapters/memory_ledger.rs)

pub use crate::domain::StoreError;

use crate::domain::Timestamp;
use std::sync::Arc;

/// One version of a key, as recorded by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    /// Transaction that produced this version.
    pub tx_id: String,
    /// Ledger-assigned write time.
    pub timestamp: Timestamp,
    /// Raw value written.
    pub value: Vec<u8>,
}

/// Cursor over every version ever written to one key.
///
/// Yields versions in the ledger's native chronological order. Holders must
/// call [`HistoryIterator::close`] once done, on every path; [`HistoryScope`]
/// does that on drop.
pub trait HistoryIterator: Iterator<Item = Result<KeyModification, StoreError>> {
    /// Release ledger-held resources. Must be idempotent.
    fn close(&mut self);
}

/// Versioned key-value ledger.
pub trait LedgerStore: Send + Sync {
    /// Current value of `key`, if any.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a new version of `key`. Overwrites are not errors.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Write a new version of every key in `writes`, all or nothing.
    ///
    /// On `Err` no key has been written.
    fn put_states(&self, writes: &[(&str, &[u8])]) -> Result<(), StoreError>;

    /// Open a cursor over all versions of `key`.
    fn history_for_key<'a>(
        &'a self,
        key: &str,
    ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put_state(key, value)
    }

    fn put_states(&self, writes: &[(&str, &[u8])]) -> Result<(), StoreError> {
        (**self).put_states(writes)
    }

    fn history_for_key<'a>(
        &'a self,
        key: &str,
    ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError> {
        (**self).history_for_key(key)
    }
}

/// Scoped ownership of a history cursor: closes it when dropped.
pub struct HistoryScope<'a> {
    inner: Box<dyn HistoryIterator + 'a>,
}

impl<'a> HistoryScope<'a> {
    pub fn new(inner: Box<dyn HistoryIterator + 'a>) -> Self {
        Self { inner }
    }
}

impl Iterator for HistoryScope<'_> {
    type Item = Result<KeyModification, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl Drop for HistoryScope<'_> {
    fn drop(&mut self) {
        self.inner.close();
    }
}

/// Clock used by ledger adapters to stamp versions (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCursor<'a> {
        remaining: Vec<KeyModification>,
        closes: &'a AtomicUsize,
    }

    impl Iterator for CountingCursor<'_> {
        type Item = Result<KeyModification, StoreError>;

        fn next(&mut self) -> Option<Self::Item> {
            self.remaining.pop().map(Ok)
        }
    }

    impl HistoryIterator for CountingCursor<'_> {
        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_scope_closes_on_early_exit() {
        let closes = AtomicUsize::new(0);
        let cursor = CountingCursor {
            remaining: vec![
                KeyModification {
                    tx_id: "b".into(),
                    timestamp: Timestamp::new(2, 0),
                    value: vec![2],
                },
                KeyModification {
                    tx_id: "a".into(),
                    timestamp: Timestamp::new(1, 0),
                    value: vec![1],
                },
            ],
            closes: &closes,
        };

        {
            let mut scope = HistoryScope::new(Box::new(cursor));
            let first = scope.next().unwrap().unwrap();
            assert_eq!(first.tx_id, "a");
            // Dropped with one entry unread.
        }

        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
