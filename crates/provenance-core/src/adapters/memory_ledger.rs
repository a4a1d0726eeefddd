//! # In-Memory Ledger
//!
//! Versioned key-value ledger held in memory. Every put appends a version
//! stamped with a fresh transaction id and the configured clock; a batch put
//! shares one id and one timestamp. History is returned oldest-first.
//!
//! Used by tests and by the node's `memory` backend. Supports fault injection
//! and counts open history cursors so callers can check they were released.

use crate::adapters::clock::SystemTimeSource;
use crate::domain::StoreError;
use crate::ports::{HistoryIterator, KeyModification, LedgerStore, TimeSource};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// Full ledger contents: current values and every version per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub current: BTreeMap<String, Vec<u8>>,
    pub history: BTreeMap<String, Vec<KeyModification>>,
}

impl LedgerSnapshot {
    pub fn version_count(&self, key: &str) -> usize {
        self.history.get(key).map_or(0, Vec::len)
    }
}

pub struct InMemoryLedger {
    state: RwLock<LedgerSnapshot>,
    clock: Box<dyn TimeSource>,
    fault: RwLock<Option<String>>,
    open_cursors: AtomicUsize,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_clock(SystemTimeSource)
    }

    pub fn with_clock(clock: impl TimeSource + 'static) -> Self {
        Self {
            state: RwLock::new(LedgerSnapshot::default()),
            clock: Box::new(clock),
            fault: RwLock::new(None),
            open_cursors: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fault.write() = Some(message.into());
    }

    pub fn recover(&self) {
        *self.fault.write() = None;
    }

    /// Copy of the whole ledger, for before/after comparisons.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.read().clone()
    }

    /// History cursors handed out and not yet closed.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn check_fault(&self) -> Result<(), StoreError> {
        match self.fault.read().as_ref() {
            Some(message) => Err(StoreError::Unavailable {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_fault()?;
        Ok(self.state.read().current.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.put_states(&[(key, value)])
    }

    fn put_states(&self, writes: &[(&str, &[u8])]) -> Result<(), StoreError> {
        self.check_fault()?;
        // One transaction for the whole batch.
        let tx_id = Uuid::new_v4().to_string();
        let timestamp = self.clock.now();

        let mut state = self.state.write();
        for (key, value) in writes {
            state.current.insert(key.to_string(), value.to_vec());
            state
                .history
                .entry(key.to_string())
                .or_default()
                .push(KeyModification {
                    tx_id: tx_id.clone(),
                    timestamp,
                    value: value.to_vec(),
                });
        }
        Ok(())
    }

    fn history_for_key<'a>(
        &'a self,
        key: &str,
    ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError> {
        self.check_fault()?;
        let entries = self
            .state
            .read()
            .history
            .get(key)
            .cloned()
            .unwrap_or_default();

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            entries: entries.into_iter(),
            open_cursors: &self.open_cursors,
            closed: false,
        }))
    }
}

/// Cursor over a copy of one key's versions taken when it was opened.
struct MemoryCursor<'a> {
    entries: std::vec::IntoIter<KeyModification>,
    open_cursors: &'a AtomicUsize,
    closed: bool,
}

impl Iterator for MemoryCursor<'_> {
    type Item = Result<KeyModification, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.entries.next().map(Ok)
    }
}

impl HistoryIterator for MemoryCursor<'_> {
    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
