//! Provenance reconstruction.
//!
//! The audit record pairs the current device snapshot with every version of
//! the wine key, in exactly the order the ledger yields them. Nothing is
//! re-sorted, deduplicated or skipped: one undecodable version fails the
//! whole query.

use super::{decode_wine, ProvenanceService};
use crate::domain::{AuditRecord, LedgerKey, ProvenanceError, WineHistory};
use crate::ports::inbound::QueryHistory;
use crate::ports::{HistoryScope, LedgerStore};
use tracing::{debug, instrument, warn};

impl<L: LedgerStore> ProvenanceService<L> {
    #[instrument(skip(self, query), fields(device_id = %query.device_id))]
    pub(super) fn audit(&self, query: QueryHistory) -> Result<AuditRecord, ProvenanceError> {
        let device_id = query.device_id;
        let device = self
            .device_state(&device_id)?
            .require_bound(&device_id)
            .inspect_err(|e| warn!(error = %e, "History query rejected"))?;

        let key = LedgerKey::wine(&device_id);
        let cursor = HistoryScope::new(self.ledger.history_for_key(key.as_str())?);

        let mut wine_histories = Vec::new();
        for modification in cursor {
            let modification = modification?;
            let wine = decode_wine(&key, &device_id, &modification.value)?;
            wine_histories.push(WineHistory {
                tx_id: modification.tx_id,
                timestamp: modification.timestamp,
                wine,
            });
        }

        debug!(versions = wine_histories.len(), "Reconstructed wine history");
        Ok(AuditRecord {
            device,
            wine_histories,
        })
    }
}
