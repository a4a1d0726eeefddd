//! Ownership transfer.

use super::ProvenanceService;
use crate::domain::{encode, LedgerKey, ProvenanceError, Wine};
use crate::ports::inbound::TransferOwnership;
use crate::ports::LedgerStore;
use tracing::{error, info, instrument, warn};

impl<L: LedgerStore> ProvenanceService<L> {
    #[instrument(skip(self, cmd), fields(device_id = %cmd.device_id))]
    pub(super) fn transfer(&self, cmd: TransferOwnership) -> Result<Wine, ProvenanceError> {
        let TransferOwnership {
            device_id,
            new_owner,
        } = cmd;

        self.device_state(&device_id)?
            .require_bound(&device_id)
            .inspect_err(|e| warn!(error = %e, "Transfer rejected"))?;

        let current = match self.current_wine(&device_id)? {
            Some(wine) => wine,
            None => {
                error!("Bound device has no wine record");
                return Err(ProvenanceError::WineRecordMissing {
                    device_id: device_id.to_string(),
                });
            }
        };

        let previous_owner = current.owner.clone();
        let updated = current.with_owner(new_owner);

        let key = LedgerKey::wine(&device_id);
        let bytes = encode(&key, &updated)?;
        self.ledger.put_state(key.as_str(), &bytes)?;

        info!(from = %previous_owner, to = %updated.owner, "Ownership transferred");
        Ok(updated)
    }
}
