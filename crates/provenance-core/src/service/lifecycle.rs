//! Enrollment and binding.

use super::ProvenanceService;
use crate::domain::{encode, Device, LedgerKey, ProvenanceError, Wine};
use crate::ports::inbound::{BindGood, EnrollDevice};
use crate::ports::LedgerStore;
use tracing::{info, instrument, warn};

impl<L: LedgerStore> ProvenanceService<L> {
    #[instrument(skip(self, cmd), fields(device_id = %cmd.device_id))]
    pub(super) fn enroll(&self, cmd: EnrollDevice) -> Result<Device, ProvenanceError> {
        let EnrollDevice {
            device_id,
            model,
            brand,
        } = cmd;

        let device = self
            .device_state(&device_id)?
            .enroll(&device_id, model, brand)
            .inspect_err(|e| warn!(error = %e, "Enrollment rejected"))?;

        let key = LedgerKey::device(&device_id);
        let bytes = encode(&key, &device)?;
        self.ledger.put_state(key.as_str(), &bytes)?;

        info!(model = %device.model, brand = %device.brand, "Device enrolled");
        Ok(device)
    }

    #[instrument(skip(self, cmd), fields(device_id = %cmd.device_id))]
    pub(super) fn bind(&self, cmd: BindGood) -> Result<Wine, ProvenanceError> {
        let device = self
            .device_state(&cmd.device_id)?
            .bind(&cmd.device_id)
            .inspect_err(|e| warn!(error = %e, "Binding rejected"))?;
        let wine = cmd.to_wine();

        let device_key = LedgerKey::device(&cmd.device_id);
        let wine_key = LedgerKey::wine(&cmd.device_id);
        let device_bytes = encode(&device_key, &device)?;
        let wine_bytes = encode(&wine_key, &wine)?;

        // Device and wine land together or not at all.
        self.ledger.put_states(&[
            (device_key.as_str(), device_bytes.as_slice()),
            (wine_key.as_str(), wine_bytes.as_slice()),
        ])?;

        info!(owner = %wine.owner, model = %wine.model, "Good bound to device");
        Ok(wine)
    }
}
