//! # Provenance Service
//!
//! Applies the device lifecycle, ownership transfers and history
//! reconstruction against an injected ledger.
//!
//! Every call re-reads the ledger. Failures are detected before the first
//! write of an operation, so a failed call leaves the ledger untouched.

mod history;
mod lifecycle;
mod transfer;

use crate::domain::{
    decode, AuditRecord, Device, DeviceId, DeviceState, LedgerKey, ProvenanceError, Wine,
};
use crate::ports::inbound::{
    BindGood, EnrollDevice, ProvenanceApi, QueryHistory, TransferOwnership,
};
use crate::ports::LedgerStore;
use tracing::debug;

pub struct ProvenanceService<L: LedgerStore> {
    ledger: L,
}

impl<L: LedgerStore> ProvenanceService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Read the device record and place it in the lifecycle.
    pub fn device_state(&self, id: &DeviceId) -> Result<DeviceState, ProvenanceError> {
        let key = LedgerKey::device(id);
        let record = match self.ledger.get_state(key.as_str())? {
            Some(bytes) => {
                let device: Device = decode(&key, &bytes)?;
                if &device.uid != id {
                    return Err(ProvenanceError::malformed(
                        key.as_str(),
                        format!("record belongs to device {}", device.uid),
                    ));
                }
                Some(device)
            }
            None => None,
        };
        let state = DeviceState::from_record(record);
        debug!(device_id = %id, status = ?state.status(), "Loaded device");
        Ok(state)
    }

    /// Read the current wine record bound to a device, if any.
    pub fn current_wine(&self, id: &DeviceId) -> Result<Option<Wine>, ProvenanceError> {
        let key = LedgerKey::wine(id);
        match self.ledger.get_state(key.as_str())? {
            Some(bytes) => decode_wine(&key, id, &bytes).map(Some),
            None => Ok(None),
        }
    }
}

/// Decode a wine version and check its back-reference.
fn decode_wine(key: &LedgerKey, id: &DeviceId, bytes: &[u8]) -> Result<Wine, ProvenanceError> {
    let wine: Wine = decode(key, bytes)?;
    if &wine.device_uid != id {
        return Err(ProvenanceError::malformed(
            key.as_str(),
            format!("wine references device {}", wine.device_uid),
        ));
    }
    Ok(wine)
}

impl<L: LedgerStore> ProvenanceApi for ProvenanceService<L> {
    fn enroll_device(&self, cmd: EnrollDevice) -> Result<Device, ProvenanceError> {
        self.enroll(cmd)
    }

    fn bind_good(&self, cmd: BindGood) -> Result<Wine, ProvenanceError> {
        self.bind(cmd)
    }

    fn transfer_ownership(&self, cmd: TransferOwnership) -> Result<Wine, ProvenanceError> {
        self.transfer(cmd)
    }

    fn query_history(&self, query: QueryHistory) -> Result<AuditRecord, ProvenanceError> {
        self.audit(query)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::{encode, DeviceStatus, ErrorKind};

    #[test]
    fn test_device_state_of_unknown_device() {
        let (svc, _) = service();
        assert_eq!(svc.device_state(&id("nope")).unwrap(), DeviceState::Unenrolled);
    }

    #[test]
    fn test_device_record_under_wrong_key_is_malformed() {
        let (svc, ledger) = service();
        let other = Device {
            uid: id("D2"),
            model: "X1".into(),
            brand: "Acme".into(),
            status: DeviceStatus::Enrolled,
        };
        let key = LedgerKey::device(&id("D1"));
        ledger
            .put_state(key.as_str(), &encode(&key, &other).unwrap())
            .unwrap();

        let err = svc.device_state(&id("D1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn test_current_wine_checks_back_reference() {
        let (svc, ledger) = service();
        let wine = bind_cmd("D2", "alice").to_wine();
        let key = LedgerKey::wine(&id("D1"));
        ledger
            .put_state(key.as_str(), &encode(&key, &wine).unwrap())
            .unwrap();

        let err = svc.current_wine(&id("D1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
        assert_eq!(svc.current_wine(&id("D9")).unwrap(), None);
    }
}
