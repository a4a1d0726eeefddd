//! # Inbound Ports (Driving Ports)
//!
//! The API the provenance service exposes to the router and to embedders,
//! together with the typed commands the router builds from raw arguments.

use crate::domain::{AuditRecord, Device, DeviceId, ProvenanceError, Wine};

/// Enroll a fresh tracking device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollDevice {
    pub device_id: DeviceId,
    pub model: String,
    pub brand: String,
}

/// Attach a good to an enrolled device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGood {
    pub device_id: DeviceId,
    pub owner: String,
    pub model: String,
    pub produce_date: String,
    pub produce_place: String,
    pub out_date: String,
    pub out_place: String,
}

impl BindGood {
    /// The initial wine record this binding creates.
    pub fn to_wine(&self) -> Wine {
        Wine {
            owner: self.owner.clone(),
            model: self.model.clone(),
            produce_date: self.produce_date.clone(),
            produce_place: self.produce_place.clone(),
            out_date: self.out_date.clone(),
            out_place: self.out_place.clone(),
            device_uid: self.device_id.clone(),
        }
    }
}

/// Hand the good bound to a device to a new owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOwnership {
    pub device_id: DeviceId,
    pub new_owner: String,
}

/// Reconstruct the audit trail of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHistory {
    pub device_id: DeviceId,
}

/// Primary API of the provenance service.
///
/// Every call re-reads the ledger; nothing is cached between calls.
pub trait ProvenanceApi: Send + Sync {
    /// Create a device record with status `enrolled`.
    ///
    /// - `Err(AlreadyEnrolled)`: a record exists for the id
    fn enroll_device(&self, cmd: EnrollDevice) -> Result<Device, ProvenanceError>;

    /// Mark the device `bound` and create its wine record.
    ///
    /// Both records are encoded first, then written in one atomic batch: a
    /// failed bind leaves the device `enrolled` and no wine record behind.
    ///
    /// - `Err(DeviceNotEnrolled)`: no device record
    /// - `Err(DeviceAlreadyBound)`: device already carries a good
    fn bind_good(&self, cmd: BindGood) -> Result<Wine, ProvenanceError>;

    /// Replace the owner of the bound good, producing a new ledger version.
    ///
    /// - `Err(DeviceNotEnrolled)` / `Err(NotBound)`: device not bound
    /// - `Err(WineRecordMissing)`: bound device without a wine record
    fn transfer_ownership(&self, cmd: TransferOwnership) -> Result<Wine, ProvenanceError>;

    /// Current device snapshot plus every version of its wine record.
    ///
    /// - `Err(DeviceNotEnrolled)` / `Err(NotBound)`: device not bound
    /// - `Err(MalformedRecord)`: any version fails to decode
    fn query_history(&self, query: QueryHistory) -> Result<AuditRecord, ProvenanceError>;
}
