//! # Domain Entities
//!
//! Records persisted on the ledger (`Device`, `Wine`) and the read-time
//! projection built from them (`AuditRecord`).
//!
//! Field names on the wire follow the layout of records already on deployed
//! ledgers (`uid`, `device_uid`, `produce_date`, ...).

use super::value_objects::{DeviceId, Timestamp};
use serde::{Deserialize, Serialize};

/// Persisted status of an enrolled device.
///
/// `Unenrolled` is not a stored status: it is the absence of a record, see
/// [`crate::domain::DeviceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Enrolled,
    #[serde(alias = "bind")]
    Bound,
}

/// A physical tracking unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub uid: DeviceId,
    pub model: String,
    pub brand: String,
    pub status: DeviceStatus,
}

impl Device {
    pub fn is_bound(&self) -> bool {
        self.status == DeviceStatus::Bound
    }
}

/// The tracked good bound to a device.
///
/// Stored under the wine key of the device it is bound to; `device_uid`
/// always equals that device's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wine {
    pub owner: String,
    pub model: String,
    pub produce_date: String,
    pub produce_place: String,
    pub out_date: String,
    pub out_place: String,
    pub device_uid: DeviceId,
}

impl Wine {
    /// Same good, new owner. Every other attribute is carried over untouched.
    #[must_use]
    pub fn with_owner(self, owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            ..self
        }
    }
}

/// One historical version of a wine record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WineHistory {
    /// Transaction that wrote this version.
    pub tx_id: String,
    /// Ledger-assigned write time.
    pub timestamp: Timestamp,
    pub wine: Wine,
}

/// Current device snapshot plus every version of its wine record, in the
/// order the ledger returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub device: Device,
    pub wine_histories: Vec<WineHistory>,
}

impl AuditRecord {
    /// Owners in history order, including repeats.
    pub fn owner_trail(&self) -> Vec<&str> {
        self.wine_histories
            .iter()
            .map(|h| h.wine.owner.as_str())
            .collect()
    }
}
