//! # Record Codec
//!
//! JSON encoding of ledger records. `decode(encode(r)) == r` for every record
//! type; decoding bytes of the wrong shape is a `MalformedRecord`.

use super::entities::{AuditRecord, Device, Wine};
use super::errors::ProvenanceError;
use super::keys::LedgerKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value that can be stored on or returned from the ledger.
pub trait Record: Serialize + DeserializeOwned {
    /// Human-readable record kind, used in error messages.
    const KIND: &'static str;
}

impl Record for Device {
    const KIND: &'static str = "device";
}

impl Record for Wine {
    const KIND: &'static str = "wine";
}

impl Record for AuditRecord {
    const KIND: &'static str = "audit record";
}

/// Encode a record. `key` only labels the error should serialization fail.
pub fn encode<R: Record>(key: &LedgerKey, record: &R) -> Result<Vec<u8>, ProvenanceError> {
    serde_json::to_vec(record).map_err(|e| {
        ProvenanceError::malformed(key.as_str(), format!("cannot encode {}: {e}", R::KIND))
    })
}

/// Decode bytes read from `key`.
pub fn decode<R: Record>(key: &LedgerKey, bytes: &[u8]) -> Result<R, ProvenanceError> {
    serde_json::from_slice(bytes).map_err(|e| {
        ProvenanceError::malformed(key.as_str(), format!("not a {}: {e}", R::KIND))
    })
}

/// Encode a payload that is not stored under any key (router responses).
pub fn encode_payload<R: Record>(record: &R) -> Result<Vec<u8>, ProvenanceError> {
    serde_json::to_vec(record).map_err(|e| {
        ProvenanceError::malformed("<payload>", format!("cannot encode {}: {e}", R::KIND))
    })
}
