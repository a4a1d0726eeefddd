//! # Domain Errors
//!
//! Failure taxonomy for every provenance operation.
//!
//! Each variant corresponds to one violated precondition. All of them are
//! terminal for the current call: nothing is retried and nothing is written
//! after the failure is detected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the provenance service and the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    /// Wrong argument count or an argument of the wrong shape.
    #[error("invalid arguments for {operation}: {reason}")]
    InvalidArguments {
        operation: &'static str,
        reason: String,
    },

    /// A device record already exists for this id.
    #[error("device {device_id} already enrolled")]
    AlreadyEnrolled { device_id: String },

    /// No device record exists for this id.
    #[error("device {device_id} not enrolled")]
    DeviceNotEnrolled { device_id: String },

    /// The device already carries a good.
    #[error("device {device_id} already bound to a good")]
    DeviceAlreadyBound { device_id: String },

    /// The device is enrolled but no good has been bound to it.
    #[error("no good bound to device {device_id}")]
    NotBound { device_id: String },

    /// The device is bound but its wine record is absent.
    #[error("wine record missing for bound device {device_id}")]
    WineRecordMissing { device_id: String },

    /// Stored bytes do not decode into the expected record shape.
    #[error("malformed record under key {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    /// Operation name not present in the dispatch table.
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Failure reported by the ledger, propagated verbatim.
    #[error("ledger error: {0}")]
    CollaboratorError(#[from] StoreError),
}

impl ProvenanceError {
    /// Shorthand for an arity violation.
    pub fn arity(operation: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidArguments {
            operation,
            reason: format!("expecting {expected} arguments, got {actual}"),
        }
    }

    pub fn malformed(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Serializable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Self::AlreadyEnrolled { .. } => ErrorKind::AlreadyEnrolled,
            Self::DeviceNotEnrolled { .. } => ErrorKind::DeviceNotEnrolled,
            Self::DeviceAlreadyBound { .. } => ErrorKind::DeviceAlreadyBound,
            Self::NotBound { .. } => ErrorKind::NotBound,
            Self::WineRecordMissing { .. } => ErrorKind::WineRecordMissing,
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Self::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Self::CollaboratorError(_) => ErrorKind::CollaboratorError,
        }
    }
}

/// Failures reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The ledger cannot be reached or refused the request.
    #[error("ledger unavailable: {message}")]
    Unavailable { message: String },

    /// Underlying storage I/O failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// The ledger's own bookkeeping for a key is unreadable.
    #[error("corrupted ledger entry for {key}: {reason}")]
    Corrupted { key: String, reason: String },
}

/// Error classification carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArguments,
    AlreadyEnrolled,
    DeviceNotEnrolled,
    DeviceAlreadyBound,
    NotBound,
    WineRecordMissing,
    MalformedRecord,
    UnknownOperation,
    CollaboratorError,
}
