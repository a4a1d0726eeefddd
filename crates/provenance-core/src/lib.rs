//! # Provenance Ledger Core
//!
//! Tracks physical goods (wine) through their chain of custody by binding
//! each good to a tracking device and recording every ownership change as a
//! new version in a versioned key-value ledger.
//!
//! ## Lifecycle
//!
//! ```text
//!               enrollDevice             enrollWine
//! Unenrolled ────────────────→ Enrolled ────────────→ Bound ─┐
//!                                                       ↑    │ transferWine
//!                                                       └────┘
//! ```
//!
//! `Bound` is terminal. Each `transferWine` writes a new version of the wine
//! record; `queryAllCars` replays those versions from the ledger's history.
//!
//! ## Ledger Layout
//!
//! | Key | Record | Written by |
//! |-----|--------|------------|
//! | `device<id>` | [`Device`] | enroll, bind |
//! | `wine<id>` | [`Wine`] | bind, transfer |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, key namespace, record codec, lifecycle, errors
//! - `ports/` - `ProvenanceApi` (inbound), `LedgerStore` and `TimeSource` (outbound)
//! - `adapters/` - In-memory ledger and time sources
//! - `service/` - `ProvenanceService` implementing the API against a ledger
//! - `router/` - Operation table, argument validation, response envelope
//!
//! ## Usage
//!
//! ```ignore
//! use provenance_core::{InMemoryLedger, ProvenanceService, Router};
//!
//! let router = Router::new(ProvenanceService::new(InMemoryLedger::new()));
//! let args = vec!["D1".to_string(), "X1".to_string(), "Acme".to_string()];
//! let response = router.dispatch("enrollDevice", &args);
//! assert!(response.ok);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod router;
pub mod service;

// Re-export key types for convenience
pub use adapters::{InMemoryLedger, LedgerSnapshot, SequentialTimeSource, SystemTimeSource};
pub use domain::entities::{AuditRecord, Device, DeviceStatus, Wine, WineHistory};
pub use domain::errors::{ErrorKind, ProvenanceError, StoreError};
pub use domain::keys::{LedgerKey, Namespace};
pub use domain::lifecycle::DeviceState;
pub use domain::value_objects::{DeviceId, Timestamp};
pub use ports::inbound::{BindGood, EnrollDevice, ProvenanceApi, QueryHistory, TransferOwnership};
pub use ports::outbound::{HistoryIterator, HistoryScope, KeyModification, LedgerStore, TimeSource};
pub use router::{DispatchStats, Invocation, Operation, Response, Router};
pub use service::ProvenanceService;
