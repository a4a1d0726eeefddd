//! # Ports Layer
//!
//! Hexagonal architecture ports for the provenance service.
//!
//! - **Driving Ports (Inbound)**: `ProvenanceApi` and its command types
//! - **Driven Ports (Outbound)**: `LedgerStore`, `HistoryIterator`, `TimeSource`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
