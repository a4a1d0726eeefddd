//! # Adapters
//!
//! In-process implementations of the outbound ports.

pub mod clock;
pub mod memory_ledger;

pub use clock::{SequentialTimeSource, SystemTimeSource};
pub use memory_ledger::{InMemoryLedger, LedgerSnapshot};
