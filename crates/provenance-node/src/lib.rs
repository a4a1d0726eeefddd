//! # Provenance Node
//!
//! Hosts the provenance core behind a line-oriented JSON protocol on
//! stdin/stdout.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and ledger/router construction
//! - `adapters/` - Persistent ledger (feature `rocksdb`)
//! - `handlers/` - Wire request decoding and reply encoding
//! - `logging` - Tracing subscriber setup
//! - `runtime` - stdin/stdout serve loop
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `PV_*` environment variables
//! 2. Install the tracing subscriber
//! 3. Open the ledger and build the router
//! 4. Run the instantiation hook
//! 5. Serve stdin until EOF or Ctrl+C

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod logging;
pub mod runtime;

pub use container::{build_router, open_ledger, NodeConfig, NodeRouter};
pub use handlers::{handle_line, InvokeReply, InvokeRequest};
pub use runtime::serve;
