//! # Request Router
//!
//! Single entry point for callers that speak in operation names and flat
//! string argument lists.
//!
//! ```text
//! (function, args) ──parse──→ Invocation ──ProvenanceApi──→ Response
//!        │                        │
//!        └── UnknownOperation     └── InvalidArguments (arity, empty id)
//! ```
//!
//! Argument validation happens before any ledger access. Every component
//! failure is converted into a [`Response`]; the router never panics or
//! returns a raw error.

pub mod envelope;
pub mod operations;

pub use envelope::Response;
pub use operations::{Invocation, Operation};

use crate::domain::{encode_payload, ErrorKind, ProvenanceError};
use crate::ports::inbound::ProvenanceApi;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Dispatch counters since the router was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub invocations: u64,
    pub successes: u64,
    pub failures: u64,
    pub unknown_operations: u64,
}

pub struct Router<A: ProvenanceApi> {
    api: A,
    stats: Mutex<DispatchStats>,
}

impl<A: ProvenanceApi> Router<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            stats: Mutex::new(DispatchStats::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Instantiation hook. Always succeeds and writes nothing.
    pub fn init(&self) -> Response {
        info!("Provenance ledger initialized");
        Response::empty()
    }

    /// Route one call to its operation and wrap the outcome.
    pub fn dispatch(&self, function: &str, args: &[String]) -> Response {
        debug!(function, args = args.len(), "Dispatching");
        let result = Invocation::parse(function, args).and_then(|inv| self.invoke(inv));
        let response = Response::from(result);
        self.record(&response);

        if let Some(message) = &response.message {
            if rejected_by_router(response.error) {
                warn!(function, error = %message, "Invocation rejected");
            } else {
                debug!(function, error = %message, "Invocation failed");
            }
        }
        response
    }

    pub fn stats(&self) -> DispatchStats {
        *self.stats.lock()
    }

    fn invoke(&self, invocation: Invocation) -> Result<Option<Vec<u8>>, ProvenanceError> {
        match invocation {
            Invocation::EnrollDevice(cmd) => self.api.enroll_device(cmd).map(|_| None),
            Invocation::BindGood(cmd) => self.api.bind_good(cmd).map(|_| None),
            Invocation::TransferOwnership(cmd) => self.api.transfer_ownership(cmd).map(|_| None),
            Invocation::QueryHistory(query) => {
                let record = self.api.query_history(query)?;
                encode_payload(&record).map(Some)
            }
        }
    }

    fn record(&self, response: &Response) {
        let mut stats = self.stats.lock();
        stats.invocations += 1;
        if response.ok {
            stats.successes += 1;
        } else {
            stats.failures += 1;
            if response.error == Some(ErrorKind::UnknownOperation) {
                stats.unknown_operations += 1;
            }
        }
    }
}

/// Failures raised before any service call. Service failures are already
/// logged where they happen.
fn rejected_by_router(error: Option<ErrorKind>) -> bool {
    matches!(
        error,
        Some(ErrorKind::UnknownOperation | ErrorKind::InvalidArguments)
    )
}
