//! # Invoke Handler
//!
//! One JSON request per line in, one JSON reply per line out.
//!
//! ```text
//! {"function": "transferWine", "args": ["D1", "bob"]}
//!     → {"ok": true, "payload": null, "message": null, "error": null}
//! ```
//!
//! A line that is not a valid request is answered with an
//! `InvalidArguments` reply rather than dropped.

use provenance_core::{ErrorKind, ProvenanceApi, ProvenanceError, Response, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvokeReply {
    pub ok: bool,
    /// Decoded result structure, inlined as JSON.
    pub payload: Option<Value>,
    pub message: Option<String>,
    pub error: Option<ErrorKind>,
}

impl From<Response> for InvokeReply {
    fn from(response: Response) -> Self {
        let Response {
            ok,
            payload,
            message,
            error,
        } = response;
        match payload.map(|bytes| serde_json::from_slice::<Value>(&bytes)) {
            None => Self {
                ok,
                payload: None,
                message,
                error,
            },
            Some(Ok(value)) => Self {
                ok,
                payload: Some(value),
                message,
                error,
            },
            Some(Err(e)) => Self::from(Response::failure(&ProvenanceError::malformed(
                "<payload>",
                e,
            ))),
        }
    }
}

/// Handle one input line. Blank lines produce no reply.
pub fn handle_line<A: ProvenanceApi>(router: &Router<A>, line: &str) -> Option<InvokeReply> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let reply = match serde_json::from_str::<InvokeRequest>(line) {
        Ok(request) => {
            debug!(function = %request.function, "Request received");
            router.dispatch(&request.function, &request.args).into()
        }
        Err(e) => {
            warn!(error = %e, "Unparseable request line");
            Response::failure(&ProvenanceError::InvalidArguments {
                operation: "request",
                reason: e.to_string(),
            })
            .into()
        }
    };
    Some(reply)
}
