//! Uniform response envelope.
//!
//! Every dispatch outcome, successful or not, is folded into a `Response`.
//! Nothing escapes the router as a raw error.

use crate::domain::{ErrorKind, ProvenanceError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub ok: bool,
    /// Encoded result structure. `None` for operations without a result.
    pub payload: Option<Vec<u8>>,
    /// Human-readable failure reason.
    pub message: Option<String>,
    pub error: Option<ErrorKind>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            ok: true,
            payload: Some(payload),
            message: None,
            error: None,
        }
    }

    /// Success without a payload.
    pub fn empty() -> Self {
        Self {
            ok: true,
            payload: None,
            message: None,
            error: None,
        }
    }

    pub fn failure(err: &ProvenanceError) -> Self {
        Self {
            ok: false,
            payload: None,
            message: Some(err.to_string()),
            error: Some(err.kind()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl From<Result<Option<Vec<u8>>, ProvenanceError>> for Response {
    fn from(result: Result<Option<Vec<u8>>, ProvenanceError>) -> Self {
        match result {
            Ok(Some(payload)) => Self::success(payload),
            Ok(None) => Self::empty(),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_message_and_kind() {
        let err = ProvenanceError::NotBound {
            device_id: "D1".into(),
        };
        let resp = Response::failure(&err);
        assert!(!resp.is_ok());
        assert_eq!(resp.payload, None);
        assert_eq!(resp.error, Some(ErrorKind::NotBound));
        assert_eq!(resp.message.as_deref(), Some("no good bound to device D1"));
    }

    #[test]
    fn test_from_result() {
        assert_eq!(Response::from(Ok(None)), Response::empty());
        assert_eq!(
            Response::from(Ok(Some(b"{}".to_vec()))),
            Response::success(b"{}".to_vec())
        );
        let resp = Response::from(Err(ProvenanceError::UnknownOperation {
            name: "x".into(),
        }));
        assert_eq!(resp.error, Some(ErrorKind::UnknownOperation));
    }
}
