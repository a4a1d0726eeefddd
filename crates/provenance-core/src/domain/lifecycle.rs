//! # Device Lifecycle
//!
//! ```text
//! Unenrolled ──enroll──→ Enrolled ──bind──→ Bound
//! ```
//!
//! `Bound` is terminal. Transfers require `Bound` and leave the device
//! untouched. Transitions here are pure; the service performs the I/O.

use super::entities::{Device, DeviceStatus};
use super::errors::ProvenanceError;
use super::value_objects::DeviceId;

/// Lifecycle position of a device, derived from its ledger record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// No record on the ledger.
    Unenrolled,
    Enrolled(Device),
    Bound(Device),
}

impl DeviceState {
    pub fn from_record(record: Option<Device>) -> Self {
        match record {
            None => Self::Unenrolled,
            Some(device) => match device.status {
                DeviceStatus::Enrolled => Self::Enrolled(device),
                DeviceStatus::Bound => Self::Bound(device),
            },
        }
    }

    pub fn status(&self) -> Option<DeviceStatus> {
        match self {
            Self::Unenrolled => None,
            Self::Enrolled(_) => Some(DeviceStatus::Enrolled),
            Self::Bound(_) => Some(DeviceStatus::Bound),
        }
    }

    /// `Unenrolled → Enrolled`.
    pub fn enroll(
        self,
        id: &DeviceId,
        model: String,
        brand: String,
    ) -> Result<Device, ProvenanceError> {
        match self {
            Self::Unenrolled => Ok(Device {
                uid: id.clone(),
                model,
                brand,
                status: DeviceStatus::Enrolled,
            }),
            Self::Enrolled(_) | Self::Bound(_) => Err(ProvenanceError::AlreadyEnrolled {
                device_id: id.to_string(),
            }),
        }
    }

    /// `Enrolled → Bound`. Returns the device record to write back.
    pub fn bind(self, id: &DeviceId) -> Result<Device, ProvenanceError> {
        match self {
            Self::Enrolled(device) => Ok(Device {
                status: DeviceStatus::Bound,
                ..device
            }),
            Self::Unenrolled => Err(ProvenanceError::DeviceNotEnrolled {
                device_id: id.to_string(),
            }),
            Self::Bound(_) => Err(ProvenanceError::DeviceAlreadyBound {
                device_id: id.to_string(),
            }),
        }
    }

    /// Guard for operations that need a good attached to the device.
    pub fn require_bound(self, id: &DeviceId) -> Result<Device, ProvenanceError> {
        match self {
            Self::Bound(device) => Ok(device),
            Self::Unenrolled => Err(ProvenanceError::DeviceNotEnrolled {
                device_id: id.to_string(),
            }),
            Self::Enrolled(_) => Err(ProvenanceError::NotBound {
                device_id: id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn id() -> DeviceId {
        DeviceId::new("D1").unwrap()
    }

    fn enrolled() -> DeviceState {
        DeviceState::Unenrolled
            .enroll(&id(), "X1".into(), "Acme".into())
            .map(|d| DeviceState::from_record(Some(d)))
            .unwrap()
    }

    #[test]
    fn test_enroll_from_unenrolled() {
        let device = DeviceState::Unenrolled
            .enroll(&id(), "X1".into(), "Acme".into())
            .unwrap();
        assert_eq!(device.status, DeviceStatus::Enrolled);
        assert_eq!(device.uid, id());
        assert_eq!(device.brand, "Acme");
    }

    #[test]
    fn test_enroll_twice_rejected() {
        let err = enrolled()
            .enroll(&id(), "X2".into(), "Other".into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyEnrolled);
    }

    #[test]
    fn test_bound_device_cannot_reenroll() {
        let bound = DeviceState::from_record(Some(enrolled().bind(&id()).unwrap()));
        let err = bound.enroll(&id(), "X1".into(), "Acme".into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyEnrolled);
    }

    #[test]
    fn test_bind_keeps_device_attributes() {
        let device = enrolled().bind(&id()).unwrap();
        assert_eq!(device.status, DeviceStatus::Bound);
        assert_eq!(device.model, "X1");
    }

    #[test]
    fn test_bind_rejections() {
        assert_eq!(
            DeviceState::Unenrolled.bind(&id()).unwrap_err().kind(),
            ErrorKind::DeviceNotEnrolled
        );
        let bound = DeviceState::from_record(Some(enrolled().bind(&id()).unwrap()));
        assert_eq!(
            bound.bind(&id()).unwrap_err().kind(),
            ErrorKind::DeviceAlreadyBound
        );
    }

    #[test]
    fn test_require_bound() {
        assert_eq!(
            DeviceState::Unenrolled
                .require_bound(&id())
                .unwrap_err()
                .kind(),
            ErrorKind::DeviceNotEnrolled
        );
        assert_eq!(
            enrolled().require_bound(&id()).unwrap_err().kind(),
            ErrorKind::NotBound
        );
        let bound = DeviceState::from_record(Some(enrolled().bind(&id()).unwrap()));
        assert!(bound.require_bound(&id()).unwrap().is_bound());
    }

    #[test]
    fn test_status_projection() {
        assert_eq!(DeviceState::Unenrolled.status(), None);
        assert_eq!(enrolled().status(), Some(DeviceStatus::Enrolled));
    }
}
