//! # Operation Table
//!
//! Maps the externally visible operation names to typed invocations.
//!
//! | Name | Operation | Arity |
//! |------|-----------|-------|
//! | `enrollDevice` | enroll a device | 3 |
//! | `enrollWine` | bind a good to a device | 7 |
//! | `transferWine` | transfer ownership | 2 |
//! | `queryAllCars` | full audit record | 1 |
//!
//! The names are kept as deployed clients call them.

use crate::domain::{DeviceId, ProvenanceError};
use crate::ports::inbound::{BindGood, EnrollDevice, QueryHistory, TransferOwnership};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    EnrollDevice,
    BindGood,
    TransferOwnership,
    QueryHistory,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Self::EnrollDevice,
        Self::BindGood,
        Self::TransferOwnership,
        Self::QueryHistory,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Name used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Self::EnrollDevice => "enrollDevice",
            Self::BindGood => "enrollWine",
            Self::TransferOwnership => "transferWine",
            Self::QueryHistory => "queryAllCars",
        }
    }

    pub const fn arity(self) -> usize {
        match self {
            Self::EnrollDevice => 3,
            Self::BindGood => 7,
            Self::TransferOwnership => 2,
            Self::QueryHistory => 1,
        }
    }
}

/// A validated request, ready for the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    EnrollDevice(EnrollDevice),
    BindGood(BindGood),
    TransferOwnership(TransferOwnership),
    QueryHistory(QueryHistory),
}

impl Invocation {
    /// Resolve `function` and validate `args` against its arity.
    ///
    /// Performs no ledger access.
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ProvenanceError> {
        let op = Operation::from_name(function).ok_or_else(|| {
            ProvenanceError::UnknownOperation {
                name: function.to_string(),
            }
        })?;

        let [first, rest @ ..] = args else {
            return Err(ProvenanceError::arity(op.name(), op.arity(), 0));
        };
        if args.len() != op.arity() {
            return Err(ProvenanceError::arity(op.name(), op.arity(), args.len()));
        }

        let device_id =
            DeviceId::new(first.as_str()).ok_or_else(|| ProvenanceError::InvalidArguments {
                operation: op.name(),
                reason: "device id must not be empty".to_string(),
            })?;

        let invocation = match (op, rest) {
            (Operation::EnrollDevice, [model, brand]) => Self::EnrollDevice(EnrollDevice {
                device_id,
                model: model.clone(),
                brand: brand.clone(),
            }),
            (
                Operation::BindGood,
                [owner, model, produce_date, produce_place, out_date, out_place],
            ) => Self::BindGood(BindGood {
                device_id,
                owner: owner.clone(),
                model: model.clone(),
                produce_date: produce_date.clone(),
                produce_place: produce_place.clone(),
                out_date: out_date.clone(),
                out_place: out_place.clone(),
            }),
            (Operation::TransferOwnership, [new_owner]) => {
                Self::TransferOwnership(TransferOwnership {
                    device_id,
                    new_owner: new_owner.clone(),
                })
            }
            (Operation::QueryHistory, []) => Self::QueryHistory(QueryHistory { device_id }),
            // Arity already checked above.
            _ => return Err(ProvenanceError::arity(op.name(), op.arity(), args.len())),
        };
        Ok(invocation)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::EnrollDevice(_) => Operation::EnrollDevice,
            Self::BindGood(_) => Operation::BindGood,
            Self::TransferOwnership(_) => Operation::TransferOwnership,
            Self::QueryHistory(_) => Operation::QueryHistory,
        }
    }

    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::EnrollDevice(cmd) => &cmd.device_id,
            Self::BindGood(cmd) => &cmd.device_id,
            Self::TransferOwnership(cmd) => &cmd.device_id,
            Self::QueryHistory(query) => &query.device_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name("queryWine"), None);
        assert_eq!(Operation::from_name("EnrollDevice"), None);
    }

    #[test]
    fn test_parse_enroll_device() {
        let inv = Invocation::parse("enrollDevice", &args(&["D1", "X1", "Acme"])).unwrap();
        assert_eq!(
            inv,
            Invocation::EnrollDevice(EnrollDevice {
                device_id: DeviceId::new("D1").unwrap(),
                model: "X1".into(),
                brand: "Acme".into(),
            })
        );
    }

    #[test]
    fn test_parse_bind_keeps_positional_order() {
        let inv = Invocation::parse(
            "enrollWine",
            &args(&["D1", "alice", "M1", "2020-01-01", "PlaceA", "2020-06-01", "PlaceB"]),
        )
        .unwrap();
        let Invocation::BindGood(cmd) = inv else {
            panic!("expected BindGood");
        };
        assert_eq!(cmd.owner, "alice");
        assert_eq!(cmd.model, "M1");
        assert_eq!(cmd.produce_date, "2020-01-01");
        assert_eq!(cmd.produce_place, "PlaceA");
        assert_eq!(cmd.out_date, "2020-06-01");
        assert_eq!(cmd.out_place, "PlaceB");
    }

    #[test]
    fn test_parse_transfer_and_query() {
        let inv = Invocation::parse("transferWine", &args(&["D1", "bob"])).unwrap();
        assert_eq!(inv.operation(), Operation::TransferOwnership);
        let inv = Invocation::parse("queryAllCars", &args(&["D1"])).unwrap();
        assert_eq!(inv.operation(), Operation::QueryHistory);
        assert_eq!(inv.device_id().as_str(), "D1");
    }

    #[test]
    fn test_wrong_arity_for_every_operation() {
        for op in Operation::ALL {
            for count in [0, op.arity() - 1, op.arity() + 1] {
                let raw: Vec<String> = (0..count).map(|i| format!("a{i}")).collect();
                let err = Invocation::parse(op.name(), &raw).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::InvalidArguments, "{op:?} with {count}");
            }
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = Invocation::parse("deleteWine", &args(&["D1"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOperation);
        assert!(err.to_string().contains("deleteWine"));
    }

    #[test]
    fn test_empty_device_id_rejected() {
        let err = Invocation::parse("queryAllCars", &args(&[""])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArguments);
    }
}
