//! # Value Objects
//!
//! Small immutable values shared by the domain, ports and router.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally supplied identifier of a tracking device.
///
/// The same identifier also keys the wine bound to the device, since the
/// relationship is strictly one good per device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a raw identifier. Returns `None` for the empty string.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Write time assigned by the ledger to a key version.
///
/// Serialized as an RFC 3339 string in UTC with nanosecond precision, e.g.
/// `2020-06-01T12:00:00.000000000Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub const UNIX_EPOCH: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// `None` when `nanos` is not below one second.
    pub const fn checked(seconds: i64, nanos: u32) -> Option<Self> {
        if nanos < 1_000_000_000 {
            Some(Self { seconds, nanos })
        } else {
            None
        }
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Nanos, true)),
            // Outside chrono's representable range
            None => write!(f, "{}.{:09}", self.seconds, self.nanos),
        }
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_string()
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TimestampParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(dt) => Ok(Self::from(dt.with_timezone(&Utc))),
            Err(e) => parse_raw_seconds(&raw).ok_or_else(|| TimestampParseError {
                input: raw,
                reason: e.to_string(),
            }),
        }
    }
}

/// Parse the `<seconds>.<9 digit nanos>` form `Display` falls back to.
fn parse_raw_seconds(raw: &str) -> Option<Timestamp> {
    let (seconds, nanos) = raw.split_once('.')?;
    if nanos.len() != 9 || !nanos.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(Timestamp::new(seconds.parse().ok()?, nanos.parse().ok()?))
}

/// A timestamp string that is not valid RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimestampParseError {
    pub input: String,
    pub reason: String,
}
