//! # Key Namespace
//!
//! Derives ledger keys from device identifiers.
//!
//! Keys are the namespace tag followed by the raw identifier (`device<id>`,
//! `wine<id>`), the layout already present on deployed ledgers. The tags
//! differ in their first byte, so no device key can equal a wine key, and a
//! fixed-length prefix within one namespace keeps the mapping injective.

use super::value_objects::DeviceId;
use std::fmt;

/// Entity namespaces sharing the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Device,
    Wine,
}

impl Namespace {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Wine => "wine",
        }
    }
}

/// A fully qualified ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerKey(String);

impl LedgerKey {
    pub fn new(namespace: Namespace, id: &DeviceId) -> Self {
        let tag = namespace.tag();
        let mut key = String::with_capacity(tag.len() + id.as_str().len());
        key.push_str(tag);
        key.push_str(id.as_str());
        Self(key)
    }

    pub fn device(id: &DeviceId) -> Self {
        Self::new(Namespace::Device, id)
    }

    pub fn wine(id: &DeviceId) -> Self {
        Self::new(Namespace::Wine, id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
