//! # Domain Layer
//!
//! Pure provenance logic: entities, key namespace, record codec, device
//! lifecycle and the error taxonomy.
//!
//! This module contains NO I/O dependencies. Ledger access goes through the
//! ports in the `ports` module.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod lifecycle;
pub mod value_objects;

pub use codec::{decode, encode, encode_payload, Record};
pub use entities::*;
pub use errors::*;
pub use keys::*;
pub use lifecycle::*;
pub use value_objects::*;
