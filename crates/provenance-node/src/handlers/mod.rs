//! # Request Handlers
//!
//! Translate host wire messages into router calls.

pub mod invoke;

pub use invoke::{handle_line, InvokeReply, InvokeRequest};
