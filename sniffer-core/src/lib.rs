//! Sniffer Core Library
//!
//! This crate provides the shared error type, layer and protocol tags used by
//! the decoding, capture and command-line crates of the sniffer workspace.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{Layer, Protocol};
