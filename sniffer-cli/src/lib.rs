//! Command-line front end for the sniffer
//!
//! This crate provides argument parsing and the [`Sniffer`] driver that ties
//! a frame source, the decoder, the protocol filter and the capture writer
//! together. The `sniffer` binary is a thin wrapper around both.

pub mod args;
pub mod sniffer;

pub use args::Cli;
pub use sniffer::{fatal_message, RunReport, Sniffer, SnifferConfig, StopReason};
