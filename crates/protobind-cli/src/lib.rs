//! protobind CLI library
//!
//! Argument parsing, error mapping and output formatting for the
//! `protobind` binary.

pub mod cli;
pub mod error;
pub mod output;

pub use error::CliError;
