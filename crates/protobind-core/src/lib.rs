//! protobind core: turns a directory of `*.proto` files into a ready-to-publish
//! JavaScript/TypeScript package.
//!
//! The heavy lifting is done by external protoc toolchains; this crate
//! finds them, runs them, and writes the index files, `package.json` and
//! `README.md` around their output. [`run`] executes the whole pipeline.

pub mod artifacts;
pub mod config;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod fs;
pub mod generate;
pub mod manifest;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod templates;
pub mod toolchain;

pub use config::{Defaults, Flags};
pub use discovery::SchemaFile;
pub use entry::Entry;
pub use error::{Error, Result};
pub use manifest::OwnerManifest;
pub use params::RunParameters;
pub use pipeline::{run, RunContext};
pub use report::GenerationReport;
pub use toolchain::Toolchain;
