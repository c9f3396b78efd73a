//! Error types for the generation pipeline.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

use crate::toolchain::{NODE_PROTOC, NODE_PROTOC_PLUGIN, PROTOC, TS_PLUGIN};

/// Result type alias using the pipeline error.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can abort a generation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No NPM package found at working directory: {}", cwd.display())]
    NoManifest { cwd: PathBuf },

    #[error("Invalid package manifest {}: {source}", path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No package name given and {} has no \"name\" field", path.display())]
    NoPackageName { path: PathBuf },

    #[error("No *.proto files found in input directory: {}", dir.display())]
    NoSchemaFiles { dir: PathBuf },

    #[error("Plugin not found: {name}")]
    PluginNotFound { name: String },

    #[error("Compiler not found: {name}")]
    CompilerNotFound { name: String },

    #[error(
        "Schema files {} and {} both map to module name {name}",
        first.display(),
        second.display()
    )]
    NameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(
        "Schema file {} would shadow the generated {artifact} in the output root",
        path.display()
    )]
    ReservedName { path: PathBuf, artifact: &'static str },

    #[error("Schema file name is not valid UTF-8: {}", path.display())]
    InvalidSchemaName { path: PathBuf },

    #[error("{program} failed on {} ({status}): {stderr}", file.display())]
    Compiler {
        program: String,
        file: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{message}: {}", path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to serialize package manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Short stable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoManifest { .. } => "ENOMANIFEST",
            Self::InvalidManifest { .. } => "EMANIFEST",
            Self::NoPackageName { .. } => "ENONAME",
            Self::NoSchemaFiles { .. } => "ENOPROTO",
            Self::PluginNotFound { .. } => "ENOPLUGIN",
            Self::CompilerNotFound { .. } => "ENOCOMPILER",
            Self::NameCollision { .. } | Self::ReservedName { .. } => "ECOLLISION",
            Self::InvalidSchemaName { .. } => "EBADNAME",
            Self::Compiler { .. } => "ECOMPILER",
            Self::Io { .. } => "EIO",
            Self::Pattern(_) => "EPATTERN",
            Self::Serialize(_) => "ESERIALIZE",
            Self::Template(_) => "ETEMPLATE",
        }
    }

    /// Remediation hint, when one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoManifest { .. } => {
                Some("Run protobind from inside a package that has a package.json")
            }
            Self::NoPackageName { .. } => {
                Some("Pass --name or add a \"name\" field to package.json")
            }
            Self::NoSchemaFiles { .. } => {
                Some("Check --proto-path; only the top level of the directory is searched")
            }
            Self::PluginNotFound { name } | Self::CompilerNotFound { name } => install_hint(name),
            Self::NameCollision { .. } => Some("Rename one of the schema files"),
            Self::ReservedName { .. } => {
                Some("Rename the schema file; index and package are reserved")
            }
            Self::InvalidSchemaName { .. } => Some("Rename the schema file using UTF-8 characters"),
            _ => None,
        }
    }

    pub fn io(message: impl Into<String>, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

fn install_hint(tool: &str) -> Option<&'static str> {
    match tool {
        NODE_PROTOC | NODE_PROTOC_PLUGIN => Some("Install grpc-tools: npm install -g grpc-tools"),
        TS_PLUGIN => Some("Install ts-protoc-gen: npm install -g ts-protoc-gen"),
        PROTOC => Some("Install protoc: https://grpc.io/docs/protoc-installation/"),
        _ => None,
    }
}
