//! Schema discovery and output directory preparation.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::fs;

pub const SCHEMA_EXTENSION: &str = "proto";

/// Schema stems that would resolve to a root artifact instead of their
/// subdirectory (`require('./index')`, `require('./package')`).
static RESERVED_STEMS: [(&str, &str); 2] = [
    ("index", "index.js and index.d.ts"),
    ("package", "package.json"),
];

/// A `*.proto` input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaFile {
    /// Absolute path.
    pub path: PathBuf,
    /// File stem; names the output subdirectory.
    pub base_name: String,
}

impl SchemaFile {
    /// Fails when the file name is not valid UTF-8.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        match fs::stem(&path) {
            Some(base_name) => Ok(Self { path, base_name }),
            None => Err(Error::InvalidSchemaName { path }),
        }
    }

    /// Root aggregator entry for this schema's subdirectory.
    pub fn entry(&self) -> Entry {
        Entry::submodule(&self.base_name)
    }
}

/// List the schema files directly inside `dir`, sorted by path.
///
/// A missing directory is reported the same way as an empty one.
pub fn discover(dir: &Path) -> Result<Vec<SchemaFile>> {
    let files: Vec<_> = fs::list_with_extension(dir, SCHEMA_EXTENSION)?
        .into_iter()
        .map(SchemaFile::from_path)
        .collect::<Result<_>>()?;

    if files.is_empty() {
        return Err(Error::NoSchemaFiles {
            dir: dir.to_path_buf(),
        });
    }

    info!(count = files.len(), dir = %dir.display(), "found schema files");
    Ok(files)
}

/// Reject schema sets where two files would share a root export name, or
/// where a file would be shadowed by a root artifact.
pub fn check_collisions(files: &[SchemaFile]) -> Result<()> {
    let mut seen: HashMap<String, &SchemaFile> = HashMap::new();

    for file in files {
        let reserved = RESERVED_STEMS
            .iter()
            .find(|(stem, _)| file.base_name.eq_ignore_ascii_case(stem));
        if let Some((_, artifact)) = reserved {
            return Err(Error::ReservedName {
                path: file.path.clone(),
                artifact: *artifact,
            });
        }

        let name = file.entry().name;
        if let Some(first) = seen.get(&name) {
            return Err(Error::NameCollision {
                name,
                first: first.path.clone(),
                second: file.path.clone(),
            });
        }
        seen.insert(name, file);
    }

    Ok(())
}

/// Remove `dir` with everything in it, then create it empty.
pub async fn prepare_output(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => debug!(dir = %dir.display(), "removed previous output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("failed to remove output directory", dir, e)),
    }

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io("failed to create output directory", dir, e))
}
