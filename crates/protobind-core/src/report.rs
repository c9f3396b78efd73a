//! Summary of a finished run.

use std::path::PathBuf;

use serde::Serialize;

use crate::entry::Entry;
use crate::generate::ModuleReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Scoped name of the generated package.
    pub package: String,
    pub version: String,
    pub out_dir: PathBuf,
    pub modules: Vec<ModuleReport>,
    /// Names exported by the root aggregator, in file order.
    pub exports: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<PathBuf>,
}

impl GenerationReport {
    pub fn export_names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|e| e.name.as_str())
    }
}
