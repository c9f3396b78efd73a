//! Per-schema compilation and aggregator synthesis.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info, Instrument};

use protobind_common_log::spans;

use crate::discovery::SchemaFile;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::fs;
use crate::templates;
use crate::toolchain::{Invocation, Toolchain};

pub const SCRIPT_INDEX: &str = "index.js";
pub const DECLARATION_INDEX: &str = "index.d.ts";
const SCRIPT_EXTENSION: &str = "js";

/// What was produced for one schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleReport {
    pub schema: PathBuf,
    pub dir: PathBuf,
    /// Export name in the root aggregator.
    pub export: String,
    /// Files merged into the local aggregator.
    pub entries: Vec<Entry>,
}

/// Compile one schema into `<out_dir>/<base_name>/` and write its local
/// `index.js` / `index.d.ts`.
///
/// Both compilers run concurrently; the step fails if either does.
pub async fn generate_module(
    toolchain: &Toolchain,
    proto_dir: &Path,
    out_dir: &Path,
    schema: &SchemaFile,
) -> Result<ModuleReport> {
    let dir = out_dir.join(&schema.base_name);
    tokio::fs::create_dir(&dir)
        .await
        .map_err(|e| Error::io("failed to create module directory", &dir, e))?;

    let js = toolchain.js_invocation(proto_dir, &dir, &schema.path);
    let ts = toolchain.ts_invocation(proto_dir, &dir, &schema.path);
    tokio::try_join!(run_compiler(&js, &schema.path), run_compiler(&ts, &schema.path))?;

    let entries: Vec<Entry> = fs::list_with_extension(&dir, SCRIPT_EXTENSION)?
        .iter()
        .filter_map(fs::stem)
        .map(|stem| Entry::file(&stem))
        .collect();

    fs::write_file(&dir.join(SCRIPT_INDEX), templates::local_js_entry(&entries)).await?;
    fs::write_file(&dir.join(DECLARATION_INDEX), templates::local_ts_entry(&entries)).await?;

    info!(files = entries.len(), dir = %dir.display(), "module generated");

    Ok(ModuleReport {
        schema: schema.path.clone(),
        dir,
        export: schema.entry().name,
        entries,
    })
}

/// Write the root `index.js` / `index.d.ts` re-exporting every schema
/// subdirectory.
pub async fn write_root_entries(out_dir: &Path, schemas: &[SchemaFile]) -> Result<Vec<Entry>> {
    let entries: Vec<Entry> = schemas.iter().map(SchemaFile::entry).collect();

    fs::write_file(&out_dir.join(SCRIPT_INDEX), templates::root_js_entry(&entries)).await?;
    fs::write_file(&out_dir.join(DECLARATION_INDEX), templates::root_ts_entry(&entries)).await?;

    Ok(entries)
}

/// Run one external compiler to completion; non-zero exit is an error.
pub async fn run_compiler(invocation: &Invocation, file: &Path) -> Result<()> {
    let program = invocation.display_name();
    let span = spans::tool_span(&program, &file.to_string_lossy());

    async {
        debug!(args = ?invocation.args, "spawning");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::io(format!("failed to run {program}"), &invocation.program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(stdout = %stdout.trim(), "compiler output");
        }

        if !output.status.success() {
            return Err(Error::Compiler {
                program: program.clone(),
                file: file.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok::<(), Error>(())
    }
    .instrument(span)
    .await
}
