//! The end-to-end generation run.

use std::ffi::OsString;
use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, Instrument};

use protobind_common_log::{spans, timed};

use crate::artifacts::{self, MANIFEST_FILE, README_FILE};
use crate::config::{Defaults, Flags};
use crate::discovery;
use crate::error::{Error, Result};
use crate::fs;
use crate::generate;
use crate::manifest::OwnerManifest;
use crate::params::RunParameters;
use crate::report::GenerationReport;
use crate::toolchain::Toolchain;

/// The process environment a run executes in.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory the owner manifest search starts from and relative
    /// paths resolve against.
    pub cwd: PathBuf,
    /// `PATH`-style list used to find the toolchain.
    pub search_path: Option<OsString>,
    pub defaults: Defaults,
}

impl RunContext {
    pub fn new(cwd: impl Into<PathBuf>, search_path: Option<OsString>) -> Self {
        Self {
            cwd: cwd.into(),
            search_path,
            defaults: Defaults::default(),
        }
    }

    /// Context of the current process.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| Error::io("failed to read working directory", ".", e))?;
        Ok(Self::new(cwd, std::env::var_os("PATH")))
    }
}

/// Run the whole pipeline.
///
/// Nothing under the output path is touched until the owner manifest,
/// the schema list, and the toolchain have all been validated. After that
/// the first failure aborts the run and leaves partial output behind.
pub async fn run(flags: &Flags, ctx: &RunContext) -> Result<GenerationReport> {
    let (owner_path, owner) = OwnerManifest::discover(&ctx.cwd)?;
    info!(manifest = %owner_path.display(), "using owner manifest");

    let params = RunParameters::resolve(flags, &owner, &owner_path, &ctx.cwd, &ctx.defaults)?;
    info!(package = %params.name, version = %params.version, "resolved parameters");

    let schemas = discovery::discover(&params.proto_dir)?;
    discovery::check_collisions(&schemas)?;

    let toolchain = Toolchain::discover(ctx.search_path.as_deref(), &ctx.cwd)?;

    discovery::prepare_output(&params.out_dir).await?;

    let mut modules = Vec::with_capacity(schemas.len());
    for schema in &schemas {
        let module = timed!(
            "generate_module",
            generate::generate_module(&toolchain, &params.proto_dir, &params.out_dir, schema)
                .instrument(spans::schema_span(&schema.base_name))
                .await?
        );
        modules.push(module);
    }

    let exports = generate::write_root_entries(&params.out_dir, &schemas).await?;

    let manifest = if params.manifest {
        let path = params.out_dir.join(MANIFEST_FILE);
        fs::write_file(&path, artifacts::render_manifest(&params)?)
            .instrument(spans::artifact_span("manifest", &path.to_string_lossy()))
            .await?;
        Some(path)
    } else {
        None
    };

    let readme = if params.readme {
        let path = params.out_dir.join(README_FILE);
        let sources: Vec<String> = schemas
            .iter()
            .map(|s| fs::to_unix_string(fs::relative_to(&s.path, &params.out_dir)))
            .collect();
        let content = artifacts::render_readme(&params.service_name, &sources, Utc::now())?;
        fs::write_file(&path, content)
            .instrument(spans::artifact_span("readme", &path.to_string_lossy()))
            .await?;
        Some(path)
    } else {
        None
    };

    info!(
        modules = modules.len(),
        out_dir = %params.out_dir.display(),
        "generation complete"
    );

    Ok(GenerationReport {
        package: params.name,
        version: params.version,
        out_dir: params.out_dir,
        modules,
        exports,
        manifest,
        readme,
    })
}
