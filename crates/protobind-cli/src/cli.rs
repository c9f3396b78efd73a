//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueHint};

use protobind_core::{run, Flags, GenerationReport, RunContext};

use crate::error::CliError;

/// protobind - publishable JS/TS packages from protobuf schemas
///
/// Compiles every `*.proto` file in a directory with grpc-tools and
/// protoc-gen-ts, then writes index files, package.json and README.md
/// around the output.
#[derive(Debug, Parser)]
#[command(
    name = "protobind",
    author,
    about,
    long_about = None,
    disable_version_flag = true,
    help_template = "\
{before-help}{name}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
    /// Directory containing the *.proto files
    #[arg(
        long,
        env = "PROTOBIND_PROTO_PATH",
        value_name = "DIR",
        value_hint = ValueHint::DirPath
    )]
    pub proto_path: PathBuf,

    /// Output directory; removed and recreated on every run
    #[arg(
        long,
        env = "PROTOBIND_OUT_PATH",
        value_name = "DIR",
        value_hint = ValueHint::DirPath
    )]
    pub out_path: PathBuf,

    /// Package name (defaults to the owner package's name)
    #[arg(long, env = "PROTOBIND_NAME")]
    pub name: Option<String>,

    /// Package license (defaults to the owner package's license)
    #[arg(long, env = "PROTOBIND_LICENSE")]
    pub license: Option<String>,

    /// Package version (defaults to the owner package's version)
    #[arg(long, env = "PROTOBIND_VERSION", value_parser = validate_semver)]
    pub version: Option<String>,

    /// npm scope of the generated package
    #[arg(long, env = "PROTOBIND_SCOPE", value_name = "SCOPE")]
    pub scope: Option<String>,

    /// Mark the generated package as publishable
    #[arg(
        long,
        env = "PROTOBIND_PUBLIC",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    pub public: bool,

    /// Write README.md
    #[arg(
        long,
        env = "PROTOBIND_README",
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set,
        overrides_with = "no_readme"
    )]
    pub readme: bool,

    /// Skip README.md
    #[arg(long, overrides_with = "readme")]
    pub no_readme: bool,

    /// Write package.json
    #[arg(
        long,
        env = "PROTOBIND_MANIFEST",
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set,
        overrides_with = "no_manifest"
    )]
    pub manifest: bool,

    /// Skip package.json
    #[arg(long, overrides_with = "manifest")]
    pub no_manifest: bool,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Format of the run summary
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Collapse the parsed arguments into pipeline flags.
    pub fn flags(&self) -> Flags {
        Flags {
            proto_path: self.proto_path.clone(),
            out_path: self.out_path.clone(),
            name: self.name.clone(),
            license: self.license.clone(),
            version: self.version.clone(),
            scope: self.scope.clone(),
            public: self.public,
            readme: self.readme && !self.no_readme,
            manifest: self.manifest && !self.no_manifest,
        }
    }

    /// Run the generation pipeline in `ctx`.
    pub async fn execute(&self, ctx: &RunContext) -> Result<GenerationReport, CliError> {
        Ok(run(&self.flags(), ctx).await?)
    }
}

/// Validate a semantic version string
pub fn validate_semver(s: &str) -> Result<String, String> {
    semver::Version::parse(s)
        .map(|_| s.to_string())
        .map_err(|e| format!("Invalid semantic version: {e}"))
}
