//! protobind CLI
//!
//! Main entry point for the `protobind` binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use protobind_cli::cli::{Cli, OutputFormat};
use protobind_cli::output::print_output;
use protobind_cli::CliError;
use protobind_common_log::LogConfig;
use protobind_core::RunContext;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("error[{}]: {e}", e.code());
        return e.exit_code();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "run failed");
            eprintln!("error[{}]: {e}", e.code());
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit_code()
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create Tokio runtime")?;

    let ctx = RunContext::from_env()?;
    let report = runtime.block_on(cli.execute(&ctx))?;

    if cli.quiet && cli.format == OutputFormat::Text {
        return Ok(());
    }
    print_output(cli.format, &report)
}

fn init_logging(cli: &Cli) -> Result<(), CliError> {
    let config = LogConfig::from_env().with_verbosity(cli.verbose, cli.quiet);
    protobind_common_log::init(&config)?;
    Ok(())
}
