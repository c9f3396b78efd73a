//! Output formatting for the run summary.

use std::io::Write;

use serde::Serialize;

use protobind_core::GenerationReport;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;
    fn format_json(&self) -> Result<String, serde_json::Error>;
}

impl FormattedOutput for GenerationReport {
    fn format_text(&self) -> String {
        let mut out = format!(
            "Generated {}@{} in {}\n",
            self.package,
            self.version,
            self.out_dir.display()
        );

        let width = self.export_names().map(str::len).max().unwrap_or(0);
        for entry in &self.exports {
            out.push_str(&format!("  {:<width$}  {}\n", entry.name, entry.path));
        }

        for artifact in [&self.manifest, &self.readme].into_iter().flatten() {
            out.push_str(&format!("  wrote {}\n", artifact.display()));
        }

        out.truncate(out.trim_end().len());
        out
    }

    fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Print formatted output to stdout
pub fn print_output<T>(format: OutputFormat, value: &T) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
{
    write_output(format, value, std::io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(format: OutputFormat, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
    W: Write,
{
    let output = match format {
        OutputFormat::Text => value.format_text(),
        OutputFormat::Json => value.format_json().map_err(CliError::Output)?,
    };

    writeln!(writer, "{output}").map_err(|source| CliError::Write {
        message: "failed to write output".to_string(),
        source,
    })?;
    Ok(())
}
