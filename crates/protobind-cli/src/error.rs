//! CLI error handling.

use std::io;
use std::process::ExitCode;

use protobind_common_log::LogError;
use thiserror::Error;

/// Errors surfaced by the `protobind` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Generate(#[from] protobind_core::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] LogError),

    #[error("{message}")]
    Write {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to render output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Generate(e) => e.code(),
            Self::Logging(_) => "ELOG",
            Self::Write { .. } => "EWRITE",
            Self::Output(_) => "EOUTPUT",
            Self::Other(_) => "EUNKNOWN",
        }
    }

    /// Every failure exits with status 1.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Generate(e) => e.hint(),
            Self::Logging(LogError::FileError(_)) => Some("Check PROTOBIND_LOG_FILE"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_errors_keep_their_code() {
        let err: CliError = protobind_core::Error::PluginNotFound {
            name: "protoc-gen-ts".to_string(),
        }
        .into();
        assert_eq!(err.code(), "ENOPLUGIN");
        assert_eq!(err.to_string(), "Plugin not found: protoc-gen-ts");
        assert!(err.hint().is_some_and(|h| h.contains("ts-protoc-gen")));
    }

    #[test]
    fn test_other_errors_show_their_context_chain() {
        use anyhow::Context;

        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no threads"));
        let err: CliError = result.context("failed to create Tokio runtime").unwrap_err().into();

        assert_eq!(err.code(), "EUNKNOWN");
        assert_eq!(err.to_string(), "failed to create Tokio runtime: no threads");
        assert!(err.hint().is_none());
    }
}
