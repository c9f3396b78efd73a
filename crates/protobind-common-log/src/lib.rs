//! Logging infrastructure for protobind.
//!
//! Everything is written to stderr so that stdout stays reserved for the
//! run summary printed by the CLI.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include timestamps.
    pub timestamps: bool,
    /// Include source location.
    pub source_location: bool,
    /// Include span events.
    pub span_events: bool,
    /// Include the event target (module path).
    pub targets: bool,
    /// Raw `RUST_LOG` directives, used only when no explicit level was set.
    pub directives: Option<String>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            timestamps: true,
            source_location: false,
            span_events: false,
            targets: false,
            directives: None,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    ///
    /// `PROTOBIND_LOG_LEVEL` wins over `RUST_LOG` when both are set.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        match var("PROTOBIND_LOG_LEVEL").as_deref().and_then(LogLevel::parse) {
            Some(level) => config.level = level,
            None => {
                if let Some(rust_log) = var("RUST_LOG").filter(|v| !v.trim().is_empty()) {
                    if let Some(level) = LogLevel::parse(&rust_log) {
                        config.level = level;
                    }
                    config.directives = Some(rust_log);
                }
            }
        }

        if let Some(format) = var("PROTOBIND_LOG_FORMAT") {
            config.format = LogFormat::parse(&format);
        }

        if let Some(file_path) = var("PROTOBIND_LOG_FILE") {
            config.file_path = Some(PathBuf::from(file_path));
        }

        if let Some(timestamps) = var("PROTOBIND_LOG_TIMESTAMPS") {
            config.timestamps = is_truthy(&timestamps);
        }

        if let Some(source_location) = var("PROTOBIND_LOG_SOURCE") {
            config.source_location = is_truthy(&source_location);
        }

        if let Some(span_events) = var("PROTOBIND_LOG_SPANS") {
            config.span_events = is_truthy(&span_events);
        }

        config
    }

    /// Adjust the level for the `-v`/`-q` command line switches.
    ///
    /// Without either switch the configured level is kept. Either switch
    /// overrides `RUST_LOG` directives.
    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        if verbose > 0 || quiet {
            self.directives = None;
        }
        self.level = match verbose {
            0 if quiet => LogLevel::Error,
            0 => self.level,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        };
        self.targets = verbose >= 2;
        self
    }

    /// Filter directives handed to the subscriber.
    pub fn filter_directives(&self) -> &str {
        self.directives.as_deref().unwrap_or(self.level.as_str())
    }

    fn fmt_span(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

/// Initialize logging with the given configuration.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_new(config.filter_directives())
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let mut layers = vec![stderr_layer(config)];

    if let Some(path) = &config.file_path {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        layers.push(file_layer(config, Arc::new(file)));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::InitError(e.to_string()))
}

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(config.targets)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(config.fmt_span());

    match (config.format, config.timestamps) {
        (LogFormat::Json, _) => layer.json().boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        (LogFormat::Pretty, true) => layer.boxed(),
        (LogFormat::Pretty, false) => layer.without_time().boxed(),
    }
}

fn file_layer(config: &LogConfig, file: Arc<std::fs::File>) -> BoxedLayer {
    let layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(config.fmt_span());

    match config.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Pretty => layer.boxed(),
    }
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};

/// Span helpers for pipeline stages.
pub mod spans;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("Warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("protobind=debug"), None);
    }

    #[test]
    fn test_log_level_roundtrips_through_str() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::parse(level.as_str()), Some(level));
        }
    }

    #[test]
    fn test_log_level_from() {
        use tracing_subscriber::filter::LevelFilter;
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::WARN);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
    }

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file_path.is_none());
        assert!(config.timestamps);
        assert!(!config.source_location);
        assert!(!config.span_events);
    }

    #[test]
    fn test_verbosity_mapping() {
        let base = LogConfig::default();
        assert_eq!(base.clone().with_verbosity(0, false).level, LogLevel::Warn);
        assert_eq!(base.clone().with_verbosity(0, true).level, LogLevel::Error);
        assert_eq!(base.clone().with_verbosity(1, false).level, LogLevel::Info);
        assert_eq!(base.clone().with_verbosity(2, false).level, LogLevel::Debug);
        assert_eq!(base.clone().with_verbosity(5, false).level, LogLevel::Trace);
        assert!(base.with_verbosity(2, false).targets);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_from_vars() {
        let config = LogConfig::from_vars(vars(&[
            ("PROTOBIND_LOG_LEVEL", "debug"),
            ("PROTOBIND_LOG_FORMAT", "json"),
            ("PROTOBIND_LOG_FILE", "/tmp/protobind.log"),
            ("PROTOBIND_LOG_TIMESTAMPS", "false"),
            ("PROTOBIND_LOG_SOURCE", "true"),
            ("PROTOBIND_LOG_SPANS", "1"),
            ("RUST_LOG", "error"),
        ]));
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_path, Some(PathBuf::from("/tmp/protobind.log")));
        assert!(!config.timestamps);
        assert!(config.source_location);
        assert!(config.span_events);
        assert_eq!(config.filter_directives(), "debug");
    }

    #[test]
    fn test_rust_log_is_a_fallback() {
        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "protobind_core=trace")]));
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.filter_directives(), "protobind_core=trace");

        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "info")]));
        assert_eq!(config.level, LogLevel::Info);
    }

    #[test]
    fn test_switches_override_rust_log() {
        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "info")])).with_verbosity(0, true);
        assert_eq!(config.filter_directives(), "error");

        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "off")])).with_verbosity(2, false);
        assert_eq!(config.filter_directives(), "debug");

        let config = LogConfig::from_vars(vars(&[("RUST_LOG", "off")])).with_verbosity(0, false);
        assert_eq!(config.filter_directives(), "off");
    }
}
