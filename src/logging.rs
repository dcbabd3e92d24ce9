//! Tracing subscriber setup.
//!
//! The crate itself only emits `tracing` events (`relaykit` for queue
//! operations, `relaykit::http` from [`LoggingInterceptor`](crate::execution::http::LoggingInterceptor)).
//! Applications that do not install their own subscriber can use the helpers here.
//!
//! ```rust,no_run
//! use relaykit::logging::{init_subscriber, LoggingConfig, OutputFormat};
//!
//! # fn main() -> Result<(), relaykit::RelayError> {
//! let _guard = init_subscriber(
//!     LoggingConfig::builder()
//!         .log_level(tracing::Level::DEBUG)
//!         .output_format(OutputFormat::Json)
//!         .build(),
//! )?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::{RelayError, Result};

pub const LOG_LEVEL_ENV: &str = "RELAYKIT_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "RELAYKIT_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "RELAYKIT_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per event, span context included
    Json,
    /// JSON with event fields flattened to the top level
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" | "json_compact" => Ok(Self::JsonCompact),
            other => Err(RelayError::ConfigurationError(format!(
                "invalid log format '{other}'; expected text, json or json-compact"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Append to this file instead of writing to stdout
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            log_file: None,
        }
    }
}

impl LoggingConfig {
    pub fn builder() -> LoggingConfigBuilder {
        LoggingConfigBuilder::default()
    }

    /// Read `RELAYKIT_LOG_LEVEL`, `RELAYKIT_LOG_FORMAT` and `RELAYKIT_LOG_FILE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            builder = builder.log_level_str(&level)?;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            builder = builder.output_format(format.parse()?);
        }
        if let Some(path) = lookup(LOG_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            builder = builder.log_file(path);
        }
        Ok(builder.build())
    }
}

#[derive(Debug, Default)]
pub struct LoggingConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    log_file: Option<PathBuf>,
}

impl LoggingConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Parse `trace`, `debug`, `info`, `warn` or `error`.
    pub fn log_level_str(mut self, level: &str) -> Result<Self> {
        let parsed = level.trim().parse::<tracing::Level>().map_err(|_| {
            RelayError::ConfigurationError(format!(
                "invalid log level '{level}'; expected trace, debug, info, warn or error"
            ))
        })?;
        self.log_level = Some(parsed);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn build(self) -> LoggingConfig {
        LoggingConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            log_file: self.log_file,
        }
    }
}

/// Install a global subscriber.
///
/// Returns the file writer's guard when `log_file` is set; keep it alive or
/// buffered lines are lost. An already-installed global subscriber is left in
/// place and `Ok(None)` is returned.
pub fn init_subscriber(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = format!("relaykit={}", config.log_level.to_string().to_ascii_lowercase());

    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let appender = file_appender(path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };
    let ansi = config.log_file.is_none();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer);

    let installed = match config.output_format {
        OutputFormat::Text => builder.with_ansi(ansi).try_init(),
        OutputFormat::Json => builder
            .json()
            .with_current_span(true)
            .with_thread_ids(true)
            .try_init(),
        OutputFormat::JsonCompact => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
    };

    match installed {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already been set") => Ok(None),
        Err(e) => Err(RelayError::ConfigurationError(format!(
            "failed to initialize tracing: {e}"
        ))),
    }
}

fn file_appender(path: &std::path::Path) -> Result<RollingFileAppender> {
    let file_name = path.file_name().ok_or_else(|| {
        RelayError::ConfigurationError(format!("log file '{}' has no file name", path.display()))
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| {
            RelayError::ConfigurationError(format!(
                "cannot open log file '{}': {e}",
                path.display()
            ))
        })
}

pub fn init_default() -> Result<Option<WorkerGuard>> {
    init_subscriber(LoggingConfig::default())
}

/// Install a subscriber configured from `RELAYKIT_LOG_*` variables.
pub fn init_from_env() -> Result<Option<WorkerGuard>> {
    init_subscriber(LoggingConfig::from_env()?)
}
