//! Structured logging setup.
//!
//! The client only emits `tracing` events; installing a subscriber is left
//! to the application. [`LogConfig::init`] is a convenience for binaries and
//! tests that want the usual `tracing-subscriber` stack.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{SafeNestError, SafeNestResult};

/// Minimum level captured by the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug output, including metadata updates.
    Debug,
    /// Retries and lifecycle events.
    Info,
    /// Terminal request failures.
    Warn,
    /// Errors only.
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
    /// Terse single-line output.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Include the event target.
    pub include_target: bool,
    /// Include source file and line.
    pub include_file_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_target: true,
            include_file_line: false,
        }
    }
}

impl LogConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether the target is printed.
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// Sets whether file and line are printed.
    pub fn with_file_line(mut self, include: bool) -> Self {
        self.include_file_line = include;
        self
    }

    /// Installs a global subscriber. `RUST_LOG` directives are honored on
    /// top of the configured level.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a global subscriber is already set.
    pub fn init(self) -> SafeNestResult<()> {
        let filter = EnvFilter::from_default_env().add_directive(LevelFilter::from(self.level).into());
        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.format {
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(self.include_target)
                        .with_file(self.include_file_line)
                        .with_line_number(self.include_file_line),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_target(self.include_target))
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_target(self.include_target))
                .try_init(),
        };

        result.map_err(|e| SafeNestError::configuration(format!("logging already initialized: {}", e)))
    }
}

/// Installs a subscriber with the given configuration.
///
/// ```no_run
/// use safenest_client::observability::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new().with_format(LogFormat::Json)).ok();
/// ```
pub fn init_logging(config: LogConfig) -> SafeNestResult<()> {
    config.init()
}
