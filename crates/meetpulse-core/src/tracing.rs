//! Logging setup shared by the meetpulse binaries.
//!
//! ```ignore
//! use meetpulse_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::default())?;
//! ```
//!
//! `RUST_LOG` takes precedence over the configured level unless an explicit
//! filter directive is set.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Crate prefix used for the default filter directive.
const FILTER_TARGET: &str = "meetpulse";

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// A global subscriber is already installed
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),

    /// The filter directive does not parse
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output (default)
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level applied to meetpulse crates when neither `RUST_LOG` nor
    /// `env_filter` is set
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file and line
    pub include_location: bool,
    pub include_timestamp: bool,
    /// Log span open/close events
    pub include_span_events: bool,
    /// Explicit filter directive, overrides everything else
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_timestamp: false,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Verbose config for `--debug` runs
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            include_timestamp: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Returns the directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!("{FILTER_TARGET}={}", self.default_level)
    }

    fn build_filter(&self) -> Result<EnvFilter, TracingError> {
        match self.env_filter {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn build_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.include_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_span_events(span_events);

        match (self.output_format, self.include_timestamp) {
            (TracingOutputFormat::Pretty, true) => base.pretty().boxed(),
            (TracingOutputFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (TracingOutputFormat::Compact, true) => base.compact().boxed(),
            (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
            (TracingOutputFormat::Json, _) => base.json().boxed(),
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the explicit filter
/// directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.build_filter()?;
    tracing_subscriber::registry()
        .with(config.build_layer())
        .with(filter)
        .try_init()?;
    Ok(())
}
