//! Runtime configuration for the tra command-line tool.
//!
//! Values are layered with clap: an explicit flag wins over the matching
//! `TRA_*` environment variable, which wins over the built-in default.
//!
//! | Setting      | Flag           | Environment      | Default   |
//! |--------------|----------------|------------------|-----------|
//! | log filter   | `--log-filter` | `TRA_LOG_FILTER` | `warn`    |
//! | log format   | `--log-format` | `TRA_LOG_FORMAT` | `compact` |

mod defaults;
mod logging;

use clap::Args;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Logging configuration shared by the binary and its tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Args)]
pub struct Config {
    /// Log filter expression in `tracing` `EnvFilter` syntax.
    #[arg(
        long = "log-filter",
        env = "TRA_LOG_FILTER",
        value_name = "FILTER",
        default_value = DEFAULT_LOG_FILTER
    )]
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,

    /// Log output format.
    #[arg(
        long = "log-format",
        env = "TRA_LOG_FORMAT",
        value_name = "FORMAT",
        default_value_t = default_log_format()
    )]
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

/// Errors raised when a configuration is unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The log filter is empty or only whitespace.
    #[error("log filter must not be empty")]
    EmptyLogFilter,
}

impl Config {
    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Replaces the log filter with [`VERBOSE_LOG_FILTER`] when `verbose`
    /// is set.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            VERBOSE_LOG_FILTER.clone_into(&mut self.log_filter);
        }
        self
    }

    /// Checks that the configuration can be applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLogFilter`] for a blank filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(())
    }
}
