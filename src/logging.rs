//! Logging initialization and configuration
//!
//! Structured logging with `tracing`, configured from the environment:
//!
//! - `SCHEMAGEN_LOG_LEVEL` - trace/debug/info/warn/error (default `info`)
//! - `SCHEMAGEN_LOG_FORMAT` - `pretty` (default) or `json`
//! - `SCHEMAGEN_LOG_TARGET_FILTER` - extra comma-separated filter directives
//! - `RUST_LOG` - when set, replaces the level entirely, unless `-v` forces `debug`
//!
//! Events go to stderr so generated output printed on stdout stays clean.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: pretty for terminals, JSON for log collectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable multi-line output
    Pretty,
}

impl LogFormat {
    /// Parse a format name; anything but `json` is pretty.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty
    pub format: LogFormat,
    /// Module filter (comma-separated directives)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
    /// Use `log_level` even when `RUST_LOG` is set
    pub ignore_rust_log: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
            ignore_rust_log: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("SCHEMAGEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("SCHEMAGEN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            ),
            target_filter: env::var("SCHEMAGEN_LOG_TARGET_FILTER").ok(),
            include_location: env::var("SCHEMAGEN_LOG_INCLUDE_LOCATION")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            ignore_rust_log: false,
        }
    }

    /// Force `debug`, as `-v` does, over `RUST_LOG` too.
    pub fn verbose(mut self) -> Self {
        self.log_level = "debug".to_string();
        self.ignore_rust_log = true;
        self
    }

    /// Level parsed from `log_level`, `INFO` when unrecognized.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// The filter for `config`, given the value of `RUST_LOG`.
fn env_filter(config: &LogConfig, rust_log: Option<&str>) -> EnvFilter {
    let level = config.level();
    let mut env_filter = match rust_log {
        Some(directives) if !config.ignore_rust_log => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
        }
        _ => EnvFilter::new(level.as_str()),
    };

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if filter.is_empty() {
                continue;
            }
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
            }
        }
    }
    env_filter
}

/// Initialize logging with an explicit configuration
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let env_filter = env_filter(config, env::var("RUST_LOG").ok().as_deref());

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_level_parsing() {
        let config = LogConfig {
            log_level: "WARN".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(config.level(), Level::WARN);
        assert_eq!(config.verbose().level(), Level::DEBUG);
        let bogus = LogConfig {
            log_level: "loud".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(bogus.level(), Level::INFO);
    }

    #[test]
    fn test_rust_log_replaces_level() {
        let filter = env_filter(&LogConfig::default(), Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
        let filter = env_filter(&LogConfig::default(), None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_verbose_wins_over_rust_log() {
        let config = LogConfig::default().verbose();
        assert!(config.ignore_rust_log);
        let filter = env_filter(&config, Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
