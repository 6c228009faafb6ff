//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level.

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the env filter, falling back to `default_level` when `RUST_LOG` is
/// unset, empty or unparseable
pub fn env_filter(default_level: &str) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), default_level)
}

fn filter_from(directives: Option<&str>, default_level: &str) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so stdout carries only EMF output.
pub fn init_tracing(format: LogFormat, default_level: &str) -> Result<(), InitError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_falls_back_to_default_level() {
        assert_eq!(filter_from(None, "debug").to_string(), "debug");
        assert_eq!(filter_from(Some(""), "warn").to_string(), "warn");
        assert_eq!(filter_from(Some("aws_emf=loud"), "warn").to_string(), "warn");
    }

    #[test]
    fn test_filter_prefers_directives() {
        let filter = filter_from(Some("aws_emf=trace"), "debug");
        assert_eq!(filter.to_string(), "aws_emf=trace");
    }

    #[test]
    fn test_env_filter_uses_default_when_unset() {
        if std::env::var(EnvFilter::DEFAULT_ENV).is_err() {
            assert_eq!(env_filter("info").to_string(), "info");
        }
    }

    #[test]
    fn test_second_init_fails() {
        // Only one global subscriber can be installed per process
        let _ = init_tracing(LogFormat::Text, "warn");
        assert!(init_tracing(LogFormat::Json, "warn").is_err());
    }
}
