//! Logging setup for the command-line tool
//!
//! Logs go to stderr so stdout carries only metadata output. `RUST_LOG`
//! takes precedence over the configured filter.

use metabind_connection::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Args;

/// Apply command-line overrides to the configured logging settings
pub fn effective_config(config: &LoggingConfig, args: &Args) -> LoggingConfig {
    LoggingConfig {
        filter: args
            .log_filter
            .clone()
            .unwrap_or_else(|| config.filter.clone()),
        json: config.json || args.log_json,
    }
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;

    let layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json().with_current_span(true))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr())))
            .try_init()?;
    }

    tracing::debug!(filter = %config.filter, json = config.json, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_config() {
        let config = LoggingConfig {
            filter: "warn".into(),
            json: false,
        };
        let args = Args::try_parse_from([
            "metabind", "-c", "m.toml", "--log-filter", "metabind=trace", "--log-json", "schema",
        ])
        .expect("parse");

        let effective = effective_config(&config, &args);

        assert_eq!(effective.filter, "metabind=trace");
        assert!(effective.json);
    }

    #[test]
    fn test_config_used_without_flags() {
        let config = LoggingConfig {
            filter: "debug".into(),
            json: true,
        };
        let args = Args::try_parse_from(["metabind", "-c", "m.toml", "schema"]).expect("parse");

        assert_eq!(effective_config(&config, &args), config);
    }
}
