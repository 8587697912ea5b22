//! Structured logging for mapforge.
//!
//! Installs a `tracing` subscriber with console output (uptime timestamps and
//! module paths) plus JSON file logging in debug builds. The level comes from
//! `RUST_LOG` when set, otherwise from the config's `debug.log_level`.

use mapforge_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Initialize the tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for JSON log files (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration to use for log level override
///
/// # Examples
///
/// ```no_run
/// use mapforge_log::init_logging;
/// use mapforge_config::Config;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directive(config);

    // RUST_LOG wins over the config file.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config_env_filter(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("mapforge.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::debug!("File logging enabled in {}", log_dir.display());
        return;
    }

    subscriber.init();
}

/// The filter directive used when `RUST_LOG` is not set.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Parse a configured directive, falling back to the default on a typo.
fn config_env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|e| {
        eprintln!("Invalid log level {directive:?} ({e}), using {DEFAULT_FILTER:?}");
        default_env_filter()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{}", filter).contains("info"));
    }

    #[test]
    fn test_filter_directive_follows_config() {
        let mut config = Config::default();
        config.debug.log_level = "debug,mapforge_terrain=trace".to_string();
        assert_eq!(
            filter_directive(Some(&config)),
            "debug,mapforge_terrain=trace"
        );
    }

    #[test]
    fn test_filter_directive_falls_back_when_empty() {
        let mut config = Config::default();
        config.debug.log_level.clear();
        assert_eq!(filter_directive(Some(&config)), "info");
        assert_eq!(filter_directive(None), "info");
    }

    #[test]
    fn test_invalid_config_directive_falls_back_to_default() {
        let filter = config_env_filter("mapforge_terrain=loudest");
        assert_eq!(filter.to_string(), default_env_filter().to_string());

        let filter = config_env_filter("warn,mapforge_config=debug");
        assert!(filter.to_string().contains("mapforge_config=debug"));
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,mapforge_terrain=trace",
            "warn,mapforge_config=debug",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }
}
