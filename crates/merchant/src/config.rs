//! Merchant dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ITIZA_SNAPSHOT_PATH` - Store snapshot file (default: `itiza-store.json`)
//! - `ITIZA_LIST_FILTER` - Default catalog listing, `all` or `active` (default: `all`)
//! - `ITIZA_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate, 0.0 to 1.0 (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;

use itiza_core::ActivityFilter;

const DEFAULT_SNAPSHOT_PATH: &str = "itiza-store.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected pretty or json, got {s}")),
        }
    }
}

/// Merchant dashboard configuration.
#[derive(Debug, Clone)]
pub struct MerchantConfig {
    /// Where the store snapshot lives between CLI runs
    pub snapshot_path: PathBuf,
    /// Default activity filter for catalog listings
    pub list_filter: ActivityFilter,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl MerchantConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_path = PathBuf::from(get_or_default(
            &lookup,
            "ITIZA_SNAPSHOT_PATH",
            DEFAULT_SNAPSHOT_PATH,
        ));
        let list_filter = get_or_default(&lookup, "ITIZA_LIST_FILTER", "all")
            .parse::<ActivityFilter>()
            .map_err(|e| ConfigError::InvalidEnvVar("ITIZA_LIST_FILTER".to_string(), e))?;
        let log_format = get_or_default(&lookup, "ITIZA_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("ITIZA_LOG_FORMAT".to_string(), e))?;

        let sentry_dsn = lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_sample_rate(&lookup, "SENTRY_SAMPLE_RATE")?;
        let sentry_traces_sample_rate = get_sample_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE")?;

        Ok(Self {
            snapshot_path,
            list_filter,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            list_filter: ActivityFilter::All,
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a Sentry sample rate, defaulting to 1.0.
fn get_sample_rate<F>(lookup: &F, key: &str) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(1.0);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<MerchantConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        MerchantConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("itiza-store.json"));
        assert_eq!(config.list_filter, ActivityFilter::All);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ITIZA_SNAPSHOT_PATH", "/tmp/shop.json"),
            ("ITIZA_LIST_FILTER", "active"),
            ("ITIZA_LOG_FORMAT", "json"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
            ("SENTRY_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/shop.json"));
        assert_eq!(config.list_filter, ActivityFilter::ActiveOnly);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.sentry_dsn.is_some());
        assert!((config.sentry_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_dsn_disables_sentry() {
        let config = load(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_filter() {
        let err = load(&[("ITIZA_LIST_FILTER", "deleted")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ITIZA_LIST_FILTER"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        assert!(load(&[("SENTRY_TRACES_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "lots")]).is_err());
    }
}
