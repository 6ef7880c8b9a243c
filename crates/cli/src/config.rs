//! Application configuration loaded from environment variables.

use std::fmt;
use std::str::FromStr;

use domain::{DEFAULT_LICENSE_EXPIRATION_DAYS, LicensePolicy};
use licensing::{DEFAULT_TOPIC, PublisherConfig};

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => f.write_str("plain"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Service configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `plain` or `json` (default: `plain`)
/// - `BROKER_DEFAULT_TOPIC`: topic of outbound messages (default: `"licensing"`)
/// - `LICENSE_EXPIRATION_DAYS`: lifetime of new licenses (default: `30`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub topic: String,
    pub license_expiration_days: i64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`; unset or unparsable values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .and_then(|format| format.parse().ok())
                .unwrap_or(defaults.log_format),
            topic: lookup("BROKER_DEFAULT_TOPIC")
                .filter(|topic| !topic.is_empty())
                .unwrap_or(defaults.topic),
            license_expiration_days: lookup("LICENSE_EXPIRATION_DAYS")
                .and_then(|days| days.parse().ok())
                .filter(|days| *days > 0)
                .unwrap_or(defaults.license_expiration_days),
        }
    }

    /// Policy applied to newly issued licenses.
    pub fn license_policy(&self) -> LicensePolicy {
        LicensePolicy::with_expiration_days(self.license_expiration_days)
    }

    pub fn publisher_config(&self) -> PublisherConfig {
        PublisherConfig {
            topic: self.topic.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Plain,
            topic: DEFAULT_TOPIC.to_string(),
            license_expiration_days: DEFAULT_LICENSE_EXPIRATION_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Plain);
        assert_eq!(config.topic, "licensing");
        assert_eq!(config.license_expiration_days, 30);
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("BROKER_DEFAULT_TOPIC", "licenses"),
            ("LICENSE_EXPIRATION_DAYS", "7"),
        ]));

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.publisher_config().topic, "licenses");
        assert_eq!(config.license_policy(), LicensePolicy::with_expiration_days(7));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("LOG_FORMAT", "yaml"),
            ("BROKER_DEFAULT_TOPIC", ""),
            ("LICENSE_EXPIRATION_DAYS", "-3"),
        ]));
        assert_eq!(config, Config::default());
    }
}
