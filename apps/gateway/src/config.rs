//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mentora_infra::ai::AiConfig;
use mentora_infra::rate_limit::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub uploads_dir: PathBuf,
    pub ai: AiConfig,
    pub global_rate_limit: RateLimitConfig,
    pub ai_rate_limit: RateLimitConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {0} has an invalid value")]
    Invalid(&'static str),
}

impl AppConfig {
    /// Load configuration from the process environment.
    /// Missing `MONGODB_URI` or `AI_API_KEY` is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an injected lookup, so parsing is
    /// testable without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mongodb_uri = lookup("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let api_key = lookup("AI_API_KEY").ok_or(ConfigError::Missing("AI_API_KEY"))?;

        let mut ai = AiConfig::new(api_key);
        if let Some(base_url) = lookup("AI_BASE_URL") {
            ai.base_url = base_url;
        }
        if let Some(model) = lookup("AI_MODEL") {
            ai.model = model;
        }
        ai.timeout = Duration::from_secs(parse_or("AI_TIMEOUT_SECS", 60, &lookup)?);

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5000, &lookup)?,
            mongodb_uri,
            mongodb_db: lookup("MONGODB_DB").unwrap_or_else(|| "mentora".to_string()),
            uploads_dir: PathBuf::from(
                lookup("UPLOADS_DIR").unwrap_or_else(|| "uploads".to_string()),
            ),
            ai,
            global_rate_limit: RateLimitConfig {
                max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 100, &lookup)?,
                window: Duration::from_secs(parse_or("RATE_LIMIT_WINDOW_SECS", 900, &lookup)?),
            },
            ai_rate_limit: RateLimitConfig {
                max_requests: parse_or("AI_RATE_LIMIT_MAX_REQUESTS", 20, &lookup)?,
                window: Duration::from_secs(parse_or("AI_RATE_LIMIT_WINDOW_SECS", 3600, &lookup)?),
            },
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    default: T,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_mongodb_uri_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("AI_API_KEY", "k")]));
        assert!(matches!(result, Err(ConfigError::Missing("MONGODB_URI"))));
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let result =
            AppConfig::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://localhost")]));
        assert!(matches!(result, Err(ConfigError::Missing("AI_API_KEY"))));
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("AI_API_KEY", "k"),
        ]))
        .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.mongodb_db, "mentora");
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.global_rate_limit.max_requests, 100);
        assert_eq!(config.global_rate_limit.window, Duration::from_secs(900));
        assert_eq!(config.ai_rate_limit.max_requests, 20);
        assert_eq!(config.ai.timeout, Duration::from_secs(60));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("AI_API_KEY", "k"),
            ("PORT", "8088"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("AI_MODEL", "gpt-4o"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.global_rate_limit.max_requests, 5);
        assert_eq!(config.ai.model, "gpt-4o");
    }

    #[test]
    fn unparseable_port_is_an_invalid_error() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("AI_API_KEY", "k"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid("PORT"))));
    }
}
