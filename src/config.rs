//! Runtime configuration resolved from the environment

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_API_BASE, DEFAULT_SERVER_ORIGIN, DEFAULT_TIMEOUT_SECS, ENV_API_URL,
    ENV_SERVER_ORIGIN, ENV_TIMEOUT_SECS,
};

/// Settings needed to talk to the backend and persist preferences
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Absolute base URL of the devices API, without trailing slash
    pub api_base: String,
    pub timeout: Duration,
    pub config_dir: PathBuf,
}

impl AppConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = lookup(ENV_API_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let origin = lookup(ENV_SERVER_ORIGIN)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ORIGIN.to_string());

        let timeout_secs = lookup(ENV_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);

        AppConfig {
            api_base: resolve_api_base(&base, &origin),
            timeout: Duration::from_secs(timeout_secs),
            config_dir,
        }
    }
}

/// Join a possibly relative API base onto an origin
pub fn resolve_api_base(base: &str, origin: &str) -> String {
    let resolved = if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            base.trim_start_matches('/')
        )
    };
    resolved.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_resolve_against_origin() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.api_base, "http://localhost:3000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_absolute_override_is_kept() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "https://inventory.example.com/v1/"),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_base, "https://inventory.example.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_relative_override_uses_custom_origin() {
        assert_eq!(
            resolve_api_base("/backend", "http://10.0.0.2:8000/"),
            "http://10.0.0.2:8000/backend"
        );
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = AppConfig::from_lookup(|k| (k == ENV_TIMEOUT_SECS).then(|| "0".to_string()));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
