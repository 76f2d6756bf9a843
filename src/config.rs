//! Configuration Module
//!
//! Handles loading and managing client configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_CACHE_TTL_SECS;

/// Caching layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend products API
    pub api_base_url: String,
    /// Cache entry time-to-live in seconds
    pub cache_ttl: u64,
    /// Per-request timeout in seconds for backend calls
    pub request_timeout: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend API base URL (default: http://localhost:4000/api)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `REQUEST_TIMEOUT` - HTTP request timeout in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/api".to_string()),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            request_timeout: env::var("REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/api".to_string(),
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            request_timeout: 10,
            cleanup_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.request_timeout, 10);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("API_BASE_URL");
        env::remove_var("CACHE_TTL");
        env::remove_var("REQUEST_TIMEOUT");
        env::remove_var("CLEANUP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.api_base_url, "http://localhost:4000/api");
        assert_eq!(config.cache_ttl, 300);
        assert_eq!(config.request_timeout, 10);
        assert_eq!(config.cleanup_interval, 60);
    }
}
