//! Configuration module for the mentorship client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::models::Role;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the alumni REST API, without a trailing slash
    pub api_base_url: String,
    /// File holding the persisted bearer token
    pub token_path: Option<PathBuf>,
    /// How long a cached token is trusted before it is re-read
    pub token_ttl: Duration,
    /// Per-request timeout for regular API calls
    pub request_timeout: Duration,
    /// Abort deadline for file uploads
    pub upload_timeout: Duration,
    /// Delay after which a confirmation modal is closed
    pub modal_close_delay: Duration,
    /// Role the binary acts as
    pub role: Role,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api".to_string(),
            token_path: None,
            token_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(60),
            modal_close_delay: Duration::from_millis(300),
            role: Role::Student,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_base_url = env::var("ALUMNI_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let token_path = env::var("ALUMNI_TOKEN_PATH").ok().map(PathBuf::from);

        let token_ttl = parse_var("ALUMNI_TOKEN_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.token_ttl);

        let request_timeout = parse_var("ALUMNI_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let upload_timeout = parse_var("ALUMNI_UPLOAD_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.upload_timeout);

        let modal_close_delay = parse_var("ALUMNI_MODAL_CLOSE_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.modal_close_delay);

        let role = parse_var("ALUMNI_ROLE").unwrap_or(defaults.role);

        let log_level = env::var("ALUMNI_LOG_LEVEL").unwrap_or(defaults.log_level);

        Self {
            api_base_url,
            token_path,
            token_ttl,
            request_timeout,
            upload_timeout,
            modal_close_delay,
            role,
            log_level,
        }
    }
}

/// Read and parse an environment variable, ignoring unparsable values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "ALUMNI_API_BASE_URL",
        "ALUMNI_TOKEN_PATH",
        "ALUMNI_TOKEN_TTL_SECS",
        "ALUMNI_REQUEST_TIMEOUT_SECS",
        "ALUMNI_UPLOAD_TIMEOUT_SECS",
        "ALUMNI_MODAL_CLOSE_DELAY_MS",
        "ALUMNI_ROLE",
        "ALUMNI_LOG_LEVEL",
    ];

    // Both cases live in one test so they never race on the process environment.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env();

        assert_eq!(config.api_base_url, "http://127.0.0.1:5000/api");
        assert!(config.token_path.is_none());
        assert_eq!(config.token_ttl, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.upload_timeout, Duration::from_secs(60));
        assert_eq!(config.modal_close_delay, Duration::from_millis(300));
        assert_eq!(config.role, Role::Student);
        assert_eq!(config.log_level, "info");

        env::set_var("ALUMNI_API_BASE_URL", "https://alumni.example.edu/api/");
        env::set_var("ALUMNI_UPLOAD_TIMEOUT_SECS", "not-a-number");
        env::set_var("ALUMNI_ROLE", "alumni");

        let config = Config::from_env();

        assert_eq!(config.api_base_url, "https://alumni.example.edu/api");
        assert_eq!(config.upload_timeout, Duration::from_secs(60));
        assert_eq!(config.role, Role::Alumni);

        for var in VARS {
            env::remove_var(var);
        }
    }
}
