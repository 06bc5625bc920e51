//! Configuration module
//!
//! Environment-driven settings for the command-line client and the mock API
//! server. A `.env` file in the working directory is honoured.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// Common constants
const DEFAULT_API_URL: &str = "http://localhost:8080";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const UPLOAD_QUEUE_SIZE: usize = 64;
const CACHE_CAPACITY: usize = 128;
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";
const MOCK_SERVER_PORT: u16 = 8080;

/// Client configuration (CLI, upload queue, API client)
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub session_path: PathBuf,
    pub username: String,
    pub password: String,
    pub upload_queue_size: usize,
    pub cache_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            session_path: default_session_path(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            upload_queue_size: UPLOAD_QUEUE_SIZE,
            cache_capacity: CACHE_CAPACITY,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("INVOICER_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "INVOICER_API_URL must start with http:// or https:// (got '{}')",
                api_url
            ));
        }

        let request_timeout_secs = parse_number(
            "INVOICER_REQUEST_TIMEOUT_SECS",
            env::var("INVOICER_REQUEST_TIMEOUT_SECS").ok(),
            REQUEST_TIMEOUT_SECS,
        )?;

        let upload_queue_size = parse_positive(
            "INVOICER_UPLOAD_QUEUE_SIZE",
            env::var("INVOICER_UPLOAD_QUEUE_SIZE").ok(),
            UPLOAD_QUEUE_SIZE,
        )?;

        let cache_capacity = parse_positive(
            "INVOICER_CACHE_CAPACITY",
            env::var("INVOICER_CACHE_CAPACITY").ok(),
            CACHE_CAPACITY,
        )?;

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            session_path: env::var("INVOICER_SESSION_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_session_path()),
            username: env::var("INVOICER_USERNAME")
                .unwrap_or_else(|_| DEFAULT_USERNAME.to_string()),
            password: env::var("INVOICER_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_PASSWORD.to_string()),
            upload_queue_size,
            cache_capacity,
        })
    }
}

/// Parse a numeric setting, using `default` when it is unset.
fn parse_number<T: FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number (got '{}')", name, value)),
        None => Ok(default),
    }
}

/// Like `parse_number`, but zero is rejected.
fn parse_positive(
    name: &str,
    raw: Option<String>,
    default: usize,
) -> Result<usize, anyhow::Error> {
    let value = parse_number(name, raw, default)?;
    if value == 0 {
        return Err(anyhow::anyhow!("{} must be greater than zero", name));
    }
    Ok(value)
}

/// `$HOME/.config/invoicer/session.json`, or a relative fallback when no home
/// directory is known.
fn default_session_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("invoicer")
        .join("session.json")
}

/// Mock API server configuration
#[derive(Clone, Debug)]
pub struct MockServerConfig {
    pub server_port: u16,
    pub environment: String,
}

impl MockServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| MOCK_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "admin");
        assert!(config.session_path.ends_with("invoicer/session.json"));
    }

    #[test]
    fn test_numeric_settings_reject_invalid_values() {
        assert_eq!(parse_number("TIMEOUT", None, 60u64).unwrap(), 60);
        assert_eq!(parse_number("TIMEOUT", Some(" 15 ".to_string()), 60u64).unwrap(), 15);
        assert!(parse_number("TIMEOUT", Some("soon".to_string()), 60u64).is_err());

        assert_eq!(parse_positive("QUEUE", None, 64).unwrap(), 64);
        assert_eq!(parse_positive("QUEUE", Some("8".to_string()), 64).unwrap(), 8);

        let err = parse_positive("QUEUE", Some("lots".to_string()), 64).unwrap_err();
        assert!(err.to_string().contains("QUEUE must be a valid number"));
        let err = parse_positive("CACHE", Some("0".to_string()), 128).unwrap_err();
        assert!(err.to_string().contains("CACHE must be greater than zero"));
        assert!(parse_positive("CACHE", Some("-3".to_string()), 128).is_err());
    }

    #[test]
    fn test_mock_server_is_production() {
        let config = MockServerConfig {
            server_port: 8080,
            environment: "Prod".to_string(),
        };
        assert!(config.is_production());

        let config = MockServerConfig {
            server_port: 8080,
            environment: "development".to_string(),
        };
        assert!(!config.is_production());
    }
}
