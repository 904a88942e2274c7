//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin panel
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `MERIDIAN_API_URL` - Base URL of the backend REST API
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Shortest acceptable session secret.
const MIN_SECRET_LENGTH: usize = 32;

/// Substrings that mark a session secret as a copy-pasted placeholder.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "changeme", "example", "password", "placeholder", "replace", "secret", "your-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Base URL of the backend API, without a trailing slash
    pub api_base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or malformed,
    /// or if the session secret is short or looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = env_or("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".into(), e.to_string()))?;
        let port = env_or("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".into(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            base_url: require("ADMIN_BASE_URL")?,
            session_secret: session_secret("ADMIN_SESSION_SECRET")?,
            api_base_url: require("MERIDIAN_API_URL")?.trim_end_matches('/').into(),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = SecretString::from(require(key)?);
    check_secret(key, secret.expose_secret())?;
    Ok(secret)
}

fn check_secret(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!("must be at least {MIN_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().find(|m| lowered.contains(**m)) {
        return Err(ConfigError::InsecureSecret(
            key.to_string(),
            format!("looks like a placeholder (contains '{marker}')"),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_check_secret_rejects_placeholders() {
        assert!(check_secret("K", "please-replace-me-before-deploying!!").is_err());
        assert!(check_secret("K", "changeme-changeme-changeme-changeme").is_err());
    }

    #[test]
    fn test_check_secret_rejects_short_values() {
        assert!(check_secret("K", "tiny").is_err());
    }

    #[test]
    fn test_check_secret_accepts_random_value() {
        assert!(check_secret("K", "kJ9#mP2$vL5@nQ8&rT1*uW4^xZ7!bC3%").is_ok());
    }

    #[test]
    fn test_socket_addr_defaults() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            api_base_url: "http://localhost:4000".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.socket_addr().port(), 3001);
    }
}
