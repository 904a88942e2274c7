//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `MERIDIAN_API_URL` - Base URL of the backend REST API
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `MERIDIAN_API_SERVICE_TOKEN` - Service credential sent with catalog calls
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Backend REST API configuration
    pub api: ApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
///
/// Implements `Debug` manually to redact the service token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL of the backend API, without a trailing slash
    pub base_url: String,
    /// Optional service credential for catalog calls
    pub service_token: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field(
                "service_token",
                &self.service_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, malformed, or
    /// if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = parsed_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parsed_env("STOREFRONT_PORT", "3000")?;
        let base_url = env_required("STOREFRONT_BASE_URL")?;
        let session_secret = secret::load("STOREFRONT_SESSION_SECRET")?;

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            api: ApiConfig::from_env()?,
            sentry_dsn: env_optional("SENTRY_DSN"),
            sentry_environment: env_optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_required("MERIDIAN_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            service_token: env_optional("MERIDIAN_API_SERVICE_TOKEN").map(SecretString::from),
        })
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

fn env_required(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parsed_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Session-secret validation: length, placeholder detection, entropy.
///
/// Secrets come from deployment tooling; the checks exist to catch a
/// copy-pasted example value or a lazily mashed keyboard before it ships.
mod secret {
    use super::{ConfigError, env_required};
    use secrecy::SecretString;
    use std::collections::HashMap;

    const MIN_LENGTH: usize = 32;
    const MIN_BITS_PER_CHAR: f64 = 3.3;

    /// Substrings that mark a value as a placeholder (checked lowercase).
    const PLACEHOLDERS: &[&str] = &[
        "changeme", "example", "fixme", "insert", "password", "placeholder", "replace", "secret",
        "todo", "your-", "xxx",
    ];

    pub fn load(key: &str) -> Result<SecretString, ConfigError> {
        let value = env_required(key)?;
        validate(key, value)
    }

    /// Validate a candidate secret value.
    pub(super) fn validate(key: &str, value: String) -> Result<SecretString, ConfigError> {
        if value.len() < MIN_LENGTH {
            return Err(ConfigError::InsecureSecret(
                key.to_string(),
                format!("must be at least {MIN_LENGTH} characters (got {})", value.len()),
            ));
        }

        let lowered = value.to_lowercase();
        if let Some(hit) = PLACEHOLDERS.iter().find(|p| lowered.contains(**p)) {
            return Err(ConfigError::InsecureSecret(
                key.to_string(),
                format!("appears to be a placeholder (contains '{hit}')"),
            ));
        }

        let entropy = bits_per_char(&value);
        if entropy < MIN_BITS_PER_CHAR {
            return Err(ConfigError::InsecureSecret(
                key.to_string(),
                format!(
                    "entropy too low ({entropy:.2} bits/char, need >= {MIN_BITS_PER_CHAR:.1}); generate one randomly"
                ),
            ));
        }

        Ok(SecretString::from(value))
    }

    /// Shannon entropy in bits per character.
    pub(super) fn bits_per_char(s: &str) -> f64 {
        if s.is_empty() {
            return 0.0;
        }

        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in s.chars() {
            *counts.entry(c).or_default() += 1;
        }

        #[allow(clippy::cast_precision_loss)] // secrets are far below f64 precision limits
        let total = s.chars().count() as f64;
        counts
            .values()
            .map(|&n| {
                #[allow(clippy::cast_precision_loss)]
                let p = n as f64 / total;
                -p * p.log2()
            })
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn with_secret(value: &str) -> Result<SecretString, ConfigError> {
        secret::validate("TEST_SECRET", value.to_string())
    }

    #[test]
    fn test_entropy_of_repeated_char_is_zero() {
        assert!((secret::bits_per_char("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((secret::bits_per_char("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_entropy_of_random_string_is_high() {
        assert!(secret::bits_per_char("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_secret_rejects_placeholder() {
        let result = with_secret("your-session-key-goes-right-here-now");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_secret_rejects_short_values() {
        let result = with_secret("short");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_secret_rejects_low_entropy() {
        let result = with_secret("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_secret_accepts_random_value() {
        assert!(with_secret("kJ9#mP2$vL5@nQ8&rT1*uW4^xZ7!bC3%").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            api: ApiConfig {
                base_url: "http://localhost:4000".to_string(),
                service_token: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_api_config_debug_redacts_token() {
        let config = ApiConfig {
            base_url: "http://localhost:4000".to_string(),
            service_token: Some(SecretString::from("svc_9f2k4j1x8q")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:4000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("svc_9f2k4j1x8q"));
    }
}
