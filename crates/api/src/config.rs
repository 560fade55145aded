//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLAZA_TOKEN_SECRET` - Session token signing secret (min 32 chars)
//!
//! ## Optional
//! - `PLAZA_HOST` - Bind address (default: 127.0.0.1)
//! - `PLAZA_PORT` - Listen port (default: 3000)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;

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

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Session token signing secret.
    pub token_secret: SecretString,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing, a value
    /// fails to parse, or the token secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = match std::env::var("PLAZA_HOST") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("PLAZA_HOST".into(), raw))?,
            Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let port = match std::env::var("PLAZA_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("PLAZA_PORT".into(), raw))?,
            Err(_) => 3000,
        };

        let token_secret = std::env::var("PLAZA_TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("PLAZA_TOKEN_SECRET".into()))?;
        let token_secret = validate_secret("PLAZA_TOKEN_SECRET", token_secret)?;

        Ok(Self {
            host,
            port,
            token_secret,
        })
    }

    /// The socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Check a signing secret for minimum length before wrapping it.
fn validate_secret(name: &str, value: String) -> Result<SecretString, ConfigError> {
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.into(),
            format!("must be at least {MIN_TOKEN_SECRET_LENGTH} characters"),
        ));
    }
    Ok(SecretString::from(value))
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let err = validate_secret("PLAZA_TOKEN_SECRET", "too-short".into());
        assert!(matches!(err, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn long_secret_is_accepted() {
        let secret = validate_secret("PLAZA_TOKEN_SECRET", "x".repeat(48));
        assert!(secret.is_ok());
        assert_eq!(secret.expect("validated").expose_secret().len(), 48);
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let config = ApiConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8081,
            token_secret: SecretString::from("x".repeat(32)),
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8081");
    }
}
