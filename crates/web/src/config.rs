//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WFA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `WFA_SESSION_SECRET` - Session cookie signing secret (min 64 chars, high entropy)
//!
//! ## Optional
//! - `WFA_HOST` - Bind address (default: 127.0.0.1)
//! - `WFA_PORT` - Listen port (default: 5000)
//! - `WFA_BASE_URL` - Public URL of the site (default: `http://localhost:5000`)
//! - `WFA_UPLOAD_DIR` - Image area for product photos (default: static/uploads)
//! - `WFA_STATIC_DIR` - Bundled CSS and assets (default: crates/web/static)
//! - `WFA_MAX_UPLOAD_BYTES` - Request body limit for product forms (default: 10 MiB)
//! - `WFA_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `WFA_DEFAULT_PASS` - Password for the provisioned `wfa_admin` (CLI only)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Signed session cookies need a 64-byte key.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Password given to the provisioned admin when `WFA_DEFAULT_PASS` is unset.
pub const FALLBACK_ADMIN_PASSWORD: &str = "WFA#Garage2025";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "change-me",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: Url,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Directory uploaded product images are written to and served from
    pub upload_dir: PathBuf,
    /// Directory of bundled static assets
    pub static_dir: PathBuf,
    /// Maximum accepted request body for product forms, in bytes
    pub max_upload_bytes: usize,
    /// Emit JSON logs instead of human-readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("WFA_DATABASE_URL")?;
        let host = get_env_or_default("WFA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WFA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WFA_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WFA_PORT".to_string(), e.to_string()))?;
        let base_url = Url::parse(&get_env_or_default("WFA_BASE_URL", "http://localhost:5000"))
            .map_err(|e| ConfigError::InvalidEnvVar("WFA_BASE_URL".to_string(), e.to_string()))?;

        let session_secret = get_validated_secret("WFA_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "WFA_SESSION_SECRET")?;

        let max_upload_bytes = match get_optional_env("WFA_MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidEnvVar("WFA_MAX_UPLOAD_BYTES".to_string(), e.to_string())
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            upload_dir: PathBuf::from(get_env_or_default("WFA_UPLOAD_DIR", "static/uploads")),
            static_dir: PathBuf::from(get_env_or_default("WFA_STATIC_DIR", "crates/web/static")),
            max_upload_bytes,
            log_json: get_optional_env("WFA_LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (enables `Secure` cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

/// Settings for the provisioning commands (`wfa-cli init-db`).
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Password for the default admin identity
    pub default_admin_password: SecretString,
    /// `false` when the hardcoded fallback password is in use
    pub password_from_env: bool,
}

impl ProvisioningConfig {
    /// Load provisioning settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no database URL is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("WFA_DATABASE_URL")?;
        let (default_admin_password, password_from_env) = match get_optional_env("WFA_DEFAULT_PASS")
        {
            Some(value) if !value.is_empty() => (SecretString::from(value), true),
            _ => (SecretString::from(FALLBACK_ADMIN_PASSWORD), false),
        };

        Ok(Self {
            database_url,
            default_admin_password,
            password_from_env,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config(base_url: &str) -> WebConfig {
        WebConfig {
            database_url: SecretString::from("postgres://localhost/wfa"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: Url::parse(base_url).unwrap(),
            session_secret: SecretString::from("x".repeat(64)),
            upload_dir: PathBuf::from("static/uploads"),
            static_dir: PathBuf::from("crates/web/static"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("change-me-please", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(64), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_needs_64_chars() {
        let short = SecretString::from("a".repeat(63));
        assert!(validate_session_secret(&short, "TEST_SESSION").is_err());

        let long_enough = SecretString::from("a".repeat(64));
        assert!(validate_session_secret(&long_enough, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config("http://localhost:5000").socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_is_secure_follows_scheme() {
        assert!(!test_config("http://localhost:5000").is_secure());
        assert!(test_config("https://wfa-garage.ro").is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = test_config("http://localhost:5000");
        config.session_secret = SecretString::from("super_secret_session_value".to_string());
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super_secret_session_value"));
    }
}
