//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `BAZAR_WHATSAPP_NUMBER` - Business number orders are sent to, digits only (default: 5491100000000)
//! - `BAZAR_STORE_NAME` - Store name in the order message header (default: Bazar)
//! - `BAZAR_CART_DIR` - Directory holding the cart snapshot (default: .)
//! - `BAZAR_THOUSANDS_SEPARATOR` - Price grouping separator (default: ,)
//! - `GEMINI_API_KEY` - Generative Language API key; without it emails are checked locally only
//! - `GEMINI_MODEL` - Model used for email classification (default: gemini-3-flash-preview)
//! - `GEMINI_API_BASE_URL` - API base URL (default: <https://generativelanguage.googleapis.com/v1beta>)
//! - `GEMINI_TIMEOUT_SECS` - Request timeout in seconds (default: none)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use bazar_core::PriceFormat;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_WHATSAPP_NUMBER: &str = "5491100000000";
const DEFAULT_STORE_NAME: &str = "Bazar";
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
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
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct BazarConfig {
    /// Business number the order deep link addresses
    pub whatsapp_number: String,
    /// Store name shown in the order message header
    pub store_name: String,
    /// Directory holding the cart snapshot file
    pub cart_dir: PathBuf,
    /// Price grouping used in messages and listings
    pub price_format: PriceFormat,
    /// Email classifier configuration (absent: local checks only)
    pub gemini: Option<GeminiConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Generative Language API configuration for the email classifier.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: SecretString,
    /// Model name (e.g., gemini-3-flash-preview)
    pub model: String,
    /// API base URL, without a trailing slash
    pub base_url: Url,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Classifier configuration with default model and endpoint.
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: default_gemini_base_url(),
            timeout: None,
        }
    }
}

impl Default for BazarConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            cart_dir: PathBuf::from("."),
            price_format: PriceFormat::default(),
            gemini: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl BazarConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if the API key fails
    /// validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`BazarConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(&lookup);

        let whatsapp_number = env.or_default("BAZAR_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        validate_phone_digits(&whatsapp_number, "BAZAR_WHATSAPP_NUMBER")?;

        let separator = env.or_default("BAZAR_THOUSANDS_SEPARATOR", ",");
        let price_format = PriceFormat::with_separator(&separator).map_err(|e| {
            ConfigError::InvalidEnvVar("BAZAR_THOUSANDS_SEPARATOR".to_string(), e.to_string())
        })?;

        Ok(Self {
            whatsapp_number,
            store_name: env.or_default("BAZAR_STORE_NAME", DEFAULT_STORE_NAME),
            cart_dir: PathBuf::from(env.or_default("BAZAR_CART_DIR", ".")),
            price_format,
            gemini: GeminiConfig::from_lookup(&env)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

impl GeminiConfig {
    fn from_lookup(env: &Lookup<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = env.optional("GEMINI_API_KEY") else {
            return Ok(None);
        };
        validate_secret_strength(&api_key, "GEMINI_API_KEY")?;

        let base_url = env.or_default("GEMINI_API_BASE_URL", DEFAULT_GEMINI_BASE_URL);
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidEnvVar("GEMINI_API_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout = env
            .optional("GEMINI_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("GEMINI_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Some(Self {
            api_key: SecretString::from(api_key),
            model: env.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url,
            timeout,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source; empty values count as unset.
struct Lookup<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Lookup<'_> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[allow(clippy::expect_used)] // constant, covered by tests
fn default_gemini_base_url() -> Url {
    Url::parse(DEFAULT_GEMINI_BASE_URL).expect("default Gemini URL is valid")
}

/// Validate that a phone number is digits only (as deep links require).
fn validate_phone_digits(number: &str, var_name: &str) -> Result<(), ConfigError> {
    if number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must contain digits only (country code included, no +)".to_string(),
        ))
    }
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
    let len = s.chars().count() as f64;
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

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}
