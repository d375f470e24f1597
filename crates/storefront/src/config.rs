//! Shop configuration.
//!
//! Read from environment variables (and a `.env` file, if present).

use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

use customshop_core::Email;

use crate::db::CatalogSeed;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "./.customshop";

/// Default administrator email.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@customshop.local";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini API endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Directory holding the persisted store
    pub data_dir: PathBuf,
    /// Email whose session is the administrator
    pub admin_email: String,
    /// What an empty catalog starts with
    pub catalog_seed: CatalogSeed,
    /// Gemini configuration (optional; without it the assistant answers with
    /// fixed fallback text)
    pub gemini: Option<GeminiConfig>,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Google AI API key
    pub api_key: SecretString,
    /// Model ID (e.g., gemini-2.0-flash)
    pub model: String,
    /// API base URL, without trailing slash
    pub base_url: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin_email: DEFAULT_ADMIN_EMAIL.to_owned(),
            catalog_seed: CatalogSeed::default(),
            gemini: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let admin_email = env.get_or_default("CUSTOMSHOP_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
        Email::parse_normalized(&admin_email).map_err(|e| {
            ConfigError::InvalidEnvVar("CUSTOMSHOP_ADMIN_EMAIL".to_string(), e.to_string())
        })?;

        let catalog_seed = env
            .get_or_default("CUSTOMSHOP_CATALOG_SEED", "example")
            .parse::<CatalogSeed>()
            .map_err(|e| ConfigError::InvalidEnvVar("CUSTOMSHOP_CATALOG_SEED".to_string(), e))?;

        let log_json = env
            .get_optional("CUSTOMSHOP_LOG_JSON")
            .is_some_and(|v| !matches!(v.trim().to_lowercase().as_str(), "" | "0" | "false"));

        Ok(Self {
            data_dir: PathBuf::from(env.get_or_default("CUSTOMSHOP_DATA_DIR", DEFAULT_DATA_DIR)),
            admin_email: admin_email.trim().to_owned(),
            catalog_seed,
            gemini: GeminiConfig::from_env(&env),
            log_json,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }
}

impl GeminiConfig {
    /// `None` when neither `GEMINI_API_KEY` nor `API_KEY` is set.
    fn from_env(env: &Env<'_>) -> Option<Self> {
        let api_key = env
            .get_optional("GEMINI_API_KEY")
            .or_else(|| env.get_optional("API_KEY"))?;

        Some(Self {
            api_key: SecretString::from(api_key),
            model: env.get_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: env
                .get_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Blank values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ShopConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ShopConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(config.catalog_seed, CatalogSeed::Example);
        assert!(config.gemini.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn test_gemini_key_fallback() {
        let config = load(&[("API_KEY", "k-123")]).unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key.expose_secret(), "k-123");
        assert_eq!(gemini.model, DEFAULT_GEMINI_MODEL);

        let config = load(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "secondary")]).unwrap();
        assert_eq!(config.gemini.unwrap().api_key.expose_secret(), "primary");
    }

    #[test]
    fn test_blank_key_disables_gemini() {
        assert!(load(&[("GEMINI_API_KEY", "  ")]).unwrap().gemini.is_none());
    }

    #[test]
    fn test_gemini_debug_redacts_key() {
        let config = load(&[("GEMINI_API_KEY", "super-secret")]).unwrap();
        let debug = format!("{:?}", config.gemini.unwrap());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = load(&[("GEMINI_API_KEY", "k"), ("GEMINI_BASE_URL", "http://localhost:9/")]).unwrap();
        assert_eq!(config.gemini.unwrap().base_url, "http://localhost:9");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("CUSTOMSHOP_CATALOG_SEED", "lots")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "CUSTOMSHOP_CATALOG_SEED"
        ));
        assert!(matches!(
            load(&[("CUSTOMSHOP_ADMIN_EMAIL", "not-an-email")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "CUSTOMSHOP_ADMIN_EMAIL"
        ));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CUSTOMSHOP_DATA_DIR", "/tmp/shop"),
            ("CUSTOMSHOP_ADMIN_EMAIL", " Boss@Shop.com "),
            ("CUSTOMSHOP_CATALOG_SEED", "empty"),
            ("CUSTOMSHOP_LOG_JSON", "1"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shop"));
        assert_eq!(config.admin_email, "Boss@Shop.com");
        assert_eq!(config.catalog_seed, CatalogSeed::Empty);
        assert!(config.log_json);
        assert!(config.sentry_dsn.is_some());
    }
}
