//! Provider configuration
//!
//! Configuration is passed explicitly to the provider at construction. It can
//! be assembled in code, read from `MOLLIE_*` environment variables (optionally
//! seeded from a `.env` file) or loaded from the `[mollie]` table of a TOML file.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use thiserror::Error;
use url::Url;

/// Default Mollie API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.mollie.com/v2/";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MOLLIE";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Mollie provider configuration
#[derive(Clone)]
pub struct MollieConfig {
    api_key: SecretString,
    api_base_url: Url,
    user_agent: String,
    payment_host: String,
    payment_uses_ssl: bool,
}

impl MollieConfig {
    /// Create a configuration with an API key (`live_...` or `test_...`)
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base_url: parse_url(DEFAULT_API_BASE_URL)?,
            user_agent: default_user_agent(),
            payment_host: "localhost:8000".to_string(),
            payment_uses_ssl: false,
        })
    }

    /// Override the API endpoint
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };
        self.api_base_url = parse_url(&normalized)?;
        Ok(self)
    }

    /// Host used to build the callback URL
    pub fn with_payment_host(mut self, host: impl Into<String>) -> Self {
        self.payment_host = host.into();
        self
    }

    /// Build callback URLs with `https`
    pub fn with_ssl(mut self, uses_ssl: bool) -> Self {
        self.payment_uses_ssl = uses_ssl;
        self
    }

    /// Append a component to the User-Agent header
    pub fn with_user_agent_component(mut self, name: &str, version: &str) -> Self {
        let component = format!("{}/{}", name.replace(' ', ""), version.replace(' ', ""));
        self.user_agent = format!("{} {}", self.user_agent, component);
        self
    }

    /// Read `MOLLIE_API_KEY` and the optional `MOLLIE_*` overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_var("API_KEY")
            .ok_or_else(|| ConfigError::KeyNotFound(format!("{}_API_KEY", ENV_PREFIX)))?;

        let mut config = Self::new(api_key)?;
        if let Some(url) = env_var("API_BASE_URL") {
            config = config.with_api_base_url(&url)?;
        }
        if let Some(host) = env_var("PAYMENT_HOST") {
            config = config.with_payment_host(host);
        }
        if let Some(ssl) = env_var("PAYMENT_USES_SSL") {
            config = config.with_ssl(parse_bool(&ssl)?);
        }
        Ok(config)
    }

    /// Load a `.env` file, then read the environment
    pub fn from_dotenv(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                // A missing default .env file is fine
                dotenvy::dotenv().ok();
            }
        }
        Self::from_env()
    }

    /// Parse the `[mollie]` table of a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: TomlFile =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let section = file
            .mollie
            .ok_or_else(|| ConfigError::KeyNotFound("mollie".to_string()))?;

        let mut config = Self::new(section.api_key)?;
        if let Some(url) = section.api_base_url {
            config = config.with_api_base_url(&url)?;
        }
        if let Some(host) = section.payment_host {
            config = config.with_payment_host(host);
        }
        if let Some(ssl) = section.payment_uses_ssl {
            config = config.with_ssl(ssl);
        }
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("Failed to read file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// API key
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Test mode keys start with `test_`
    pub fn is_test_mode(&self) -> bool {
        self.api_key().starts_with("test_")
    }

    /// API base URL, always ending in `/`
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    /// User-Agent header value
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Host used in callback URLs
    pub fn payment_host(&self) -> &str {
        &self.payment_host
    }

    /// Scheme used in callback URLs
    pub fn scheme(&self) -> &'static str {
        if self.payment_uses_ssl { "https" } else { "http" }
    }
}

impl fmt::Debug for MollieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MollieConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("payment_host", &self.payment_host)
            .field("payment_uses_ssl", &self.payment_uses_ssl)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TomlFile {
    mollie: Option<TomlSection>,
}

#[derive(Debug, Deserialize)]
struct TomlSection {
    api_key: String,
    api_base_url: Option<String>,
    payment_host: Option<String>,
    payment_uses_ssl: Option<bool>,
}

fn default_user_agent() -> String {
    format!("PaymentsMollie/{}", env!("CARGO_PKG_VERSION"))
}

fn env_var(key: &str) -> Option<String> {
    env::var(format!("{}_{}", ENV_PREFIX, key))
        .ok()
        .filter(|value| !value.is_empty())
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::ParseError(format!(
            "expected a boolean, got '{}'",
            other
        ))),
    }
}

/// Mollie keys look like `live_xxx` or `test_xxx` with word characters
fn validate_api_key(api_key: &str) -> Result<(), ConfigError> {
    let rest = api_key
        .strip_prefix("live_")
        .or_else(|| api_key.strip_prefix("test_"))
        .ok_or_else(|| ConfigError::InvalidApiKey("must start with 'live_' or 'test_'".into()))?;

    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::InvalidApiKey(
            "contains invalid characters".into(),
        ));
    }
    Ok(())
}
