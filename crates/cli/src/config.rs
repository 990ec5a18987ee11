//! Server configuration.
//!
//! Read from an optional TOML file, then overridden key by key from the
//! environment. Every key has a default, so an empty environment and no
//! file gives a usable local configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder printed instead of secrets.
pub const REDACTED: &str = "<redacted>";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub filing: FilingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Inbound API key. `None` disables authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub log_format: LogFormat,
    /// Requests per minute per client IP.
    pub rate_limit: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: 8080,
            api_key: None,
            log_format: LogFormat::Text,
            rate_limit: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub transactions_api_url: String,
    pub company_profile_api_url: String,
    pub document_generator_api_url: String,
    pub document_validator_api_url: String,
    /// Key presented to the internal services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        ServicesConfig {
            transactions_api_url: "http://localhost:4001".to_string(),
            company_profile_api_url: "http://localhost:4001".to_string(),
            document_generator_api_url: "http://localhost:4002".to_string(),
            document_validator_api_url: "http://localhost:4003".to_string(),
            internal_api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ServicesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilingConfig {
    /// Download and externally validate generated documents before filing.
    pub ixbrl_validation_enabled: bool,
}

impl Default for FilingConfig {
    fn default() -> Self {
        FilingConfig {
            ixbrl_validation_enabled: true,
        }
    }
}

impl AppConfig {
    /// Load the file (if any), then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides. `lookup` returns the value of a variable;
    /// empty values are treated as unset.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("ACCOUNTS_PORT") {
            self.server.port = parse("ACCOUNTS_PORT", v)?;
        }
        if let Some(v) = get("ACCOUNTS_API_KEY") {
            self.server.api_key = Some(v);
        }
        if let Some(v) = get("ACCOUNTS_LOG_FORMAT") {
            self.server.log_format = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ACCOUNTS_LOG_FORMAT",
                value: v,
            })?;
        }
        if let Some(v) = get("ACCOUNTS_RATE_LIMIT") {
            self.server.rate_limit = parse("ACCOUNTS_RATE_LIMIT", v)?;
        }

        let services = &mut self.services;
        for (key, field) in [
            ("TRANSACTIONS_API_URL", &mut services.transactions_api_url),
            ("COMPANY_PROFILE_API_URL", &mut services.company_profile_api_url),
            ("DOCUMENT_GENERATOR_API_URL", &mut services.document_generator_api_url),
            ("IXBRL_VALIDATOR_URL", &mut services.document_validator_api_url),
        ] {
            if let Some(v) = get(key) {
                *field = v;
            }
        }
        if let Some(v) = get("INTERNAL_API_KEY") {
            services.internal_api_key = Some(v);
        }
        if let Some(v) = get("OUTBOUND_TIMEOUT_SECS") {
            services.timeout_secs = parse("OUTBOUND_TIMEOUT_SECS", v)?;
        }

        if let Some(v) = get("DISABLE_IXBRL_VALIDATION") {
            self.filing.ixbrl_validation_enabled = !is_truthy(&v);
        }
        Ok(())
    }

    /// A copy safe to print: secrets replaced by [`REDACTED`].
    pub fn redacted(&self) -> AppConfig {
        let mut copy = self.clone();
        if copy.server.api_key.is_some() {
            copy.server.api_key = Some(REDACTED.to_string());
        }
        if copy.services.internal_api_key.is_some() {
            copy.services.internal_api_key = Some(REDACTED.to_string());
        }
        copy
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
