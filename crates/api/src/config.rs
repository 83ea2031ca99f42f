//! Process configuration, read once from the environment at startup.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// JSON array of product drafts loaded at startup.
    pub seed_file: Option<PathBuf>,
    /// When set, write routes require `Authorization: Bearer <token>`.
    pub admin_token: Option<String>,
    pub request_timeout: Duration,
    pub database_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            seed_file: None,
            admin_token: None,
            request_timeout: Duration::from_secs(30),
            database_url: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: try_load(&var, "HOST", "0.0.0.0")?,
            port: try_load(&var, "PORT", "5000")?,
            seed_file: var("PLANTIFY_SEED_FILE").map(PathBuf::from),
            admin_token: var("PLANTIFY_ADMIN_TOKEN"),
            request_timeout: Duration::from_secs(try_load(
                &var,
                "PLANTIFY_REQUEST_TIMEOUT_SECS",
                "30",
            )?),
            database_url: var("DATABASE_URL"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
