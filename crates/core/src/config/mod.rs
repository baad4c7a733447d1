use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, VenueLinkError};
use crate::types::VenueCredentials;

pub const DEFAULT_FTX_BASE_URL: &str = "https://ftx.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueLinkConfig {
    pub ftx: FtxConfig,
    pub logging: LoggingConfig,
    pub account: AccountConfig,
    /// Venue asset code → canonical currency code, layered over the built-in
    /// alias table.
    pub currency_aliases: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FtxConfig {
    pub api_key: String,
    pub api_secret: String,
    pub subaccount: Option<String>,
    pub base_url: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub reconcile_policy: ReconcilePolicy,
}

/// How an account resolves two records for the same currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Whichever record is applied last wins, regardless of its age. A stale
    /// initial snapshot can overwrite a fresher streamed update.
    #[default]
    LastWriterWins,
    /// Keep the record with the newer `updated_at`; an older record for a
    /// currency already held is discarded.
    NewerTimestamp,
}

impl Default for FtxConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            subaccount: None,
            base_url: DEFAULT_FTX_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl FtxConfig {
    pub fn credentials(&self) -> VenueCredentials {
        VenueCredentials {
            api_key: self.api_key.clone(),
            secret_key: self.api_secret.clone(),
            subaccount: self.subaccount.clone().filter(|s| !s.is_empty()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() || self.api_secret.trim().is_empty() {
            return Err(VenueLinkError::Authentication(
                "ftx api_key and api_secret must be set".to_string(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(VenueLinkError::InvalidData(
                "ftx request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(VenueLinkError::InvalidData(format!(
                "ftx base_url is not an http(s) url: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl VenueLinkConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        Self::from_files(&[path])
    }

    /// Layer the given files (missing ones are skipped) under `VENUELINK`-prefixed
    /// environment overrides (`VENUELINK__FTX__API_KEY`, ...).
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for path in paths {
            builder = builder.add_source(File::from(path.as_ref()).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("VENUELINK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }
}
