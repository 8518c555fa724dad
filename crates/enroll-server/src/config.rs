//! Server configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `enroll-server.toml` (or the file named by `ENROLL_CONFIG`), `ENROLL_*`
//! environment variables. `JPDB_TOKEN` overrides the vendor token last.

use anyhow::{Context, Result};
use enroll_core::storage::vendor::{
    DEFAULT_BASE_URL, DEFAULT_DB_NAME, DEFAULT_RELATION, DEFAULT_TOKEN,
};
use enroll_core::VendorConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub vendor_url: String,
    pub vendor_token: String,
    pub db_name: String,
    pub relation: String,
    /// Directory holding a built form front-end, served as the SPA fallback
    pub static_dir: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            vendor_url: DEFAULT_BASE_URL.to_string(),
            vendor_token: DEFAULT_TOKEN.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            relation: DEFAULT_RELATION.to_string(),
            static_dir: None,
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        let file = std::env::var("ENROLL_CONFIG").unwrap_or_else(|_| "enroll-server".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::with_prefix("ENROLL"))
            .build()
            .context("Failed to read configuration sources")?;

        let mut config = Self::from_settings(settings)?;
        if let Ok(token) = std::env::var("JPDB_TOKEN") {
            config.vendor_token = token;
        }
        Ok(config)
    }

    pub fn from_settings(settings: config::Config) -> Result<Self> {
        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn uses_default_token(&self) -> bool {
        self.vendor_token == DEFAULT_TOKEN
    }

    pub fn vendor(&self) -> VendorConfig {
        VendorConfig {
            base_url: self.vendor_url.clone(),
            token: self.vendor_token.clone(),
            db_name: self.db_name.clone(),
            relation: self.relation.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}
