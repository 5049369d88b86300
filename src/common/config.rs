//! Configuration file handling

use serde::Deserialize;
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "CROP_SMOKE_BASE_URL";

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Server under test
    #[serde(default)]
    pub server: ServerConfig,

    /// Payload values sent by the steps
    #[serde(default)]
    pub fixtures: Fixtures,
}

/// Server settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL every request path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Request payload values
#[derive(Debug, Deserialize, Clone)]
pub struct Fixtures {
    #[serde(default = "default_farmer_name")]
    pub farmer_name: String,

    #[serde(default = "default_buyer_name")]
    pub buyer_name: String,

    /// Amount credited to the buyer's wallet
    #[serde(default = "default_wallet_amount")]
    pub wallet_amount: f64,

    #[serde(default = "default_crop_type")]
    pub crop_type: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Delivery date is today plus this many days
    #[serde(default = "default_delivery_days")]
    pub delivery_in_days: u32,

    #[serde(default = "default_expected_price")]
    pub expected_price: f64,

    /// Price offered in the buyer's proposal
    #[serde(default = "default_offer_price")]
    pub offer_price: f64,

    #[serde(default = "default_payment_terms")]
    pub payment_terms: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            farmer_name: default_farmer_name(),
            buyer_name: default_buyer_name(),
            wallet_amount: default_wallet_amount(),
            crop_type: default_crop_type(),
            quantity: default_quantity(),
            delivery_in_days: default_delivery_days(),
            expected_price: default_expected_price(),
            offer_price: default_offer_price(),
            payment_terms: default_payment_terms(),
        }
    }
}

fn default_farmer_name() -> String {
    "Test Farmer".to_string()
}
fn default_buyer_name() -> String {
    "Test Buyer".to_string()
}
fn default_wallet_amount() -> f64 {
    1000.0
}
fn default_crop_type() -> String {
    "Rice".to_string()
}
fn default_quantity() -> u32 {
    100
}
fn default_delivery_days() -> u32 {
    30
}
fn default_expected_price() -> f64 {
    500.0
}
fn default_offer_price() -> f64 {
    450.0
}
fn default_payment_terms() -> String {
    "Payment within 7 days of delivery".to_string()
}

impl Config {
    /// Load configuration from `path`, or from the default config file
    ///
    /// Returns default configuration if no path is given and the default
    /// file doesn't exist. An explicit path that doesn't exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Apply overrides from the environment and the command line
    ///
    /// Precedence for the base URL is flag, then environment, then file.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        env_base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = base_url.or(env_base_url).filter(|u| !u.trim().is_empty()) {
            self.server.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.server.timeout_secs = secs;
        }
        self
    }
}
