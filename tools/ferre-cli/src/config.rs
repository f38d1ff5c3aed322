//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use ferre_commerce::checkout::DeliveryTariff;
use ferre_commerce::Money;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["ferre.toml", ".ferre.toml", "ferre.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FerreConfig {
    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Delivery fee schedule.
    #[serde(default)]
    pub delivery: DeliveryTariff,

    /// Where carts and orders are kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log filter and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FerreConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Check values serde cannot: returns `(errors, warnings)`.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let delivery = &self.delivery;
        if delivery.heavy_threshold < 1 {
            errors.push("delivery.heavy_threshold must be at least 1".to_string());
        }
        if delivery.base_fee < Money::zero() {
            errors.push("delivery.base_fee must not be negative".to_string());
        }
        if delivery.heavy_fee < delivery.base_fee {
            warnings.push(format!(
                "delivery.heavy_fee ({}) is below delivery.base_fee ({})",
                delivery.heavy_fee, delivery.base_fee
            ));
        }

        if self.storage.dir.trim().is_empty() {
            errors.push("storage.dir must not be empty".to_string());
        }
        if ferre_store::validate_key(&self.storage.session).is_err() {
            errors.push(format!(
                "storage.session '{}' may only contain letters, digits, '-' and '_'",
                self.storage.session
            ));
        }

        if let Some(path) = &self.catalog.path {
            if !(path.ends_with(".toml") || path.ends_with(".json")) {
                warnings.push(format!(
                    "catalog.path '{}' has no .toml or .json extension; parsing as TOML",
                    path
                ));
            }
        }

        (errors, warnings)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML or JSON catalog file. The built-in demo catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the JSON-file repository.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Cart record id for this shopper.
    #[serde(default = "default_session")]
    pub session: String,
}

fn default_storage_dir() -> String {
    ".ferre".to_string()
}

fn default_session() -> String {
    "default".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            session: default_session(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Generate a default ferre.toml config file.
pub fn generate_default_config() -> String {
    r#"# Ferretería Online storefront configuration

[catalog]
# TOML or JSON file with [[vendors]] and [[products]]; demo catalog when unset
# path = "catalog.toml"

[delivery]
base_fee = "10.00"
heavy_fee = "40.00"
heavy_threshold = 10

[storage]
dir = ".ferre"
session = "default"

[logging]
level = "warn"
format = "human"
"#
    .to_string()
}
