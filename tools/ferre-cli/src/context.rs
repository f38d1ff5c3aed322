//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use ferre_commerce::cart::Cart;
use ferre_commerce::catalog::Catalog;
use ferre_commerce::checkout::OrderDraft;
use ferre_commerce::CartEngine;
use ferre_store::{JsonFileRepository, Records};
use tracing::debug;

use crate::config::{FerreConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: FerreConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file in use, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (FerreConfig::load(&path)?, Some(path))
            }
            // Try to find config in current directory or parent directories
            None => match find_config(&cwd) {
                Some(path) => (FerreConfig::load(&path)?, Some(path)),
                None => (FerreConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Directory relative paths in the config are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map(|p| self.resolve_path(&p.to_string_lossy()))
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// Build the cart engine from the configured catalog and tariff.
    pub fn engine(&self) -> Result<CartEngine<Catalog>> {
        let catalog = match &self.config.catalog.path {
            Some(path) => {
                let path = self.base_dir().join(path);
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
                let catalog = if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    Catalog::from_json(&content)
                } else {
                    Catalog::from_toml(&content)
                };
                catalog.with_context(|| format!("Invalid catalog: {}", path.display()))?
            }
            None => Catalog::demo().context("Failed to build demo catalog")?,
        };
        debug!(products = catalog.len(), "catalog loaded");

        Ok(CartEngine::new(catalog).with_tariff(self.config.delivery.clone()))
    }

    /// Open the JSON-file repository.
    pub fn repository(&self) -> Result<JsonFileRepository> {
        let dir = self.base_dir().join(&self.config.storage.dir);
        JsonFileRepository::open(&dir)
            .with_context(|| format!("Failed to open storage: {}", dir.display()))
    }

    /// Cart records, keyed by session.
    pub fn carts(&self) -> Result<Records<JsonFileRepository, Cart>> {
        Ok(Records::new(self.repository()?, "cart"))
    }

    /// Placed order drafts, keyed by order id.
    pub fn orders(&self) -> Result<Records<JsonFileRepository, OrderDraft>> {
        Ok(Records::new(self.repository()?, "order"))
    }

    /// Cart record id for this shopper.
    pub fn session(&self) -> &str {
        &self.config.storage.session
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree, nearest first.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("ferre.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(dir.path().join("ferre.toml")));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("ferre.toml"), "").unwrap();
        std::fs::write(nested.join(".ferre.toml"), "").unwrap();

        assert_eq!(find_config(&nested), Some(nested.join(".ferre.toml")));
    }

    #[test]
    fn test_engine_loads_catalog_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("catalog.json"),
            serde_json::to_string(&Catalog::demo().unwrap().to_file()).unwrap(),
        )
        .unwrap();
        let config_path = dir.path().join("ferre.toml");
        std::fs::write(&config_path, "[catalog]\npath = \"catalog.json\"\n").unwrap();

        let ctx = Context::load(config_path.to_str(), Output::new(false, true)).unwrap();
        let engine = ctx.engine().unwrap();
        assert_eq!(engine.catalog().len(), 6);
    }
}
