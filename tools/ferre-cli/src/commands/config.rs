//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use serde_json::Value;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, FerreConfig, LogFormat};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "none (defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        config.catalog.path.as_deref().unwrap_or("built-in demo catalog"),
    );

    ctx.output.info("");
    ctx.output.info("[delivery]");
    ctx.output.kv("base_fee", &config.delivery.base_fee.to_string());
    ctx.output.kv("heavy_fee", &config.delivery.heavy_fee.to_string());
    ctx.output
        .kv("heavy_threshold", &config.delivery.heavy_threshold.to_string());

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &config.storage.dir);
    ctx.output.kv("session", &config.storage.session);

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv(
        "format",
        match config.logging.format {
            LogFormat::Human => "human",
            LogFormat::Json => "json",
        },
    );

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        match value {
            Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("ferre.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (mut errors, warnings) = ctx.config.check();

    if let Some(path) = &ctx.config.catalog.path {
        if let Err(e) = ctx.engine() {
            errors.push(format!("catalog.path '{}': {:#}", path, e));
        }
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Look up a dot-separated key such as `delivery.base_fee`.
fn get_config_value(config: &FerreConfig, key: &str) -> Result<Value> {
    let mut value = serde_json::to_value(config)?;
    for part in key.split('.') {
        value = match value {
            Value::Object(mut map) => match map.remove(part) {
                Some(v) => v,
                None => bail!("Unknown config key: {}", key),
            },
            _ => bail!("Unknown config key: {}", key),
        };
    }
    Ok(value)
}
