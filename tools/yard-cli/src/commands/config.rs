//! Configuration management commands.

use std::fs;

use anyhow::{anyhow, bail, Result};
use yard_catalog::selector::DefaultChoice;
use yard_observability::{LogFormat, LogLevel};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::{config_file_in, Context};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { catalog, force } => init_config(&catalog, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    if let Some(path) = &ctx.config_path {
        ctx.output.kv("file", &path.display().to_string());
    }

    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        ctx.config.catalog.path.as_deref().unwrap_or("(unset)"),
    );
    ctx.output.kv("currency", &ctx.config.catalog.currency);

    ctx.output.info("[selection]");
    ctx.output
        .kv("default_choice", &get_config_value(&ctx.config, "selection.default_choice")?);
    if let Some(seed) = ctx.config.selection.seed {
        ctx.output.kv("seed", &seed.to_string());
    }

    ctx.output.info("[pricing]");
    ctx.output.kv("epsilon", &ctx.config.pricing.epsilon.to_string());
    ctx.output
        .kv("search_limit", &ctx.config.pricing.search_limit.to_string());

    ctx.output.info("[logging]");
    ctx.output.kv("level", &get_config_value(&ctx.config, "logging.level")?);
    ctx.output.kv("format", &get_config_value(&ctx.config, "logging.format")?);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let path = config_file_in(&ctx.cwd)
        .ok_or_else(|| anyhow!("No config file found. Run `yard config init` to create one."))?;
    let path = path.to_string_lossy().to_string();

    let mut config = CliConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn init_config(catalog: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("yard.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(catalog))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(ctx);

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

fn check_config(ctx: &Context) -> (Vec<String>, Vec<String>) {
    let config = &ctx.config;
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = config.currency() {
        errors.push(e.to_string());
    }

    match &config.catalog.path {
        None => warnings.push("catalog.path is not set; pass --catalog to each command".to_string()),
        Some(path) => {
            let resolved = ctx.resolve_path(path);
            if !resolved.exists() {
                errors.push(format!("catalog.path {} does not exist", resolved.display()));
            }
        }
    }

    if config.pricing.epsilon.is_sign_negative() {
        errors.push("pricing.epsilon must not be negative".to_string());
    }
    if config.pricing.search_limit == 0 {
        errors.push("pricing.search_limit must be at least 1".to_string());
    }

    if config.selection.seed.is_some() && config.selection.default_choice != DefaultChoice::Random {
        warnings.push("selection.seed only applies to the random default choice".to_string());
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["catalog", "path"] => config.catalog.path.clone().unwrap_or_default(),
        ["catalog", "currency"] => config.catalog.currency.clone(),
        ["selection", "default_choice"] => match config.selection.default_choice {
            DefaultChoice::Random => "random".to_string(),
            DefaultChoice::First => "first".to_string(),
        },
        ["selection", "seed"] => config
            .selection
            .seed
            .map(|s| s.to_string())
            .unwrap_or_default(),
        ["pricing", "epsilon"] => config.pricing.epsilon.to_string(),
        ["pricing", "search_limit"] => config.pricing.search_limit.to_string(),
        ["logging", "level"] => config.logging.level.to_string().to_lowercase(),
        ["logging", "format"] => match config.logging.format {
            LogFormat::Json => "json".to_string(),
            LogFormat::Human => "human".to_string(),
        },
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["catalog", "path"] => config.catalog.path = Some(value.to_string()),
        ["catalog", "currency"] => config.catalog.currency = value.to_uppercase(),
        ["selection", "default_choice"] => {
            config.selection.default_choice = match value.to_lowercase().as_str() {
                "random" => DefaultChoice::Random,
                "first" => DefaultChoice::First,
                other => bail!("default_choice must be random or first, got {}", other),
            }
        }
        ["selection", "seed"] => config.selection.seed = Some(value.parse()?),
        ["pricing", "epsilon"] => config.pricing.epsilon = value.parse()?,
        ["pricing", "search_limit"] => config.pricing.search_limit = value.parse()?,
        ["logging", "level"] => config.logging.level = value.parse::<LogLevel>()?,
        ["logging", "format"] => {
            config.logging.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "human" => LogFormat::Human,
                other => bail!("format must be json or human, got {}", other),
            }
        }
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_get_config_value() {
        let config = CliConfig::default();
        assert_eq!(get_config_value(&config, "catalog.currency").unwrap(), "USD");
        assert_eq!(get_config_value(&config, "selection.default_choice").unwrap(), "random");
        assert_eq!(get_config_value(&config, "pricing.search_limit").unwrap(), "100000");
        assert_eq!(get_config_value(&config, "logging.level").unwrap(), "warn");
        assert!(get_config_value(&config, "deploy.canary").is_err());
    }

    #[test]
    fn test_set_config_value() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "catalog.currency", "eur").unwrap();
        set_config_value(&mut config, "selection.default_choice", "First").unwrap();
        set_config_value(&mut config, "pricing.epsilon", "0.05").unwrap();
        set_config_value(&mut config, "logging.level", "debug").unwrap();

        assert_eq!(config.catalog.currency, "EUR");
        assert_eq!(config.selection.default_choice, DefaultChoice::First);
        assert_eq!(config.pricing.epsilon, Decimal::new(5, 2));
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_set_config_value_rejects_bad_input() {
        let mut config = CliConfig::default();
        assert!(set_config_value(&mut config, "pricing.search_limit", "lots").is_err());
        assert!(set_config_value(&mut config, "selection.default_choice", "cheapest").is_err());
        assert!(set_config_value(&mut config, "catalog.nope", "x").is_err());
    }
}
