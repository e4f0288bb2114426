//! CLI configuration.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use yard_catalog::pricing::PricingConfig;
use yard_catalog::selector::DefaultChoice;
use yard_catalog::Currency;
use yard_observability::{LogFormat, LogLevel};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog data location.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Default-choice policy.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Pricing search knobs.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Diagnostic logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// The configured display currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.catalog.currency)
            .ok_or_else(|| anyhow!("Unsupported currency: {}", self.catalog.currency))
    }
}

/// Where catalog data lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// ISO currency code for displayed prices.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            currency: default_currency(),
        }
    }
}

/// How selectors without a caller choice are filled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub default_choice: DefaultChoice,

    /// Seed for reproducible random defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default yard.toml config file.
pub fn generate_default_config(catalog_path: &str) -> String {
    format!(
        r#"# Yard catalog configuration

[catalog]
path = "{catalog_path}"
currency = "USD"

[selection]
# "random" picks any available value; "first" picks the lowest
default_choice = "random"

[pricing]
epsilon = "0.01"
search_limit = 100000

[logging]
level = "warn"
format = "human"
"#,
        catalog_path = catalog_path
    )
}
