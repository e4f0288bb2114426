//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use yard_catalog::catalog::VariantGroup;
use yard_catalog::events::EventSink;
use yard_catalog::selector::{ChoicePolicy, DefaultChoice, RandomChoice};
use yard_catalog::session::SessionOptions;
use yard_catalog::{Currency, SessionId};
use yard_data::{CatalogLoader, JsonFileSource};
use yard_observability::{LogFormat, LogLevel, LoggerSink, StructuredLogger};

use crate::config::CliConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["yard.toml", ".yard.toml", "yard.json"];

/// Execution context for CLI commands.
pub struct Context {
    pub config: CliConfig,
    pub output: Output,
    pub cwd: PathBuf,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
    logger: StructuredLogger,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        let level = if output.is_verbose() {
            LogLevel::Debug
        } else {
            config.logging.level
        };
        let format = if output.is_json() {
            LogFormat::Json
        } else {
            config.logging.format
        };
        let logger = StructuredLogger::new(SessionId::generate())
            .with_min_level(level)
            .with_format(format);

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
            logger,
        })
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Event sink writing catalog diagnostics through the logger.
    pub fn event_sink(&self, group: &str) -> Arc<dyn EventSink> {
        Arc::new(LoggerSink::new(self.logger.clone().with_group(group)))
    }

    pub fn currency(&self) -> Result<Currency> {
        self.config.currency()
    }

    pub fn policy(&self) -> Box<dyn ChoicePolicy> {
        match (self.config.selection.default_choice, self.config.selection.seed) {
            (DefaultChoice::Random, Some(seed)) => Box::new(RandomChoice::seeded(seed)),
            (choice, _) => choice.into_policy(),
        }
    }

    pub fn session_options(&self, group: &str) -> SessionOptions {
        SessionOptions {
            pricing: self.config.pricing,
            sink: self.event_sink(group),
        }
    }

    /// Catalog file from the flag, else from config.
    pub fn catalog_path(&self, flag: Option<&str>) -> Result<PathBuf> {
        let path = flag
            .map(str::to_string)
            .or_else(|| self.config.catalog.path.clone())
            .ok_or_else(|| {
                anyhow!("No catalog file given. Pass --catalog or set catalog.path in yard.toml.")
            })?;
        Ok(self.resolve_path(&path))
    }

    /// Load a group by product-group id, or a single id as a one-key group.
    pub async fn load_group(
        &self,
        catalog: Option<&str>,
        id: &str,
        single: bool,
    ) -> Result<VariantGroup> {
        let path = self.catalog_path(catalog)?;
        self.output.debug(&format!("Catalog: {}", path.display()));

        let loader = CatalogLoader::new(JsonFileSource::new(&path)).with_sink(self.event_sink(id));
        let spinner = self.output.spinner(&format!("Loading {}", id));
        let group = if single {
            loader.load_variant_group(id).await
        } else {
            loader.load_group(id).await
        };
        spinner.finish_and_clear();

        group.ok_or_else(|| anyhow!("No catalog data for {} in {}", id, path.display()))
    }

    /// Resolve a path relative to the working directory, or to the config
    /// file's directory when one is in use.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let candidate = PathBuf::from(path);
        if candidate.is_absolute() {
            return candidate;
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(candidate),
            _ => self.cwd.join(candidate),
        }
    }
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                    return Some((config, config_path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Find the config file to edit in `cwd`.
pub fn config_file_in(cwd: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|name| cwd.join(name))
        .find(|path| path.exists())
}
