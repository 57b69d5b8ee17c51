//! Service configuration loaded from TOML.
//!
//! Resolution order: `$DOCFIND_CONFIG`, then `<config dir>/docfind/config.toml`,
//! then built-in defaults. Every key is optional.

use crate::cache::BuildSettings;
use crate::error::Result;
use crate::inventory::{CommandSource, DecodeStrategy, FileSource, InventorySource, ParseOptions};
use crate::search::DEFAULT_DISPLAY_LIMIT;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DOCFIND_CONFIG";

const DEFAULT_BASE_URL: &str = "https://alwaysai.co/docs/";
const DEFAULT_INVENTORY_URL: &str = "https://alwaysai.co/docs/objects.inv";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FinderConfig {
    /// Prefix joined to every relative inventory link
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub decode: DecodeStrategy,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_max_display_chars")]
    pub max_display_chars: usize,
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
const fn default_fetch_timeout_secs() -> u64 {
    30
}
const fn default_max_display_chars() -> usize {
    DEFAULT_DISPLAY_LIMIT
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            decode: DecodeStrategy::default(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_display_chars: default_max_display_chars(),
            source: SourceConfig::default(),
        }
    }
}

/// Where the raw inventory comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum SourceConfig {
    /// Run a program and read the inventory from its stdout
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Read an already-converted plain-text inventory
    File { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Command {
            program: "python".to_string(),
            args: ["-m", "sphobjinv", "convert", "plain", "-u", DEFAULT_INVENTORY_URL, "-"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SourceConfig {
    pub fn build(&self) -> Arc<dyn InventorySource> {
        match self {
            Self::Command { program, args } => Arc::new(CommandSource::new(program, args)),
            Self::File { path } => {
                let path = expand_tilde(&path.to_string_lossy()).into_owned();
                Arc::new(FileSource::new(path))
            }
        }
    }
}

impl FinderConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Load from `$DOCFIND_CONFIG` or the user config directory, falling back
    /// to defaults when neither exists.
    pub fn discover() -> Result<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(expand_tilde(&explicit).into_owned());
            tracing::info!("Loading config from {} ({})", path.display(), CONFIG_ENV);
            return Self::load(&path);
        }

        if let Some(path) = default_config_path()
            && path.is_file()
        {
            tracing::info!("Loading config from {}", path.display());
            return Self::load(&path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.max_display_chars == 0 {
            bail!("max_display_chars must be greater than zero");
        }
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be greater than zero");
        }
        if let SourceConfig::Command { program, .. } = &self.source
            && program.trim().is_empty()
        {
            bail!("source.program must not be empty");
        }
        Ok(())
    }

    pub fn build_settings(&self) -> BuildSettings {
        BuildSettings {
            parse: ParseOptions {
                base_url: self.base_url.clone(),
                decode: self.decode,
            },
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }
}

/// `<config dir>/docfind/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docfind").join("config.toml"))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
