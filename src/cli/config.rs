use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".acr-classic-repro.toml";

/// Optional project settings. CLI flags and environment variables win over these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Azure cloud name, e.g. AzurePublicCloud
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_manager_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_directory_endpoint: Option<String>,
}

impl Config {
    /// Load from the working directory, falling back to the user config dir
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILENAME).exists() {
            return load_config_from_path(CONFIG_FILENAME);
        }
        match user_config_path() {
            Some(path) if path.exists() => load_config_from_path(path),
            _ => anyhow::bail!("No {} found", CONFIG_FILENAME),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(CONFIG_FILENAME)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    Ok(config)
}

/// `<config_dir>/acr-classic-repro/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("acr-classic-repro").join("config.toml"))
}

/// Load config, distinguishing between "no file" and "file invalid"
pub fn try_load_config() -> Result<Option<Config>> {
    let user_file = user_config_path().filter(|p| p.exists());
    if !Path::new(CONFIG_FILENAME).exists() && user_file.is_none() {
        return Ok(None);
    }
    Config::load().map(Some)
}
