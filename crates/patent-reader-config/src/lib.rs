use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory under the patents path used when `highlights_path` is unset
const DEFAULT_HIGHLIGHTS_DIR: &str = ".highlights";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub patents_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights_path: Option<PathBuf>,
    #[serde(default = "default_color")]
    pub default_color: String,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Metrics for the monospace overlay layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub line_height: f32,
    pub char_width: f32,
    pub wrap_column: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            char_width: 8.0,
            wrap_column: 80,
        }
    }
}

fn default_color() -> String {
    "yellow".to_string()
}

impl Config {
    pub fn new(patents_path: impl Into<PathBuf>) -> Self {
        Self {
            patents_path: patents_path.into(),
            highlights_path: None,
            default_color: default_color(),
            overlay: OverlayConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.patents_path =
            Self::expand_path(&config.patents_path).unwrap_or(config.patents_path);
        config.highlights_path = config
            .highlights_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/patent-reader");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Where highlight files live: `highlights_path`, else a hidden
    /// directory inside the patents directory
    pub fn highlights_dir(&self) -> PathBuf {
        self.highlights_path
            .clone()
            .unwrap_or_else(|| self.patents_path.join(DEFAULT_HIGHLIGHTS_DIR))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
