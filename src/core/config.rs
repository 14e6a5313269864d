use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const CONFIG_FILE: &str = "board.toml";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "models/gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BoardConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub avatars: AvatarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Relative paths are resolved against the data directory.
    #[serde(default = "default_photos_dir")]
    pub photos_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Only ever read from `GEMINI_API_KEY`, never from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_photos_dir() -> PathBuf {
    PathBuf::from("photos")
}
fn default_true() -> bool {
    true
}
fn default_endpoint() -> String {
    DEFAULT_GEMINI_ENDPOINT.to_string()
}
fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photos_dir: default_photos_dir(),
        }
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl AvatarConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Generation runs only when enabled and an API key is present.
    pub fn is_usable(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl BoardConfig {
    /// Reads `board.toml` from `data_dir`, then applies environment overrides.
    pub async fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            let content = tokio::fs::read_to_string(&config_path).await?;
            let config: BoardConfig = toml::from_str(&content)?;
            info!("Loaded board config from {}", config_path.display());
            config
        } else {
            info!("No {} found, using defaults.", CONFIG_FILE);
            BoardConfig::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.avatars.api_key = Some(key);
        }
        if let Some(endpoint) = lookup("GEMINI_API_ENDPOINT") {
            self.avatars.endpoint = endpoint;
        }
        if let Some(model) = lookup("GEMINI_IMAGE_MODEL") {
            self.avatars.model = model;
        }
    }

    pub fn photos_dir(&self, data_dir: &Path) -> PathBuf {
        if self.storage.photos_dir.is_absolute() {
            self.storage.photos_dir.clone()
        } else {
            data_dir.join(&self.storage.photos_dir)
        }
    }
}

/// `QUADBOARD_DATA_DIR`, else `~/.quadboard`, else `./data`.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("QUADBOARD_DATA_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".quadboard"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
