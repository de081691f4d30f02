use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "orderdesk.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Contents of `orderdesk.toml`; every key is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OrderdeskConfig {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors: Option<bool>,
}

impl OrderdeskConfig {
    /// Config with every default spelled out, as written by `init`
    pub fn with_defaults() -> Self {
        Self {
            database: Some(DEFAULT_DATABASE.to_string()),
            host: Some(DEFAULT_HOST.to_string()),
            port: Some(DEFAULT_PORT),
            cors: Some(true),
        }
    }

    /// Keys set in `other` win over keys set in `self`
    pub fn overlay(self, other: OrderdeskConfig) -> Self {
        Self {
            database: other.database.or(self.database),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            cors: other.cors.or(self.cors),
        }
    }
}

/// Concrete settings the server runs with
#[derive(Debug, Clone, PartialEq)]
pub struct ServeSettings {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    pub cors: bool,
}

impl ServeSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<OrderdeskConfig> for ServeSettings {
    fn from(config: OrderdeskConfig) -> Self {
        Self {
            database: PathBuf::from(config.database.unwrap_or_else(|| DEFAULT_DATABASE.to_string())),
            host: config.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: config.port.unwrap_or(DEFAULT_PORT),
            cors: config.cors.unwrap_or(true),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("orderdesk.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<OrderdeskConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: OrderdeskConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &OrderdeskConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
