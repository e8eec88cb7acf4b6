use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ethos: EthosConfig,
    #[serde(default)]
    pub talent: TalentConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EthosConfig {
    /// Ethos Network API base URL
    #[serde(default = "default_ethos_url")]
    pub base_url: String,
    /// Client identifier sent with every request (app@version)
    #[serde(default = "default_ethos_client_id")]
    pub client_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TalentConfig {
    /// Talent Protocol API base URL
    #[serde(default = "default_talent_url")]
    pub base_url: String,
    /// API key - loaded from env TALENT_API_KEY, empty if unset
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Seconds a cached profile stays fresh before a refetch is allowed.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}
fn default_ethos_url() -> String {
    "https://api.ethos.network".to_string()
}
fn default_ethos_client_id() -> String {
    format!("basecred-demo@{}", env!("CARGO_PKG_VERSION"))
}
fn default_talent_url() -> String {
    "https://api.talentprotocol.com".to_string()
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for EthosConfig {
    fn default() -> Self {
        Self {
            base_url: default_ethos_url(),
            client_id: default_ethos_client_id(),
        }
    }
}

impl Default for TalentConfig {
    fn default() -> Self {
        Self {
            base_url: default_talent_url(),
            api_key: String::new(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables for secrets.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.overlay_env();
        Ok(config)
    }

    /// Load a default config with env-only overrides (no file needed).
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.overlay_env();
        config
    }

    fn overlay_env(&mut self) {
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("ETHOS_BASE_URL") {
            self.ethos.base_url = url;
        }
        if let Ok(url) = std::env::var("TALENT_BASE_URL") {
            self.talent.base_url = url;
        }
        // Secret: never stored in the config file
        if let Ok(key) = std::env::var("TALENT_API_KEY") {
            self.talent.api_key = key;
        }
    }

    pub fn has_talent_key(&self) -> bool {
        !self.talent.api_key.is_empty()
    }
}
