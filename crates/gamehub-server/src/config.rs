use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level server configuration, loaded from `gamehub.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory holding the built client and the catalog.
    pub web_root: String,
    /// Catalog file, relative to `web_root`.
    pub catalog_file: String,
    pub chat: ChatConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            web_root: "web".to_string(),
            catalog_file: "games.json".to_string(),
            chat: ChatConfig::default(),
        }
    }
}

/// Upstream text-generation service used by `POST /api/v1/chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// No key means the chat endpoint answers 503.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Log line format, chosen by `GAMEHUB_LOG_FORMAT` before the config file
/// is read so that loading is logged too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    pub const ENV_VAR: &'static str = "GAMEHUB_LOG_FORMAT";

    /// `json` (any case) selects JSON; anything else, or nothing, is text.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidListenAddr(String),
    EmptyCatalogFile,
    EmptyModel,
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(addr) => {
                write!(f, "listen_addr `{addr}` is not a valid socket address")
            },
            Self::EmptyCatalogFile => write!(f, "catalog_file must not be empty"),
            Self::EmptyModel => write!(f, "chat.model must not be empty"),
            Self::ZeroTimeout => write!(f, "chat.timeout_secs must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Full path of the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        PathBuf::from(&self.web_root).join(&self.catalog_file)
    }

    /// Check the configuration for values the server cannot run with.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidListenAddr(self.listen_addr.clone()));
        }
        if self.catalog_file.trim().is_empty() {
            return Err(ConfigError::EmptyCatalogFile);
        }
        if self.chat.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if self.chat.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Validate configuration, logging warnings for issues and exiting on
    /// fatal ones.
    pub fn validate(&self) {
        if let Err(e) = self.check() {
            tracing::error!("{e}");
            std::process::exit(1);
        }

        if !PathBuf::from(&self.web_root).is_dir() {
            tracing::warn!(web_root = %self.web_root, "web_root does not exist");
        }
        if self.chat.api_key.is_none() {
            tracing::info!("No chat API key configured, /api/v1/chat is disabled");
        }
    }

    /// Load config from `gamehub.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("gamehub.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from gamehub.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse gamehub.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No gamehub.toml found, using defaults");
                ServerConfig::default()
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `GAMEHUB_*` overrides. Empty values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.is_empty());

        if let Some(addr) = var("GAMEHUB_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(root) = var("GAMEHUB_WEB_ROOT") {
            self.web_root = root;
        }
        if let Some(file) = var("GAMEHUB_CATALOG_FILE") {
            self.catalog_file = file;
        }
        if let Some(key) = var("GAMEHUB_CHAT_API_KEY").or_else(|| var("GEMINI_API_KEY")) {
            self.chat.api_key = Some(key);
        }
        if let Some(model) = var("GAMEHUB_CHAT_MODEL") {
            self.chat.model = model;
        }
    }
}
