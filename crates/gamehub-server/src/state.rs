use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Shared client for the chat upstream.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gamehub-server/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.chat.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client: {e}, using defaults");
                reqwest::Client::new()
            });
        Self {
            config: Arc::new(config),
            http,
        }
    }
}
