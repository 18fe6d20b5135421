use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};

use gamehub_server::build_app;
use gamehub_server::config::{ChatConfig, ServerConfig};

pub const SAMPLE_CATALOG: &str = r#"[
    {"id": "1", "title": "Chess Master", "description": "Classic strategy",
     "thumbnail": "https://x/chess.png", "url": "https://x/chess", "type": "embed"},
    {"id": "2", "title": "Slope", "description": "Roll down the hill",
     "thumbnail": "https://x/slope.png", "url": "https://x/slope", "type": "cloaked-popup"}
]"#;

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><div id=\"library-view\"></div></body></html>";

/// Scratch web root, removed on drop.
pub struct WebRoot {
    pub path: PathBuf,
}

impl WebRoot {
    pub fn new(catalog: Option<&str>) -> Self {
        let path = std::env::temp_dir().join(format!("gamehub-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("index.html"), INDEX_HTML).unwrap();
        if let Some(body) = catalog {
            std::fs::write(path.join("games.json"), body).unwrap();
        }
        Self { path }
    }
}

impl Drop for WebRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub web_root: WebRoot,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serve the sample catalog with chat disabled.
    pub async fn new() -> Self {
        Self::with_catalog(Some(SAMPLE_CATALOG)).await
    }

    pub async fn with_catalog(catalog: Option<&str>) -> Self {
        Self::from_parts(WebRoot::new(catalog), ChatConfig::default()).await
    }

    /// Serve the sample catalog with chat pointed at `api_base`.
    pub async fn with_chat_upstream(api_base: &str) -> Self {
        let chat = ChatConfig {
            api_key: Some("test-key".to_string()),
            api_base: api_base.to_string(),
            model: "test-model".to_string(),
            timeout_secs: 5,
        };
        Self::from_parts(WebRoot::new(Some(SAMPLE_CATALOG)), chat).await
    }

    async fn from_parts(web_root: WebRoot, chat: ChatConfig) -> Self {
        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            web_root: web_root.path.to_string_lossy().into_owned(),
            chat,
            ..ServerConfig::default()
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            web_root,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// A request seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct UpstreamCall {
    pub path: String,
    pub api_key: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct UpstreamState {
    calls: Arc<Mutex<Vec<UpstreamCall>>>,
    status: StatusCode,
    reply: serde_json::Value,
}

/// Stand-in for the text-generation service.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub calls: Arc<Mutex<Vec<UpstreamCall>>>,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl MockUpstream {
    /// Answer every request with `status` and `reply`.
    pub async fn start(status: StatusCode, reply: serde_json::Value) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = UpstreamState {
            calls: Arc::clone(&calls),
            status,
            reply,
        };
        let app = Router::new().fallback(record_call).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            calls,
            _shutdown: handle,
        }
    }

    /// Upstream that replies with a single text candidate.
    pub async fn replying(text: &str) -> Self {
        Self::start(
            StatusCode::OK,
            serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
            }),
        )
        .await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<UpstreamCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record_call(
    State(state): State<UpstreamState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.calls.lock().unwrap().push(UpstreamCall {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });
    (state.status, Json(state.reply.clone()))
}
