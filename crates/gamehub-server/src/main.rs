use tracing_subscriber::EnvFilter;

use gamehub_server::build_app;
use gamehub_server::config::{LogFormat, ServerConfig};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::from_default_env();
    match LogFormat::from_env_value(std::env::var(LogFormat::ENV_VAR).ok().as_deref()) {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let config = ServerConfig::load();
    config.validate();

    let addr = config.listen_addr.clone();
    let (app, _state) = build_app(config);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {addr}: {e}");
            std::process::exit(1);
        },
    };
    tracing::info!("Game hub listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
