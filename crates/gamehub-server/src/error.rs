use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// A required upstream is not configured.
    Unavailable(String),
    /// The upstream failed or answered with something unusable.
    BadGateway(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m) | Self::Unavailable(m) | Self::BadGateway(m) => {
                write!(f, "{m}")
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Self::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),
            Self::BadGateway(m) => (StatusCode::BAD_GATEWAY, m.clone()),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
