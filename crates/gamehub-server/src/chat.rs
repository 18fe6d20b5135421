use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use gamehub_core::chat::{ChatError, ChatReply, ChatRequest};

use crate::config::ChatConfig;
use crate::error::AppError;
use crate::state::AppState;

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Partial `generateContent` response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn build_request(req: &ChatRequest) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: &req.message }],
        }],
        system_instruction: req.system_instruction.as_deref().map(|text| Content {
            role: None,
            parts: vec![Part { text }],
        }),
    }
}

/// Send one message to the upstream model and return its text.
pub async fn generate(
    client: &reqwest::Client,
    config: &ChatConfig,
    api_key: &str,
    req: &ChatRequest,
) -> Result<String, ChatError> {
    let url = format!(
        "{}/models/{}:generateContent",
        config.api_base.trim_end_matches('/'),
        config.model
    );
    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&build_request(req))
        .send()
        .await
        .map_err(|e| ChatError::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ChatError::Status(status.as_u16()));
    }
    let body: GenerateResponse = resp
        .json()
        .await
        .map_err(|e| ChatError::Parse(e.to_string()))?;
    body.into_text().ok_or(ChatError::EmptyReply)
}

/// POST /api/v1/chat: forward one message to the configured model.
pub async fn post_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let Some(api_key) = state.config.chat.api_key.as_deref() else {
        return Err(AppError::Unavailable("chat is not configured".to_string()));
    };

    let reply = generate(&state.http, &state.config.chat, api_key, &body)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "chat upstream failed");
            AppError::BadGateway(e.to_string())
        })?;

    Ok(Json(ChatReply { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape_matches_upstream() {
        let req = ChatRequest {
            message: "hi".to_string(),
            system_instruction: Some("be brief".to_string()),
        };
        let json = serde_json::to_value(build_request(&req)).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn instruction_omitted_when_absent() {
        let req = ChatRequest {
            message: "hi".to_string(),
            system_instruction: None,
        };
        let json = serde_json::to_value(build_request(&req)).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn response_text_is_joined() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Try "},{"text":"Slope!"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.into_text().as_deref(), Some("Try Slope!"));
    }

    #[test]
    fn empty_response_has_no_text() {
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(body.into_text().is_none());
        let body: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(body.into_text().is_none());
    }
}
