use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use gamehub_core::catalog::{Catalog, CatalogError, catalog_url, parse_response};
use gamehub_core::chat::{ChatError, ChatReply, ChatRequest};
use gamehub_core::config::SiteConfig;

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

/// Issue `request` and return the status plus the body as text.
async fn send(request: &Request) -> Result<(u16, String), String> {
    let window = web_sys::window().ok_or("no window")?;
    let resp: Response = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let status = resp.status();
    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();
    Ok((status, text))
}

/// Fetch and validate the catalog named by the site config.
pub async fn load_catalog(config: &SiteConfig) -> Result<Catalog, CatalogError> {
    let bust = config.cache_bust.then(|| js_sys::Date::now() as u64);
    let url = catalog_url(&config.catalog_path, bust);

    let opts = RequestInit::new();
    opts.set_method("GET");
    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| CatalogError::Network(js_error(e)))?;
    let (status, body) = send(&request).await.map_err(CatalogError::Network)?;
    parse_response(status, &body)
}

/// POST one chat message and return the reply text.
pub async fn post_chat(endpoint: &str, body: &ChatRequest) -> Result<String, ChatError> {
    let payload = serde_json::to_string(body).map_err(|e| ChatError::Parse(e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&payload));
    let request = Request::new_with_str_and_init(endpoint, &opts)
        .map_err(|e| ChatError::Network(js_error(e)))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| ChatError::Network(js_error(e)))?;

    let (status, text) = send(&request).await.map_err(ChatError::Network)?;
    if !(200..300).contains(&status) {
        return Err(ChatError::Status(status));
    }
    let reply: ChatReply =
        serde_json::from_str(&text).map_err(|e| ChatError::Parse(e.to_string()))?;
    if reply.reply.trim().is_empty() {
        return Err(ChatError::EmptyReply);
    }
    Ok(reply.reply)
}
