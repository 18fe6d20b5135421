#[allow(dead_code)]
mod common;

use common::{INDEX_HTML, SAMPLE_CATALOG, TestServer};

#[tokio::test]
async fn serves_index_on_root() {
    let server = TestServer::new().await;
    let resp = reqwest::get(server.base_url()).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), INDEX_HTML);
}

#[tokio::test]
async fn serves_catalog_with_cache_busting_query() {
    let server = TestServer::new().await;
    let resp = reqwest::get(format!("{}/games.json?t=1700000000000", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
    let body = resp.text().await.unwrap();
    let catalog = gamehub_core::catalog::Catalog::from_json(&body).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(body, SAMPLE_CATALOG);
}

#[tokio::test]
async fn missing_file_is_404() {
    let server = TestServer::new().await;
    let resp = reqwest::get(format!("{}/nope.js", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let server = TestServer::new().await;
    let resp = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"]["games"], 2);
}

#[tokio::test]
async fn ready_when_catalog_parses() {
    let server = TestServer::new().await;
    let resp = reqwest::get(format!("{}/ready", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ready");
}

#[tokio::test]
async fn not_ready_without_catalog() {
    let server = TestServer::with_catalog(None).await;
    let resp = reqwest::get(format!("{}/ready", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("not ready: catalog file could not be read"));

    let body: serde_json::Value = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["catalog"].is_null());
}

#[tokio::test]
async fn not_ready_with_duplicate_ids() {
    let server = TestServer::with_catalog(Some(
        r#"[{"id":"a","title":"A","url":"https://x/a"},{"id":"a","title":"B","url":"https://x/b"}]"#,
    ))
    .await;
    let resp = reqwest::get(format!("{}/ready", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    assert!(resp.text().await.unwrap().contains("duplicate game id"));
}

#[tokio::test]
async fn not_ready_with_script_url() {
    let server = TestServer::with_catalog(Some(
        r#"[{"id":"x","title":"X","url":"javascript:alert(document.cookie)"}]"#,
    ))
    .await;
    let resp = reqwest::get(format!("{}/ready", server.base_url()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    assert!(resp.text().await.unwrap().contains("unsupported `url` scheme"));
}
