mod common;

use anyhow::Result;
use axum::Router;
use common::Harness;
use serde_json::Value;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let h = Harness::new(Router::new()).await?;

    let res = h.client.get(h.url("/")).send().await?;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Hive Gateway");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn health_answers_without_the_backend() -> Result<()> {
    let h = Harness::unreachable().await?;

    let res = h.client.get(h.url("/health")).send().await?;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_routes_are_not_forwarded() -> Result<()> {
    let h = Harness::new(Router::new()).await?;

    let res = h.get("/api/unknown-resource").send().await?;
    assert_eq!(res.status(), 404);
    assert_eq!(h.backend.count(), 0);
    Ok(())
}
