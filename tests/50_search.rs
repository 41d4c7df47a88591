mod common;

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Json, Router};
use common::{Harness, BEARER};
use serde_json::{json, Value};

fn search_backend() -> Router {
    Router::new()
        .route(
            "/tasks",
            get(|| async {
                Json(json!({ "tasks": [
                    { "id": "t-1", "title": "Meeting Notes", "updatedAt": "2024-06-01T09:00:00Z" },
                    { "id": "t-2", "title": "Meeting", "updatedAt": "2020-01-01T09:00:00Z" },
                    { "id": "t-3", "title": "Groceries" }
                ]}))
            }),
        )
        .route("/events", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/notes",
            get(|| async {
                Json(json!([
                    { "id": "n-1", "text": "meeting agenda draft", "updatedAt": "2023-03-01T00:00:00Z" }
                ]))
            }),
        )
        .route(
            "/files",
            get(|| async {
                Json(json!({ "items": [
                    { "id": "f-1", "filename": "meeting-recording.mp4", "uploadedAt": "2022-01-01" },
                    { "id": "f-2", "filename": "invoice.pdf" }
                ]}))
            }),
        )
}

#[tokio::test]
async fn one_failing_type_still_answers() -> Result<()> {
    let h = Harness::new(search_backend()).await?;

    let res = h.get("/api/search?accountId=acc-1&userId=u-1&q=meeting").send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-search-partial-failure"], "event");

    let body: Value = res.json().await?;
    assert_eq!(body["query"], "meeting");
    assert_eq!(body["types"], json!(["task", "event", "note", "file"]));
    assert_eq!(body["count"], 4);

    let results = body["results"].as_array().cloned().unwrap_or_default();
    let types: Vec<&str> = results.iter().filter_map(|r| r["type"].as_str()).collect();
    assert!(!types.contains(&"event"));
    assert!(types.contains(&"note"));
    assert!(types.contains(&"file"));
    Ok(())
}

#[tokio::test]
async fn exact_title_match_comes_first() -> Result<()> {
    let h = Harness::new(search_backend()).await?;

    let res = h.get("/api/search?accountId=a&userId=u&q=Meeting&types=tasks").send().await?;
    let body: Value = res.json().await?;

    let titles: Vec<&str> = body["results"]
        .as_array()
        .map(|r| r.iter().filter_map(|x| x["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["Meeting", "Meeting Notes"]);
    assert_eq!(body["results"][0]["original"]["id"], "t-2");
    Ok(())
}

#[tokio::test]
async fn only_requested_types_are_fetched_with_scope_and_credentials() -> Result<()> {
    let h = Harness::new(search_backend()).await?;

    let res = h.get("/api/search?accountId=acc-1&userId=u-1&types=Notes").send().await?;
    assert_eq!(res.status(), 200);
    assert!(res.headers().get("x-search-partial-failure").is_none());

    assert_eq!(h.backend.paths(), vec!["/notes"]);
    let seen = h.backend.last();
    assert_eq!(seen.query.as_deref(), Some("accountId=acc-1&userId=u-1"));
    assert_eq!(seen.header("authorization"), Some(BEARER));
    assert!(seen.header("x-vercel-protection-bypass").is_some());
    Ok(())
}

#[tokio::test]
async fn empty_query_matches_everything() -> Result<()> {
    let h = Harness::new(search_backend()).await?;

    let res = h.get("/api/search?accountId=a&userId=u&types=file").send().await?;
    let body: Value = res.json().await?;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["title"], "meeting-recording.mp4");
    Ok(())
}

#[tokio::test]
async fn missing_scope_is_rejected_without_fan_out() -> Result<()> {
    let h = Harness::new(search_backend()).await?;

    let res = h.get("/api/search?q=meeting").send().await?;
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await?;
    assert_eq!(body["missingFields"], json!(["accountId", "userId"]));

    let res = h.get("/api/search?accountId=a&userId=u&types=widgets").send().await?;
    assert_eq!(res.status(), 400);
    assert_eq!(h.backend.count(), 0);
    Ok(())
}
