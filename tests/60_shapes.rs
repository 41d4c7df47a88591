mod common;

use anyhow::Result;
use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use common::Harness;
use serde_json::{json, Value};

#[tokio::test]
async fn contacts_are_served_in_legacy_shape() -> Result<()> {
    let backend = Router::new().route(
        "/contacts",
        get(|| async {
            Json(json!({
                "contacts": [{ "id": 42, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" }],
                "total": 1
            }))
        }),
    );
    let h = Harness::new(backend).await?;

    let res = h.get("/api/contacts?accountId=acc-1").send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<Value>().await?,
        json!({
            "contacts": [{ "UniqueId": "42", "FirstName": "Ada", "LastName": "Lovelace", "EmailAddress": "ada@example.com" }],
            "total": 1
        })
    );
    assert_eq!(h.backend.last().query.as_deref(), Some("accountId=acc-1"));
    Ok(())
}

#[tokio::test]
async fn legacy_contact_is_sent_canonical() -> Result<()> {
    let backend = Router::new().route(
        "/contacts",
        post(|Json(body): Json<Value>| async move { (StatusCode::CREATED, Json(json!({ "id": "c-1", "firstName": body["firstName"] }))) }),
    );
    let h = Harness::new(backend).await?;

    let res = h
        .post("/api/contacts")
        .json(&json!({ "FirstName": "Grace", "PhoneNumber": "555-0100", "AccountId": "acc-1" }))
        .send()
        .await?;
    assert_eq!(res.status(), 201);
    assert_eq!(res.json::<Value>().await?, json!({ "UniqueId": "c-1", "FirstName": "Grace" }));
    assert_eq!(
        h.backend.last().json(),
        json!({ "firstName": "Grace", "phone": "555-0100", "accountId": "acc-1" })
    );
    Ok(())
}

#[tokio::test]
async fn tiles_round_trip_between_shapes() -> Result<()> {
    let backend = Router::new()
        .route(
            "/tiles",
            get(|| async {
                Json(json!([{ "id": 7, "title": "Mail", "type": "app", "row": 0, "column": 2, "position": 3 }]))
            })
            .post(|Json(body): Json<Value>| async move { (StatusCode::CREATED, Json(body)) }),
        );
    let h = Harness::new(backend).await?;

    let res = h.get("/api/tiles?accountId=a&userId=u").send().await?;
    assert_eq!(
        res.json::<Value>().await?,
        json!([{ "TileId": "7", "Title": "Mail", "TileType": "app", "Row": 0, "Column": 2, "SortOrder": 3 }])
    );

    let res = h
        .post("/api/tiles")
        .json(&json!({ "Title": "Docs", "TileType": "link", "Url": "https://docs.example.com", "SortOrder": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), 201);
    assert_eq!(
        h.backend.last().json(),
        json!({ "title": "Docs", "type": "link", "url": "https://docs.example.com", "position": 1 })
    );
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "Title": "Docs", "TileType": "link", "Url": "https://docs.example.com", "SortOrder": 1 })
    );
    Ok(())
}

#[tokio::test]
async fn scalar_contact_fields_are_forwarded_as_text() -> Result<()> {
    let backend = Router::new().route(
        "/contacts/:id",
        put(|Json(body): Json<Value>| async move { Json(body) }),
    );
    let h = Harness::new(backend).await?;

    let res = h.put("/api/contacts/c-1").json(&json!({ "FirstName": 12 })).send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(h.backend.last().json(), json!({ "firstName": "12" }));
    assert_eq!(res.json::<Value>().await?, json!({ "FirstName": "12" }));
    Ok(())
}

#[tokio::test]
async fn numeric_phone_from_backend_is_served_as_text() -> Result<()> {
    let backend = Router::new().route(
        "/contacts",
        get(|| async { Json(json!([{ "id": "c-1", "firstName": "Ada", "phone": 5550100 }])) }),
    );
    let h = Harness::new(backend).await?;

    let res = h.get("/api/contacts?accountId=acc-1").send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<Value>().await?,
        json!([{ "UniqueId": "c-1", "FirstName": "Ada", "PhoneNumber": "5550100" }])
    );
    Ok(())
}

#[tokio::test]
async fn contact_delete_acknowledgement_is_relayed_untouched() -> Result<()> {
    let backend = Router::new().route(
        "/contacts/:id",
        delete(|| async { Json(json!({ "success": true, "message": "Contact deleted" })) }),
    );
    let h = Harness::new(backend).await?;

    let res = h.delete("/api/contacts/c-1").send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true, "message": "Contact deleted" }));
    assert_eq!(h.backend.last().path, "/contacts/c-1");
    Ok(())
}

#[tokio::test]
async fn tile_delete_acknowledgement_is_relayed_untouched() -> Result<()> {
    let backend = Router::new().route(
        "/tiles/:id",
        delete(|| async { Json(json!({ "message": "Tile deleted" })) }),
    );
    let h = Harness::new(backend).await?;

    let res = h.delete("/api/tiles/t-1").send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await?, json!({ "message": "Tile deleted" }));
    Ok(())
}

#[tokio::test]
async fn tile_update_acknowledgement_is_relayed_untouched() -> Result<()> {
    let backend = Router::new().route(
        "/tiles/:id",
        put(|| async { Json(json!({ "success": true, "message": "Tile updated" })) }),
    );
    let h = Harness::new(backend).await?;

    let res = h.put("/api/tiles/t-1").json(&json!({ "Title": "Docs" })).send().await?;
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await?, json!({ "success": true, "message": "Tile updated" }));
    assert_eq!(h.backend.last().json(), json!({ "title": "Docs" }));
    Ok(())
}
