use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Marks a response body that did not come from the backend
pub const FALLBACK_HEADER: &str = "x-gateway-fallback";

/// Default payloads for read-only list endpoints that degrade instead of failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Tasks,
    Tiles,
}

impl Fallback {
    pub fn payload(self) -> Value {
        match self {
            Fallback::Tasks => default_tasks(),
            Fallback::Tiles => default_tiles(),
        }
    }

    pub fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.payload())).into_response();
        response
            .headers_mut()
            .insert(FALLBACK_HEADER, HeaderValue::from_static("true"));
        response
    }
}

fn default_tasks() -> Value {
    json!([
        {
            "id": "default-welcome",
            "title": "Welcome to your dashboard",
            "description": "Your tasks will show up here once they load.",
            "status": "todo",
            "isDefault": true
        },
        {
            "id": "default-connect-calendar",
            "title": "Connect a calendar",
            "description": "Link a calendar provider to see your events.",
            "status": "todo",
            "isDefault": true
        }
    ])
}

// Served on the browser-facing route, so already in the legacy tile shape.
fn default_tiles() -> Value {
    let tiles = [
        ("default-tasks", "Tasks", "tasks", 0, 0, "#F4B400"),
        ("default-calendar", "Calendar", "calendar", 0, 1, "#4285F4"),
        ("default-notes", "Notes", "notes", 1, 0, "#0F9D58"),
        ("default-files", "Files", "files", 1, 1, "#DB4437"),
        ("default-contacts", "Contacts", "contacts", 2, 0, "#AB47BC"),
        ("default-search", "Search", "search", 2, 1, "#00ACC1"),
    ];

    Value::Array(
        tiles
            .iter()
            .enumerate()
            .map(|(i, (id, title, kind, row, column, color))| {
                json!({
                    "TileId": id,
                    "Title": title,
                    "TileType": kind,
                    "Row": row,
                    "Column": column,
                    "Color": color,
                    "SortOrder": i
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_defaults_use_legacy_field_names() {
        let tiles = Fallback::Tiles.payload();
        let tiles = tiles.as_array().unwrap();
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|t| t.get("TileId").is_some() && t.get("id").is_none()));
    }

    #[test]
    fn fallback_response_is_marked() {
        let response = Fallback::Tasks.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[FALLBACK_HEADER], "true");
    }
}
