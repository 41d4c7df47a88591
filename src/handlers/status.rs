use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Hive Gateway",
            "version": version,
            "description": "HTTP gateway between the Hive web client and its backend services",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/login, /api/auth/register, /api/auth/forgot-password, /api/auth/reset-password, /api/auth/refresh (public)",
                "me": "/api/auth/me (protected)",
                "resources": "/api/{accounts,tasks,events,notes,files,tiles,contacts,providers,users,stats}[/:id] (protected)",
                "calendars": "/api/calendars[/sync|/colors] (protected)",
                "search": "/api/search?accountId&userId&q&types (protected)",
            }
        }
    }))
}

/// Liveness only; the backend is not contacted.
pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
