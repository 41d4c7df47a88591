use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::auth::{peek_claims, AuthContext};
use crate::error::ApiError;
use crate::translate::{contacts, tiles, user};

use super::{RouteSpec, Shape, Unreachable};

/// Headers copied from the origin on binary passthrough
fn binary_headers() -> [HeaderName; 5] {
    [
        header::CONTENT_TYPE,
        header::CONTENT_DISPOSITION,
        header::CACHE_CONTROL,
        header::ETAG,
        header::LAST_MODIFIED,
    ]
}

pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("application/json") || ct.contains("+json")
        })
        .unwrap_or(false)
}

/// Binary routes are fetched cross-origin, so every answer on them, errors
/// included, must be readable from any origin.
fn allow_any_origin(spec: &RouteSpec, mut response: Response) -> Response {
    if spec.shape == Shape::Binary {
        insert_cors(response.headers_mut());
    }
    response
}

fn insert_cors(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
}

/// Caller-facing answer when the upstream could not be reached or read.
pub fn unreachable(spec: &RouteSpec, err: &dyn std::fmt::Display) -> Response {
    allow_any_origin(spec, unreachable_response(spec, err))
}

fn unreachable_response(spec: &RouteSpec, err: &dyn std::fmt::Display) -> Response {
    if let Some(fallback) = spec.fallback {
        tracing::warn!(route = spec.name, error = %err, "Backend unreachable, serving default payload");
        return fallback.into_response();
    }

    tracing::error!(route = spec.name, error = %err, "Backend unreachable");
    match spec.unreachable {
        Unreachable::Internal => ApiError::internal_server_error("Failed to reach backend service").into_response(),
        Unreachable::RetryLater => {
            ApiError::service_unavailable("Authentication service is unavailable, please try again later").into_response()
        }
    }
}

/// Map a backend answer onto the caller's response. Never fails.
pub async fn relay(spec: &RouteSpec, auth: &AuthContext, upstream: reqwest::Response, debug: bool) -> Response {
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    if spec.shape == Shape::Binary && status.is_success() {
        return relay_binary(spec, status, upstream).await;
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    // The body is read exactly once
    let bytes = match upstream.bytes().await {
        Ok(b) => b,
        Err(e) => return unreachable(spec, &e),
    };

    if !status.is_success() {
        if status.is_server_error() {
            if let Some(fallback) = spec.fallback {
                tracing::warn!(route = spec.name, status = status.as_u16(), "Backend failed, serving default payload");
                return fallback.into_response();
            }
        }
        tracing::info!(route = spec.name, status = status.as_u16(), "Relaying backend error");
        return allow_any_origin(spec, (status, Json(error_body(status, &bytes))).into_response());
    }

    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return status.into_response();
    }

    if is_json(content_type.as_deref()) {
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            if debug {
                tracing::debug!(route = spec.name, body = %super::redact::redact(&value), "Backend response");
            }
            return match reshape(spec, auth, value) {
                Ok(value) => (status, Json(value)).into_response(),
                Err(e) => {
                    tracing::error!(route = spec.name, error = %e, "Failed to reshape backend response");
                    ApiError::internal_server_error("Failed to process backend response").into_response()
                }
            };
        }
    }

    let mut response = (status, String::from_utf8_lossy(&bytes).into_owned()).into_response();
    if let Some(ct) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        response.headers_mut().insert(header::CONTENT_TYPE, ct);
    }
    response
}

/// Body for a non-2xx backend answer: its JSON as-is, else the text wrapped in `{error}`.
pub fn error_body(status: StatusCode, bytes: &[u8]) -> Value {
    if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
        return value;
    }

    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() {
        json!({
            "error": "Backend request failed",
            "details": format!("Backend responded with status {}", status.as_u16())
        })
    } else {
        json!({ "error": text })
    }
}

fn reshape(spec: &RouteSpec, auth: &AuthContext, value: Value) -> Result<Value, serde_json::Error> {
    match spec.shape {
        Shape::Passthrough | Shape::Binary => Ok(value),
        Shape::Contacts => contacts::to_legacy(value),
        Shape::Tiles => tiles::to_legacy(value),
        Shape::Session => Ok(user::attach_profile(value)),
        Shape::Profile => {
            let claims = auth.bearer_token().and_then(peek_claims);
            Ok(user::profile_with_backfill(value, claims.as_ref()))
        }
    }
}

async fn relay_binary(spec: &RouteSpec, status: StatusCode, upstream: reqwest::Response) -> Response {
    let mut headers = HeaderMap::new();
    for name in binary_headers() {
        if let Some(value) = upstream.headers().get(&name) {
            headers.insert(name, value.clone());
        }
    }
    insert_cors(&mut headers);

    let bytes = match upstream.bytes().await {
        Ok(b) => b,
        Err(e) => return unreachable(spec, &e),
    };

    (status, headers, Body::from(bytes)).into_response()
}
