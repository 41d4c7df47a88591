use std::collections::HashMap;

use axum::{
    body::to_bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
    response::{IntoResponse, Response},
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use url::Url;

use crate::auth::AuthContext;
use crate::config::{GatewayConfig, BYPASS_HEADER};
use crate::error::{ApiError, ProxyError};
use crate::translate::{contacts, tiles};
use crate::types::AppState;

use super::{redact::redact, relay, validate, Access, BodyKind, RouteSpec, Shape, Upstream};

/// Largest inbound body accepted, JSON or multipart
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Body to send upstream, already validated and translated
pub enum OutboundBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Validate, forward and relay one request for `spec`. Never fails: every
/// outcome is an HTTP response.
pub async fn forward(
    spec: &RouteSpec,
    state: &AppState,
    auth: &AuthContext,
    params: &HashMap<String, String>,
    query: &HashMap<String, String>,
    request: Request,
) -> Response {
    let body = match read_body(spec, query, request).await {
        Ok(body) => body,
        Err(err) => {
            tracing::info!(route = spec.name, error = %err, "Rejected before dispatch");
            return err.into_response();
        }
    };

    let url = match target_url(&state.config, spec, params, query) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(route = spec.name, error = %e, "Failed to build upstream URL");
            return ApiError::internal_server_error("Failed to build backend request").into_response();
        }
    };

    send(spec, state, auth, url, body).await
}

async fn read_body(spec: &RouteSpec, query: &HashMap<String, String>, request: Request) -> Result<OutboundBody, ApiError> {
    match spec.body {
        BodyKind::None => {
            validate::validate_json(spec, query, None)?;
            Ok(OutboundBody::Empty)
        }
        BodyKind::Json => {
            let bytes = to_bytes(request.into_body(), MAX_BODY_BYTES)
                .await
                .map_err(|e| ApiError::bad_request("Invalid request body", e.to_string()))?;

            let body = if bytes.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                Some(serde_json::from_slice::<Value>(&bytes).map_err(|e| ApiError::invalid_json(e.to_string()))?)
            };

            validate::validate_json(spec, query, body.as_ref())?;

            match body {
                Some(value) => Ok(OutboundBody::Json(translate_request(spec, value)?)),
                None => Ok(OutboundBody::Empty),
            }
        }
        BodyKind::Multipart => read_multipart(spec, query, request).await,
    }
}

fn translate_request(spec: &RouteSpec, value: Value) -> Result<Value, ApiError> {
    let translated = match spec.shape {
        Shape::Contacts => contacts::to_canonical(value),
        Shape::Tiles => tiles::to_canonical(value),
        _ => Ok(value),
    };
    translated.map_err(|e| ApiError::bad_request("Invalid payload", e.to_string()))
}

/// Re-assemble the browser's form field by field.
async fn read_multipart(spec: &RouteSpec, query: &HashMap<String, String>, request: Request) -> Result<OutboundBody, ApiError> {
    let mut multipart = Multipart::from_request(request, &()).await.map_err(|e| invalid_multipart(e))?;
    let mut names = Vec::new();
    let mut form = Form::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| invalid_multipart(e))? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| invalid_multipart(e))?;

        let mut part = Part::bytes(data.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part.mime_str(&content_type).map_err(|e| invalid_multipart(e))?;
        }

        names.push(name.clone());
        form = form.part(name, part);
    }

    validate::validate_parts(spec, query, &names)?;
    tracing::debug!(route = spec.name, fields = ?names, "Re-assembled multipart body");
    Ok(OutboundBody::Multipart(form))
}

fn invalid_multipart(e: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request("Invalid multipart body", e.to_string())
}

/// `base` joined with `segments`, each percent-encoded as a single path segment.
pub fn join_path<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, ProxyError> {
    let mut url = Url::parse(base)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ProxyError::NotABase(base.to_string()))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Substitute path parameters into the route's template and copy its query allow-list.
pub fn target_url(
    config: &GatewayConfig,
    spec: &RouteSpec,
    params: &HashMap<String, String>,
    query: &HashMap<String, String>,
) -> Result<Url, ProxyError> {
    let base = match spec.upstream {
        Upstream::Backend => &config.backend.base_url,
        Upstream::Calendar => &config.backend.calendar_url,
    };

    let segments = spec
        .target
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => params
                .get(name)
                .map(String::as_str)
                .ok_or_else(|| ProxyError::MissingPathParam(name.to_string())),
            None => Ok(segment),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut url = join_path(base, segments)?;

    let pairs: Vec<(&str, &str)> = spec
        .forward_query
        .iter()
        .filter_map(|name| query.get(*name).map(|v| (*name, v.as_str())))
        .collect();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}

async fn send(spec: &RouteSpec, state: &AppState, auth: &AuthContext, url: Url, body: OutboundBody) -> Response {
    tracing::info!(
        route = spec.name,
        method = %spec.verb.method(),
        upstream = %url.path(),
        "Forwarding request"
    );

    let mut request = state
        .client
        .request(spec.verb.method(), url)
        .header(BYPASS_HEADER, state.config.backend.bypass_token.as_str())
        .header(header::ACCEPT, "application/json, */*");

    // Pre-authentication routes must work without, and never leak, a session
    if spec.access == Access::Protected {
        if let Some(authorization) = &auth.authorization {
            request = request.header(header::AUTHORIZATION, authorization.clone());
        }
    }

    request = match body {
        OutboundBody::Empty => request,
        OutboundBody::Json(value) => {
            if state.config.debug {
                tracing::debug!(route = spec.name, body = %redact(&value), "Outbound body");
            }
            request.json(&value)
        }
        OutboundBody::Multipart(form) => request.multipart(form),
    };

    match request.send().await {
        Ok(upstream) => relay::relay(spec, auth, upstream, state.config.debug).await,
        Err(e) => relay::unreachable(spec, &ProxyError::Transport(e)),
    }
}

/// GET a backend collection as JSON, for handlers that compose several calls.
pub async fn fetch_json(
    state: &AppState,
    auth: &AuthContext,
    collection: &str,
    query: &[(&str, &str)],
) -> Result<Value, ProxyError> {
    let mut url = join_path(&state.config.backend.base_url, collection.split('/').filter(|s| !s.is_empty()))?;
    url.query_pairs_mut().extend_pairs(query);

    let mut request = state
        .client
        .get(url)
        .header(BYPASS_HEADER, state.config.backend.bypass_token.as_str())
        .header(header::ACCEPT, "application/json");
    if let Some(authorization) = &auth.authorization {
        request = request.header(header::AUTHORIZATION, authorization.clone());
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(ProxyError::UpstreamStatus(response.status().as_u16()));
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
