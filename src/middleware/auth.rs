use axum::{extract::Request, middleware::Next, response::Response};

use crate::auth::{AuthContext, TokenSource};
use crate::error::ApiError;

/// Resolve the caller's credential (header, else token cookie) and attach it
/// to the request for the forwarding layer. Never rejects.
pub async fn propagate_auth(mut request: Request, next: Next) -> Response {
    let auth = AuthContext::from_headers(request.headers());
    if auth.source == TokenSource::Cookie {
        tracing::debug!(path = %request.uri().path(), "Using token cookie as bearer credential");
    }

    request.extensions_mut().insert(auth);
    next.run(request).await
}

/// Protected routes: reject before dispatch when no credential was found.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, ApiError> {
    let present = request
        .extensions()
        .get::<AuthContext>()
        .map(AuthContext::is_present)
        .unwrap_or_else(|| AuthContext::from_headers(request.headers()).is_present());

    if !present {
        tracing::info!(path = %request.uri().path(), "Rejected request without credentials");
        return Err(ApiError::unauthorized("Missing Authorization header"));
    }

    Ok(next.run(request).await)
}
