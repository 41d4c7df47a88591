// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors returned to the browser. Every variant renders as `{error, details?}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest { error: String, details: Option<String> },
    MissingFields(Vec<String>),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::MissingFields(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { error, .. } => error,
            ApiError::MissingFields(_) => "Missing required fields",
            ApiError::InvalidJson(_) => "Invalid JSON",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::InternalServerError(_) => "Internal server error",
            ApiError::ServiceUnavailable(_) => "Server unreachable",
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            ApiError::BadRequest { details, .. } => details.clone(),
            ApiError::MissingFields(fields) => Some(format!("Missing: {}", fields.join(", "))),
            ApiError::InvalidJson(msg) => Some(msg.clone()),
            ApiError::Unauthorized(msg) => Some(msg.clone()),
            ApiError::InternalServerError(msg) => Some(msg.clone()),
            ApiError::ServiceUnavailable(msg) => Some(msg.clone()),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({ "error": self.message() });
        if let Some(details) = self.details() {
            body["details"] = json!(details);
        }
        if let ApiError::MissingFields(fields) = self {
            body["missingFields"] = json!(fields);
        }
        body
    }
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    pub fn missing_fields(fields: Vec<String>) -> Self {
        ApiError::MissingFields(fields)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

/// Failures inside the forwarding pipeline, before they are mapped onto an HTTP answer.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Upstream URL cannot be a base: {0}")]
    NotABase(String),

    #[error("Missing path parameter: {0}")]
    MissingPathParam(String),

    #[error("Backend responded with status {0}")]
    UpstreamStatus(u16),

    #[error("Backend transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to translate payload: {0}")]
    Translation(#[from] serde_json::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.details() {
            Some(details) => write!(f, "{}: {}", self.message(), details),
            None => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
