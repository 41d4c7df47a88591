use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashSet;

/// Cookies checked, in order, when the request carries no Authorization header
pub const TOKEN_COOKIES: &[&str] = &["auth_token", "token"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Cookie,
    None,
}

/// Credential attached to outbound calls. The gateway never validates it;
/// authorization belongs to the backend.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub authorization: Option<HeaderValue>,
    pub source: TokenSource,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self {
            authorization: None,
            source: TokenSource::None,
        }
    }

    /// Client-supplied Authorization headers win over the cookie.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if let Some(value) = headers.get(AUTHORIZATION) {
            return Self {
                authorization: Some(value.clone()),
                source: TokenSource::Header,
            };
        }

        let jar = CookieJar::from_headers(headers);
        let token = TOKEN_COOKIES
            .iter()
            .filter_map(|name| jar.get(name))
            .map(|c| c.value().trim().to_string())
            .find(|v| !v.is_empty());

        match token.and_then(|t| HeaderValue::from_str(&format!("Bearer {}", t)).ok()) {
            Some(value) => Self {
                authorization: Some(value),
                source: TokenSource::Cookie,
            },
            None => Self::anonymous(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.authorization.is_some()
    }

    /// Bearer token portion, if the credential uses the Bearer scheme
    pub fn bearer_token(&self) -> Option<&str> {
        let raw = self.authorization.as_ref()?.to_str().ok()?;
        extract_bearer_token(raw).ok()
    }
}

/// Extract Bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, String> {
    const BEARER_PREFIX: &str = "Bearer ";

    let token = auth_header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| "Authorization header must start with 'Bearer '".to_string())?
        .trim();

    if token.is_empty() {
        return Err("Bearer token is empty".to_string());
    }

    Ok(token)
}

/// Identity fields a session token may carry. Read without signature
/// verification, so only ever used to fill gaps in a backend answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UnverifiedClaims {
    pub sub: Option<String>,
    #[serde(alias = "userId", alias = "user_id", alias = "UniqueId")]
    pub uid: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UnverifiedClaims {
    pub fn user_id(&self) -> Option<&str> {
        self.uid.as_deref().or(self.sub.as_deref())
    }
}

/// Decode the payload segment of a JWT without checking its signature.
pub fn peek_claims(token: &str) -> Option<UnverifiedClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    match decode::<UnverifiedClaims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!("Could not read token payload: {}", e);
            None
        }
    }
}
