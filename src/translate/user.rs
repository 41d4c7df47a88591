use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::UnverifiedClaims;

use super::de_opt_id;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatUser {
    #[serde(deserialize_with = "de_id")]
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyUser {
    #[serde(deserialize_with = "de_id")]
    pub unique_id: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Every user layout the backend has been seen to answer with
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserPayload {
    /// `{ "user": { "id", ... }, ... }`
    Wrapped { user: UserRecord },
    /// `{ "userId", ... }`
    Flat(FlatUser),
    /// `{ "UniqueId", ... }`
    Legacy(LegacyUser),
    /// `{ "id", ... }`
    Bare(UserRecord),
}

/// The one user shape handed to the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserPayload {
    pub fn parse(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn normalize(self) -> UserProfile {
        match self {
            UserPayload::Wrapped { user } | UserPayload::Bare(user) => UserProfile {
                id: user.id,
                email: user.email,
                name: user.name,
            },
            UserPayload::Flat(u) => UserProfile {
                id: Some(u.user_id),
                email: u.email,
                name: u.name,
            },
            UserPayload::Legacy(u) => UserProfile {
                id: Some(u.unique_id),
                email: u.email_address,
                name: u.full_name,
            },
        }
    }
}

impl UserProfile {
    /// Fill absent fields from token claims; present fields are never overridden.
    pub fn backfill(&mut self, claims: &UnverifiedClaims) -> Vec<&'static str> {
        let mut filled = Vec::new();
        if self.id.is_none() {
            if let Some(id) = claims.user_id() {
                self.id = Some(id.to_string());
                filled.push("id");
            }
        }
        if self.email.is_none() && claims.email.is_some() {
            self.email = claims.email.clone();
            filled.push("email");
        }
        if self.name.is_none() && claims.name.is_some() {
            self.name = claims.name.clone();
            filled.push("name");
        }
        filled
    }

    fn merge_into(&self, target: &mut Map<String, Value>) {
        let fields = [("id", &self.id), ("email", &self.email), ("name", &self.name)];
        for (key, value) in fields {
            if let Some(v) = value {
                target.insert(key.to_string(), Value::String(v.clone()));
            }
        }
    }
}

/// Login/register answers: ensure a `user` object with a resolved id.
pub fn attach_profile(value: Value) -> Value {
    let profile = match UserPayload::parse(&value) {
        Some(payload) => payload.normalize(),
        None => return value,
    };
    if profile.id.is_none() {
        return value;
    }

    let mut root = match value {
        Value::Object(map) => map,
        other => return other,
    };
    let mut user = match root.remove("user") {
        Some(Value::Object(existing)) => existing,
        _ => Map::new(),
    };
    profile.merge_into(&mut user);
    root.insert("user".to_string(), Value::Object(user));
    Value::Object(root)
}

/// Current-user answer: normalize and fill gaps from the session token.
pub fn profile_with_backfill(value: Value, claims: Option<&UnverifiedClaims>) -> Value {
    let mut profile = UserPayload::parse(&value).map(UserPayload::normalize).unwrap_or_default();

    if let Some(claims) = claims {
        let filled = profile.backfill(claims);
        if !filled.is_empty() {
            tracing::debug!(fields = ?filled, "Backfilled user fields from unverified token payload");
        }
    }

    let mut root = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    match root.get_mut("user") {
        Some(Value::Object(user)) => profile.merge_into(user),
        _ => profile.merge_into(&mut root),
    }

    Value::Object(root)
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    de_opt_id(deserializer)?.ok_or_else(|| serde::de::Error::custom("null identifier"))
}
