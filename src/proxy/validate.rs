use std::collections::HashMap;

use serde_json::Value;

use crate::error::ApiError;

use super::RouteSpec;

/// Character-count bounds for a body field, checked on create and update alike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRule {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
    pub error: &'static str,
    pub details: &'static str,
}

pub const TITLE_LENGTH: LengthRule = LengthRule {
    field: "title",
    min: 1,
    max: 256,
    error: "Invalid title length",
    details: "Title must be between 1 and 256 characters",
};

pub const NOTE_TEXT_LENGTH: LengthRule = LengthRule {
    field: "text",
    min: 1,
    max: 2000,
    error: "Invalid note length",
    details: "Note text must be between 1 and 2000 characters",
};

impl LengthRule {
    /// Absent fields pass; present ones must be strings within bounds.
    pub fn check(&self, body: Option<&Value>) -> Result<(), ApiError> {
        let value = match body.and_then(|b| b.get(self.field)) {
            None => return Ok(()),
            Some(v) => v,
        };

        let within = value
            .as_str()
            .map(|s| s.chars().count())
            .is_some_and(|len| len >= self.min && len <= self.max);

        if within {
            Ok(())
        } else {
            Err(ApiError::bad_request(self.error, self.details))
        }
    }
}

fn query_missing(query: &HashMap<String, String>, name: &str) -> bool {
    query.get(name).map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn body_missing(body: Option<&Value>, name: &str) -> bool {
    matches!(body.and_then(|b| b.get(name)), None | Some(Value::Null))
}

/// Every missing query parameter and body field, in declaration order.
pub fn missing_fields(spec: &RouteSpec, query: &HashMap<String, String>, body: Option<&Value>) -> Vec<String> {
    let mut missing = missing_query(spec, query);

    for name in &spec.required_body {
        if body_missing(body, name) && !missing.iter().any(|m| m == name) {
            missing.push(name.to_string());
        }
    }

    missing
}

fn missing_query(spec: &RouteSpec, query: &HashMap<String, String>) -> Vec<String> {
    spec.required_query
        .iter()
        .filter(|name| query_missing(query, name))
        .map(|name| name.to_string())
        .collect()
}

/// Presence first, then length rules. Runs before any network call.
pub fn validate_json(spec: &RouteSpec, query: &HashMap<String, String>, body: Option<&Value>) -> Result<(), ApiError> {
    let missing = missing_fields(spec, query, body);
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(missing));
    }

    for rule in &spec.length_rules {
        rule.check(body)?;
    }

    Ok(())
}

/// Multipart uploads declare their required fields as part names.
pub fn validate_parts(spec: &RouteSpec, query: &HashMap<String, String>, part_names: &[String]) -> Result<(), ApiError> {
    let mut missing = missing_query(spec, query);

    for name in &spec.required_body {
        if !part_names.iter().any(|p| p == name) && !missing.iter().any(|m| m == name) {
            missing.push(name.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::missing_fields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_task() -> RouteSpec {
        RouteSpec::post("tasks.create", "/api/tasks", "/tasks")
            .require_body(&["title", "accountId", "userId"])
            .limit(TITLE_LENGTH)
    }

    #[test]
    fn lists_every_missing_field() {
        let spec = RouteSpec::get("tasks.list", "/api/tasks", "/tasks").require_query(&["accountId", "userId"]);
        let mut query = HashMap::new();
        query.insert("accountId".to_string(), "  ".to_string());

        assert_eq!(missing_fields(&spec, &query, None), vec!["accountId", "userId"]);
    }

    #[test]
    fn null_body_field_counts_as_missing() {
        let body = json!({ "title": "Plan", "accountId": null });
        let err = validate_json(&create_task(), &HashMap::new(), Some(&body)).unwrap_err();
        assert_eq!(err, ApiError::missing_fields(vec!["accountId".into(), "userId".into()]));
    }

    #[test]
    fn empty_title_fails_length_rule() {
        let body = json!({ "title": "", "accountId": "a", "userId": "u" });
        let err = validate_json(&create_task(), &HashMap::new(), Some(&body)).unwrap_err();
        assert_eq!(err.message(), "Invalid title length");
        assert_eq!(err.details().as_deref(), Some("Title must be between 1 and 256 characters"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let title: String = "é".repeat(256);
        assert!(TITLE_LENGTH.check(Some(&json!({ "title": title }))).is_ok());

        let too_long: String = "a".repeat(257);
        assert!(TITLE_LENGTH.check(Some(&json!({ "title": too_long }))).is_err());
    }

    #[test]
    fn non_string_value_fails_rule() {
        assert!(NOTE_TEXT_LENGTH.check(Some(&json!({ "text": 42 }))).is_err());
        assert!(NOTE_TEXT_LENGTH.check(Some(&json!({ "other": 42 }))).is_ok());
        assert!(NOTE_TEXT_LENGTH.check(None).is_ok());
    }

    #[test]
    fn multipart_checks_part_names() {
        let spec = RouteSpec::post("files.upload", "/api/files", "/files")
            .multipart()
            .require_body(&["file", "accountId", "userId"]);
        let parts = vec!["file".to_string(), "userId".to_string()];

        let err = validate_parts(&spec, &HashMap::new(), &parts).unwrap_err();
        assert_eq!(err, ApiError::missing_fields(vec!["accountId".into()]));
    }
}
