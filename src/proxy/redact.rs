use serde_json::Value;

const SECRET_KEYS: &[&str] = &[
    "password",
    "newpassword",
    "currentpassword",
    "token",
    "accesstoken",
    "refreshtoken",
    "idtoken",
    "authorization",
];

/// Copy of `value` safe for debug logs: secret-looking keys are masked at any depth.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let masked = if is_secret(k) {
                        Value::String("[REDACTED]".to_string())
                    } else {
                        redact(v)
                    };
                    (k.clone(), masked)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

fn is_secret(key: &str) -> bool {
    let key = key.to_ascii_lowercase().replace(['_', '-'], "");
    SECRET_KEYS.contains(&key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_nested_secrets() {
        let body = json!({
            "email": "ada@example.com",
            "password": "hunter2",
            "session": { "access_token": "abc", "expiresIn": 3600 },
            "items": [{ "refreshToken": "def" }]
        });

        let safe = redact(&body);
        assert_eq!(safe["email"], "ada@example.com");
        assert_eq!(safe["password"], "[REDACTED]");
        assert_eq!(safe["session"]["access_token"], "[REDACTED]");
        assert_eq!(safe["session"]["expiresIn"], 3600);
        assert_eq!(safe["items"][0]["refreshToken"], "[REDACTED]");
    }
}
