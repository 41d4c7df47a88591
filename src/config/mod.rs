use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    /// Verbose request/response body logging
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub calendar_url: String,
    /// Value sent in `x-vercel-protection-bypass` on every outbound call
    #[serde(skip_serializing)]
    pub bypass_token: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub permissive_cors: bool,
}

pub const BYPASS_HEADER: &str = "x-vercel-protection-bypass";

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") | Ok("preview") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides();

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("BACKEND_API_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = env::var("CALENDAR_SERVICE_URL") {
            self.backend.calendar_url = v;
        }
        if let Ok(v) = env::var("PROTECTION_BYPASS_TOKEN") {
            self.backend.bypass_token = v;
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().ok();
        }

        if let Some(port) = env::var("GATEWAY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        if let Ok(v) = env::var("GATEWAY_DEBUG").or_else(|_| env::var("DEBUG_MODE")) {
            self.debug = parse_flag(&v).unwrap_or(self.debug);
        }

        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            self.security.permissive_cors = false;
        }

        self
    }

    /// Reject unusable URLs at startup rather than on the first request.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.backend.base_url).context("Invalid BACKEND_API_URL")?;
        Url::parse(&self.backend.calendar_url).context("Invalid CALENDAR_SERVICE_URL")?;
        for origin in &self.security.cors_origins {
            Url::parse(origin).with_context(|| format!("Invalid origin in SECURITY_CORS_ORIGINS: {}", origin))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                base_url: "http://localhost:8080/api".to_string(),
                calendar_url: "http://localhost:8081".to_string(),
                bypass_token: String::new(),
                timeout_secs: None,
            },
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                permissive_cors: true,
            },
            debug: true,
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                base_url: "https://staging-api.hive.example.com/api".to_string(),
                calendar_url: "https://staging-calendar.hive.example.com".to_string(),
                bypass_token: String::new(),
                timeout_secs: None,
            },
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.hive.example.com".to_string()],
                permissive_cors: false,
            },
            debug: false,
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                base_url: "https://api.hive.example.com/api".to_string(),
                calendar_url: "https://calendar.hive.example.com".to_string(),
                bypass_token: String::new(),
                timeout_secs: None,
            },
            server: ServerConfig { port: 3000 },
            security: SecurityConfig {
                cors_origins: vec!["https://app.hive.example.com".to_string()],
                permissive_cors: false,
            },
            debug: false,
        }
    }

    /// Development preset pointed at the given backend; used by tests and local tooling.
    pub fn for_backend(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let mut config = Self::development();
        config.backend.calendar_url = base_url.clone();
        config.backend.base_url = base_url;
        config.debug = false;
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
