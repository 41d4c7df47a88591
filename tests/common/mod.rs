#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::HeaderMap,
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use hive_gateway::{app, config::GatewayConfig, types::AppState};

pub const BYPASS_TOKEN: &str = "test-bypass-token";
pub const BEARER: &str = "Bearer test-session-token";

/// One request as the mock backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("recorded body is JSON")
    }
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.0.lock().expect("recorder lock").clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().expect("recorder lock").len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests().pop().expect("backend received no request")
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    recorder.0.lock().expect("recorder lock").push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body: bytes.to_vec(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

/// Start a mock backend; every request it serves is recorded.
pub async fn spawn_backend(router: Router) -> Result<(String, Recorder)> {
    let recorder = Recorder::default();
    let router = router.layer(from_fn_with_state(recorder.clone(), record));
    let url = serve(router).await?;
    Ok((url, recorder))
}

/// A URL nothing listens on
pub fn unreachable_url() -> String {
    let port = portpicker::pick_unused_port().expect("free port");
    format!("http://127.0.0.1:{}", port)
}

pub async fn spawn_gateway(config: GatewayConfig) -> Result<String> {
    let state = AppState::new(config)?;
    serve(app(state)).await
}

pub fn test_config(backend_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::for_backend(backend_url);
    config.backend.bypass_token = BYPASS_TOKEN.to_string();
    config
}

/// Gateway wired to a fresh mock backend
pub struct Harness {
    pub gateway: String,
    pub backend: Recorder,
    pub client: reqwest::Client,
}

impl Harness {
    pub async fn new(backend: Router) -> Result<Self> {
        Self::with_config(backend, |_| {}).await
    }

    pub async fn with_config(backend: Router, configure: impl FnOnce(&mut GatewayConfig)) -> Result<Self> {
        let (backend_url, recorder) = spawn_backend(backend).await?;
        let mut config = test_config(&backend_url);
        configure(&mut config);
        let gateway = spawn_gateway(config).await?;

        Ok(Self {
            gateway,
            backend: recorder,
            client: reqwest::Client::new(),
        })
    }

    /// Gateway whose backend and calendar service are both down
    pub async fn unreachable() -> Result<Self> {
        let gateway = spawn_gateway(test_config(&unreachable_url())).await?;
        Ok(Self {
            gateway,
            backend: Recorder::default(),
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.gateway, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).header("authorization", BEARER)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).header("authorization", BEARER)
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path)).header("authorization", BEARER)
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.patch(self.url(path)).header("authorization", BEARER)
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path)).header("authorization", BEARER)
    }
}
