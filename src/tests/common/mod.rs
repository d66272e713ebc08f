// src/tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::Json;
use reqwest::Client;
use serde_json::Value;

use crate::config::settings::{MetricsConfig, RecordsConfig, ServerConfig, SettingsConfig};
use crate::config::vendors::{LeanConfig, PlaidConfig, PlaidEnvironment, ServiceConfig};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// One request as seen by a fake vendor.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// Form-encoded body; values in these tests never need percent-decoding.
    pub fn form(&self) -> HashMap<String, String> {
        self.body
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.replace('+', " ")))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<RecordedRequest>>>);

impl Recorder {
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn push(&self, request: RecordedRequest) -> usize {
        let mut calls = self.0.lock().unwrap();
        calls.push(request);
        calls.len() - 1
    }
}

/// Builds the answer from the request and its zero-based call index.
pub type Responder = Arc<dyn Fn(&RecordedRequest, usize) -> (StatusCode, Value) + Send + Sync>;

/// Fake vendor answering every path through `responder` and recording each request.
pub async fn spawn_vendor_mock(responder: Responder) -> (JoinHandle<()>, SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new().fallback({
        let recorder = recorder.clone();
        move |req: Request| {
            let recorder = recorder.clone();
            let responder = responder.clone();
            async move {
                let (parts, body) = req.into_parts();
                let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
                let recorded = RecordedRequest {
                    method: parts.method.to_string(),
                    path: parts.uri.path().to_string(),
                    query: parts.uri.query().map(str::to_string),
                    authorization: parts
                        .headers
                        .get(axum::http::header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body: String::from_utf8_lossy(&bytes).to_string(),
                };
                let idx = recorder.push(recorded.clone());
                let (status, body) = responder(&recorded, idx);
                (status, Json(body))
            }
        }
    });
    let (handle, addr) = spawn_axum(router).await;
    (handle, addr, recorder)
}

/// OAuth token endpoint issuing `tok-<scope>-<n>` tokens valid for `expires_in` seconds.
pub fn token_responder(expires_in: u64) -> Responder {
    Arc::new(move |req: &RecordedRequest, idx: usize| {
        let scope = req.form().get("scope").cloned().unwrap_or_default();
        (
            StatusCode::OK,
            json!({
                "access_token": format!("tok-{}-{}", scope, idx),
                "token_type": "bearer",
                "expires_in": expires_in,
                "scope": scope,
            }),
        )
    })
}

pub fn service_config(
    lean_auth_url: &str,
    lean_api_url: &str,
    plaid_base_url: &str,
    records_path: Option<PathBuf>,
) -> ServiceConfig {
    ServiceConfig {
        settings: SettingsConfig {
            server: ServerConfig { host: "127.0.0.1".into(), port: "0".into() },
            logging: None,
            metrics: MetricsConfig { path: "/metrics".into(), is_enabled: true },
            records: match records_path {
                Some(path) => RecordsConfig { is_enabled: true, path: path.to_string_lossy().to_string() },
                None => RecordsConfig { is_enabled: false, path: String::new() },
            },
            http_timeout_ms: Some(5_000),
        },
        lean: LeanConfig {
            auth_url: lean_auth_url.to_string(),
            api_url: lean_api_url.to_string(),
            client_id: "lean-client".into(),
            client_secret: "lean-secret".into(),
            app_token: "lean-app-token".into(),
            sandbox: true,
            safety_margin_seconds: Some(0),
        },
        plaid: PlaidConfig {
            base_url: plaid_base_url.to_string(),
            environment: PlaidEnvironment::Sandbox,
            client_id: "plaid-client".into(),
            secret: "plaid-secret".into(),
            client_name: "Fin Bridge Test".into(),
            products: vec!["transactions".into()],
            country_codes: vec!["US".into()],
            language: "en".into(),
        },
    }
}

pub fn url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// Token endpoint URL on a recording mock.
pub fn token_url(addr: SocketAddr) -> String {
    format!("http://{}/oauth2/token", addr)
}

/// Base URL nothing listens on; any call to it fails.
pub const UNUSED_URL: &str = "http://127.0.0.1:9";
