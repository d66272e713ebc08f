use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::config::vendors::{PlaidEnvironment, ServiceConfig};
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::records::connection_log::ConnectionLog;
use crate::server::{routes_lean, routes_plaid, routes_records};
use crate::sources::lean::LeanClient;
use crate::sources::plaid::PlaidClient;

/// Non-secret values the browser SDKs are allowed to see.
#[derive(Debug, Clone, Serialize)]
pub struct PublicConfig {
    pub lean: PublicLeanConfig,
    pub plaid: PublicPlaidConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicLeanConfig {
    pub app_token: String,
    pub sandbox: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPlaidConfig {
    pub environment: PlaidEnvironment,
}

#[derive(Clone)]
pub struct AppState {
    pub lean: LeanClient,
    pub plaid: PlaidClient,
    pub records: Option<ConnectionLog>,
    pub public_config: Arc<PublicConfig>,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub async fn new(service_config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(service_config.settings.http_timeout_ms()))
            .build()?;
        Self::with_client(service_config, client).await
    }

    pub async fn with_client(service_config: &ServiceConfig, client: Client) -> Result<Self> {
        let metrics = get_metrics().await;
        let records = &service_config.settings.records;

        Ok(Self {
            lean: LeanClient::new(client.clone(), &service_config.lean),
            plaid: PlaidClient::new(client, &service_config.plaid),
            records: records.is_enabled.then(|| ConnectionLog::new(&records.path)),
            public_config: Arc::new(PublicConfig {
                lean: PublicLeanConfig {
                    app_token: service_config.lean.app_token.clone(),
                    sandbox: service_config.lean.sandbox,
                },
                plaid: PublicPlaidConfig {
                    environment: service_config.plaid.environment,
                },
            }),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        })
    }
}

/// Full route table. Dispatch is by exact path and method only.
pub fn router(state: AppState, settings_config: &SettingsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/config", get(public_config))
        .merge(routes_lean::router())
        .merge(routes_plaid::router())
        .merge(routes_records::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

pub async fn start(settings_config: &SettingsConfig, state: AppState) -> Result<()> {
    let app = router(state, settings_config);
    let bind_addr = settings_config.server.bind_addr();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {}", bind_addr);
    get_metrics().await.up.set(1);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    get_metrics().await.up.set(0);
    info!("server stopped");
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn public_config(axum::extract::State(state): axum::extract::State<AppState>) -> Json<PublicConfig> {
    Json(state.public_config.as_ref().clone())
}

async fn shutdown_signal() {
    let (mut sigint, mut sigterm) = match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        _ => {
            tracing::error!("failed to install signal handlers, shutdown only on process kill");
            return std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        _ = sigint.recv() => info!("Received SIGINT (Ctrl+C). Initiating graceful shutdown..."),
        _ = sigterm.recv() => info!("Received SIGTERM. Initiating graceful shutdown..."),
    }
}
