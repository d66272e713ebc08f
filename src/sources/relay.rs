//! Shared send path for every outbound vendor call.
//!
//! Counts the request, observes its duration and counts failures by status,
//! so the per-vendor clients only deal with decoding.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::observability::metrics::get_metrics;

static TRANSPORT_MSG: &str = "transport";

#[derive(Debug)]
pub struct VendorResponse {
    pub status: StatusCode,
    pub body: String,
}

impl VendorResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as JSON; non-JSON bodies are kept as a string, empty bodies become `null`.
    pub fn json(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    pub fn decode<T: DeserializeOwned>(&self, what: &str) -> BridgeResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| BridgeError::Internal(anyhow::anyhow!("malformed {} response: {}", what, e)))
    }
}

pub async fn send(request: RequestBuilder, vendor: &'static str, operation: &'static str) -> BridgeResult<VendorResponse> {
    let metrics = get_metrics().await;
    let start = Instant::now();
    metrics.vendor_requests.with_label_values(&[vendor, operation]).inc();

    let result = async {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok::<_, reqwest::Error>(VendorResponse { status, body })
    }
    .await;

    metrics
        .vendor_duration
        .with_label_values(&[vendor, operation])
        .observe(start.elapsed().as_secs_f64());

    match result {
        Ok(response) => {
            debug!(vendor, operation, status = response.status.as_u16(), "vendor call finished");
            if !response.is_success() {
                warn!(vendor, operation, status = response.status.as_u16(), "vendor call failed");
                metrics
                    .vendor_failures
                    .with_label_values(&[vendor, operation, response.status.as_str()])
                    .inc();
            }
            Ok(response)
        }
        Err(err) => {
            warn!(vendor, operation, "vendor call transport error: {}", err);
            metrics
                .vendor_failures
                .with_label_values(&[vendor, operation, TRANSPORT_MSG])
                .inc();
            Err(BridgeError::Transport(err))
        }
    }
}
