use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::sources::plaid_types::{PlaidError, PlaidErrorCode};

#[derive(Debug, Error)]
pub enum BridgeError {
    /// token endpoint answered with a non-2xx status
    #[error("token request failed with status {status}")]
    Auth { status: u16, body: String },

    /// customer creation succeeded but the vendor did not return an identifier
    #[error("customer provisioning failed: {0}")]
    Provision(String),

    #[error("{vendor} request failed with status {status}")]
    Vendor { vendor: &'static str, status: u16, body: Value },

    #[error("plaid request failed: {error}")]
    Plaid { status: u16, error: PlaidError },

    #[error("{0}")]
    Validation(String),

    #[error("{0} is disabled")]
    Disabled(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("records error: {0}")]
    Records(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// Rejects empty required request fields before any network call.
pub fn require(field: &str, value: &str) -> BridgeResult<()> {
    if value.trim().is_empty() {
        Err(BridgeError::missing_field(field))
    } else {
        Ok(())
    }
}

impl BridgeError {
    pub fn missing_field(field: &str) -> Self {
        BridgeError::Validation(format!("{} is required", field))
    }

    /// Typed Plaid error code, if this failure came from Plaid.
    pub fn plaid_code(&self) -> Option<&PlaidErrorCode> {
        match self {
            BridgeError::Plaid { error, .. } => Some(&error.error_code),
            _ => None,
        }
    }

    pub fn is_invalid_institution(&self) -> bool {
        matches!(self.plaid_code(), Some(PlaidErrorCode::InvalidInstitution))
    }
}

impl From<JsonRejection> for BridgeError {
    fn from(rejection: JsonRejection) -> Self {
        BridgeError::Validation(rejection.body_text())
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let (status, error_type, details) = match &self {
            BridgeError::Validation(_) => (StatusCode::BAD_REQUEST, None, None),
            BridgeError::Disabled(_) => (StatusCode::NOT_FOUND, None, None),
            BridgeError::Auth { status, body } => {
                tracing::error!(status, "token endpoint rejected client credentials");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Some("AUTH_FAILURE".to_string()),
                    Some(json!({ "status": status, "body": body })),
                )
            }
            BridgeError::Provision(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("PROVISION_FAILURE".to_string()),
                None,
            ),
            BridgeError::Vendor { status, body, .. } => (
                StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                None,
                Some(body.clone()),
            ),
            BridgeError::Plaid { error, .. } => {
                let status = match error.error_code {
                    PlaidErrorCode::InvalidInstitution => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let error_type = match error.error_code {
                    PlaidErrorCode::InvalidInstitution => "INVALID_INSTITUTION",
                    _ => "SERVER_ERROR",
                };
                (status, Some(error_type.to_string()), Some(json!(error)))
            }
            BridgeError::Transport(e) => {
                tracing::error!("vendor transport error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
            BridgeError::Records(e) => {
                tracing::error!("connection log error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
            BridgeError::Internal(e) => {
                tracing::error!("internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
        };

        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let Some(error_type) = error_type {
            body["error_type"] = Value::String(error_type);
        }
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}
