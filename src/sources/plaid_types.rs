use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes the bridge reacts to. Everything else is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaidErrorCode {
    InvalidInstitution,
    InstitutionNotFound,
    ItemNotFound,
    InvalidAccessToken,
    InvalidPublicToken,
    RateLimitExceeded,
    Other(String),
}

impl PlaidErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            PlaidErrorCode::InvalidInstitution => "INVALID_INSTITUTION",
            PlaidErrorCode::InstitutionNotFound => "INSTITUTION_NOT_FOUND",
            PlaidErrorCode::ItemNotFound => "ITEM_NOT_FOUND",
            PlaidErrorCode::InvalidAccessToken => "INVALID_ACCESS_TOKEN",
            PlaidErrorCode::InvalidPublicToken => "INVALID_PUBLIC_TOKEN",
            PlaidErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            PlaidErrorCode::Other(code) => code,
        }
    }
}

impl From<&str> for PlaidErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "INVALID_INSTITUTION" => PlaidErrorCode::InvalidInstitution,
            "INSTITUTION_NOT_FOUND" => PlaidErrorCode::InstitutionNotFound,
            "ITEM_NOT_FOUND" => PlaidErrorCode::ItemNotFound,
            "INVALID_ACCESS_TOKEN" => PlaidErrorCode::InvalidAccessToken,
            "INVALID_PUBLIC_TOKEN" => PlaidErrorCode::InvalidPublicToken,
            "RATE_LIMIT_EXCEEDED" => PlaidErrorCode::RateLimitExceeded,
            other => PlaidErrorCode::Other(other.to_string()),
        }
    }
}

impl From<String> for PlaidErrorCode {
    fn from(code: String) -> Self {
        PlaidErrorCode::from(code.as_str())
    }
}

impl From<PlaidErrorCode> for String {
    fn from(code: PlaidErrorCode) -> Self {
        code.as_str().to_string()
    }
}

/// Error body returned by every Plaid endpoint on a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaidError {
    pub error_type: String,
    pub error_code: PlaidErrorCode,
    #[serde(default)]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl PlaidError {
    /// Fallback for error bodies that do not follow the documented shape.
    pub fn unparsed(body: &str) -> Self {
        Self {
            error_type: "API_ERROR".to_string(),
            error_code: PlaidErrorCode::Other("UNKNOWN".to_string()),
            error_message: body.to_string(),
            display_message: None,
            request_id: None,
        }
    }
}

impl fmt::Display for PlaidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.error_code.as_str(), self.error_type, self.error_message)
    }
}

/// Inbound request for a Link session.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkTokenRequest {
    #[serde(default)]
    pub user_id: String,
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    #[serde(default)]
    pub expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicTokenExchange {
    pub access_token: String,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub request_id: String,
}
