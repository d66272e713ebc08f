use serde::{Deserialize, Serialize};

use crate::config::settings::SettingsConfig;
use crate::utils::constants::DEFAULT_SAFETY_MARGIN_SECS;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub lean: LeanConfig,
    pub plaid: PlaidConfig,
}

/// ================================
/// Lean (OAuth2 client credentials)
/// ================================
#[derive(Deserialize, Clone)]
pub struct LeanConfig {
    /// token endpoint, e.g. https://auth.sandbox.sa.leantech.me/oauth2/token
    pub auth_url: String,
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// public application token handed to the browser SDK
    pub app_token: String,
    #[serde(default)]
    pub sandbox: bool,
    pub safety_margin_seconds: Option<u64>,
}

impl LeanConfig {
    pub fn safety_margin_seconds(&self) -> u64 {
        self.safety_margin_seconds.unwrap_or(DEFAULT_SAFETY_MARGIN_SECS)
    }
}

/// ================================
/// Plaid (secret in request body)
/// ================================
#[derive(Deserialize, Clone)]
pub struct PlaidConfig {
    pub base_url: String,
    pub environment: PlaidEnvironment,
    pub client_id: String,
    pub secret: String,
    pub client_name: String,
    pub products: Vec<String>,
    pub country_codes: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    Sandbox,
    Development,
    Production,
}

// Secrets stay out of `{:?}` output, which ends up in logs.
impl std::fmt::Debug for LeanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeanConfig")
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("sandbox", &self.sandbox)
            .field("safety_margin_seconds", &self.safety_margin_seconds)
            .finish()
    }
}

impl std::fmt::Debug for PlaidConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidConfig")
            .field("base_url", &self.base_url)
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .field("secret", &"***")
            .field("products", &self.products)
            .field("country_codes", &self.country_codes)
            .finish()
    }
}

fn default_language() -> String {
    "en".to_string()
}
