use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::cache::token::{AccessToken, TokenScope};
use crate::config::vendors::LeanConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::helpers::time::now;
use crate::observability::metrics::get_metrics;
use crate::sources::relay;
use crate::utils::constants::{GRANT_TYPE_CLIENT_CREDENTIALS, VENDOR_LEAN};

/// OAuth2 client-credentials exchange against the vendor's token endpoint.
#[derive(Clone)]
pub struct TokenIssuer {
    client: Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    scope: Option<String>,
}

impl TokenIssuer {
    pub fn new(client: Client, cfg: &LeanConfig) -> Self {
        Self {
            client,
            auth_url: cfg.auth_url.clone(),
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
        }
    }

    pub async fn issue(&self, scope: &TokenScope) -> BridgeResult<AccessToken> {
        let scope_value = scope.to_string();
        let form = [
            ("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope_value.as_str()),
        ];

        get_metrics().await.token_fetches.with_label_values(&[scope.kind()]).inc();
        let issued_at = now();
        let response = relay::send(self.client.post(&self.auth_url).form(&form), VENDOR_LEAN, "token").await?;

        if !response.is_success() {
            return Err(BridgeError::Auth {
                status: response.status.as_u16(),
                body: response.body,
            });
        }

        let token: TokenResponse = response.decode("token")?;
        let expires_in = token.expires_in;
        let issued = AccessToken::new(token.access_token, scope.clone(), token.scope, expires_in, issued_at)
            .ok_or_else(|| {
                BridgeError::Internal(anyhow::anyhow!("malformed token response: expires_in {} is out of range", expires_in))
            })?;
        info!(scope = %scope, expires_in, "issued access token");
        Ok(issued)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
