use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::vendors::{PlaidConfig, PlaidEnvironment};
use crate::error::{require, BridgeError, BridgeResult};
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::RetrySettings;
use crate::sources::plaid_types::{ItemRemoved, LinkToken, LinkTokenRequest, PlaidError, PublicTokenExchange};
use crate::sources::relay::{self, VendorResponse};
use crate::utils::constants::VENDOR_PLAID;

/// Plaid API client. Credentials are injected into every request body.
#[derive(Clone)]
pub struct PlaidClient {
    client: Client,
    base_url: String,
    environment: PlaidEnvironment,
    client_id: String,
    secret: String,
    client_name: String,
    products: Vec<String>,
    country_codes: Vec<String>,
    language: String,
}

#[derive(Serialize)]
struct Authenticated<'a, T: Serialize> {
    client_id: &'a str,
    secret: &'a str,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct LinkTokenCreateBody<'a> {
    client_name: &'a str,
    user: LinkUser<'a>,
    products: &'a [String],
    country_codes: &'a [String],
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    institution_id: Option<&'a str>,
}

#[derive(Serialize)]
struct LinkUser<'a> {
    client_user_id: &'a str,
}

#[derive(Serialize)]
struct PublicTokenBody<'a> {
    public_token: &'a str,
}

#[derive(Serialize)]
struct AccessTokenBody<'a> {
    access_token: &'a str,
}

impl PlaidClient {
    pub fn new(client: Client, cfg: &PlaidConfig) -> Self {
        Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            environment: cfg.environment,
            client_id: cfg.client_id.clone(),
            secret: cfg.secret.clone(),
            client_name: cfg.client_name.clone(),
            products: cfg.products.clone(),
            country_codes: cfg.country_codes.clone(),
            language: cfg.language.clone(),
        }
    }

    pub fn environment(&self) -> PlaidEnvironment {
        self.environment
    }

    /// Create a Link token, pre-selecting `institution_id` when given.
    ///
    /// When Plaid rejects the institution with `INVALID_INSTITUTION` the call is
    /// repeated once without it. The second result is final. Any other error is
    /// returned as is.
    pub async fn create_link_token(&self, request: &LinkTokenRequest) -> BridgeResult<LinkToken> {
        require("user_id", &request.user_id)?;
        let institution_id = request.institution_id.as_deref().filter(|id| !id.is_empty());

        RetrySettings::once()
            .run_with_retry_if(
                |attempt| async move {
                    if attempt > 1 {
                        get_metrics().await.link_token_retries.inc();
                        info!(user_id = %request.user_id, "retrying link token creation without institution");
                    }
                    let institution_id = if attempt == 1 { institution_id } else { None };
                    self.link_token_create(&request.user_id, institution_id).await
                },
                |err: &BridgeError| institution_id.is_some() && err.is_invalid_institution(),
            )
            .await
    }

    async fn link_token_create(&self, user_id: &str, institution_id: Option<&str>) -> BridgeResult<LinkToken> {
        let body = LinkTokenCreateBody {
            client_name: &self.client_name,
            user: LinkUser { client_user_id: user_id },
            products: &self.products,
            country_codes: &self.country_codes,
            language: &self.language,
            institution_id,
        };
        self.call("/link/token/create", "create_link_token", body).await
    }

    pub async fn exchange_public_token(&self, public_token: &str) -> BridgeResult<PublicTokenExchange> {
        require("public_token", public_token)?;
        let exchange: PublicTokenExchange = self
            .call("/item/public_token/exchange", "exchange_public_token", PublicTokenBody { public_token })
            .await?;
        info!(item_id = %exchange.item_id, "public token exchanged");
        Ok(exchange)
    }

    pub async fn get_accounts(&self, access_token: &str) -> BridgeResult<Value> {
        require("access_token", access_token)?;
        self.call("/accounts/get", "get_accounts", AccessTokenBody { access_token }).await
    }

    pub async fn remove_item(&self, access_token: &str) -> BridgeResult<ItemRemoved> {
        require("access_token", access_token)?;
        let removed: ItemRemoved = self.call("/item/remove", "remove_item", AccessTokenBody { access_token }).await?;
        info!(request_id = %removed.request_id, "item removed");
        Ok(removed)
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, path: &str, operation: &'static str, body: B) -> BridgeResult<T> {
        let body = Authenticated {
            client_id: &self.client_id,
            secret: &self.secret,
            body,
        };
        let request = self.client.post(format!("{}{}", self.base_url, path)).json(&body);
        let response = relay::send(request, VENDOR_PLAID, operation).await?;
        decode_plaid(response, operation)
    }
}

fn decode_plaid<T: DeserializeOwned>(response: VendorResponse, operation: &str) -> BridgeResult<T> {
    if response.is_success() {
        return response.decode(operation);
    }

    let error = serde_json::from_str::<PlaidError>(&response.body).unwrap_or_else(|e| {
        warn!("unexpected plaid error body for {}: {}", operation, e);
        PlaidError::unparsed(&response.body)
    });
    Err(BridgeError::Plaid {
        status: response.status.as_u16(),
        error,
    })
}

impl std::fmt::Debug for PlaidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidClient")
            .field("base_url", &self.base_url)
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
