use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::token::{AccessToken, TokenScope};
use crate::cache::token_cache::TokenCache;
use crate::config::vendors::LeanConfig;
use crate::error::{require, BridgeError, BridgeResult};
use crate::helpers::time::{check_rfc3339, today, transactions_window};
use crate::observability::metrics::get_metrics;
use crate::sources::lean_types::{
    BalancesBody, BalancesOptions, BalancesQuery, CreateCustomerBody, Customer, RevokeConsentBody,
    TransactionsBody, TransactionsQuery,
};
use crate::sources::oauth2::TokenIssuer;
use crate::sources::relay::{self, VendorResponse};
use crate::utils::constants::{DEFAULT_CONSENT_REVOKE_REASON, VENDOR_LEAN};

/// Lean API client: token lifecycle, customer provisioning and the data/consent pass-through calls.
#[derive(Debug, Clone)]
pub struct LeanClient {
    client: Client,
    api_url: String,
    issuer: TokenIssuer,
    cache: TokenCache,
}

impl LeanClient {
    pub fn new(client: Client, cfg: &LeanConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(client.clone(), cfg),
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            cache: TokenCache::new(cfg.safety_margin_seconds()),
            client,
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    // -------------------------------
    // Token lifecycle
    // -------------------------------

    /// Cached token for `scope`, fetched again once it is missing or expired.
    pub async fn get_valid_token(&self, scope: &TokenScope) -> BridgeResult<AccessToken> {
        if let Some(token) = self.cache.get(scope).await {
            debug!(scope = %scope, "token cache hit");
            get_metrics().await.token_cache_hits.with_label_values(&[scope.kind()]).inc();
            return Ok(token);
        }

        let token = self.issuer.issue(scope).await?;
        self.cache.set(token.clone()).await;
        Ok(token)
    }

    /// Customer-scoped token, always freshly issued and never cached.
    pub async fn get_customer_token(&self, customer_id: &str) -> BridgeResult<AccessToken> {
        require("customer_id", customer_id)?;
        self.issuer.issue(&TokenScope::customer(customer_id)).await
    }

    // -------------------------------
    // Provisioning
    // -------------------------------

    pub async fn create_customer(&self, app_user_id: &str) -> BridgeResult<Customer> {
        require("app_user_id", app_user_id)?;
        let token = self.get_valid_token(&TokenScope::Api).await?;

        let request = self
            .client
            .post(self.url("/customers/v1"))
            .bearer_auth(&token.value)
            .json(&CreateCustomerBody { app_user_id });
        let body = relay_json(relay::send(request, VENDOR_LEAN, "create_customer").await?)?;

        let customer_id = body
            .get("customer_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BridgeError::Provision("response did not contain a customer_id".to_string()))?;

        info!(customer_id, "customer created");
        Ok(Customer {
            customer_id: customer_id.to_string(),
            app_user_id: body
                .get("app_user_id")
                .and_then(Value::as_str)
                .unwrap_or(app_user_id)
                .to_string(),
        })
    }

    // -------------------------------
    // Accounts / data
    // -------------------------------

    pub async fn list_accounts(&self, entity_id: &str) -> BridgeResult<Value> {
        require("entity_id", entity_id)?;
        let token = self.get_valid_token(&TokenScope::Api).await?;

        let request = self
            .client
            .get(self.url("/data/v2/accounts"))
            .bearer_auth(&token.value)
            .query(&[("entity_id", entity_id)]);
        relay_json(relay::send(request, VENDOR_LEAN, "list_accounts").await?)
    }

    pub async fn get_balances(&self, query: &BalancesQuery) -> BridgeResult<Value> {
        require("entity_id", &query.entity_id)?;
        let min_last_updated_datetime = match query.min_last_updated_datetime.as_deref() {
            Some(value) => Some(check_rfc3339(value).ok_or_else(|| {
                BridgeError::Validation(format!("min_last_updated_datetime '{}' is not an ISO-8601 timestamp", value))
            })?),
            None => None,
        };
        let token = self.get_valid_token(&TokenScope::Api).await?;

        let body = BalancesBody {
            entity_id: &query.entity_id,
            account_ids: query.account_ids.as_deref().filter(|ids| !ids.is_empty()),
            options: BalancesOptions { min_last_updated_datetime },
        };
        let request = self.client.post(self.url("/data/v2/balances")).bearer_auth(&token.value).json(&body);
        relay_json(relay::send(request, VENDOR_LEAN, "get_balances").await?)
    }

    pub async fn get_transactions(&self, query: &TransactionsQuery) -> BridgeResult<Value> {
        require("entity_id", &query.entity_id)?;
        require("account_id", &query.account_id)?;
        let (from_date, to_date) = transactions_window(query.from_date, query.to_date, today())
            .ok_or_else(|| BridgeError::Validation("to_date is out of the supported date range".to_string()))?;
        if from_date > to_date {
            return Err(BridgeError::Validation(format!(
                "from_date {} is after to_date {}",
                from_date, to_date
            )));
        }
        let token = self.get_valid_token(&TokenScope::Api).await?;

        let body = TransactionsBody {
            entity_id: &query.entity_id,
            account_id: &query.account_id,
            from_date,
            to_date,
        };
        let request = self.client.post(self.url("/data/v2/transactions")).bearer_auth(&token.value).json(&body);
        relay_json(relay::send(request, VENDOR_LEAN, "get_transactions").await?)
    }

    // -------------------------------
    // Consents
    // -------------------------------

    pub async fn list_consents(&self, customer_id: &str, entity_id: &str) -> BridgeResult<Value> {
        require("customer_id", customer_id)?;
        require("entity_id", entity_id)?;
        let token = self.get_valid_token(&TokenScope::Api).await?;

        let request = self
            .client
            .get(self.consents_url(customer_id, entity_id))
            .bearer_auth(&token.value);
        relay_json(relay::send(request, VENDOR_LEAN, "list_consents").await?)
    }

    pub async fn delete_consent(
        &self,
        customer_id: &str,
        entity_id: &str,
        consent_id: &str,
        reason: Option<&str>,
    ) -> BridgeResult<()> {
        require("customer_id", customer_id)?;
        require("entity_id", entity_id)?;
        require("consent_id", consent_id)?;
        let token = self.get_valid_token(&TokenScope::Api).await?;

        let reason = reason.filter(|r| !r.is_empty()).unwrap_or(DEFAULT_CONSENT_REVOKE_REASON);
        let url = format!("{}/{}", self.consents_url(customer_id, entity_id), consent_id);
        let request = self
            .client
            .delete(url)
            .bearer_auth(&token.value)
            .json(&RevokeConsentBody { reason });
        relay_json(relay::send(request, VENDOR_LEAN, "delete_consent").await?)?;

        info!(customer_id, entity_id, consent_id, reason, "consent revoked");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn consents_url(&self, customer_id: &str, entity_id: &str) -> String {
        self.url(&format!("/customers/v1/{}/entities/{}/consents", customer_id, entity_id))
    }
}

fn relay_json(response: VendorResponse) -> BridgeResult<Value> {
    if response.is_success() {
        Ok(response.json())
    } else {
        Err(BridgeError::Vendor {
            vendor: VENDOR_LEAN,
            status: response.status.as_u16(),
            body: response.json(),
        })
    }
}
