use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::BridgeResult;
use crate::server::envelope::{ok, ok_data};
use crate::server::server::AppState;
use crate::sources::lean_types::{BalancesQuery, TransactionsQuery};
use crate::workflow::initialize_customer::{get_tokens_for_customer, initialize_customer};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/initialize-customer", post(handle_initialize_customer))
        .route("/api/get-customer-tokens", post(handle_get_customer_tokens))
        .route("/api/accounts", post(handle_accounts))
        .route("/api/balances", post(handle_balances))
        .route("/api/transactions", post(handle_transactions))
        .route("/api/consents", post(handle_list_consents))
        .route("/api/consents/delete", post(handle_delete_consent))
}

#[derive(Debug, Deserialize)]
struct InitializeCustomerRequest {
    #[serde(default)]
    app_user_id: String,
}

#[derive(Debug, Deserialize)]
struct CustomerRequest {
    #[serde(default)]
    customer_id: String,
}

#[derive(Debug, Deserialize)]
struct EntityRequest {
    #[serde(default)]
    entity_id: String,
}

#[derive(Debug, Deserialize)]
struct ConsentsRequest {
    #[serde(default)]
    customer_id: String,
    #[serde(default)]
    entity_id: String,
}

#[derive(Debug, Deserialize)]
struct DeleteConsentRequest {
    #[serde(default)]
    customer_id: String,
    #[serde(default)]
    entity_id: String,
    #[serde(default)]
    consent_id: String,
    reason: Option<String>,
}

async fn handle_initialize_customer(
    State(state): State<AppState>,
    payload: Result<Json<InitializeCustomerRequest>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(request) = payload?;
    let session = initialize_customer(&state.lean, &request.app_user_id).await.result?;

    Ok(Json(json!({
        "success": true,
        "customer_id": session.customer_id,
        "access_token": session.customer_token.value,
        "token_scope": session.customer_token.granted_scope,
        "token_expires_in": session.customer_token.expires_in,
    })))
}

async fn handle_get_customer_tokens(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRequest>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(request) = payload?;
    let session = get_tokens_for_customer(&state.lean, &request.customer_id).await.result?;

    Ok(Json(json!({
        "success": true,
        "access_token": session.customer_token.value,
        "token_scope": session.customer_token.granted_scope,
        "token_expires_in": session.customer_token.expires_in,
    })))
}

async fn handle_accounts(
    State(state): State<AppState>,
    payload: Result<Json<EntityRequest>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(request) = payload?;
    ok_data(state.lean.list_accounts(&request.entity_id).await?)
}

async fn handle_balances(
    State(state): State<AppState>,
    payload: Result<Json<BalancesQuery>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(query) = payload?;
    ok_data(state.lean.get_balances(&query).await?)
}

async fn handle_transactions(
    State(state): State<AppState>,
    payload: Result<Json<TransactionsQuery>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(query) = payload?;
    ok_data(state.lean.get_transactions(&query).await?)
}

async fn handle_list_consents(
    State(state): State<AppState>,
    payload: Result<Json<ConsentsRequest>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(request) = payload?;
    ok_data(state.lean.list_consents(&request.customer_id, &request.entity_id).await?)
}

async fn handle_delete_consent(
    State(state): State<AppState>,
    payload: Result<Json<DeleteConsentRequest>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(request) = payload?;
    state
        .lean
        .delete_consent(
            &request.customer_id,
            &request.entity_id,
            &request.consent_id,
            request.reason.as_deref(),
        )
        .await?;
    ok()
}
