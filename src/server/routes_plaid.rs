use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::error::BridgeResult;
use crate::server::server::AppState;
use crate::sources::plaid_types::{ItemRemoved, LinkToken, LinkTokenRequest, PublicTokenExchange};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/plaid/create-link-token", post(handle_create_link_token))
        .route("/api/plaid/exchange-public-token", post(handle_exchange_public_token))
        .route("/api/plaid/accounts", post(handle_accounts))
        .route("/api/plaid/remove-item", post(handle_remove_item))
}

#[derive(Debug, Deserialize)]
struct PublicTokenRequest {
    #[serde(default)]
    public_token: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenRequest {
    #[serde(default)]
    access_token: String,
}

async fn handle_create_link_token(
    State(state): State<AppState>,
    payload: Result<Json<LinkTokenRequest>, JsonRejection>,
) -> BridgeResult<Json<LinkToken>> {
    let Json(request) = payload?;
    Ok(Json(state.plaid.create_link_token(&request).await?))
}

async fn handle_exchange_public_token(
    State(state): State<AppState>,
    payload: Result<Json<PublicTokenRequest>, JsonRejection>,
) -> BridgeResult<Json<PublicTokenExchange>> {
    let Json(request) = payload?;
    Ok(Json(state.plaid.exchange_public_token(&request.public_token).await?))
}

async fn handle_accounts(
    State(state): State<AppState>,
    payload: Result<Json<AccessTokenRequest>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let Json(request) = payload?;
    Ok(Json(state.plaid.get_accounts(&request.access_token).await?))
}

async fn handle_remove_item(
    State(state): State<AppState>,
    payload: Result<Json<AccessTokenRequest>, JsonRejection>,
) -> BridgeResult<Json<ItemRemoved>> {
    let Json(request) = payload?;
    Ok(Json(state.plaid.remove_item(&request.access_token).await?))
}
