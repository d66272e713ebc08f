use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::{BridgeError, BridgeResult};
use crate::records::connection_log::{ConnectionLog, ConnectionRecord};
use crate::server::envelope::ok_data;
use crate::server::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/connections", get(handle_list).post(handle_append))
}

fn connection_log(state: &AppState) -> BridgeResult<&ConnectionLog> {
    state.records.as_ref().ok_or(BridgeError::Disabled("connection log"))
}

async fn handle_append(
    State(state): State<AppState>,
    payload: Result<Json<ConnectionRecord>, JsonRejection>,
) -> BridgeResult<Json<Value>> {
    let log = connection_log(&state)?;
    let Json(record) = payload?;
    let stored = log.append(record).await?;
    Ok(Json(json!({ "success": true, "created_at": stored.created_at })))
}

async fn handle_list(State(state): State<AppState>) -> BridgeResult<Json<Value>> {
    let records = connection_log(&state)?.list().await?;
    ok_data(json!(records))
}
