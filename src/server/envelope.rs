use axum::Json;
use serde_json::{json, Value};

use crate::error::BridgeResult;

/// `{success: true}`
pub fn ok() -> BridgeResult<Json<Value>> {
    Ok(Json(json!({ "success": true })))
}

/// `{success: true, data}` with the vendor payload relayed untouched.
pub fn ok_data(data: Value) -> BridgeResult<Json<Value>> {
    Ok(Json(json!({ "success": true, "data": data })))
}
