//! Alert endpoints: low stock and approaching expiry.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/alertas/stock-bajo
pub async fn low_stock(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let alertas = state.db.products().low_stock_alerts().await?;
    Ok(Json(json!({ "success": true, "alertas": alertas })))
}

/// GET /api/alertas/vencimiento
pub async fn expiry(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let today = Utc::now().date_naive();
    let alertas = state.db.products().expiry_alerts(today).await?;
    Ok(Json(json!({ "success": true, "alertas": alertas })))
}
