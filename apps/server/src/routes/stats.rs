//! Statistics endpoints over the sales ledger.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/estadisticas/ventas-producto
pub async fn sales_by_product(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let estadisticas = state.db.stats().sales_by_product().await?;
    Ok(Json(json!({ "success": true, "estadisticas": estadisticas })))
}

/// GET /api/estadisticas/ventas-mes
pub async fn sales_by_month(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let estadisticas = state.db.stats().sales_by_month().await?;
    Ok(Json(json!({ "success": true, "estadisticas": estadisticas })))
}
