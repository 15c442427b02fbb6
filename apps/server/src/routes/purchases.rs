//! Purchase history endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;
use almacen_core::{validation, NewPurchase};

/// GET /api/compras
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let compras = state.db.purchases().list_all().await?;
    Ok(Json(json!({ "success": true, "compras": compras })))
}

/// POST /api/compras
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewPurchase>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validation::validate_id("product_id", payload.product_id)?;
    if let Some(price) = payload.purchase_price {
        validation::validate_amount("purchase_price", price)?;
    }

    let id = state.db.purchases().insert(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}

/// DELETE /api/compras/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    state.db.purchases().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
