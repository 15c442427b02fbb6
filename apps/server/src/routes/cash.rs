//! Cash ledger endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;
use almacen_core::{validation, NewCashMovement};

/// GET /api/caja
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let movimientos = state.db.cash().list_all().await?;
    Ok(Json(json!({ "success": true, "movimientos": movimientos })))
}

/// POST /api/caja
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewCashMovement>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let kind = validation::validate_cash_movement(&payload)?;
    let movimiento = state.db.cash().insert(&payload, kind).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "movimiento": movimiento })),
    ))
}

/// DELETE /api/caja/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    state.db.cash().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
