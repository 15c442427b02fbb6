//! Stock ledger endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;
use almacen_core::NewStockMovement;

/// POST /api/stock
///
/// The repository validates the raw payload before any SQL: an unknown
/// kind or non-positive quantity is a 400 with nothing inserted.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewStockMovement>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let movimiento = state.db.stock().record_movement(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "movimiento": movimiento })),
    ))
}

/// GET /api/stock/{producto_id}
pub async fn movements(
    State(state): State<AppState>,
    Path(producto_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let movimientos = state.db.stock().movements_for_product(producto_id).await?;
    Ok(Json(json!({ "success": true, "movimientos": movimientos })))
}
