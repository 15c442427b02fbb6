//! Product catalog endpoints.
//!
//! `/api/inventario` is served from the same listing as
//! `/api/productos`: with the denormalized balance there is no
//! separate fold-on-read path.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use almacen_core::{validation, NewProduct};

/// GET /api/productos
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let productos = state.db.products().list_all().await?;
    Ok(Json(json!({ "success": true, "productos": productos })))
}

/// GET /api/inventario
pub async fn inventory(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let inventario = state.db.products().list_all().await?;
    Ok(Json(json!({ "success": true, "inventario": inventario })))
}

/// GET /api/productos/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    let producto = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Producto no encontrado: {id}")))?;

    Ok(Json(json!({ "success": true, "producto": producto })))
}

/// POST /api/productos
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validation::validate_product(&payload)?;
    let id = state.db.products().insert(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": id })),
    ))
}

/// PUT /api/productos/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NewProduct>,
) -> ApiResult<Json<Value>> {
    validation::validate_product(&payload)?;
    state.db.products().update(id, &payload).await?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/productos/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    state.db.products().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}
