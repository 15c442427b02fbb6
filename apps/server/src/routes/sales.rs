//! Sales ledger endpoints, including the CSV export.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use almacen_core::{validation, NewSale};

/// GET /api/ventas
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let ventas = state.db.sales().list_all().await?;
    Ok(Json(json!({ "success": true, "ventas": ventas })))
}

/// POST /api/ventas
///
/// Registers the sale and its ledger egress in one transaction.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewSale>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validation::validate_sale(&payload)?;
    let venta = state.db.sales().create(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "venta": venta })),
    ))
}

/// DELETE /api/ventas/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Value>> {
    state.db.sales().delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/ventas/csv
///
/// The csv crate handles quoting: a product named `Smith, Jr.` renders
/// as `"Smith, Jr."`.
pub async fn export_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let ventas = state.db.sales().list_all().await?;

    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record([
            "id",
            "producto",
            "cantidad",
            "precio",
            "descuento",
            "canal",
            "fecha",
            "vendedor",
        ])
        .map_err(|e| ApiError::Internal(format!("CSV write error: {e}")))?;

    for venta in &ventas {
        writer
            .write_record([
                venta.id.to_string(),
                venta.product_name.clone().unwrap_or_default(),
                venta.quantity.to_string(),
                format!("{:.2}", venta.sale_price),
                venta.discount.map(|d| format!("{d:.2}")).unwrap_or_default(),
                venta.channel.clone().unwrap_or_default(),
                venta.sale_date.to_string(),
                venta.vendedor.clone().unwrap_or_default(),
            ])
            .map_err(|e| ApiError::Internal(format!("CSV write error: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV flush error: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ventas.csv\"",
            ),
        ],
        bytes,
    ))
}
