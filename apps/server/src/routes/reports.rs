//! PDF report endpoints.
//!
//! Three reports: current inventory, the sales ledger, and a general
//! report combining inventory, per-product totals, and alerts.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;

use crate::error::ApiResult;
use crate::pdf::{self, Section};
use crate::state::AppState;

fn pdf_response(filename: &str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
}

/// GET /api/reportes/inventario/pdf
pub async fn inventory_pdf(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let productos = state.db.products().list_all().await?;

    let rows = productos
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.sku.clone().unwrap_or_default(),
                p.stock.to_string(),
                p.min_stock.map(|m| m.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    let bytes = pdf::render_table(
        "Reporte de Inventario",
        &["Producto", "SKU", "Stock", "Stock mínimo"],
        rows,
    )?;

    Ok(pdf_response("reporte_inventario.pdf", bytes))
}

/// GET /api/reportes/ventas/pdf
pub async fn sales_pdf(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let ventas = state.db.sales().list_all().await?;

    let rows = ventas
        .iter()
        .map(|v| {
            vec![
                v.sale_date.to_string(),
                v.product_name.clone().unwrap_or_default(),
                v.quantity.to_string(),
                format!("{:.2}", v.sale_price),
                v.vendedor.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let bytes = pdf::render_table(
        "Reporte de Ventas",
        &["Fecha", "Producto", "Cantidad", "Precio", "Vendedor"],
        rows,
    )?;

    Ok(pdf_response("reporte_ventas.pdf", bytes))
}

/// GET /api/reportes/general/pdf
pub async fn general_pdf(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let productos = state.db.products().list_all().await?;
    let por_producto = state.db.stats().sales_by_product().await?;
    let stock_bajo = state.db.products().low_stock_alerts().await?;
    let vencimientos = state
        .db
        .products()
        .expiry_alerts(Utc::now().date_naive())
        .await?;

    let sections = vec![
        Section {
            heading: "Inventario".to_string(),
            headers: vec!["Producto".to_string(), "Stock".to_string()],
            rows: productos
                .iter()
                .map(|p| vec![p.name.clone(), p.stock.to_string()])
                .collect(),
        },
        Section {
            heading: "Ventas por producto".to_string(),
            headers: vec!["Producto".to_string(), "Unidades".to_string()],
            rows: por_producto
                .iter()
                .map(|t| {
                    vec![
                        t.producto.clone().unwrap_or_else(|| "(eliminado)".to_string()),
                        t.total.to_string(),
                    ]
                })
                .collect(),
        },
        Section {
            heading: "Alertas de stock bajo".to_string(),
            headers: vec![
                "Producto".to_string(),
                "Stock".to_string(),
                "Mínimo".to_string(),
            ],
            rows: stock_bajo
                .iter()
                .map(|a| {
                    vec![
                        a.nombre.clone(),
                        a.stock.to_string(),
                        a.min_stock.to_string(),
                    ]
                })
                .collect(),
        },
        Section {
            heading: "Próximos vencimientos".to_string(),
            headers: vec!["Producto".to_string(), "Vence".to_string()],
            rows: vencimientos
                .iter()
                .map(|a| vec![a.nombre.clone(), a.expiry_date.to_string()])
                .collect(),
        },
    ];

    let bytes = pdf::render_report("Reporte General", &sections)?;

    Ok(pdf_response("reporte_general.pdf", bytes))
}
