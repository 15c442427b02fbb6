//! # Route Modules
//!
//! Router assembly for the REST surface.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Surface                                     │
//! │                                                                         │
//! │  open        /health, POST /api/usuarios/login                         │
//! │                                                                         │
//! │  protected   (bearer token, verified server-side)                       │
//! │  ├── /api/productos, /api/inventario      catalog + balances           │
//! │  ├── /api/stock                           movement ledger              │
//! │  ├── /api/ventas (+ /csv)                 sales ledger                 │
//! │  ├── /api/usuarios                        user CRUD                    │
//! │  ├── /api/alertas/…                       low stock, expiry            │
//! │  ├── /api/estadisticas/…                  aggregates                   │
//! │  ├── /api/reportes/…/pdf                  PDF attachments              │
//! │  └── /api/compras, /api/caja              purchases, cash              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod cash;
pub mod health;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod stats;
pub mod stock;
pub mod users;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::auth;
use crate::state::AppState;

/// Builds the full application router.
pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/productos", get(products::list).post(products::create))
        .route(
            "/api/productos/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/inventario", get(products::inventory))
        .route("/api/stock", post(stock::create))
        .route("/api/stock/{producto_id}", get(stock::movements))
        .route("/api/ventas", get(sales::list).post(sales::create))
        .route("/api/ventas/csv", get(sales::export_csv))
        .route("/api/ventas/{id}", delete(sales::delete))
        .route("/api/usuarios", get(users::list).post(users::create))
        .route(
            "/api/usuarios/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/api/alertas/stock-bajo", get(alerts::low_stock))
        .route("/api/alertas/vencimiento", get(alerts::expiry))
        .route(
            "/api/estadisticas/ventas-producto",
            get(stats::sales_by_product),
        )
        .route("/api/estadisticas/ventas-mes", get(stats::sales_by_month))
        .route("/api/reportes/inventario/pdf", get(reports::inventory_pdf))
        .route("/api/reportes/ventas/pdf", get(reports::sales_pdf))
        .route("/api/reportes/general/pdf", get(reports::general_pdf))
        .route("/api/compras", get(purchases::list).post(purchases::create))
        .route("/api/compras/{id}", delete(purchases::delete))
        .route("/api/caja", get(cash::list).post(cash::create))
        .route("/api/caja/{id}", delete(cash::delete))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health::check))
        .route("/api/usuarios/login", post(users::login))
        .merge(protected)
        .with_state(state)
}

// =============================================================================
// Router Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::config::AppConfig;
    use almacen_core::NewUser;
    use almacen_db::{Database, DbConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> (Router, AppState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let hash = hash_password("secreto123").unwrap();
        db.users()
            .insert(
                &NewUser {
                    username: "admin".to_string(),
                    password: "secreto123".to_string(),
                    role: "Administrador".to_string(),
                    fullname: None,
                },
                &hash,
            )
            .await
            .unwrap();

        let config = AppConfig {
            port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_lifetime_secs: 3600,
        };
        let state = AppState::new(db, config);
        (api_router(state.clone()), state)
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/usuarios/login",
                None,
                Some(json!({ "username": "admin", "password": "secreto123" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        body["token"].as_str().unwrap().to_string()
    }

    fn request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(request("GET", "/api/productos", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(request(
                "POST",
                "/api/usuarios/login",
                None,
                Some(json!({ "username": "admin", "password": "incorrecta" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_product_lifecycle_and_stock_entry() {
        let (app, _) = test_app().await;
        let token = login(&app).await;

        // Create returns 201 with a numeric id.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/productos",
                Some(&token),
                Some(json!({ "name": "Protein", "sale_price": 49.99 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let id = body["id"].as_i64().unwrap();
        assert!(id > 0);

        // Fresh product reports stock_real 0.
        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/productos/{id}"),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["producto"]["stock_real"], 0);

        // An entrada of 50 moves the balance to 50.
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/stock",
                Some(&token),
                Some(json!({
                    "producto_id": id,
                    "tipo_movimiento": "entrada",
                    "cantidad": 50
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/api/productos/{id}"),
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["producto"]["stock_real"], 50);
    }

    #[tokio::test]
    async fn test_invalid_movement_kind_is_400_with_no_row() {
        let (app, state) = test_app().await;
        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/productos",
                Some(&token),
                Some(json!({ "name": "Protein" })),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/stock",
                Some(&token),
                Some(json!({
                    "producto_id": id,
                    "tipo_movimiento": "transferencia",
                    "cantidad": 5
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("tipo_movimiento"));

        // Nothing was inserted.
        assert_eq!(state.db.stock().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_product_name_is_400() {
        let (app, _) = test_app().await;
        let token = login(&app).await;

        let response = app
            .oneshot(request(
                "POST",
                "/api/productos",
                Some(&token),
                Some(json!({ "sale_price": 9.99 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_409() {
        let (app, _) = test_app().await;
        let token = login(&app).await;

        let payload = json!({
            "username": "admin",
            "password": "otra",
            "role": "Vendedor"
        });
        let response = app
            .oneshot(request("POST", "/api/usuarios", Some(&token), Some(payload)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_sales_csv_quotes_commas() {
        let (app, state) = test_app().await;
        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/productos",
                Some(&token),
                Some(json!({ "name": "Smith, Jr." })),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        app.clone()
            .oneshot(request(
                "POST",
                "/api/stock",
                Some(&token),
                Some(json!({
                    "producto_id": id,
                    "tipo_movimiento": "entrada",
                    "cantidad": 10
                })),
            ))
            .await
            .unwrap();

        let admin = state.db.users().get_by_username("admin").await.unwrap().unwrap();
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/ventas",
                Some(&token),
                Some(json!({
                    "product_id": id,
                    "quantity": 2,
                    "sale_price": 19.99,
                    "created_by": admin.id
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request("GET", "/api/ventas/csv", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .unwrap()
                .to_str()
                .unwrap(),
            "attachment; filename=\"ventas.csv\""
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("\"Smith, Jr.\""));
    }

    #[tokio::test]
    async fn test_sale_beyond_stock_is_400() {
        let (app, state) = test_app().await;
        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/productos",
                Some(&token),
                Some(json!({ "name": "Protein" })),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let admin = state.db.users().get_by_username("admin").await.unwrap().unwrap();
        let response = app
            .oneshot(request(
                "POST",
                "/api/ventas",
                Some(&token),
                Some(json!({
                    "product_id": id,
                    "quantity": 1,
                    "sale_price": 10.0,
                    "created_by": admin.id
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_inventory_report_is_pdf_attachment() {
        let (app, _) = test_app().await;
        let token = login(&app).await;

        let response = app
            .oneshot(request(
                "GET",
                "/api/reportes/inventario/pdf",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
