//! # Almacén Client
//!
//! Typed client for the Almacén REST API: one capability surface over
//! a pluggable [`transport::ApiTransport`].
//!
//! ## Usage
//! ```rust,ignore
//! let client = ApiClient::new(Box::new(HttpTransport::new("http://localhost:3000")));
//! let session = client.login("admin", "secreto").await?;
//! let productos = client.get_products().await?;
//! ```

pub mod error;
pub mod transport;

pub use error::{ClientError, ClientResult};
pub use transport::{ApiTransport, HttpTransport, Method};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use almacen_core::{
    CashMovement, ExpiryAlert, LowStockAlert, MonthlySalesTotal, NewCashMovement, NewProduct,
    NewPurchase, NewSale, NewStockMovement, Product, ProductSalesTotal, Purchase, Sale,
    SaleRecord, StockMovement, User,
};

/// An authenticated session, as returned by login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// The typed API client.
pub struct ApiClient {
    transport: Box<dyn ApiTransport>,
}

impl ApiClient {
    /// Wraps a transport. The transport carries no token until
    /// [`ApiClient::login`] succeeds.
    pub fn new(transport: Box<dyn ApiTransport>) -> Self {
        ApiClient { transport }
    }

    fn field<T: DeserializeOwned>(envelope: Value, key: &str) -> ClientResult<T> {
        let value = envelope
            .get(key)
            .cloned()
            .ok_or_else(|| ClientError::Decode(format!("falta el campo '{key}'")))?;
        Ok(serde_json::from_value(value)?)
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Logs in and installs the issued token on the transport.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<Session> {
        let envelope = self
            .transport
            .call(
                Method::Post,
                "/api/usuarios/login",
                Some(json!({ "username": username, "password": password })),
            )
            .await?;

        let token: String = Self::field(envelope.clone(), "token")?;
        let user: User = Self::field(envelope, "usuario")?;

        self.transport.set_token(Some(token.clone()));
        Ok(Session { token, user })
    }

    /// Drops the session token.
    pub fn logout(&self) {
        self.transport.set_token(None);
    }

    // -------------------------------------------------------------------------
    // Products & Inventory
    // -------------------------------------------------------------------------

    pub async fn get_products(&self) -> ClientResult<Vec<Product>> {
        let envelope = self.transport.call(Method::Get, "/api/productos", None).await?;
        Self::field(envelope, "productos")
    }

    pub async fn get_product(&self, id: i64) -> ClientResult<Product> {
        let envelope = self
            .transport
            .call(Method::Get, &format!("/api/productos/{id}"), None)
            .await?;
        Self::field(envelope, "producto")
    }

    pub async fn create_product(&self, product: &NewProduct) -> ClientResult<i64> {
        let envelope = self
            .transport
            .call(Method::Post, "/api/productos", Some(serde_json::to_value(product)?))
            .await?;
        Self::field(envelope, "id")
    }

    pub async fn update_product(&self, id: i64, product: &NewProduct) -> ClientResult<()> {
        self.transport
            .call(
                Method::Put,
                &format!("/api/productos/{id}"),
                Some(serde_json::to_value(product)?),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.transport
            .call(Method::Delete, &format!("/api/productos/{id}"), None)
            .await?;
        Ok(())
    }

    pub async fn get_inventory(&self) -> ClientResult<Vec<Product>> {
        let envelope = self.transport.call(Method::Get, "/api/inventario", None).await?;
        Self::field(envelope, "inventario")
    }

    // -------------------------------------------------------------------------
    // Stock Ledger
    // -------------------------------------------------------------------------

    pub async fn record_movement(
        &self,
        movement: &NewStockMovement,
    ) -> ClientResult<StockMovement> {
        let envelope = self
            .transport
            .call(Method::Post, "/api/stock", Some(serde_json::to_value(movement)?))
            .await?;
        Self::field(envelope, "movimiento")
    }

    pub async fn get_movements(&self, producto_id: i64) -> ClientResult<Vec<StockMovement>> {
        let envelope = self
            .transport
            .call(Method::Get, &format!("/api/stock/{producto_id}"), None)
            .await?;
        Self::field(envelope, "movimientos")
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    pub async fn get_sales(&self) -> ClientResult<Vec<SaleRecord>> {
        let envelope = self.transport.call(Method::Get, "/api/ventas", None).await?;
        Self::field(envelope, "ventas")
    }

    pub async fn create_sale(&self, sale: &NewSale) -> ClientResult<Sale> {
        let envelope = self
            .transport
            .call(Method::Post, "/api/ventas", Some(serde_json::to_value(sale)?))
            .await?;
        Self::field(envelope, "venta")
    }

    pub async fn delete_sale(&self, id: i64) -> ClientResult<()> {
        self.transport
            .call(Method::Delete, &format!("/api/ventas/{id}"), None)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub async fn get_users(&self) -> ClientResult<Vec<User>> {
        let envelope = self.transport.call(Method::Get, "/api/usuarios", None).await?;
        Self::field(envelope, "usuarios")
    }

    // -------------------------------------------------------------------------
    // Alerts & Statistics
    // -------------------------------------------------------------------------

    pub async fn low_stock_alerts(&self) -> ClientResult<Vec<LowStockAlert>> {
        let envelope = self
            .transport
            .call(Method::Get, "/api/alertas/stock-bajo", None)
            .await?;
        Self::field(envelope, "alertas")
    }

    pub async fn expiry_alerts(&self) -> ClientResult<Vec<ExpiryAlert>> {
        let envelope = self
            .transport
            .call(Method::Get, "/api/alertas/vencimiento", None)
            .await?;
        Self::field(envelope, "alertas")
    }

    pub async fn sales_by_product(&self) -> ClientResult<Vec<ProductSalesTotal>> {
        let envelope = self
            .transport
            .call(Method::Get, "/api/estadisticas/ventas-producto", None)
            .await?;
        Self::field(envelope, "estadisticas")
    }

    pub async fn sales_by_month(&self) -> ClientResult<Vec<MonthlySalesTotal>> {
        let envelope = self
            .transport
            .call(Method::Get, "/api/estadisticas/ventas-mes", None)
            .await?;
        Self::field(envelope, "estadisticas")
    }

    // -------------------------------------------------------------------------
    // Purchases & Cash
    // -------------------------------------------------------------------------

    pub async fn get_purchases(&self) -> ClientResult<Vec<Purchase>> {
        let envelope = self.transport.call(Method::Get, "/api/compras", None).await?;
        Self::field(envelope, "compras")
    }

    pub async fn create_purchase(&self, purchase: &NewPurchase) -> ClientResult<i64> {
        let envelope = self
            .transport
            .call(Method::Post, "/api/compras", Some(serde_json::to_value(purchase)?))
            .await?;
        Self::field(envelope, "id")
    }

    pub async fn get_cash_movements(&self) -> ClientResult<Vec<CashMovement>> {
        let envelope = self.transport.call(Method::Get, "/api/caja", None).await?;
        Self::field(envelope, "movimientos")
    }

    pub async fn record_cash_movement(
        &self,
        movement: &NewCashMovement,
    ) -> ClientResult<CashMovement> {
        let envelope = self
            .transport
            .call(Method::Post, "/api/caja", Some(serde_json::to_value(movement)?))
            .await?;
        Self::field(envelope, "movimiento")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records calls and replays canned envelopes.
    struct MockTransport {
        responses: Mutex<Vec<ClientResult<Value>>>,
        calls: Mutex<Vec<(Method, String, Option<Value>)>>,
        token: Mutex<Option<String>>,
    }

    impl MockTransport {
        fn new(responses: Vec<ClientResult<Value>>) -> Self {
            MockTransport {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
                token: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ApiTransport for MockTransport {
        async fn call(
            &self,
            method: Method,
            path: &str,
            body: Option<Value>,
        ) -> ClientResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((method, path.to_string(), body));
            self.responses.lock().unwrap().remove(0)
        }

        fn set_token(&self, token: Option<String>) {
            *self.token.lock().unwrap() = token;
        }
    }

    #[tokio::test]
    async fn test_login_installs_token() {
        let transport = MockTransport::new(vec![Ok(json!({
            "success": true,
            "token": "jwt-abc",
            "usuario": {
                "id": 1,
                "username": "admin",
                "role": "Administrador",
                "fullname": null,
                "created_at": "2026-08-01T00:00:00Z",
                "updated_at": "2026-08-01T00:00:00Z"
            }
        }))]);
        let transport = std::sync::Arc::new(transport);
        let client = ApiClient::new(Box::new(ArcTransport(transport.clone())));

        let session = client.login("admin", "secreto").await.unwrap();
        assert_eq!(session.token, "jwt-abc");
        assert_eq!(session.user.username, "admin");
        assert_eq!(
            transport.token.lock().unwrap().as_deref(),
            Some("jwt-abc")
        );

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, Method::Post);
        assert_eq!(calls[0].1, "/api/usuarios/login");
    }

    /// Forwarding wrapper so tests can keep a handle on the mock.
    struct ArcTransport(std::sync::Arc<MockTransport>);

    #[async_trait]
    impl ApiTransport for ArcTransport {
        async fn call(
            &self,
            method: Method,
            path: &str,
            body: Option<Value>,
        ) -> ClientResult<Value> {
            self.0.call(method, path, body).await
        }

        fn set_token(&self, token: Option<String>) {
            self.0.set_token(token)
        }
    }

    #[tokio::test]
    async fn test_get_products_unwraps_envelope() {
        let transport = MockTransport::new(vec![Ok(json!({
            "success": true,
            "productos": [{
                "id": 1,
                "sku": null,
                "name": "Protein",
                "brand": null,
                "category": null,
                "sale_price": 49.99,
                "presentation": null,
                "flavor": null,
                "weight": null,
                "image_path": null,
                "expiry_date": null,
                "lot_number": null,
                "min_stock": null,
                "location": null,
                "status": null,
                "stock_real": 12,
                "created_at": "2026-08-01T00:00:00Z",
                "updated_at": "2026-08-01T00:00:00Z"
            }]
        }))]);
        let client = ApiClient::new(Box::new(transport));

        let productos = client.get_products().await.unwrap();
        assert_eq!(productos.len(), 1);
        assert_eq!(productos[0].name, "Protein");
        assert_eq!(productos[0].stock, 12);
    }

    #[tokio::test]
    async fn test_api_failure_surfaces_status_and_message() {
        let transport = MockTransport::new(vec![Err(ClientError::Api {
            status: 401,
            message: "Credenciales inválidas".to_string(),
        })]);
        let client = ApiClient::new(Box::new(transport));

        let err = client.login("admin", "mala").await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Credenciales"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_envelope_field_is_decode_error() {
        let transport = MockTransport::new(vec![Ok(json!({ "success": true }))]);
        let client = ApiClient::new(Box::new(transport));

        let err = client.get_products().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
