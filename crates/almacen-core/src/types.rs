//! # Domain Types
//!
//! Core domain types used throughout Almacén.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  StockMovement  │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  sku (unique)   │   │  kind           │   │  product_id     │       │
//! │  │  name           │   │  quantity       │   │  quantity       │       │
//! │  │  stock (proj.)  │   │  delta (signed) │   │  sale_price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  MovementKind   │   │  CashMovement   │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Entrada        │   │  Ingreso        │   │  username       │       │
//! │  │  Salida         │   │  Egreso         │   │  password_hash  │       │
//! │  │  Ajuste         │   └─────────────────┘   │  role           │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The wire vocabulary stays Spanish where the original API was Spanish
//! (`tipo_movimiento`, `cantidad`, `stock_real`); serde renames map it
//! onto English struct fields that match the column names.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Movement Kind
// =============================================================================

/// The kind of a stock movement.
///
/// - `Entrada` - ingress, adds `quantity` to the balance
/// - `Salida`  - egress, subtracts `quantity` from the balance
/// - `Ajuste`  - adjustment, sets the balance to `quantity` (absolute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entrada,
    Salida,
    Ajuste,
}

impl MovementKind {
    /// The allowed wire values, used in validation error messages.
    pub const ALLOWED: [&'static str; 3] = ["entrada", "salida", "ajuste"];

    /// Parses a wire value. Returns `None` for anything outside the set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "entrada" => Some(MovementKind::Entrada),
            "salida" => Some(MovementKind::Salida),
            "ajuste" => Some(MovementKind::Ajuste),
            _ => None,
        }
    }

    /// The wire value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entrada => "entrada",
            MovementKind::Salida => "salida",
            MovementKind::Ajuste => "ajuste",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cash Movement Kind
// =============================================================================

/// The direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CashKind {
    Ingreso,
    Egreso,
}

impl CashKind {
    pub const ALLOWED: [&'static str; 2] = ["ingreso", "egreso"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ingreso" => Some(CashKind::Ingreso),
            "egreso" => Some(CashKind::Egreso),
            _ => None,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalogued product.
///
/// `stock` is the denormalized balance: a projection of the movement
/// ledger, maintained only inside movement transactions. It is exposed
/// on the wire as `stock_real`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub sale_price: Option<f64>,
    pub presentation: Option<String>,
    pub flavor: Option<String>,
    pub weight: Option<String>,
    pub image_path: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub lot_number: Option<String>,
    pub min_stock: Option<i64>,
    pub location: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "stock_real")]
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or fully updating a product.
///
/// The balance is never set through this type; it only moves through
/// the stock ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub sku: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub sale_price: Option<f64>,
    pub presentation: Option<String>,
    pub flavor: Option<String>,
    pub weight: Option<String>,
    pub image_path: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub lot_number: Option<String>,
    pub min_stock: Option<i64>,
    pub location: Option<String>,
    pub status: Option<String>,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// A ledger entry recording a quantity change for a product.
///
/// `delta` is the signed effect on the balance, captured when the
/// movement was applied. For `ajuste` movements the delta is
/// `quantity - stock_before`, so replaying deltas reproduces the
/// projected balance exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "tipo_movimiento")]
    pub kind: MovementKind,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    pub delta: i64,
    #[serde(rename = "motivo")]
    pub note: Option<String>,
    pub created_by: Option<i64>,
    #[serde(rename = "fecha")]
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a stock movement.
///
/// `tipo_movimiento` arrives as a raw string so that an invalid kind is
/// rejected with a 400 and a readable message rather than a
/// deserialization failure. Missing fields default and are caught by
/// validation for the same reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewStockMovement {
    pub producto_id: i64,
    pub tipo_movimiento: String,
    pub cantidad: i64,
    pub motivo: Option<String>,
    pub user_id: Option<i64>,
}

// =============================================================================
// Sale
// =============================================================================

/// A sales-ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub sale_price: f64,
    pub discount: Option<f64>,
    pub channel: Option<String>,
    pub sale_date: NaiveDate,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// A sale joined with product and seller names, for listings and
/// reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleRecord {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub sale_price: f64,
    pub discount: Option<f64>,
    pub channel: Option<String>,
    pub sale_date: NaiveDate,
    pub created_by: i64,
    /// NULL when the product was hard-deleted (orphaned sale).
    pub product_name: Option<String>,
    /// NULL when the user was deleted.
    pub vendedor: Option<String>,
}

/// Payload for registering a sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    pub sale_price: f64,
    pub discount: Option<f64>,
    pub channel: Option<String>,
    /// Defaults to today when omitted.
    pub sale_date: Option<NaiveDate>,
    pub created_by: i64,
}

// =============================================================================
// Cash Movement
// =============================================================================

/// A cash-ledger row (ingresos/egresos de caja).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: i64,
    #[serde(rename = "movement_type")]
    pub kind: CashKind,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub movement_date: NaiveDate,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a cash movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCashMovement {
    pub movement_type: String,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub movement_date: Option<NaiveDate>,
    pub created_by: Option<i64>,
}

// =============================================================================
// User
// =============================================================================

/// An application user.
///
/// The password hash never leaves the server; it is skipped on
/// serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    // Never serialized; defaults to empty when parsing API responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub fullname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a user. The plaintext password is hashed by
/// the server before it reaches the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: String,
    pub fullname: Option<String>,
}

/// Payload for updating a user. A `None` password keeps the current
/// hash.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUser {
    pub username: String,
    pub password: Option<String>,
    pub role: String,
    pub fullname: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Purchase
// =============================================================================

/// A purchase row. Write-mostly: recorded for replenishment history,
/// never folded into the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: i64,
    pub product_id: i64,
    pub supplier: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub discount: Option<f64>,
    pub expected_replenish_days: Option<i64>,
}

/// Payload for recording a purchase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPurchase {
    pub product_id: i64,
    pub supplier: Option<String>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub discount: Option<f64>,
    pub expected_replenish_days: Option<i64>,
}

// =============================================================================
// Alerts & Statistics
// =============================================================================

/// A low-stock alert row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LowStockAlert {
    pub id: i64,
    pub nombre: String,
    pub stock: i64,
    pub min_stock: i64,
}

/// An expiry alert row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ExpiryAlert {
    pub id: i64,
    pub nombre: String,
    pub expiry_date: NaiveDate,
}

/// Units sold per product, for statistics and the general report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSalesTotal {
    /// NULL when the product was hard-deleted.
    pub producto: Option<String>,
    pub total: i64,
}

/// Units sold per calendar month ("YYYY-MM"). Lexicographic order on
/// `mes` is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MonthlySalesTotal {
    pub mes: String,
    pub total: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_kind_parse() {
        assert_eq!(MovementKind::parse("entrada"), Some(MovementKind::Entrada));
        assert_eq!(MovementKind::parse("salida"), Some(MovementKind::Salida));
        assert_eq!(MovementKind::parse("ajuste"), Some(MovementKind::Ajuste));
        assert_eq!(MovementKind::parse("ingreso"), None);
        assert_eq!(MovementKind::parse("ENTRADA"), None);
    }

    #[test]
    fn test_movement_kind_roundtrip() {
        for raw in MovementKind::ALLOWED {
            assert_eq!(MovementKind::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_product_serializes_stock_as_stock_real() {
        let product = Product {
            id: 1,
            sku: None,
            name: "Protein".into(),
            brand: None,
            category: None,
            sale_price: Some(49.99),
            presentation: None,
            flavor: None,
            weight: None,
            image_path: None,
            expiry_date: None,
            lot_number: None,
            min_stock: None,
            location: None,
            status: None,
            stock: 12,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["stock_real"], 12);
        assert!(json.get("stock").is_none());
    }

    #[test]
    fn test_user_never_serializes_password_hash() {
        let user = User {
            id: 1,
            username: "admin".into(),
            password_hash: "$argon2id$...".into(),
            role: "Administrador".into(),
            fullname: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
