//! # Product Repository
//!
//! Database operations for the product catalog, plus the two alert
//! queries that read directly off the projected balance.
//!
//! ## Key Operations
//! - CRUD (hard delete; history rows are left behind on purpose)
//! - Low-stock and expiry alert queries
//!
//! The `stock` column is never written here: it only moves through
//! [`crate::repository::stock::StockRepository`] transactions.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::{ExpiryAlert, LowStockAlert, NewProduct, Product, EXPIRY_ALERT_WINDOW_DAYS};

const PRODUCT_COLUMNS: &str = "id, sku, name, brand, category, sale_price, presentation, \
     flavor, weight, image_path, expiry_date, lot_number, min_stock, location, status, \
     stock, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product with its projected balance, sorted by name.
    ///
    /// This also serves `GET /api/inventario`: with the single stock
    /// model there is no separate fold-on-read path, the balance is
    /// already on the row.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns its generated id.
    ///
    /// The balance starts at 0; it only changes through the stock
    /// ledger.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - SKU already exists
    pub async fn insert(&self, product: &NewProduct) -> DbResult<i64> {
        debug!(name = %product.name, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                sku, name, brand, category, sale_price, presentation,
                flavor, weight, image_path, expiry_date, lot_number,
                min_stock, location, status, stock, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, 0, ?15, ?15
            )
            "#,
        )
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.sale_price)
        .bind(&product.presentation)
        .bind(&product.flavor)
        .bind(&product.weight)
        .bind(&product.image_path)
        .bind(product.expiry_date)
        .bind(&product.lot_number)
        .bind(product.min_stock)
        .bind(&product.location)
        .bind(&product.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Fully updates a product row (all catalog fields; the balance is
    /// untouched).
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Product doesn't exist
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<()> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                sku = ?2,
                name = ?3,
                brand = ?4,
                category = ?5,
                sale_price = ?6,
                presentation = ?7,
                flavor = ?8,
                weight = ?9,
                image_path = ?10,
                expiry_date = ?11,
                lot_number = ?12,
                min_stock = ?13,
                location = ?14,
                status = ?15,
                updated_at = ?16
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.category)
        .bind(product.sale_price)
        .bind(&product.presentation)
        .bind(&product.flavor)
        .bind(&product.weight)
        .bind(&product.image_path)
        .bind(product.expiry_date)
        .bind(&product.lot_number)
        .bind(product.min_stock)
        .bind(&product.location)
        .bind(&product.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Producto", id));
        }

        Ok(())
    }

    /// Hard-deletes a product.
    ///
    /// Movement and sale rows that reference it are NOT touched: they
    /// stay behind as orphans so the history remains auditable.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Product doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Producto", id));
        }

        Ok(())
    }

    /// Low-stock alerts: products with a configured minimum whose
    /// balance is at or below it. Products with NULL `min_stock` are
    /// never flagged.
    pub async fn low_stock_alerts(&self) -> DbResult<Vec<LowStockAlert>> {
        let alerts = sqlx::query_as::<_, LowStockAlert>(
            r#"
            SELECT id, name AS nombre, stock, min_stock
            FROM products
            WHERE min_stock IS NOT NULL AND stock <= min_stock
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Expiry alerts: products whose expiry date falls within
    /// `[today, today + 15]`, inclusive. Date strings compare
    /// lexicographically, which for ISO dates is chronological.
    pub async fn expiry_alerts(&self, today: NaiveDate) -> DbResult<Vec<ExpiryAlert>> {
        let limit = today + chrono::Duration::days(EXPIRY_ALERT_WINDOW_DAYS);

        let alerts = sqlx::query_as::<_, ExpiryAlert>(
            r#"
            SELECT id, name AS nombre, expiry_date
            FROM products
            WHERE expiry_date IS NOT NULL
              AND expiry_date >= ?1
              AND expiry_date <= ?2
            ORDER BY expiry_date
            "#,
        )
        .bind(today)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
