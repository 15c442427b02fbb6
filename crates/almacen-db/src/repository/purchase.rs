//! # Purchase Repository
//!
//! Replenishment history. Purchases record what was bought from which
//! supplier and at what cost; they never touch the stock ledger (the
//! arriving goods are registered separately as an `entrada` movement).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::{NewPurchase, Purchase};

/// Repository for purchase history operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Lists all purchases, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, product_id, supplier, purchase_price, purchase_date,
                   discount, expected_replenish_days
            FROM purchases
            ORDER BY purchase_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Lists purchases for one product, newest first.
    pub async fn list_for_product(&self, product_id: i64) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, product_id, supplier, purchase_price, purchase_date,
                   discount, expected_replenish_days
            FROM purchases
            WHERE product_id = ?1
            ORDER BY purchase_date DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Records a purchase and returns its generated id.
    pub async fn insert(&self, purchase: &NewPurchase) -> DbResult<i64> {
        debug!(product_id = purchase.product_id, "Recording purchase");

        let result = sqlx::query(
            r#"
            INSERT INTO purchases (
                product_id, supplier, purchase_price, purchase_date,
                discount, expected_replenish_days
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(purchase.product_id)
        .bind(&purchase.supplier)
        .bind(purchase.purchase_price)
        .bind(purchase.purchase_date)
        .bind(purchase.discount)
        .bind(purchase.expected_replenish_days)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Deletes a purchase.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Purchase doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting purchase");

        let result = sqlx::query("DELETE FROM purchases WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Compra", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use almacen_core::{NewProduct, NewPurchase};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_insert_and_list_for_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let product_id = db
            .products()
            .insert(&NewProduct {
                name: "Protein".to_string(),
                ..NewProduct::default()
            })
            .await
            .unwrap();

        let id = db
            .purchases()
            .insert(&NewPurchase {
                product_id,
                supplier: Some("Distribuidora Sur".to_string()),
                purchase_price: Some(32.5),
                purchase_date: NaiveDate::from_ymd_opt(2026, 8, 1),
                discount: None,
                expected_replenish_days: Some(14),
            })
            .await
            .unwrap();
        assert!(id > 0);

        let purchases = db.purchases().list_for_product(product_id).await.unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].supplier.as_deref(), Some("Distribuidora Sur"));

        // A purchase never moves stock.
        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.purchases().delete(42).await.is_err());
    }
}
