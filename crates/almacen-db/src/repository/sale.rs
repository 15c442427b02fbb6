//! # Sale Repository
//!
//! The sales ledger. Registering a sale is the second write path into
//! the stock ledger: the sale row, its `salida` movement, and the
//! balance update all land in the same transaction, so a sale can
//! never exist without its stock effect.
//!
//! Deleting a sale does NOT compensate the ledger. Corrections are a
//! bookkeeping decision, made explicitly with an `ajuste` movement.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::ledger::signed_delta;
use almacen_core::{MovementKind, NewSale, Sale, SaleRecord};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Registers a sale: inserts the sale row, the matching `salida`
    /// movement, and applies the delta to the product balance, all in
    /// one transaction.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - product doesn't exist (rolled back)
    /// * `DbError::Domain(InsufficientStock)` - not enough balance (rolled back)
    pub async fn create(&self, sale: &NewSale) -> DbResult<Sale> {
        debug!(
            product_id = sale.product_id,
            quantity = sale.quantity,
            "Registering sale"
        );

        let now = Utc::now();
        let sale_date = sale.sale_date.unwrap_or_else(|| now.date_naive());

        let mut tx = self.pool.begin().await?;

        let stock_before: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                .bind(sale.product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(stock_before) = stock_before else {
            return Err(DbError::not_found("Producto", sale.product_id));
        };

        // A sale is an egress; the same rule that guards POST /api/stock
        // guards it here.
        let delta = signed_delta(
            sale.product_id,
            MovementKind::Salida,
            sale.quantity,
            stock_before,
        )
        .map_err(DbError::Domain)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO sales (
                product_id, quantity, sale_price, discount, channel,
                sale_date, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(sale.product_id)
        .bind(sale.quantity)
        .bind(sale.sale_price)
        .bind(sale.discount)
        .bind(&sale.channel)
        .bind(sale_date)
        .bind(sale.created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let sale_id = inserted.last_insert_rowid();

        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                product_id, kind, quantity, delta, note, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(sale.product_id)
        .bind(MovementKind::Salida)
        .bind(sale.quantity)
        .bind(delta)
        .bind(format!("Venta #{sale_id}"))
        .bind(sale.created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
            .bind(sale.product_id)
            .bind(delta)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(sale_id, "Sale committed");

        Ok(Sale {
            id: sale_id,
            product_id: sale.product_id,
            quantity: sale.quantity,
            sale_price: sale.sale_price,
            discount: sale.discount,
            channel: sale.channel.clone(),
            sale_date,
            created_by: sale.created_by,
            created_at: now,
        })
    }

    /// Lists all sales joined with product and seller names, newest
    /// first. Orphaned sales (product hard-deleted) come back with a
    /// NULL product name rather than disappearing.
    pub async fn list_all(&self) -> DbResult<Vec<SaleRecord>> {
        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT
                s.id, s.product_id, s.quantity, s.sale_price, s.discount,
                s.channel, s.sale_date, s.created_by,
                p.name AS product_name,
                u.username AS vendedor
            FROM sales s
            LEFT JOIN products p ON p.id = s.product_id
            LEFT JOIN users u ON u.id = s.created_by
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, quantity, sale_price, discount, channel,
                   sale_date, created_by, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Deletes a sale row. The stock ledger is left untouched.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Sale doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Venta", id));
        }

        Ok(())
    }

    /// Counts sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use almacen_core::{CoreError, MovementKind, NewProduct, NewSale, NewStockMovement, NewUser};

    async fn seed(stock: i64) -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user_id = db
            .users()
            .insert(
                &NewUser {
                    username: "vendedor1".to_string(),
                    password: "x".to_string(),
                    role: "Vendedor".to_string(),
                    fullname: None,
                },
                "hash-x",
            )
            .await
            .unwrap();

        let product_id = db
            .products()
            .insert(&NewProduct {
                name: "Protein".to_string(),
                sale_price: Some(49.99),
                ..NewProduct::default()
            })
            .await
            .unwrap();

        if stock > 0 {
            db.stock()
                .record_movement(&NewStockMovement {
                    producto_id: product_id,
                    tipo_movimiento: "entrada".to_string(),
                    cantidad: stock,
                    motivo: None,
                    user_id: None,
                })
                .await
                .unwrap();
        }

        (db, product_id, user_id)
    }

    fn sale(product_id: i64, quantity: i64, created_by: i64) -> NewSale {
        NewSale {
            product_id,
            quantity,
            sale_price: 49.99,
            discount: None,
            channel: Some("local".to_string()),
            sale_date: None,
            created_by,
        }
    }

    #[tokio::test]
    async fn test_sale_inserts_ledger_egress() {
        let (db, product_id, user_id) = seed(10).await;

        let created = db.sales().create(&sale(product_id, 4, user_id)).await.unwrap();
        assert!(created.id > 0);

        // Balance dropped and a salida movement referencing the sale
        // was appended.
        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 6);

        let movements = db.stock().movements_for_product(product_id).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].kind, MovementKind::Salida);
        assert_eq!(movements[0].delta, -4);
        assert_eq!(
            movements[0].note.as_deref(),
            Some(format!("Venta #{}", created.id).as_str())
        );
    }

    #[tokio::test]
    async fn test_sale_past_available_stock_rolls_back() {
        let (db, product_id, user_id) = seed(3).await;

        let err = db
            .sales()
            .create(&sale(product_id, 5, user_id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::DbError::Domain(CoreError::InsufficientStock { .. })
        ));

        // No sale row, no extra movement, balance unchanged.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.stock().count().await.unwrap(), 1);
        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_sale_for_missing_product_rolls_back() {
        let (db, _, user_id) = seed(0).await;

        let err = db.sales().create(&sale(999, 1, user_id)).await.unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound { .. }));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_orphaned_sale_survives_product_deletion() {
        let (db, product_id, user_id) = seed(10).await;

        db.sales().create(&sale(product_id, 2, user_id)).await.unwrap();
        db.products().delete(product_id).await.unwrap();

        // The sale row is still there; the join reports a NULL name.
        let sales = db.sales().list_all().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].product_id, product_id);
        assert!(sales[0].product_name.is_none());
        assert_eq!(sales[0].vendedor.as_deref(), Some("vendedor1"));
    }

    #[tokio::test]
    async fn test_delete_sale_leaves_ledger_untouched() {
        let (db, product_id, user_id) = seed(10).await;

        let created = db.sales().create(&sale(product_id, 4, user_id)).await.unwrap();
        db.sales().delete(created.id).await.unwrap();

        // Deleting the sale does not compensate the stock ledger.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let product = db.products().get_by_id(product_id).await.unwrap().unwrap();
        assert_eq!(product.stock, 6);

        // Deleting again reports not-found.
        assert!(db.sales().delete(created.id).await.is_err());
    }
}
