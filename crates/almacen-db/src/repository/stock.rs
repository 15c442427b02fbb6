//! # Stock Repository
//!
//! The stock ledger. This file owns the one operation in the system
//! with a real atomicity requirement.
//!
//! ## The Movement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              record_movement (all-or-nothing)                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├── SELECT stock FROM products WHERE id = ?   ── missing? → ROLLBACK  │
//! │   │                                                                     │
//! │   ├── delta = signed_delta(kind, qty, stock)    ── salida below 0?      │
//! │   │                                                  → ROLLBACK         │
//! │   ├── INSERT INTO stock_movements (..., delta)                          │
//! │   │                                                                     │
//! │   ├── UPDATE products SET stock = stock + delta                         │
//! │   │                                                                     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The movement row and the balance update land together or not at       │
//! │  all: the ledger is the source of truth and products.stock is its      │
//! │  projection, so they must never diverge.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::ledger::signed_delta;
use almacen_core::validation::validate_movement;
use almacen_core::{CoreError, NewStockMovement, StockMovement};

/// Repository for the stock movement ledger.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Records a movement and applies its delta to the product balance
    /// in a single transaction.
    ///
    /// The payload is validated (and its kind parsed) here, so an
    /// invalid payload never opens a transaction and callers cannot
    /// hand in a kind that disagrees with the raw string.
    ///
    /// ## Errors
    /// * `DbError::Domain(Validation)` - unknown kind or bad quantity, nothing inserted
    /// * `DbError::NotFound` - product doesn't exist (rolled back)
    /// * `DbError::Domain(InsufficientStock)` - egress past zero (rolled back)
    pub async fn record_movement(&self, movement: &NewStockMovement) -> DbResult<StockMovement> {
        let kind = validate_movement(movement).map_err(CoreError::from)?;

        debug!(
            product_id = movement.producto_id,
            kind = %kind,
            quantity = movement.cantidad,
            "Recording stock movement"
        );

        let mut tx = self.pool.begin().await?;

        // The balance read must happen inside the transaction: the
        // delta for 'ajuste' depends on it.
        let stock_before: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                .bind(movement.producto_id)
                .fetch_optional(&mut *tx)
                .await?;

        // Dropping `tx` without commit rolls everything back.
        let Some(stock_before) = stock_before else {
            return Err(DbError::not_found("Producto", movement.producto_id));
        };

        let delta = signed_delta(movement.producto_id, kind, movement.cantidad, stock_before)
            .map_err(DbError::Domain)?;

        let now = Utc::now();

        let inserted = sqlx::query(
            r#"
            INSERT INTO stock_movements (
                product_id, kind, quantity, delta, note, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(movement.producto_id)
        .bind(kind)
        .bind(movement.cantidad)
        .bind(delta)
        .bind(&movement.motivo)
        .bind(movement.user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let id = inserted.last_insert_rowid();

        let updated = sqlx::query(
            "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(movement.producto_id)
        .bind(delta)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(DbError::TransactionFailed(
                "la actualización de stock no afectó ninguna fila".to_string(),
            ));
        }

        tx.commit().await?;

        debug!(id, delta, "Stock movement committed");

        Ok(StockMovement {
            id,
            product_id: movement.producto_id,
            kind,
            quantity: movement.cantidad,
            delta,
            note: movement.motivo.clone(),
            created_by: movement.user_id,
            created_at: now,
        })
    }

    /// Lists movements for one product, newest first.
    pub async fn movements_for_product(&self, product_id: i64) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, kind, quantity, delta, note, created_by, created_at
            FROM stock_movements
            WHERE product_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists the whole ledger, oldest first. Used by consistency
    /// checks and tests that replay the fold.
    pub async fn list_all(&self) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, kind, quantity, delta, note, created_by, created_at
            FROM stock_movements
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Counts ledger rows (for diagnostics and rollback assertions).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
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
    use almacen_core::ledger::stock_levels;
    use almacen_core::{CoreError, MovementKind, NewProduct, NewStockMovement};

    async fn test_db_with_product() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = db
            .products()
            .insert(&NewProduct {
                name: "Protein".to_string(),
                ..NewProduct::default()
            })
            .await
            .unwrap();
        (db, id)
    }

    fn movement(product_id: i64, kind: MovementKind, cantidad: i64) -> NewStockMovement {
        NewStockMovement {
            producto_id: product_id,
            tipo_movimiento: kind.as_str().to_string(),
            cantidad,
            motivo: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_entrada_increases_balance() {
        let (db, id) = test_db_with_product().await;

        let recorded = db
            .stock()
            .record_movement(&movement(id, MovementKind::Entrada, 50))
            .await
            .unwrap();
        assert_eq!(recorded.delta, 50);

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 50);
    }

    #[tokio::test]
    async fn test_salida_decreases_balance() {
        let (db, id) = test_db_with_product().await;
        let stock = db.stock();

        stock
            .record_movement(&movement(id, MovementKind::Entrada, 50))
            .await
            .unwrap();
        stock
            .record_movement(&movement(id, MovementKind::Salida, 20))
            .await
            .unwrap();

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 30);
    }

    #[tokio::test]
    async fn test_ajuste_sets_absolute_level() {
        let (db, id) = test_db_with_product().await;
        let stock = db.stock();

        stock
            .record_movement(&movement(id, MovementKind::Entrada, 30))
            .await
            .unwrap();
        let adjusted = stock
            .record_movement(&movement(id, MovementKind::Ajuste, 25))
            .await
            .unwrap();
        assert_eq!(adjusted.delta, -5);

        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 25);
    }

    #[tokio::test]
    async fn test_salida_past_zero_rolls_back() {
        let (db, id) = test_db_with_product().await;
        let stock = db.stock();

        stock
            .record_movement(&movement(id, MovementKind::Entrada, 3))
            .await
            .unwrap();

        let err = stock
            .record_movement(&movement(id, MovementKind::Salida, 5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::DbError::Domain(CoreError::InsufficientStock { .. })
        ));

        // No partial write: ledger unchanged, balance unchanged.
        assert_eq!(stock.count().await.unwrap(), 1);
        let product = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn test_movement_for_missing_product_rolls_back() {
        let (db, _) = test_db_with_product().await;
        let stock = db.stock();

        let err = stock
            .record_movement(&movement(999, MovementKind::Entrada, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound { .. }));

        // Nothing was inserted.
        assert_eq!(stock.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_kind_rejected_before_transaction() {
        let (db, id) = test_db_with_product().await;
        let stock = db.stock();

        let err = stock
            .record_movement(&NewStockMovement {
                producto_id: id,
                tipo_movimiento: "transferencia".to_string(),
                cantidad: 10,
                motivo: None,
                user_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::DbError::Domain(CoreError::Validation(_))
        ));

        // Nothing reached the ledger.
        assert_eq!(stock.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_projection_matches_ledger_fold() {
        let (db, id) = test_db_with_product().await;
        let stock = db.stock();

        for (kind, qty) in [
            (MovementKind::Entrada, 50),
            (MovementKind::Salida, 20),
            (MovementKind::Ajuste, 42),
            (MovementKind::Salida, 2),
        ] {
            stock
                .record_movement(&movement(id, kind, qty))
                .await
                .unwrap();
        }

        let ledger = stock.list_all().await.unwrap();
        let levels = stock_levels(&ledger);
        let product = db.products().get_by_id(id).await.unwrap().unwrap();

        assert_eq!(levels.get(&id), Some(&product.stock));
        assert_eq!(product.stock, 40);
    }

    #[tokio::test]
    async fn test_movements_listed_newest_first() {
        let (db, id) = test_db_with_product().await;
        let stock = db.stock();

        stock
            .record_movement(&movement(id, MovementKind::Entrada, 10))
            .await
            .unwrap();
        stock
            .record_movement(&movement(id, MovementKind::Entrada, 20))
            .await
            .unwrap();

        let movements = stock.movements_for_product(id).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].quantity, 20);
        assert_eq!(movements[1].quantity, 10);
    }
}
