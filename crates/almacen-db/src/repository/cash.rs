//! # Cash Repository
//!
//! The cash ledger (ingresos y egresos de caja). Independent of the
//! stock ledger: sales do not write here automatically.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::{CashKind, CashMovement, NewCashMovement};

/// Repository for cash movement operations.
#[derive(Debug, Clone)]
pub struct CashRepository {
    pool: SqlitePool,
}

impl CashRepository {
    /// Creates a new CashRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashRepository { pool }
    }

    /// Lists all cash movements, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<CashMovement>> {
        let movements = sqlx::query_as::<_, CashMovement>(
            r#"
            SELECT id, kind, amount, category, description, movement_date,
                   created_by, created_at
            FROM cash_movements
            ORDER BY movement_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Records a cash movement with an already-validated kind.
    pub async fn insert(
        &self,
        movement: &NewCashMovement,
        kind: CashKind,
    ) -> DbResult<CashMovement> {
        debug!(kind = ?kind, amount = movement.amount, "Recording cash movement");

        let now = Utc::now();
        let movement_date = movement.movement_date.unwrap_or_else(|| now.date_naive());

        let result = sqlx::query(
            r#"
            INSERT INTO cash_movements (
                kind, amount, category, description, movement_date,
                created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(kind)
        .bind(movement.amount)
        .bind(&movement.category)
        .bind(&movement.description)
        .bind(movement_date)
        .bind(movement.created_by)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(CashMovement {
            id: result.last_insert_rowid(),
            kind,
            amount: movement.amount,
            category: movement.category.clone(),
            description: movement.description.clone(),
            movement_date,
            created_by: movement.created_by,
            created_at: now,
        })
    }

    /// Deletes a cash movement.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - Movement doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting cash movement");

        let result = sqlx::query("DELETE FROM cash_movements WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Movimiento de caja", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
