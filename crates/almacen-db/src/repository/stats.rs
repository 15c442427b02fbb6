//! # Statistics Repository
//!
//! Aggregate queries over the sales ledger, backing the statistics
//! endpoints and the general PDF report.

use sqlx::SqlitePool;

use crate::error::DbResult;
use almacen_core::{MonthlySalesTotal, ProductSalesTotal};

/// Repository for aggregate statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Units sold per product, best sellers first. Orphaned sales
    /// aggregate under a NULL product name instead of vanishing.
    pub async fn sales_by_product(&self) -> DbResult<Vec<ProductSalesTotal>> {
        let totals = sqlx::query_as::<_, ProductSalesTotal>(
            r#"
            SELECT p.name AS producto, CAST(SUM(s.quantity) AS INTEGER) AS total
            FROM sales s
            LEFT JOIN products p ON p.id = s.product_id
            GROUP BY p.name
            ORDER BY total DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Units sold per calendar month, chronological. Months come back
    /// as "YYYY-MM" strings, so lexicographic order is date order.
    pub async fn sales_by_month(&self) -> DbResult<Vec<MonthlySalesTotal>> {
        let totals = sqlx::query_as::<_, MonthlySalesTotal>(
            r#"
            SELECT strftime('%Y-%m', sale_date) AS mes,
                   CAST(SUM(quantity) AS INTEGER) AS total
            FROM sales
            GROUP BY mes
            ORDER BY mes ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(totals)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
