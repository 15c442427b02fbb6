//! # Stock Ledger
//!
//! Pure arithmetic for the stock ledger.
//!
//! ## One Stock Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ledger Consistency Model                           │
//! │                                                                         │
//! │  stock_movements (source of truth)                                     │
//! │  ┌──────────────────────────────────────────┐                          │
//! │  │ entrada  qty=50   delta=+50              │                          │
//! │  │ salida   qty=20   delta=-20              │                          │
//! │  │ ajuste   qty=25   delta=-5  (was 30)     │                          │
//! │  └───────────────────┬──────────────────────┘                          │
//! │                      │ fold (Σ delta)                                  │
//! │                      ▼                                                  │
//! │  products.stock = 25 (projection, updated in the same transaction)     │
//! │                                                                         │
//! │  Invariant: for every product,                                         │
//! │      products.stock == Σ delta over its movements                      │
//! │  and a product with no movements has balance 0.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The delta for an `ajuste` is fixed at insert time (new level minus
//! level before), which is what makes the replay equivalence hold.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::{MovementKind, StockMovement};
use crate::EXPIRY_ALERT_WINDOW_DAYS;

// =============================================================================
// Delta Computation
// =============================================================================

/// Computes the signed balance effect of a movement.
///
/// - `entrada` → `+quantity`
/// - `salida`  → `-quantity`
/// - `ajuste`  → `quantity - stock_before` (quantity is the new level)
///
/// Rejects a `salida` that would drive the balance negative: negative
/// stock is not a valid state in this ledger.
pub fn signed_delta(
    product_id: i64,
    kind: MovementKind,
    quantity: i64,
    stock_before: i64,
) -> Result<i64, CoreError> {
    match kind {
        MovementKind::Entrada => Ok(quantity),
        MovementKind::Salida => {
            if quantity > stock_before {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    available: stock_before,
                    requested: quantity,
                });
            }
            Ok(-quantity)
        }
        MovementKind::Ajuste => Ok(quantity - stock_before),
    }
}

// =============================================================================
// Ledger Fold
// =============================================================================

/// Folds a movement list into per-product balances.
///
/// Products with no movements simply have no entry; callers treat a
/// missing entry as balance 0. Used for reporting and for verifying
/// the projected `products.stock` column in tests.
pub fn stock_levels(movements: &[StockMovement]) -> HashMap<i64, i64> {
    let mut levels = HashMap::new();
    for movement in movements {
        *levels.entry(movement.product_id).or_insert(0) += movement.delta;
    }
    levels
}

// =============================================================================
// Alert Predicates
// =============================================================================

/// Low-stock predicate: true iff a minimum is configured and the
/// balance is at or below it. Products with no `min_stock` are never
/// flagged.
pub fn is_low_stock(min_stock: Option<i64>, stock: i64) -> bool {
    matches!(min_stock, Some(min) if stock <= min)
}

/// Expiry predicate: true iff the product has an expiry date falling
/// within `[today, today + EXPIRY_ALERT_WINDOW_DAYS]`, inclusive on
/// both ends.
pub fn expires_soon(expiry_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    match expiry_date {
        Some(date) => {
            let limit = today + chrono::Duration::days(EXPIRY_ALERT_WINDOW_DAYS);
            date >= today && date <= limit
        }
        None => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
