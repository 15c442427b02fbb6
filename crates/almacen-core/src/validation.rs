//! # Validation Module
//!
//! Input validation for request payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (serde)                                         │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Required fields, enum sets, positivity → HTTP 400                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE constraints (username, sku) → HTTP 409                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check here runs before any SQL: a payload that fails
//! validation never reaches a transaction.

use crate::error::ValidationError;
use crate::types::{
    CashKind, MovementKind, NewCashMovement, NewProduct, NewSale, NewStockMovement, NewUser,
    UpdateUser,
};
use crate::MAX_MOVEMENT_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required, non-empty string field.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product or user name: required, at most 200 characters.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_required(field, name)?;
    if name.trim().len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }
    Ok(())
}

/// Validates a quantity: positive and within the sanity cap.
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if quantity > MAX_MOVEMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_MOVEMENT_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a monetary amount: must not be negative.
pub fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a positive row id (references arrive as raw integers).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a product payload (create and full-row update).
pub fn validate_product(product: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &product.name)?;
    if let Some(sku) = product.sku.as_deref() {
        if sku.len() > 50 {
            return Err(ValidationError::TooLong {
                field: "sku".to_string(),
                max: 50,
            });
        }
    }
    if let Some(price) = product.sale_price {
        validate_amount("sale_price", price)?;
    }
    if let Some(min) = product.min_stock {
        if min < 0 {
            return Err(ValidationError::MustBePositive {
                field: "min_stock".to_string(),
            });
        }
    }
    Ok(())
}

/// Validates a stock movement payload and resolves its kind.
///
/// Returns the parsed [`MovementKind`] so callers never re-parse the
/// raw string. An unknown kind or non-positive quantity is a 400; no
/// row is inserted.
pub fn validate_movement(movement: &NewStockMovement) -> ValidationResult<MovementKind> {
    validate_id("producto_id", movement.producto_id)?;

    let kind = MovementKind::parse(&movement.tipo_movimiento).ok_or_else(|| {
        ValidationError::NotAllowed {
            field: "tipo_movimiento".to_string(),
            allowed: MovementKind::ALLOWED.iter().map(|s| s.to_string()).collect(),
        }
    })?;

    validate_quantity("cantidad", movement.cantidad)?;
    Ok(kind)
}

/// Validates a sale payload.
pub fn validate_sale(sale: &NewSale) -> ValidationResult<()> {
    validate_id("product_id", sale.product_id)?;
    validate_id("created_by", sale.created_by)?;
    validate_quantity("quantity", sale.quantity)?;
    validate_amount("sale_price", sale.sale_price)?;
    if let Some(discount) = sale.discount {
        validate_amount("discount", discount)?;
    }
    Ok(())
}

/// Validates a cash movement payload and resolves its kind.
pub fn validate_cash_movement(movement: &NewCashMovement) -> ValidationResult<CashKind> {
    let kind = CashKind::parse(&movement.movement_type).ok_or_else(|| {
        ValidationError::NotAllowed {
            field: "movement_type".to_string(),
            allowed: CashKind::ALLOWED.iter().map(|s| s.to_string()).collect(),
        }
    })?;
    validate_amount("amount", movement.amount)?;
    Ok(kind)
}

/// Validates a new-user payload.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_name("username", &user.username)?;
    validate_required("password", &user.password)?;
    validate_required("role", &user.role)?;
    Ok(())
}

/// Validates a user update payload.
pub fn validate_update_user(user: &UpdateUser) -> ValidationResult<()> {
    validate_name("username", &user.username)?;
    validate_required("role", &user.role)?;
    if let Some(password) = user.password.as_deref() {
        validate_required("password", password)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: &str, cantidad: i64) -> NewStockMovement {
        NewStockMovement {
            producto_id: 1,
            tipo_movimiento: kind.to_string(),
            cantidad,
            motivo: None,
            user_id: None,
        }
    }

    #[test]
    fn test_validate_movement_accepts_known_kinds() {
        assert_eq!(
            validate_movement(&movement("entrada", 5)).unwrap(),
            MovementKind::Entrada
        );
        assert_eq!(
            validate_movement(&movement("salida", 5)).unwrap(),
            MovementKind::Salida
        );
        assert_eq!(
            validate_movement(&movement("ajuste", 5)).unwrap(),
            MovementKind::Ajuste
        );
    }

    #[test]
    fn test_validate_movement_rejects_unknown_kind() {
        let err = validate_movement(&movement("transferencia", 5)).unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_validate_movement_rejects_non_positive_quantity() {
        assert!(validate_movement(&movement("entrada", 0)).is_err());
        assert!(validate_movement(&movement("entrada", -3)).is_err());
    }

    #[test]
    fn test_validate_product_requires_name() {
        let mut product = NewProduct::default();
        assert!(validate_product(&product).is_err());

        product.name = "Protein".to_string();
        assert!(validate_product(&product).is_ok());
    }

    #[test]
    fn test_validate_product_rejects_negative_price() {
        let product = NewProduct {
            name: "Protein".to_string(),
            sale_price: Some(-1.0),
            ..NewProduct::default()
        };
        assert!(validate_product(&product).is_err());
    }

    #[test]
    fn test_validate_sale() {
        let sale = NewSale {
            product_id: 1,
            quantity: 2,
            sale_price: 49.99,
            discount: None,
            channel: None,
            sale_date: None,
            created_by: 1,
        };
        assert!(validate_sale(&sale).is_ok());

        let bad = NewSale { quantity: 0, ..sale };
        assert!(validate_sale(&bad).is_err());
    }

    #[test]
    fn test_validate_new_user() {
        let user = NewUser {
            username: "ana".to_string(),
            password: "secret".to_string(),
            role: "Vendedor".to_string(),
            fullname: None,
        };
        assert!(validate_new_user(&user).is_ok());

        let missing = NewUser {
            password: String::new(),
            ..user
        };
        assert!(validate_new_user(&missing).is_err());
    }

    #[test]
    fn test_validate_cash_movement_kind() {
        let movement = NewCashMovement {
            movement_type: "ingreso".to_string(),
            amount: 100.0,
            category: None,
            description: None,
            movement_date: None,
            created_by: None,
        };
        assert_eq!(validate_cash_movement(&movement).unwrap(), CashKind::Ingreso);

        let bad = NewCashMovement {
            movement_type: "retiro".to_string(),
            ..movement
        };
        assert!(validate_cash_movement(&bad).is_err());
    }
}
