//! # Error Types
//!
//! Domain-specific error types for almacen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  almacen-core errors (this file)                                       │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  almacen-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Server errors (apps/server)                                           │
//! │  └── ApiError         - What the HTTP client sees (status + message)   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, field, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic
/// failures. The server translates them into HTTP status codes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Producto no encontrado: {0}")]
    ProductNotFound(i64),

    /// Sale cannot be found.
    #[error("Venta no encontrada: {0}")]
    SaleNotFound(i64),

    /// User cannot be found.
    #[error("Usuario no encontrado: {0}")]
    UserNotFound(i64),

    /// An egress movement would drive the balance below zero.
    ///
    /// ## When This Occurs
    /// - A `salida` (or the egress recorded by a sale) requests more
    ///   units than the product currently holds.
    ///
    /// Negative stock is not a valid state in this ledger; adjustments
    /// (`ajuste`) set an absolute non-negative level instead.
    #[error("Stock insuficiente para el producto {product_id}: disponible {available}, solicitado {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request payload doesn't meet requirements. They
/// are checked before any business logic or SQL runs and always map to
/// HTTP 400.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("El campo {field} es obligatorio")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} debe tener como máximo {max} caracteres")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} debe estar entre {min} y {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} debe ser positivo")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid date).
    #[error("{field} tiene un formato inválido: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set (e.g. movement kind).
    #[error("{field} no es válido; debe ser uno de: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value for a unique field (e.g. username, SKU).
    #[error("{field} '{value}' ya existe")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Stock insuficiente para el producto 7: disponible 3, solicitado 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "El campo name es obligatorio");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
