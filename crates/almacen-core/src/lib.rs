//! # almacen-core: Pure Domain Logic for Almacén
//!
//! This crate is the **heart** of the Almacén inventory backend. It
//! contains the stock-ledger rules, alert predicates and validation as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacén Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    REST API (apps/server)                       │   │
//! │  │    /api/productos ── /api/stock ── /api/ventas ── /api/alertas │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ almacen-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │  ledger   │  │ validation│                  │   │
//! │  │   │  Product  │  │  deltas   │  │   rules   │                  │   │
//! │  │   │  Movement │  │  alerts   │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  almacen-db (Database Layer)                    │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockMovement, Sale, etc.)
//! - [`ledger`] - Stock-ledger arithmetic and alert predicates
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//! 4. **One stock model**: the movement log is the source of truth and
//!    the product balance is a projection maintained transactionally.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Window (in days, inclusive) for the expiry alert: products whose
/// expiry date falls within [today, today + 15] are flagged.
pub const EXPIRY_ALERT_WINDOW_DAYS: i64 = 15;

/// Maximum quantity accepted for a single stock movement or sale line.
///
/// Prevents accidental over-entry (e.g. typing 100000 instead of 100).
pub const MAX_MOVEMENT_QUANTITY: i64 = 1_000_000;
