//! # Repository Module
//!
//! Database repository implementations for Almacén.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.stock().record_movement(movement)                          │
//! │       ▼                                                                 │
//! │  StockRepository                                                       │
//! │  ├── record_movement(&self, ...)   ← the one real transaction          │
//! │  ├── movements_for_product(&self, id)                                  │
//! │  └── list_all(&self)                                                   │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Easy to exercise against an in-memory database in tests             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and alert queries
//! - [`stock::StockRepository`] - Stock ledger (transactional movements)
//! - [`sale::SaleRepository`] - Sales ledger (linked to stock)
//! - [`user::UserRepository`] - User CRUD and login lookups
//! - [`cash::CashRepository`] - Cash movements
//! - [`purchase::PurchaseRepository`] - Purchase history
//! - [`stats::StatsRepository`] - Aggregate statistics

pub mod cash;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod stats;
pub mod stock;
pub mod user;
