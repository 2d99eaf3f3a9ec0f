//! # tienda-core: Pure Business Logic for Tienda POS
//!
//! This crate holds every calculation the store front end depends on, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (forms, tables)                     │   │
//! │  │   New Sale ──► Returns ──► Supplier Orders ──► Reports          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tienda-store (Store service)                    │   │
//! │  │    create_sale, create_return, update_order_status, ...         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tienda-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    tax    │  │   money   │  │   types   │  │  report   │  │   │
//! │  │   │ Breakdown │  │   Money   │  │  Product  │  │ TaxReport │  │   │
//! │  │   │ Category  │  │ (centavos)│  │ Sale, ... │  │  Summary  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tax`] - ISV breakdown engine (exento / gravado / ISV 15% / ISV 18%)
//! - [`money`] - Money type in centavos
//! - [`types`] - Domain records (Product, Sale, Return, SupplierOrder, ...)
//! - [`ids`] - Sequential `PREFIX-NNN` identifiers
//! - [`legacy`] - Normalization of legacy-shaped records
//! - [`report`] - Aggregations over sales, returns and orders
//! - [`validation`] - Form-boundary business rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tienda_core::money::Money;
//! use tienda_core::tax::{compute_breakdown, TaxCategory};
//! use tienda_core::types::LineItem;
//!
//! let items = vec![
//!     LineItem::from_parts("PROD-001", "Leche", 1, Money::from_cents(5000), TaxCategory::Exento),
//!     LineItem::from_parts("PROD-002", "Jabón", 1, Money::from_cents(11500), TaxCategory::Isv15),
//! ];
//!
//! let breakdown = compute_breakdown(&items);
//! assert_eq!(breakdown.gravado15.cents(), 10000);
//! assert_eq!(breakdown.isv15.cents(), 1500);
//! assert_eq!(breakdown.grand_total().cents(), 16500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ids;
pub mod legacy;
pub mod money;
pub mod report;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use tax::{TaxBreakdown, TaxCategory};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Currency symbol for the Honduran Lempira, used by text summaries.
pub const CURRENCY_SYMBOL: &str = "L";
