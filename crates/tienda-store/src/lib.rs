//! # tienda-store: In-Memory Store Service for Tienda POS
//!
//! This crate owns every collection the front end works with and applies
//! every mutation to them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tienda POS Data Flow                             │
//! │                                                                         │
//! │  Form submit (New Sale, Returns, Supplier Orders)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tienda-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │ StoreConfig  │  │   │
//! │  │   │  (store.rs)   │    │ (product.rs)  │    │ (config.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ create_sale   │───►│ ProductRepo   │    │ TIENDA_*     │  │   │
//! │  │   │ create_return │    │ SaleRepo      │    │ env vars     │  │   │
//! │  │   │ orders        │    │ ReturnRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          tienda-core (ISV engine, validation, reports)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The [`Store`] and its cross-collection workflows
//! - [`repository`] - One in-memory repository per collection
//! - [`config`] - Store configuration from `TIENDA_*` variables
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tienda_store::{Store, StoreConfig};
//!
//! let mut store = Store::new(StoreConfig::from_env());
//! let sale = store.create_sale("CUST-001", items)?;
//! let report = store.tax_report();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use store::Store;

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::party::{CategoryRepository, CustomerRepository, SupplierRepository};
pub use repository::product::ProductRepository;
pub use repository::returns::ReturnRepository;
pub use repository::sale::SaleRepository;
