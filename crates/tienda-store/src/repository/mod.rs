//! # Repository Module
//!
//! In-memory collections for Tienda POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Store workflow                                                        │
//! │       │                                                                 │
//! │       │  store.products_mut().insert(draft)                            │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search(&self, query)                                              │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&mut self, draft)   ← assigns PROD-NNN                     │
//! │  └── update(&mut self, product)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Product> (insertion order = display order)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository owns one collection. Workflows that touch more than
//! one collection (a sale decrements stock, a received order adds it)
//! live on [`crate::Store`].
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD, search, stock
//! - [`CategoryRepository`](party::CategoryRepository) - Product categories
//! - [`CustomerRepository`](party::CustomerRepository) - Customers (soft delete)
//! - [`SupplierRepository`](party::SupplierRepository) - Suppliers (soft delete)
//! - [`SaleRepository`](sale::SaleRepository) - Recorded sales
//! - [`ReturnRepository`](returns::ReturnRepository) - Returns and their status
//! - [`OrderRepository`](order::OrderRepository) - Supplier orders and their status

pub mod order;
pub mod party;
pub mod product;
pub mod returns;
pub mod sale;
