//! # Product Repository
//!
//! Catalog operations for products.
//!
//! ## Key Operations
//! - Case-insensitive search over name, code and reference
//! - CRUD operations with sequential `PROD-NNN` IDs
//! - Stock adjustments, never below zero
//!
//! ## Stock Floor
//! ```text
//!   stock 3, sale of 5  ──►  max(0, 3 - 5) = 0
//!   stock 0, return of 2 ──►  0 + 2      = 2
//! ```

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use tienda_core::ids::{next_id_for, EntityKind};
use tienda_core::validation::{validate_price, validate_product_name, validate_search_query};
use tienda_core::{NewProduct, Product, ValidationError};

const ENTITY: &str = "Product";

/// Repository for products.
///
/// ## Usage
/// ```rust,ignore
/// let mut repo = ProductRepository::new();
/// let product = repo.insert(draft)?;
/// let results = repo.search("cafe")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProductRepository {
    products: Vec<Product>,
}

impl ProductRepository {
    pub fn new() -> Self {
        ProductRepository::default()
    }

    /// All products in insertion order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Like [`get_by_id`](Self::get_by_id) but a missing product is an error.
    pub fn require(&self, id: &str) -> StoreResult<&Product> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Searches products by name, code or reference.
    ///
    /// An empty query returns every product.
    pub fn search(&self, query: &str) -> StoreResult<Vec<&Product>> {
        let query = validate_search_query(query)?.to_lowercase();

        debug!(query = %query, "Searching products");

        let results: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.code.to_lowercase().contains(&query)
                    || p.reference.to_lowercase().contains(&query)
            })
            .collect();

        debug!(count = results.len(), "Search returned products");
        Ok(results)
    }

    /// Products with stock at or below `threshold`.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        self.products.iter().filter(|p| p.stock <= threshold).collect()
    }

    /// Validates a draft, assigns the next ID and stores it.
    pub fn insert(&mut self, draft: NewProduct) -> StoreResult<Product> {
        validate_draft(&draft)?;

        let id = next_id_for(self.products.iter().map(|p| &p.id), EntityKind::Product);
        let product = draft.into_product(id);

        debug!(id = %product.id, name = %product.name, "Inserting product");
        self.products.push(product.clone());
        Ok(product)
    }

    /// Stores a product that already has an ID (legacy import).
    pub fn import(&mut self, product: Product) -> StoreResult<()> {
        self.import_all(vec![product]).map(|_| ())
    }

    /// Stores a batch of products that already have IDs.
    ///
    /// Nothing is stored unless every ID is new to the repository and
    /// unique within the batch.
    pub fn import_all(&mut self, products: Vec<Product>) -> StoreResult<usize> {
        let mut ids: Vec<&str> = self.products.iter().map(|p| p.id.as_str()).collect();
        for product in &products {
            if ids.contains(&product.id.as_str()) {
                return Err(StoreError::duplicate(ENTITY, &product.id));
            }
            ids.push(&product.id);
        }

        debug!(count = products.len(), "Importing products");
        let count = products.len();
        self.products.extend(products);
        Ok(count)
    }

    /// Replaces the stored product with the same ID.
    pub fn update(&mut self, product: Product) -> StoreResult<Product> {
        validate_product_name(&product.name)?;
        validate_price(product.sale_price)?;
        validate_price(product.purchase_price)?;
        validate_stock(product.stock)?;

        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| StoreError::not_found(ENTITY, &product.id))?;

        debug!(id = %product.id, "Updating product");
        *slot = product.clone();
        Ok(product)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        debug!(id = %id, "Deleting product");
        Ok(self.products.remove(index))
    }

    /// Adds `delta` units (negative to remove), flooring the result at 0.
    ///
    /// Returns the new stock, or `None` if the product no longer exists.
    pub fn adjust_stock(&mut self, id: &str, delta: i64) -> Option<i64> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        product.stock = product.stock.saturating_add(delta).max(0);

        debug!(id = %id, delta = delta, stock = product.stock, "Adjusted stock");
        Some(product.stock)
    }
}

fn validate_draft(draft: &NewProduct) -> StoreResult<()> {
    validate_product_name(&draft.name)?;
    validate_price(draft.purchase_price)?;
    validate_price(draft.sale_price)?;
    validate_stock(draft.stock)
}

fn validate_stock(stock: i64) -> StoreResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
