//! # Party Repositories
//!
//! Customers, suppliers and the product categories they are filed under.
//!
//! Customers and suppliers are soft-deleted: the record stays so old
//! sales and orders keep resolving, but `visible` turns false and lookups
//! stop returning it.

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use tienda_core::ids::{next_id_for, EntityKind};
use tienda_core::validation::{validate_product_name, validate_search_key, validate_search_query};
use tienda_core::{Category, Customer, NewContact, Supplier};

fn validate_contact(draft: &NewContact) -> StoreResult<()> {
    validate_product_name(&draft.name)?;
    validate_search_key(&draft.search_key)?;
    Ok(())
}

fn matches_contact(query: &str, name: &str, search_key: &str, rtn: Option<&str>) -> bool {
    query.is_empty()
        || name.to_lowercase().contains(query)
        || search_key.to_lowercase().contains(query)
        || rtn.is_some_and(|r| r.contains(query))
}

// =============================================================================
// Categories
// =============================================================================

/// Repository for product categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryRepository {
    categories: Vec<Category>,
}

impl CategoryRepository {
    pub fn new() -> Self {
        CategoryRepository::default()
    }

    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn insert(&mut self, name: &str, description: Option<String>) -> StoreResult<Category> {
        validate_product_name(name)?;

        let category = Category {
            id: next_id_for(self.categories.iter().map(|c| &c.id), EntityKind::Category),
            name: name.trim().to_string(),
            description,
        };

        debug!(id = %category.id, name = %category.name, "Inserting category");
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Category", id))?;
        Ok(self.categories.remove(index))
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Repository for customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerRepository {
    customers: Vec<Customer>,
}

impl CustomerRepository {
    pub fn new() -> Self {
        CustomerRepository::default()
    }

    /// Customers that have not been deleted.
    pub fn visible(&self) -> Vec<&Customer> {
        self.customers.iter().filter(|c| c.visible).collect()
    }

    /// Looks up a visible customer.
    pub fn get_by_id(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id && c.visible)
    }

    pub fn require(&self, id: &str) -> StoreResult<&Customer> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::not_found("Customer", id))
    }

    /// Searches visible customers by name, search key or RTN.
    pub fn search(&self, query: &str) -> StoreResult<Vec<&Customer>> {
        let query = validate_search_query(query)?.to_lowercase();
        Ok(self
            .customers
            .iter()
            .filter(|c| c.visible)
            .filter(|c| matches_contact(&query, &c.name, &c.search_key, c.rtn.as_deref()))
            .collect())
    }

    pub fn insert(&mut self, draft: NewContact) -> StoreResult<Customer> {
        validate_contact(&draft)?;

        // Soft-deleted customers keep their IDs reserved.
        let id = next_id_for(self.customers.iter().map(|c| &c.id), EntityKind::Customer);
        let customer = draft.into_customer(id);

        debug!(id = %customer.id, name = %customer.name, "Inserting customer");
        self.customers.push(customer.clone());
        Ok(customer)
    }

    pub fn import(&mut self, customer: Customer) -> StoreResult<()> {
        self.import_all(vec![customer]).map(|_| ())
    }

    /// Stores a batch of customers that already have IDs, or none of them
    /// if any ID is taken or repeated.
    pub fn import_all(&mut self, customers: Vec<Customer>) -> StoreResult<usize> {
        let mut ids: Vec<&str> = self.customers.iter().map(|c| c.id.as_str()).collect();
        for customer in &customers {
            if ids.contains(&customer.id.as_str()) {
                return Err(StoreError::duplicate("Customer", &customer.id));
            }
            ids.push(&customer.id);
        }

        debug!(count = customers.len(), "Importing customers");
        let count = customers.len();
        self.customers.extend(customers);
        Ok(count)
    }

    pub fn update(&mut self, customer: Customer) -> StoreResult<Customer> {
        validate_product_name(&customer.name)?;
        validate_search_key(&customer.search_key)?;

        let slot = self
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id && c.visible)
            .ok_or_else(|| StoreError::not_found("Customer", &customer.id))?;

        debug!(id = %customer.id, "Updating customer");
        *slot = customer.clone();
        Ok(customer)
    }

    /// Hides the customer from lookups.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == id && c.visible)
            .ok_or_else(|| StoreError::not_found("Customer", id))?;

        debug!(id = %id, "Soft-deleting customer");
        customer.visible = false;
        Ok(())
    }
}

// =============================================================================
// Suppliers
// =============================================================================

/// Repository for suppliers.
#[derive(Debug, Clone, Default)]
pub struct SupplierRepository {
    suppliers: Vec<Supplier>,
}

impl SupplierRepository {
    pub fn new() -> Self {
        SupplierRepository::default()
    }

    pub fn visible(&self) -> Vec<&Supplier> {
        self.suppliers.iter().filter(|s| s.visible).collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id && s.visible)
    }

    pub fn require(&self, id: &str) -> StoreResult<&Supplier> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::not_found("Supplier", id))
    }

    pub fn search(&self, query: &str) -> StoreResult<Vec<&Supplier>> {
        let query = validate_search_query(query)?.to_lowercase();
        Ok(self
            .suppliers
            .iter()
            .filter(|s| s.visible)
            .filter(|s| matches_contact(&query, &s.name, &s.search_key, s.rtn.as_deref()))
            .collect())
    }

    pub fn insert(&mut self, draft: NewContact, product_ids: Vec<String>) -> StoreResult<Supplier> {
        validate_contact(&draft)?;

        let id = next_id_for(self.suppliers.iter().map(|s| &s.id), EntityKind::Supplier);
        let supplier = draft.into_supplier(id, product_ids);

        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");
        self.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    pub fn import(&mut self, supplier: Supplier) -> StoreResult<()> {
        self.import_all(vec![supplier]).map(|_| ())
    }

    /// Stores a batch of suppliers that already have IDs, or none of them
    /// if any ID is taken or repeated.
    pub fn import_all(&mut self, suppliers: Vec<Supplier>) -> StoreResult<usize> {
        let mut ids: Vec<&str> = self.suppliers.iter().map(|s| s.id.as_str()).collect();
        for supplier in &suppliers {
            if ids.contains(&supplier.id.as_str()) {
                return Err(StoreError::duplicate("Supplier", &supplier.id));
            }
            ids.push(&supplier.id);
        }

        debug!(count = suppliers.len(), "Importing suppliers");
        let count = suppliers.len();
        self.suppliers.extend(suppliers);
        Ok(count)
    }

    pub fn update(&mut self, supplier: Supplier) -> StoreResult<Supplier> {
        validate_product_name(&supplier.name)?;
        validate_search_key(&supplier.search_key)?;

        let slot = self
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier.id && s.visible)
            .ok_or_else(|| StoreError::not_found("Supplier", &supplier.id))?;

        debug!(id = %supplier.id, "Updating supplier");
        *slot = supplier.clone();
        Ok(supplier)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let supplier = self
            .suppliers
            .iter_mut()
            .find(|s| s.id == id && s.visible)
            .ok_or_else(|| StoreError::not_found("Supplier", id))?;

        debug!(id = %id, "Soft-deleting supplier");
        supplier.visible = false;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
