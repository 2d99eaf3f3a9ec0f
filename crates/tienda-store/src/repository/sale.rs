//! # Sale Repository
//!
//! Recorded sales. A sale's lines and ISV breakdown are frozen when it is
//! recorded; nothing here recomputes them.

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use tienda_core::ids::{next_id_for, EntityKind};
use tienda_core::{Sale, SaleStatus};

/// Repository for sales.
#[derive(Debug, Clone, Default)]
pub struct SaleRepository {
    sales: Vec<Sale>,
}

impl SaleRepository {
    pub fn new() -> Self {
        SaleRepository::default()
    }

    pub fn all(&self) -> &[Sale] {
        &self.sales
    }

    /// Sales with status `Completed`, the only ones that can be returned.
    pub fn completed(&self) -> Vec<&Sale> {
        self.sales
            .iter()
            .filter(|s| s.status == SaleStatus::Completed)
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn require(&self, id: &str) -> StoreResult<&Sale> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::not_found("Sale", id))
    }

    /// ID the next recorded sale will get.
    pub fn next_id(&self) -> String {
        next_id_for(self.sales.iter().map(|s| &s.id), EntityKind::Sale)
    }

    pub(crate) fn insert(&mut self, sale: Sale) {
        debug!(id = %sale.id, total = %sale.total, "Inserting sale");
        self.sales.push(sale);
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<Sale> {
        let index = self
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Sale", id))?;

        debug!(id = %id, "Deleting sale");
        Ok(self.sales.remove(index))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
