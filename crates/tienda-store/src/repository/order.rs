//! # Supplier Order Repository
//!
//! Purchase orders and their delivery workflow.
//!
//! ```text
//!  Pending ──► Sent ──► Received   (received_at set, stock added by Store)
//!     │          │
//!     └──────────┴────► Cancelled
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use tienda_core::ids::{next_id_for, EntityKind};
use tienda_core::{OrderStatus, SupplierOrder};

const ENTITY: &str = "SupplierOrder";

/// Repository for supplier orders.
#[derive(Debug, Clone, Default)]
pub struct OrderRepository {
    orders: Vec<SupplierOrder>,
}

impl OrderRepository {
    pub fn new() -> Self {
        OrderRepository::default()
    }

    pub fn all(&self) -> &[SupplierOrder] {
        &self.orders
    }

    pub fn get_by_id(&self, id: &str) -> Option<&SupplierOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn require(&self, id: &str) -> StoreResult<&SupplierOrder> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Orders not yet received or cancelled.
    pub fn open(&self) -> Vec<&SupplierOrder> {
        self.orders
            .iter()
            .filter(|o| matches!(o.status, OrderStatus::Pending | OrderStatus::Sent))
            .collect()
    }

    pub fn next_id(&self) -> String {
        next_id_for(self.orders.iter().map(|o| &o.id), EntityKind::SupplierOrder)
    }

    pub(crate) fn insert(&mut self, order: SupplierOrder) {
        debug!(id = %order.id, supplier = %order.supplier_id, total = %order.total, "Inserting supplier order");
        self.orders.push(order);
    }

    /// Moves an order to `next`, stamping `received_at` on `Received`.
    pub(crate) fn transition(
        &mut self,
        id: &str,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<SupplierOrder> {
        let order = self
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        if !order.status.can_transition_to(next) {
            return Err(StoreError::invalid_transition(ENTITY, id, order.status, next));
        }

        debug!(id = %id, from = ?order.status, to = ?next, "Order status change");
        order.status = next;
        if next == OrderStatus::Received {
            order.received_at = Some(now);
        }
        Ok(order.clone())
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<SupplierOrder> {
        let index = self
            .orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        debug!(id = %id, "Deleting supplier order");
        Ok(self.orders.remove(index))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
