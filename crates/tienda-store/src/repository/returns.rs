//! # Return Repository
//!
//! Returns and their approval workflow.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create_return ──► Pending ──┬──► Rejected                             │
//! │                               │                                         │
//! │                               └──► Approved ──► Processed               │
//! │                                                   │                     │
//! │                                                   └── processed_at set  │
//! │                                                       stock restored    │
//! │                                                       (by Store)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use tienda_core::ids::{next_id_for, EntityKind};
use tienda_core::{Return, ReturnStatus};

const ENTITY: &str = "Return";

/// Repository for returns.
#[derive(Debug, Clone, Default)]
pub struct ReturnRepository {
    returns: Vec<Return>,
}

impl ReturnRepository {
    pub fn new() -> Self {
        ReturnRepository::default()
    }

    pub fn all(&self) -> &[Return] {
        &self.returns
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Return> {
        self.returns.iter().find(|r| r.id == id)
    }

    pub fn require(&self, id: &str) -> StoreResult<&Return> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Returns filed against `sale_id`.
    pub fn for_sale(&self, sale_id: &str) -> Vec<&Return> {
        self.returns.iter().filter(|r| r.sale_id == sale_id).collect()
    }

    pub fn next_id(&self) -> String {
        next_id_for(self.returns.iter().map(|r| &r.id), EntityKind::Return)
    }

    pub(crate) fn insert(&mut self, ret: Return) {
        debug!(id = %ret.id, sale_id = %ret.sale_id, total = %ret.total, "Inserting return");
        self.returns.push(ret);
    }

    /// Moves a return to `next`, stamping `processed_at` on `Processed`.
    pub(crate) fn transition(
        &mut self,
        id: &str,
        next: ReturnStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Return> {
        let ret = self
            .returns
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        if !ret.status.can_transition_to(next) {
            return Err(StoreError::invalid_transition(ENTITY, id, ret.status, next));
        }

        debug!(id = %id, from = ?ret.status, to = ?next, "Return status change");
        ret.status = next;
        if next == ReturnStatus::Processed {
            ret.processed_at = Some(now);
        }
        Ok(ret.clone())
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<Return> {
        let index = self
            .returns
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;

        debug!(id = %id, "Deleting return");
        Ok(self.returns.remove(index))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
