//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (tienda-core)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds lookups and workflow failures         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use tienda_core::{CoreError, ValidationError};

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in the store.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - Customer or supplier was soft-deleted
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// An imported record reuses an ID already in the store.
    #[error("Duplicate {entity}: '{id}' already exists")]
    Duplicate { entity: String, id: String },

    /// A status change the workflow does not allow.
    ///
    /// ## When This Occurs
    /// - Processing a return that was never approved
    /// - Receiving an order that was never sent
    /// - Any move out of a final status
    #[error("{entity} {id} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: String,
        id: String,
        from: String,
        to: String,
    },

    /// A return was requested against a sale that is not completed.
    #[error("Sale {sale_id} is not completed and cannot be returned")]
    NotReturnable { sale_id: String },

    /// Input failed a business rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Domain error from tienda-core.
    #[error(transparent)]
    Core(CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidTransition error from two status values.
    pub fn invalid_transition(
        entity: impl Into<String>,
        id: impl Into<String>,
        from: impl std::fmt::Debug,
        to: impl std::fmt::Debug,
    ) -> Self {
        StoreError::InvalidTransition {
            entity: entity.into(),
            id: id.into(),
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

/// Core validation failures surface as [`StoreError::Validation`] so
/// callers match one variant regardless of which layer rejected the input.
impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => StoreError::Validation(v),
            other => StoreError::Core(other),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
