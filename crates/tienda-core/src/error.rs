//! # Error Types
//!
//! Domain-specific error types for tienda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tienda-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tienda-store errors (separate crate)                                  │
//! │  └── StoreError       - Lookups, status transitions                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → Frontend             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ISV engine in [`crate::tax`] never returns an error. Out-of-domain
//! numbers degrade to best-effort results; the checks below run at the form
//! boundary instead.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A legacy record could not be parsed.
    ///
    /// ## When This Occurs
    /// - Imported JSON is not an object of the expected shape
    /// - A numeric field holds a non-numeric value
    #[error("Invalid {entity} record: {reason}")]
    InvalidRecord { entity: String, reason: String },

    /// A monetary amount cannot be represented in centavos.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::InvalidRecord {
            entity: "json".to_string(),
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A return asks for more units than the sale contained.
    #[error("Cannot return {requested} of {product_id}: only {sold} sold")]
    ExceedsSold {
        product_id: String,
        sold: i64,
        requested: i64,
    },

    /// A line list (sale, return, order) is empty.
    #[error("{field} must contain at least one item")]
    Empty { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
