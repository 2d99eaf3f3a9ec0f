//! # Sequential Identifiers
//!
//! Every stored record gets a human-readable ID made of an entity prefix and
//! a zero-padded counter: `PROD-001`, `SALE-042`, `RET-1000`.
//!
//! ## How the Next ID Is Chosen
//! ```text
//! existing: [PROD-001, PROD-007, CAT-003, PROD-x]
//!              │          │         │        │
//!              ▼          ▼         ▼        ▼
//!              1          7      (other)  (no number)
//!
//! max = 7  ──►  next = PROD-008
//! ```
//!
//! The counter is derived from the collection passed in, never from hidden
//! state, so the same collection always yields the same next ID.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Minimum number of digits in the numeric part.
pub const ID_DIGITS: usize = 3;

/// The kinds of record that carry a sequential ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Category,
    Customer,
    Sale,
    Return,
    Supplier,
    SupplierOrder,
}

impl EntityKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Product => "PROD",
            EntityKind::Category => "CAT",
            EntityKind::Customer => "CUST",
            EntityKind::Sale => "SALE",
            EntityKind::Return => "RET",
            EntityKind::Supplier => "SUPP",
            EntityKind::SupplierOrder => "ORD",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Product => "Product",
            EntityKind::Category => "Category",
            EntityKind::Customer => "Customer",
            EntityKind::Sale => "Sale",
            EntityKind::Return => "Return",
            EntityKind::Supplier => "Supplier",
            EntityKind::SupplierOrder => "Supplier order",
        };
        f.write_str(name)
    }
}

/// Extracts the counter from `PREFIX-<digits>...`.
///
/// Only the leading digits after the dash count, so `PROD-012-old` yields
/// 12. IDs with another prefix or no digits yield `None`.
fn sequence_number(id: &str, prefix: &str) -> Option<u64> {
    let rest = id.strip_prefix(prefix)?.strip_prefix('-')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Computes the next ID for `prefix` given the IDs already in use.
///
/// ## Rules
/// - Only IDs starting with `PREFIX-` are considered
/// - Next number is the highest existing number + 1, or 1 if there is none
/// - Padded to three digits; larger numbers are written in full
/// - A counter at `u64::MAX` still gets a successor
///
/// ## Example
/// ```rust
/// use tienda_core::ids::next_id;
///
/// assert_eq!(next_id(Vec::<&str>::new(), "SALE"), "SALE-001");
/// assert_eq!(next_id(["SALE-001", "SALE-009"], "SALE"), "SALE-010");
/// assert_eq!(next_id(["SALE-999"], "SALE"), "SALE-1000");
/// ```
pub fn next_id<I, S>(existing_ids: I, prefix: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let next = existing_ids
        .into_iter()
        .filter_map(|id| sequence_number(id.as_ref(), prefix))
        .max()
        .map_or(1, |max| u128::from(max) + 1);

    format!("{}-{:0width$}", prefix, next, width = ID_DIGITS)
}

/// [`next_id`] keyed by entity kind.
pub fn next_id_for<I, S>(existing_ids: I, kind: EntityKind) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    next_id(existing_ids, kind.prefix())
}

// =============================================================================
// Unit Tests
// =============================================================================
