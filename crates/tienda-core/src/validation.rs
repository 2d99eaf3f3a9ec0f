//! # Validation Module
//!
//! Business rules checked where form input enters the system.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend forms                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store service (tienda-store)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: ISV engine (tienda-core::tax)                                │
//! │  └── No checks: accumulates whatever passed the layers above           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Café Maya 400g").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Sale};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;

    if name.trim().chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer or supplier search key.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
pub fn validate_search_key(key: &str) -> ValidationResult<()> {
    required("search_key", key)?;

    if key.trim().chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "search_key".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates the reason given for a return.
pub fn validate_return_reason(reason: &str) -> ValidationResult<()> {
    required("reason", reason)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (free items)
///
/// ```rust
/// use tienda_core::money::Money;
/// use tienda_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the lines of a sale or return before finalizing it.
///
/// ## Rules
/// - At least one line
/// - Every quantity passes [`validate_quantity`]
/// - Every unit price passes [`validate_price`]
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
        validate_price(item.unit_price)?;
    }

    Ok(())
}

/// Checks that a return asks for no more units than the sale contained.
///
/// Quantities are compared per product, summing repeated lines on both
/// sides.
pub fn validate_return_quantities(sale: &Sale, items: &[LineItem]) -> ValidationResult<()> {
    let mut seen: Vec<&str> = Vec::new();

    for item in items {
        if seen.contains(&item.product_id.as_str()) {
            continue;
        }
        seen.push(&item.product_id);

        let requested: i64 = items
            .iter()
            .filter(|i| i.product_id == item.product_id)
            .map(|i| i.quantity)
            .sum();
        let sold = sale.quantity_of(&item.product_id);

        if requested > sold {
            return Err(ValidationError::ExceedsSold {
                product_id: item.product_id.clone(),
                sold,
                requested,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::{TaxBreakdown, TaxCategory};
    use crate::types::SaleStatus;
    use chrono::Utc;

    fn item(product_id: &str, qty: i64) -> LineItem {
        LineItem::from_parts(product_id, "Producto", qty, Money::from_cents(1000), TaxCategory::Isv15)
    }

    fn sale_with(items: Vec<LineItem>) -> Sale {
        Sale {
            id: "SALE-001".to_string(),
            customer_id: "CUST-001".to_string(),
            customer_name: "Cliente".to_string(),
            items,
            subtotal: Money::zero(),
            tax_breakdown: TaxBreakdown::zero(),
            total: Money::zero(),
            status: SaleStatus::Completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Harina de maíz").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_search_key() {
        assert!(validate_search_key("JPEREZ").is_ok());
        assert_eq!(
            validate_search_key(""),
            Err(ValidationError::Required {
                field: "search_key".to_string()
            })
        );
        assert!(validate_search_key(&"K".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  leche ").unwrap(), "leche");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[item("PROD-001", 2)]).is_ok());
        assert!(matches!(
            validate_line_items(&[]),
            Err(ValidationError::Empty { .. })
        ));
        assert!(validate_line_items(&[item("PROD-001", 0)]).is_err());
    }

    #[test]
    fn test_validate_return_reason() {
        assert!(validate_return_reason("Producto dañado").is_ok());
        assert!(validate_return_reason(" ").is_err());
    }

    #[test]
    fn test_validate_return_quantities() {
        let sale = sale_with(vec![item("PROD-001", 3), item("PROD-002", 1)]);

        assert!(validate_return_quantities(&sale, &[item("PROD-001", 3)]).is_ok());
        assert!(validate_return_quantities(&sale, &[item("PROD-002", 1)]).is_ok());

        assert_eq!(
            validate_return_quantities(&sale, &[item("PROD-001", 2), item("PROD-001", 2)]),
            Err(ValidationError::ExceedsSold {
                product_id: "PROD-001".to_string(),
                sold: 3,
                requested: 4,
            })
        );
        assert!(validate_return_quantities(&sale, &[item("PROD-009", 1)]).is_err());
    }
}
