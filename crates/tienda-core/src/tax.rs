//! # ISV Breakdown Engine
//!
//! Splits tax-inclusive line totals into the amounts a Honduran invoice has
//! to show: the exempt amount, the taxable base per rate (gravado) and the
//! ISV charged per rate.
//!
//! ## How a Basket Is Decomposed
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line items (tax-inclusive totals)                                      │
//! │                                                                         │
//! │   Leche   exento  L  50.00 ─────────────────────► exento    += 50.00    │
//! │                                                                         │
//! │   Jabón   isv15   L 115.00 ─► base = 115 / 1.15 ─► gravado15 += 100.00  │
//! │                               tax  = 115 - base ─► isv15     +=  15.00  │
//! │                                                                         │
//! │   Cerveza isv18   L  59.00 ─► base =  59 / 1.18 ─► gravado18 +=  50.00  │
//! │                               tax  =  59 - base ─► isv18     +=   9.00  │
//! │                                                                         │
//! │   After the loop: round each of the five fields ONCE to centavos.       │
//! │                                                                         │
//! │   subtotal = 200.00   total tax = 24.00   grand total = 224.00          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Accumulation happens in [`Decimal`] with no intermediate rounding. Each
//! field is rounded once at the end, half away from zero (see
//! [`crate::money::ROUNDING`]). Rounding per line before summing gives
//! different results for baskets with many small lines; this module does not
//! do that.
//!
//! ## Failure Semantics
//! Nothing here returns an error. Zero and negative totals are accumulated
//! as given. [`classify_rate`] maps any raw rate to some category.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use tracing::{debug, trace};
use ts_rs::TS;

use crate::money::Money;
use crate::types::LineItem;

// =============================================================================
// Tax Category
// =============================================================================

/// The closed set of ISV categories a product can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TaxCategory {
    /// Exonerado, 0%.
    Exento,
    /// General rate, 15%.
    #[default]
    Isv15,
    /// Alcohol and tobacco rate, 18%.
    Isv18,
}

impl TaxCategory {
    /// Every category, in invoice order.
    pub const ALL: [TaxCategory; 3] = [TaxCategory::Exento, TaxCategory::Isv15, TaxCategory::Isv18];

    /// Tax rate as a fraction (0, 0.15, 0.18).
    pub fn rate(&self) -> Decimal {
        match self {
            TaxCategory::Exento => Decimal::ZERO,
            TaxCategory::Isv15 => Decimal::new(15, 2),
            TaxCategory::Isv18 => Decimal::new(18, 2),
        }
    }

    /// Factor between a price without tax and a price with tax
    /// (1.00, 1.15, 1.18).
    pub fn multiplier(&self) -> Decimal {
        Decimal::ONE + self.rate()
    }

    /// Label shown on forms and invoices.
    pub fn label(&self) -> &'static str {
        match self {
            TaxCategory::Exento => "Exonerado (0%)",
            TaxCategory::Isv15 => "ISV 15%",
            TaxCategory::Isv18 => "ISV 18% (Alcohol)",
        }
    }

    /// Wire name (`exento`, `isv15`, `isv18`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxCategory::Exento => "exento",
            TaxCategory::Isv15 => "isv15",
            TaxCategory::Isv18 => "isv18",
        }
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not one of the three known ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tax category: {0}")]
pub struct UnknownTaxCategory(pub String);

impl FromStr for TaxCategory {
    type Err = UnknownTaxCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exento" => Ok(TaxCategory::Exento),
            "isv15" => Ok(TaxCategory::Isv15),
            "isv18" => Ok(TaxCategory::Isv18),
            other => Err(UnknownTaxCategory(other.to_string())),
        }
    }
}

// =============================================================================
// Tax Breakdown
// =============================================================================

/// Decomposition of a basket's total into exempt, taxable and tax amounts.
///
/// A breakdown is a value: it is computed by [`compute_breakdown`] and then
/// copied into the `Sale` or `Return` it belongs to. Nothing mutates it in
/// place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    /// Total of exempt lines.
    pub exento: Money,
    /// Pre-tax base of 15% lines.
    pub gravado15: Money,
    /// Pre-tax base of 18% lines.
    pub gravado18: Money,
    /// ISV charged at 15%.
    pub isv15: Money,
    /// ISV charged at 18%.
    pub isv18: Money,
}

impl TaxBreakdown {
    /// All-zero breakdown (what an empty basket produces).
    pub const fn zero() -> Self {
        TaxBreakdown {
            exento: Money::zero(),
            gravado15: Money::zero(),
            gravado18: Money::zero(),
            isv15: Money::zero(),
            isv18: Money::zero(),
        }
    }

    /// Pre-tax total: `exento + gravado15 + gravado18`.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.exento + self.gravado15 + self.gravado18
    }

    /// Tax total: `isv15 + isv18`.
    #[inline]
    pub fn total_tax(&self) -> Money {
        self.isv15 + self.isv18
    }

    /// `subtotal + total_tax`. Matches the sum of the line totals up to one
    /// centavo per category present in the basket.
    #[inline]
    pub fn grand_total(&self) -> Money {
        self.subtotal() + self.total_tax()
    }

    /// Combined taxable base of both rates (`gravado15 + gravado18`).
    #[inline]
    pub fn gravado(&self) -> Money {
        self.gravado15 + self.gravado18
    }
}

impl Add for TaxBreakdown {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        TaxBreakdown {
            exento: self.exento + other.exento,
            gravado15: self.gravado15 + other.gravado15,
            gravado18: self.gravado18 + other.gravado18,
            isv15: self.isv15 + other.isv15,
            isv18: self.isv18 + other.isv18,
        }
    }
}

impl Sum for TaxBreakdown {
    fn sum<I: Iterator<Item = TaxBreakdown>>(iter: I) -> Self {
        iter.fold(TaxBreakdown::zero(), |acc, b| acc + b)
    }
}

impl<'a> Sum<&'a TaxBreakdown> for TaxBreakdown {
    fn sum<I: Iterator<Item = &'a TaxBreakdown>>(iter: I) -> Self {
        iter.fold(TaxBreakdown::zero(), |acc, b| acc + *b)
    }
}

/// Unrounded running totals.
#[derive(Debug, Default)]
struct Accumulator {
    exento: Decimal,
    gravado15: Decimal,
    gravado18: Decimal,
    isv15: Decimal,
    isv18: Decimal,
}

impl Accumulator {
    fn push(&mut self, category: TaxCategory, line_total: Decimal) {
        match category {
            TaxCategory::Exento => self.exento += line_total,
            TaxCategory::Isv15 => {
                let base = price_without_tax(line_total, category);
                self.gravado15 += base;
                self.isv15 += line_total - base;
            }
            TaxCategory::Isv18 => {
                let base = price_without_tax(line_total, category);
                self.gravado18 += base;
                self.isv18 += line_total - base;
            }
        }
    }

    fn finish(self) -> TaxBreakdown {
        TaxBreakdown {
            exento: Money::from_decimal(self.exento),
            gravado15: Money::from_decimal(self.gravado15),
            gravado18: Money::from_decimal(self.gravado18),
            isv15: Money::from_decimal(self.isv15),
            isv18: Money::from_decimal(self.isv18),
        }
    }
}

// =============================================================================
// Engine Operations
// =============================================================================

/// Computes the ISV breakdown of a list of tax-inclusive line items.
///
/// ## Algorithm
/// 1. Start all five buckets at zero
/// 2. Exempt lines add their total to `exento`
/// 3. Taxed lines add `total / (1 + rate)` to their gravado bucket and the
///    remainder to their ISV bucket
/// 4. Round each bucket once, to centavos
///
/// ## Example
/// ```rust
/// use tienda_core::money::Money;
/// use tienda_core::tax::{compute_breakdown, TaxCategory};
/// use tienda_core::types::LineItem;
///
/// let items = vec![
///     LineItem::from_parts("PROD-003", "Cerveza", 1, Money::from_cents(11800), TaxCategory::Isv18),
/// ];
/// let breakdown = compute_breakdown(&items);
/// assert_eq!(breakdown.gravado18.cents(), 10000);
/// assert_eq!(breakdown.isv18.cents(), 1800);
/// ```
pub fn compute_breakdown(items: &[LineItem]) -> TaxBreakdown {
    let mut acc = Accumulator::default();

    for item in items {
        trace!(
            product_id = %item.product_id,
            category = %item.tax_category,
            line_total = %item.line_total,
            "Accumulating line"
        );
        acc.push(item.tax_category, item.line_total.to_decimal());
    }

    let breakdown = acc.finish();
    debug!(
        items = items.len(),
        subtotal = %breakdown.subtotal(),
        tax = %breakdown.total_tax(),
        "Computed ISV breakdown"
    );
    breakdown
}

/// Price including ISV: `base_price × (1 + rate)`. No rounding.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use tienda_core::tax::{price_with_tax, TaxCategory};
///
/// let price = price_with_tax(Decimal::new(100, 0), TaxCategory::Isv15);
/// assert_eq!(price, Decimal::new(115, 0));
/// ```
pub fn price_with_tax(base_price: Decimal, category: TaxCategory) -> Decimal {
    base_price * category.multiplier()
}

/// Price excluding ISV: `taxed_price / (1 + rate)`. No rounding.
///
/// The divisor is one of 1.00, 1.15 or 1.18, so there is no zero path.
pub fn price_without_tax(taxed_price: Decimal, category: TaxCategory) -> Decimal {
    taxed_price / category.multiplier()
}

/// Maps a raw numeric rate from a product record to a category.
///
/// ## Rules
/// ```text
/// rate == 0     → exento
/// rate == 0.15  → isv15
/// rate == 0.18  → isv18
/// rate >  0.16  → isv18
/// rate >  0     → isv15
/// otherwise     → exento   (negative, NaN)
/// ```
///
/// Older product records carry free-form rates. The 0.16 boundary is kept
/// as-is so existing records keep their classification.
pub fn classify_rate(rate: f64) -> TaxCategory {
    if rate == 0.0 {
        TaxCategory::Exento
    } else if rate == 0.15 {
        TaxCategory::Isv15
    } else if rate == 0.18 {
        TaxCategory::Isv18
    } else if rate > 0.16 {
        TaxCategory::Isv18
    } else if rate > 0.0 {
        TaxCategory::Isv15
    } else {
        TaxCategory::Exento
    }
}

/// Pre-tax total of a breakdown.
#[inline]
pub fn subtotal_of(breakdown: &TaxBreakdown) -> Money {
    breakdown.subtotal()
}

/// Tax total of a breakdown.
#[inline]
pub fn total_tax_of(breakdown: &TaxBreakdown) -> Money {
    breakdown.total_tax()
}

/// One-line summary of the non-zero parts of a breakdown.
///
/// ```rust
/// use tienda_core::money::Money;
/// use tienda_core::tax::{format_tax_summary, TaxBreakdown};
///
/// let breakdown = TaxBreakdown {
///     gravado15: Money::from_cents(10000),
///     isv15: Money::from_cents(1500),
///     ..TaxBreakdown::zero()
/// };
/// assert_eq!(
///     format_tax_summary(&breakdown),
///     "Gravado 15%: L 100.00 | ISV 15%: L 15.00"
/// );
/// ```
pub fn format_tax_summary(breakdown: &TaxBreakdown) -> String {
    let parts = [
        ("Exonerado", breakdown.exento),
        ("Gravado 15%", breakdown.gravado15),
        ("Gravado 18%", breakdown.gravado18),
        ("ISV 15%", breakdown.isv15),
        ("ISV 18%", breakdown.isv18),
    ];

    parts
        .iter()
        .filter(|(_, amount)| amount.is_positive())
        .map(|(label, amount)| format!("{}: {}", label, amount))
        .collect::<Vec<_>>()
        .join(" | ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(total_cents: i64, category: TaxCategory) -> LineItem {
        LineItem::from_parts("PROD-001", "Producto", 1, Money::from_cents(total_cents), category)
    }

    #[test]
    fn test_empty_basket_is_zero() {
        let breakdown = compute_breakdown(&[]);
        assert_eq!(breakdown, TaxBreakdown::zero());
        assert!(subtotal_of(&breakdown).is_zero());
        assert!(total_tax_of(&breakdown).is_zero());
    }

    #[test]
    fn test_exempt_lines_only_touch_exento() {
        let items = vec![line(1050, TaxCategory::Exento), line(2999, TaxCategory::Exento)];
        let breakdown = compute_breakdown(&items);

        assert_eq!(breakdown.exento.cents(), 4049);
        assert!(breakdown.gravado15.is_zero());
        assert!(breakdown.gravado18.is_zero());
        assert!(breakdown.isv15.is_zero());
        assert!(breakdown.isv18.is_zero());
    }

    #[test]
    fn test_single_isv15_line_is_exact() {
        let breakdown = compute_breakdown(&[line(11500, TaxCategory::Isv15)]);
        assert_eq!(breakdown.gravado15.cents(), 10000);
        assert_eq!(breakdown.isv15.cents(), 1500);
    }

    #[test]
    fn test_single_isv18_line_is_exact() {
        let breakdown = compute_breakdown(&[line(11800, TaxCategory::Isv18)]);
        assert_eq!(breakdown.gravado18.cents(), 10000);
        assert_eq!(breakdown.isv18.cents(), 1800);
    }

    #[test]
    fn test_mixed_basket() {
        let items = vec![
            line(5000, TaxCategory::Exento),
            line(11500, TaxCategory::Isv15),
            line(5900, TaxCategory::Isv18),
        ];
        let breakdown = compute_breakdown(&items);

        assert_eq!(
            breakdown,
            TaxBreakdown {
                exento: Money::from_cents(5000),
                gravado15: Money::from_cents(10000),
                gravado18: Money::from_cents(5000),
                isv15: Money::from_cents(1500),
                isv18: Money::from_cents(900),
            }
        );
        assert_eq!(breakdown.subtotal().cents(), 20000);
        assert_eq!(breakdown.total_tax().cents(), 2400);
        assert_eq!(breakdown.grand_total().cents(), 22400);
    }

    #[test]
    fn test_non_terminating_division() {
        // 100 / 1.15 = 86.9565... ; tax = 13.0434...
        let breakdown = compute_breakdown(&[line(10000, TaxCategory::Isv15)]);
        assert_eq!(breakdown.gravado15.cents(), 8696);
        assert_eq!(breakdown.isv15.cents(), 1304);
        assert_eq!(breakdown.grand_total().cents(), 10000);
    }

    /// Buckets are rounded once after accumulation, not per line.
    ///
    /// Three L 0.10 lines at 15%:
    /// - accumulated: base 0.26086..., tax 0.03913... → 0.26 / 0.04
    /// - per-line rounding would give 0.09 × 3 = 0.27 / 0.01 × 3 = 0.03
    #[test]
    fn test_rounding_happens_once_per_field() {
        let items = vec![
            line(10, TaxCategory::Isv15),
            line(10, TaxCategory::Isv15),
            line(10, TaxCategory::Isv15),
        ];
        let breakdown = compute_breakdown(&items);
        assert_eq!(breakdown.gravado15.cents(), 26);
        assert_eq!(breakdown.isv15.cents(), 4);
    }

    #[test]
    fn test_negative_and_zero_lines_accumulate() {
        let items = vec![
            line(0, TaxCategory::Isv18),
            line(-11500, TaxCategory::Isv15),
            line(23000, TaxCategory::Isv15),
        ];
        let breakdown = compute_breakdown(&items);
        assert_eq!(breakdown.gravado15.cents(), 10000);
        assert_eq!(breakdown.isv15.cents(), 1500);
        assert!(breakdown.gravado18.is_zero());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let items = vec![
            line(1234, TaxCategory::Isv15),
            line(987, TaxCategory::Isv18),
            line(55, TaxCategory::Exento),
        ];
        assert_eq!(compute_breakdown(&items), compute_breakdown(&items));
    }

    #[test]
    fn test_price_conversions() {
        assert_eq!(price_with_tax(dec!(100), TaxCategory::Exento), dec!(100));
        assert_eq!(price_with_tax(dec!(100), TaxCategory::Isv15), dec!(115));
        assert_eq!(price_with_tax(dec!(100), TaxCategory::Isv18), dec!(118));

        assert_eq!(price_without_tax(dec!(115), TaxCategory::Isv15), dec!(100));
        assert_eq!(price_without_tax(dec!(59), TaxCategory::Isv18), dec!(50));
        assert_eq!(price_without_tax(dec!(42.42), TaxCategory::Exento), dec!(42.42));
    }

    #[test]
    fn test_price_conversions_do_not_round() {
        let taxed = price_with_tax(dec!(10.99), TaxCategory::Isv15);
        assert_eq!(taxed, dec!(12.6385));
    }

    #[test]
    fn test_classify_rate() {
        assert_eq!(classify_rate(0.0), TaxCategory::Exento);
        assert_eq!(classify_rate(0.15), TaxCategory::Isv15);
        assert_eq!(classify_rate(0.18), TaxCategory::Isv18);
        assert_eq!(classify_rate(0.20), TaxCategory::Isv18);
        assert_eq!(classify_rate(0.05), TaxCategory::Isv15);
    }

    #[test]
    fn test_classify_rate_boundary_and_out_of_domain() {
        assert_eq!(classify_rate(0.16), TaxCategory::Isv15);
        assert_eq!(classify_rate(0.1600001), TaxCategory::Isv18);
        assert_eq!(classify_rate(-0.15), TaxCategory::Exento);
        assert_eq!(classify_rate(f64::NAN), TaxCategory::Exento);
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in TaxCategory::ALL {
            assert_eq!(category.as_str().parse::<TaxCategory>(), Ok(category));
        }
        assert!("isv12".parse::<TaxCategory>().is_err());
        assert_eq!(serde_json::to_string(&TaxCategory::Isv18).unwrap(), "\"isv18\"");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(TaxCategory::Exento.label(), "Exonerado (0%)");
        assert_eq!(TaxCategory::Isv15.label(), "ISV 15%");
        assert_eq!(TaxCategory::Isv18.label(), "ISV 18% (Alcohol)");
    }

    #[test]
    fn test_breakdowns_sum() {
        let a = compute_breakdown(&[line(11500, TaxCategory::Isv15)]);
        let b = compute_breakdown(&[line(5000, TaxCategory::Exento)]);
        let total: TaxBreakdown = [a, b].iter().sum();

        assert_eq!(total.exento.cents(), 5000);
        assert_eq!(total.gravado15.cents(), 10000);
        assert_eq!(total.grand_total().cents(), 16500);
    }

    #[test]
    fn test_format_tax_summary() {
        let breakdown = compute_breakdown(&[
            line(5000, TaxCategory::Exento),
            line(11500, TaxCategory::Isv15),
            line(5900, TaxCategory::Isv18),
        ]);
        assert_eq!(
            format_tax_summary(&breakdown),
            "Exonerado: L 50.00 | Gravado 15%: L 100.00 | Gravado 18%: L 50.00 \
             | ISV 15%: L 15.00 | ISV 18%: L 9.00"
        );
        assert_eq!(format_tax_summary(&TaxBreakdown::zero()), "");
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let json = serde_json::to_value(TaxBreakdown::zero()).unwrap();
        assert!(json.get("gravado15").is_some());
        assert!(json.get("isv18").is_some());
    }
}
