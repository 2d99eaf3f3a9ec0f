//! # Reports
//!
//! Aggregations the reporting screens print. Every function takes the
//! collections it summarizes as arguments and returns a fresh value.
//!
//! ## Tax Report Layout
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬─────────┬─────────┬──────────┐
//! │ Venta    │ Subtotal │ Exento   │ Gravado  │ ISV 15% │ ISV 18% │ Total    │
//! ├──────────┼──────────┼──────────┼──────────┼─────────┼─────────┼──────────┤
//! │ SALE-001 │   200.00 │    50.00 │   150.00 │   15.00 │    9.00 │   224.00 │
//! │ SALE-002 │   100.00 │     0.00 │   100.00 │   15.00 │    0.00 │   115.00 │
//! ├──────────┼──────────┼──────────┼──────────┼─────────┼─────────┼──────────┤
//! │ TOTAL    │   300.00 │    50.00 │   250.00 │   30.00 │    9.00 │   339.00 │
//! └──────────┴──────────┴──────────┴──────────┴─────────┴─────────┴──────────┘
//! ```
//!
//! Totals are sums of the breakdowns frozen into each sale; nothing is
//! recomputed from line items here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::money::Money;
use crate::tax::TaxBreakdown;
use crate::types::{Product, Return, ReturnStatus, Sale, SaleStatus, SupplierOrder};

/// Number of products listed in "top products".
pub const TOP_PRODUCTS_LIMIT: usize = 10;

fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    Money::from_decimal(total.to_decimal() / Decimal::from(count as u64))
}

// =============================================================================
// Tax Report
// =============================================================================

/// One sale's row in the tax report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxReportRow {
    pub sale_id: String,
    pub customer_name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub subtotal: Money,
    pub exento: Money,
    /// `gravado15 + gravado18`.
    pub gravado: Money,
    pub isv15: Money,
    pub isv18: Money,
    pub total: Money,
}

/// Tax report over a set of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxReport {
    pub rows: Vec<TaxReportRow>,
    pub sale_count: usize,
    /// Sum of every sale's breakdown.
    pub breakdown: TaxBreakdown,
    pub subtotal: Money,
    pub total: Money,
}

impl TaxReport {
    pub fn from_sales(sales: &[Sale]) -> Self {
        let rows = sales
            .iter()
            .map(|sale| TaxReportRow {
                sale_id: sale.id.clone(),
                customer_name: sale.customer_name.clone(),
                created_at: sale.created_at,
                subtotal: sale.subtotal,
                exento: sale.tax_breakdown.exento,
                gravado: sale.tax_breakdown.gravado(),
                isv15: sale.tax_breakdown.isv15,
                isv18: sale.tax_breakdown.isv18,
                total: sale.total,
            })
            .collect();

        TaxReport {
            rows,
            sale_count: sales.len(),
            breakdown: sales.iter().map(|s| s.tax_breakdown).sum(),
            subtotal: sales.iter().map(|s| s.subtotal).sum(),
            total: sales.iter().map(|s| s.total).sum(),
        }
    }

    pub fn exento(&self) -> Money {
        self.breakdown.exento
    }

    pub fn gravado(&self) -> Money {
        self.breakdown.gravado()
    }

    pub fn isv15(&self) -> Money {
        self.breakdown.isv15
    }

    pub fn isv18(&self) -> Money {
        self.breakdown.isv18
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Headline sales figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales: usize,
    pub total_revenue: Money,
    pub average_sale: Money,
    pub completed_sales: usize,
    pub pending_sales: usize,
}

impl SalesStats {
    pub fn from_sales(sales: &[Sale]) -> Self {
        let total_revenue: Money = sales.iter().map(|s| s.total).sum();
        SalesStats {
            total_sales: sales.len(),
            total_revenue,
            average_sale: average(total_revenue, sales.len()),
            completed_sales: sales.iter().filter(|s| s.status == SaleStatus::Completed).count(),
            pending_sales: sales.iter().filter(|s| s.status == SaleStatus::Pending).count(),
        }
    }
}

/// Units and revenue of one product across many sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// Best-selling products by units, highest first.
///
/// Ties keep the order in which products first appear in `sales`.
pub fn top_products(sales: &[Sale], limit: usize) -> Vec<ProductSales> {
    let mut order: Vec<String> = Vec::new();
    let mut by_product: HashMap<String, ProductSales> = HashMap::new();

    for item in sales.iter().flat_map(|s| s.items.iter()) {
        let entry = by_product.entry(item.product_id.clone()).or_insert_with(|| {
            order.push(item.product_id.clone());
            ProductSales {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: 0,
                revenue: Money::zero(),
            }
        });
        entry.quantity += item.quantity;
        entry.revenue += item.line_total;
    }

    let mut ranked: Vec<ProductSales> = order
        .iter()
        .filter_map(|id| by_product.remove(id))
        .collect();
    // Stable sort keeps first-seen order among equal quantities.
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// Inventory
// =============================================================================

/// Catalog figures for the inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: usize,
    /// Σ sale price × stock.
    pub stock_value: Money,
    pub average_price: Money,
    /// IDs of products at or below the low-stock threshold.
    pub low_stock: Vec<String>,
}

impl InventoryStats {
    pub fn from_products(products: &[Product], low_stock_threshold: i64) -> Self {
        let price_sum: Money = products.iter().map(|p| p.sale_price).sum();
        InventoryStats {
            total_products: products.len(),
            stock_value: products.iter().map(Product::stock_value).sum(),
            average_price: average(price_sum, products.len()),
            low_stock: products
                .iter()
                .filter(|p| p.stock <= low_stock_threshold)
                .map(|p| p.id.clone())
                .collect(),
        }
    }
}

// =============================================================================
// Returns & Orders
// =============================================================================

/// Return counts per status and the value refunded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnStats {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub processed: usize,
    /// Total of processed returns only.
    pub refund_total: Money,
}

impl ReturnStats {
    pub fn from_returns(returns: &[Return]) -> Self {
        returns.iter().fold(ReturnStats::default(), |mut stats, ret| {
            match ret.status {
                ReturnStatus::Pending => stats.pending += 1,
                ReturnStatus::Approved => stats.approved += 1,
                ReturnStatus::Rejected => stats.rejected += 1,
                ReturnStatus::Processed => {
                    stats.processed += 1;
                    stats.refund_total += ret.total;
                }
            }
            stats
        })
    }
}

/// Total value of all supplier orders, whatever their status.
pub fn order_value_total(orders: &[SupplierOrder]) -> Money {
    orders.iter().map(|o| o.total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
