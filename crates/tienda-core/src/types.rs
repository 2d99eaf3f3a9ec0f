//! # Domain Types
//!
//! Canonical records used throughout Tienda POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Return      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id PROD-001    │   │  id SALE-001    │   │  id RET-001     │       │
//! │  │  sale_price     │   │  items          │   │  sale_id (FK)   │       │
//! │  │  tax_category   │   │  tax_breakdown  │   │  tax_breakdown  │       │
//! │  │  stock          │   │  status         │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Customer      │   │    Supplier     │   │ SupplierOrder   │       │
//! │  │  search_key     │   │  search_key     │   │  id ORD-001     │       │
//! │  │  rtn            │   │  product_ids    │   │  flat ISV 15%   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Schema
//! Every record here has a single canonical field per concept. Older
//! records with alias fields go through [`crate::legacy`] first.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tax::{compute_breakdown, price_without_tax, TaxBreakdown, TaxCategory};

// =============================================================================
// Catalog
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Sequential identifier (`PROD-001`).
    pub id: String,

    /// Reference code printed on shelves.
    pub reference: String,

    /// Barcode or internal code.
    pub code: String,

    /// Display name shown to cashier and on invoices.
    pub name: String,

    /// Cost paid to the supplier.
    pub purchase_price: Money,

    /// Shelf price, ISV included.
    pub sale_price: Money,

    /// Free-form category name.
    pub category: String,

    pub tax_category: TaxCategory,

    /// Units in stock. Never driven below zero by sales.
    pub stock: i64,

    /// Supplier that provides this product.
    pub supplier_id: Option<String>,
}

impl Product {
    /// Shelf price with the ISV taken out, unrounded.
    pub fn price_without_tax(&self) -> Decimal {
        price_without_tax(self.sale_price.to_decimal(), self.tax_category)
    }

    /// Value of current stock at sale price.
    pub fn stock_value(&self) -> Money {
        self.sale_price.multiply_quantity(self.stock)
    }
}

/// Product fields as entered on the catalog form (no ID yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub reference: String,
    pub code: String,
    pub name: String,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub category: String,
    pub tax_category: TaxCategory,
    pub stock: i64,
    pub supplier_id: Option<String>,
}

impl NewProduct {
    /// Assigns an ID and produces the stored record.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            reference: self.reference,
            code: self.code,
            name: self.name,
            purchase_price: self.purchase_price,
            sale_price: self.sale_price,
            category: self.category,
            tax_category: self.tax_category,
            stock: self.stock,
            supplier_id: self.supplier_id,
        }
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Parties
// =============================================================================

/// Address and contact fields shared by customers and suppliers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub department: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Sequential identifier (`CUST-001`).
    pub id: String,

    /// Short key typed at the register to find the customer.
    pub search_key: String,

    /// Honduran tax ID (Registro Tributario Nacional).
    pub rtn: Option<String>,

    pub name: String,

    #[serde(flatten)]
    pub contact: ContactDetails,

    /// False once the customer has been soft-deleted.
    pub visible: bool,
}

/// A supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Sequential identifier (`SUPP-001`).
    pub id: String,
    pub search_key: String,
    pub rtn: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub contact: ContactDetails,
    pub visible: bool,
    /// Products this supplier provides.
    pub product_ids: Vec<String>,
}

/// Customer or supplier fields as entered on the form (no ID yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub search_key: String,
    pub rtn: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub contact: ContactDetails,
}

impl NewContact {
    pub fn into_customer(self, id: String) -> Customer {
        Customer {
            id,
            search_key: self.search_key,
            rtn: self.rtn,
            name: self.name,
            contact: self.contact,
            visible: true,
        }
    }

    pub fn into_supplier(self, id: String, product_ids: Vec<String>) -> Supplier {
        Supplier {
            id,
            search_key: self.search_key,
            rtn: self.rtn,
            name: self.name,
            contact: self.contact,
            visible: true,
            product_ids,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry within a sale or return.
///
/// ## Invariant
/// `line_total == unit_price × quantity`. The constructors below keep it;
/// [`compute_breakdown`] trusts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price, ISV included, at time of sale (frozen).
    pub unit_price: Money,
    /// `unit_price × quantity`, ISV included.
    pub line_total: Money,
    pub tax_category: TaxCategory,
}

impl LineItem {
    /// Builds a line from its parts, computing the line total.
    pub fn from_parts(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        tax_category: TaxCategory,
    ) -> Self {
        LineItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            line_total: unit_price.multiply_quantity(quantity),
            tax_category,
        }
    }

    /// Snapshot of a product at its current shelf price.
    pub fn for_product(product: &Product, quantity: i64) -> Self {
        LineItem::from_parts(
            product.id.clone(),
            product.name.clone(),
            quantity,
            product.sale_price,
            product.tax_category,
        )
    }

    /// Same line with a different quantity.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        LineItem::from_parts(
            self.product_id.clone(),
            self.product_name.clone(),
            quantity,
            self.unit_price,
            self.tax_category,
        )
    }
}

/// Everything a sale or return form shows under its item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub tax_breakdown: TaxBreakdown,
    pub total_tax: Money,
    pub total: Money,
}

impl Totals {
    /// Runs the ISV engine over `items` and derives the totals from it.
    pub fn from_items(items: &[LineItem]) -> Self {
        Totals::from_breakdown(compute_breakdown(items))
    }

    pub fn from_breakdown(tax_breakdown: TaxBreakdown) -> Self {
        Totals {
            subtotal: tax_breakdown.subtotal(),
            tax_breakdown,
            total_tax: tax_breakdown.total_tax(),
            total: tax_breakdown.grand_total(),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The status of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale is in progress.
    #[default]
    Pending,
    /// Sale has been paid and finalized.
    Completed,
    /// Sale was cancelled.
    Cancelled,
}

/// A sale with its ISV breakdown frozen at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Sequential identifier (`SALE-001`).
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax_breakdown: TaxBreakdown,
    pub total: Money,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Units of `product_id` sold in this sale.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }
}

// =============================================================================
// Return
// =============================================================================

/// The status of a return.
///
/// ## State Machine
/// ```text
///            ┌──────────► Rejected
///            │
///  Pending ──┤
///            │
///            └──────────► Approved ──────► Processed (stock restored)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Processed,
}

impl ReturnStatus {
    /// Whether the workflow allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: ReturnStatus) -> bool {
        matches!(
            (self, next),
            (ReturnStatus::Pending, ReturnStatus::Approved)
                | (ReturnStatus::Pending, ReturnStatus::Rejected)
                | (ReturnStatus::Approved, ReturnStatus::Processed)
        )
    }
}

/// A returned line with the customer's reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItem {
    #[serde(flatten)]
    pub line: LineItem,
    pub reason: String,
}

/// Goods coming back from a customer against an earlier sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Return {
    /// Sequential identifier (`RET-001`).
    pub id: String,
    pub sale_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<ReturnItem>,
    pub subtotal: Money,
    pub tax_breakdown: TaxBreakdown,
    pub total: Money,
    pub status: ReturnStatus,
    pub reason: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Return {
    /// Plain line items, as fed to the ISV engine.
    pub fn lines(&self) -> Vec<LineItem> {
        self.items.iter().map(|i| i.line.clone()).collect()
    }
}

// =============================================================================
// Supplier Order
// =============================================================================

/// The status of a supplier order.
///
/// ## State Machine
/// ```text
///  Pending ──► Sent ──► Received (stock added)
///     │          │
///     └──────────┴────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Sent,
    Received,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Sent)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Sent, OrderStatus::Received)
                | (OrderStatus::Sent, OrderStatus::Cancelled)
        )
    }
}

/// A line on a purchase order, priced at cost without tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_cost: Money,
    pub total: Money,
}

impl SupplierOrderItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_cost: Money,
    ) -> Self {
        SupplierOrderItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_cost,
            total: unit_cost.multiply_quantity(quantity),
        }
    }
}

/// Subtotal, tax and total of a purchase order.
///
/// Purchase costs are entered without tax; ISV 15% is charged on top of
/// the whole subtotal regardless of product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    pub fn from_items(items: &[SupplierOrderItem]) -> Self {
        let subtotal: Money = items.iter().map(|i| i.total).sum();
        let tax = subtotal.apply_rate(TaxCategory::Isv15.rate());
        OrderTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// A purchase order sent to a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrder {
    /// Sequential identifier (`ORD-001`).
    pub id: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub items: Vec<SupplierOrderItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub expected_delivery: DateTime<Utc>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub received_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================
