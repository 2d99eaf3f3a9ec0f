//! # Store
//!
//! The single owner of every collection, and the workflows that touch more
//! than one of them.
//!
//! ## Workflows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stock Movements                                  │
//! │                                                                         │
//! │  create_sale ─────────────────► stock -= qty   (floored at 0)          │
//! │                                                                         │
//! │  create_return ──► Pending                                              │
//! │  update_return_status(Processed) ► stock += qty                        │
//! │                                                                         │
//! │  create_supplier_order ──► Pending ──► Sent                            │
//! │  update_order_status(Received) ──► stock += qty                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation goes through `&mut self`; there is no shared state and
//! no locking.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::repository::order::OrderRepository;
use crate::repository::party::{CategoryRepository, CustomerRepository, SupplierRepository};
use crate::repository::product::ProductRepository;
use crate::repository::returns::ReturnRepository;
use crate::repository::sale::SaleRepository;

use tienda_core::legacy::{self, LegacyLineItem};
use tienda_core::report::{
    order_value_total, top_products, InventoryStats, ProductSales, ReturnStats, SalesStats,
    TaxReport,
};
use tienda_core::validation::{
    validate_line_items, validate_price, validate_quantity, validate_return_quantities,
    validate_return_reason,
};
use tienda_core::{
    LineItem, Money, NewProduct, OrderStatus, OrderTotals, Product, Return, ReturnItem,
    ReturnStatus, Sale, SaleStatus, SupplierOrder, SupplierOrderItem, Totals, ValidationError,
};

/// In-memory store.
///
/// ## Usage
/// ```rust
/// use tienda_store::{Store, StoreConfig};
/// use tienda_core::{Money, NewContact};
///
/// let mut store = Store::new(StoreConfig::default());
///
/// let draft = store.product_draft("Jabón Xtra", Money::from_cents(11500), 20);
/// let product = store.products_mut().insert(draft).unwrap();
/// let customer = store
///     .customers_mut()
///     .insert(NewContact {
///         search_key: "JPEREZ".into(),
///         name: "Juan Pérez".into(),
///         ..NewContact::default()
///     })
///     .unwrap();
///
/// let line = store.line_for_product(&product.id, 2).unwrap();
/// let sale = store.create_sale(&customer.id, vec![line]).unwrap();
///
/// assert_eq!(sale.tax_breakdown.gravado15.cents(), 20000);
/// assert_eq!(sale.tax_breakdown.isv15.cents(), 3000);
/// assert_eq!(store.products().require(&product.id).unwrap().stock, 18);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Store {
    config: StoreConfig,
    products: ProductRepository,
    categories: CategoryRepository,
    customers: CustomerRepository,
    suppliers: SupplierRepository,
    sales: SaleRepository,
    returns: ReturnRepository,
    orders: OrderRepository,
}

impl Store {
    /// Creates an empty store.
    pub fn new(config: StoreConfig) -> Self {
        debug!(store = %config.store_name, "Opening store");
        Store {
            config,
            ..Store::default()
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn products_mut(&mut self) -> &mut ProductRepository {
        &mut self.products
    }

    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut CategoryRepository {
        &mut self.categories
    }

    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    pub fn customers_mut(&mut self) -> &mut CustomerRepository {
        &mut self.customers
    }

    pub fn suppliers(&self) -> &SupplierRepository {
        &self.suppliers
    }

    pub fn suppliers_mut(&mut self) -> &mut SupplierRepository {
        &mut self.suppliers
    }

    /// Sales are created through [`Store::create_sale`]; deletion is the
    /// only other mutation.
    pub fn sales(&self) -> &SaleRepository {
        &self.sales
    }

    pub fn delete_sale(&mut self, id: &str) -> StoreResult<Sale> {
        self.sales.delete(id)
    }

    pub fn returns(&self) -> &ReturnRepository {
        &self.returns
    }

    pub fn delete_return(&mut self, id: &str) -> StoreResult<Return> {
        self.returns.delete(id)
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }

    pub fn delete_order(&mut self, id: &str) -> StoreResult<SupplierOrder> {
        self.orders.delete(id)
    }

    // =========================================================================
    // Catalog helpers
    // =========================================================================

    /// A new-product form prefilled with the configured tax category.
    pub fn product_draft(&self, name: &str, sale_price: Money, stock: i64) -> NewProduct {
        NewProduct {
            reference: String::new(),
            code: String::new(),
            name: name.to_string(),
            purchase_price: Money::zero(),
            sale_price,
            category: String::new(),
            tax_category: self.config.default_tax_category,
            stock,
            supplier_id: None,
        }
    }

    /// A sale line for `quantity` units of a catalog product at its
    /// current shelf price.
    pub fn line_for_product(&self, product_id: &str, quantity: i64) -> StoreResult<LineItem> {
        validate_quantity(quantity)?;
        let product = self.products.require(product_id)?;
        Ok(LineItem::for_product(product, quantity))
    }

    /// Products at or below the configured low-stock threshold.
    pub fn low_stock_products(&self) -> Vec<&Product> {
        self.products.low_stock(self.config.low_stock_threshold)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a completed sale and takes its units out of stock.
    ///
    /// ## Steps
    /// 1. Validate the lines and resolve the customer and every product
    /// 2. Run the ISV engine over the lines
    /// 3. Store the sale with its breakdown frozen
    /// 4. Decrement stock per line, never below zero
    pub fn create_sale(&mut self, customer_id: &str, items: Vec<LineItem>) -> StoreResult<Sale> {
        validate_line_items(&items)?;
        let customer = self.customers.require(customer_id)?;
        for item in &items {
            self.products.require(&item.product_id)?;
        }

        let totals = Totals::from_items(&items);
        let sale = Sale {
            id: self.sales.next_id(),
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            items,
            subtotal: totals.subtotal,
            tax_breakdown: totals.tax_breakdown,
            total: totals.total,
            status: SaleStatus::Completed,
            created_at: Utc::now(),
        };

        for item in &sale.items {
            self.products.adjust_stock(&item.product_id, -item.quantity);
        }

        info!(
            id = %sale.id,
            customer = %sale.customer_id,
            lines = sale.items.len(),
            total = %sale.total,
            "Sale completed"
        );
        self.sales.insert(sale.clone());
        Ok(sale)
    }

    /// [`Store::create_sale`] for lines in the legacy record shape.
    ///
    /// Lines whose tax category is missing or unknown are dropped before
    /// the sale is built. If none survive, the sale is rejected as empty.
    pub fn create_sale_from_legacy(
        &mut self,
        customer_id: &str,
        raw: &[LegacyLineItem],
    ) -> StoreResult<Sale> {
        let items = legacy::normalize_line_items(raw);
        self.create_sale(customer_id, items)
    }

    // =========================================================================
    // Returns
    // =========================================================================

    /// Files a pending return against a completed sale.
    ///
    /// Only the product and quantity of each returned line are taken from
    /// the caller. Price and tax category come from the sold line, so the
    /// refund can never exceed what was charged. The return gets its own
    /// breakdown computed from those lines. Stock does not move until the
    /// return is processed.
    pub fn create_return(
        &mut self,
        sale_id: &str,
        items: Vec<ReturnItem>,
        reason: &str,
    ) -> StoreResult<Return> {
        validate_return_reason(reason)?;

        let sale = self.sales.require(sale_id)?;
        if sale.status != SaleStatus::Completed {
            return Err(StoreError::NotReturnable {
                sale_id: sale_id.to_string(),
            });
        }

        let lines: Vec<LineItem> = items.iter().map(|i| i.line.clone()).collect();
        validate_line_items(&lines)?;
        validate_return_quantities(sale, &lines)?;

        let items = items
            .into_iter()
            .map(|item| priced_from_sale(sale, item))
            .collect::<StoreResult<Vec<ReturnItem>>>()?;
        let lines: Vec<LineItem> = items.iter().map(|i| i.line.clone()).collect();

        let totals = Totals::from_items(&lines);
        let ret = Return {
            id: self.returns.next_id(),
            sale_id: sale.id.clone(),
            customer_id: sale.customer_id.clone(),
            customer_name: sale.customer_name.clone(),
            items,
            subtotal: totals.subtotal,
            tax_breakdown: totals.tax_breakdown,
            total: totals.total,
            status: ReturnStatus::Pending,
            reason: reason.trim().to_string(),
            created_at: Utc::now(),
            processed_at: None,
        };

        info!(id = %ret.id, sale_id = %ret.sale_id, total = %ret.total, "Return filed");
        self.returns.insert(ret.clone());
        Ok(ret)
    }

    /// Moves a return through its workflow. Processing puts the returned
    /// units back in stock.
    pub fn update_return_status(&mut self, id: &str, status: ReturnStatus) -> StoreResult<Return> {
        let ret = self.returns.transition(id, status, Utc::now())?;

        if ret.status == ReturnStatus::Processed {
            for item in &ret.items {
                let product_id = &item.line.product_id;
                if self.products.adjust_stock(product_id, item.line.quantity).is_none() {
                    warn!(return_id = %ret.id, product_id = %product_id, "Returned product no longer in catalog");
                }
            }
        }

        info!(id = %ret.id, status = ?ret.status, "Return updated");
        Ok(ret)
    }

    // =========================================================================
    // Supplier Orders
    // =========================================================================

    /// Places a pending purchase order with a supplier.
    pub fn create_supplier_order(
        &mut self,
        supplier_id: &str,
        items: Vec<SupplierOrderItem>,
        expected_delivery: DateTime<Utc>,
        notes: Option<String>,
    ) -> StoreResult<SupplierOrder> {
        if items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            }
            .into());
        }
        for item in &items {
            validate_quantity(item.quantity)?;
            validate_price(item.unit_cost)?;
        }
        let supplier = self.suppliers.require(supplier_id)?;

        let totals = OrderTotals::from_items(&items);
        let order = SupplierOrder {
            id: self.orders.next_id(),
            supplier_id: supplier.id.clone(),
            supplier_name: supplier.name.clone(),
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: OrderStatus::Pending,
            expected_delivery,
            notes: notes.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
            received_at: None,
        };

        info!(id = %order.id, supplier = %order.supplier_id, total = %order.total, "Supplier order placed");
        self.orders.insert(order.clone());
        Ok(order)
    }

    /// Moves an order through its workflow. Receiving adds the ordered
    /// units to stock.
    pub fn update_order_status(
        &mut self,
        id: &str,
        status: OrderStatus,
    ) -> StoreResult<SupplierOrder> {
        let order = self.orders.transition(id, status, Utc::now())?;

        if order.status == OrderStatus::Received {
            for item in &order.items {
                if self.products.adjust_stock(&item.product_id, item.quantity).is_none() {
                    warn!(order_id = %order.id, product_id = %item.product_id, "Received product not in catalog");
                }
            }
        }

        info!(id = %order.id, status = ?order.status, "Supplier order updated");
        Ok(order)
    }

    // =========================================================================
    // Legacy Import
    // =========================================================================

    /// Loads a JSON array of legacy product records. Returns how many were
    /// added.
    ///
    /// The batch is all or nothing: a malformed record or an ID already in
    /// use leaves the catalog untouched.
    pub fn import_products_json(&mut self, json: &str) -> StoreResult<usize> {
        let products = legacy::import_products(json)?;
        let count = self.products.import_all(products)?;
        info!(count = count, "Imported products");
        Ok(count)
    }

    pub fn import_customers_json(&mut self, json: &str) -> StoreResult<usize> {
        let customers = legacy::import_customers(json)?;
        let count = self.customers.import_all(customers)?;
        info!(count = count, "Imported customers");
        Ok(count)
    }

    pub fn import_suppliers_json(&mut self, json: &str) -> StoreResult<usize> {
        let suppliers = legacy::import_suppliers(json)?;
        let count = self.suppliers.import_all(suppliers)?;
        info!(count = count, "Imported suppliers");
        Ok(count)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn tax_report(&self) -> TaxReport {
        TaxReport::from_sales(self.sales.all())
    }

    pub fn sales_stats(&self) -> SalesStats {
        SalesStats::from_sales(self.sales.all())
    }

    pub fn top_products(&self, limit: usize) -> Vec<ProductSales> {
        top_products(self.sales.all(), limit)
    }

    pub fn inventory_stats(&self) -> InventoryStats {
        InventoryStats::from_products(self.products.all(), self.config.low_stock_threshold)
    }

    pub fn return_stats(&self) -> ReturnStats {
        ReturnStats::from_returns(self.returns.all())
    }

    /// Value of every supplier order on file.
    pub fn order_value_total(&self) -> Money {
        order_value_total(self.orders.all())
    }
}

/// Rebuilds a returned line from the first sold line of the same product.
fn priced_from_sale(sale: &Sale, item: ReturnItem) -> StoreResult<ReturnItem> {
    let requested = &item.line;
    let sold = sale
        .items
        .iter()
        .find(|line| line.product_id == requested.product_id)
        .ok_or_else(|| ValidationError::ExceedsSold {
            product_id: requested.product_id.clone(),
            sold: 0,
            requested: requested.quantity,
        })?;

    Ok(ReturnItem {
        line: sold.with_quantity(requested.quantity),
        reason: item.reason,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tienda_core::{NewContact, TaxCategory};

    /// Store with three products (exempt, ISV 15, ISV 18), one customer and
    /// one supplier.
    fn seeded() -> Store {
        let mut store = Store::new(StoreConfig::default());

        for (name, cents, category, stock) in [
            ("Arroz 1lb", 5000, TaxCategory::Exento, 10),
            ("Jabón Xtra", 11500, TaxCategory::Isv15, 5),
            ("Ron Plata", 5900, TaxCategory::Isv18, 2),
        ] {
            let mut draft = store.product_draft(name, Money::from_cents(cents), stock);
            draft.tax_category = category;
            store.products_mut().insert(draft).unwrap();
        }

        store
            .customers_mut()
            .insert(NewContact {
                search_key: "JPEREZ".to_string(),
                name: "Juan Pérez".to_string(),
                ..NewContact::default()
            })
            .unwrap();
        store
            .suppliers_mut()
            .insert(
                NewContact {
                    search_key: "DISTCEN".to_string(),
                    name: "Distribuidora Central".to_string(),
                    ..NewContact::default()
                },
                vec!["PROD-001".to_string()],
            )
            .unwrap();

        store
    }

    fn sell(store: &mut Store, lines: &[(&str, i64)]) -> Sale {
        let items = lines
            .iter()
            .map(|(id, qty)| store.line_for_product(id, *qty).unwrap())
            .collect();
        store.create_sale("CUST-001", items).unwrap()
    }

    fn stock(store: &Store, id: &str) -> i64 {
        store.products().require(id).unwrap().stock
    }

    fn return_item(sale: &Sale, index: usize, qty: i64) -> ReturnItem {
        ReturnItem {
            line: sale.items[index].with_quantity(qty),
            reason: "Dañado".to_string(),
        }
    }

    #[test]
    fn test_create_sale_freezes_breakdown() {
        let mut store = seeded();
        let sale = sell(&mut store, &[("PROD-001", 1), ("PROD-002", 1), ("PROD-003", 1)]);

        assert_eq!(sale.id, "SALE-001");
        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.customer_name, "Juan Pérez");
        assert_eq!(sale.tax_breakdown.exento.cents(), 5000);
        assert_eq!(sale.tax_breakdown.gravado15.cents(), 10000);
        assert_eq!(sale.tax_breakdown.gravado18.cents(), 5000);
        assert_eq!(sale.tax_breakdown.isv15.cents(), 1500);
        assert_eq!(sale.tax_breakdown.isv18.cents(), 900);
        assert_eq!(sale.subtotal.cents(), 20000);
        assert_eq!(sale.total.cents(), 22400);
    }

    #[test]
    fn test_create_sale_decrements_stock_with_floor() {
        let mut store = seeded();
        let line = store.line_for_product("PROD-003", 2).unwrap();
        // More than on hand: the sale goes through, stock stops at zero.
        let oversold = line.with_quantity(5);
        store.create_sale("CUST-001", vec![oversold]).unwrap();
        assert_eq!(stock(&store, "PROD-003"), 0);

        sell(&mut store, &[("PROD-001", 3)]);
        assert_eq!(stock(&store, "PROD-001"), 7);
    }

    #[test]
    fn test_create_sale_rejections() {
        let mut store = seeded();
        assert!(matches!(
            store.create_sale("CUST-001", vec![]),
            Err(StoreError::Validation(ValidationError::Empty { .. }))
        ));

        let line = store.line_for_product("PROD-001", 1).unwrap();
        assert!(matches!(
            store.create_sale("CUST-404", vec![line.clone()]),
            Err(StoreError::NotFound { .. })
        ));

        let mut ghost = line;
        ghost.product_id = "PROD-404".to_string();
        assert!(store.create_sale("CUST-001", vec![ghost]).is_err());

        assert!(store.sales().all().is_empty());
        assert_eq!(stock(&store, "PROD-001"), 10);
    }

    #[test]
    fn test_line_for_product_validates_quantity() {
        let store = seeded();
        assert!(store.line_for_product("PROD-001", 0).is_err());
        assert!(store.line_for_product("PROD-001", 1000).is_err());
        assert!(matches!(
            store.line_for_product("PROD-404", 1),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_return_workflow_restores_stock() {
        let mut store = seeded();
        let sale = sell(&mut store, &[("PROD-002", 3)]);
        assert_eq!(stock(&store, "PROD-002"), 2);

        let ret = store
            .create_return(&sale.id, vec![return_item(&sale, 0, 2)], "Empaque roto")
            .unwrap();
        assert_eq!(ret.id, "RET-001");
        assert_eq!(ret.status, ReturnStatus::Pending);
        assert_eq!(ret.customer_id, "CUST-001");
        assert_eq!(ret.tax_breakdown.gravado15.cents(), 20000);
        assert_eq!(ret.tax_breakdown.isv15.cents(), 3000);
        assert_eq!(stock(&store, "PROD-002"), 2);

        store.update_return_status(&ret.id, ReturnStatus::Approved).unwrap();
        assert_eq!(stock(&store, "PROD-002"), 2);

        let processed = store
            .update_return_status(&ret.id, ReturnStatus::Processed)
            .unwrap();
        assert!(processed.processed_at.is_some());
        assert_eq!(stock(&store, "PROD-002"), 4);
        assert_eq!(store.return_stats().refund_total.cents(), 23000);
    }

    #[test]
    fn test_return_rejections() {
        let mut store = seeded();
        let sale = sell(&mut store, &[("PROD-001", 2)]);

        assert!(matches!(
            store.create_return(&sale.id, vec![return_item(&sale, 0, 1)], "  "),
            Err(StoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            store.create_return(&sale.id, vec![return_item(&sale, 0, 3)], "Vencido"),
            Err(StoreError::Validation(ValidationError::ExceedsSold { .. }))
        ));
        assert!(matches!(
            store.create_return("SALE-404", vec![return_item(&sale, 0, 1)], "Vencido"),
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.returns().all().is_empty());
    }

    #[test]
    fn test_return_refund_uses_sold_price() {
        let mut store = seeded();
        let sale = sell(&mut store, &[("PROD-001", 1)]);
        assert_eq!(sale.total.cents(), 5000);

        let mut inflated = return_item(&sale, 0, 1);
        inflated.line.unit_price = Money::from_cents(100000);
        inflated.line.line_total = Money::from_cents(100000);
        inflated.line.tax_category = TaxCategory::Isv18;

        let ret = store.create_return(&sale.id, vec![inflated], "Vencido").unwrap();
        assert_eq!(ret.items[0].line.unit_price.cents(), 5000);
        assert_eq!(ret.items[0].line.line_total.cents(), 5000);
        assert_eq!(ret.items[0].line.tax_category, TaxCategory::Exento);
        assert_eq!(ret.items[0].reason, "Dañado");
        assert_eq!(ret.total.cents(), 5000);
    }

    #[test]
    fn test_rejected_return_is_final() {
        let mut store = seeded();
        let sale = sell(&mut store, &[("PROD-001", 2)]);
        let ret = store
            .create_return(&sale.id, vec![return_item(&sale, 0, 1)], "Vencido")
            .unwrap();

        store.update_return_status(&ret.id, ReturnStatus::Rejected).unwrap();
        assert!(matches!(
            store.update_return_status(&ret.id, ReturnStatus::Processed),
            Err(StoreError::InvalidTransition { .. })
        ));
        assert_eq!(stock(&store, "PROD-001"), 8);
    }

    #[test]
    fn test_supplier_order_receive_adds_stock() {
        let mut store = seeded();
        let items = vec![SupplierOrderItem::new("PROD-001", "Arroz 1lb", 20, Money::from_cents(3000))];

        let order = store
            .create_supplier_order("SUPP-001", items, Utc::now(), Some("Entrega lunes".to_string()))
            .unwrap();
        assert_eq!(order.id, "ORD-001");
        assert_eq!(order.subtotal.cents(), 60000);
        assert_eq!(order.tax.cents(), 9000);
        assert_eq!(order.total.cents(), 69000);

        assert!(store.update_order_status(&order.id, OrderStatus::Received).is_err());
        store.update_order_status(&order.id, OrderStatus::Sent).unwrap();
        let received = store.update_order_status(&order.id, OrderStatus::Received).unwrap();

        assert!(received.received_at.is_some());
        assert_eq!(stock(&store, "PROD-001"), 30);
        assert_eq!(store.order_value_total().cents(), 69000);
    }

    #[test]
    fn test_supplier_order_rejections() {
        let mut store = seeded();
        assert!(store
            .create_supplier_order("SUPP-001", vec![], Utc::now(), None)
            .is_err());

        let items = vec![SupplierOrderItem::new("PROD-001", "Arroz", 1, Money::from_cents(100))];
        assert!(matches!(
            store.create_supplier_order("SUPP-404", items, Utc::now(), None),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reports() {
        let mut store = seeded();
        sell(&mut store, &[("PROD-001", 1), ("PROD-002", 1), ("PROD-003", 1)]);
        sell(&mut store, &[("PROD-002", 1)]);

        let report = store.tax_report();
        assert_eq!(report.sale_count, 2);
        assert_eq!(report.exento().cents(), 5000);
        assert_eq!(report.gravado().cents(), 25000);
        assert_eq!(report.isv15().cents(), 3000);
        assert_eq!(report.isv18().cents(), 900);
        assert_eq!(report.total.cents(), 33900);

        let stats = store.sales_stats();
        assert_eq!(stats.total_sales, 2);
        assert_eq!(stats.completed_sales, 2);

        let top = store.top_products(1);
        assert_eq!(top[0].product_id, "PROD-002");
        assert_eq!(top[0].quantity, 2);

        // Stock left: 9, 3 and 1, all at or below the default threshold of 10.
        let low: Vec<&str> = store.low_stock_products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(low, vec!["PROD-001", "PROD-002", "PROD-003"]);
        assert_eq!(store.inventory_stats().low_stock.len(), 3);
    }

    #[test]
    fn test_delete_records() {
        let mut store = seeded();
        let sale = sell(&mut store, &[("PROD-001", 1)]);
        store.delete_sale(&sale.id).unwrap();
        assert!(store.sales().get_by_id(&sale.id).is_none());
        assert!(matches!(store.delete_return("RET-001"), Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete_order("ORD-001"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_product_draft_uses_configured_category() {
        let store = Store::new(StoreConfig {
            default_tax_category: TaxCategory::Exento,
            ..StoreConfig::default()
        });
        let draft = store.product_draft("Frijoles", Money::from_cents(3000), 1);
        assert_eq!(draft.tax_category, TaxCategory::Exento);
    }

    #[test]
    fn test_import_legacy_products() {
        let mut store = Store::new(StoreConfig::default());
        let json = r#"[
            {"id": "PROD-007", "nombre": "Leche Sula", "precio_venta": 32.5, "impuesto": 0, "unidades_existencia": 4},
            {"id": "PROD-008", "name": "Galletas", "price": 18.0, "taxCategory": "isv15", "stock": 40}
        ]"#;

        assert_eq!(store.import_products_json(json).unwrap(), 2);
        let leche = store.products().require("PROD-007").unwrap();
        assert_eq!(leche.tax_category, TaxCategory::Exento);
        assert_eq!(leche.sale_price.cents(), 3250);

        let draft = store.product_draft("Café", Money::from_cents(5000), 1);
        assert_eq!(store.products_mut().insert(draft).unwrap().id, "PROD-009");

        assert!(matches!(
            store.import_products_json(json),
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_failed_import_leaves_collections_unchanged() {
        let mut store = seeded();

        let products = r#"[
            {"id": "PROD-050", "nombre": "Leche Sula", "precio_venta": 32.5, "impuesto": 0},
            {"id": "PROD-001", "nombre": "Arroz", "precio_venta": 50.0, "impuesto": 0}
        ]"#;
        assert!(matches!(
            store.import_products_json(products),
            Err(StoreError::Duplicate { .. })
        ));
        assert_eq!(store.products().len(), 3);
        assert!(store.products().get_by_id("PROD-050").is_none());

        let customers = r#"[
            {"id": "CUST-009", "nombre": "María López"},
            {"id": "CUST-009", "nombre": "María López"}
        ]"#;
        assert!(store.import_customers_json(customers).is_err());
        assert_eq!(store.customers().visible().len(), 1);

        let suppliers = r#"[
            {"id": "SUPP-002", "nombre": "Lácteos Sula"},
            {"id": "SUPP-001", "nombre": "Distribuidora Central"}
        ]"#;
        assert!(store.import_suppliers_json(suppliers).is_err());
        assert!(store.suppliers().get_by_id("SUPP-002").is_none());
    }

    #[test]
    fn test_create_sale_from_legacy_drops_unknown_categories() {
        let mut store = seeded();
        let raw = vec![
            LegacyLineItem {
                product_id: "PROD-002".to_string(),
                product_name: "Jabón Xtra".to_string(),
                quantity: 1,
                price: 115.0,
                total: Some(115.0),
                tax_category: Some("isv15".to_string()),
            },
            LegacyLineItem {
                product_id: "PROD-003".to_string(),
                product_name: "Ron Plata".to_string(),
                quantity: 1,
                price: 59.0,
                total: Some(59.0),
                tax_category: Some("isv12".to_string()),
            },
        ];

        let sale = store.create_sale_from_legacy("CUST-001", &raw).unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.tax_breakdown.gravado15.cents(), 10000);
        assert_eq!(sale.tax_breakdown.isv15.cents(), 1500);
        assert_eq!(sale.tax_breakdown.gravado18.cents(), 0);
        assert_eq!(sale.total.cents(), 11500);
        assert_eq!(stock(&store, "PROD-002"), 4);
        assert_eq!(stock(&store, "PROD-003"), 2);

        assert!(matches!(
            store.create_sale_from_legacy("CUST-001", &raw[1..]),
            Err(StoreError::Validation(ValidationError::Empty { .. }))
        ));
    }
}
