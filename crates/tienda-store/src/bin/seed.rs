//! # Seed Data Generator
//!
//! Builds a demo store, runs a day of activity through it and logs the
//! resulting reports.
//!
//! ## Usage
//! ```bash
//! # Default demo
//! cargo run -p tienda-store --bin seed
//!
//! # Load legacy product records first
//! cargo run -p tienda-store --bin seed -- --products ./productos.json
//!
//! # More logging
//! RUST_LOG=trace cargo run -p tienda-store --bin seed
//! ```
//!
//! ## Generated Data
//! - One product per ISV category in each catalog section
//! - Two customers and one supplier
//! - A sale per customer, one processed return, one received order

use chrono::{Duration, Utc};
use std::env;
use std::error::Error;
use tracing::{info, Subscriber};
use tracing_subscriber::EnvFilter;

use tienda_core::tax::format_tax_summary;
use tienda_core::{
    ContactDetails, Money, NewContact, OrderStatus, ReturnItem, ReturnStatus, SupplierOrderItem,
    TaxCategory,
};
use tienda_store::{Store, StoreConfig};

/// Demo catalog: (section, name, price in centavos, category, stock)
const CATALOG: &[(&str, &str, i64, TaxCategory, i64)] = &[
    ("Abarrotes", "Arroz Progreso 1lb", 1800, TaxCategory::Exento, 120),
    ("Abarrotes", "Frijoles Rojos 1lb", 2400, TaxCategory::Exento, 80),
    ("Abarrotes", "Café Maya 400g", 8950, TaxCategory::Isv15, 30),
    ("Limpieza", "Jabón Xtra 400g", 3450, TaxCategory::Isv15, 45),
    ("Limpieza", "Cloro Magia Blanca 1L", 2875, TaxCategory::Isv15, 8),
    ("Bebidas", "Agua Azul 1L", 1500, TaxCategory::Exento, 60),
    ("Bebidas", "Cerveza Salva Vida 355ml", 3500, TaxCategory::Isv18, 96),
    ("Bebidas", "Ron Plata 750ml", 21240, TaxCategory::Isv18, 6),
];

const DEFAULT_LOG_FILTER: &str = "info,tienda=debug";

/// Formatting subscriber gated only by `filter`.
fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing::subscriber::set_global_default(subscriber(filter))
        .unwrap_or_else(|e| eprintln!("Logging already initialized: {}", e));
}

fn contact(search_key: &str, name: &str, rtn: &str, city: &str) -> NewContact {
    NewContact {
        search_key: search_key.to_string(),
        rtn: Some(rtn.to_string()),
        name: name.to_string(),
        contact: ContactDetails {
            city: Some(city.to_string()),
            country: Some("Honduras".to_string()),
            ..ContactDetails::default()
        },
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let products_path = args
        .iter()
        .position(|a| a == "--products")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let config = StoreConfig::from_env();
    info!(store = %config.store_name, rtn = %config.rtn, "Seeding store");
    let mut store = Store::new(config);

    if let Some(path) = products_path {
        let json = std::fs::read_to_string(&path)?;
        let count = store.import_products_json(&json)?;
        info!(path = %path, count = count, "Loaded legacy products");
    }

    // Catalog
    for (section, name, cents, category, stock) in CATALOG {
        let mut draft = store.product_draft(name, Money::from_cents(*cents), *stock);
        draft.category = section.to_string();
        draft.tax_category = *category;
        draft.purchase_price = Money::from_cents(cents * 7 / 10);
        store.products_mut().insert(draft)?;
    }
    for section in ["Abarrotes", "Limpieza", "Bebidas"] {
        store.categories_mut().insert(section, None)?;
    }

    // Parties
    let juan = store
        .customers_mut()
        .insert(contact("JPEREZ", "Juan Pérez", "08011990123456", "Tegucigalpa"))?;
    let maria = store
        .customers_mut()
        .insert(contact("MLOPEZ", "María López", "05011985654321", "San Pedro Sula"))?;
    let supplier_ids: Vec<String> = store.products().all().iter().map(|p| p.id.clone()).collect();
    let supplier = store.suppliers_mut().insert(
        contact("DISTCEN", "Distribuidora Central", "08019005000123", "Comayagüela"),
        supplier_ids,
    )?;

    // Sales
    let first_ids: Vec<String> = store.products().all().iter().take(4).map(|p| p.id.clone()).collect();
    let mut lines = Vec::new();
    for (qty, id) in (1..).zip(&first_ids) {
        lines.push(store.line_for_product(id, qty)?);
    }
    let sale = store.create_sale(&juan.id, lines)?;
    info!(id = %sale.id, "{}", format_tax_summary(&sale.tax_breakdown));

    let drinks: Vec<String> = store.products().all().iter().skip(5).map(|p| p.id.clone()).collect();
    let mut lines = Vec::new();
    for id in &drinks {
        lines.push(store.line_for_product(id, 2)?);
    }
    let second = store.create_sale(&maria.id, lines)?;
    info!(id = %second.id, "{}", format_tax_summary(&second.tax_breakdown));

    // Return one unit of the first line and process it
    let returned = ReturnItem {
        line: sale.items[0].with_quantity(1),
        reason: "Empaque roto".to_string(),
    };
    let ret = store.create_return(&sale.id, vec![returned], "Producto dañado")?;
    store.update_return_status(&ret.id, ReturnStatus::Approved)?;
    store.update_return_status(&ret.id, ReturnStatus::Processed)?;

    // Restock low items from the supplier
    let restock: Vec<SupplierOrderItem> = store
        .low_stock_products()
        .iter()
        .map(|p| SupplierOrderItem::new(p.id.clone(), p.name.clone(), 24, p.purchase_price))
        .collect();
    if !restock.is_empty() {
        let order = store.create_supplier_order(
            &supplier.id,
            restock,
            Utc::now() + Duration::days(3),
            Some("Entregar por la mañana".to_string()),
        )?;
        store.update_order_status(&order.id, OrderStatus::Sent)?;
        store.update_order_status(&order.id, OrderStatus::Received)?;
    }

    // Reports
    let symbol = &store.config().currency_symbol;
    let report = store.tax_report();
    info!(
        sales = report.sale_count,
        subtotal = %report.subtotal,
        total = %report.total,
        "Tax report: {}",
        format_tax_summary(&report.breakdown)
    );

    let stats = store.sales_stats();
    info!(count = stats.total_sales, revenue = %stats.total_revenue, average = %stats.average_sale, "Sales");

    for top in store.top_products(3) {
        info!(product = %top.product_name, units = top.quantity, revenue = %top.revenue, "Top product");
    }

    let inventory = store.inventory_stats();
    info!(
        products = inventory.total_products,
        stock_value = %inventory.stock_value,
        low_stock = inventory.low_stock.len(),
        "Inventory"
    );

    let returns = store.return_stats();
    info!(processed = returns.processed, refunded = %returns.refund_total, "Returns");
    info!(total = %store.order_value_total(), currency = %symbol, "Supplier orders");

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
