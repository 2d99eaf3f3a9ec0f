//! # Legacy Record Adapter
//!
//! Older exports carry each concept twice: a Spanish canonical field and an
//! English alias left over from an earlier schema (`nombre` / `name`,
//! `precio_venta` / `price`, `unidades_existencia` / `stock`, ...). This
//! module folds those into the canonical records of [`crate::types`] once,
//! at the import boundary, so nothing downstream ever looks at an alias.
//!
//! ## Resolution Order
//! ```text
//! canonical field ──► legacy alias ──► default
//!
//! tax category:  taxCategory (if recognised)
//!                  └──► classify_rate(impuesto)
//!                         └──► classify_rate(0.15)
//! ```
//!
//! Prices arrive as decimal Lempiras and are rounded to centavos.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tax::{classify_rate, TaxCategory};
use crate::types::{ContactDetails, Customer, LineItem, Product, Supplier};

/// Rate assumed when a legacy product has no `impuesto`.
pub const DEFAULT_LEGACY_RATE: f64 = 0.15;

fn money_from_f64(value: f64) -> Money {
    Money::from_decimal(Decimal::from_f64(value).unwrap_or(Decimal::ZERO))
}

/// Trimmed value, or `None` when absent or blank.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_non_empty(canonical: &Option<String>, alias: &Option<String>) -> Option<String> {
    non_empty(canonical).or_else(|| non_empty(alias))
}

fn missing(entity: &str, field: &str) -> CoreError {
    CoreError::InvalidRecord {
        entity: entity.to_string(),
        reason: format!("missing {}", field),
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product as stored by older versions of the front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyProduct {
    pub id: Option<String>,
    pub referencia: Option<String>,
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub precio_compra: Option<f64>,
    pub precio_venta: Option<f64>,
    pub categoria: Option<String>,
    pub impuesto: Option<f64>,
    pub unidades_existencia: Option<i64>,
    pub proveedor: Option<String>,

    // Aliases from the earlier schema
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    #[serde(rename = "taxCategory")]
    pub tax_category: Option<String>,
    pub barcode: Option<String>,
}

impl LegacyProduct {
    /// Category from the explicit field when recognised, else from the rate.
    pub fn resolve_tax_category(&self) -> TaxCategory {
        self.tax_category
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| classify_rate(self.impuesto.unwrap_or(DEFAULT_LEGACY_RATE)))
    }

    /// Folds the record into a canonical [`Product`].
    ///
    /// ## Errors
    /// `InvalidRecord` when the record has no ID or no name under either
    /// field.
    pub fn normalize(&self) -> CoreResult<Product> {
        let id = non_empty(&self.id).ok_or_else(|| missing("product", "id"))?;
        let name = first_non_empty(&self.nombre, &self.name)
            .ok_or_else(|| missing("product", "nombre/name"))?;

        Ok(Product {
            id,
            reference: self.referencia.clone().unwrap_or_default(),
            code: first_non_empty(&self.codigo, &self.barcode).unwrap_or_default(),
            name,
            purchase_price: money_from_f64(self.precio_compra.unwrap_or(0.0)),
            sale_price: money_from_f64(self.precio_venta.or(self.price).unwrap_or(0.0)),
            category: first_non_empty(&self.categoria, &self.category).unwrap_or_default(),
            tax_category: self.resolve_tax_category(),
            stock: self.unidades_existencia.or(self.stock).unwrap_or(0),
            supplier_id: non_empty(&self.proveedor),
        })
    }
}

// =============================================================================
// Customers & Suppliers
// =============================================================================

/// A customer or supplier as stored by older versions of the front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyContact {
    pub id: Option<String>,
    pub clave_busqueda: Option<String>,
    pub rtn: Option<String>,
    pub nombre: Option<String>,
    pub direccion: Option<String>,
    pub codigo_postal: Option<String>,
    pub ciudad: Option<String>,
    pub departamento: Option<String>,
    pub pais: Option<String>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub visible: Option<bool>,

    // Aliases from the earlier schema
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub ruc: Option<String>,
    pub products: Option<Vec<String>>,
}

impl LegacyContact {
    fn contact_details(&self) -> ContactDetails {
        ContactDetails {
            address: first_non_empty(&self.direccion, &self.address),
            postal_code: self.codigo_postal.clone(),
            city: self.ciudad.clone(),
            department: self.departamento.clone(),
            country: self.pais.clone(),
            email: first_non_empty(&self.correo, &self.email),
            phone: first_non_empty(&self.telefono, &self.phone),
        }
    }

    /// Shared part of customer/supplier normalization: (id, key, name).
    fn identity(&self, entity: &str) -> CoreResult<(String, String, String)> {
        let id = non_empty(&self.id).ok_or_else(|| missing(entity, "id"))?;
        let name = first_non_empty(&self.nombre, &self.name)
            .ok_or_else(|| missing(entity, "nombre/name"))?;
        // Records that predate the search key are found by their ID.
        let search_key = non_empty(&self.clave_busqueda).unwrap_or_else(|| id.clone());
        Ok((id, search_key, name))
    }

    pub fn to_customer(&self) -> CoreResult<Customer> {
        let (id, search_key, name) = self.identity("customer")?;
        Ok(Customer {
            id,
            search_key,
            rtn: first_non_empty(&self.rtn, &self.ruc),
            name,
            contact: self.contact_details(),
            visible: self.visible.unwrap_or(true),
        })
    }

    pub fn to_supplier(&self) -> CoreResult<Supplier> {
        let (id, search_key, name) = self.identity("supplier")?;
        Ok(Supplier {
            id,
            search_key,
            rtn: first_non_empty(&self.rtn, &self.ruc),
            name,
            contact: self.contact_details(),
            visible: self.visible.unwrap_or(true),
            product_ids: self.products.clone().unwrap_or_default(),
        })
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// A sale/return line whose tax category has not been checked yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLineItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub total: Option<f64>,
    pub tax_category: Option<String>,
}

impl LegacyLineItem {
    /// Converts the line, or `None` when its category is missing or unknown.
    ///
    /// The recorded `total` is kept as the line total when present.
    pub fn normalize(&self) -> Option<LineItem> {
        let category: TaxCategory = self.tax_category.as_deref()?.parse().ok()?;
        let mut item = LineItem::from_parts(
            self.product_id.clone(),
            self.product_name.clone(),
            self.quantity,
            money_from_f64(self.price),
            category,
        );
        if let Some(total) = self.total {
            item.line_total = money_from_f64(total);
        }
        Some(item)
    }
}

/// Converts raw lines, dropping any with an unrecognised tax category.
///
/// A dropped line contributes to no bucket of the ISV breakdown.
pub fn normalize_line_items(raw: &[LegacyLineItem]) -> Vec<LineItem> {
    let items: Vec<LineItem> = raw
        .iter()
        .filter_map(|line| {
            let item = line.normalize();
            if item.is_none() {
                warn!(
                    product_id = %line.product_id,
                    category = ?line.tax_category,
                    "Dropping line with unknown tax category"
                );
            }
            item
        })
        .collect();

    debug!(received = raw.len(), kept = items.len(), "Normalized line items");
    items
}

// =============================================================================
// JSON Import
// =============================================================================

/// Parses a JSON array of legacy products into canonical products.
///
/// ## Errors
/// - `InvalidRecord` if the JSON is malformed or any record lacks an ID or
///   a name
pub fn import_products(json: &str) -> CoreResult<Vec<Product>> {
    let raw: Vec<LegacyProduct> = serde_json::from_str(json)?;
    raw.iter().map(LegacyProduct::normalize).collect()
}

/// Parses a JSON array of legacy customers.
pub fn import_customers(json: &str) -> CoreResult<Vec<Customer>> {
    let raw: Vec<LegacyContact> = serde_json::from_str(json)?;
    raw.iter().map(LegacyContact::to_customer).collect()
}

/// Parses a JSON array of legacy suppliers.
pub fn import_suppliers(json: &str) -> CoreResult<Vec<Supplier>> {
    let raw: Vec<LegacyContact> = serde_json::from_str(json)?;
    raw.iter().map(LegacyContact::to_supplier).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::compute_breakdown;

    #[test]
    fn test_canonical_fields_win_over_aliases() {
        let raw = LegacyProduct {
            id: Some("PROD-001".to_string()),
            nombre: Some("Café Maya".to_string()),
            name: Some("Coffee".to_string()),
            precio_venta: Some(115.0),
            price: Some(99.0),
            unidades_existencia: Some(12),
            stock: Some(3),
            impuesto: Some(0.15),
            ..LegacyProduct::default()
        };
        let product = raw.normalize().unwrap();

        assert_eq!(product.name, "Café Maya");
        assert_eq!(product.sale_price.cents(), 11500);
        assert_eq!(product.stock, 12);
        assert_eq!(product.tax_category, TaxCategory::Isv15);
    }

    #[test]
    fn test_aliases_fill_missing_canonical_fields() {
        let raw = LegacyProduct {
            id: Some("PROD-002".to_string()),
            name: Some("Soap".to_string()),
            price: Some(10.99),
            stock: Some(4),
            barcode: Some("7420001".to_string()),
            category: Some("Limpieza".to_string()),
            ..LegacyProduct::default()
        };
        let product = raw.normalize().unwrap();

        assert_eq!(product.name, "Soap");
        assert_eq!(product.sale_price.cents(), 1099);
        assert_eq!(product.stock, 4);
        assert_eq!(product.code, "7420001");
        assert_eq!(product.category, "Limpieza");
        // No impuesto, no taxCategory → 15% default
        assert_eq!(product.tax_category, TaxCategory::Isv15);
    }

    #[test]
    fn test_tax_category_field_beats_rate() {
        let raw = LegacyProduct {
            id: Some("PROD-003".to_string()),
            nombre: Some("Ron".to_string()),
            impuesto: Some(0.15),
            tax_category: Some("isv18".to_string()),
            ..LegacyProduct::default()
        };
        assert_eq!(raw.resolve_tax_category(), TaxCategory::Isv18);

        let unknown = LegacyProduct {
            impuesto: Some(0.0),
            tax_category: Some("iva".to_string()),
            ..LegacyProduct::default()
        };
        assert_eq!(unknown.resolve_tax_category(), TaxCategory::Exento);
    }

    #[test]
    fn test_product_without_name_is_rejected() {
        let raw = LegacyProduct {
            id: Some("PROD-004".to_string()),
            name: Some("   ".to_string()),
            ..LegacyProduct::default()
        };
        assert!(matches!(raw.normalize(), Err(CoreError::InvalidRecord { .. })));
    }

    #[test]
    fn test_contact_aliases() {
        let raw = LegacyContact {
            id: Some("CUST-001".to_string()),
            name: Some("María López".to_string()),
            email: Some("maria@example.hn".to_string()),
            ruc: Some("0801".to_string()),
            ..LegacyContact::default()
        };
        let customer = raw.to_customer().unwrap();

        assert_eq!(customer.name, "María López");
        assert_eq!(customer.search_key, "CUST-001");
        assert_eq!(customer.rtn.as_deref(), Some("0801"));
        assert_eq!(customer.contact.email.as_deref(), Some("maria@example.hn"));
        assert!(customer.visible);
    }

    #[test]
    fn test_supplier_keeps_product_ids() {
        let raw = LegacyContact {
            id: Some("SUPP-001".to_string()),
            clave_busqueda: Some("DISTSULA".to_string()),
            nombre: Some("Distribuidora Sula".to_string()),
            products: Some(vec!["PROD-001".to_string()]),
            visible: Some(false),
            ..LegacyContact::default()
        };
        let supplier = raw.to_supplier().unwrap();
        assert_eq!(supplier.search_key, "DISTSULA");
        assert_eq!(supplier.product_ids, vec!["PROD-001".to_string()]);
        assert!(!supplier.visible);
    }

    #[test]
    fn test_unknown_category_lines_are_dropped() {
        let raw = vec![
            LegacyLineItem {
                product_id: "PROD-001".to_string(),
                product_name: "Jabón".to_string(),
                quantity: 1,
                price: 115.0,
                total: Some(115.0),
                tax_category: Some("isv15".to_string()),
            },
            LegacyLineItem {
                product_id: "PROD-002".to_string(),
                product_name: "Misterio".to_string(),
                quantity: 1,
                price: 40.0,
                total: Some(40.0),
                tax_category: Some("isv12".to_string()),
            },
            LegacyLineItem {
                product_id: "PROD-003".to_string(),
                product_name: "Sin categoría".to_string(),
                quantity: 2,
                price: 10.0,
                total: None,
                tax_category: None,
            },
        ];
        let items = normalize_line_items(&raw);
        assert_eq!(items.len(), 1);

        let breakdown = compute_breakdown(&items);
        assert_eq!(breakdown.grand_total().cents(), 11500);
    }

    #[test]
    fn test_line_total_falls_back_to_price_times_quantity() {
        let raw = LegacyLineItem {
            product_id: "PROD-001".to_string(),
            product_name: "Arroz".to_string(),
            quantity: 3,
            price: 20.5,
            total: None,
            tax_category: Some("exento".to_string()),
        };
        assert_eq!(raw.normalize().unwrap().line_total.cents(), 6150);
    }

    #[test]
    fn test_import_products_from_json() {
        let json = r#"[
            {"id": "PROD-001", "nombre": "Leche", "precio_venta": 32.5, "impuesto": 0},
            {"id": "PROD-002", "name": "Beer", "price": 45, "impuesto": 0.18, "stock": 24}
        ]"#;
        let products = import_products(json).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].tax_category, TaxCategory::Exento);
        assert_eq!(products[0].sale_price.cents(), 3250);
        assert_eq!(products[1].tax_category, TaxCategory::Isv18);
        assert_eq!(products[1].stock, 24);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        assert!(import_products("{not json").is_err());
        assert!(import_customers(r#"[{"nombre": "Sin ID"}]"#).is_err());
    }
}
