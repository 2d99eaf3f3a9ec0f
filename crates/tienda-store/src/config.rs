//! # Store Configuration
//!
//! Settings loaded once when the store is opened.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TIENDA_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after the [`crate::Store`] is built.

use serde::{Deserialize, Serialize};
use tracing::warn;

use tienda_core::tax::{classify_rate, TaxCategory};
use tienda_core::CURRENCY_SYMBOL;

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Store name (printed on invoices)
    pub store_name: String,

    /// Store RTN (Honduran tax ID, printed on invoices)
    pub rtn: String,

    /// Store address (for invoices)
    pub address: String,

    pub phone: Option<String>,

    pub email: Option<String>,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Tax category preselected on the new-product form
    pub default_tax_category: TaxCategory,

    /// Products with stock at or below this are reported as low stock
    pub low_stock_threshold: i64,
}

impl Default for StoreConfig {
    /// Returns defaults suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Tienda POS"
    /// - Currency: Lempira (L)
    /// - New products: ISV 15%
    /// - Low stock: 10 units
    fn default() -> Self {
        StoreConfig {
            store_name: "Tienda POS".to_string(),
            rtn: "00000000000000".to_string(),
            address: "Tegucigalpa, Honduras".to_string(),
            phone: None,
            email: None,
            currency_symbol: CURRENCY_SYMBOL.to_string(),
            default_tax_category: TaxCategory::Isv15,
            low_stock_threshold: 10,
        }
    }
}

impl StoreConfig {
    /// Creates a StoreConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TIENDA_STORE_NAME`: Override store name
    /// - `TIENDA_RTN`: Override store RTN
    /// - `TIENDA_ADDRESS`: Override store address
    /// - `TIENDA_PHONE`, `TIENDA_EMAIL`: Contact lines on invoices
    /// - `TIENDA_DEFAULT_TAX`: Default category, by name (`isv18`) or rate (`0.18`)
    /// - `TIENDA_LOW_STOCK`: Low-stock threshold in units
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(store_name) = lookup("TIENDA_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(rtn) = lookup("TIENDA_RTN") {
            config.rtn = rtn;
        }

        if let Some(address) = lookup("TIENDA_ADDRESS") {
            config.address = address;
        }

        if let Some(phone) = lookup("TIENDA_PHONE") {
            config.phone = Some(phone);
        }

        if let Some(email) = lookup("TIENDA_EMAIL") {
            config.email = Some(email);
        }

        if let Some(raw) = lookup("TIENDA_DEFAULT_TAX") {
            match parse_tax_category(&raw) {
                Some(category) => config.default_tax_category = category,
                None => warn!(value = %raw, "Ignoring unrecognized TIENDA_DEFAULT_TAX"),
            }
        }

        if let Some(raw) = lookup("TIENDA_LOW_STOCK") {
            match raw.trim().parse::<i64>() {
                Ok(threshold) if threshold >= 0 => config.low_stock_threshold = threshold,
                _ => warn!(value = %raw, "Ignoring invalid TIENDA_LOW_STOCK"),
            }
        }

        config
    }
}

/// Accepts a category name or a numeric rate.
fn parse_tax_category(raw: &str) -> Option<TaxCategory> {
    let raw = raw.trim();
    if let Ok(category) = raw.parse::<TaxCategory>() {
        return Some(category);
    }
    raw.parse::<f64>().ok().map(classify_rate)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.currency_symbol, "L");
        assert_eq!(config.default_tax_category, TaxCategory::Isv15);
        assert_eq!(config.low_stock_threshold, 10);
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("TIENDA_STORE_NAME", "Pulpería La Esquina"),
            ("TIENDA_LOW_STOCK", "5"),
            ("TIENDA_DEFAULT_TAX", "isv18"),
        ]));
        assert_eq!(config.store_name, "Pulpería La Esquina");
        assert_eq!(config.low_stock_threshold, 5);
        assert_eq!(config.default_tax_category, TaxCategory::Isv18);
    }

    #[test]
    fn test_default_tax_accepts_rate() {
        let config = StoreConfig::from_lookup(lookup_from(&[("TIENDA_DEFAULT_TAX", "0")]));
        assert_eq!(config.default_tax_category, TaxCategory::Exento);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("TIENDA_LOW_STOCK", "-3"),
            ("TIENDA_DEFAULT_TAX", "iva"),
        ]));
        assert_eq!(config.low_stock_threshold, 10);
        assert_eq!(config.default_tax_category, TaxCategory::Isv15);
    }
}
