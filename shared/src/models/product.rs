//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product sold per unit (retail) or per pack (wholesale)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    /// Units per pack
    pub pack_size: i64,
    /// Display name of the base unit (e.g., "pcs", "btl")
    pub unit_name: String,
    pub wholesale_price_per_pack: Decimal,
    pub retail_price_per_unit: Decimal,
    /// Stock is tracked in base units; packs are derived
    pub stock_units: i64,
    pub min_stock_units: i64,
    pub max_stock_units: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whole packs currently available from unit stock
    pub fn available_packs(&self) -> i64 {
        let size = self.pack_size.max(1);
        self.stock_units / size
    }

    /// Whether the product is below its minimum stock level
    pub fn is_low_stock(&self) -> bool {
        self.stock_units < self.min_stock_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock_units: i64, pack_size: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Beras Premium".to_string(),
            sku: Some("BRS-5KG".to_string()),
            category: Some("Sembako".to_string()),
            pack_size,
            unit_name: "karung".to_string(),
            wholesale_price_per_pack: Decimal::from(250_000),
            retail_price_per_unit: Decimal::from(60_000),
            stock_units,
            min_stock_units: 10,
            max_stock_units: 500,
            image_url: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_available_packs_floors() {
        assert_eq!(product(47, 5).available_packs(), 9);
        assert_eq!(product(4, 5).available_packs(), 0);
        assert_eq!(product(0, 5).available_packs(), 0);
    }

    #[test]
    fn test_available_packs_guards_zero_pack_size() {
        assert_eq!(product(47, 0).available_packs(), 47);
    }

    #[test]
    fn test_low_stock() {
        assert!(product(9, 5).is_low_stock());
        assert!(!product(10, 5).is_low_stock());
    }
}
