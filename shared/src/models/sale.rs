//! Point-of-sale models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a cart line is priced and how it draws down stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaleItemType {
    /// Priced at `retail_price_per_unit`, consumes 1 stock unit per qty
    Unit,
    /// Priced at `wholesale_price_per_pack`, consumes `pack_size` units per qty
    Pack,
}

impl SaleItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleItemType::Unit => "unit",
            SaleItemType::Pack => "pack",
        }
    }
}

/// Accepted payment methods. Only cash is processed at checkout today;
/// the others are declared for the UI but rejected by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Qris,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Qris => "qris",
            PaymentMethod::Card => "card",
        }
    }
}

/// A completed point-of-sale transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub cashier_name: String,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub cash_received: Option<Decimal>,
    pub change: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// One line of a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub item_type: SaleItemType,
    pub qty: i64,
    /// Unit price at time of sale (per unit or per pack, per `item_type`)
    pub price: Decimal,
    pub line_total: Decimal,
}

/// Stock units consumed by a cart line
pub fn units_consumed(item_type: SaleItemType, qty: i64, pack_size: i64) -> i64 {
    match item_type {
        SaleItemType::Unit => qty,
        SaleItemType::Pack => qty * pack_size.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_consumed() {
        assert_eq!(units_consumed(SaleItemType::Unit, 3, 12), 3);
        assert_eq!(units_consumed(SaleItemType::Pack, 3, 12), 36);
        // zero pack size is treated as 1
        assert_eq!(units_consumed(SaleItemType::Pack, 3, 0), 3);
    }
}
