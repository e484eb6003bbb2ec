//! Order model normalization
//!
//! Raw API payloads are duck-typed: numeric fields may be absent, null, or
//! non-finite, and optional strings may be missing. Normalization applies
//! every default exactly once, so the calculators downstream never have to
//! re-implement null-coalescing.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{PurchaseItem, PurchaseOrder, PurchaseStatus, SupplierDecision};

/// Structurally invalid input. Malformed-but-coercible values never raise
/// this; they are defaulted instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("purchase order payload is missing")]
    MissingOrder,

    #[error("unknown purchase order status: {0}")]
    UnknownStatus(String),

    #[error("item {item_id} references order {found}, expected {expected}")]
    ItemOrderMismatch {
        item_id: Uuid,
        expected: Uuid,
        found: Uuid,
    },
}

/// Purchase order header as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPurchaseOrder {
    pub id: Uuid,
    pub code: String,
    pub status: String,
    pub supplier_id: Uuid,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub confirmed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub received_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Purchase order line as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPurchaseItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub qty_pack: Option<f64>,
    pub pack_size: Option<f64>,
    pub unit_name: Option<String>,
    pub price_per_pack: Option<f64>,
    pub supplier_decision: Option<String>,
    pub supplier_note: Option<String>,
    pub supplier_price_per_pack: Option<f64>,
    pub received_qty_pack: Option<f64>,
    pub discrepancy_reason: Option<String>,
}

/// Convert a raw order + items payload into the canonical model.
///
/// Fails only for structurally impossible input: a missing order, an
/// unparseable status, or an item referencing a different order.
pub fn normalize(
    raw_order: Option<RawPurchaseOrder>,
    raw_items: Vec<RawPurchaseItem>,
) -> Result<(PurchaseOrder, Vec<PurchaseItem>), ValidationError> {
    let raw_order = raw_order.ok_or(ValidationError::MissingOrder)?;

    let status: PurchaseStatus = raw_order
        .status
        .parse()
        .map_err(|_| ValidationError::UnknownStatus(raw_order.status.clone()))?;

    let order = PurchaseOrder {
        id: raw_order.id,
        code: raw_order.code,
        status,
        supplier_id: raw_order.supplier_id,
        note: raw_order.note,
        created_at: raw_order.created_at,
        confirmed_at: raw_order.confirmed_at,
        received_at: raw_order.received_at,
    };

    let items = raw_items
        .into_iter()
        .map(|raw| {
            if raw.purchase_order_id != order.id {
                return Err(ValidationError::ItemOrderMismatch {
                    item_id: raw.id,
                    expected: order.id,
                    found: raw.purchase_order_id,
                });
            }

            Ok(PurchaseItem {
                id: raw.id,
                purchase_order_id: raw.purchase_order_id,
                product_id: raw.product_id,
                product_name: raw.product_name.unwrap_or_default(),
                qty_pack: coerce_qty(raw.qty_pack),
                pack_size: coerce_pack_size(raw.pack_size),
                unit_name: raw.unit_name.unwrap_or_default(),
                price_per_pack: coerce_amount(raw.price_per_pack),
                supplier_decision: coerce_decision(raw.supplier_decision.as_deref()),
                supplier_note: raw.supplier_note.unwrap_or_default(),
                supplier_price_per_pack: coerce_supplier_price(raw.supplier_price_per_pack),
                received_qty_pack: coerce_qty(raw.received_qty_pack),
                discrepancy_reason: raw.discrepancy_reason.filter(|r| !r.trim().is_empty()),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((order, items))
}

/// Absent, non-finite, or negative quantities default to 0
fn coerce_qty(value: Option<f64>) -> i64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v as i64,
        _ => 0,
    }
}

/// Pack size defaults to 1 so unit math never divides by zero
fn coerce_pack_size(value: Option<f64>) -> i64 {
    match value {
        Some(v) if v.is_finite() && v >= 1.0 => v as i64,
        _ => 1,
    }
}

/// Absent, non-finite, or negative amounts default to 0
fn coerce_amount(value: Option<f64>) -> Decimal {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}

/// A supplier price only exists when it is a finite positive number
fn coerce_supplier_price(value: Option<f64>) -> Option<Decimal> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .and_then(Decimal::from_f64)
}

/// Unknown or absent decisions default to pending
fn coerce_decision(value: Option<&str>) -> SupplierDecision {
    value.and_then(|s| s.parse().ok()).unwrap_or_default()
}
