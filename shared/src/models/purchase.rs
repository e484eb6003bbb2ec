//! Purchase order and goods-receipt models
//!
//! The purchase order is the unit of work between the shop and a supplier:
//! created by an admin, decided line-by-line by the supplier, then received
//! against one or more goods-receipt notes (GRN).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a purchase order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Draft,
    Sent,
    Confirmed,
    Received,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Draft => "draft",
            PurchaseStatus::Sent => "sent",
            PurchaseStatus::Confirmed => "confirmed",
            PurchaseStatus::Received => "received",
        }
    }
}

impl std::str::FromStr for PurchaseStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(PurchaseStatus::Draft),
            "sent" => Ok(PurchaseStatus::Sent),
            "confirmed" => Ok(PurchaseStatus::Confirmed),
            "received" => Ok(PurchaseStatus::Received),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-line commitment from the supplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SupplierDecision {
    #[default]
    Pending,
    Send,
    NoSend,
}

impl SupplierDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierDecision::Pending => "pending",
            SupplierDecision::Send => "send",
            SupplierDecision::NoSend => "nosend",
        }
    }
}

impl std::str::FromStr for SupplierDecision {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(SupplierDecision::Pending),
            "send" => Ok(SupplierDecision::Send),
            "nosend" => Ok(SupplierDecision::NoSend),
            _ => Err(()),
        }
    }
}

/// A purchase order header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    /// Unique human-readable code (e.g., "PO-2025-0042")
    pub code: String,
    pub status: PurchaseStatus,
    pub supplier_id: Uuid,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    /// Supplier decisions may only change while the order is draft/sent
    pub fn is_editable(&self) -> bool {
        matches!(self.status, PurchaseStatus::Draft | PurchaseStatus::Sent)
    }
}

/// A line item on a purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    /// Quantity ordered, in packs
    pub qty_pack: i64,
    pub pack_size: i64,
    pub unit_name: String,
    /// Reference wholesale price captured at order creation
    pub price_per_pack: Decimal,
    pub supplier_decision: SupplierDecision,
    pub supplier_note: String,
    /// Cost price quoted by the supplier; set only for `send` lines
    pub supplier_price_per_pack: Option<Decimal>,
    /// Accumulated across all receipt events
    pub received_qty_pack: i64,
    /// Latest recorded shortfall reason, if any
    pub discrepancy_reason: Option<String>,
}

impl PurchaseItem {
    /// Quantity the supplier is expected to send: zero for `nosend` lines,
    /// the ordered quantity otherwise.
    pub fn expected_to_send(&self) -> i64 {
        match self.supplier_decision {
            SupplierDecision::NoSend => 0,
            _ => self.qty_pack,
        }
    }

    /// Packs still receivable after prior receipt events
    pub fn remaining_to_receive(&self) -> i64 {
        (self.expected_to_send() - self.received_qty_pack).max(0)
    }
}

/// A goods-receipt note: one receiving operation against a purchase order.
/// Append-only; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptEvent {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub received_at: DateTime<Utc>,
    pub received_by_name: String,
    pub note: String,
    pub lines: Vec<ReceiptLine>,
}

/// One line of a goods-receipt note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: Uuid,
    /// Packs received in this event
    pub qty_pack: i64,
    /// Packs short in this event
    pub diff_qty_pack: i64,
    /// Required whenever `diff_qty_pack` > 0
    pub diff_reason: String,
}

/// Generate a purchase-order code
pub fn generate_po_code(year: i32, sequence: i32) -> String {
    format!("PO-{}-{:04}", year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(decision: SupplierDecision, qty_pack: i64, received: i64) -> PurchaseItem {
        PurchaseItem {
            id: Uuid::new_v4(),
            purchase_order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Minyak Goreng 2L".to_string(),
            qty_pack,
            pack_size: 12,
            unit_name: "btl".to_string(),
            price_per_pack: Decimal::from(180_000),
            supplier_decision: decision,
            supplier_note: String::new(),
            supplier_price_per_pack: None,
            received_qty_pack: received,
            discrepancy_reason: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["draft", "sent", "confirmed", "received"] {
            assert_eq!(PurchaseStatus::from_str(s).unwrap().as_str(), s);
        }
        assert!(PurchaseStatus::from_str("RECEIVED").is_ok());
        assert!(PurchaseStatus::from_str("cancelled").is_err());
    }

    #[test]
    fn test_expected_to_send() {
        assert_eq!(item(SupplierDecision::Pending, 10, 0).expected_to_send(), 10);
        assert_eq!(item(SupplierDecision::Send, 10, 0).expected_to_send(), 10);
        assert_eq!(item(SupplierDecision::NoSend, 10, 0).expected_to_send(), 0);
    }

    #[test]
    fn test_remaining_to_receive() {
        assert_eq!(item(SupplierDecision::Send, 10, 4).remaining_to_receive(), 6);
        assert_eq!(item(SupplierDecision::Send, 10, 10).remaining_to_receive(), 0);
        // over-accumulation never goes negative
        assert_eq!(item(SupplierDecision::Send, 10, 12).remaining_to_receive(), 0);
        assert_eq!(item(SupplierDecision::NoSend, 10, 0).remaining_to_receive(), 0);
    }

    #[test]
    fn test_generate_po_code() {
        assert_eq!(generate_po_code(2025, 42), "PO-2025-0042");
        assert!(crate::validation::validate_po_code(&generate_po_code(2025, 1)).is_ok());
    }
}
