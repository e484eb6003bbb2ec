//! Decision validator for the supplier confirmation flow
//!
//! Governs the phase before receiving begins: every line must carry a final
//! supplier decision, and every `send` line must be priced, before the order
//! can be confirmed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{GateReason, GateResult};
use crate::models::{PurchaseItem, PurchaseOrder, SupplierDecision};

/// Rejected decision mutation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("order {code} is {status} and can no longer be edited")]
    OrderNotEditable { code: String, status: String },

    #[error("a nosend decision requires a note")]
    MissingNote,

    #[error("supplier price cannot be negative")]
    NegativePrice,
}

/// True iff every line is decided and every `send` line is priced.
/// An order with no items is never resolved.
pub fn all_resolved(items: &[PurchaseItem]) -> bool {
    if items.is_empty() {
        return false;
    }
    items.iter().all(|item| match item.supplier_decision {
        SupplierDecision::Pending => false,
        SupplierDecision::Send => item
            .supplier_price_per_pack
            .map(|p| p > Decimal::ZERO)
            .unwrap_or(false),
        SupplierDecision::NoSend => true,
    })
}

/// Structured form of [`all_resolved`] with machine-readable reasons
pub fn decision_gate(items: &[PurchaseItem]) -> GateResult {
    if items.is_empty() {
        return GateResult::blocked(vec![GateReason::NoItems]);
    }

    let pending = items
        .iter()
        .filter(|i| i.supplier_decision == SupplierDecision::Pending)
        .count();
    let missing_price = items
        .iter()
        .filter(|i| {
            i.supplier_decision == SupplierDecision::Send
                && !i
                    .supplier_price_per_pack
                    .map(|p| p > Decimal::ZERO)
                    .unwrap_or(false)
        })
        .count();

    let mut reasons = Vec::new();
    if pending > 0 {
        reasons.push(GateReason::PendingDecisions { count: pending });
    }
    if missing_price > 0 {
        reasons.push(GateReason::MissingPrice {
            count: missing_price,
        });
    }

    if reasons.is_empty() {
        GateResult::allowed()
    } else {
        GateResult::blocked(reasons)
    }
}

/// Order total at supplier prices: `send` lines only, priced per ordered pack
pub fn compute_supplier_total(items: &[PurchaseItem]) -> Decimal {
    items
        .iter()
        .filter(|i| i.supplier_decision == SupplierDecision::Send)
        .map(|i| {
            i.supplier_price_per_pack.unwrap_or(Decimal::ZERO) * Decimal::from(i.qty_pack)
        })
        .sum()
}

/// Apply a supplier decision to a line.
///
/// Permitted only while the order is editable. Moving away from `send`
/// always clears the supplier price, so a stale quote can never leak into
/// the order total after the decision flips.
pub fn apply_decision(
    order: &PurchaseOrder,
    item: &mut PurchaseItem,
    decision: SupplierDecision,
    note: &str,
    price: Option<Decimal>,
) -> Result<(), DecisionError> {
    if !order.is_editable() {
        return Err(DecisionError::OrderNotEditable {
            code: order.code.clone(),
            status: order.status.to_string(),
        });
    }

    match decision {
        SupplierDecision::Send => {
            if let Some(p) = price {
                if p < Decimal::ZERO {
                    return Err(DecisionError::NegativePrice);
                }
            }
            item.supplier_price_per_pack = price.filter(|p| *p > Decimal::ZERO);
        }
        SupplierDecision::NoSend => {
            if note.trim().is_empty() {
                return Err(DecisionError::MissingNote);
            }
            item.supplier_price_per_pack = None;
        }
        SupplierDecision::Pending => {
            item.supplier_price_per_pack = None;
        }
    }

    item.supplier_decision = decision;
    item.supplier_note = note.trim().to_string();
    Ok(())
}

/// Wire shape of the confirm submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionsPayload {
    pub decisions: Vec<DecisionLine>,
}

/// One submitted decision line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionLine {
    pub purchase_item_id: Uuid,
    pub decision: SupplierDecision,
    pub note: String,
    pub supplier_price_per_pack: Option<Decimal>,
}

/// Build the confirm payload from the current line state. `send` lines carry
/// their price (0 when still unset); everything else carries none.
pub fn build_decisions_payload(items: &[PurchaseItem]) -> DecisionsPayload {
    DecisionsPayload {
        decisions: items
            .iter()
            .map(|item| DecisionLine {
                purchase_item_id: item.id,
                decision: item.supplier_decision,
                note: item.supplier_note.clone(),
                supplier_price_per_pack: match item.supplier_decision {
                    SupplierDecision::Send => {
                        Some(item.supplier_price_per_pack.unwrap_or(Decimal::ZERO))
                    }
                    _ => None,
                },
            })
            .collect(),
    }
}
