//! Reconciliation calculator for the receiving (GRN) flow
//!
//! Aggregates a proposed set of per-line received quantities into summary
//! totals and flags incomplete states. Used both to render running totals
//! in the UI and to gate the receive submission on the server.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GateReason, GateResult};
use crate::models::PurchaseItem;

/// Aggregate totals over a proposed receipt
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptSummary {
    /// Packs received across all lines
    pub total_packs: i64,
    /// Base units received (packs x pack size)
    pub total_units: i64,
    /// Cost of received packs at supplier prices; unpriced lines count 0
    pub total_cost: Decimal,
    /// Packs short across all lines
    pub total_diff: i64,
    /// Lines with a positive receive quantity but no supplier price
    pub missing_price_count: usize,
    /// Short-shipped lines without a discrepancy reason
    pub missing_reason_count: usize,
}

/// Receive quantity actually used for a line: the proposed value clamped to
/// what is still receivable. Clamping, not rejection, is the policy; callers
/// supplying more than the line can take are capped silently, mirroring the
/// `max` attribute on the UI input.
fn clamped_recv(item: &PurchaseItem, proposed: &HashMap<Uuid, i64>) -> i64 {
    let proposed = proposed.get(&item.id).copied().unwrap_or(0);
    proposed.clamp(0, item.remaining_to_receive())
}

fn reason_is_blank(diff_reasons: &HashMap<Uuid, String>, item_id: &Uuid) -> bool {
    diff_reasons
        .get(item_id)
        .map(|r| r.trim().is_empty())
        .unwrap_or(true)
}

/// Aggregate a proposed receipt into summary totals.
///
/// Deterministic and side-effect-free: identical inputs always produce an
/// identical summary.
pub fn summarize(
    items: &[PurchaseItem],
    proposed: &HashMap<Uuid, i64>,
    diff_reasons: &HashMap<Uuid, String>,
) -> ReceiptSummary {
    let mut summary = ReceiptSummary::default();

    for item in items {
        let recv = clamped_recv(item, proposed);
        let diff = (item.remaining_to_receive() - recv).max(0);

        summary.total_packs += recv;
        summary.total_units += recv * item.pack_size;
        summary.total_diff += diff;

        if recv > 0 {
            match item.supplier_price_per_pack {
                Some(price) => summary.total_cost += price * Decimal::from(recv),
                None => summary.missing_price_count += 1,
            }
        }

        if diff > 0 && reason_is_blank(diff_reasons, &item.id) {
            summary.missing_reason_count += 1;
        }
    }

    summary
}

/// The single gating predicate for the receive submission: something was
/// received, every received line is priced, and every shortfall has a reason.
pub fn is_submittable(summary: &ReceiptSummary) -> bool {
    summary.total_packs > 0
        && summary.missing_price_count == 0
        && summary.missing_reason_count == 0
}

/// Structured form of [`is_submittable`] with machine-readable reasons
pub fn receipt_gate(summary: &ReceiptSummary) -> GateResult {
    let mut reasons = Vec::new();

    if summary.total_packs == 0 {
        reasons.push(GateReason::NothingReceived);
    }
    if summary.missing_price_count > 0 {
        reasons.push(GateReason::MissingPrice {
            count: summary.missing_price_count,
        });
    }
    if summary.missing_reason_count > 0 {
        reasons.push(GateReason::MissingReason {
            count: summary.missing_reason_count,
        });
    }

    if reasons.is_empty() {
        GateResult::allowed()
    } else {
        GateResult::blocked(reasons)
    }
}

/// Wire shape of the receive submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptPayload {
    pub items: Vec<ReceiptPayloadLine>,
    pub note: String,
}

/// One submitted receipt line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiptPayloadLine {
    pub product_id: Uuid,
    pub qty_pack: i64,
    pub diff_qty_pack: i64,
    pub diff_reason: String,
}

/// Build the receive payload from a proposed receipt.
///
/// Emits one line per item that was received or is still expected; a line
/// expected but not received at all goes out with `qty_pack = 0` and a
/// positive `diff_qty_pack`, keeping short-shipped items on the audit trail.
pub fn build_receipt_payload(
    items: &[PurchaseItem],
    proposed: &HashMap<Uuid, i64>,
    diff_reasons: &HashMap<Uuid, String>,
    note: &str,
) -> ReceiptPayload {
    let lines = items
        .iter()
        .filter_map(|item| {
            let recv = clamped_recv(item, proposed);
            let diff = (item.remaining_to_receive() - recv).max(0);
            if recv == 0 && item.remaining_to_receive() == 0 {
                return None;
            }
            let reason = if diff > 0 {
                diff_reasons
                    .get(&item.id)
                    .map(|r| r.trim().to_string())
                    .unwrap_or_default()
            } else {
                String::new()
            };
            Some(ReceiptPayloadLine {
                product_id: item.product_id,
                qty_pack: recv,
                diff_qty_pack: diff,
                diff_reason: reason,
            })
        })
        .collect();

    ReceiptPayload {
        items: lines,
        note: note.trim().to_string(),
    }
}
