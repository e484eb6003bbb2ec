//! Purchase reconciliation engine
//!
//! Pure computation over purchase-order snapshots: normalizing raw API
//! payloads into the canonical model, aggregating proposed receipt
//! quantities into totals and submit gates, and validating supplier-side
//! decisions before an order can be confirmed.
//!
//! Every operation here takes an immutable snapshot and returns a new
//! value. Nothing in this module performs I/O or holds state, so the same
//! functions back both the server-side validation in the backend and the
//! client-side running totals exposed through the wasm bindings.

pub mod decision;
pub mod order;
pub mod receiving;

pub use decision::{
    all_resolved, apply_decision, build_decisions_payload, compute_supplier_total, decision_gate,
    DecisionError, DecisionLine, DecisionsPayload,
};
pub use order::{normalize, RawPurchaseItem, RawPurchaseOrder, ValidationError};
pub use receiving::{
    build_receipt_payload, is_submittable, receipt_gate, summarize, ReceiptPayload,
    ReceiptPayloadLine, ReceiptSummary,
};

use serde::{Deserialize, Serialize};

/// Outcome of a pre-flight gate check.
///
/// Replaces blocking confirm dialogs: the caller gets a machine-readable
/// list of what is still missing and renders it however it wishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateResult {
    pub allowed: bool,
    pub reasons: Vec<GateReason>,
}

impl GateResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reasons: Vec::new(),
        }
    }

    pub fn blocked(reasons: Vec<GateReason>) -> Self {
        Self {
            allowed: false,
            reasons,
        }
    }
}

/// Machine-readable reason a gate is blocked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum GateReason {
    /// No line items on the order
    NoItems,
    /// No line has a positive received quantity
    NothingReceived,
    /// Lines received without a supplier price
    MissingPrice { count: usize },
    /// Short-shipped lines without a discrepancy reason
    MissingReason { count: usize },
    /// Lines whose supplier decision is still pending
    PendingDecisions { count: usize },
}
