//! WebAssembly module for the Toko Back-Office Platform
//!
//! Exposes the purchase reconciliation engine to the browser so the
//! presentation layer computes running totals and submit gates from the
//! same code the server trusts:
//! - Receipt summaries and the receive submit gate
//! - Supplier decision gate and order totals
//! - Payload building for the confirm and receive steps

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::models::PurchaseItem;
use shared::reconciliation::{
    all_resolved, build_decisions_payload, build_receipt_payload, compute_supplier_total,
    decision_gate, is_submittable, normalize, receipt_gate, summarize, RawPurchaseItem,
    RawPurchaseOrder,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn parse_items(items_json: &str) -> Result<Vec<PurchaseItem>, JsValue> {
    serde_json::from_str(items_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid items JSON: {}", e)))
}

fn parse_proposed(proposed_json: &str) -> Result<HashMap<Uuid, i64>, JsValue> {
    serde_json::from_str(proposed_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid proposed JSON: {}", e)))
}

fn parse_reasons(reasons_json: &str) -> Result<HashMap<Uuid, String>, JsValue> {
    serde_json::from_str(reasons_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid reasons JSON: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Normalize a raw order + items payload into the canonical model.
/// Returns `{ po, items }` as JSON.
#[wasm_bindgen]
pub fn normalize_purchase(order_json: &str, items_json: &str) -> Result<String, JsValue> {
    let raw_order: Option<RawPurchaseOrder> = serde_json::from_str(order_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid order JSON: {}", e)))?;
    let raw_items: Vec<RawPurchaseItem> = serde_json::from_str(items_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid items JSON: {}", e)))?;

    let (po, items) =
        normalize(raw_order, raw_items).map_err(|e| JsValue::from_str(&e.to_string()))?;

    to_json(&serde_json::json!({ "po": po, "items": items }))
}

/// Summarize a proposed receipt. Returns the summary as JSON.
#[wasm_bindgen]
pub fn receipt_summary(
    items_json: &str,
    proposed_json: &str,
    reasons_json: &str,
) -> Result<String, JsValue> {
    let items = parse_items(items_json)?;
    let proposed = parse_proposed(proposed_json)?;
    let reasons = parse_reasons(reasons_json)?;

    to_json(&summarize(&items, &proposed, &reasons))
}

/// Whether the proposed receipt can be submitted
#[wasm_bindgen]
pub fn receipt_submittable(
    items_json: &str,
    proposed_json: &str,
    reasons_json: &str,
) -> Result<bool, JsValue> {
    let items = parse_items(items_json)?;
    let proposed = parse_proposed(proposed_json)?;
    let reasons = parse_reasons(reasons_json)?;

    Ok(is_submittable(&summarize(&items, &proposed, &reasons)))
}

/// Receive gate with machine-readable reasons, as JSON
#[wasm_bindgen]
pub fn receipt_gate_check(
    items_json: &str,
    proposed_json: &str,
    reasons_json: &str,
) -> Result<String, JsValue> {
    let items = parse_items(items_json)?;
    let proposed = parse_proposed(proposed_json)?;
    let reasons = parse_reasons(reasons_json)?;

    to_json(&receipt_gate(&summarize(&items, &proposed, &reasons)))
}

/// Build the receive submission payload, as JSON
#[wasm_bindgen]
pub fn receipt_payload(
    items_json: &str,
    proposed_json: &str,
    reasons_json: &str,
    note: &str,
) -> Result<String, JsValue> {
    let items = parse_items(items_json)?;
    let proposed = parse_proposed(proposed_json)?;
    let reasons = parse_reasons(reasons_json)?;

    to_json(&build_receipt_payload(&items, &proposed, &reasons, note))
}

/// Whether every supplier decision is resolved
#[wasm_bindgen]
pub fn decisions_resolved(items_json: &str) -> Result<bool, JsValue> {
    let items = parse_items(items_json)?;
    Ok(all_resolved(&items))
}

/// Decision gate with machine-readable reasons, as JSON
#[wasm_bindgen]
pub fn decision_gate_check(items_json: &str) -> Result<String, JsValue> {
    let items = parse_items(items_json)?;
    to_json(&decision_gate(&items))
}

/// Order total at supplier prices over `send` lines
#[wasm_bindgen]
pub fn supplier_total(items_json: &str) -> Result<f64, JsValue> {
    let items = parse_items(items_json)?;
    Ok(compute_supplier_total(&items).to_f64().unwrap_or(0.0))
}

/// Build the confirm submission payload, as JSON
#[wasm_bindgen]
pub fn decisions_payload(items_json: &str) -> Result<String, JsValue> {
    let items = parse_items(items_json)?;
    to_json(&build_decisions_payload(&items))
}
