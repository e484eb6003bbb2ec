//! Purchase reconciliation engine tests
//!
//! Covers the engine's contract end to end:
//! - Property 1: Clamping (recv never exceeds what a line can take)
//! - Property 2: Idempotence (same inputs, bit-identical summary)
//! - Property 3: Cost conservation (cost = sum of priced receipts)
//! - Property 4: Gate monotonicity (fixing a blocker never re-blocks)
//! - Property 5: Decision clearing (leaving `send` drops the price)

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::models::{PurchaseItem, PurchaseOrder, PurchaseStatus, SupplierDecision};
use shared::reconciliation::{
    all_resolved, apply_decision, build_decisions_payload, build_receipt_payload,
    compute_supplier_total, decision_gate, is_submittable, normalize, receipt_gate, summarize,
    GateReason, RawPurchaseItem, RawPurchaseOrder,
};

// Helpers to build snapshots without a database

fn order(status: PurchaseStatus) -> PurchaseOrder {
    PurchaseOrder {
        id: Uuid::new_v4(),
        code: "PO-2025-0001".to_string(),
        status,
        supplier_id: Uuid::new_v4(),
        note: None,
        created_at: chrono::Utc::now(),
        confirmed_at: None,
        received_at: None,
    }
}

fn item(
    qty_pack: i64,
    pack_size: i64,
    decision: SupplierDecision,
    price: Option<i64>,
) -> PurchaseItem {
    PurchaseItem {
        id: Uuid::new_v4(),
        purchase_order_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        product_name: "Sabun Mandi".to_string(),
        qty_pack,
        pack_size,
        unit_name: "pcs".to_string(),
        price_per_pack: Decimal::from(75_000),
        supplier_decision: decision,
        supplier_note: String::new(),
        supplier_price_per_pack: price.map(Decimal::from),
        received_qty_pack: 0,
        discrepancy_reason: None,
    }
}

fn propose(entries: &[(&PurchaseItem, i64)]) -> HashMap<Uuid, i64> {
    entries.iter().map(|(it, q)| (it.id, *q)).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Over-proposed quantities cap at the ordered quantity
    #[test]
    fn test_over_receipt_clamps() {
        let it = item(10, 5, SupplierDecision::Send, Some(1000));
        let summary = summarize(
            std::slice::from_ref(&it),
            &propose(&[(&it, 12)]),
            &HashMap::new(),
        );

        assert_eq!(summary.total_packs, 10);
        assert_eq!(summary.total_units, 50);
        assert_eq!(summary.total_cost, Decimal::from(10_000));
        assert_eq!(summary.missing_price_count, 0);
    }

    /// A nosend line expects nothing and receives nothing
    #[test]
    fn test_nosend_line_is_inert() {
        let it = item(10, 5, SupplierDecision::NoSend, None);
        assert_eq!(it.expected_to_send(), 0);

        let summary = summarize(
            std::slice::from_ref(&it),
            &propose(&[(&it, 3)]),
            &HashMap::new(),
        );
        assert_eq!(summary.total_packs, 0);
        assert_eq!(summary.total_diff, 0);
    }

    /// A shortfall without a reason blocks submission
    #[test]
    fn test_shortfall_without_reason_blocks() {
        let it = item(5, 1, SupplierDecision::Send, Some(500));
        let summary = summarize(
            std::slice::from_ref(&it),
            &propose(&[(&it, 3)]),
            &HashMap::new(),
        );

        assert_eq!(summary.missing_reason_count, 1);
        assert!(!is_submittable(&summary));
    }

    /// One pending line keeps the whole order unresolved
    #[test]
    fn test_pending_blocks_resolution() {
        let items = vec![
            item(4, 2, SupplierDecision::Send, Some(900)),
            item(2, 6, SupplierDecision::Send, Some(1200)),
        ];
        assert!(all_resolved(&items));

        let mut with_pending = items.clone();
        with_pending.push(item(1, 1, SupplierDecision::Pending, None));
        assert!(!all_resolved(&with_pending));
    }

    /// A fully short-shipped line still appears on the receipt payload
    #[test]
    fn test_payload_preserves_audit_trail() {
        let it = item(4, 6, SupplierDecision::Send, Some(1000));
        let mut reasons = HashMap::new();
        reasons.insert(it.id, "barang tidak tersedia".to_string());

        let payload =
            build_receipt_payload(std::slice::from_ref(&it), &HashMap::new(), &reasons, "");

        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].qty_pack, 0);
        assert_eq!(payload.items[0].diff_qty_pack, 4);
    }

    /// Fixing the reported blockers flips the gate to allowed
    #[test]
    fn test_gate_monotonicity_on_fixes() {
        let mut unpriced = item(5, 1, SupplierDecision::Send, None);
        let short = item(4, 1, SupplierDecision::Send, Some(800));
        let proposed = propose(&[(&unpriced, 5), (&short, 2)]);

        let summary = summarize(
            &[unpriced.clone(), short.clone()],
            &proposed,
            &HashMap::new(),
        );
        assert!(!is_submittable(&summary));

        // fix the price
        unpriced.supplier_price_per_pack = Some(Decimal::from(700));
        let summary = summarize(
            &[unpriced.clone(), short.clone()],
            &proposed,
            &HashMap::new(),
        );
        assert_eq!(summary.missing_price_count, 0);
        assert!(!is_submittable(&summary)); // reason still missing

        // fix the reason
        let mut reasons = HashMap::new();
        reasons.insert(short.id, "dus penyok ditolak".to_string());
        let summary = summarize(&[unpriced, short], &proposed, &reasons);
        assert!(is_submittable(&summary));
    }

    /// Flipping a decision away from `send` always clears the price
    #[test]
    fn test_decision_clearing() {
        let po = order(PurchaseStatus::Sent);
        for next in [SupplierDecision::NoSend, SupplierDecision::Pending] {
            let mut it = item(3, 2, SupplierDecision::Send, Some(4_000));
            apply_decision(&po, &mut it, next, "ganti keputusan", None).unwrap();
            assert_eq!(it.supplier_price_per_pack, None, "{:?}", next);
        }
    }

    /// Decision edits are rejected once the order leaves draft/sent
    #[test]
    fn test_locked_order_rejects_decisions() {
        for status in [PurchaseStatus::Confirmed, PurchaseStatus::Received] {
            let po = order(status);
            let mut it = item(3, 2, SupplierDecision::Pending, None);
            assert!(apply_decision(
                &po,
                &mut it,
                SupplierDecision::Send,
                "",
                Some(Decimal::from(100)),
            )
            .is_err());
        }
    }

    /// Engine round trip: raw payload -> normalize -> gates -> payloads
    #[test]
    fn test_full_flow_from_raw_payload() {
        let order_id = Uuid::new_v4();
        let raw_order = RawPurchaseOrder {
            id: order_id,
            code: "PO-2025-0100".to_string(),
            status: "sent".to_string(),
            supplier_id: Uuid::new_v4(),
            note: Some("PO bulanan".to_string()),
            created_at: chrono::Utc::now(),
            confirmed_at: None,
            received_at: None,
        };
        let raw_items = vec![RawPurchaseItem {
            id: Uuid::new_v4(),
            purchase_order_id: order_id,
            product_id: Uuid::new_v4(),
            product_name: Some("Sarden Kaleng".to_string()),
            qty_pack: Some(8.0),
            pack_size: Some(24.0),
            unit_name: Some("klg".to_string()),
            price_per_pack: Some(96_000.0),
            supplier_decision: None,
            supplier_note: None,
            supplier_price_per_pack: None,
            received_qty_pack: None,
            discrepancy_reason: None,
        }];

        let (po, mut items) = normalize(Some(raw_order), raw_items).unwrap();
        assert!(po.is_editable());
        assert!(!all_resolved(&items));

        // supplier decides and prices the line
        apply_decision(
            &po,
            &mut items[0],
            SupplierDecision::Send,
            "",
            Some(Decimal::from(90_000)),
        )
        .unwrap();
        assert!(all_resolved(&items));
        assert_eq!(compute_supplier_total(&items), Decimal::from(720_000));

        let decisions = build_decisions_payload(&items);
        assert_eq!(decisions.decisions.len(), 1);

        // admin receives the full quantity
        let proposed = propose(&[(&items[0], 8)]);
        let summary = summarize(&items, &proposed, &HashMap::new());
        assert!(receipt_gate(&summary).allowed);
        assert_eq!(summary.total_units, 192);
        assert_eq!(summary.total_cost, Decimal::from(720_000));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn decision_strategy() -> impl Strategy<Value = SupplierDecision> {
        prop_oneof![
            Just(SupplierDecision::Pending),
            Just(SupplierDecision::Send),
            Just(SupplierDecision::NoSend),
        ]
    }

    proptest! {
        /// Property 1: received quantity never exceeds the clamp bound,
        /// whatever the caller proposes
        #[test]
        fn prop_recv_clamped(
            qty in 0i64..500,
            received in 0i64..500,
            proposed_qty in -1000i64..2000,
            decision in decision_strategy()
        ) {
            let mut it = item(qty, 3, decision, Some(100));
            it.received_qty_pack = received;

            let summary = summarize(
                std::slice::from_ref(&it),
                &propose(&[(&it, proposed_qty)]),
                &HashMap::new(),
            );

            prop_assert!(summary.total_packs >= 0);
            prop_assert!(summary.total_packs <= it.remaining_to_receive());
        }

        /// Property 2: summarize is idempotent over identical inputs
        #[test]
        fn prop_summarize_idempotent(
            qty in 1i64..200,
            pack_size in 1i64..50,
            proposed_qty in 0i64..300,
            price in proptest::option::of(1i64..1_000_000)
        ) {
            let it = item(qty, pack_size, SupplierDecision::Send, price);
            let proposed = propose(&[(&it, proposed_qty)]);
            let reasons = HashMap::new();

            let first = summarize(std::slice::from_ref(&it), &proposed, &reasons);
            let second = summarize(std::slice::from_ref(&it), &proposed, &reasons);
            prop_assert_eq!(first, second);
        }

        /// Property 3: cost conservation; unpriced receipts cost 0 and are
        /// counted, never silently dropped
        #[test]
        fn prop_cost_conservation(
            lines in prop::collection::vec(
                (1i64..100, 1i64..20, 0i64..150, proptest::option::of(1i64..10_000)),
                1..8
            )
        ) {
            let items: Vec<PurchaseItem> = lines
                .iter()
                .map(|(qty, size, _, price)| item(*qty, *size, SupplierDecision::Send, *price))
                .collect();
            let proposed: HashMap<Uuid, i64> = items
                .iter()
                .zip(&lines)
                .map(|(it, (_, _, recv, _))| (it.id, *recv))
                .collect();

            let summary = summarize(&items, &proposed, &HashMap::new());

            let mut expected_cost = Decimal::ZERO;
            let mut expected_missing = 0usize;
            for it in &items {
                let recv = proposed[&it.id].clamp(0, it.remaining_to_receive());
                match it.supplier_price_per_pack {
                    Some(p) if recv > 0 => expected_cost += p * Decimal::from(recv),
                    None if recv > 0 => expected_missing += 1,
                    _ => {}
                }
            }

            prop_assert_eq!(summary.total_cost, expected_cost);
            prop_assert_eq!(summary.missing_price_count, expected_missing);
        }

        /// Property 4: an allowed gate stays allowed when a price or reason
        /// is added (nothing else changed)
        #[test]
        fn prop_gate_monotonic(
            qty in 1i64..100,
            recv in 1i64..100,
            extra_price in 1i64..10_000
        ) {
            let it = item(qty, 2, SupplierDecision::Send, Some(500));
            let proposed = propose(&[(&it, recv)]);
            let mut reasons = HashMap::new();
            reasons.insert(it.id, "selisih pengiriman".to_string());

            let before = summarize(std::slice::from_ref(&it), &proposed, &reasons);
            prop_assume!(is_submittable(&before));

            // adding a (redundant) price keeps the gate open
            let mut priced = it.clone();
            priced.supplier_price_per_pack = Some(Decimal::from(extra_price));
            let after = summarize(std::slice::from_ref(&priced), &proposed, &reasons);
            prop_assert!(is_submittable(&after));
        }

        /// Property 5: whatever state a line is in, leaving `send` clears
        /// the price
        #[test]
        fn prop_decision_clearing(
            price in proptest::option::of(1i64..1_000_000),
            to_pending in any::<bool>()
        ) {
            let po = order(PurchaseStatus::Draft);
            let mut it = item(5, 4, SupplierDecision::Send, price);
            let next = if to_pending {
                SupplierDecision::Pending
            } else {
                SupplierDecision::NoSend
            };

            apply_decision(&po, &mut it, next, "alasan", None).unwrap();
            prop_assert_eq!(it.supplier_price_per_pack, None);
        }

        /// Payload lines cover exactly the receivable or received lines
        #[test]
        fn prop_payload_line_inclusion(
            qty in 0i64..50,
            received in 0i64..50,
            recv in 0i64..80,
            decision in decision_strategy()
        ) {
            let mut it = item(qty, 2, decision, Some(100));
            it.received_qty_pack = received;
            let mut reasons = HashMap::new();
            reasons.insert(it.id, "catatan selisih".to_string());

            let payload = build_receipt_payload(
                std::slice::from_ref(&it),
                &propose(&[(&it, recv)]),
                &reasons,
                "",
            );

            let clamped = recv.clamp(0, it.remaining_to_receive());
            let expected_line = clamped > 0 || it.remaining_to_receive() > 0;
            prop_assert_eq!(payload.items.len(), usize::from(expected_line));

            if let Some(line) = payload.items.first() {
                prop_assert_eq!(line.qty_pack, clamped);
                prop_assert_eq!(line.diff_qty_pack, it.remaining_to_receive() - clamped);
            }
        }

        /// The decision gate's counts always add up to the blocking lines
        #[test]
        fn prop_decision_gate_counts(
            cases in prop::collection::vec(
                (decision_strategy(), proptest::option::of(1i64..10_000)),
                1..10
            )
        ) {
            let items: Vec<PurchaseItem> = cases
                .iter()
                .map(|(d, p)| item(3, 2, *d, *p))
                .collect();

            let gate = decision_gate(&items);
            let pending = items
                .iter()
                .filter(|i| i.supplier_decision == SupplierDecision::Pending)
                .count();

            if gate.allowed {
                prop_assert_eq!(pending, 0);
                prop_assert!(all_resolved(&items));
            } else {
                let reported_pending = gate.reasons.iter().find_map(|r| match r {
                    GateReason::PendingDecisions { count } => Some(*count),
                    _ => None,
                });
                prop_assert_eq!(reported_pending.unwrap_or(0), pending);
            }
        }
    }
}
