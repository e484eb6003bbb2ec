//! Purchase order service: creation, supplier confirmation, goods receipt
//!
//! All gating rules live in `shared::reconciliation`; this service loads
//! snapshots, runs them through the engine, and persists the outcome. The
//! handlers never re-implement a rule the engine owns.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    generate_po_code, PurchaseItem, PurchaseOrder, PurchaseStatus, SupplierDecision,
};
use shared::reconciliation::{
    self, apply_decision, compute_supplier_total, decision_gate, receipt_gate, summarize,
    GateReason,
};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Input for creating a purchase order
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseInput {
    pub supplier_id: Uuid,
    pub items: Vec<CreatePurchaseItemInput>,
    pub note: Option<String>,
}

/// One requested line on a new purchase order
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseItemInput {
    pub product_id: Uuid,
    pub qty_pack: i64,
    /// Reference price; defaults to the product's wholesale price
    pub price_per_pack: Option<Decimal>,
}

/// Input for the supplier confirmation step
#[derive(Debug, Deserialize)]
pub struct ConfirmInput {
    pub decisions: Vec<DecisionInput>,
}

/// One submitted decision line
#[derive(Debug, Deserialize)]
pub struct DecisionInput {
    pub purchase_item_id: Uuid,
    pub decision: SupplierDecision,
    #[serde(default)]
    pub note: String,
    pub supplier_price_per_pack: Option<Decimal>,
}

/// Input for the goods-receipt step
#[derive(Debug, Deserialize)]
pub struct ReceiveInput {
    pub items: Vec<ReceiveLineInput>,
    #[serde(default)]
    pub note: String,
}

/// One submitted receipt line
#[derive(Debug, Deserialize)]
pub struct ReceiveLineInput {
    pub product_id: Uuid,
    pub qty_pack: i64,
    #[serde(default)]
    pub diff_reason: String,
}

/// Purchase order list row
#[derive(Debug, Serialize, FromRow)]
pub struct PurchaseOrderRow {
    pub id: Uuid,
    pub code: String,
    pub status: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
}

/// Filter for listing purchase orders
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseFilter {
    /// Matches order code or supplier name
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Full purchase order detail
#[derive(Debug, Serialize)]
pub struct PurchaseDetail {
    pub po: PurchaseOrderView,
    pub items: Vec<PurchaseItem>,
    /// Order total at supplier prices over `send` lines
    pub supplier_total: Decimal,
}

/// Purchase order header with supplier name
#[derive(Debug, Serialize)]
pub struct PurchaseOrderView {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub supplier_name: String,
}

/// Result of creating a purchase order
#[derive(Debug, Serialize)]
pub struct CreatePurchaseResult {
    pub id: Uuid,
    pub code: String,
}

/// Result of a goods receipt
#[derive(Debug, Serialize)]
pub struct ReceiveResult {
    pub grn_id: Uuid,
    pub status: String,
    pub total_packs: i64,
    pub total_units: i64,
}

/// Per-item reconciliation summary for the receive-detail view
#[derive(Debug, Serialize)]
pub struct SummaryItem {
    pub purchase_item_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub ordered_qty_pack: i64,
    pub received_qty_pack: i64,
    pub remaining_qty_pack: i64,
    pub supplier_decision: String,
    pub supplier_note: String,
    pub supplier_price_per_pack: Option<Decimal>,
    pub admin_return_reason: Option<String>,
}

/// A recorded goods-receipt note with its lines
#[derive(Debug, Serialize)]
pub struct GrnView {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub received_by_name: String,
    pub note: String,
    pub items: Vec<GrnLineView>,
}

/// One recorded receipt line
#[derive(Debug, Serialize)]
pub struct GrnLineView {
    pub product_id: Uuid,
    pub product_name: String,
    pub pack_size: i64,
    pub qty_pack: i64,
    pub qty_units: i64,
    pub diff_qty_pack: i64,
    pub diff_reason: String,
}

/// Receive-detail response: order header, reconciliation summary, GRN list
#[derive(Debug, Serialize)]
pub struct ReceiveDetail {
    pub purchase: PurchaseOrderView,
    pub summary_items: Vec<SummaryItem>,
    pub grns: Vec<GrnView>,
}

/// Purchase order row as stored
#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    code: String,
    status: String,
    supplier_id: Uuid,
    note: Option<String>,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    received_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_model(self) -> AppResult<PurchaseOrder> {
        let status: PurchaseStatus = self
            .status
            .parse()
            .map_err(|_| AppError::Internal(format!("Corrupt order status: {}", self.status)))?;
        Ok(PurchaseOrder {
            id: self.id,
            code: self.code,
            status,
            supplier_id: self.supplier_id,
            note: self.note,
            created_at: self.created_at,
            confirmed_at: self.confirmed_at,
            received_at: self.received_at,
        })
    }
}

/// Purchase item row as stored
#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    purchase_order_id: Uuid,
    product_id: Uuid,
    product_name: String,
    qty_pack: i64,
    pack_size: i64,
    unit_name: String,
    price_per_pack: Decimal,
    supplier_decision: String,
    supplier_note: String,
    supplier_price_per_pack: Option<Decimal>,
    received_qty_pack: i64,
    discrepancy_reason: Option<String>,
}

impl ItemRow {
    fn into_model(self) -> AppResult<PurchaseItem> {
        let decision: SupplierDecision = self.supplier_decision.parse().map_err(|_| {
            AppError::Internal(format!(
                "Corrupt supplier decision: {}",
                self.supplier_decision
            ))
        })?;
        Ok(PurchaseItem {
            id: self.id,
            purchase_order_id: self.purchase_order_id,
            product_id: self.product_id,
            product_name: self.product_name,
            qty_pack: self.qty_pack,
            pack_size: self.pack_size,
            unit_name: self.unit_name,
            price_per_pack: self.price_per_pack,
            supplier_decision: decision,
            supplier_note: self.supplier_note,
            supplier_price_per_pack: self.supplier_price_per_pack,
            received_qty_pack: self.received_qty_pack,
            discrepancy_reason: self.discrepancy_reason,
        })
    }
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a purchase order and send it to the supplier
    pub async fn create(&self, input: CreatePurchaseInput) -> AppResult<CreatePurchaseResult> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A purchase order needs at least one item".to_string(),
                message_id: "Tambahkan minimal 1 item".to_string(),
            });
        }

        let supplier_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1 AND is_active = TRUE)",
        )
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;
        if !supplier_exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let mut tx = self.db.begin().await?;

        // Next sequence number within the current year
        let year = Utc::now().year();
        let seq = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) + 1 FROM purchase_orders WHERE EXTRACT(YEAR FROM created_at)::int = $1",
        )
        .bind(year)
        .fetch_one(&mut *tx)
        .await?;
        let code = generate_po_code(year, seq as i32);

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchase_orders (code, status, supplier_id, note)
            VALUES ($1, 'sent', $2, $3)
            RETURNING id
            "#,
        )
        .bind(&code)
        .bind(input.supplier_id)
        .bind(&input.note)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            if item.qty_pack < 1 {
                return Err(AppError::Validation {
                    field: "qty_pack".to_string(),
                    message: "Ordered quantity must be at least 1 pack".to_string(),
                    message_id: "Qty pack minimal 1".to_string(),
                });
            }

            // Snapshot the product's name, pack size, and price at order time
            let product = sqlx::query_as::<_, (String, i64, String, Decimal)>(
                r#"
                SELECT name, pack_size, unit_name, wholesale_price_per_pack
                FROM products
                WHERE id = $1 AND is_active = TRUE
                "#,
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let price = item
                .price_per_pack
                .filter(|p| *p >= Decimal::ZERO)
                .unwrap_or(product.3);

            sqlx::query(
                r#"
                INSERT INTO purchase_items (
                    purchase_order_id, product_id, product_name, qty_pack,
                    pack_size, unit_name, price_per_pack
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&product.0)
            .bind(item.qty_pack)
            .bind(product.1)
            .bind(&product.2)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(CreatePurchaseResult { id: order_id, code })
    }

    /// List purchase orders, filtered and paginated
    pub async fn list(
        &self,
        filter: &PurchaseFilter,
        supplier_scope: Option<Uuid>,
    ) -> AppResult<PaginatedResponse<PurchaseOrderRow>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1).max(1),
            per_page: filter.limit.unwrap_or(20).clamp(1, 100),
        };

        let pattern = format!(
            "%{}%",
            filter.search.as_deref().unwrap_or("").trim().to_lowercase()
        );
        let status = filter
            .status
            .as_deref()
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM purchase_orders po
            JOIN suppliers s ON s.id = po.supplier_id
            WHERE (LOWER(po.code) LIKE $1 OR LOWER(s.name) LIKE $1)
              AND ($2::text IS NULL OR po.status = $2)
              AND ($3::uuid IS NULL OR po.supplier_id = $3)
            "#,
        )
        .bind(&pattern)
        .bind(&status)
        .bind(supplier_scope)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, PurchaseOrderRow>(
            r#"
            SELECT po.id, po.code, po.status, po.supplier_id, s.name AS supplier_name,
                   (SELECT COUNT(*) FROM purchase_items pi WHERE pi.purchase_order_id = po.id) AS item_count,
                   po.created_at, po.confirmed_at, po.received_at
            FROM purchase_orders po
            JOIN suppliers s ON s.id = po.supplier_id
            WHERE (LOWER(po.code) LIKE $1 OR LOWER(s.name) LIKE $1)
              AND ($2::text IS NULL OR po.status = $2)
              AND ($3::uuid IS NULL OR po.supplier_id = $3)
            ORDER BY po.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&pattern)
        .bind(&status)
        .bind(supplier_scope)
        .bind(pagination.per_page as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows,
            pagination: PaginationMeta::new(pagination.page, pagination.per_page, total as u64),
        })
    }

    /// Get a purchase order with items. A supplier scope restricts access to
    /// that supplier's own orders.
    pub async fn get(
        &self,
        po_id: Uuid,
        supplier_scope: Option<Uuid>,
    ) -> AppResult<PurchaseDetail> {
        let (order, supplier_name) = self.load_order(po_id).await?;

        if let Some(scope) = supplier_scope {
            if order.supplier_id != scope {
                return Err(AppError::NotFound("Purchase order".to_string()));
            }
        }

        let items = self.load_items(po_id).await?;
        let supplier_total = compute_supplier_total(&items);

        Ok(PurchaseDetail {
            po: PurchaseOrderView {
                order,
                supplier_name,
            },
            items,
            supplier_total,
        })
    }

    /// Supplier confirmation: apply the decisions, validate through the
    /// engine, and move the order to `confirmed`.
    pub async fn confirm(
        &self,
        po_id: Uuid,
        supplier_scope: Option<Uuid>,
        input: ConfirmInput,
    ) -> AppResult<PurchaseDetail> {
        let (order, _) = self.load_order(po_id).await?;

        if let Some(scope) = supplier_scope {
            if order.supplier_id != scope {
                return Err(AppError::NotFound("Purchase order".to_string()));
            }
        }
        if !order.is_editable() {
            return Err(AppError::InvalidStateTransition(format!(
                "Order {} is already {}",
                order.code, order.status
            )));
        }

        let mut items = self.load_items(po_id).await?;

        // Apply each submitted decision through the engine
        for decision in &input.decisions {
            let item = items
                .iter_mut()
                .find(|i| i.id == decision.purchase_item_id)
                .ok_or_else(|| AppError::NotFound("Purchase item".to_string()))?;
            apply_decision(
                &order,
                item,
                decision.decision,
                &decision.note,
                decision.supplier_price_per_pack,
            )?;
        }

        // The order is confirmable only when every line is resolved
        let gate = decision_gate(&items);
        if !gate.allowed {
            let (mut pending, mut missing_price) = (0, 0);
            for reason in &gate.reasons {
                match reason {
                    GateReason::PendingDecisions { count } => pending = *count,
                    GateReason::MissingPrice { count } => missing_price = *count,
                    _ => {}
                }
            }
            return Err(AppError::IncompleteDecision {
                pending,
                missing_price,
            });
        }

        let mut tx = self.db.begin().await?;
        for item in &items {
            sqlx::query(
                r#"
                UPDATE purchase_items
                SET supplier_decision = $1, supplier_note = $2, supplier_price_per_pack = $3
                WHERE id = $4
                "#,
            )
            .bind(item.supplier_decision.as_str())
            .bind(&item.supplier_note)
            .bind(item.supplier_price_per_pack)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query(
            "UPDATE purchase_orders SET status = 'confirmed', confirmed_at = NOW() WHERE id = $1",
        )
        .bind(po_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.get(po_id, supplier_scope).await
    }

    /// Goods receipt: validate the submission through the engine, record a
    /// GRN, accumulate received quantities, restock products, and close the
    /// order once every line is fully received or reasoned.
    pub async fn receive(
        &self,
        po_id: Uuid,
        received_by_name: &str,
        input: ReceiveInput,
    ) -> AppResult<ReceiveResult> {
        let (order, _) = self.load_order(po_id).await?;

        if order.status != PurchaseStatus::Confirmed {
            return Err(AppError::InvalidStateTransition(format!(
                "Order {} is {} and cannot be received",
                order.code, order.status
            )));
        }

        let items = self.load_items(po_id).await?;

        // Translate the submission into engine inputs, keyed by line item
        let mut proposed: HashMap<Uuid, i64> = HashMap::new();
        let mut diff_reasons: HashMap<Uuid, String> = HashMap::new();
        for line in &input.items {
            let item = items
                .iter()
                .find(|i| i.product_id == line.product_id)
                .ok_or_else(|| AppError::NotFound("Purchase item".to_string()))?;
            // The UI clamps; a submission beyond the remaining quantity is rejected
            if line.qty_pack > item.remaining_to_receive() {
                return Err(AppError::OverReceipt(item.product_name.clone()));
            }
            proposed.insert(item.id, line.qty_pack.max(0));
            if !line.diff_reason.trim().is_empty() {
                diff_reasons.insert(item.id, line.diff_reason.trim().to_string());
            }
        }

        let summary = summarize(&items, &proposed, &diff_reasons);
        let gate = receipt_gate(&summary);
        if !gate.allowed {
            for reason in &gate.reasons {
                match reason {
                    GateReason::NothingReceived => {
                        return Err(AppError::Validation {
                            field: "items".to_string(),
                            message: "At least one item must be received".to_string(),
                            message_id: "Isi minimal 1 item diterima".to_string(),
                        })
                    }
                    GateReason::MissingPrice { count } => {
                        return Err(AppError::IncompleteDecision {
                            pending: 0,
                            missing_price: *count,
                        })
                    }
                    GateReason::MissingReason { count } => {
                        return Err(AppError::IncompleteReceipt {
                            missing_reason: *count,
                        })
                    }
                    _ => {}
                }
            }
            return Err(AppError::ValidationError("Receipt rejected".to_string()));
        }

        // The canonical receipt lines come from the engine, not the raw input
        let payload =
            reconciliation::build_receipt_payload(&items, &proposed, &diff_reasons, &input.note);

        let mut tx = self.db.begin().await?;

        let grn_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO goods_receipts (purchase_order_id, received_by_name, note)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(po_id)
        .bind(received_by_name)
        .bind(&payload.note)
        .fetch_one(&mut *tx)
        .await?;

        let mut all_settled = true;
        for item in &items {
            let line = payload.items.iter().find(|l| l.product_id == item.product_id);
            let (recv, diff, reason) = match line {
                Some(l) => (l.qty_pack, l.diff_qty_pack, l.diff_reason.clone()),
                None => (0, 0, String::new()),
            };

            if line.is_some() {
                sqlx::query(
                    r#"
                    INSERT INTO goods_receipt_items (
                        goods_receipt_id, purchase_item_id, product_id,
                        qty_pack, diff_qty_pack, diff_reason
                    )
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(grn_id)
                .bind(item.id)
                .bind(item.product_id)
                .bind(recv)
                .bind(diff)
                .bind(&reason)
                .execute(&mut *tx)
                .await?;
            }

            if recv > 0 || diff > 0 {
                sqlx::query(
                    r#"
                    UPDATE purchase_items
                    SET received_qty_pack = received_qty_pack + $1,
                        discrepancy_reason = CASE WHEN $2 > 0 THEN $3 ELSE discrepancy_reason END
                    WHERE id = $4
                    "#,
                )
                .bind(recv)
                .bind(diff)
                .bind(&reason)
                .bind(item.id)
                .execute(&mut *tx)
                .await?;
            }

            if recv > 0 {
                // Received packs land in unit stock
                sqlx::query(
                    "UPDATE products SET stock_units = stock_units + $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(recv * item.pack_size)
                .bind(item.product_id)
                .execute(&mut *tx)
                .await?;
            }

            let remaining_after = (item.remaining_to_receive() - recv).max(0);
            if remaining_after > 0 && reason.is_empty() {
                all_settled = false;
            }
        }

        if all_settled {
            sqlx::query(
                "UPDATE purchase_orders SET status = 'received', received_at = NOW() WHERE id = $1",
            )
            .bind(po_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ReceiveResult {
            grn_id,
            status: if all_settled {
                PurchaseStatus::Received.to_string()
            } else {
                order.status.to_string()
            },
            total_packs: summary.total_packs,
            total_units: summary.total_units,
        })
    }

    /// GRN-centric detail: header, per-item reconciliation summary, receipts
    pub async fn receive_detail(&self, po_id: Uuid) -> AppResult<ReceiveDetail> {
        let (order, supplier_name) = self.load_order(po_id).await?;
        let items = self.load_items(po_id).await?;

        let summary_items = items
            .iter()
            .map(|item| SummaryItem {
                purchase_item_id: item.id,
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                ordered_qty_pack: item.qty_pack,
                received_qty_pack: item.received_qty_pack,
                remaining_qty_pack: item.remaining_to_receive(),
                supplier_decision: item.supplier_decision.as_str().to_string(),
                supplier_note: item.supplier_note.clone(),
                supplier_price_per_pack: item.supplier_price_per_pack,
                admin_return_reason: item.discrepancy_reason.clone(),
            })
            .collect();

        #[derive(FromRow)]
        struct GrnRow {
            id: Uuid,
            received_at: DateTime<Utc>,
            received_by_name: String,
            note: String,
        }

        let grn_rows = sqlx::query_as::<_, GrnRow>(
            r#"
            SELECT id, received_at, received_by_name, note
            FROM goods_receipts
            WHERE purchase_order_id = $1
            ORDER BY received_at
            "#,
        )
        .bind(po_id)
        .fetch_all(&self.db)
        .await?;

        #[derive(FromRow)]
        struct GrnLineRow {
            goods_receipt_id: Uuid,
            product_id: Uuid,
            product_name: String,
            pack_size: i64,
            qty_pack: i64,
            diff_qty_pack: i64,
            diff_reason: String,
        }

        let line_rows = sqlx::query_as::<_, GrnLineRow>(
            r#"
            SELECT gri.goods_receipt_id, gri.product_id, pi.product_name,
                   pi.pack_size, gri.qty_pack, gri.diff_qty_pack, gri.diff_reason
            FROM goods_receipt_items gri
            JOIN purchase_items pi ON pi.id = gri.purchase_item_id
            JOIN goods_receipts gr ON gr.id = gri.goods_receipt_id
            WHERE gr.purchase_order_id = $1
            ORDER BY pi.product_name
            "#,
        )
        .bind(po_id)
        .fetch_all(&self.db)
        .await?;

        let grns = grn_rows
            .into_iter()
            .map(|grn| {
                let items = line_rows
                    .iter()
                    .filter(|l| l.goods_receipt_id == grn.id)
                    .map(|l| GrnLineView {
                        product_id: l.product_id,
                        product_name: l.product_name.clone(),
                        pack_size: l.pack_size,
                        qty_pack: l.qty_pack,
                        qty_units: l.qty_pack * l.pack_size,
                        diff_qty_pack: l.diff_qty_pack,
                        diff_reason: l.diff_reason.clone(),
                    })
                    .collect();
                GrnView {
                    id: grn.id,
                    received_at: grn.received_at,
                    received_by_name: grn.received_by_name,
                    note: grn.note,
                    items,
                }
            })
            .collect();

        Ok(ReceiveDetail {
            purchase: PurchaseOrderView {
                order,
                supplier_name,
            },
            summary_items,
            grns,
        })
    }

    /// Load the order header with its supplier name
    async fn load_order(&self, po_id: Uuid) -> AppResult<(PurchaseOrder, String)> {
        #[derive(FromRow)]
        struct OrderWithSupplier {
            #[sqlx(flatten)]
            order: OrderRow,
            supplier_name: String,
        }

        let row = sqlx::query_as::<_, OrderWithSupplier>(
            r#"
            SELECT po.id, po.code, po.status, po.supplier_id, po.note,
                   po.created_at, po.confirmed_at, po.received_at,
                   s.name AS supplier_name
            FROM purchase_orders po
            JOIN suppliers s ON s.id = po.supplier_id
            WHERE po.id = $1
            "#,
        )
        .bind(po_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        Ok((row.order.into_model()?, row.supplier_name))
    }

    /// Load the order's items as engine models
    async fn load_items(&self, po_id: Uuid) -> AppResult<Vec<PurchaseItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, purchase_order_id, product_id, product_name, qty_pack,
                   pack_size, unit_name, price_per_pack, supplier_decision,
                   supplier_note, supplier_price_per_pack, received_qty_pack,
                   discrepancy_reason
            FROM purchase_items
            WHERE purchase_order_id = $1
            ORDER BY product_name
            "#,
        )
        .bind(po_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ItemRow::into_model).collect()
    }
}
