//! Point-of-sale service: cart checkout, stock draw-down, receipts

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{units_consumed, PaymentMethod, SaleItemType};

/// Point-of-sale service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Cart checkout input
#[derive(Debug, Deserialize)]
pub struct CheckoutInput {
    pub items: Vec<CartLineInput>,
    pub payment_method: PaymentMethod,
    pub cash_received: Option<Decimal>,
}

/// One cart line
#[derive(Debug, Deserialize)]
pub struct CartLineInput {
    pub product_id: Uuid,
    pub item_type: SaleItemType,
    pub qty: i64,
}

/// A recorded sale
#[derive(Debug, Serialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub cashier_name: String,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub cash_received: Option<Decimal>,
    pub change: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// A recorded sale line
#[derive(Debug, Serialize, FromRow)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub item_type: String,
    pub qty: i64,
    pub price: Decimal,
    pub line_total: Decimal,
}

/// Sale with its lines
#[derive(Debug, Serialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Product fields needed for pricing and stock checks
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    pack_size: i64,
    unit_name: String,
    wholesale_price_per_pack: Decimal,
    retail_price_per_unit: Decimal,
    stock_units: i64,
}

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Check out a cart: price every line server-side, verify stock, draw it
    /// down, and record the sale.
    pub async fn checkout(
        &self,
        cashier_id: Uuid,
        cashier_name: &str,
        input: CheckoutInput,
    ) -> AppResult<SaleDetail> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Cart is empty".to_string(),
                message_id: "Keranjang masih kosong".to_string(),
            });
        }

        // Only cash is processed today; qris/card are declared but not wired
        if input.payment_method != PaymentMethod::Cash {
            return Err(AppError::Validation {
                field: "payment_method".to_string(),
                message: "Only cash payment is supported".to_string(),
                message_id: "Saat ini hanya pembayaran tunai yang didukung".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let mut subtotal = Decimal::ZERO;
        let mut priced_lines = Vec::with_capacity(input.items.len());

        for line in &input.items {
            if line.qty < 1 {
                return Err(AppError::Validation {
                    field: "qty".to_string(),
                    message: "Quantity must be at least 1".to_string(),
                    message_id: "Qty minimal 1".to_string(),
                });
            }

            let product = sqlx::query_as::<_, ProductRow>(
                r#"
                SELECT id, name, pack_size, unit_name, wholesale_price_per_pack,
                       retail_price_per_unit, stock_units
                FROM products
                WHERE id = $1 AND is_active = TRUE
                FOR UPDATE
                "#,
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let units = units_consumed(line.item_type, line.qty, product.pack_size);
            if units > product.stock_units {
                return Err(AppError::InsufficientStock(format!(
                    "{} ({} {} requested, {} in stock)",
                    product.name, units, product.unit_name, product.stock_units
                )));
            }

            let price = match line.item_type {
                SaleItemType::Unit => product.retail_price_per_unit,
                SaleItemType::Pack => product.wholesale_price_per_pack,
            };
            let line_total = price * Decimal::from(line.qty);
            subtotal += line_total;

            sqlx::query(
                "UPDATE products SET stock_units = stock_units - $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(units)
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

            priced_lines.push((line, product.name.clone(), price, line_total));
        }

        // No tax applied at the counter
        let total = subtotal;

        let cash_received = input.cash_received.ok_or_else(|| AppError::Validation {
            field: "cash_received".to_string(),
            message: "Cash received is required for cash payment".to_string(),
            message_id: "Nominal uang diterima wajib diisi".to_string(),
        })?;
        if cash_received < total {
            return Err(AppError::Validation {
                field: "cash_received".to_string(),
                message: "Cash received is less than the total".to_string(),
                message_id: "Uang kurang dari total belanja".to_string(),
            });
        }
        let change = cash_received - total;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                cashier_id, cashier_name, payment_method, subtotal, total,
                cash_received, change
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, cashier_id, cashier_name, payment_method, subtotal,
                      total, cash_received, change, created_at
            "#,
        )
        .bind(cashier_id)
        .bind(cashier_name)
        .bind(input.payment_method.as_str())
        .bind(subtotal)
        .bind(total)
        .bind(cash_received)
        .bind(change)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(priced_lines.len());
        for (line, product_name, price, line_total) in priced_lines {
            let item = sqlx::query_as::<_, SaleItem>(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_id, product_name, item_type, qty, price, line_total
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, sale_id, product_id, product_name, item_type, qty,
                          price, line_total
                "#,
            )
            .bind(sale.id)
            .bind(line.product_id)
            .bind(&product_name)
            .bind(line.item_type.as_str())
            .bind(line.qty)
            .bind(price)
            .bind(line_total)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        tx.commit().await?;

        Ok(SaleDetail { sale, items })
    }

    /// Get a sale with its lines
    pub async fn get(&self, sale_id: Uuid) -> AppResult<SaleDetail> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, cashier_id, cashier_name, payment_method, subtotal,
                   total, cash_received, change, created_at
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, item_type, qty,
                   price, line_total
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY product_name
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.db)
        .await?;

        Ok(SaleDetail { sale, items })
    }

    /// Render a sale as a printable HTML receipt
    pub async fn receipt_html(&self, sale_id: Uuid) -> AppResult<String> {
        let detail = self.get(sale_id).await?;

        let mut rows = String::new();
        for item in &detail.items {
            rows.push_str(&format!(
                "<tr><td>{} ({})</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                item.product_name, item.item_type, item.qty, item.price, item.line_total
            ));
        }

        let payment = format!(
            "<tr><td colspan=\"3\">Total</td><td class=\"num\"><b>{}</b></td></tr>\
             <tr><td colspan=\"3\">Tunai</td><td class=\"num\">{}</td></tr>\
             <tr><td colspan=\"3\">Kembalian</td><td class=\"num\">{}</td></tr>",
            detail.sale.total,
            detail
                .sale
                .cash_received
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            detail
                .sale
                .change
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<title>Struk {id}</title>
<style>
body {{ font-family: monospace; max-width: 320px; margin: 0 auto; }}
table {{ width: 100%; border-collapse: collapse; }}
td {{ padding: 2px 0; }}
.num {{ text-align: right; }}
hr {{ border: none; border-top: 1px dashed #888; }}
</style>
</head>
<body>
<h3>Struk Penjualan</h3>
<div>No: {id}</div>
<div>Kasir: {cashier}</div>
<div>Waktu: {time}</div>
<hr>
<table>
<tr><td>Item</td><td class="num">Qty</td><td class="num">Harga</td><td class="num">Total</td></tr>
{rows}
<tr><td colspan="4"><hr></td></tr>
{payment}
</table>
<hr>
<div>Terima kasih!</div>
</body>
</html>"#,
            id = detail.sale.id,
            cashier = detail.sale.cashier_name,
            time = detail.sale.created_at.format("%Y-%m-%d %H:%M"),
            rows = rows,
            payment = payment,
        ))
    }
}
