//! Reporting service for cashier sales reports and CSV export

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Reporting service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

/// One sale row on the cashier report
#[derive(Debug, Serialize, FromRow)]
pub struct CashierReportRow {
    pub id: Uuid,
    pub cashier_id: Uuid,
    pub cashier_name: String,
    pub payment_method: String,
    pub item_count: i64,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over the filtered range
#[derive(Debug, Serialize, FromRow)]
pub struct CashierReportSummary {
    pub sale_count: i64,
    pub total_revenue: Decimal,
    pub total_items: i64,
}

/// Cashier report response
#[derive(Debug, Serialize)]
pub struct CashierReport {
    #[serde(flatten)]
    pub rows: PaginatedResponse<CashierReportRow>,
    pub summary: CashierReportSummary,
}

/// A cashier available in the report filter
#[derive(Debug, Serialize, FromRow)]
pub struct CashierOption {
    pub id: Uuid,
    pub name: String,
}

/// Filter for the cashier report
#[derive(Debug, Deserialize)]
pub struct CashierReportFilter {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub cashier_id: Option<Uuid>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Flat row shape for CSV export
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    sale_id: &'a str,
    date: String,
    cashier: &'a str,
    payment_method: &'a str,
    item_count: i64,
    total: String,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List users who have recorded at least one sale
    pub async fn list_cashiers(&self) -> AppResult<Vec<CashierOption>> {
        let cashiers = sqlx::query_as::<_, CashierOption>(
            r#"
            SELECT DISTINCT s.cashier_id AS id, s.cashier_name AS name
            FROM sales s
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(cashiers)
    }

    /// Cashier report: per-sale rows plus range aggregates
    pub async fn cashier_report(&self, filter: &CashierReportFilter) -> AppResult<CashierReport> {
        Self::validate_range(filter)?;

        let pagination = Pagination {
            page: filter.page.unwrap_or(1).max(1),
            per_page: filter.limit.unwrap_or(20).clamp(1, 100),
        };

        let summary = sqlx::query_as::<_, CashierReportSummary>(
            r#"
            SELECT COUNT(*) AS sale_count,
                   COALESCE(SUM(s.total), 0) AS total_revenue,
                   COALESCE(SUM((SELECT SUM(si.qty) FROM sale_items si WHERE si.sale_id = s.id)), 0)::bigint AS total_items
            FROM sales s
            WHERE s.created_at::date BETWEEN $1 AND $2
              AND ($3::uuid IS NULL OR s.cashier_id = $3)
            "#,
        )
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.cashier_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, CashierReportRow>(
            r#"
            SELECT s.id, s.cashier_id, s.cashier_name, s.payment_method,
                   (SELECT COALESCE(SUM(si.qty), 0) FROM sale_items si WHERE si.sale_id = s.id)::bigint AS item_count,
                   s.total, s.created_at
            FROM sales s
            WHERE s.created_at::date BETWEEN $1 AND $2
              AND ($3::uuid IS NULL OR s.cashier_id = $3)
            ORDER BY s.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.cashier_id)
        .bind(pagination.per_page as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(CashierReport {
            rows: PaginatedResponse {
                data: rows,
                pagination: PaginationMeta::new(
                    pagination.page,
                    pagination.per_page,
                    summary.sale_count as u64,
                ),
            },
            summary,
        })
    }

    /// Export the cashier report as CSV (unpaginated over the range)
    pub async fn cashier_report_csv(&self, filter: &CashierReportFilter) -> AppResult<String> {
        Self::validate_range(filter)?;

        let rows = sqlx::query_as::<_, CashierReportRow>(
            r#"
            SELECT s.id, s.cashier_id, s.cashier_name, s.payment_method,
                   (SELECT COALESCE(SUM(si.qty), 0) FROM sale_items si WHERE si.sale_id = s.id)::bigint AS item_count,
                   s.total, s.created_at
            FROM sales s
            WHERE s.created_at::date BETWEEN $1 AND $2
              AND ($3::uuid IS NULL OR s.cashier_id = $3)
            ORDER BY s.created_at
            "#,
        )
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.cashier_id)
        .fetch_all(&self.db)
        .await?;

        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in &rows {
            let id = row.id.to_string();
            wtr.serialize(CsvRow {
                sale_id: &id,
                date: row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                cashier: &row.cashier_name,
                payment_method: &row.payment_method,
                item_count: row.item_count,
                total: row.total.to_string(),
            })
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }

        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))?;

        Ok(csv_data)
    }

    fn validate_range(filter: &CashierReportFilter) -> AppResult<()> {
        if filter.date_from > filter.date_to {
            return Err(AppError::Validation {
                field: "date_from".to_string(),
                message: "Start date is after end date".to_string(),
                message_id: "Tanggal awal melewati tanggal akhir".to_string(),
            });
        }
        Ok(())
    }
}
