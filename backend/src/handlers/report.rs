//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    Json,
};

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::report::{
    CashierOption, CashierReport, CashierReportFilter, ReportService,
};
use crate::AppState;
use shared::models::UserRole;

/// List cashiers for the report filter dropdown (admin)
pub async fn list_cashiers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<CashierOption>>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ReportService::new(state.db);
    let cashiers = service.list_cashiers().await?;
    Ok(Json(cashiers))
}

/// Cashier sales report (admin)
pub async fn get_cashier_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<CashierReportFilter>,
) -> AppResult<Json<CashierReport>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ReportService::new(state.db);
    let report = service.cashier_report(&filter).await?;
    Ok(Json(report))
}

/// Cashier sales report as a CSV download (admin)
pub async fn export_cashier_report_csv(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<CashierReportFilter>,
) -> AppResult<(HeaderMap, String)> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ReportService::new(state.db);
    let csv = service.cashier_report_csv(&filter).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"cashier-report.csv\""),
    );
    Ok((headers, csv))
}
