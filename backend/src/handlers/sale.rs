//! HTTP handlers for point-of-sale endpoints

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::sale::{CheckoutInput, SaleDetail, SaleService};
use crate::AppState;
use shared::models::UserRole;

/// Check out the cart (cashier or admin)
pub async fn create_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CheckoutInput>,
) -> AppResult<(StatusCode, Json<SaleDetail>)> {
    require_role(&current_user.0, &[UserRole::Cashier, UserRole::Admin])?;
    let service = SaleService::new(state.db);
    let sale = service
        .checkout(current_user.0.user_id, &current_user.0.name, input)
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// Get a sale with its lines
pub async fn get_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<SaleDetail>> {
    require_role(&current_user.0, &[UserRole::Cashier, UserRole::Admin])?;
    let service = SaleService::new(state.db);
    let sale = service.get(sale_id).await?;
    Ok(Json(sale))
}

/// Printable HTML receipt for a sale
pub async fn get_sale_receipt(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<(HeaderMap, String)> {
    require_role(&current_user.0, &[UserRole::Cashier, UserRole::Admin])?;
    let service = SaleService::new(state.db);
    let html = service.receipt_html(sale_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    Ok((headers, html))
}
