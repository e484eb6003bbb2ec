//! HTTP handlers for purchase order and goods-receipt endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{require_role, AuthUser, CurrentUser};
use crate::services::purchase::{
    ConfirmInput, CreatePurchaseInput, CreatePurchaseResult, PurchaseDetail, PurchaseFilter,
    PurchaseOrderRow, PurchaseService, ReceiveDetail, ReceiveInput, ReceiveResult,
};
use crate::AppState;
use shared::models::UserRole;
use shared::types::PaginatedResponse;

/// Suppliers only ever see their own orders; admins see everything
fn supplier_scope(user: &AuthUser) -> AppResult<Option<Uuid>> {
    match user.role {
        UserRole::Supplier => user
            .supplier_id
            .map(Some)
            .ok_or(AppError::InsufficientPermissions),
        _ => Ok(None),
    }
}

/// Create a purchase order (admin)
pub async fn create_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<(StatusCode, Json<CreatePurchaseResult>)> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = PurchaseService::new(state.db);
    let result = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// List purchase orders (admin)
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<PurchaseFilter>,
) -> AppResult<Json<PaginatedResponse<PurchaseOrderRow>>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = PurchaseService::new(state.db);
    let orders = service.list(&filter, None).await?;
    Ok(Json(orders))
}

/// List the calling supplier's purchase orders
pub async fn list_my_purchase_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<PurchaseFilter>,
) -> AppResult<Json<PaginatedResponse<PurchaseOrderRow>>> {
    require_role(&current_user.0, &[UserRole::Supplier])?;
    let scope = supplier_scope(&current_user.0)?;
    let service = PurchaseService::new(state.db);
    let orders = service.list(&filter, scope).await?;
    Ok(Json(orders))
}

/// Get a purchase order with items
pub async fn get_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(po_id): Path<Uuid>,
) -> AppResult<Json<PurchaseDetail>> {
    require_role(&current_user.0, &[UserRole::Admin, UserRole::Supplier])?;
    let scope = supplier_scope(&current_user.0)?;
    let service = PurchaseService::new(state.db);
    let detail = service.get(po_id, scope).await?;
    Ok(Json(detail))
}

/// Confirm a purchase order with supplier decisions (supplier)
pub async fn confirm_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(po_id): Path<Uuid>,
    Json(input): Json<ConfirmInput>,
) -> AppResult<Json<PurchaseDetail>> {
    require_role(&current_user.0, &[UserRole::Supplier])?;
    let scope = supplier_scope(&current_user.0)?;
    let service = PurchaseService::new(state.db);
    let detail = service.confirm(po_id, scope, input).await?;
    Ok(Json(detail))
}

/// Receive goods against a purchase order (admin)
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(po_id): Path<Uuid>,
    Json(input): Json<ReceiveInput>,
) -> AppResult<Json<ReceiveResult>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = PurchaseService::new(state.db);
    let result = service
        .receive(po_id, &current_user.0.name, input)
        .await?;
    Ok(Json(result))
}

/// GRN-centric detail view (admin, or the order's supplier)
pub async fn get_receive_detail(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(po_id): Path<Uuid>,
) -> AppResult<Json<ReceiveDetail>> {
    require_role(&current_user.0, &[UserRole::Admin, UserRole::Supplier])?;
    let scope = supplier_scope(&current_user.0)?;
    let service = PurchaseService::new(state.db);
    let detail = service.receive_detail(po_id).await?;

    if let Some(scope) = scope {
        if detail.purchase.order.supplier_id != scope {
            return Err(AppError::NotFound("Purchase order".to_string()));
        }
    }

    Ok(Json(detail))
}
