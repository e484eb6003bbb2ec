//! HTTP handlers for supplier administration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::supplier::{
    CreateSupplierInput, Supplier, SupplierFilter, SupplierService, UpdateSupplierInput,
};
use crate::AppState;
use shared::models::UserRole;

/// List suppliers (admin)
pub async fn list_suppliers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<SupplierFilter>,
) -> AppResult<Json<Vec<Supplier>>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = SupplierService::new(state.db);
    let suppliers = service.list(&filter).await?;
    Ok(Json(suppliers))
}

/// Get a single supplier (admin)
pub async fn get_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = SupplierService::new(state.db);
    let supplier = service.get(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a supplier (admin)
pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier (admin)
pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = SupplierService::new(state.db);
    let supplier = service.update(supplier_id, input).await?;
    Ok(Json(supplier))
}
