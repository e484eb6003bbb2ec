//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::services::product::{
    CreateProductInput, Product, ProductFilter, ProductService, UpdateProductInput,
};
use crate::AppState;
use shared::models::UserRole;
use shared::types::PaginatedResponse;

/// List products (any authenticated role; the POS needs the catalog too)
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<PaginatedResponse<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list(&filter).await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Create a product (admin)
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin)
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Deactivate a product (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require_role(&current_user.0, &[UserRole::Admin])?;
    let service = ProductService::new(state.db);
    service.deactivate(product_id).await?;
    Ok(Json(()))
}
