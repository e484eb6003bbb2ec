//! Route definitions for the Toko Back-Office Platform

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - supplier administration
        .nest("/suppliers", supplier_routes())
        // Protected routes - purchase orders and goods receipt
        .nest("/purchase", purchase_routes())
        // Protected routes - point of sale
        .nest("/sales", sale_routes())
        // Protected routes - reporting
        .nest("/reports", report_routes())
        // Protected routes - user administration
        .nest("/users", user_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier administration routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier).put(handlers::update_supplier),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_orders).post(handlers::create_purchase_order),
        )
        .route("/mine", get(handlers::list_my_purchase_orders))
        .route("/:po_id", get(handlers::get_purchase_order))
        .route("/:po_id/confirm", post(handlers::confirm_purchase_order))
        .route("/:po_id/receive", post(handlers::receive_purchase_order))
        .route("/:po_id/receive-detail", get(handlers::get_receive_detail))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Point-of-sale routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_sale))
        .route("/:sale_id", get(handlers::get_sale))
        .route("/:sale_id/receipt", get(handlers::get_sale_receipt))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/cashiers", get(handlers::list_cashiers))
        .route("/cashier", get(handlers::get_cashier_report))
        .route("/cashier.csv", get(handlers::export_cashier_report_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// User administration routes (protected)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route("/:user_id", delete(handlers::deactivate_user))
        .route("/:user_id/reset-password", post(handlers::reset_password))
        .route_layer(middleware::from_fn(auth_middleware))
}
