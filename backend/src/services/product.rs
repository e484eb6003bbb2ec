//! Product catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{validate_pack_size, validate_price, validate_sku};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub pack_size: i64,
    pub unit_name: String,
    pub wholesale_price_per_pack: Decimal,
    pub retail_price_per_unit: Decimal,
    pub stock_units: i64,
    pub min_stock_units: i64,
    pub max_stock_units: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub pack_size: i64,
    #[validate(length(min = 1, max = 20))]
    pub unit_name: String,
    pub wholesale_price_per_pack: Decimal,
    pub retail_price_per_unit: Decimal,
    pub initial_stock_units: Option<i64>,
    pub min_stock_units: Option<i64>,
    pub max_stock_units: Option<i64>,
    pub image_url: Option<String>,
}

/// Input for updating a product
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub pack_size: Option<i64>,
    pub unit_name: Option<String>,
    pub wholesale_price_per_pack: Option<Decimal>,
    pub retail_price_per_unit: Option<Decimal>,
    pub min_stock_units: Option<i64>,
    pub max_stock_units: Option<i64>,
    pub image_url: Option<String>,
}

/// Filter for listing products
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    /// Multi-token search over name, SKU, and category
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active products, filtered and paginated.
    ///
    /// Search follows the storefront convention: every whitespace-separated
    /// token must match name, SKU, or category.
    pub async fn list(&self, filter: &ProductFilter) -> AppResult<PaginatedResponse<Product>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1).max(1),
            per_page: filter.limit.unwrap_or(100).clamp(1, 500),
        };

        let tokens: Vec<String> = filter
            .search
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .split_whitespace()
            .map(|t| format!("%{}%", t))
            .collect();

        // Every token must match one of the searchable columns
        let mut where_clause = String::from("is_active = TRUE");
        for i in 0..tokens.len() {
            where_clause.push_str(&format!(
                " AND (LOWER(name) LIKE ${n} OR LOWER(COALESCE(sku, '')) LIKE ${n} OR LOWER(COALESCE(category, '')) LIKE ${n})",
                n = i + 1
            ));
        }

        let count_sql = format!("SELECT COUNT(*) FROM products WHERE {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for token in &tokens {
            count_query = count_query.bind(token);
        }
        let total = count_query.fetch_one(&self.db).await?;

        let list_sql = format!(
            r#"
            SELECT id, name, sku, category, pack_size, unit_name,
                   wholesale_price_per_pack, retail_price_per_unit,
                   stock_units, min_stock_units, max_stock_units,
                   image_url, is_active, created_at, updated_at
            FROM products
            WHERE {}
            ORDER BY name
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            tokens.len() + 1,
            tokens.len() + 2
        );
        let mut list_query = sqlx::query_as::<_, Product>(&list_sql);
        for token in &tokens {
            list_query = list_query.bind(token);
        }
        let products = list_query
            .bind(pagination.per_page as i64)
            .bind(pagination.offset() as i64)
            .fetch_all(&self.db)
            .await?;

        Ok(PaginatedResponse {
            data: products,
            pagination: PaginationMeta::new(pagination.page, pagination.per_page, total as u64),
        })
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, category, pack_size, unit_name,
                   wholesale_price_per_pack, retail_price_per_unit,
                   stock_units, min_stock_units, max_stock_units,
                   image_url, is_active, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        Self::validate_pricing(
            input.pack_size,
            input.wholesale_price_per_pack,
            input.retail_price_per_unit,
        )?;

        // an empty SKU field means no SKU
        let sku = input.sku.clone().filter(|s| !s.trim().is_empty());
        if let Some(sku) = sku.as_deref() {
            validate_sku(sku).map_err(|msg| AppError::Validation {
                field: "sku".to_string(),
                message: msg.to_string(),
                message_id: "Format SKU tidak valid".to_string(),
            })?;

            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1 AND is_active = TRUE)",
            )
            .bind(sku)
            .fetch_one(&self.db)
            .await?;
            if exists {
                return Err(AppError::DuplicateEntry("sku".to_string()));
            }
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                name, sku, category, pack_size, unit_name,
                wholesale_price_per_pack, retail_price_per_unit,
                stock_units, min_stock_units, max_stock_units, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, sku, category, pack_size, unit_name,
                      wholesale_price_per_pack, retail_price_per_unit,
                      stock_units, min_stock_units, max_stock_units,
                      image_url, is_active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&sku)
        .bind(&input.category)
        .bind(input.pack_size)
        .bind(&input.unit_name)
        .bind(input.wholesale_price_per_pack)
        .bind(input.retail_price_per_unit)
        .bind(input.initial_stock_units.unwrap_or(0).max(0))
        .bind(input.min_stock_units.unwrap_or(0).max(0))
        .bind(input.max_stock_units.unwrap_or(1000).max(0))
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Update a product
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let existing = self.get(product_id).await?;

        let pack_size = input.pack_size.unwrap_or(existing.pack_size);
        let wholesale = input
            .wholesale_price_per_pack
            .unwrap_or(existing.wholesale_price_per_pack);
        let retail = input
            .retail_price_per_unit
            .unwrap_or(existing.retail_price_per_unit);
        Self::validate_pricing(pack_size, wholesale, retail)?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, sku = $2, category = $3, pack_size = $4, unit_name = $5,
                wholesale_price_per_pack = $6, retail_price_per_unit = $7,
                min_stock_units = $8, max_stock_units = $9, image_url = $10,
                updated_at = NOW()
            WHERE id = $11
            RETURNING id, name, sku, category, pack_size, unit_name,
                      wholesale_price_per_pack, retail_price_per_unit,
                      stock_units, min_stock_units, max_stock_units,
                      image_url, is_active, created_at, updated_at
            "#,
        )
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.sku.or(existing.sku))
        .bind(input.category.or(existing.category))
        .bind(pack_size)
        .bind(input.unit_name.unwrap_or(existing.unit_name))
        .bind(wholesale)
        .bind(retail)
        .bind(input.min_stock_units.unwrap_or(existing.min_stock_units))
        .bind(input.max_stock_units.unwrap_or(existing.max_stock_units))
        .bind(input.image_url.or(existing.image_url))
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Soft-deactivate a product
    pub async fn deactivate(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }

    fn validate_pricing(
        pack_size: i64,
        wholesale: Decimal,
        retail: Decimal,
    ) -> AppResult<()> {
        validate_pack_size(pack_size).map_err(|msg| AppError::Validation {
            field: "pack_size".to_string(),
            message: msg.to_string(),
            message_id: "Isi per pack minimal 1".to_string(),
        })?;
        validate_price(wholesale).map_err(|msg| AppError::Validation {
            field: "wholesale_price_per_pack".to_string(),
            message: msg.to_string(),
            message_id: "Harga pack tidak boleh negatif".to_string(),
        })?;
        validate_price(retail).map_err(|msg| AppError::Validation {
            field: "retail_price_per_unit".to_string(),
            message: msg.to_string(),
            message_id: "Harga unit tidak boleh negatif".to_string(),
        })?;
        Ok(())
    }
}
