//! Supplier administration service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::validation::validate_indonesian_phone;

/// Supplier administration service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Supplier record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub pic_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub pic_name: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierInput {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    pub pic_name: Option<String>,
    pub is_active: Option<bool>,
}

/// Filter for listing suppliers
#[derive(Debug, Default, Deserialize)]
pub struct SupplierFilter {
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active suppliers, optionally filtered by name
    pub async fn list(&self, filter: &SupplierFilter) -> AppResult<Vec<Supplier>> {
        let limit = filter.limit.unwrap_or(20).clamp(1, 100) as i64;
        let pattern = format!(
            "%{}%",
            filter.search.as_deref().unwrap_or("").trim().to_lowercase()
        );

        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, email, address, pic_name, is_active,
                   created_at, updated_at
            FROM suppliers
            WHERE is_active = TRUE AND LOWER(name) LIKE $1
            ORDER BY name
            LIMIT $2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Get a supplier by id
    pub async fn get(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, phone, email, address, pic_name, is_active,
                   created_at, updated_at
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Create a supplier
    pub async fn create(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        if let Some(phone) = input.phone.as_deref().filter(|p| !p.is_empty()) {
            validate_indonesian_phone(phone).map_err(|msg| AppError::Validation {
                field: "phone".to_string(),
                message: msg.to_string(),
                message_id: "Format nomor telepon tidak valid".to_string(),
            })?;
        }

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, phone, email, address, pic_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, phone, email, address, pic_name, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.pic_name)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }

    /// Update a supplier
    pub async fn update(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let existing = self.get(supplier_id).await?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $1, phone = $2, email = $3, address = $4, pic_name = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, name, phone, email, address, pic_name, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.phone.or(existing.phone))
        .bind(input.email.or(existing.email))
        .bind(input.address.or(existing.address))
        .bind(input.pic_name.or(existing.pic_name))
        .bind(input.is_active.unwrap_or(existing.is_active))
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }
}
