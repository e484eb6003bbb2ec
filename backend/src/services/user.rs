//! User administration service

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::models::UserRole;
use shared::validation::validate_indonesian_phone;

/// User administration service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
    default_password: String,
}

/// User record (never exposes the password hash)
#[derive(Debug, Serialize, FromRow)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub supplier_id: Option<Uuid>,
    pub supplier_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. Supplier accounts either link an existing
/// supplier or create one inline.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub supplier_id: Option<Uuid>,
    pub supplier_new: Option<NewSupplierInput>,
}

/// Inline supplier creation alongside a supplier user
#[derive(Debug, Deserialize, Validate)]
pub struct NewSupplierInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub pic_name: Option<String>,
}

/// Filter for listing users
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    /// Matches name or email
    pub search: Option<String>,
    pub role: Option<String>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool, default_password: &str) -> Self {
        Self {
            db,
            default_password: default_password.to_string(),
        }
    }

    /// List users, optionally filtered by search text and role
    pub async fn list(&self, filter: &UserFilter) -> AppResult<Vec<UserView>> {
        let pattern = format!(
            "%{}%",
            filter.search.as_deref().unwrap_or("").trim().to_lowercase()
        );
        let role = filter
            .role
            .as_deref()
            .map(|r| r.to_lowercase())
            .filter(|r| !r.is_empty());

        let users = sqlx::query_as::<_, UserView>(
            r#"
            SELECT u.id, u.name, u.email, u.phone, u.role, u.supplier_id,
                   s.name AS supplier_name, u.is_active, u.created_at, u.updated_at
            FROM users u
            LEFT JOIN suppliers s ON s.id = u.supplier_id
            WHERE (LOWER(u.name) LIKE $1 OR LOWER(u.email) LIKE $1)
              AND ($2::text IS NULL OR u.role = $2)
            ORDER BY u.name
            "#,
        )
        .bind(&pattern)
        .bind(&role)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Create a user with the default password
    pub async fn create(&self, input: CreateUserInput) -> AppResult<UserView> {
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

        let email_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;
        if email_taken {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let mut tx = self.db.begin().await?;

        // Supplier accounts must be linked to a supplier record
        let supplier_id = match input.role {
            UserRole::Supplier => match (&input.supplier_id, &input.supplier_new) {
                (Some(id), _) => {
                    let exists = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1 AND is_active = TRUE)",
                    )
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
                    if !exists {
                        return Err(AppError::NotFound("Supplier".to_string()));
                    }
                    Some(*id)
                }
                (None, Some(new_supplier)) => {
                    new_supplier
                        .validate()
                        .map_err(|e| AppError::ValidationError(e.to_string()))?;
                    let id = sqlx::query_scalar::<_, Uuid>(
                        r#"
                        INSERT INTO suppliers (name, phone, email, address, pic_name)
                        VALUES ($1, $2, $3, $4, $5)
                        RETURNING id
                        "#,
                    )
                    .bind(&new_supplier.name)
                    .bind(&new_supplier.phone)
                    .bind(&new_supplier.email)
                    .bind(&new_supplier.address)
                    .bind(&new_supplier.pic_name)
                    .fetch_one(&mut *tx)
                    .await?;
                    Some(id)
                }
                (None, None) => {
                    return Err(AppError::Validation {
                        field: "supplier_id".to_string(),
                        message: "Supplier accounts need a supplier".to_string(),
                        message_id: "Pilih supplier terlebih dahulu".to_string(),
                    })
                }
            },
            _ => None,
        };

        let password_hash = hash(&self.default_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, phone, role, supplier_id, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.role.as_str())
        .bind(supplier_id)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(user_id).await
    }

    /// Deactivate a user (soft delete; the account can no longer log in)
    pub async fn deactivate(&self, user_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(())
    }

    /// Reset a user's password to the configured default
    pub async fn reset_password(&self, user_id: Uuid) -> AppResult<()> {
        let password_hash = hash(&self.default_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(&password_hash)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> AppResult<UserView> {
        sqlx::query_as::<_, UserView>(
            r#"
            SELECT u.id, u.name, u.email, u.phone, u.role, u.supplier_id,
                   s.name AS supplier_name, u.is_active, u.created_at, u.updated_at
            FROM users u
            LEFT JOIN suppliers s ON s.id = u.supplier_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }
}
