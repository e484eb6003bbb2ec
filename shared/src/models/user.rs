//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles on the platform. Suppliers log in to decide on their own purchase
/// orders; cashiers operate the POS; admins do everything else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Cashier,
    Supplier,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Cashier => "cashier",
            UserRole::Supplier => "supplier",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "cashier" => Ok(UserRole::Cashier),
            "supplier" => Ok(UserRole::Supplier),
            _ => Err(()),
        }
    }
}

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    /// Set for and only for supplier accounts
    pub supplier_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Supplier accounts must be linked to a supplier record
    pub fn has_valid_supplier_link(&self) -> bool {
        match self.role {
            UserRole::Supplier => self.supplier_id.is_some(),
            _ => self.supplier_id.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn user(role: UserRole, supplier_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
            phone: None,
            role,
            supplier_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("SUPPLIER").unwrap(), UserRole::Supplier);
        assert!(UserRole::from_str("owner").is_err());
    }

    #[test]
    fn test_supplier_link() {
        assert!(user(UserRole::Supplier, Some(Uuid::new_v4())).has_valid_supplier_link());
        assert!(!user(UserRole::Supplier, None).has_valid_supplier_link());
        assert!(user(UserRole::Cashier, None).has_valid_supplier_link());
        assert!(!user(UserRole::Cashier, Some(Uuid::new_v4())).has_valid_supplier_link());
    }
}
