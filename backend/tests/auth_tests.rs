//! Authentication and authorization tests
//!
//! Tests token claims, expiry arithmetic, role rules, and the account
//! validation helpers backing the login and user-administration flows.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use shared::models::UserRole;
use shared::validation::{validate_email, validate_password};

/// Claims as issued by the auth service
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Claims {
    sub: String,
    name: String,
    role: String,
    supplier_id: Option<String>,
    exp: i64,
    iat: i64,
}

fn claims(role: &str, supplier_id: Option<&str>, ttl_seconds: i64) -> Claims {
    let now = Utc::now();
    Claims {
        sub: uuid::Uuid::new_v4().to_string(),
        name: "Siti".to_string(),
        role: role.to_string(),
        supplier_id: supplier_id.map(str::to_string),
        exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        iat: now.timestamp(),
    }
}

const SECRET: &[u8] = b"test-secret";

fn issue(claims: &Claims) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn verify(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(token, &DecodingKey::from_secret(SECRET), &Validation::default())
        .map(|data| data.claims)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let issued = claims("admin", None, 3600);
        let token = issue(&issued);
        let decoded = verify(&token).unwrap();
        assert_eq!(decoded, issued);
    }

    #[test]
    fn test_expired_token_rejected() {
        // well past the default decode leeway
        let issued = claims("cashier", None, -3600);
        let token = issue(&issued);
        let err = verify(&token).unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = issue(&claims("supplier", Some("abc"), 3600));
        let forged = encode(
            &Header::default(),
            &claims("admin", None, 3600),
            &EncodingKey::from_secret(b"other-secret"),
        )
        .unwrap();

        assert!(verify(&token).is_ok());
        assert!(verify(&forged).is_err());
    }

    #[test]
    fn test_supplier_claims_carry_supplier_id() {
        let supplier_uuid = uuid::Uuid::new_v4().to_string();
        let issued = claims("supplier", Some(&supplier_uuid), 3600);
        let decoded = verify(&issue(&issued)).unwrap();
        assert_eq!(decoded.supplier_id, Some(supplier_uuid));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("cashier").unwrap(), UserRole::Cashier);
        assert_eq!(UserRole::from_str("supplier").unwrap(), UserRole::Supplier);
        assert!(UserRole::from_str("manager").is_err());
        assert!(UserRole::from_str("").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("kasir.pagi@toko.co.id").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("123456789").is_ok());
        assert!(validate_password("short").is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        /// Any positive-TTL token round-trips its claims
        #[test]
        fn prop_claims_round_trip(
            ttl in 60i64..1_000_000,
            role_idx in 0usize..3
        ) {
            let roles = ["admin", "cashier", "supplier"];
            let issued = claims(roles[role_idx], None, ttl);
            let decoded = verify(&issue(&issued)).unwrap();
            prop_assert_eq!(decoded, issued);
        }

        /// Expiry is always issued-at plus the TTL
        #[test]
        fn prop_expiry_matches_ttl(ttl in 1i64..10_000_000) {
            let c = claims("admin", None, ttl);
            prop_assert_eq!(c.exp - c.iat, ttl);
        }

        /// Role strings round-trip through parse/as_str
        #[test]
        fn prop_role_round_trip(role_idx in 0usize..3) {
            let roles = [UserRole::Admin, UserRole::Cashier, UserRole::Supplier];
            let role = roles[role_idx];
            prop_assert_eq!(UserRole::from_str(role.as_str()).unwrap(), role);
        }
    }
}
