//! Validation utilities for the Toko Back-Office Platform
//!
//! Includes Indonesia-specific validations for phone numbers used on
//! supplier and user records.

use rust_decimal::Decimal;

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate SKU format (up to 32 chars, alphanumeric plus dash/underscore)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU cannot be empty");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("SKU must be alphanumeric with optional dashes/underscores");
    }
    Ok(())
}

/// Validate a purchase-order code
/// Format: PO-YYYY-NNNN (e.g., PO-2025-0042)
pub fn validate_po_code(code: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = code.split('-').collect();

    if parts.len() != 3 {
        return Err("Purchase order code must be in format PO-YYYY-NNNN");
    }
    if parts[0] != "PO" {
        return Err("Purchase order code must start with 'PO'");
    }
    if parts[1].len() != 4 || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid year in purchase order code");
    }
    if parts[2].len() != 4 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence number in purchase order code");
    }
    Ok(())
}

/// Validate a non-negative money amount
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a pack size (units per pack)
pub fn validate_pack_size(pack_size: i64) -> Result<(), &'static str> {
    if pack_size < 1 {
        return Err("Pack size must be at least 1");
    }
    Ok(())
}

// ============================================================================
// Indonesia-Specific Validations
// ============================================================================

/// Validate Indonesian phone number format
/// Accepts: 081234567890, 0812-3456-7890, +6281234567890
pub fn validate_indonesian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Domestic mobile: 10-13 digits starting with 0 (e.g., 081234567890)
    if (10..=13).contains(&digits.len()) && digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: starts with 62
    if (11..=14).contains(&digits.len()) && digits.starts_with("62") {
        return Ok(());
    }

    Err("Invalid Indonesian phone number format")
}
