//! Point-of-sale tests
//!
//! Tests the checkout arithmetic the POS relies on:
//! - Line pricing by item type (unit vs pack)
//! - Stock draw-down in base units
//! - Cash payment and change

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{units_consumed, SaleItemType};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Simulate checking out one cart line against available stock
fn simulate_line(
    stock_units: i64,
    pack_size: i64,
    item_type: SaleItemType,
    qty: i64,
    unit_price: Decimal,
    pack_price: Decimal,
) -> Result<(i64, Decimal), &'static str> {
    if qty < 1 {
        return Err("Quantity must be at least 1");
    }
    let units = units_consumed(item_type, qty, pack_size);
    if units > stock_units {
        return Err("Insufficient stock");
    }
    let price = match item_type {
        SaleItemType::Unit => unit_price,
        SaleItemType::Pack => pack_price,
    };
    Ok((stock_units - units, price * Decimal::from(qty)))
}

/// Simulate a cash payment
fn simulate_cash_payment(total: Decimal, cash: Decimal) -> Result<Decimal, &'static str> {
    if cash < total {
        return Err("Cash received is less than the total");
    }
    Ok(cash - total)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_unit_line_pricing() {
        let (stock_after, line_total) = simulate_line(
            100,
            12,
            SaleItemType::Unit,
            3,
            dec("15000"),
            dec("150000"),
        )
        .unwrap();

        assert_eq!(stock_after, 97);
        assert_eq!(line_total, dec("45000"));
    }

    #[test]
    fn test_pack_line_pricing() {
        let (stock_after, line_total) = simulate_line(
            100,
            12,
            SaleItemType::Pack,
            2,
            dec("15000"),
            dec("150000"),
        )
        .unwrap();

        // 2 packs of 12 draw 24 units
        assert_eq!(stock_after, 76);
        assert_eq!(line_total, dec("300000"));
    }

    #[test]
    fn test_pack_sale_rejected_when_units_short() {
        // 20 units cannot cover 2 packs of 12
        let result = simulate_line(
            20,
            12,
            SaleItemType::Pack,
            2,
            dec("15000"),
            dec("150000"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_qty_rejected() {
        let result = simulate_line(
            100,
            12,
            SaleItemType::Unit,
            0,
            dec("15000"),
            dec("150000"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_exact_cash_gives_zero_change() {
        assert_eq!(
            simulate_cash_payment(dec("47500"), dec("47500")).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_change_calculation() {
        assert_eq!(
            simulate_cash_payment(dec("47500"), dec("50000")).unwrap(),
            dec("2500")
        );
    }

    #[test]
    fn test_underpayment_rejected() {
        assert!(simulate_cash_payment(dec("47500"), dec("47000")).is_err());
    }

    #[test]
    fn test_cart_total_is_sum_of_lines() {
        let lines = [
            (SaleItemType::Unit, 3i64, dec("15000")),
            (SaleItemType::Pack, 1, dec("150000")),
            (SaleItemType::Unit, 2, dec("8000")),
        ];

        let total: Decimal = lines
            .iter()
            .map(|(_, qty, price)| *price * Decimal::from(*qty))
            .sum();

        // 45000 + 150000 + 16000
        assert_eq!(total, dec("211000"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn item_type_strategy() -> impl Strategy<Value = SaleItemType> {
        prop_oneof![Just(SaleItemType::Unit), Just(SaleItemType::Pack)]
    }

    proptest! {
        /// Stock never goes negative through a successful line
        #[test]
        fn prop_stock_never_negative(
            stock in 0i64..10_000,
            pack_size in 1i64..100,
            qty in 1i64..200,
            item_type in item_type_strategy()
        ) {
            let result = simulate_line(
                stock,
                pack_size,
                item_type,
                qty,
                dec("1000"),
                dec("10000"),
            );

            if let Ok((stock_after, _)) = result {
                prop_assert!(stock_after >= 0);
                prop_assert!(stock_after <= stock);
            }
        }

        /// Units consumed scale linearly with quantity
        #[test]
        fn prop_units_consumed_linear(
            pack_size in 1i64..100,
            qty in 1i64..100,
            item_type in item_type_strategy()
        ) {
            let single = units_consumed(item_type, 1, pack_size);
            let many = units_consumed(item_type, qty, pack_size);
            prop_assert_eq!(many, single * qty);
        }

        /// Change is exactly cash minus total, and never negative
        #[test]
        fn prop_change_conservation(
            total_cents in 0i64..100_000_000,
            extra_cents in 0i64..10_000_000
        ) {
            let total = Decimal::new(total_cents, 2);
            let cash = Decimal::new(total_cents + extra_cents, 2);

            let change = simulate_cash_payment(total, cash).unwrap();
            prop_assert_eq!(change, cash - total);
            prop_assert!(change >= Decimal::ZERO);
        }

        /// Underpayment always fails
        #[test]
        fn prop_underpayment_always_rejected(
            total_cents in 1i64..100_000_000,
            short_cents in 1i64..1_000_000
        ) {
            let total = Decimal::new(total_cents, 2);
            let cash = total - Decimal::new(short_cents.min(total_cents), 2);
            prop_assert!(simulate_cash_payment(total, cash).is_err());
        }
    }
}
