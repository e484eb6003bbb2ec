//! Reporting tests
//!
//! Tests the cashier report aggregation arithmetic and the CSV export
//! shape, without a database.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// One sale as it appears on the report
#[derive(Debug, Clone)]
struct SaleRow {
    cashier: &'static str,
    item_count: i64,
    total: Decimal,
    date: NaiveDate,
}

/// Range aggregates mirroring the report summary query
fn aggregate(rows: &[SaleRow]) -> (i64, Decimal, i64) {
    let sale_count = rows.len() as i64;
    let total_revenue = rows.iter().map(|r| r.total).sum();
    let total_items = rows.iter().map(|r| r.item_count).sum();
    (sale_count, total_revenue, total_items)
}

/// Filter rows by date range and optional cashier
fn filter_rows<'a>(
    rows: &'a [SaleRow],
    from: NaiveDate,
    to: NaiveDate,
    cashier: Option<&str>,
) -> Vec<&'a SaleRow> {
    rows.iter()
        .filter(|r| r.date >= from && r.date <= to)
        .filter(|r| cashier.map(|c| r.cashier == c).unwrap_or(true))
        .collect()
}

/// Flat CSV row shape used by the export endpoint
#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    cashier: &'a str,
    item_count: i64,
    total: String,
}

fn to_csv(rows: &[SaleRow]) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(CsvRow {
            date: row.date.format("%Y-%m-%d").to_string(),
            cashier: row.cashier,
            item_count: row.item_count,
            total: row.total.to_string(),
        })
        .unwrap();
    }
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

fn sample_rows() -> Vec<SaleRow> {
    vec![
        SaleRow {
            cashier: "Dewi",
            item_count: 4,
            total: dec("84000"),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        },
        SaleRow {
            cashier: "Rudi",
            item_count: 1,
            total: dec("15000"),
            date: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
        },
        SaleRow {
            cashier: "Dewi",
            item_count: 7,
            total: dec("230500"),
            date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
        },
        SaleRow {
            cashier: "Dewi",
            item_count: 2,
            total: dec("30000"),
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        },
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_aggregate_totals() {
        let rows = sample_rows();
        let (count, revenue, items) = aggregate(&rows);

        assert_eq!(count, 4);
        assert_eq!(revenue, dec("359500"));
        assert_eq!(items, 14);
    }

    #[test]
    fn test_date_range_filter() {
        let rows = sample_rows();
        let july = filter_rows(
            &rows,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            None,
        );
        assert_eq!(july.len(), 3);
    }

    #[test]
    fn test_cashier_filter() {
        let rows = sample_rows();
        let dewi = filter_rows(
            &rows,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            Some("Dewi"),
        );
        assert_eq!(dewi.len(), 3);
        assert!(dewi.iter().all(|r| r.cashier == "Dewi"));
    }

    #[test]
    fn test_empty_range_aggregates_to_zero() {
        let rows = sample_rows();
        let none = filter_rows(
            &rows,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            None,
        );
        let owned: Vec<SaleRow> = none.into_iter().cloned().collect();
        let (count, revenue, items) = aggregate(&owned);

        assert_eq!(count, 0);
        assert_eq!(revenue, Decimal::ZERO);
        assert_eq!(items, 0);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let csv = to_csv(&sample_rows());
        let lines: Vec<&str> = csv.trim().lines().collect();

        // header + one line per sale
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "date,cashier,item_count,total");
        assert!(lines[1].starts_with("2025-07-01,Dewi,4,84000"));
    }

    #[test]
    fn test_csv_empty_input() {
        let csv = to_csv(&[]);
        assert!(csv.trim().is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn row_strategy() -> impl Strategy<Value = SaleRow> {
        (
            0usize..3,
            1i64..50,
            1i64..1_000_000,
            0u32..28,
        )
            .prop_map(|(cashier_idx, items, total, day)| SaleRow {
                cashier: ["Dewi", "Rudi", "Sari"][cashier_idx],
                item_count: items,
                total: Decimal::from(total),
                date: NaiveDate::from_ymd_opt(2025, 7, day + 1).unwrap(),
            })
    }

    proptest! {
        /// Revenue is the exact sum of row totals
        #[test]
        fn prop_revenue_is_sum(rows in prop::collection::vec(row_strategy(), 0..30)) {
            let (count, revenue, _) = aggregate(&rows);
            let expected: Decimal = rows.iter().map(|r| r.total).sum();

            prop_assert_eq!(count, rows.len() as i64);
            prop_assert_eq!(revenue, expected);
        }

        /// Filtering by each cashier partitions the rows
        #[test]
        fn prop_cashier_filter_partitions(rows in prop::collection::vec(row_strategy(), 0..30)) {
            let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let to = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

            let per_cashier: usize = ["Dewi", "Rudi", "Sari"]
                .iter()
                .map(|c| filter_rows(&rows, from, to, Some(c)).len())
                .sum();

            prop_assert_eq!(per_cashier, rows.len());
        }

        /// CSV emits exactly one line per row plus a header
        #[test]
        fn prop_csv_line_count(rows in prop::collection::vec(row_strategy(), 1..30)) {
            let csv = to_csv(&rows);
            prop_assert_eq!(csv.trim().lines().count(), rows.len() + 1);
        }
    }
}
