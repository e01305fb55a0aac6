//! Net cash-flow series for the revenue chart.

use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;

use crate::format::{format_naive_date, parse_iso_date, DateStyle, INVALID_DATE};
use crate::types::{ChartDataPoint, Transaction};

/// Bucket transactions by date into one signed net amount per day.
///
/// Dates are grouped by exact string equality. Points come out in ascending
/// calendar order; dates that cannot be parsed sort last, in first-seen
/// order, labelled [`INVALID_DATE`].
pub fn prepare_chart_data(transactions: &[Transaction]) -> Vec<ChartDataPoint> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Decimal> = HashMap::new();

    for transaction in transactions {
        let date = transaction.date.as_str();
        let total = totals.entry(date).or_insert_with(|| {
            order.push(date);
            Decimal::ZERO
        });
        *total += transaction.signed_amount();
    }

    let mut points: Vec<(Option<chrono::NaiveDate>, ChartDataPoint)> = order
        .into_iter()
        .map(|date| {
            let parsed = parse_iso_date(date).ok();
            let formatted_date = parsed
                .map(|d| format_naive_date(d, DateStyle::Chart))
                .unwrap_or_else(|| INVALID_DATE.to_string());
            let point = ChartDataPoint {
                date: date.to_string(),
                amount: totals[date],
                formatted_date,
            };
            (parsed, point)
        })
        .collect();

    // Stable sort: None sorts after every Some.
    points.sort_by_key(|(parsed, _)| (parsed.is_none(), *parsed));

    debug!(
        "chart: {} transactions aggregated into {} points",
        transactions.len(),
        points.len()
    );

    points.into_iter().map(|(_, point)| point).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use pretty_assertions::assert_eq;

    fn tx(amount: i64, transaction_type: TransactionType, date: &str) -> Transaction {
        Transaction::new(Decimal::from(amount), transaction_type, date)
    }

    #[test]
    fn test_aggregates_by_date() {
        let transactions = vec![
            tx(50000, TransactionType::Deposit, "2024-01-15"),
            tx(30000, TransactionType::Deposit, "2024-01-15"),
            tx(20000, TransactionType::Withdrawal, "2024-01-16"),
        ];

        let result = prepare_chart_data(&transactions);

        assert_eq!(
            result,
            vec![
                ChartDataPoint {
                    date: "2024-01-15".into(),
                    amount: Decimal::from(80000),
                    formatted_date: "Jan 15, 2024".into(),
                },
                ChartDataPoint {
                    date: "2024-01-16".into(),
                    amount: Decimal::from(-20000),
                    formatted_date: "Jan 16, 2024".into(),
                },
            ]
        );
    }

    #[test]
    fn test_sorts_chronologically() {
        let transactions = vec![
            tx(20000, TransactionType::Withdrawal, "2024-01-16"),
            tx(50000, TransactionType::Deposit, "2024-01-20"),
            tx(30000, TransactionType::Deposit, "2023-12-31"),
            tx(50000, TransactionType::Deposit, "2024-01-15"),
        ];

        let dates: Vec<String> = prepare_chart_data(&transactions)
            .into_iter()
            .map(|p| p.date)
            .collect();

        assert_eq!(dates, vec!["2023-12-31", "2024-01-15", "2024-01-16", "2024-01-20"]);
    }

    #[test]
    fn test_net_can_be_zero_or_negative() {
        let transactions = vec![
            tx(100, TransactionType::Deposit, "2024-01-15"),
            tx(100, TransactionType::Withdrawal, "2024-01-15"),
            tx(100000, TransactionType::Withdrawal, "2024-01-17"),
        ];

        let result = prepare_chart_data(&transactions);

        assert_eq!(result[0].amount, Decimal::ZERO);
        assert_eq!(result[1].amount, Decimal::from(-100000));
    }

    #[test]
    fn test_invalid_dates_sort_last() {
        let transactions = vec![
            tx(5, TransactionType::Deposit, "garbage"),
            tx(10, TransactionType::Deposit, "2024-01-15"),
        ];

        let result = prepare_chart_data(&transactions);

        assert_eq!(result[0].date, "2024-01-15");
        assert_eq!(result[1].date, "garbage");
        assert_eq!(result[1].formatted_date, INVALID_DATE);
    }

    #[test]
    fn test_empty_input() {
        assert!(prepare_chart_data(&[]).is_empty());
    }
}
