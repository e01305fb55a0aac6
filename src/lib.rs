//! Revenue Dashboard Library
//!
//! The data pipeline behind a revenue dashboard: transaction records from
//! the `/transactions` endpoint are filtered, turned into table rows,
//! aggregated into a daily net cash-flow series and exported as CSV.
//!
//! # Pipeline
//!
//! - [`filter::filter_transactions`]: date range or relative period, type
//!   and status predicates
//! - [`transform::transform_transactions`]: credit/debit classification,
//!   titles and counterparty labels
//! - [`chart::prepare_chart_data`]: one signed point per day, oldest first
//! - [`csv_format::export_transactions_to_csv`]: CSV document handed to a
//!   [`download::DownloadSink`]
//!
//! # Examples
//!
//! ```
//! use revenue_dashboard::filter::{filter_transactions, FilterState, FixedClock, Period};
//! use revenue_dashboard::transform::transform_transactions;
//! use revenue_dashboard::csv_format::transactions_to_csv;
//! use revenue_dashboard::Transaction;
//!
//! let json = r#"[
//!     {"amount": 50000, "type": "deposit", "status": "successful", "date": "2024-01-15",
//!      "payment_reference": "TXN-001", "metadata": {"name": "John Doe", "product_name": "Coffee"}},
//!     {"amount": 20000, "type": "withdrawal", "status": "pending", "date": "2024-01-02"}
//! ]"#;
//! let transactions: Vec<Transaction> = serde_json::from_str(json)?;
//!
//! let clock = FixedClock(chrono::NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
//! let state = FilterState::new().with_period(Period::Last7Days);
//! let kept: Vec<Transaction> = filter_transactions(&transactions, &state, &clock)
//!     .into_iter()
//!     .cloned()
//!     .collect();
//!
//! let csv = transactions_to_csv(&transform_transactions(&kept))?;
//! assert_eq!(csv.lines().count(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chart;
pub mod csv_format;
pub mod download;
pub mod error;
pub mod filter;
pub mod format;
pub mod summary;
pub mod transform;
pub mod types;

use std::io::Read;

use serde::de::DeserializeOwned;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{
    ChartDataPoint, DisplayTransaction, DisplayType, Metadata, Transaction, TransactionStatus,
    TransactionType, User, Wallet,
};

/// Read one JSON payload, as served by the dashboard's endpoints.
///
/// # Examples
///
/// ```
/// use revenue_dashboard::{read_json, Transaction};
///
/// let mut body = "[]".as_bytes();
/// let transactions: Vec<Transaction> = read_json(&mut body)?;
/// assert!(transactions.is_empty());
/// # Ok::<(), revenue_dashboard::Error>(())
/// ```
pub fn read_json<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read the transactions payload. `null` counts as "no data".
pub fn read_transactions<R: Read>(reader: &mut R) -> Result<Vec<Transaction>> {
    let transactions: Option<Vec<Transaction>> = read_json(reader)?;
    Ok(transactions.unwrap_or_default())
}
