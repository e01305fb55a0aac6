//! CSV export of the transactions table.
//!
//! [`transactions_to_csv`] renders display records into a CSV document and
//! [`export_transactions_to_csv`] hands that document to a
//! [`DownloadSink`] under a date-stamped file name.

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::{debug, info};
use serde::Serialize;

use crate::download::DownloadSink;
use crate::error::{Error, Result};
use crate::filter::Clock;
use crate::format::{format_currency, format_date, DateStyle};
use crate::types::{DisplayTransaction, DisplayType};

/// Header row of every export, in column order.
pub const CSV_HEADERS: [&str; 7] = [
    "Date",
    "Type",
    "Description",
    "Name/Status",
    "Amount",
    "Payment Reference",
    "Status",
];

/// MIME type handed to the download sink.
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

/// One exported row.
#[derive(Debug, Serialize)]
struct CsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: &'static str,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Name/Status")]
    name_or_status: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Payment Reference")]
    payment_reference: String,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl From<&DisplayTransaction> for CsvRecord {
    fn from(transaction: &DisplayTransaction) -> Self {
        let status = transaction.status_label();
        let name_or_status = match transaction.display_type {
            DisplayType::Debit if !status.is_empty() => status.to_string(),
            _ => transaction.author.clone(),
        };

        CsvRecord {
            date: format_date(&transaction.transaction.date, DateStyle::Table),
            kind: transaction.display_type.label(),
            description: transaction.title.clone(),
            name_or_status,
            amount: format_currency(transaction.transaction.amount),
            payment_reference: transaction
                .transaction
                .payment_reference
                .clone()
                .unwrap_or_default(),
            status,
        }
    }
}

/// Render display records as a CSV document.
///
/// The first line is always the header. Fields containing a comma, a
/// double quote or a `\n` are quoted with inner quotes doubled. A field
/// holding a bare `\r` is quoted as well; the output stays RFC 4180 valid
/// and spreadsheets read the carriage return back as part of the field.
/// Rows are joined by `\n` with no trailing line break, so an empty list
/// yields the header alone.
///
/// # Examples
///
/// ```
/// use revenue_dashboard::csv_format::transactions_to_csv;
///
/// let csv = transactions_to_csv(&[])?;
/// assert_eq!(csv, "Date,Type,Description,Name/Status,Amount,Payment Reference,Status");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn transactions_to_csv(transactions: &[DisplayTransaction]) -> Result<String> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    csv_writer.write_record(CSV_HEADERS)?;
    for transaction in transactions {
        csv_writer.serialize(CsvRecord::from(transaction))?;
    }
    csv_writer.flush()?;

    let bytes = csv_writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    let mut content = String::from_utf8(bytes)?;
    if content.ends_with('\n') {
        content.pop();
    }

    debug!("csv: rendered {} rows", transactions.len());
    Ok(content)
}

/// File name for an export made on `date`, e.g. `transactions-2024-01-20.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("transactions-{}.csv", date.format("%Y-%m-%d"))
}

/// Render `transactions` and hand the document to `sink`.
///
/// The file name is stamped with the clock's current day. Returns the name
/// used.
pub fn export_transactions_to_csv(
    transactions: &[DisplayTransaction],
    sink: &mut dyn DownloadSink,
    clock: &dyn Clock,
) -> Result<String> {
    let content = transactions_to_csv(transactions)?;
    let filename = export_filename(clock.today());

    sink.download(&content, &filename, CSV_MIME_TYPE)?;

    info!("csv: exported {} transactions to {}", transactions.len(), filename);
    Ok(filename)
}
