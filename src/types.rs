//! Common types shared by the dashboard pipeline.
//!
//! Records arriving from the `/transactions`, `/wallet` and `/user` endpoints
//! deserialize into these types. Fields the dashboard does not understand are
//! kept in an `extra` map so they survive a round trip untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A raw transaction record as returned by the transactions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unsigned magnitude; the sign is derived from `transaction_type`.
    pub amount: Decimal,

    /// Deposit or withdrawal.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Settlement status, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,

    /// Calendar day in `YYYY-MM-DD` form, kept verbatim.
    pub date: String,

    /// Opaque identifier, unique when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    /// Free-form details about the counterparty and product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Create a transaction with no status, reference or metadata.
    pub fn new(amount: Decimal, transaction_type: TransactionType, date: impl Into<String>) -> Self {
        Self {
            amount,
            transaction_type,
            status: None,
            date: date.into(),
            payment_reference: None,
            metadata: None,
            extra: Map::new(),
        }
    }

    /// Amount signed by direction: deposits positive, everything else negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Deposit => self.amount,
            TransactionType::Withdrawal | TransactionType::Unknown => -self.amount,
        }
    }
}

/// Optional transaction details. Every field is untrusted free text.
///
/// A known key holding a value of the wrong shape (say, a numeric `name`)
/// is left in `extra` instead of failing the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// Counterparty name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Sub-category such as `coffee_purchase`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Product purchased, preferred over `kind` for titles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::deserialize(deserializer)?;

        Ok(Metadata {
            name: take_string(&mut fields, "name"),
            kind: take_string(&mut fields, "type"),
            email: take_string(&mut fields, "email"),
            quantity: take_decimal(&mut fields, "quantity"),
            country: take_string(&mut fields, "country"),
            product_name: take_string(&mut fields, "product_name"),
            extra: fields,
        })
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            fields.insert(key.to_string(), other);
            None
        }
    }
}

fn take_decimal(fields: &mut Map<String, Value>, key: &str) -> Option<Decimal> {
    let parsed = match fields.get(key)? {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };
    if parsed.is_some() || fields.get(key) == Some(&Value::Null) {
        fields.remove(key);
    }
    parsed
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in.
    Deposit,
    /// Money going out.
    Withdrawal,
    /// Any other wire value; treated as money going out.
    #[serde(other)]
    Unknown,
}

impl TransactionType {
    /// Wire name, as used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Unknown => "unknown",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Unknown => "Unknown",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            _ => Err(Error::InvalidType(s.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Successful,
    Pending,
    Failed,
    /// Any other wire value.
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// All statuses, in the order the filter UI lists them.
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Successful,
        TransactionStatus::Pending,
        TransactionStatus::Failed,
    ];

    /// Wire name, as used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Successful => "successful",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Unknown => "unknown",
        }
    }

    /// Capitalized label, e.g. `Pending`.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Successful => "Successful",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Unknown => "Unknown",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "successful" => Ok(TransactionStatus::Successful),
            "pending" => Ok(TransactionStatus::Pending),
            "failed" => Ok(TransactionStatus::Failed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display classification of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    /// Derived from a deposit.
    Credit,
    /// Derived from anything other than a deposit.
    Debit,
}

impl DisplayType {
    /// Capitalized label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayType::Credit => "Credit",
            DisplayType::Debit => "Debit",
        }
    }
}

impl From<TransactionType> for DisplayType {
    fn from(transaction_type: TransactionType) -> Self {
        match transaction_type {
            TransactionType::Deposit => DisplayType::Credit,
            TransactionType::Withdrawal | TransactionType::Unknown => DisplayType::Debit,
        }
    }
}

/// A transaction enriched with the attributes a table row needs.
///
/// Always derived from a [`Transaction`]; never cached between renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTransaction {
    /// The source record, unchanged.
    #[serde(flatten)]
    pub transaction: Transaction,

    #[serde(rename = "displayType")]
    pub display_type: DisplayType,

    /// Primary row label.
    pub title: String,

    /// Counterparty name, or empty.
    pub author: String,
}

/// One point of the net cash-flow series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    /// Bucket key, the original date string.
    pub date: String,

    /// Deposits minus withdrawals on `date`.
    pub amount: Decimal,

    /// Axis label, e.g. `Jan 15, 2024`.
    #[serde(rename = "formattedDate")]
    pub formatted_date: String,
}

/// Balances returned by the wallet endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: Decimal,
    pub total_payout: Decimal,
    pub total_revenue: Decimal,
    pub pending_payout: Decimal,
    pub ledger_balance: Decimal,

    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Profile returned by the user endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,

    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
