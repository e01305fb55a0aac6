//! Mapping of raw transactions to table-ready display records.

use crate::format::capitalize;
use crate::types::{DisplayTransaction, DisplayType, Transaction, TransactionStatus};

/// Title shown for every withdrawal.
pub const WITHDRAWAL_TITLE: &str = "Cash withdrawal";

/// Styling hint for a row's secondary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTone {
    /// Settled debit.
    Success,
    /// Debit in any other state.
    Pending,
    /// Counterparty name.
    Muted,
}

/// Text shown under a row's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryLabel {
    pub text: String,
    pub tone: LabelTone,
}

/// Derive the display record for a single transaction.
pub fn transform_transaction(transaction: &Transaction) -> DisplayTransaction {
    let display_type = DisplayType::from(transaction.transaction_type);
    let metadata = transaction.metadata.as_ref();

    let title = match display_type {
        DisplayType::Credit => metadata
            .and_then(|m| non_empty(m.product_name.as_deref()))
            .map(str::to_string)
            .or_else(|| metadata.and_then(|m| non_empty(m.kind.as_deref())).map(humanize))
            .unwrap_or_default(),
        DisplayType::Debit => WITHDRAWAL_TITLE.to_string(),
    };

    let author = metadata
        .and_then(|m| m.name.clone())
        .unwrap_or_default();

    DisplayTransaction {
        transaction: transaction.clone(),
        display_type,
        title,
        author,
    }
}

/// Derive display records for a list, keeping its order.
pub fn transform_transactions(transactions: &[Transaction]) -> Vec<DisplayTransaction> {
    transactions.iter().map(transform_transaction).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `subscription_payment` becomes `Subscription payment`.
fn humanize(kind: &str) -> String {
    capitalize(&kind.trim().replace('_', " "))
}

impl DisplayTransaction {
    /// The row's status label, e.g. `Pending`, or an empty string.
    pub fn status_label(&self) -> &'static str {
        self.transaction.status.map(|s| s.label()).unwrap_or("")
    }

    /// Label shown under the title: the status for debits that carry one,
    /// the author otherwise.
    pub fn secondary_label(&self) -> SecondaryLabel {
        match (self.display_type, self.transaction.status) {
            (DisplayType::Debit, Some(status)) => SecondaryLabel {
                text: status.label().to_string(),
                tone: if status == TransactionStatus::Successful {
                    LabelTone::Success
                } else {
                    LabelTone::Pending
                },
            },
            _ => SecondaryLabel {
                text: self.author.clone(),
                tone: LabelTone::Muted,
            },
        }
    }

    /// Stable key for the row at `index`.
    pub fn row_key(&self, index: usize) -> String {
        match self.transaction.payment_reference.as_deref() {
            Some(reference) if !reference.is_empty() => reference.to_string(),
            _ => index.to_string(),
        }
    }
}
