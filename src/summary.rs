//! Balance panel and profile badge helpers.

use crate::format::format_currency;
use crate::types::{User, Wallet};

/// A labelled, pre-formatted amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceItem {
    pub label: &'static str,
    pub value: String,
}

/// Headline figure of the balance panel.
pub fn available_balance(wallet: &Wallet) -> BalanceItem {
    BalanceItem {
        label: "Available Balance",
        value: format_currency(wallet.balance),
    }
}

/// The side-panel figures, in display order.
pub fn balance_items(wallet: &Wallet) -> Vec<BalanceItem> {
    [
        ("Ledger Balance", wallet.ledger_balance),
        ("Total Payout", wallet.total_payout),
        ("Total Revenue", wallet.total_revenue),
        ("Pending Payout", wallet.pending_payout),
    ]
    .into_iter()
    .map(|(label, amount)| BalanceItem {
        label,
        value: format_currency(amount),
    })
    .collect()
}

/// Upper-cased initials, e.g. `OJ` for Olivier Jones.
pub fn user_initials(user: &User) -> String {
    user.first_name
        .chars()
        .next()
        .into_iter()
        .chain(user.last_name.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
