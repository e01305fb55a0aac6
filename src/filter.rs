//! Filter engine for the transactions table.
//!
//! A [`FilterState`] combines an explicit date range or a named relative
//! [`Period`] with type and status sets. [`filter_transactions`] applies it
//! as an AND-chain and returns borrowed references into the input, in input
//! order, so the result is always a subset of what was passed in.
//!
//! Relative periods are anchored on a [`Clock`], which tests replace with a
//! [`FixedClock`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use log::{debug, warn};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::format::parse_iso_date;
use crate::types::{Transaction, TransactionStatus, TransactionType};

/// Source of the reference "today" for relative periods.
pub trait Clock {
    /// The current local calendar day.
    fn today(&self) -> NaiveDate;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Named, now-anchored date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "Last 7 days")]
    Last7Days,
    #[serde(rename = "This month")]
    ThisMonth,
    #[serde(rename = "Last 3 months")]
    Last3Months,
}

impl Period {
    /// All periods, in the order the filter sheet offers them.
    pub const ALL: [Period; 4] = [
        Period::Today,
        Period::Last7Days,
        Period::ThisMonth,
        Period::Last3Months,
    ];

    /// Label shown on the period button.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Last7Days => "Last 7 days",
            Period::ThisMonth => "This month",
            Period::Last3Months => "Last 3 months",
        }
    }

    /// Inclusive window of days covered by this period relative to `today`.
    pub fn window(&self, today: NaiveDate) -> DateWindow {
        let first_of_month =
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        match self {
            Period::Today => DateWindow::new(today, today),
            Period::Last7Days => DateWindow::new(
                today.checked_sub_days(Days::new(6)).unwrap_or(NaiveDate::MIN),
                today,
            ),
            Period::ThisMonth => DateWindow::new(
                first_of_month,
                first_of_month
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX),
            ),
            Period::Last3Months => DateWindow::new(
                first_of_month
                    .checked_sub_months(Months::new(2))
                    .unwrap_or(NaiveDate::MIN),
                today,
            ),
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "today" => Ok(Period::Today),
            "last 7 days" => Ok(Period::Last7Days),
            "this month" => Ok(Period::ThisMonth),
            "last 3 months" => Ok(Period::Last3Months),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Filter selections held by the transactions view.
///
/// Empty sets and unset bounds match everything, so the default state is
/// the identity filter. When deserializing, a blank `startDate`, `endDate`
/// or `selectedPeriod` string counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Inclusive lower bound.
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound.
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: Option<NaiveDate>,
    /// Only consulted while neither bound is set.
    #[serde(deserialize_with = "deserialize_period")]
    pub selected_period: Option<Period>,
    pub transaction_types: HashSet<TransactionType>,
    pub transaction_statuses: HashSet<TransactionStatus>,
}

impl FilterState {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.selected_period = Some(period);
        self
    }

    #[must_use]
    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_types.insert(transaction_type);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.transaction_statuses.insert(status);
        self
    }

    /// Select a named period, clearing any explicit range.
    pub fn select_period(&mut self, period: Period) {
        self.selected_period = Some(period);
        self.start_date = None;
        self.end_date = None;
    }

    /// Set explicit bounds, clearing any named period.
    pub fn select_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start_date = start;
        self.end_date = end;
        self.selected_period = None;
    }

    /// Reset every selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when either explicit bound is set.
    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Returns true if the filter is empty (matches everything).
    pub fn is_empty(&self) -> bool {
        !self.has_date_range()
            && self.selected_period.is_none()
            && self.transaction_types.is_empty()
            && self.transaction_statuses.is_empty()
    }
}

fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    non_blank(deserializer)?
        .map(|s| parse_iso_date(&s))
        .transpose()
        .map_err(de::Error::custom)
}

fn deserialize_period<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Period>, D::Error> {
    non_blank(deserializer)?
        .map(|s| s.parse::<Period>())
        .transpose()
        .map_err(de::Error::custom)
}

/// Apply `state` to `transactions`, keeping input order.
///
/// The named period only applies when no explicit bound is set. Records
/// whose date cannot be parsed are dropped while any date predicate is
/// active and kept otherwise.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    state: &FilterState,
    clock: &dyn Clock,
) -> Vec<&'a Transaction> {
    if state.has_date_range() && state.selected_period.is_some() {
        warn!(
            "filter: explicit date range overrides selected period '{}'",
            state.selected_period.map(|p| p.label()).unwrap_or_default()
        );
    }

    let window = match state.selected_period {
        Some(period) if !state.has_date_range() => Some(period.window(clock.today())),
        _ => None,
    };
    let filters_by_date = state.has_date_range() || window.is_some();

    let matches = |transaction: &Transaction| -> bool {
        if !state.transaction_types.is_empty()
            && !state.transaction_types.contains(&transaction.transaction_type)
        {
            return false;
        }

        if !state.transaction_statuses.is_empty() {
            match transaction.status {
                Some(status) if state.transaction_statuses.contains(&status) => {}
                _ => return false,
            }
        }

        if filters_by_date {
            let date = match parse_iso_date(&transaction.date) {
                Ok(date) => date,
                Err(err) => {
                    warn!("filter: excluding record: {}", err);
                    return false;
                }
            };
            if state.start_date.is_some_and(|start| date < start) {
                return false;
            }
            if state.end_date.is_some_and(|end| date > end) {
                return false;
            }
            if window.is_some_and(|w| !w.contains(date)) {
                return false;
            }
        }

        true
    };

    let filtered: Vec<&Transaction> = transactions.iter().filter(|t| matches(*t)).collect();

    debug!(
        "filter: {} of {} transactions kept",
        filtered.len(),
        transactions.len()
    );

    filtered
}

/// One selectable value in a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption<T> {
    pub value: T,
    pub label: String,
}

/// Distinct transaction types present in `transactions`, first-seen order.
pub fn transaction_type_options(transactions: &[Transaction]) -> Vec<FilterOption<TransactionType>> {
    let mut seen = HashSet::new();
    transactions
        .iter()
        .map(|t| t.transaction_type)
        .filter(|transaction_type| seen.insert(*transaction_type))
        .map(|value| FilterOption {
            value,
            label: value.label().to_string(),
        })
        .collect()
}

/// Every status the filter sheet offers.
pub fn transaction_status_options() -> Vec<FilterOption<TransactionStatus>> {
    TransactionStatus::ALL
        .iter()
        .map(|&value| FilterOption {
            value,
            label: value.label().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(date("2024-01-20"))
    }

    fn tx(
        transaction_type: TransactionType,
        status: Option<TransactionStatus>,
        on: &str,
    ) -> Transaction {
        let mut t = Transaction::new(Decimal::from(1000), transaction_type, on);
        t.status = status;
        t
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(TransactionType::Deposit, Some(TransactionStatus::Successful), "2023-11-01"),
            tx(TransactionType::Deposit, Some(TransactionStatus::Successful), "2023-10-31"),
            tx(TransactionType::Withdrawal, Some(TransactionStatus::Pending), "2024-01-14"),
            tx(TransactionType::Deposit, Some(TransactionStatus::Failed), "2024-01-13"),
            tx(TransactionType::Withdrawal, None, "2024-01-20"),
            tx(TransactionType::Deposit, Some(TransactionStatus::Pending), "2024-01-31"),
        ]
    }

    fn dates(filtered: &[&Transaction]) -> Vec<String> {
        filtered.iter().map(|t| t.date.clone()).collect()
    }

    #[test]
    fn test_empty_state_is_identity() {
        let transactions = sample();

        let filtered = filter_transactions(&transactions, &FilterState::new(), &clock());

        assert_eq!(filtered.len(), transactions.len());
        for (kept, original) in filtered.iter().zip(transactions.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_empty_input() {
        let state = FilterState::new()
            .with_period(Period::Today)
            .with_type(TransactionType::Deposit);
        assert!(filter_transactions(&[], &state, &clock()).is_empty());
    }

    #[test]
    fn test_explicit_range_is_inclusive() {
        let transactions = sample();
        let state = FilterState::new()
            .with_start_date(date("2023-11-01"))
            .with_end_date(date("2024-01-14"));

        let filtered = filter_transactions(&transactions, &state, &clock());

        assert_eq!(dates(&filtered), vec!["2023-11-01", "2024-01-14", "2024-01-13"]);
    }

    #[test]
    fn test_open_ended_ranges() {
        let transactions = sample();

        let from = FilterState::new().with_start_date(date("2024-01-14"));
        assert_eq!(
            dates(&filter_transactions(&transactions, &from, &clock())),
            vec!["2024-01-14", "2024-01-20", "2024-01-31"]
        );

        let until = FilterState::new().with_end_date(date("2023-11-01"));
        assert_eq!(
            dates(&filter_transactions(&transactions, &until, &clock())),
            vec!["2023-11-01", "2023-10-31"]
        );
    }

    #[test]
    fn test_last_7_days_includes_boundary() {
        let transactions = sample();
        let state = FilterState::new().with_period(Period::Last7Days);

        let filtered = filter_transactions(&transactions, &state, &clock());

        assert_eq!(dates(&filtered), vec!["2024-01-14", "2024-01-20"]);
    }

    #[test]
    fn test_this_month() {
        let transactions = sample();
        let state = FilterState::new().with_period(Period::ThisMonth);

        let filtered = filter_transactions(&transactions, &state, &clock());

        assert_eq!(
            dates(&filtered),
            vec!["2024-01-14", "2024-01-13", "2024-01-20", "2024-01-31"]
        );
    }

    #[test]
    fn test_today() {
        let transactions = sample();
        let state = FilterState::new().with_period(Period::Today);

        let filtered = filter_transactions(&transactions, &state, &clock());

        assert_eq!(dates(&filtered), vec!["2024-01-20"]);
    }

    #[test]
    fn test_last_3_months_starts_on_first_of_month() {
        let transactions = sample();
        let state = FilterState::new().with_period(Period::Last3Months);

        let filtered = filter_transactions(&transactions, &state, &clock());

        assert_eq!(
            dates(&filtered),
            vec!["2023-11-01", "2024-01-14", "2024-01-13", "2024-01-20"]
        );
    }

    #[test]
    fn test_period_windows() {
        let today = date("2024-03-31");
        assert_eq!(
            Period::Last3Months.window(today),
            DateWindow::new(date("2024-01-01"), today)
        );
        assert_eq!(
            Period::ThisMonth.window(date("2024-02-10")),
            DateWindow::new(date("2024-02-01"), date("2024-02-29"))
        );
        assert_eq!(
            Period::Last7Days.window(date("2024-03-03")),
            DateWindow::new(date("2024-02-26"), date("2024-03-03"))
        );
        assert_eq!(
            Period::Last3Months.window(date("2024-02-15")).start,
            date("2023-12-01")
        );
    }

    #[test]
    fn test_explicit_range_overrides_period() {
        let transactions = sample();
        let state = FilterState::new()
            .with_period(Period::Today)
            .with_end_date(date("2023-11-01"));

        let filtered = filter_transactions(&transactions, &state, &clock());

        assert_eq!(dates(&filtered), vec!["2023-11-01", "2023-10-31"]);
    }

    #[test]
    fn test_type_and_status_sets() {
        let transactions = sample();

        let deposits = FilterState::new().with_type(TransactionType::Deposit);
        let kept = filter_transactions(&transactions, &deposits, &clock());
        assert_eq!(kept.len(), 4);
        // Borrowed straight from the input, in input order.
        let expected = [&transactions[0], &transactions[1], &transactions[3], &transactions[5]];
        for (row, original) in kept.iter().zip(expected) {
            assert!(std::ptr::eq(*row, original));
        }

        let pending_or_failed = FilterState::new()
            .with_status(TransactionStatus::Pending)
            .with_status(TransactionStatus::Failed);
        assert_eq!(
            dates(&filter_transactions(&transactions, &pending_or_failed, &clock())),
            vec!["2024-01-14", "2024-01-13", "2024-01-31"]
        );

        let combined = FilterState::new()
            .with_type(TransactionType::Withdrawal)
            .with_status(TransactionStatus::Pending)
            .with_period(Period::ThisMonth);
        assert_eq!(
            dates(&filter_transactions(&transactions, &combined, &clock())),
            vec!["2024-01-14"]
        );
    }

    #[test]
    fn test_unparseable_dates() {
        let transactions = vec![
            tx(TransactionType::Deposit, None, "garbage"),
            tx(TransactionType::Deposit, None, "2024-01-20"),
        ];

        let no_dates = FilterState::new().with_type(TransactionType::Deposit);
        assert_eq!(filter_transactions(&transactions, &no_dates, &clock()).len(), 2);

        let today = FilterState::new().with_period(Period::Today);
        assert_eq!(
            dates(&filter_transactions(&transactions, &today, &clock())),
            vec!["2024-01-20"]
        );
    }

    #[test]
    fn test_select_period_and_range_are_exclusive() {
        let mut state = FilterState::new().with_start_date(date("2024-01-01"));

        state.select_period(Period::ThisMonth);
        assert_eq!(state.start_date, None);
        assert_eq!(state.selected_period, Some(Period::ThisMonth));

        state.select_range(Some(date("2024-01-01")), None);
        assert_eq!(state.selected_period, None);
        assert!(state.has_date_range());

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("Last 7 days".parse::<Period>().unwrap(), Period::Last7Days);
        assert_eq!("last-3-months".parse::<Period>().unwrap(), Period::Last3Months);
        assert_eq!("this_month".parse::<Period>().unwrap(), Period::ThisMonth);
        assert!("yesterday".parse::<Period>().is_err());
        for period in Period::ALL {
            assert_eq!(period.label().parse::<Period>().unwrap(), period);
        }
    }

    #[test]
    fn test_filter_state_from_json() {
        let json = r#"{
            "startDate": "2024-01-01",
            "selectedPeriod": "Last 7 days",
            "transactionTypes": ["deposit"],
            "transactionStatuses": ["pending", "failed"]
        }"#;

        let state: FilterState = serde_json::from_str(json).unwrap();

        assert_eq!(state.start_date, Some(date("2024-01-01")));
        assert_eq!(state.end_date, None);
        assert_eq!(state.selected_period, Some(Period::Last7Days));
        assert!(state.transaction_types.contains(&TransactionType::Deposit));
        assert_eq!(state.transaction_statuses.len(), 2);
    }

    #[test]
    fn test_filter_state_blank_fields_are_unset() {
        let json = r#"{
            "startDate": "",
            "endDate": "  ",
            "selectedPeriod": "",
            "transactionTypes": [],
            "transactionStatuses": []
        }"#;

        let state: FilterState = serde_json::from_str(json).unwrap();
        assert_eq!(state, FilterState::new());

        let transactions = sample();
        let filtered = filter_transactions(&transactions, &state, &clock());
        assert_eq!(filtered.len(), transactions.len());

        let nulls: FilterState =
            serde_json::from_str(r#"{"startDate": null, "selectedPeriod": null}"#).unwrap();
        assert!(nulls.is_empty());

        assert!(serde_json::from_str::<FilterState>(r#"{"startDate": "soon"}"#).is_err());
        assert!(serde_json::from_str::<FilterState>(r#"{"selectedPeriod": "yesterday"}"#).is_err());
    }

    #[test]
    fn test_filter_state_json_round_trip() {
        let state = FilterState::new()
            .with_start_date(date("2024-01-01"))
            .with_period(Period::Last3Months);

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<FilterState>(&json).unwrap(), state);
    }

    #[test]
    fn test_filter_options() {
        let transactions = vec![
            tx(TransactionType::Withdrawal, None, "2024-01-01"),
            tx(TransactionType::Deposit, None, "2024-01-02"),
            tx(TransactionType::Withdrawal, None, "2024-01-03"),
        ];

        let types = transaction_type_options(&transactions);
        assert_eq!(
            types,
            vec![
                FilterOption { value: TransactionType::Withdrawal, label: "Withdrawal".into() },
                FilterOption { value: TransactionType::Deposit, label: "Deposit".into() },
            ]
        );

        let labels: Vec<String> = transaction_status_options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Successful", "Pending", "Failed"]);
    }
}
