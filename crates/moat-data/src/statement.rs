//! Financial statement data model.
//!
//! A [`StatementTable`] maps a row label (e.g. "Total Revenue") to a
//! per-period series of values. A value of `None` means the provider knows the
//! period but reported nothing for that line item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Values of one statement row, keyed by period end date.
pub type RowValues = BTreeMap<NaiveDate, Option<f64>>;

/// Reporting frequency of a statement request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Fiscal-year statements (10-K)
    #[default]
    Annual,
    /// Fiscal-quarter statements (10-Q)
    Quarterly,
}

impl Frequency {
    /// Prefix Yahoo uses in front of timeseries type names.
    pub const fn yahoo_prefix(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }

    /// Short form used in cache keys.
    pub const fn to_db_str(&self) -> &'static str {
        match self {
            Self::Annual => "A",
            Self::Quarterly => "Q",
        }
    }
}

/// The three statements a company files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement
    Income,
    /// Balance sheet
    BalanceSheet,
    /// Cash-flow statement
    CashFlow,
}

impl StatementKind {
    /// Human-readable statement name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Income => "income statement",
            Self::BalanceSheet => "balance sheet",
            Self::CashFlow => "cash-flow statement",
        }
    }

    /// Short form used in cache keys.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::BalanceSheet => "balance",
            Self::CashFlow => "cashflow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One financial statement: row label -> period -> value.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTable {
    kind: StatementKind,
    rows: BTreeMap<String, RowValues>,
}

impl StatementTable {
    /// Create an empty statement.
    pub const fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            rows: BTreeMap::new(),
        }
    }

    /// Which statement this is.
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Set the value of `row` for `period`, creating the row if needed.
    pub fn insert(&mut self, row: impl Into<String>, period: NaiveDate, value: Option<f64>) {
        self.rows.entry(row.into()).or_default().insert(period, value);
    }

    /// Builder form of [`insert`](Self::insert) for a whole row.
    pub fn with_row<I>(mut self, row: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let entry = self.rows.entry(row.to_string()).or_default();
        entry.extend(values);
        self
    }

    /// Look up a row by label.
    pub fn row(&self, name: &str) -> Option<&RowValues> {
        self.rows.get(name)
    }

    /// Whether a row with this label exists.
    pub fn contains_row(&self, name: &str) -> bool {
        self.rows.contains_key(name)
    }

    /// Row labels in sorted order.
    pub fn row_names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// All periods that appear in any row, ascending.
    pub fn periods(&self) -> BTreeSet<NaiveDate> {
        self.rows
            .values()
            .flat_map(|values| values.keys().copied())
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the statement has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Give every row an explicit entry for every period of the statement.
    ///
    /// Rows that lack a period get a `None` value, so all rows share the same
    /// period index.
    pub fn pad_periods(&mut self) {
        let periods = self.periods();
        for values in self.rows.values_mut() {
            for period in &periods {
                values.entry(*period).or_insert(None);
            }
        }
    }
}

/// Point-in-time figures not tied to a statement period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoSnapshot {
    /// Trailing-twelve-month diluted EPS
    pub trailing_eps: Option<f64>,
    /// Trailing price-to-earnings ratio
    pub trailing_pe: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = StatementTable::new(StatementKind::Income);
        table.insert("Total Revenue", date(2023, 6, 30), Some(211.9));
        table.insert("Total Revenue", date(2022, 6, 30), Some(198.3));

        let row = table.row("Total Revenue").unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(&date(2023, 6, 30)), Some(&Some(211.9)));
        assert!(table.row("Net Income").is_none());
        assert_eq!(table.kind(), StatementKind::Income);
    }

    #[test]
    fn test_periods_are_sorted_union() {
        let table = StatementTable::new(StatementKind::BalanceSheet)
            .with_row("Invested Capital", [(date(2023, 6, 30), Some(1.0))])
            .with_row(
                "Common Stock Equity",
                [(date(2021, 6, 30), Some(2.0)), (date(2022, 6, 30), None)],
            );

        let periods: Vec<_> = table.periods().into_iter().collect();
        assert_eq!(
            periods,
            vec![date(2021, 6, 30), date(2022, 6, 30), date(2023, 6, 30)]
        );
    }

    #[test]
    fn test_pad_periods() {
        let mut table = StatementTable::new(StatementKind::CashFlow)
            .with_row("Free Cash Flow", [(date(2023, 6, 30), Some(59.5))])
            .with_row("Operating Cash Flow", [(date(2022, 6, 30), Some(89.0))]);

        table.pad_periods();

        let fcf = table.row("Free Cash Flow").unwrap();
        assert_eq!(fcf.len(), 2);
        assert_eq!(fcf.get(&date(2022, 6, 30)), Some(&None));
    }

    #[test]
    fn test_frequency_strings() {
        assert_eq!(Frequency::Annual.yahoo_prefix(), "annual");
        assert_eq!(Frequency::Quarterly.yahoo_prefix(), "quarterly");
        assert_eq!(Frequency::default(), Frequency::Annual);
        assert_eq!(Frequency::Quarterly.to_db_str(), "Q");
    }
}
