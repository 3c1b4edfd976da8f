//! The fixed set of inputs a derivation needs, checked before any arithmetic.

use crate::error::{MetricsError, Result};
use chrono::NaiveDate;
use moat_data::{InfoSnapshot, StatementKind, StatementTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Where a required input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSource {
    /// A row of a financial statement
    Statement(StatementKind),
    /// A trailing snapshot figure
    Snapshot,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statement(kind) => write!(f, "{kind}"),
            Self::Snapshot => f.write_str("snapshot"),
        }
    }
}

/// A named input of the derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    /// Income statement "Operating Income"
    OperatingIncome,
    /// Income statement "Tax Provision"
    TaxProvision,
    /// Income statement "Total Revenue"
    TotalRevenue,
    /// Income statement "Diluted EPS"
    DilutedEps,
    /// Balance sheet "Invested Capital"
    InvestedCapital,
    /// Balance sheet "Common Stock Equity"
    CommonStockEquity,
    /// Cash-flow statement "Free Cash Flow"
    FreeCashFlow,
    /// Trailing-twelve-month EPS
    TrailingEps,
    /// Trailing P/E ratio
    TrailingPe,
}

impl RequiredField {
    /// Every required input, statement rows first.
    pub const ALL: [Self; 9] = [
        Self::OperatingIncome,
        Self::TaxProvision,
        Self::TotalRevenue,
        Self::DilutedEps,
        Self::InvestedCapital,
        Self::CommonStockEquity,
        Self::FreeCashFlow,
        Self::TrailingEps,
        Self::TrailingPe,
    ];

    /// Row label as it appears in the statement, or the snapshot figure name.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OperatingIncome => "Operating Income",
            Self::TaxProvision => "Tax Provision",
            Self::TotalRevenue => "Total Revenue",
            Self::DilutedEps => "Diluted EPS",
            Self::InvestedCapital => "Invested Capital",
            Self::CommonStockEquity => "Common Stock Equity",
            Self::FreeCashFlow => "Free Cash Flow",
            Self::TrailingEps => "Trailing EPS",
            Self::TrailingPe => "Trailing PE",
        }
    }

    /// Which input the field is read from.
    pub const fn source(&self) -> FieldSource {
        match self {
            Self::OperatingIncome | Self::TaxProvision | Self::TotalRevenue | Self::DilutedEps => {
                FieldSource::Statement(StatementKind::Income)
            }
            Self::InvestedCapital | Self::CommonStockEquity => {
                FieldSource::Statement(StatementKind::BalanceSheet)
            }
            Self::FreeCashFlow => FieldSource::Statement(StatementKind::CashFlow),
            Self::TrailingEps | Self::TrailingPe => FieldSource::Snapshot,
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.source())
    }
}

/// The required inputs aligned on a common ascending period index.
///
/// Every series has exactly one entry per period; `None` marks a period the
/// provider reported without a value.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredInputs {
    /// Period end dates, ascending
    pub periods: Vec<NaiveDate>,
    /// Operating income per period
    pub operating_income: Vec<Option<f64>>,
    /// Tax provision per period
    pub tax_provision: Vec<Option<f64>>,
    /// Total revenue per period
    pub total_revenue: Vec<Option<f64>>,
    /// Diluted EPS per period
    pub diluted_eps: Vec<Option<f64>>,
    /// Invested capital per period
    pub invested_capital: Vec<Option<f64>>,
    /// Common stock equity per period
    pub common_stock_equity: Vec<Option<f64>>,
    /// Free cash flow per period
    pub free_cash_flow: Vec<Option<f64>>,
    /// Trailing-twelve-month EPS
    pub trailing_eps: f64,
    /// Trailing P/E
    pub trailing_pe: f64,
}

impl RequiredInputs {
    /// Check and extract every [`RequiredField`].
    ///
    /// The period index is the set of periods of the income statement's
    /// "Total Revenue" row. Every other required row must carry an entry for
    /// each of those periods; periods found only in other rows are ignored.
    ///
    /// # Errors
    /// [`MetricsError::DataUnavailable`] naming the first missing row, period
    /// or snapshot figure.
    pub fn extract(
        income: &StatementTable,
        balance_sheet: &StatementTable,
        cash_flow: &StatementTable,
        snapshot: &InfoSnapshot,
    ) -> Result<Self> {
        let statement = |kind: StatementKind| match kind {
            StatementKind::Income => income,
            StatementKind::BalanceSheet => balance_sheet,
            StatementKind::CashFlow => cash_flow,
        };

        // Presence of every row and figure is checked before alignment
        for field in RequiredField::ALL {
            let present = match field.source() {
                FieldSource::Statement(kind) => statement(kind).contains_row(field.label()),
                FieldSource::Snapshot => snapshot_value(snapshot, field).is_some(),
            };
            if !present {
                return Err(MetricsError::DataUnavailable {
                    field,
                    period: None,
                });
            }
        }

        let periods: Vec<NaiveDate> = income
            .row(RequiredField::TotalRevenue.label())
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default();
        if periods.is_empty() {
            return Err(MetricsError::DataUnavailable {
                field: RequiredField::TotalRevenue,
                period: None,
            });
        }

        let series = |field: RequiredField| -> Result<Vec<Option<f64>>> {
            let missing = MetricsError::DataUnavailable {
                field,
                period: None,
            };
            let row = match field.source() {
                FieldSource::Statement(kind) => statement(kind).row(field.label()),
                FieldSource::Snapshot => None,
            }
            .ok_or(missing)?;

            let extra = row.keys().filter(|p| !periods.contains(*p)).count();
            if extra > 0 {
                warn!(field = field.label(), extra, "ignoring periods outside the revenue index");
            }

            periods
                .iter()
                .map(|period| {
                    row.get(period)
                        .copied()
                        .ok_or(MetricsError::DataUnavailable {
                            field,
                            period: Some(*period),
                        })
                })
                .collect()
        };

        Ok(Self {
            operating_income: series(RequiredField::OperatingIncome)?,
            tax_provision: series(RequiredField::TaxProvision)?,
            total_revenue: series(RequiredField::TotalRevenue)?,
            diluted_eps: series(RequiredField::DilutedEps)?,
            invested_capital: series(RequiredField::InvestedCapital)?,
            common_stock_equity: series(RequiredField::CommonStockEquity)?,
            free_cash_flow: series(RequiredField::FreeCashFlow)?,
            trailing_eps: required_snapshot(snapshot, RequiredField::TrailingEps)?,
            trailing_pe: required_snapshot(snapshot, RequiredField::TrailingPe)?,
            periods,
        })
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True if there are no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

const fn snapshot_value(snapshot: &InfoSnapshot, field: RequiredField) -> Option<f64> {
    match field {
        RequiredField::TrailingEps => snapshot.trailing_eps,
        RequiredField::TrailingPe => snapshot.trailing_pe,
        _ => None,
    }
}

fn required_snapshot(snapshot: &InfoSnapshot, field: RequiredField) -> Result<f64> {
    snapshot_value(snapshot, field).ok_or(MetricsError::DataUnavailable {
        field,
        period: None,
    })
}
