//! Entry point of the metric derivation.

use crate::error::Result;
use crate::fields::RequiredInputs;
use crate::historical::HistoricalTable;
use crate::summary::SummaryRow;
use moat_data::{InfoSnapshot, StatementTable};
use tracing::debug;

/// Derive the historical table and the summary row for one company.
///
/// Required rows and snapshot figures are validated up front; if any is
/// missing nothing is computed and [`MetricsError::DataUnavailable`] is
/// returned. Statement periods may arrive in any order.
///
/// [`MetricsError::DataUnavailable`]: crate::MetricsError::DataUnavailable
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use moat_data::{InfoSnapshot, StatementKind, StatementTable};
/// use moat_metrics::derive_metrics;
///
/// let y = |year| NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
/// let rows = |a: f64, b: f64| [(y(2023), Some(b)), (y(2022), Some(a))];
///
/// let income = StatementTable::new(StatementKind::Income)
///     .with_row("Operating Income", rows(20.0, 24.0))
///     .with_row("Tax Provision", rows(4.0, 4.8))
///     .with_row("Total Revenue", rows(100.0, 120.0))
///     .with_row("Diluted EPS", rows(1.0, 1.2));
/// let balance = StatementTable::new(StatementKind::BalanceSheet)
///     .with_row("Invested Capital", rows(100.0, 110.0))
///     .with_row("Common Stock Equity", rows(50.0, 60.0));
/// let cash_flow = StatementTable::new(StatementKind::CashFlow)
///     .with_row("Free Cash Flow", rows(10.0, 12.0));
/// let snapshot = InfoSnapshot { trailing_eps: Some(1.3), trailing_pe: Some(25.0) };
///
/// let (historical, summary) = derive_metrics(&income, &balance, &cash_flow, &snapshot)?;
/// assert_eq!(historical.len(), 2);
/// assert!(summary.avg_revenue_growth.is_some());
/// # Ok::<(), moat_metrics::MetricsError>(())
/// ```
pub fn derive_metrics(
    income: &StatementTable,
    balance_sheet: &StatementTable,
    cash_flow: &StatementTable,
    snapshot: &InfoSnapshot,
) -> Result<(HistoricalTable, SummaryRow)> {
    let inputs = RequiredInputs::extract(income, balance_sheet, cash_flow, snapshot)?;
    debug!(periods = inputs.len(), "required inputs extracted");

    let historical = HistoricalTable::from_inputs(&inputs);
    let summary = SummaryRow::from_historical(&historical, inputs.trailing_eps, inputs.trailing_pe);

    Ok((historical, summary))
}
