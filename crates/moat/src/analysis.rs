//! One ticker in, two tables out.

use crate::error::Result;
use moat_data::FundamentalsSource;
use moat_metrics::{HistoricalTable, SummaryRow, derive_metrics};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of analysing one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Ticker as requested
    pub symbol: String,
    /// Per-period figures, ROIC and growth
    pub historical: HistoricalTable,
    /// Average growth, hurdle check and price projection
    pub summary: SummaryRow,
}

/// Fetch the three statements and the trailing snapshot for `symbol`, then
/// derive the historical and summary tables.
///
/// Requests are issued one after another; the first failure is returned.
pub async fn analyze<S: FundamentalsSource>(source: &S, symbol: &str) -> Result<Analysis> {
    debug!(symbol, "fetching income statement");
    let income = source.income_statement(symbol).await?;
    debug!(symbol, "fetching balance sheet");
    let balance_sheet = source.balance_sheet(symbol).await?;
    debug!(symbol, "fetching cash-flow statement");
    let cash_flow = source.cash_flow(symbol).await?;
    debug!(symbol, "fetching trailing snapshot");
    let snapshot = source.info(symbol).await?;

    let (historical, summary) = derive_metrics(&income, &balance_sheet, &cash_flow, &snapshot)?;
    info!(symbol, periods = historical.len(), "analysis complete");

    Ok(Analysis {
        symbol: symbol.to_string(),
        historical,
        summary,
    })
}
