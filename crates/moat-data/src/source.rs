//! The data-retrieval seam consumed by the analysis pipeline.

use crate::error::Result;
use crate::statement::{InfoSnapshot, StatementTable};

/// Supplies the raw inputs for one ticker's analysis.
///
/// Implementations own transport, caching and rate limiting. The pipeline only
/// sees finished tables, so tests can substitute fixed fixture data.
pub trait FundamentalsSource {
    /// Income statement rows keyed by label and period.
    fn income_statement(&self, symbol: &str) -> impl Future<Output = Result<StatementTable>>;

    /// Balance sheet rows keyed by label and period.
    fn balance_sheet(&self, symbol: &str) -> impl Future<Output = Result<StatementTable>>;

    /// Cash-flow statement rows keyed by label and period.
    fn cash_flow(&self, symbol: &str) -> impl Future<Output = Result<StatementTable>>;

    /// Trailing EPS and trailing P/E.
    fn info(&self, symbol: &str) -> impl Future<Output = Result<InfoSnapshot>>;
}
