//! Financial statements and trailing snapshot figures from Yahoo Finance.
//!
//! Statements come from the fundamentals-timeseries endpoint, one request per
//! statement. Yahoo type names (e.g. `annualTotalRevenue`) are mapped to the
//! row labels used throughout moat (e.g. "Total Revenue").

use super::client::YahooClient;
use super::wire::{DataPoint, QuoteSummaryEnvelope, TimeseriesEnvelope};
use crate::error::{DataError, Result};
use crate::source::FundamentalsSource;
use crate::statement::{Frequency, InfoSnapshot, StatementKind, StatementTable};
use chrono::{NaiveDate, Utc};
use tracing::warn;

/// Start of the requested history (2016-12-31T00:00:00Z); Yahoo returns at most
/// the last four or five fiscal periods regardless.
const HISTORY_START: i64 = 1_483_142_400;

const INCOME_FIELDS: &[(&str, &str)] = &[
    ("TotalRevenue", "Total Revenue"),
    ("CostOfRevenue", "Cost Of Revenue"),
    ("GrossProfit", "Gross Profit"),
    ("OperatingIncome", "Operating Income"),
    ("PretaxIncome", "Pretax Income"),
    ("TaxProvision", "Tax Provision"),
    ("NetIncome", "Net Income"),
    ("EBIT", "EBIT"),
    ("BasicEPS", "Basic EPS"),
    ("DilutedEPS", "Diluted EPS"),
];

const BALANCE_SHEET_FIELDS: &[(&str, &str)] = &[
    ("TotalAssets", "Total Assets"),
    ("TotalDebt", "Total Debt"),
    ("InvestedCapital", "Invested Capital"),
    ("CommonStockEquity", "Common Stock Equity"),
    ("StockholdersEquity", "Stockholders Equity"),
    ("WorkingCapital", "Working Capital"),
    ("CashAndCashEquivalents", "Cash And Cash Equivalents"),
];

const CASH_FLOW_FIELDS: &[(&str, &str)] = &[
    ("OperatingCashFlow", "Operating Cash Flow"),
    ("CapitalExpenditure", "Capital Expenditure"),
    ("FreeCashFlow", "Free Cash Flow"),
    ("RepurchaseOfCapitalStock", "Repurchase Of Capital Stock"),
    ("CashDividendsPaid", "Cash Dividends Paid"),
];

/// Yahoo type name suffix -> row label for a statement.
pub const fn statement_fields(kind: StatementKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        StatementKind::Income => INCOME_FIELDS,
        StatementKind::BalanceSheet => BALANCE_SHEET_FIELDS,
        StatementKind::CashFlow => CASH_FLOW_FIELDS,
    }
}

/// Yahoo Finance fundamentals provider.
#[derive(Debug)]
pub struct YahooFundamentalsProvider {
    client: YahooClient,
    frequency: Frequency,
}

impl YahooFundamentalsProvider {
    /// Create a provider over `client` requesting statements at `frequency`.
    pub const fn new(client: YahooClient, frequency: Frequency) -> Self {
        Self { client, frequency }
    }

    /// Statement frequency requested by this provider.
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Fetch one financial statement for `symbol`.
    ///
    /// Rows are padded so that every row carries an entry for every period of
    /// the statement. Types Yahoo has no data for are simply absent; a statement
    /// with no rows at all (typically an unknown ticker) is `MissingData`.
    pub async fn fetch_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable> {
        let symbol = normalize_symbol(symbol)?;
        let prefix = self.frequency.yahoo_prefix();
        let types = statement_fields(kind)
            .iter()
            .map(|(name, _)| format!("{prefix}{name}"))
            .collect::<Vec<_>>()
            .join(",");

        let query = [
            ("symbol", symbol.clone()),
            ("type", types),
            ("period1", HISTORY_START.to_string()),
            ("period2", Utc::now().timestamp().to_string()),
        ];
        let cache_key = format!("{}:{}:{}", kind.key(), symbol, self.frequency.to_db_str());
        let path = format!("/ws/fundamentals-timeseries/v1/finance/timeseries/{symbol}");

        let body = self
            .client
            .get_text(&cache_key, &symbol, &path, &query, false)
            .await?;

        let table = parse_timeseries(&body, kind, self.frequency)?;
        if table.is_empty() {
            warn!(%symbol, statement = %kind, "provider returned no rows");
            return Err(DataError::MissingData {
                symbol,
                reason: format!("no {kind} rows"),
            });
        }
        Ok(table)
    }

    /// Fetch trailing EPS and trailing P/E for `symbol`.
    pub async fn fetch_info(&self, symbol: &str) -> Result<InfoSnapshot> {
        let symbol = normalize_symbol(symbol)?;
        let query = [("modules", "defaultKeyStatistics,summaryDetail".to_string())];
        let cache_key = format!("info:{symbol}");
        let path = format!("/v10/finance/quoteSummary/{symbol}");

        let body = self
            .client
            .get_text(&cache_key, &symbol, &path, &query, true)
            .await?;

        parse_quote_summary(&body)
    }
}

impl FundamentalsSource for YahooFundamentalsProvider {
    async fn income_statement(&self, symbol: &str) -> Result<StatementTable> {
        self.fetch_statement(symbol, StatementKind::Income).await
    }

    async fn balance_sheet(&self, symbol: &str) -> Result<StatementTable> {
        self.fetch_statement(symbol, StatementKind::BalanceSheet).await
    }

    async fn cash_flow(&self, symbol: &str) -> Result<StatementTable> {
        self.fetch_statement(symbol, StatementKind::CashFlow).await
    }

    async fn info(&self, symbol: &str) -> Result<InfoSnapshot> {
        self.fetch_info(symbol).await
    }
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }
    Ok(symbol.to_uppercase())
}

/// Parse a fundamentals-timeseries response into a statement table.
///
/// Only the types belonging to `kind` at `frequency` are kept; anything else in
/// the response is ignored.
pub fn parse_timeseries(
    body: &str,
    kind: StatementKind,
    frequency: Frequency,
) -> Result<StatementTable> {
    let envelope: TimeseriesEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.timeseries.error {
        return Err(DataError::YahooApi(error.to_string()));
    }

    let prefix = frequency.yahoo_prefix();
    let mut table = StatementTable::new(kind);

    for result in envelope.timeseries.result.unwrap_or_default() {
        let Some(type_name) = result.meta.types.first() else {
            continue;
        };
        let Some(label) = type_name
            .strip_prefix(prefix)
            .and_then(|name| lookup_label(kind, name))
        else {
            continue;
        };
        let Some(values) = result.series.get(type_name) else {
            continue;
        };

        let points: Vec<Option<DataPoint>> = serde_json::from_value(values.clone())?;
        for point in points.into_iter().flatten() {
            let period = NaiveDate::parse_from_str(&point.as_of_date, "%Y-%m-%d").map_err(|e| {
                DataError::Parse(format!("Invalid asOfDate {}: {}", point.as_of_date, e))
            })?;
            let value = point.reported_value.and_then(|v| v.raw);
            table.insert(label, period, value);
        }
    }

    table.pad_periods();
    Ok(table)
}

fn lookup_label(kind: StatementKind, name: &str) -> Option<&'static str> {
    statement_fields(kind)
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, label)| *label)
}

/// Parse a quoteSummary response carrying `defaultKeyStatistics` and `summaryDetail`.
pub fn parse_quote_summary(body: &str) -> Result<InfoSnapshot> {
    let envelope: QuoteSummaryEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(DataError::YahooApi(error.to_string()));
    }

    let result = envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::YahooApi("Empty quoteSummary result".to_string()))?;

    Ok(InfoSnapshot {
        trailing_eps: result
            .default_key_statistics
            .and_then(|stats| stats.trailing_eps)
            .and_then(|v| v.raw),
        trailing_pe: result
            .summary_detail
            .and_then(|detail| detail.trailing_pe)
            .and_then(|v| v.raw),
    })
}
