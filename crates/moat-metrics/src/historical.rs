//! Per-period historical table: raw figures, ROIC and growth columns.

use crate::error::Result;
use crate::fields::RequiredInputs;
use crate::numeric::{div_or_nan, pct_change};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Days from 0001-01-01 (CE) to 1970-01-01, for polars' epoch-based Date type.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A column of the historical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Total revenue
    Revenue,
    /// Common stock equity
    Equity,
    /// Free cash flow
    Fcf,
    /// Diluted EPS
    Eps,
    /// Trailing-twelve-month EPS (same value on every row)
    TtmEps,
    /// Trailing P/E (same value on every row)
    Pe,
    /// Return on invested capital
    Roic,
    /// Revenue growth in percent
    RevenueGrowth,
    /// Equity growth in percent
    EquityGrowth,
    /// Free cash flow growth in percent
    FcfGrowth,
    /// EPS growth in percent
    EpsGrowth,
    /// ROIC growth in percent
    RoicGrowth,
}

impl Metric {
    /// All columns in table order.
    pub const ALL: [Self; 12] = [
        Self::Revenue,
        Self::Equity,
        Self::Fcf,
        Self::Eps,
        Self::TtmEps,
        Self::Pe,
        Self::Roic,
        Self::RevenueGrowth,
        Self::EquityGrowth,
        Self::FcfGrowth,
        Self::EpsGrowth,
        Self::RoicGrowth,
    ];

    /// The growth columns.
    pub const GROWTH: [Self; 5] = [
        Self::RevenueGrowth,
        Self::EquityGrowth,
        Self::FcfGrowth,
        Self::EpsGrowth,
        Self::RoicGrowth,
    ];

    /// Column label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Equity => "Equity",
            Self::Fcf => "FCF",
            Self::Eps => "EPS",
            Self::TtmEps => "TTM EPS",
            Self::Pe => "PE",
            Self::Roic => "ROIC",
            Self::RevenueGrowth => "Revenue Growth",
            Self::EquityGrowth => "Equity Growth",
            Self::FcfGrowth => "FCF Growth",
            Self::EpsGrowth => "EPS Growth",
            Self::RoicGrowth => "ROIC Growth",
        }
    }

    /// For a growth column, the column it measures.
    pub const fn growth_of(&self) -> Option<Self> {
        match self {
            Self::RevenueGrowth => Some(Self::Revenue),
            Self::EquityGrowth => Some(Self::Equity),
            Self::FcfGrowth => Some(Self::Fcf),
            Self::EpsGrowth => Some(Self::Eps),
            Self::RoicGrowth => Some(Self::Roic),
            _ => None,
        }
    }
}

/// Return on invested capital for one period.
///
/// `tax rate = tax / operating income`, `NOPAT = operating income × (1 − tax rate)`,
/// `ROIC = NOPAT / invested capital`. Zero operating income or zero invested
/// capital gives NaN; a null input gives `None`.
pub fn return_on_invested_capital(
    operating_income: Option<f64>,
    tax_provision: Option<f64>,
    invested_capital: Option<f64>,
) -> Option<f64> {
    let (operating_income, tax_provision, invested_capital) =
        (operating_income?, tax_provision?, invested_capital?);

    let tax_rate = div_or_nan(tax_provision, operating_income);
    let nopat = operating_income * (1.0 - tax_rate);
    Some(div_or_nan(nopat, invested_capital))
}

/// One period of the historical table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRow {
    /// Period end date
    pub period: NaiveDate,
    /// Total revenue
    pub revenue: Option<f64>,
    /// Common stock equity
    pub equity: Option<f64>,
    /// Free cash flow
    pub fcf: Option<f64>,
    /// Diluted EPS
    pub eps: Option<f64>,
    /// Trailing-twelve-month EPS
    pub ttm_eps: f64,
    /// Trailing P/E
    pub pe: f64,
    /// Return on invested capital
    pub roic: Option<f64>,
    /// Revenue growth vs. the previous period, percent
    pub revenue_growth: Option<f64>,
    /// Equity growth vs. the previous period, percent
    pub equity_growth: Option<f64>,
    /// FCF growth vs. the previous period, percent
    pub fcf_growth: Option<f64>,
    /// EPS growth vs. the previous period, percent
    pub eps_growth: Option<f64>,
    /// ROIC growth vs. the previous period, percent
    pub roic_growth: Option<f64>,
}

impl HistoricalRow {
    /// Value of one column.
    pub const fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::Equity => self.equity,
            Metric::Fcf => self.fcf,
            Metric::Eps => self.eps,
            Metric::TtmEps => Some(self.ttm_eps),
            Metric::Pe => Some(self.pe),
            Metric::Roic => self.roic,
            Metric::RevenueGrowth => self.revenue_growth,
            Metric::EquityGrowth => self.equity_growth,
            Metric::FcfGrowth => self.fcf_growth,
            Metric::EpsGrowth => self.eps_growth,
            Metric::RoicGrowth => self.roic_growth,
        }
    }
}

/// Historical table, one row per period in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTable {
    rows: Vec<HistoricalRow>,
}

impl HistoricalTable {
    /// Compute ROIC and growth columns from aligned inputs.
    pub fn from_inputs(inputs: &RequiredInputs) -> Self {
        let roic: Vec<Option<f64>> = inputs
            .operating_income
            .iter()
            .zip(&inputs.tax_provision)
            .zip(&inputs.invested_capital)
            .map(|((oi, tax), ic)| return_on_invested_capital(*oi, *tax, *ic))
            .collect();

        let revenue_growth = pct_change(&inputs.total_revenue);
        let equity_growth = pct_change(&inputs.common_stock_equity);
        let fcf_growth = pct_change(&inputs.free_cash_flow);
        let eps_growth = pct_change(&inputs.diluted_eps);
        let roic_growth = pct_change(&roic);

        let rows = inputs
            .periods
            .iter()
            .enumerate()
            .map(|(i, period)| HistoricalRow {
                period: *period,
                revenue: inputs.total_revenue[i],
                equity: inputs.common_stock_equity[i],
                fcf: inputs.free_cash_flow[i],
                eps: inputs.diluted_eps[i],
                ttm_eps: inputs.trailing_eps,
                pe: inputs.trailing_pe,
                roic: roic[i],
                revenue_growth: revenue_growth[i],
                equity_growth: equity_growth[i],
                fcf_growth: fcf_growth[i],
                eps_growth: eps_growth[i],
                roic_growth: roic_growth[i],
            })
            .collect();

        Self { rows }
    }

    /// Rows in ascending period order.
    pub fn rows(&self) -> &[HistoricalRow] {
        &self.rows
    }

    /// Period end dates, ascending.
    pub fn periods(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|row| row.period).collect()
    }

    /// Row for a given period.
    pub fn row(&self, period: NaiveDate) -> Option<&HistoricalRow> {
        self.rows.iter().find(|row| row.period == period)
    }

    /// One column, top to bottom.
    pub fn column(&self, metric: Metric) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.get(metric)).collect()
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no periods.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to a Polars DataFrame: a `Period` date column followed by every [`Metric`].
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let days: Vec<i32> = self
            .rows
            .iter()
            .map(|row| row.period.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
            .collect();
        let period = Series::new("Period".into(), days).cast(&DataType::Date)?;

        let mut columns: Vec<Column> = vec![period.into()];
        for metric in Metric::ALL {
            columns.push(Series::new(metric.label().into(), self.column(metric)).into());
        }

        Ok(DataFrame::new(columns)?)
    }
}
