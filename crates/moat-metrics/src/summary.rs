//! Single-row summary: average growth, the 10% hurdle check and a price projection.

use crate::error::Result;
use crate::historical::{HistoricalTable, Metric};
use crate::numeric::{div_or_nan, mean_defined};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Every average growth rate must beat this (percent).
pub const GROWTH_HURDLE: f64 = 10.0;

/// Rule of 72: years to double ≈ 72 / growth rate in percent.
pub const RULE_OF_72: f64 = 72.0;

/// Projection horizon in years.
pub const PROJECTION_YEARS: f64 = 10.0;

/// Summary of one ticker's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Mean revenue growth, percent
    pub avg_revenue_growth: Option<f64>,
    /// Mean equity growth, percent
    pub avg_equity_growth: Option<f64>,
    /// Mean free cash flow growth, percent
    pub avg_fcf_growth: Option<f64>,
    /// Mean EPS growth, percent
    pub avg_eps_growth: Option<f64>,
    /// Mean ROIC growth, percent
    pub avg_roic_growth: Option<f64>,
    /// Whether all five averages exceed [`GROWTH_HURDLE`]
    pub all_above_ten: bool,
    /// `min(trailing P/E, 2 × average EPS growth)`
    pub estimated_pe: Option<f64>,
    /// Trailing-twelve-month EPS
    pub ttm_eps: f64,
    /// Growth rate used for the projection (the average equity growth)
    pub future_eps_growth: Option<f64>,
    /// Projected share price in [`PROJECTION_YEARS`] years
    pub price_in_10_years: Option<f64>,
}

impl SummaryRow {
    /// Summarize a historical table.
    pub fn from_historical(
        historical: &HistoricalTable,
        trailing_eps: f64,
        trailing_pe: f64,
    ) -> Self {
        let average = |metric: Metric| mean_defined(&historical.column(metric));

        let avg_revenue_growth = average(Metric::RevenueGrowth);
        let avg_equity_growth = average(Metric::EquityGrowth);
        let avg_fcf_growth = average(Metric::FcfGrowth);
        let avg_eps_growth = average(Metric::EpsGrowth);
        let avg_roic_growth = average(Metric::RoicGrowth);

        let all_above_ten = all_above_hurdle(&[
            avg_revenue_growth,
            avg_equity_growth,
            avg_fcf_growth,
            avg_eps_growth,
            avg_roic_growth,
        ]);
        let estimated_pe = estimated_pe(trailing_pe, avg_eps_growth);
        // Equity growth stands in for future EPS growth
        let future_eps_growth = avg_equity_growth;
        let price_in_10_years = match (future_eps_growth, estimated_pe) {
            (Some(growth), Some(pe)) => Some(projected_price(trailing_eps, growth, pe)),
            _ => None,
        };

        Self {
            avg_revenue_growth,
            avg_equity_growth,
            avg_fcf_growth,
            avg_eps_growth,
            avg_roic_growth,
            all_above_ten,
            estimated_pe,
            ttm_eps: trailing_eps,
            future_eps_growth,
            price_in_10_years,
        }
    }

    /// The five average growth rates in table order.
    pub const fn averages(&self) -> [Option<f64>; 5] {
        [
            self.avg_revenue_growth,
            self.avg_equity_growth,
            self.avg_fcf_growth,
            self.avg_eps_growth,
            self.avg_roic_growth,
        ]
    }

    /// Convert to a one-row Polars DataFrame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Series::new("Avg Revenue Growth".into(), [self.avg_revenue_growth]).into(),
            Series::new("Avg Equity Growth".into(), [self.avg_equity_growth]).into(),
            Series::new("Avg FCF Growth".into(), [self.avg_fcf_growth]).into(),
            Series::new("Avg EPS Growth".into(), [self.avg_eps_growth]).into(),
            Series::new("Avg ROIC Growth".into(), [self.avg_roic_growth]).into(),
            Series::new("All Above 10".into(), [self.all_above_ten]).into(),
            Series::new("PE".into(), [self.estimated_pe]).into(),
            Series::new("TTM_EPS".into(), [self.ttm_eps]).into(),
            Series::new("Future EPS".into(), [self.future_eps_growth]).into(),
            Series::new("Price in 10 years".into(), [self.price_in_10_years]).into(),
        ])?;

        Ok(df)
    }
}

/// True iff every average is defined (not null, not NaN) and strictly above
/// [`GROWTH_HURDLE`].
pub fn all_above_hurdle(averages: &[Option<f64>]) -> bool {
    averages
        .iter()
        .all(|avg| avg.is_some_and(|v| v > GROWTH_HURDLE))
}

/// `min(trailing P/E, 2 × average EPS growth)`.
///
/// A null growth average gives `None`; a NaN operand gives NaN.
pub fn estimated_pe(trailing_pe: f64, avg_eps_growth: Option<f64>) -> Option<f64> {
    let growth_pe = avg_eps_growth? * 2.0;
    if trailing_pe.is_nan() || growth_pe.is_nan() {
        return Some(f64::NAN);
    }
    Some(trailing_pe.min(growth_pe))
}

/// `eps ^ (10 / (72 / growth)) × pe`.
///
/// The exponent is the number of Rule-of-72 doublings within the horizon. A
/// zero growth rate makes the doubling time undefined and the result NaN, as
/// does a negative EPS raised to a fractional power.
pub fn projected_price(trailing_eps: f64, growth: f64, pe: f64) -> f64 {
    let doubling_years = div_or_nan(RULE_OF_72, growth);
    let exponent = div_or_nan(PROJECTION_YEARS, doubling_years);
    // powf maps a base of 1.0 to 1.0 even for a NaN exponent
    if exponent.is_nan() {
        return f64::NAN;
    }
    trailing_eps.powf(exponent) * pe
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case([12.0, 15.0, 20.0, 11.0, 30.0], true)]
    #[case([12.0, 9.0, 20.0, 11.0, 30.0], false)]
    #[case([10.0, 15.0, 20.0, 11.0, 30.0], false)]
    #[case([12.0, 15.0, f64::NAN, 11.0, 30.0], false)]
    fn test_all_above_hurdle(#[case] averages: [f64; 5], #[case] expected: bool) {
        let averages = averages.map(Some);
        assert_eq!(all_above_hurdle(&averages), expected);
    }

    #[test]
    fn test_all_above_hurdle_null_average() {
        assert!(!all_above_hurdle(&[
            Some(12.0),
            None,
            Some(20.0),
            Some(11.0),
            Some(30.0)
        ]));
    }

    #[rstest]
    #[case(30.0, 10.0, 20.0)]
    #[case(15.0, 20.0, 15.0)]
    #[case(25.0, -5.0, -10.0)]
    fn test_estimated_pe(#[case] trailing_pe: f64, #[case] growth: f64, #[case] expected: f64) {
        assert_relative_eq!(estimated_pe(trailing_pe, Some(growth)).unwrap(), expected);
    }

    #[test]
    fn test_estimated_pe_undefined() {
        assert_eq!(estimated_pe(25.0, None), None);
        assert!(estimated_pe(25.0, Some(f64::NAN)).unwrap().is_nan());
        assert!(estimated_pe(f64::NAN, Some(10.0)).unwrap().is_nan());
    }

    #[test]
    fn test_projected_price() {
        // 7.2% growth doubles in 10 years: exponent 1
        assert_relative_eq!(projected_price(2.0, 7.2, 15.0), 30.0, epsilon = 1e-9);
        // 14.4% growth doubles twice: exponent 2
        assert_relative_eq!(projected_price(3.0, 14.4, 10.0), 90.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(2.0, 0.0, 15.0)]
    #[case(-2.0, 5.0, 15.0)]
    #[case(2.0, f64::NAN, 15.0)]
    #[case(1.0, 0.0, 15.0)]
    #[case(1.0, f64::NAN, 15.0)]
    #[case(1.0, 7.2, f64::NAN)]
    fn test_projected_price_undefined(#[case] eps: f64, #[case] growth: f64, #[case] pe: f64) {
        let price = projected_price(eps, growth, pe);
        assert!(price.is_nan(), "eps {eps}, growth {growth}, pe {pe}: got {price}");
    }
}
