//! Error types for metric derivation.

use crate::fields::RequiredField;
use chrono::NaiveDate;
use thiserror::Error;

/// Result type for metric derivation.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that abort a derivation.
///
/// Numeric problems (division by zero and the like) are not errors; they
/// surface as NaN cells in the output tables.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A required row, period or snapshot figure is missing
    #[error("Data unavailable: {field}{}", period_suffix(.period))]
    DataUnavailable {
        /// The missing input
        field: RequiredField,
        /// Period the row has no entry for, if the row itself exists
        period: Option<NaiveDate>,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

fn period_suffix(period: &Option<NaiveDate>) -> String {
    period
        .map(|p| format!(" has no entry for period {p}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = MetricsError::DataUnavailable {
            field: RequiredField::FreeCashFlow,
            period: None,
        };
        assert_eq!(
            err.to_string(),
            "Data unavailable: Free Cash Flow (cash-flow statement)"
        );

        let err = MetricsError::DataUnavailable {
            field: RequiredField::InvestedCapital,
            period: NaiveDate::from_ymd_opt(2023, 6, 30),
        };
        assert_eq!(
            err.to_string(),
            "Data unavailable: Invested Capital (balance sheet) has no entry for period 2023-06-30"
        );
    }
}
