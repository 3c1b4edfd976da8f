//! Arithmetic with "undefined propagates" semantics.
//!
//! Cells are `Option<f64>`: `None` is a null (nothing to compute from) and is
//! skipped by averages, `Some(NaN)` is a numeric undefined and contaminates
//! every value derived from it.

/// `numerator / denominator`, or NaN when the denominator is zero.
pub fn div_or_nan(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Percentage change of each value against its predecessor.
///
/// The first entry is always `None`; so is any entry whose value or
/// predecessor is null. A zero predecessor yields NaN.
pub fn pct_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let changes = values.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(previous), Some(current)) => Some(div_or_nan(current - previous, previous) * 100.0),
        _ => None,
    });

    values.first().map(|_| None).into_iter().chain(changes).collect()
}

/// Mean of the non-null values; `None` if every value is null.
pub fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, 4.0, 2.5)]
    #[case(-3.0, 2.0, -1.5)]
    #[case(0.0, 5.0, 0.0)]
    fn test_div_or_nan(#[case] numerator: f64, #[case] denominator: f64, #[case] expected: f64) {
        assert_relative_eq!(div_or_nan(numerator, denominator), expected);
    }

    #[rstest]
    #[case(1.0)]
    #[case(0.0)]
    #[case(-1.0)]
    fn test_div_by_zero_is_nan(#[case] numerator: f64) {
        assert!(div_or_nan(numerator, 0.0).is_nan());
    }

    #[test]
    fn test_pct_change() {
        let growth = pct_change(&[Some(100.0), Some(120.0), Some(90.0)]);
        assert_eq!(growth.len(), 3);
        assert!(growth[0].is_none());
        assert_relative_eq!(growth[1].unwrap(), 20.0);
        assert_relative_eq!(growth[2].unwrap(), -25.0);
    }

    #[test]
    fn test_pct_change_nulls_and_zero() {
        let growth = pct_change(&[Some(0.0), Some(5.0), None, Some(8.0)]);
        assert!(growth[0].is_none());
        assert!(growth[1].unwrap().is_nan());
        assert!(growth[2].is_none());
        assert!(growth[3].is_none());
    }

    #[test]
    fn test_pct_change_nan_propagates() {
        let growth = pct_change(&[Some(f64::NAN), Some(5.0), Some(10.0)]);
        assert!(growth[1].unwrap().is_nan());
        assert_relative_eq!(growth[2].unwrap(), 100.0);
    }

    #[test]
    fn test_pct_change_short_inputs() {
        assert!(pct_change(&[]).is_empty());
        assert_eq!(pct_change(&[Some(3.0)]), vec![None]);
    }

    #[test]
    fn test_mean_defined() {
        assert_relative_eq!(
            mean_defined(&[None, Some(10.0), Some(20.0)]).unwrap(),
            15.0
        );
        assert_eq!(mean_defined(&[None, None]), None);
        assert_eq!(mean_defined(&[]), None);
        assert!(mean_defined(&[None, Some(1.0), Some(f64::NAN)]).unwrap().is_nan());
    }
}
