//! Statistical building blocks: per-90 normalization, z-scores, quantiles,
//! rolling means and least-squares trend slopes.

use fbviz_common::{round_to, FbvizError, Result};

/// Rate per 90 minutes. Zero or negative playing time yields `None`.
pub fn per90(total: f64, minutes: f64) -> Option<f64> {
    (minutes > 0.0).then(|| total / (minutes / 90.0))
}

/// Rate per full 90 played, where `nineties` is minutes / 90 as the provider reports it.
pub fn per_nineties(total: f64, nineties: f64) -> Option<f64> {
    (nineties > 0.0).then(|| total / nineties)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation (divides by n).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Population z-scores. A constant column scores 0 everywhere.
pub fn zscores(values: &[f64]) -> Vec<f64> {
    let (Some(mu), Some(sigma)) = (mean(values), population_std(values)) else {
        return Vec::new();
    };
    if sigma == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mu) / sigma).collect()
}

/// Weighted sum of the z-scores of several equally long columns.
pub fn weighted_composite(columns: &[(&[f64], f64)]) -> Result<Vec<f64>> {
    let Some((first, _)) = columns.first() else {
        return Ok(Vec::new());
    };
    let len = first.len();
    if let Some((column, _)) = columns.iter().find(|(column, _)| column.len() != len) {
        return Err(FbvizError::validation(format!(
            "Composite columns differ in length: {} vs {}",
            len,
            column.len()
        )));
    }

    let mut composite = vec![0.0; len];
    for (column, weight) in columns {
        for (acc, z) in composite.iter_mut().zip(zscores(column)) {
            *acc += z * weight;
        }
    }
    Ok(composite)
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile with linear interpolation between closest ranks, `q` in [0, 1].
///
/// Non-finite values are ignored. `None` when nothing remains.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let sorted = sorted_finite(values);
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Median with the same interpolation as [`quantile`].
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Percentile in [0, 100], rounded to two decimals.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    quantile(values, p / 100.0).map(|v| round_to(v, 2))
}

/// Flags the entries strictly above the `q` quantile.
pub fn above_quantile(values: &[f64], q: f64) -> Vec<bool> {
    match quantile(values, q) {
        Some(cut) => values.iter().map(|v| *v > cut).collect(),
        None => vec![false; values.len()],
    }
}

/// Trailing rolling mean.
///
/// Each output averages the finite values among the last `window` inputs and
/// is `None` until at least `min_periods` of them (never fewer than one) are
/// present. `min_periods == window` gives the strict variant.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let needed = min_periods.max(1);

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let present: Vec<f64> = values[start..=i]
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            (present.len() >= needed).then(|| present.iter().sum::<f64>() / present.len() as f64)
        })
        .collect()
}

/// Least-squares slope of values against their index. Missing values are
/// skipped but keep their position; fewer than two present values give 0.
pub fn trend_slope(values: &[Option<f64>]) -> f64 {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| v.is_finite()).map(|v| (i as f64, v)))
        .collect();
    if points.len() < 2 {
        return 0.0;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_x_squared: f64 = points.iter().map(|(x, _)| x.powi(2)).sum();

    let denominator = n * sum_x_squared - sum_x.powi(2);
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

/// Maps a value into [0, 1] relative to `min..=max`. A degenerate range maps to 0.5.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::assert_approx_eq;

    #[test]
    fn test_per90() {
        assert_eq!(per90(3.0, 270.0), Some(1.0));
        assert_eq!(per90(3.0, 0.0), None);
        assert_eq!(per_nineties(10.0, 2.5), Some(4.0));
        assert_eq!(per_nineties(10.0, 0.0), None);
    }

    #[test]
    fn test_zscores_population() {
        let z = zscores(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        // mean 5, population std 2
        assert_approx_eq(z[0], -1.5, 1e-12);
        assert_approx_eq(z[7], 2.0, 1e-12);
    }

    #[test]
    fn test_zscores_constant_column() {
        assert_eq!(zscores(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
        assert!(zscores(&[]).is_empty());
    }

    #[test]
    fn test_weighted_composite() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 2.0, 1.0];
        let composite = weighted_composite(&[(&a[..], 0.5), (&b[..], 0.5)]).unwrap();
        for value in composite {
            assert_approx_eq(value, 0.0, 1e-12);
        }
        assert!(weighted_composite(&[(&a[..], 1.0), (&b[..2], 1.0)]).is_err());
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_approx_eq(quantile(&values, 0.6).unwrap(), 2.8, 1e-12);
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_percentile_rounds_to_two_decimals() {
        let values = [0.9, 1.1, 1.35, 1.8, 2.2];
        assert_eq!(percentile(&values, 60.0), Some(1.53));
        assert_eq!(percentile(&values, 40.0), Some(1.25));
    }

    #[test]
    fn test_above_quantile() {
        let flags = above_quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.75);
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_rolling_mean_partial_and_strict() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            rolling_mean(&values, 2, 1),
            vec![Some(1.0), Some(1.5), Some(2.5), Some(3.5)]
        );
        assert_eq!(
            rolling_mean(&values, 3, 3),
            vec![None, None, Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_rolling_mean_skips_missing() {
        let values = [1.0, f64::NAN, 3.0];
        assert_eq!(rolling_mean(&values, 2, 1), vec![Some(1.0), Some(1.0), Some(3.0)]);
        assert_eq!(rolling_mean(&[f64::NAN], 3, 0), vec![None]);
    }

    #[test]
    fn test_trend_slope() {
        assert_approx_eq(trend_slope(&[Some(1.0), Some(2.0), Some(3.0)]), 1.0, 1e-12);
        assert_approx_eq(trend_slope(&[Some(3.0), None, Some(1.0)]), -1.0, 1e-12);
        assert_eq!(trend_slope(&[Some(3.0), None]), 0.0);
        assert_eq!(trend_slope(&[]), 0.0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(1.0, 1.0, 1.0), 0.5);
    }
}
