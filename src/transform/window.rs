//! Rolling window accumulations.

/// Compute a trailing rolling sum.
///
/// Position `i` holds the sum of `series[i + 1 - window..=i]`. The first
/// `window - 1` positions, and any window containing a missing (`NaN`)
/// value, are `NaN`: a sum is produced only for complete windows.
///
/// # Arguments
/// * `series` - Input values in chronological order
/// * `window` - Number of consecutive periods per sum
pub fn rolling_sum(series: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(series, window, |s| s.iter().sum())
}

/// Generic trailing window application over complete windows only.
fn rolling_apply<F>(series: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if series.is_empty() || window == 0 {
        return vec![f64::NAN; series.len()];
    }

    let n = series.len();
    let mut result = vec![f64::NAN; n];

    for i in (window - 1)..n {
        let segment = &series[i + 1 - window..=i];
        if segment.iter().all(|x| !x.is_nan()) {
            result[i] = f(segment);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rolling_sum_basic() {
        let series = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let result = rolling_sum(&series, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 60.0, epsilon = 1e-10);
        assert_relative_eq!(result[3], 90.0, epsilon = 1e-10);
        assert_relative_eq!(result[4], 120.0, epsilon = 1e-10);
        assert_relative_eq!(result[5], 150.0, epsilon = 1e-10);
    }

    #[test]
    fn rolling_sum_window_longer_than_series() {
        let result = rolling_sum(&[1.0, 2.0], 3);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rolling_sum_missing_value_voids_windows() {
        let series = vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        let result = rolling_sum(&series, 2);

        assert!(result[0].is_nan());
        assert_relative_eq!(result[1], 3.0, epsilon = 1e-10);
        assert!(result[2].is_nan());
        assert!(result[3].is_nan());
        assert_relative_eq!(result[4], 9.0, epsilon = 1e-10);
        assert_relative_eq!(result[5], 11.0, epsilon = 1e-10);
    }

    #[test]
    fn rolling_sum_empty_and_zero_window() {
        assert!(rolling_sum(&[], 3).is_empty());
        assert!(rolling_sum(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}
