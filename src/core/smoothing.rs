// src/core/smoothing.rs

//! Centered moving averages used to flatten the multi-year comparison lines.
//!
//! A window of size `w` at position `i` covers `i - (w - 1 - w / 2) ..= i + w / 2`.
//! Odd windows are symmetric; even windows lean one step to the right
//! (window 4 covers `i - 1 ..= i + 2`). Positions whose window leaves the
//! sequence, or touches a missing value, have no average.

pub const FIRST_PASS_WINDOW: usize = 3;
pub const SECOND_PASS_WINDOW: usize = 4;

pub fn centered_moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let ahead = window / 2;
    let behind = window - 1 - ahead;

    (0..values.len())
        .map(|i| {
            if i < behind || i + ahead >= values.len() {
                return None;
            }
            let slice = &values[i - behind..=i + ahead];
            let sum = slice.iter().copied().sum::<Option<f64>>()?;
            Some(sum / window as f64)
        })
        .collect()
}

/// Three-point pass followed by a four-point pass.
pub fn double_smooth(values: &[Option<i16>]) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = values.iter().map(|v| v.map(f64::from)).collect();
    let first = centered_moving_average(&values, FIRST_PASS_WINDOW);
    centered_moving_average(&first, SECOND_PASS_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_three_point_window() {
        let result = centered_moving_average(&some(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(result, vec![None, Some(2.0), Some(3.0), None]);
    }

    #[test]
    fn test_four_point_window_leans_right() {
        let result = centered_moving_average(&some(&[1.0, 2.0, 3.0, 4.0, 5.0]), 4);
        assert_eq!(result, vec![None, Some(2.5), Some(3.5), None, None]);
    }

    #[test]
    fn test_missing_value_poisons_window() {
        let result = centered_moving_average(&[Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)], 3);
        assert_eq!(result, vec![None, None, None, Some(4.0), None]);
    }

    #[test]
    fn test_double_smooth_trims_both_edges() {
        let values: Vec<Option<i16>> = (1..=8).map(Some).collect();
        let result = double_smooth(&values);
        assert_eq!(result.len(), 8);
        assert_eq!(
            result,
            vec![None, None, Some(3.5), Some(4.5), Some(5.5), None, None, None]
        );
    }

    #[test]
    fn test_short_series_has_no_averages() {
        assert_eq!(double_smooth(&[Some(1), Some(2), Some(3)]), vec![None, None, None]);
        assert!(double_smooth(&[]).is_empty());
    }
}
