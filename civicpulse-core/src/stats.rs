//! Statistics toolkit: pure functions over numeric sequences and records.
//!
//! Nothing here touches the data manager or the loader: values in, numbers out.
//! Standard deviation is the population form (divide by `n`) throughout.

use crate::domain::FieldAccess;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Threshold, in standard deviations, used when callers have no preference.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Descriptive statistics for one numeric sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// Mean, median, extremes and population standard deviation.
///
/// Empty input yields all zeros with `count == 0`.
pub fn describe(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::default();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    SummaryStats {
        mean: mean(values),
        median,
        min: sorted[0],
        max: sorted[n - 1],
        std_dev: std_dev(values),
        count: n,
    }
}

/// Distinct non-empty values of a text column, trimmed and sorted.
pub fn unique_strings<R: FieldAccess>(records: &[R], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.text(field))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct finite values of a numeric column, ascending.
pub fn unique_numbers<R: FieldAccess>(records: &[R], field: &str) -> Vec<f64> {
    let mut values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.number(field))
        .filter(|v| v.is_finite())
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Pearson correlation coefficient.
///
/// Returns 0.0 for empty or unequal-length inputs, and when either side has
/// zero variance.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return 0.0;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Values whose distance from the mean exceeds `threshold` standard deviations.
///
/// Input order is preserved. A constant sequence has no anomalies.
pub fn anomalies(values: &[f64], threshold: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let stats = describe(values);
    let limit = threshold * stats.std_dev;
    values
        .iter()
        .copied()
        .filter(|v| (v - stats.mean).abs() > limit)
        .collect()
}

/// Numeric column of `records` as a plain vector, skipping non-numeric fields.
pub fn column_values<R: FieldAccess>(records: &[R], field: &str) -> Vec<f64> {
    records.iter().filter_map(|r| r.number(field)).collect()
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describe_empty_is_all_zero() {
        let s = describe(&[]);
        assert_eq!(
            s,
            SummaryStats {
                mean: 0.0,
                median: 0.0,
                min: 0.0,
                max: 0.0,
                std_dev: 0.0,
                count: 0
            }
        );
    }

    #[test]
    fn describe_uses_population_variance() {
        let s = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx(s.mean, 5.0));
        assert!(approx(s.std_dev, 2.0));
        assert!(approx(s.median, 4.5));
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert_eq!(s.count, 8);
    }

    #[test]
    fn describe_odd_length_median_is_central_element() {
        let s = describe(&[9.0, 1.0, 5.0]);
        assert_eq!(s.median, 5.0);
    }

    #[test]
    fn describe_single_value() {
        let s = describe(&[42.0]);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.count, 1);
    }

    #[test]
    fn correlation_perfect_positive_and_negative() {
        assert!(approx(correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 1.0));
        assert!(approx(correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
    }

    #[test]
    fn correlation_zero_variance_is_zero() {
        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(correlation(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn correlation_rejects_mismatched_inputs() {
        assert_eq!(correlation(&[], &[]), 0.0);
        assert_eq!(correlation(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn anomalies_flags_the_outlier() {
        // Population z-scores of a 4-element sample never exceed sqrt(3).
        let found = anomalies(&[1.0, 2.0, 3.0, 100.0], 1.5);
        assert_eq!(found, vec![100.0]);
    }

    #[test]
    fn anomalies_at_default_threshold_on_larger_sample() {
        let mut values = vec![10.0; 19];
        values.push(100.0);
        let found = anomalies(&values, DEFAULT_ANOMALY_THRESHOLD);
        assert_eq!(found, vec![100.0]);
    }

    #[test]
    fn anomalies_empty_and_constant() {
        assert!(anomalies(&[], 2.0).is_empty());
        assert!(anomalies(&[5.0, 5.0, 5.0], 2.0).is_empty());
    }

    struct Row {
        state: &'static str,
        year: f64,
    }

    impl FieldAccess for Row {
        fn text(&self, field: &str) -> Option<&str> {
            (field == "state").then_some(self.state)
        }
        fn number(&self, field: &str) -> Option<f64> {
            (field == "year").then_some(self.year)
        }
        fn date(&self, _field: &str) -> Option<NaiveDate> {
            None
        }
    }

    #[test]
    fn unique_strings_trims_dedupes_and_sorts() {
        let rows = [
            Row { state: " Kerala", year: 2021.0 },
            Row { state: "Goa", year: 2020.0 },
            Row { state: "Kerala ", year: 2021.0 },
            Row { state: "  ", year: 2019.0 },
        ];
        assert_eq!(unique_strings(&rows, "state"), vec!["Goa", "Kerala"]);
        assert!(unique_strings(&rows, "district").is_empty());
    }

    #[test]
    fn unique_numbers_sorts_and_skips_non_finite() {
        let rows = [
            Row { state: "a", year: 2021.0 },
            Row { state: "b", year: f64::NAN },
            Row { state: "c", year: 2019.0 },
            Row { state: "d", year: 2021.0 },
        ];
        assert_eq!(unique_numbers(&rows, "year"), vec![2019.0, 2021.0]);
    }
}
