//! Streaming per-feature statistics.
//!
//! One [`FeatureStats`] accumulates count, sum, running mean, min, max, and
//! a running sum of squared deviations from the current mean as each value
//! arrives, yielding the population standard deviation without a second
//! pass. NaN values are skipped entirely so "not available" never perturbs
//! the summary. Once training data has been collected the instance is
//! treated as frozen and only queried.

use serde::Serialize;
use std::fmt;

/// Running summary of one feature column.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureStats {
    name: String,
    count: u64,
    sum: f64,
    mean: f64,
    min: f64,
    max: f64,
    sum_sq_dev: f64,
}

impl FeatureStats {
    /// Create an empty summary for the named feature.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            count: 0,
            sum: 0.0,
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum_sq_dev: 0.0,
        }
    }

    /// Fold one value into the summary. NaN is ignored.
    pub fn update(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.mean = self.sum / self.count as f64;
        let deviation = value - self.mean;
        self.sum_sq_dev += deviation * deviation;
    }

    /// Z-score of `x` against this feature's distribution.
    ///
    /// A constant feature (zero standard deviation) normalizes to its own
    /// mean instead of dividing by zero.
    pub fn z_score(&self, x: f64) -> f64 {
        let std_dev = self.std_dev();
        if std_dev == 0.0 {
            return self.mean();
        }
        (x - self.mean()) / std_dev
    }

    /// Feature name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of non-NaN values observed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, or NaN before any value has been observed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.mean
    }

    /// Smallest value observed.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value observed.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Population standard deviation, or NaN before any value has been
    /// observed.
    pub fn std_dev(&self) -> f64 {
        (self.sum_sq_dev / self.count as f64).sqrt()
    }
}

impl fmt::Display for FeatureStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} values): µ = {:.2} | σ = {:.2}",
            self.name,
            self.count,
            self.mean,
            self.std_dev()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_ignores_nan() {
        let mut stats = FeatureStats::new("Rainfall");
        stats.update(1.0);
        stats.update(f64::NAN);
        stats.update(3.0);
        assert_eq!(stats.count(), 2);
        assert!((stats.mean() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_value_seeds_both_bounds() {
        // A single observation must set min and max to the same value.
        let mut stats = FeatureStats::new("MinTemperature");
        stats.update(12.5);
        assert_eq!(stats.min(), 12.5);
        assert_eq!(stats.max(), 12.5);
    }

    #[test]
    fn test_min_max_tracking() {
        let mut stats = FeatureStats::new("MaxTemperature");
        for value in [20.0, 35.0, 10.0, 25.0] {
            stats.update(value);
        }
        assert_eq!(stats.min(), 10.0);
        assert_eq!(stats.max(), 35.0);
    }

    #[test]
    fn test_running_moments() {
        let mut stats = FeatureStats::new("Sunshine");
        for value in [2.0, 4.0, 6.0] {
            stats.update(value);
        }
        assert!((stats.mean() - 4.0).abs() < 1e-12);
        // Deviations are measured against the running mean at each step:
        // (2-2)^2 + (4-3)^2 + (6-4)^2 = 5, population σ = sqrt(5/3).
        assert!((stats.std_dev() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_z_score() {
        let mut stats = FeatureStats::new("Evaporation");
        for value in [2.0, 4.0, 6.0] {
            stats.update(value);
        }
        let sigma = (5.0f64 / 3.0).sqrt();
        assert!((stats.z_score(6.0) - 2.0 / sigma).abs() < 1e-12);
    }

    #[test]
    fn test_z_score_constant_feature_returns_mean() {
        let mut stats = FeatureStats::new("Dummy");
        stats.update(1.0);
        stats.update(1.0);
        stats.update(1.0);
        assert_eq!(stats.z_score(1.0), 1.0);
        assert_eq!(stats.z_score(-57.0), 1.0);
    }

    #[test]
    fn test_unobserved_feature_is_nan() {
        let stats = FeatureStats::new("Sunshine");
        assert!(stats.mean().is_nan());
        assert!(stats.std_dev().is_nan());
    }

    #[test]
    fn test_display() {
        let mut stats = FeatureStats::new("Rainfall");
        stats.update(2.0);
        stats.update(4.0);
        let line = stats.to_string();
        assert!(line.starts_with("Rainfall (2 values):"), "{}", line);
        assert!(line.contains("µ = 3.00"), "{}", line);
    }
}
