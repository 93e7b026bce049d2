//! Descriptive sample statistics
//!
//! Summary statistics attached to drift reports, plus z-score screening
//! of single incoming observations against a baseline.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Outlier classification for a single observation screened against
/// baseline statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "severity", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outlier {
    /// More than 2 standard deviations from the baseline mean
    Warning { z_score: f64 },
    /// More than 3 standard deviations from the baseline mean
    Extreme { z_score: f64 },
}

/// Basic statistics for a sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Number of observations
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Median value
    pub median: f64,
}

impl SampleStats {
    /// Compute statistics from a sample; empty input yields all-zero stats
    pub fn from_array(data: &Array1<f64>) -> Self {
        if data.is_empty() {
            return Self::default();
        }

        let n = data.len() as f64;
        let mut sorted: Vec<f64> = data.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let mean = data.sum() / n;
        let variance = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let median = if sorted.len() % 2 == 0 {
            (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
        } else {
            sorted[sorted.len() / 2]
        };

        Self {
            count: data.len(),
            mean,
            std,
            min,
            max,
            median,
        }
    }

    /// Z-score of a value against these statistics; 0 when std is 0
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std > 0.0 {
            (value - self.mean) / self.std
        } else {
            0.0
        }
    }

    /// Screen a single observation against these statistics
    ///
    /// Returns `Extreme` when |z| > 3, `Warning` when |z| > 2, `None`
    /// otherwise. Always `None` when the baseline std is 0.
    pub fn screen(&self, value: f64) -> Option<Outlier> {
        let z = self.z_score(value);
        if z.abs() > 3.0 {
            Some(Outlier::Extreme { z_score: z })
        } else if z.abs() > 2.0 {
            Some(Outlier::Warning { z_score: z })
        } else {
            None
        }
    }
}
