//! Model-confidence drift analysis

use crate::error::{DriftError, Result};
use crate::score::{combined_score_with, DriftLevel, DriftWeights, MetricResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Direction of the mean-confidence trend relative to baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceTrend {
    /// Current mean at least 95% of the baseline mean
    Stable,
    /// Current mean at least 80% of the baseline mean
    Declining,
    /// Current mean below 80% of the baseline mean
    Degraded,
}

/// Result of a confidence drift analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAnalysis {
    /// Combined drift score over the confidence distributions
    pub drift_score: f64,
    pub drift_level: DriftLevel,
    /// Per-metric results keyed by metric name
    pub metrics: HashMap<String, MetricResult>,
    pub baseline_mean: f64,
    pub current_mean: f64,
    pub baseline_std: f64,
    pub current_std: f64,
    /// Fraction of current confidences below the threshold
    pub low_confidence_rate: f64,
    /// Fraction of baseline confidences below the threshold
    pub baseline_low_confidence_rate: f64,
    /// Change in the low-confidence fraction, current minus baseline
    pub confidence_degradation: f64,
    pub trend: ConfidenceTrend,
}

/// Analyzes drift between baseline and current model-confidence samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceAnalyzer {
    confidence_threshold: f64,
    weights: DriftWeights,
}

impl ConfidenceAnalyzer {
    /// Create an analyzer with a 0.7 low-confidence threshold
    pub fn new() -> Self {
        Self {
            confidence_threshold: 0.7,
            weights: DriftWeights::default(),
        }
    }

    /// Set the low-confidence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Override the score weights; validated when the analysis runs
    pub fn with_weights(mut self, weights: DriftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Score confidence drift between the two samples.
    ///
    /// Unlike the raw metrics, the analyzer needs observations on both
    /// sides and returns `InsufficientData` when either is empty.
    pub fn analyze(
        &self,
        baseline: &Array1<f64>,
        current: &Array1<f64>,
    ) -> Result<ConfidenceAnalysis> {
        if baseline.is_empty() || current.is_empty() {
            return Err(DriftError::InsufficientData(
                "confidence analysis needs observations on both sides".to_string(),
            ));
        }

        let score = combined_score_with(baseline, current, &self.weights)?;

        let baseline_mean = baseline.sum() / baseline.len() as f64;
        let current_mean = current.sum() / current.len() as f64;
        let baseline_std = population_std(baseline, baseline_mean);
        let current_std = population_std(current, current_mean);

        let baseline_low_confidence_rate = low_fraction(baseline, self.confidence_threshold);
        let low_confidence_rate = low_fraction(current, self.confidence_threshold);
        let confidence_degradation = low_confidence_rate - baseline_low_confidence_rate;

        let trend = if current_mean >= baseline_mean * 0.95 {
            ConfidenceTrend::Stable
        } else if current_mean >= baseline_mean * 0.8 {
            ConfidenceTrend::Declining
        } else {
            ConfidenceTrend::Degraded
        };

        debug!(
            drift_score = score.score,
            degradation = confidence_degradation,
            trend = ?trend,
            "confidence analysis complete"
        );

        Ok(ConfidenceAnalysis {
            drift_score: score.score,
            drift_level: score.level,
            metrics: score.metrics,
            baseline_mean,
            current_mean,
            baseline_std,
            current_std,
            low_confidence_rate,
            baseline_low_confidence_rate,
            confidence_degradation,
            trend,
        })
    }
}

impl Default for ConfidenceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn population_std(data: &Array1<f64>, mean: f64) -> f64 {
    let variance = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

fn low_fraction(data: &Array1<f64>, threshold: f64) -> f64 {
    data.iter().filter(|&&v| v < threshold).count() as f64 / data.len() as f64
}
