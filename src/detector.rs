//! Detector layer
//!
//! One detector per metric, each mapping its raw metric onto a severity
//! level and producing a timestamped report. Detectors are stateless; the
//! caller accumulates reports in a [`DriftHistory`] if bookkeeping is
//! wanted.

use crate::error::{DriftError, Result};
use crate::metrics::{ks, psi, wasserstein, MetricDiagnostic, DEFAULT_PSI_BINS};
use crate::score::DriftLevel;
use crate::stats::SampleStats;
use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result shape for pluggable detectors, resolved once at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricOutcome {
    /// A metric scalar with its diagnostic
    ScalarPair {
        value: f64,
        diagnostic: MetricDiagnostic,
    },
    /// The detector produced something the scoring layer cannot read
    Unsupported { type_name: String },
}

impl MetricOutcome {
    /// Resolve the outcome into a usable pair, failing loudly on
    /// unsupported shapes rather than silently reporting no drift
    pub fn resolve(self) -> Result<(f64, MetricDiagnostic)> {
        match self {
            Self::ScalarPair { value, diagnostic } => Ok((value, diagnostic)),
            Self::Unsupported { type_name } => Err(DriftError::UnsupportedOutcome(type_name)),
        }
    }
}

/// Timestamped drift report for a single feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// When the report was produced
    pub timestamp: DateTime<Utc>,
    /// Feature the samples were drawn from
    pub feature_name: String,
    /// Detector-specific drift score
    pub drift_score: f64,
    /// Severity assigned by the detector
    pub drift_level: DriftLevel,
    /// Metric diagnostics keyed by detector name
    pub metrics: HashMap<String, MetricDiagnostic>,
    /// Baseline sample statistics
    pub baseline_stats: SampleStats,
    /// Current sample statistics
    pub current_stats: SampleStats,
}

impl DriftReport {
    /// True when the underlying metric could not be computed
    pub fn undetermined(&self) -> bool {
        self.metrics.values().any(|d| d.is_undetermined())
    }

    /// Serialize the report to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Trait for drift detectors
pub trait Detector: Send + Sync {
    /// Detector name, used as the metrics key in reports
    fn name(&self) -> &str;

    /// Run the underlying metric on the two samples
    fn compute(&self, baseline: &Array1<f64>, current: &Array1<f64>) -> MetricOutcome;

    /// Map a resolved metric onto a severity level
    fn classify(&self, value: f64, diagnostic: &MetricDiagnostic) -> DriftLevel;

    /// Score reported for the metric; defaults to the raw value
    fn score(&self, value: f64, _diagnostic: &MetricDiagnostic) -> f64 {
        value
    }

    /// Produce a timestamped report for the two samples.
    ///
    /// An `Undetermined` diagnostic classifies as `Stable` but keeps its
    /// marker in the report; check [`DriftReport::undetermined`].
    fn detect(
        &self,
        baseline: &Array1<f64>,
        current: &Array1<f64>,
        feature_name: &str,
    ) -> Result<DriftReport> {
        let (value, diagnostic) = self.compute(baseline, current).resolve()?;

        let drift_level = if diagnostic.is_undetermined() {
            DriftLevel::Stable
        } else {
            self.classify(value, &diagnostic)
        };
        let drift_score = self.score(value, &diagnostic);

        let mut metrics = HashMap::new();
        metrics.insert(self.name().to_string(), diagnostic);

        Ok(DriftReport {
            timestamp: Utc::now(),
            feature_name: feature_name.to_string(),
            drift_score,
            drift_level,
            metrics,
            baseline_stats: SampleStats::from_array(baseline),
            current_stats: SampleStats::from_array(current),
        })
    }
}

/// PSI-based drift detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsiDetector {
    bins: usize,
    threshold: f64,
}

impl PsiDetector {
    /// Create a detector with 10 bins and a 0.25 critical threshold
    pub fn new() -> Self {
        Self {
            bins: DEFAULT_PSI_BINS,
            threshold: 0.25,
        }
    }

    /// Set the number of histogram bins
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins.max(1);
        self
    }

    /// Set the critical PSI threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.max(0.1);
        self
    }
}

impl Default for PsiDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PsiDetector {
    fn name(&self) -> &str {
        "psi"
    }

    fn compute(&self, baseline: &Array1<f64>, current: &Array1<f64>) -> MetricOutcome {
        let (value, diagnostic) = psi(baseline, current, self.bins);
        MetricOutcome::ScalarPair { value, diagnostic }
    }

    fn classify(&self, value: f64, _diagnostic: &MetricDiagnostic) -> DriftLevel {
        if value < 0.1 {
            DriftLevel::Stable
        } else if value < self.threshold {
            DriftLevel::Warning
        } else {
            DriftLevel::Critical
        }
    }
}

/// KS-test-based drift detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KsDetector {
    alpha: f64,
}

impl KsDetector {
    /// Create a detector at significance level 0.05
    pub fn new() -> Self {
        Self { alpha: 0.05 }
    }

    /// Set the significance level
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.clamp(0.001, 0.5);
        self
    }
}

impl Default for KsDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for KsDetector {
    fn name(&self) -> &str {
        "ks"
    }

    fn compute(&self, baseline: &Array1<f64>, current: &Array1<f64>) -> MetricOutcome {
        let (value, diagnostic) = ks(baseline, current);
        MetricOutcome::ScalarPair { value, diagnostic }
    }

    fn classify(&self, _value: f64, diagnostic: &MetricDiagnostic) -> DriftLevel {
        let p_value = match diagnostic {
            MetricDiagnostic::Ks { p_value, .. } => *p_value,
            _ => return DriftLevel::Stable,
        };

        if p_value < 0.01 {
            DriftLevel::Critical
        } else if p_value < self.alpha {
            DriftLevel::Warning
        } else {
            DriftLevel::Stable
        }
    }
}

/// Wasserstein-distance-based drift detector
///
/// Reports the baseline-range-normalized distance as its score rather
/// than the raw distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WassersteinDetector {
    threshold: f64,
}

impl WassersteinDetector {
    /// Create a detector with a 0.3 critical threshold on the normalized
    /// distance
    pub fn new() -> Self {
        Self { threshold: 0.3 }
    }

    /// Set the critical threshold on the normalized distance
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.1, 1.0);
        self
    }

    fn normalized(diagnostic: &MetricDiagnostic) -> f64 {
        match diagnostic {
            MetricDiagnostic::Wasserstein { normalized, .. } => *normalized,
            _ => 0.0,
        }
    }
}

impl Default for WassersteinDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for WassersteinDetector {
    fn name(&self) -> &str {
        "wasserstein"
    }

    fn compute(&self, baseline: &Array1<f64>, current: &Array1<f64>) -> MetricOutcome {
        let (value, diagnostic) = wasserstein(baseline, current);
        MetricOutcome::ScalarPair { value, diagnostic }
    }

    fn classify(&self, _value: f64, diagnostic: &MetricDiagnostic) -> DriftLevel {
        let normalized = Self::normalized(diagnostic);
        if normalized < 0.1 {
            DriftLevel::Stable
        } else if normalized < self.threshold {
            DriftLevel::Warning
        } else {
            DriftLevel::Critical
        }
    }

    fn score(&self, _value: f64, diagnostic: &MetricDiagnostic) -> f64 {
        Self::normalized(diagnostic)
    }
}

/// Caller-owned append-only log of drift reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriftHistory {
    reports: Vec<DriftReport>,
}

impl DriftHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a report
    pub fn record(&mut self, report: DriftReport) {
        self.reports.push(report);
    }

    /// Iterate over recorded reports, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &DriftReport> {
        self.reports.iter()
    }

    /// Most recently recorded report
    pub fn latest(&self) -> Option<&DriftReport> {
        self.reports.last()
    }

    /// Number of recorded reports
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// True when no reports have been recorded
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Discard all recorded reports
    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifted_samples() -> (Array1<f64>, Array1<f64>) {
        let baseline = Array1::from_vec((0..100).map(|i| (i % 10) as f64).collect());
        let current = Array1::from_vec((0..100).map(|i| 50.0 + (i % 10) as f64).collect());
        (baseline, current)
    }

    #[test]
    fn test_psi_detector_levels() {
        let detector = PsiDetector::new();
        let diag = MetricDiagnostic::empty_input();

        assert_eq!(detector.classify(0.05, &diag), DriftLevel::Stable);
        assert_eq!(detector.classify(0.15, &diag), DriftLevel::Warning);
        assert_eq!(detector.classify(0.3, &diag), DriftLevel::Critical);
    }

    #[test]
    fn test_psi_detector_report() {
        let (baseline, current) = shifted_samples();
        let report = PsiDetector::new()
            .detect(&baseline, &current, "amount")
            .unwrap();

        assert_eq!(report.feature_name, "amount");
        assert_eq!(report.drift_level, DriftLevel::Critical);
        assert!(report.metrics.contains_key("psi"));
        assert_eq!(report.baseline_stats.count, 100);
        assert!(!report.undetermined());
    }

    #[test]
    fn test_ks_detector_report() {
        let (baseline, current) = shifted_samples();
        let report = KsDetector::new()
            .detect(&baseline, &current, "amount")
            .unwrap();

        // Disjoint supports: statistic 1.0, p near 0
        assert!((report.drift_score - 1.0).abs() < 1e-10);
        assert_eq!(report.drift_level, DriftLevel::Critical);
    }

    #[test]
    fn test_ks_detector_stable_on_identical() {
        let data = Array1::from_vec((0..100).map(|i| (i % 10) as f64).collect());
        let report = KsDetector::new().detect(&data, &data, "amount").unwrap();

        assert_eq!(report.drift_level, DriftLevel::Stable);
    }

    #[test]
    fn test_wasserstein_detector_reports_normalized() {
        let (baseline, current) = shifted_samples();
        let report = WassersteinDetector::new()
            .detect(&baseline, &current, "amount")
            .unwrap();

        // Score is the normalized distance, clipped to 1.0
        assert!((report.drift_score - 1.0).abs() < 1e-10);
        assert_eq!(report.drift_level, DriftLevel::Critical);
    }

    #[test]
    fn test_undetermined_report() {
        let data = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        let empty = Array1::from_vec(vec![]);

        let report = PsiDetector::new().detect(&data, &empty, "amount").unwrap();
        assert_eq!(report.drift_score, 0.0);
        assert_eq!(report.drift_level, DriftLevel::Stable);
        assert!(report.undetermined());
    }

    #[test]
    fn test_unsupported_outcome_propagates() {
        struct BrokenDetector;

        impl Detector for BrokenDetector {
            fn name(&self) -> &str {
                "broken"
            }

            fn compute(&self, _: &Array1<f64>, _: &Array1<f64>) -> MetricOutcome {
                MetricOutcome::Unsupported {
                    type_name: "matrix".to_string(),
                }
            }

            fn classify(&self, _: f64, _: &MetricDiagnostic) -> DriftLevel {
                DriftLevel::Stable
            }
        }

        let data = Array1::from_vec(vec![1.0, 2.0]);
        let result = BrokenDetector.detect(&data, &data, "amount");
        assert!(matches!(result, Err(DriftError::UnsupportedOutcome(_))));
    }

    #[test]
    fn test_history() {
        let data = Array1::from_vec((0..50).map(|i| i as f64).collect());
        let detector = PsiDetector::new();

        let mut history = DriftHistory::new();
        assert!(history.is_empty());

        history.record(detector.detect(&data, &data, "a").unwrap());
        history.record(detector.detect(&data, &data, "b").unwrap());

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().feature_name, "b");
        assert_eq!(history.iter().count(), 2);

        history.clear();
        assert!(history.is_empty());
    }
}
