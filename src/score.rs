//! Weighted drift score combining PSI, KS, and Wasserstein

use crate::error::{DriftError, Result};
use crate::metrics::{ks, psi, wasserstein, MetricDiagnostic, DEFAULT_PSI_BINS};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Discrete drift severity derived from the combined score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriftLevel {
    /// Combined score below 0.2
    Stable,
    /// Combined score in [0.2, 0.4)
    Warning,
    /// Combined score in [0.4, 0.6)
    Moderate,
    /// Combined score of 0.6 or above
    Critical,
}

impl DriftLevel {
    /// Map a combined score onto its severity bucket
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::Stable
        } else if score < 0.4 {
            Self::Warning
        } else if score < 0.6 {
            Self::Moderate
        } else {
            Self::Critical
        }
    }
}

/// Per-metric weights for the combined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftWeights {
    pub psi: f64,
    pub ks: f64,
    pub wasserstein: f64,
}

impl Default for DriftWeights {
    fn default() -> Self {
        Self {
            psi: 0.4,
            ks: 0.3,
            wasserstein: 0.3,
        }
    }
}

impl DriftWeights {
    /// Validate the weights: all entries finite and non-negative, sum
    /// within [0.99, 1.01] so the combined score stays in [0, 1]
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("psi", self.psi),
            ("ks", self.ks),
            ("wasserstein", self.wasserstein),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(DriftError::InvalidWeights(format!(
                    "{} weight must be finite and non-negative, got {}",
                    name, w
                )));
            }
        }

        let sum = self.psi + self.ks + self.wasserstein;
        if !(0.99..=1.01).contains(&sum) {
            return Err(DriftError::InvalidWeights(format!(
                "weights must sum to 1.0 (within 0.01), got {:.4}",
                sum
            )));
        }

        Ok(())
    }
}

/// One metric's contribution to a combined score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Raw metric scalar
    pub value: f64,
    /// Value normalized to [0, 1]
    pub normalized: f64,
    /// Structured diagnostic breakdown
    pub diagnostic: MetricDiagnostic,
}

/// Combined weighted drift score with its per-metric breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftScore {
    /// Weighted combination of the normalized metrics, in [0, 1]
    pub score: f64,
    /// Severity bucket for the combined score
    pub level: DriftLevel,
    /// Per-metric results keyed by metric name
    pub metrics: HashMap<String, MetricResult>,
}

impl DriftScore {
    /// Look up a metric result by name ("psi", "ks", "wasserstein")
    pub fn metric(&self, name: &str) -> Option<&MetricResult> {
        self.metrics.get(name)
    }

    /// True when any constituent metric could not be computed; the score
    /// carries no meaning in that case and must not be read as "no drift"
    pub fn undetermined(&self) -> bool {
        self.metrics
            .values()
            .any(|m| m.diagnostic.is_undetermined())
    }

    /// Serialize the score to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Compute the combined drift score with the default weights.
///
/// PSI is normalized as `min(psi / 0.5, 1.0)`, the KS statistic is used
/// as-is, and the Wasserstein contribution is its baseline-range-normalized
/// distance. The combined score is the weighted sum of the three.
pub fn combined_score(baseline: &Array1<f64>, current: &Array1<f64>) -> DriftScore {
    combine(baseline, current, &DriftWeights::default())
}

/// Compute the combined drift score with caller-supplied weights,
/// validating them first.
pub fn combined_score_with(
    baseline: &Array1<f64>,
    current: &Array1<f64>,
    weights: &DriftWeights,
) -> Result<DriftScore> {
    weights.validate()?;
    Ok(combine(baseline, current, weights))
}

fn combine(baseline: &Array1<f64>, current: &Array1<f64>, weights: &DriftWeights) -> DriftScore {
    let (psi_value, psi_diag) = psi(baseline, current, DEFAULT_PSI_BINS);
    let (ks_value, ks_diag) = ks(baseline, current);
    let (w_value, w_diag) = wasserstein(baseline, current);

    // PSI of 0.5 or more counts as maximum severity
    let psi_normalized = (psi_value / 0.5).min(1.0);
    let ks_normalized = ks_value;
    let w_normalized = match &w_diag {
        MetricDiagnostic::Wasserstein { normalized, .. } => *normalized,
        _ => 0.0,
    };

    let score = weights.psi * psi_normalized
        + weights.ks * ks_normalized
        + weights.wasserstein * w_normalized;
    let level = DriftLevel::from_score(score);

    let mut metrics = HashMap::new();
    metrics.insert(
        "psi".to_string(),
        MetricResult {
            value: psi_value,
            normalized: psi_normalized,
            diagnostic: psi_diag,
        },
    );
    metrics.insert(
        "ks".to_string(),
        MetricResult {
            value: ks_value,
            normalized: ks_normalized,
            diagnostic: ks_diag,
        },
    );
    metrics.insert(
        "wasserstein".to_string(),
        MetricResult {
            value: w_value,
            normalized: w_normalized,
            diagnostic: w_diag,
        },
    );

    let result = DriftScore {
        score,
        level,
        metrics,
    };

    if result.undetermined() {
        warn!(score = result.score, "drift score undetermined, input sample was empty");
    } else {
        debug!(score = result.score, level = ?result.level, "combined drift score");
    }

    result
}
