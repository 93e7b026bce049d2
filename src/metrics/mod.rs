//! Drift metric functions
//!
//! Each metric compares a baseline sample against a current sample and
//! returns a scalar plus a structured diagnostic. Metrics never fail:
//! inputs that cannot be scored (empty samples) yield a zero scalar with
//! an `Undetermined` diagnostic that callers must check.

mod ks;
mod psi;
mod wasserstein;

pub use ks::ks;
pub use psi::{psi, DEFAULT_PSI_BINS};
pub use wasserstein::wasserstein;

use serde::{Deserialize, Serialize};

/// Per-bin breakdown of a PSI computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiBin {
    /// Bin range as a half-open interval
    pub bin_range: String,
    /// Baseline frequency for this bin (epsilon-smoothed)
    pub expected_pct: f64,
    /// Current frequency for this bin (epsilon-smoothed)
    pub actual_pct: f64,
    /// This bin's contribution to the total PSI
    pub psi_contribution: f64,
}

/// Structured diagnostic attached to every metric result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricDiagnostic {
    /// PSI bin-level breakdown
    Psi {
        total_psi: f64,
        bins: Vec<PsiBin>,
        interpretation: String,
    },
    /// KS test statistic with asymptotic p-value
    Ks {
        statistic: f64,
        p_value: f64,
        is_significant: bool,
        interpretation: String,
    },
    /// Wasserstein distance, raw and normalized by baseline range
    Wasserstein {
        distance: f64,
        normalized: f64,
        interpretation: String,
    },
    /// The metric could not be computed; the scalar 0 carries no meaning
    Undetermined { reason: String },
}

impl MetricDiagnostic {
    /// Human-readable interpretation of the metric result
    pub fn interpretation(&self) -> &str {
        match self {
            Self::Psi { interpretation, .. }
            | Self::Ks { interpretation, .. }
            | Self::Wasserstein { interpretation, .. } => interpretation,
            Self::Undetermined { reason } => reason,
        }
    }

    /// True when the metric could not be computed from its inputs
    pub fn is_undetermined(&self) -> bool {
        matches!(self, Self::Undetermined { .. })
    }

    /// Diagnostic for inputs where either sample is empty
    pub(crate) fn empty_input() -> Self {
        Self::Undetermined {
            reason: "Empty arrays provided".to_string(),
        }
    }
}
