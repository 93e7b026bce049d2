//! driftwatch - Statistical drift detection and scoring
//!
//! This crate computes and scores statistical drift between a baseline
//! sample and a current sample using three independent metrics, then
//! combines them into a single weighted severity score:
//! - [`metrics`] - PSI, KS statistic, and Wasserstein distance, each with
//!   a structured diagnostic breakdown
//! - [`score`] - Normalization, configurable weights, and the discrete
//!   drift level (STABLE/WARNING/MODERATE/CRITICAL)
//! - [`detector`] - Per-metric detectors producing timestamped reports,
//!   plus the caller-owned report history
//! - [`analysis`] - Subgroup and confidence drift built atop the combiner,
//!   and the categorical frequency shift
//! - [`stats`] - Sample statistics and single-observation screening
//!
//! Every computation is a deterministic pure function of the two input
//! samples. Metrics never panic on bad input: empty samples yield an
//! `Undetermined` diagnostic that callers must distinguish from a genuine
//! zero score.
//!
//! ```
//! use driftwatch::prelude::*;
//! use ndarray::Array1;
//!
//! let baseline = Array1::from_vec((0..100).map(|i| (i % 10) as f64).collect());
//! let current = Array1::from_vec((0..100).map(|i| ((i + 3) % 10) as f64).collect());
//!
//! let result = combined_score(&baseline, &current);
//! assert_eq!(result.level, DriftLevel::Stable);
//! ```

pub mod error;

pub mod analysis;
pub mod detector;
pub mod metrics;
pub mod score;
pub mod stats;

pub use error::{DriftError, Result};

/// Commonly used types and functions
pub mod prelude {
    pub use crate::analysis::{
        frequency_shift, ConfidenceAnalyzer, ConfidenceTrend, SubgroupAnalyzer, SubgroupResult,
    };
    pub use crate::detector::{
        Detector, DriftHistory, DriftReport, KsDetector, MetricOutcome, PsiDetector,
        WassersteinDetector,
    };
    pub use crate::error::{DriftError, Result};
    pub use crate::metrics::{ks, psi, wasserstein, MetricDiagnostic, DEFAULT_PSI_BINS};
    pub use crate::score::{
        combined_score, combined_score_with, DriftLevel, DriftScore, DriftWeights, MetricResult,
    };
    pub use crate::stats::{Outlier, SampleStats};
}
