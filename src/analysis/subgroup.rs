//! Subgroup drift analysis and categorical frequency shift

use crate::error::{DriftError, Result};
use crate::score::{combined_score_with, DriftLevel, DriftWeights, MetricResult};
use crate::stats::SampleStats;
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Drift result for a single category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubgroupResult {
    /// Both sides had observations and the combiner ran
    Analyzed {
        drift_score: f64,
        drift_level: DriftLevel,
        baseline_count: usize,
        current_count: usize,
        baseline_stats: SampleStats,
        current_stats: SampleStats,
        metrics: HashMap<String, MetricResult>,
    },
    /// One side had no observations for this category; not scored
    MissingData {
        baseline_count: usize,
        current_count: usize,
    },
}

impl SubgroupResult {
    /// True when the category was scored
    pub fn is_analyzed(&self) -> bool {
        matches!(self, Self::Analyzed { .. })
    }
}

/// Aggregate summary over all categories of an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubgroupSummary {
    /// Categories present on either side
    pub total_subgroups: usize,
    /// Categories with observations on both sides
    pub analyzed: usize,
    /// Mean combined score over analyzed categories
    pub avg_drift_score: f64,
    /// Maximum combined score over analyzed categories
    pub max_drift_score: f64,
    pub stable_count: usize,
    pub warning_count: usize,
    pub moderate_count: usize,
    pub critical_count: usize,
}

/// Full result of a subgroup analysis, categories in sorted order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgroupAnalysis {
    pub subgroups: BTreeMap<String, SubgroupResult>,
    pub summary: SubgroupSummary,
}

/// Analyzes drift within categorical partitions of two samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgroupAnalyzer {
    weights: DriftWeights,
}

impl SubgroupAnalyzer {
    /// Create an analyzer with the default score weights
    pub fn new() -> Self {
        Self {
            weights: DriftWeights::default(),
        }
    }

    /// Override the score weights; validated when the analysis runs
    pub fn with_weights(mut self, weights: DriftWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Partition both samples by label and score each category present on
    /// both sides.
    ///
    /// Labels and values are parallel slices per side. Categories with no
    /// observations on either side are reported as `MissingData` and
    /// excluded from the summary averages.
    pub fn analyze(
        &self,
        baseline_labels: &[String],
        baseline_values: &Array1<f64>,
        current_labels: &[String],
        current_values: &Array1<f64>,
    ) -> Result<SubgroupAnalysis> {
        if baseline_labels.len() != baseline_values.len() {
            return Err(DriftError::ValidationError(format!(
                "baseline labels ({}) and values ({}) differ in length",
                baseline_labels.len(),
                baseline_values.len()
            )));
        }
        if current_labels.len() != current_values.len() {
            return Err(DriftError::ValidationError(format!(
                "current labels ({}) and values ({}) differ in length",
                current_labels.len(),
                current_values.len()
            )));
        }
        self.weights.validate()?;

        let baseline_groups = group_values(baseline_labels, baseline_values);
        let current_groups = group_values(current_labels, current_values);

        let categories: BTreeSet<&String> = baseline_groups
            .keys()
            .chain(current_groups.keys())
            .collect();
        let categories: Vec<&String> = categories.into_iter().collect();

        let scored: Vec<(String, SubgroupResult)> = categories
            .par_iter()
            .map(|category| -> Result<(String, SubgroupResult)> {
                let baseline = baseline_groups.get(*category);
                let current = current_groups.get(*category);
                let baseline_count = baseline.map_or(0, Vec::len);
                let current_count = current.map_or(0, Vec::len);

                let result = match (baseline, current) {
                    (Some(b), Some(c)) if !b.is_empty() && !c.is_empty() => {
                        let b = Array1::from_vec(b.clone());
                        let c = Array1::from_vec(c.clone());
                        let score = combined_score_with(&b, &c, &self.weights)?;
                        SubgroupResult::Analyzed {
                            drift_score: score.score,
                            drift_level: score.level,
                            baseline_count,
                            current_count,
                            baseline_stats: SampleStats::from_array(&b),
                            current_stats: SampleStats::from_array(&c),
                            metrics: score.metrics,
                        }
                    }
                    _ => SubgroupResult::MissingData {
                        baseline_count,
                        current_count,
                    },
                };

                Ok(((*category).clone(), result))
            })
            .collect::<Result<Vec<_>>>()?;

        let subgroups: BTreeMap<String, SubgroupResult> = scored.into_iter().collect();
        let summary = summarize(&subgroups);

        debug!(
            total = summary.total_subgroups,
            analyzed = summary.analyzed,
            "subgroup analysis complete"
        );

        Ok(SubgroupAnalysis { subgroups, summary })
    }
}

impl Default for SubgroupAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn group_values(labels: &[String], values: &Array1<f64>) -> HashMap<String, Vec<f64>> {
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for (label, &value) in labels.iter().zip(values.iter()) {
        groups.entry(label.clone()).or_default().push(value);
    }
    groups
}

fn summarize(subgroups: &BTreeMap<String, SubgroupResult>) -> SubgroupSummary {
    let mut summary = SubgroupSummary {
        total_subgroups: subgroups.len(),
        ..SubgroupSummary::default()
    };

    let mut score_sum = 0.0;
    for result in subgroups.values() {
        if let SubgroupResult::Analyzed {
            drift_score,
            drift_level,
            ..
        } = result
        {
            summary.analyzed += 1;
            score_sum += drift_score;
            summary.max_drift_score = summary.max_drift_score.max(*drift_score);
            match drift_level {
                DriftLevel::Stable => summary.stable_count += 1,
                DriftLevel::Warning => summary.warning_count += 1,
                DriftLevel::Moderate => summary.moderate_count += 1,
                DriftLevel::Critical => summary.critical_count += 1,
            }
        }
    }

    if summary.analyzed > 0 {
        summary.avg_drift_score = score_sum / summary.analyzed as f64;
    }

    summary
}

/// Categorical frequency distributions and their total variation distance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyShift {
    /// Relative category frequencies in the baseline
    pub baseline_distribution: BTreeMap<String, f64>,
    /// Relative category frequencies in the current sample
    pub current_distribution: BTreeMap<String, f64>,
    /// Total variation distance between the two distributions, in [0, 1]
    pub distribution_shift: f64,
}

/// Compare the category frequency distributions of two keyed samples.
///
/// The shift is the total variation distance
/// ½ Σ |baseline_pct − current_pct| over the union of categories.
pub fn frequency_shift(baseline_labels: &[String], current_labels: &[String]) -> FrequencyShift {
    let baseline_distribution = relative_frequencies(baseline_labels);
    let current_distribution = relative_frequencies(current_labels);

    let categories: BTreeSet<&String> = baseline_distribution
        .keys()
        .chain(current_distribution.keys())
        .collect();

    let distribution_shift = categories
        .iter()
        .map(|cat| {
            let b = baseline_distribution.get(*cat).copied().unwrap_or(0.0);
            let c = current_distribution.get(*cat).copied().unwrap_or(0.0);
            (b - c).abs()
        })
        .sum::<f64>()
        / 2.0;

    FrequencyShift {
        baseline_distribution,
        current_distribution,
        distribution_shift,
    }
}

fn relative_frequencies(labels: &[String]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label.clone()).or_default() += 1;
    }

    let n = labels.len() as f64;
    counts
        .into_iter()
        .map(|(label, count)| (label, count as f64 / n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(groups: &[(&str, usize)]) -> Vec<String> {
        groups.iter()
            .flat_map(|(name, count)| std::iter::repeat(name.to_string()).take(*count))
            .collect()
    }

    #[test]
    fn test_subgroup_identical_samples() {
        let labels = labels(&[("a", 20), ("b", 20)]);
        let values = Array1::from_vec((0..40).map(|i| (i % 10) as f64).collect());

        let analysis = SubgroupAnalyzer::new()
            .analyze(&labels, &values, &labels, &values)
            .unwrap();

        assert_eq!(analysis.summary.total_subgroups, 2);
        assert_eq!(analysis.summary.analyzed, 2);
        assert_eq!(analysis.summary.stable_count, 2);
        assert!(analysis.summary.avg_drift_score < 0.05);
    }

    #[test]
    fn test_subgroup_missing_data() {
        // Category "c" only appears on the current side
        let baseline_labels = labels(&[("a", 10), ("b", 10)]);
        let baseline_values = Array1::from_vec((0..20).map(|i| (i % 5) as f64).collect());
        let current_labels = labels(&[("a", 10), ("b", 10), ("c", 5)]);
        let current_values = Array1::from_vec((0..25).map(|i| (i % 5) as f64).collect());

        let analysis = SubgroupAnalyzer::new()
            .analyze(
                &baseline_labels,
                &baseline_values,
                &current_labels,
                &current_values,
            )
            .unwrap();

        assert_eq!(analysis.summary.total_subgroups, 3);
        assert_eq!(analysis.summary.analyzed, 2);

        match &analysis.subgroups["c"] {
            SubgroupResult::MissingData {
                baseline_count,
                current_count,
            } => {
                assert_eq!(*baseline_count, 0);
                assert_eq!(*current_count, 5);
            }
            _ => panic!("expected missing data for category c"),
        }
    }

    #[test]
    fn test_subgroup_mismatched_lengths_rejected() {
        let labels = labels(&[("a", 3)]);
        let values = Array1::from_vec(vec![1.0, 2.0]);

        let result = SubgroupAnalyzer::new().analyze(&labels, &values, &labels, &values);
        assert!(matches!(result, Err(DriftError::ValidationError(_))));
    }

    #[test]
    fn test_subgroup_drifted_category() {
        let group_labels = labels(&[("a", 30), ("b", 30)]);
        let baseline_values = Array1::from_vec((0..60).map(|i| (i % 10) as f64).collect());
        // Category "b" shifts far away, "a" stays put
        let current_values = Array1::from_vec(
            (0..60)
                .map(|i| {
                    if i < 30 {
                        (i % 10) as f64
                    } else {
                        500.0 + (i % 10) as f64
                    }
                })
                .collect(),
        );

        let analysis = SubgroupAnalyzer::new()
            .analyze(
                &group_labels,
                &baseline_values,
                &group_labels,
                &current_values,
            )
            .unwrap();

        assert_eq!(analysis.summary.critical_count, 1);
        assert!(analysis.subgroups["b"].is_analyzed());
        match &analysis.subgroups["b"] {
            SubgroupResult::Analyzed { drift_level, .. } => {
                assert_eq!(*drift_level, DriftLevel::Critical)
            }
            _ => panic!("expected analyzed category b"),
        }
    }

    #[test]
    fn test_frequency_shift_identical() {
        let side = labels(&[("a", 5), ("b", 5)]);
        let shift = frequency_shift(&side, &side);
        assert!(shift.distribution_shift.abs() < 1e-12);
    }

    #[test]
    fn test_frequency_shift_disjoint() {
        let baseline = labels(&[("a", 5), ("b", 5)]);
        let current = labels(&[("c", 5), ("d", 5)]);
        let shift = frequency_shift(&baseline, &current);
        assert!((shift.distribution_shift - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_shift_partial() {
        // Baseline 50/50, current 75/25: TV distance 0.25
        let baseline = labels(&[("a", 10), ("b", 10)]);
        let current = labels(&[("a", 15), ("b", 5)]);
        let shift = frequency_shift(&baseline, &current);
        assert!((shift.distribution_shift - 0.25).abs() < 1e-12);
    }
}
