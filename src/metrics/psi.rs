//! Population Stability Index

use super::{MetricDiagnostic, PsiBin};
use ndarray::Array1;

/// Default number of histogram bins for PSI
pub const DEFAULT_PSI_BINS: usize = 10;

/// Smoothing term guarding against log(0) and zero-width edge bins
const EPSILON: f64 = 1e-10;

/// Compute the Population Stability Index between two samples.
///
/// Both samples are binned over their shared value range into `bins`
/// equal-width bins, and PSI = Σ (actual_pct − expected_pct) ×
/// ln(actual_pct / expected_pct) over the bins. Interpretation: < 0.1 no
/// significant change, < 0.25 moderate, otherwise significant.
///
/// Either sample empty yields `(0.0, Undetermined)`.
pub fn psi(baseline: &Array1<f64>, current: &Array1<f64>, bins: usize) -> (f64, MetricDiagnostic) {
    if baseline.is_empty() || current.is_empty() {
        return (0.0, MetricDiagnostic::empty_input());
    }

    let bins = bins.max(1);

    // Shared range over both samples, widened so every value falls strictly
    // inside the histogram even when the range is degenerate
    let min_val = baseline
        .iter()
        .chain(current.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max_val = baseline
        .iter()
        .chain(current.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let lo = min_val - EPSILON;
    let hi = max_val + EPSILON;
    let bin_width = (hi - lo) / bins as f64;

    let expected_pct = histogram_pct(baseline, lo, bin_width, bins);
    let actual_pct = histogram_pct(current, lo, bin_width, bins);

    let mut total = 0.0;
    let mut breakdown = Vec::with_capacity(bins);
    for i in 0..bins {
        let contribution = (actual_pct[i] - expected_pct[i]) * (actual_pct[i] / expected_pct[i]).ln();
        total += contribution;
        breakdown.push(PsiBin {
            bin_range: format!(
                "[{:.3}, {:.3})",
                lo + i as f64 * bin_width,
                lo + (i + 1) as f64 * bin_width
            ),
            expected_pct: expected_pct[i],
            actual_pct: actual_pct[i],
            psi_contribution: contribution,
        });
    }

    let diagnostic = MetricDiagnostic::Psi {
        total_psi: total,
        bins: breakdown,
        interpretation: interpret(total),
    };

    (total, diagnostic)
}

/// Epsilon-smoothed per-bin frequencies for one sample
fn histogram_pct(data: &Array1<f64>, lo: f64, bin_width: f64, bins: usize) -> Vec<f64> {
    let n = data.len() as f64;
    let mut counts = vec![0usize; bins];

    for &value in data {
        let bin = ((value - lo) / bin_width).floor() as usize;
        counts[bin.min(bins - 1)] += 1;
    }

    counts
        .iter()
        .map(|&c| (c as f64 / n) + EPSILON)
        .collect()
}

fn interpret(psi: f64) -> String {
    if psi < 0.1 {
        "No significant change".to_string()
    } else if psi < 0.25 {
        "Moderate change - monitoring recommended".to_string()
    } else {
        "Significant change - investigation required".to_string()
    }
}
