//! 1-D Wasserstein distance (Earth Mover's Distance)

use super::MetricDiagnostic;
use ndarray::Array1;
use std::cmp::Ordering;

/// Compute the 1-D Wasserstein distance between two samples.
///
/// The distance is the integral of the absolute difference of the two
/// empirical CDFs over the pooled support. The normalized value divides
/// by the baseline range (max − min), falling back to 0 when the baseline
/// is degenerate, and is clipped to 1.0 so it stays inside [0, 1].
///
/// Either sample empty yields `(0.0, Undetermined)`.
pub fn wasserstein(baseline: &Array1<f64>, current: &Array1<f64>) -> (f64, MetricDiagnostic) {
    if baseline.is_empty() || current.is_empty() {
        return (0.0, MetricDiagnostic::empty_input());
    }

    let mut b_sorted: Vec<f64> = baseline.iter().copied().collect();
    let mut c_sorted: Vec<f64> = current.iter().copied().collect();
    b_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    c_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n1 = b_sorted.len() as f64;
    let n2 = c_sorted.len() as f64;

    // Integrate |F_baseline - F_current| between consecutive pooled values
    let mut i = 0;
    let mut j = 0;
    let mut distance = 0.0;
    let mut prev: Option<f64> = None;
    loop {
        let x = match (b_sorted.get(i), c_sorted.get(j)) {
            (Some(&b), Some(&c)) => b.min(c),
            (Some(&b), None) => b,
            (None, Some(&c)) => c,
            (None, None) => break,
        };
        if let Some(p) = prev {
            distance += (i as f64 / n1 - j as f64 / n2).abs() * (x - p);
        }
        while i < b_sorted.len() && b_sorted[i] <= x {
            i += 1;
        }
        while j < c_sorted.len() && c_sorted[j] <= x {
            j += 1;
        }
        prev = Some(x);
    }

    let range = b_sorted[b_sorted.len() - 1] - b_sorted[0];
    let normalized = if range > 0.0 {
        (distance / range).min(1.0)
    } else {
        0.0
    };

    let diagnostic = MetricDiagnostic::Wasserstein {
        distance,
        normalized,
        interpretation: interpret(normalized),
    };

    (distance, diagnostic)
}

fn interpret(normalized: f64) -> String {
    if normalized < 0.1 {
        "Minimal distribution shift".to_string()
    } else if normalized < 0.3 {
        "Moderate distribution shift".to_string()
    } else {
        "Significant distribution shift".to_string()
    }
}
