//! Two-sample Kolmogorov-Smirnov test

use super::MetricDiagnostic;
use ndarray::Array1;
use std::cmp::Ordering;

/// Significance level for the two-sided test
const ALPHA: f64 = 0.05;

/// Compute the two-sample Kolmogorov-Smirnov statistic and its two-sided
/// asymptotic p-value.
///
/// The statistic is the maximum absolute difference between the two
/// empirical CDFs, found with a merge walk over the sorted samples. The
/// significance flag is `p < 0.05`.
///
/// Either sample empty yields `(0.0, Undetermined)`.
pub fn ks(baseline: &Array1<f64>, current: &Array1<f64>) -> (f64, MetricDiagnostic) {
    if baseline.is_empty() || current.is_empty() {
        return (0.0, MetricDiagnostic::empty_input());
    }

    let mut b_sorted: Vec<f64> = baseline.iter().copied().collect();
    let mut c_sorted: Vec<f64> = current.iter().copied().collect();
    b_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    c_sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n1 = b_sorted.len() as f64;
    let n2 = c_sorted.len() as f64;

    // Walk the pooled values, advancing both sides past each value (ties
    // included) before reading the ECDFs
    let mut i = 0;
    let mut j = 0;
    let mut statistic: f64 = 0.0;
    while i < b_sorted.len() || j < c_sorted.len() {
        let x = match (b_sorted.get(i), c_sorted.get(j)) {
            (Some(&b), Some(&c)) => b.min(c),
            (Some(&b), None) => b,
            (None, Some(&c)) => c,
            (None, None) => break,
        };
        while i < b_sorted.len() && b_sorted[i] <= x {
            i += 1;
        }
        while j < c_sorted.len() && c_sorted[j] <= x {
            j += 1;
        }
        statistic = statistic.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    let p_value = asymptotic_p_value(statistic, n1, n2);
    let is_significant = p_value < ALPHA;

    let diagnostic = MetricDiagnostic::Ks {
        statistic,
        p_value,
        is_significant,
        interpretation: interpret(p_value),
    };

    (statistic, diagnostic)
}

/// Two-sided asymptotic p-value via the Kolmogorov survival series
/// 2 * Σ_{k>=1} (-1)^{k-1} exp(-2 k² λ²), λ = D·√(n1·n2/(n1+n2))
fn asymptotic_p_value(statistic: f64, n1: f64, n2: f64) -> f64 {
    let lambda = statistic * (n1 * n2 / (n1 + n2)).sqrt();
    if lambda <= 0.0 {
        return 1.0;
    }

    let mut sum = 0.0;
    for k in 1..=100i32 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        sum += term;
        if term.abs() < 1e-10 {
            break;
        }
    }

    (2.0 * sum).clamp(0.0, 1.0)
}

fn interpret(p_value: f64) -> String {
    if p_value < 0.01 {
        format!("Highly significant difference (p={:.4})", p_value)
    } else if p_value < ALPHA {
        format!("Significant difference (p={:.4})", p_value)
    } else {
        format!("No significant difference (p={:.4})", p_value)
    }
}
