//! Integration test: metric functions and their diagnostics

use driftwatch::metrics::{ks, psi, wasserstein, MetricDiagnostic, DEFAULT_PSI_BINS};
use ndarray::Array1;

fn uniform_sample(n: usize, offset: f64) -> Array1<f64> {
    Array1::from_vec((0..n).map(|i| offset + (i % 10) as f64).collect())
}

#[test]
fn test_psi_zero_for_identical_samples() {
    let data = uniform_sample(200, 0.0);
    let (value, diag) = psi(&data, &data, DEFAULT_PSI_BINS);

    assert!(value.abs() < 1e-6);
    assert_eq!(diag.interpretation(), "No significant change");
}

#[test]
fn test_psi_detects_shift() {
    let baseline = uniform_sample(200, 0.0);
    let current = uniform_sample(200, 8.0);

    let (value, diag) = psi(&baseline, &current, DEFAULT_PSI_BINS);
    assert!(value > 0.25);
    assert!(!diag.is_undetermined());
}

#[test]
fn test_psi_breakdown_shape() {
    let baseline = uniform_sample(100, 0.0);
    let current = uniform_sample(100, 2.0);

    let (_, diag) = psi(&baseline, &current, 5);
    match diag {
        MetricDiagnostic::Psi { bins, .. } => {
            assert_eq!(bins.len(), 5);
            for bin in &bins {
                assert!(bin.expected_pct > 0.0);
                assert!(bin.actual_pct > 0.0);
                assert!(bin.bin_range.starts_with('['));
            }
        }
        _ => panic!("expected PSI diagnostic"),
    }
}

#[test]
fn test_ks_statistic_symmetric_and_bounded() {
    let a = uniform_sample(80, 0.0);
    let b = uniform_sample(120, 4.0);

    let (d_ab, _) = ks(&a, &b);
    let (d_ba, _) = ks(&b, &a);

    assert!((d_ab - d_ba).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&d_ab));
}

#[test]
fn test_ks_identical_samples_not_significant() {
    let data = uniform_sample(100, 0.0);
    let (statistic, diag) = ks(&data, &data);

    assert_eq!(statistic, 0.0);
    match diag {
        MetricDiagnostic::Ks {
            p_value,
            is_significant,
            ..
        } => {
            assert!((p_value - 1.0).abs() < 1e-10);
            assert!(!is_significant);
        }
        _ => panic!("expected KS diagnostic"),
    }
}

#[test]
fn test_ks_disjoint_samples_significant() {
    let baseline = uniform_sample(100, 0.0);
    let current = uniform_sample(100, 1000.0);

    let (statistic, diag) = ks(&baseline, &current);
    assert!((statistic - 1.0).abs() < 1e-10);
    match diag {
        MetricDiagnostic::Ks {
            p_value,
            is_significant,
            ..
        } => {
            assert!(p_value < 1e-6);
            assert!(is_significant);
        }
        _ => panic!("expected KS diagnostic"),
    }
}

#[test]
fn test_wasserstein_shift_distance() {
    let baseline = uniform_sample(100, 0.0);
    let current = uniform_sample(100, 3.0);

    let (distance, diag) = wasserstein(&baseline, &current);
    // Constant shift moves exactly that much mass per point
    assert!((distance - 3.0).abs() < 1e-10);
    match diag {
        MetricDiagnostic::Wasserstein { normalized, .. } => {
            assert!((normalized - 3.0 / 9.0).abs() < 1e-10);
        }
        _ => panic!("expected Wasserstein diagnostic"),
    }
}

#[test]
fn test_wasserstein_degenerate_baseline_normalizes_to_zero() {
    let baseline = Array1::from_vec(vec![7.0; 20]);
    let current = uniform_sample(20, 0.0);

    let (_, diag) = wasserstein(&baseline, &current);
    match diag {
        MetricDiagnostic::Wasserstein { normalized, .. } => assert_eq!(normalized, 0.0),
        _ => panic!("expected Wasserstein diagnostic"),
    }
}

#[test]
fn test_all_metrics_undetermined_on_empty_input() {
    let data = uniform_sample(10, 0.0);
    let empty = Array1::from_vec(vec![]);

    let (v, d) = psi(&data, &empty, DEFAULT_PSI_BINS);
    assert_eq!(v, 0.0);
    assert!(d.is_undetermined());

    let (v, d) = ks(&empty, &data);
    assert_eq!(v, 0.0);
    assert!(d.is_undetermined());

    let (v, d) = wasserstein(&empty, &empty);
    assert_eq!(v, 0.0);
    assert!(d.is_undetermined());
}
