//! Taylor-derived finite-difference stencils


use approx::assert_abs_diff_eq;
use ndarray::Array1;
use test_utils::*;
use wavestep::engine::stencil::{fd_weights, StaggeredStencil, Stencil};
use wavestep::error::WaveError;

fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

#[test]
fn test_three_point_second_derivative() {
    let w = fd_weights(3, 2).unwrap();
    assert_eq!(w.len(), 3);
    assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w[1], -2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w[2], 1.0, epsilon = 1e-12);
}

#[test]
fn test_polynomial_moments() {
    // sum_j w_j o_j^k = n! when k == n, 0 otherwise, for every k < nop
    for nop in (3..=9).step_by(2) {
        for n in 0..nop {
            let stencil = Stencil::centered(nop, n).unwrap();
            for k in 0..nop {
                let terms: Vec<f64> = stencil
                    .taps()
                    .map(|(o, w)| w * (o as f64).powi(k as i32))
                    .collect();
                let scale = terms.iter().fold(1.0_f64, |a, t| a.max(t.abs()));
                let moment: f64 = terms.iter().sum();
                let expected = if k == n { factorial(n) } else { 0.0 };
                assert!(
                    (moment - expected).abs() <= 1e-7 * scale,
                    "nop={nop} n={n} k={k}: {moment} vs {expected}"
                );
            }
        }
    }
}

#[test]
fn test_polynomial_derivative_on_grid() {
    // Exact for polynomials of degree < nop
    let h = 0.1;
    let x = Array1::from_iter((0..40).map(|i| -2.0 + i as f64 * h));
    let f = x.mapv(|x| 2.0 * x.powi(4) - x.powi(3) + 0.5 * x - 3.0);
    let d2 = x.mapv(|x| 24.0 * x.powi(2) - 6.0 * x);

    for nop in [5, 7, 9] {
        let stencil = Stencil::centered(nop, 2).unwrap();
        let mut out = Array1::zeros(x.len());
        stencil.apply(f.view(), h, out.view_mut());
        let half = stencil.half_width();
        for i in half..x.len() - half {
            assert_abs_diff_eq!(out[i], d2[i], epsilon = 1e-5);
        }
        // Edges are not evaluated
        assert_eq!(out[0], 0.0);
        assert_eq!(out[x.len() - 1], 0.0);
    }
}

#[test]
fn test_symmetry() {
    for nop in (3..=9).step_by(2) {
        let even = fd_weights(nop, 2).unwrap();
        let odd = fd_weights(nop, 1).unwrap();
        for j in 0..nop {
            assert_abs_diff_eq!(even[j], even[nop - 1 - j], epsilon = 1e-9);
            assert_abs_diff_eq!(odd[j], -odd[nop - 1 - j], epsilon = 1e-9);
        }
    }
}

#[test]
fn test_invalid_stencils() {
    assert!(matches!(fd_weights(4, 2), Err(WaveError::InvalidStencil { .. })));
    assert!(matches!(fd_weights(1, 0), Err(WaveError::InvalidStencil { .. })));
    assert!(matches!(fd_weights(5, 5), Err(WaveError::InvalidStencil { .. })));
    assert!(StaggeredStencil::first_derivative(3).is_err());
}

#[test]
fn test_staggered_matches_centered_half_grid() {
    // A 4-point staggered stencil at spacing h is exact for cubics
    let stencil = StaggeredStencil::first_derivative(4).unwrap();
    let h = 0.5;
    let n = 20;
    // forward: samples at x_i - h/2
    let samples = Array1::from_iter((0..n).map(|i| {
        let x = i as f64 * h - h / 2.0;
        x.powi(3)
    }));
    let mut out = Array1::zeros(n);
    stencil.forward(samples.view(), h, out.view_mut());
    let expected = Array1::from_iter((0..n).map(|i| 3.0 * (i as f64 * h).powi(2)));
    let half = stencil.half_width();
    let interior = out.slice(ndarray::s![half..n - half]);
    let reference = expected.slice(ndarray::s![half..n - half]);
    assert!(max_abs_diff(&interior, &reference) < 1e-10);
}
