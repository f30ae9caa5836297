//! Finite-difference stencils derived from truncated Taylor expansions
//!
//! A stencil with sample offsets `o_j` approximates the `n`-th derivative at
//! the origin when its weights `w_j` satisfy
//!
//! ```text
//! sum_j w_j * o_j^i = n!   if i == n
//!                   = 0    otherwise,      for i = 0 .. len-1
//! ```
//!
//! which is a Vandermonde system solved once with an LU decomposition. The
//! weights are for unit spacing; callers scale by `1 / dx^n`.

use crate::error::{Result, WaveError};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

/// Solve the Taylor system for arbitrary sample offsets.
fn taylor_weights(offsets: &[f64], order: usize) -> Result<Vec<f64>> {
    let len = offsets.len();
    let matrix = DMatrix::from_fn(len, len, |i, j| offsets[j].powi(i as i32));
    let mut rhs = DVector::zeros(len);
    rhs[order] = factorial(order);

    let weights = matrix
        .lu()
        .solve(&rhs)
        .ok_or(WaveError::DegenerateStencil {
            points: len,
            order,
        })?;

    if weights.iter().any(|w| !w.is_finite()) {
        return Err(WaveError::DegenerateStencil {
            points: len,
            order,
        });
    }

    Ok(weights.iter().copied().collect())
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

/// Weights of the centered `nop`-point stencil for the `n`-th derivative.
///
/// `nop` must be odd and at least 3, and `n < nop`. The result is at unit
/// spacing: `[1, -2, 1]` for `fd_weights(3, 2)`.
pub fn fd_weights(nop: usize, n: usize) -> Result<Array1<f64>> {
    let invalid = |reason: &str| WaveError::InvalidStencil {
        points: nop,
        order: n,
        reason: reason.to_string(),
    };
    if nop < 3 {
        return Err(invalid("a centered stencil needs at least 3 points"));
    }
    if nop % 2 == 0 {
        return Err(invalid("a centered stencil needs an odd number of points"));
    }
    if n >= nop {
        return Err(invalid("derivative order must be below the number of points"));
    }

    let half = (nop / 2) as f64;
    let offsets: Vec<f64> = (0..nop).map(|j| j as f64 - half).collect();
    Ok(Array1::from(taylor_weights(&offsets, n)?))
}

/// Centered finite-difference stencil at unit spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct Stencil {
    order: usize,
    weights: Array1<f64>,
}

impl Stencil {
    /// Build the centered `nop`-point stencil for the `order`-th derivative
    pub fn centered(nop: usize, order: usize) -> Result<Self> {
        Ok(Self {
            order,
            weights: fd_weights(nop, order)?,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Number of points on each side of the center
    pub fn half_width(&self) -> usize {
        self.weights.len() / 2
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// `(offset, weight)` pairs, ordered from the leftmost sample.
    pub fn taps(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        let half = self.half_width() as isize;
        self.weights
            .iter()
            .enumerate()
            .map(move |(j, &w)| (j as isize - half, w))
    }

    /// Unit-spacing combination of `samples` around interior index `i`.
    ///
    /// Panics if the stencil reaches past either end of `samples`.
    pub fn apply_at(&self, samples: ArrayView1<'_, f64>, i: usize) -> f64 {
        let start = i - self.half_width();
        self.weights
            .iter()
            .enumerate()
            .map(|(j, &w)| w * samples[start + j])
            .sum()
    }

    /// Physical derivative over the interior of a 1D field.
    ///
    /// The first and last `half_width()` entries of `out` are not written.
    pub fn apply(&self, field: ArrayView1<'_, f64>, spacing: f64, mut out: ArrayViewMut1<'_, f64>) {
        debug_assert_eq!(field.len(), out.len());
        let half = self.half_width();
        let n = field.len();
        if n <= 2 * half {
            return;
        }
        let scale = spacing.powi(self.order as i32).recip();
        for i in half..n - half {
            out[i] = self.apply_at(field, i) * scale;
        }
    }

    /// Physical derivative along `axis` of a 2D field.
    ///
    /// Every lane along `axis` is differentiated; lanes keep their edge
    /// entries (the first and last `half_width()` along `axis`) untouched.
    pub fn apply_along(
        &self,
        field: &Array2<f64>,
        axis: Axis,
        spacing: f64,
        out: &mut Array2<f64>,
    ) {
        debug_assert_eq!(field.dim(), out.dim());
        Zip::from(field.lanes(axis))
            .and(out.lanes_mut(axis))
            .for_each(|lane, out_lane| self.apply(lane, spacing, out_lane));
    }
}

/// First-derivative stencil on a staggered grid.
///
/// The samples sit at half-integer offsets `±1/2, ±3/2, ...` from the point
/// where the derivative is evaluated, so the number of points is even. Two
/// points give `[-1, 1]`, four give `[1/24, -9/8, 9/8, -1/24]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggeredStencil {
    weights: Array1<f64>,
}

impl StaggeredStencil {
    pub fn first_derivative(points: usize) -> Result<Self> {
        if points == 0 || points % 2 == 1 {
            return Err(WaveError::InvalidStencil {
                points,
                order: 1,
                reason: "a staggered stencil needs a positive even number of points".to_string(),
            });
        }
        let half = (points - 1) as f64 / 2.0;
        let offsets: Vec<f64> = (0..points).map(|j| j as f64 - half).collect();
        Ok(Self {
            weights: Array1::from(taylor_weights(&offsets, 1)?),
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn half_width(&self) -> usize {
        self.weights.len() / 2
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Interior range shared by both application directions
    fn interior(&self, n: usize) -> std::ops::Range<usize> {
        let half = self.half_width();
        if n <= 2 * half {
            0..0
        } else {
            half..n - half
        }
    }

    /// Derivative at point `i` of samples stored half a cell *ahead*
    /// (`field[i]` sits at `x_i - dx/2`, `field[i + 1]` at `x_i + dx/2`).
    pub fn forward(
        &self,
        field: ArrayView1<'_, f64>,
        spacing: f64,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        debug_assert_eq!(field.len(), out.len());
        let half = self.half_width();
        for i in self.interior(field.len()) {
            let start = i + 1 - half;
            let sum: f64 = self
                .weights
                .iter()
                .enumerate()
                .map(|(j, &w)| w * field[start + j])
                .sum();
            out[i] = sum / spacing;
        }
    }

    /// Derivative at point `i` of samples stored half a cell *behind*
    /// (`field[i - 1]` sits at `x_i - dx/2`, `field[i]` at `x_i + dx/2`).
    pub fn backward(
        &self,
        field: ArrayView1<'_, f64>,
        spacing: f64,
        mut out: ArrayViewMut1<'_, f64>,
    ) {
        debug_assert_eq!(field.len(), out.len());
        let half = self.half_width();
        for i in self.interior(field.len()) {
            let start = i - half;
            let sum: f64 = self
                .weights
                .iter()
                .enumerate()
                .map(|(j, &w)| w * field[start + j])
                .sum();
            out[i] = sum / spacing;
        }
    }
}
