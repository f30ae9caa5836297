//! Owned field buffers and two-level time storage
//!
//! Leapfrog schemes need the field at the current and the previous time
//! level. [`TimeLevels`] owns both buffers; advancing rotates them together
//! with a caller-owned scratch buffer, so no step allocates.

use ndarray::{Array, Dimension, ShapeBuilder};

pub type Field1D = ndarray::Array1<f64>;
pub type Field2D = ndarray::Array2<f64>;

/// Current and previous time level of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeLevels<D: Dimension> {
    current: Array<f64, D>,
    previous: Array<f64, D>,
}

impl<D: Dimension> TimeLevels<D> {
    /// Both levels zero-initialized
    pub fn zeros<Sh>(shape: Sh) -> Self
    where
        Sh: ShapeBuilder<Dim = D> + Clone,
    {
        Self {
            current: Array::zeros(shape.clone()),
            previous: Array::zeros(shape),
        }
    }

    pub fn current(&self) -> &Array<f64, D> {
        &self.current
    }

    pub fn previous(&self) -> &Array<f64, D> {
        &self.previous
    }

    /// Install `next` as the current level.
    ///
    /// After the call `previous` holds the old current level and `next`
    /// holds the old previous level, ready to be overwritten.
    pub fn advance(&mut self, next: &mut Array<f64, D>) {
        debug_assert_eq!(next.shape(), self.current.shape());
        std::mem::swap(&mut self.previous, &mut self.current);
        std::mem::swap(&mut self.current, next);
    }
}

/// Largest absolute value of a field, NaN if any entry is NaN.
pub fn max_abs<D: Dimension>(field: &Array<f64, D>) -> f64 {
    field.iter().fold(0.0_f64, |acc, &v| {
        if v.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(v.abs())
        }
    })
}

/// True when every entry is finite
pub fn all_finite<D: Dimension>(field: &Array<f64, D>) -> bool {
    field.iter().all(|v| v.is_finite())
}
