//! Regular grids. Created once per run and never mutated.

use crate::error::{ensure_positive, Result, WaveError};
use ndarray::Array1;

/// Uniform 1D grid with `nx` points at spacing `dx`, starting at `x = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid1D {
    nx: usize,
    dx: f64,
}

impl Grid1D {
    pub fn new(nx: usize, dx: f64) -> Result<Self> {
        if nx < 2 {
            return Err(WaveError::config("nx", format!("need at least 2 points, got {nx}")));
        }
        ensure_positive("dx", dx)?;
        Ok(Self { nx, dx })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Physical coordinate of index `i`
    pub fn x_coord(&self, i: usize) -> f64 {
        self.dx * i as f64
    }

    pub fn coordinates(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nx).map(|i| self.x_coord(i)))
    }

    /// Distance between the first and last point
    pub fn width(&self) -> f64 {
        (self.nx - 1) as f64 * self.dx
    }

    /// Nearest grid index to physical coordinate `x`.
    pub fn index_of(&self, x: f64) -> Result<usize> {
        if !x.is_finite() || x < 0.0 || x > self.width() {
            return Err(WaveError::config(
                "position",
                format!("x = {x} lies outside [0, {}]", self.width()),
            ));
        }
        Ok(((x / self.dx).round() as usize).min(self.nx - 1))
    }
}

/// Uniform 2D grid, indexed `[i, k]` with `i` along x and `k` along z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2D {
    nx: usize,
    nz: usize,
    dx: f64,
    dz: f64,
}

impl Grid2D {
    pub fn new(nx: usize, nz: usize, dx: f64, dz: f64) -> Result<Self> {
        if nx < 2 || nz < 2 {
            return Err(WaveError::config(
                "extent",
                format!("need at least 2 points per axis, got ({nx}, {nz})"),
            ));
        }
        ensure_positive("dx", dx)?;
        ensure_positive("dz", dz)?;
        Ok(Self { nx, nz, dx, dz })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn nz(&self) -> usize {
        self.nz
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dz(&self) -> f64 {
        self.dz
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.nz)
    }

    pub fn min_spacing(&self) -> f64 {
        self.dx.min(self.dz)
    }

    pub fn x_coord(&self, i: usize) -> f64 {
        self.dx * i as f64
    }

    pub fn z_coord(&self, k: usize) -> f64 {
        self.dz * k as f64
    }

    pub fn x_coordinates(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nx).map(|i| self.x_coord(i)))
    }

    pub fn z_coordinates(&self) -> Array1<f64> {
        Array1::from_iter((0..self.nz).map(|k| self.z_coord(k)))
    }

    pub fn width(&self) -> f64 {
        (self.nx - 1) as f64 * self.dx
    }

    pub fn height(&self) -> f64 {
        (self.nz - 1) as f64 * self.dz
    }

    pub fn in_bounds(&self, i: usize, k: usize) -> bool {
        i < self.nx && k < self.nz
    }

    /// Nearest grid indices to the physical point `(x, z)`
    pub fn index_of(&self, x: f64, z: f64) -> Result<(usize, usize)> {
        let inside = |v: f64, max: f64| v.is_finite() && (0.0..=max).contains(&v);
        if !inside(x, self.width()) || !inside(z, self.height()) {
            return Err(WaveError::config(
                "position",
                format!(
                    "({x}, {z}) lies outside [0, {}] x [0, {}]",
                    self.width(),
                    self.height()
                ),
            ));
        }
        let i = ((x / self.dx).round() as usize).min(self.nx - 1);
        let k = ((z / self.dz).round() as usize).min(self.nz - 1);
        Ok((i, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grid_1d() {
        let grid = Grid1D::new(11, 0.5).unwrap();
        assert_eq!(grid.nx(), 11);
        assert_abs_diff_eq!(grid.width(), 5.0);
        assert_abs_diff_eq!(grid.coordinates()[10], 5.0);
        assert_eq!(grid.index_of(2.6).unwrap(), 5);
        assert!(grid.index_of(5.5).is_err());
        assert!(grid.index_of(-0.1).is_err());
    }

    #[test]
    fn test_grid_2d() {
        let grid = Grid2D::new(10, 20, 1.0, 2.0).unwrap();
        assert_eq!(grid.shape(), (10, 20));
        assert_abs_diff_eq!(grid.height(), 38.0);
        assert_abs_diff_eq!(grid.min_spacing(), 1.0);
        assert_eq!(grid.index_of(4.4, 10.2).unwrap(), (4, 5));
        assert!(grid.in_bounds(9, 19));
        assert!(!grid.in_bounds(10, 0));
    }

    #[test]
    fn test_invalid_grids() {
        assert!(Grid1D::new(1, 1.0).is_err());
        assert!(Grid1D::new(10, 0.0).is_err());
        assert!(Grid2D::new(10, 10, 1.0, -1.0).is_err());
        assert!(Grid2D::new(0, 10, 1.0, 1.0).is_err());
    }
}
