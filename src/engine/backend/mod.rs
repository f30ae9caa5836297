//! Compute backend abstraction layer
//!
//! Spectral derivatives only need forward and inverse complex FFTs, either of
//! a single signal or of every lane of a 2D field along one axis. The trait
//! keeps that surface small so another FFT provider can be slotted in.

use ndarray::{Array2, Axis};
use num_complex::Complex;

mod rustfft;

pub use self::rustfft::RustFFTBackend;

/// Trait defining the compute backend interface
pub trait ComputeBackend: Send + Sync {
    /// Forward FFT of a single signal, in place, unnormalized
    fn fft_1d(&self, data: &mut [Complex<f64>]);

    /// Inverse FFT of a single signal, in place, normalized by `1/n`
    fn ifft_1d(&self, data: &mut [Complex<f64>]);

    /// Forward FFT of every lane along `axis`
    fn fft_lanes(&self, data: &mut Array2<Complex<f64>>, axis: Axis);

    /// Inverse FFT of every lane along `axis`, normalized by the lane length
    fn ifft_lanes(&self, data: &mut Array2<Complex<f64>>, axis: Axis);

    /// Return the name of the backend for debugging/logging
    fn name(&self) -> &'static str;
}

/// Get the default compute backend
pub fn default_backend() -> Box<dyn ComputeBackend> {
    Box::new(RustFFTBackend::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend_creation() {
        let backend = default_backend();
        assert_eq!(backend.name(), "rustfft");
    }
}
