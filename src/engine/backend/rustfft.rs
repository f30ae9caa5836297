//! RustFFT backend implementation
//!
//! Pure Rust implementation using the rustfft library.
//! This backend is available on all platforms.

use super::ComputeBackend;
use ndarray::{Array2, Axis};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Plans keyed by `(length, inverse)`
type PlanCache = HashMap<(usize, bool), Arc<dyn Fft<f64>>>;

/// RustFFT-based compute backend
///
/// Plans are built once per length and direction and shared afterwards, so
/// a time loop over fixed-size grids never re-plans.
pub struct RustFFTBackend {
    plans: Mutex<PlanCache>,
}

impl RustFFTBackend {
    /// Create a new RustFFT backend
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(HashMap::new()),
        }
    }

    fn plan(&self, len: usize, inverse: bool) -> Arc<dyn Fft<f64>> {
        // A panic elsewhere cannot leave the map half-written
        let mut plans = self.plans.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(plans.entry((len, inverse)).or_insert_with(|| {
            if !len.is_power_of_two() {
                log::debug!(
                    "FFT length {} is not a power of two, using the slower mixed-radix path",
                    len
                );
            }
            let mut planner = FftPlanner::new();
            if inverse {
                planner.plan_fft_inverse(len)
            } else {
                planner.plan_fft_forward(len)
            }
        }))
    }

    fn transform(&self, data: &mut [Complex<f64>], inverse: bool) {
        let len = data.len();
        if len == 0 {
            return;
        }
        self.plan(len, inverse).process(data);
        if inverse {
            let normalization = 1.0 / len as f64;
            for val in data.iter_mut() {
                *val *= normalization;
            }
        }
    }

    fn transform_lanes(&self, data: &mut Array2<Complex<f64>>, axis: Axis, inverse: bool) {
        let len = data.len_of(axis);
        if len == 0 {
            return;
        }
        let fft = self.plan(len, inverse);
        let normalization = if inverse { 1.0 / len as f64 } else { 1.0 };

        let mut buffer: Vec<Complex<f64>> = Vec::with_capacity(len);
        for mut lane in data.lanes_mut(axis) {
            buffer.clear();
            buffer.extend(lane.iter().copied());
            fft.process(&mut buffer);
            for (out, val) in lane.iter_mut().zip(buffer.iter()) {
                *out = *val * normalization;
            }
        }
    }
}

impl Default for RustFFTBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for RustFFTBackend {
    fn fft_1d(&self, data: &mut [Complex<f64>]) {
        self.transform(data, false);
    }

    fn ifft_1d(&self, data: &mut [Complex<f64>]) {
        self.transform(data, true);
    }

    fn fft_lanes(&self, data: &mut Array2<Complex<f64>>, axis: Axis) {
        self.transform_lanes(data, axis, false);
    }

    fn ifft_lanes(&self, data: &mut Array2<Complex<f64>>, axis: Axis) {
        self.transform_lanes(data, axis, true);
    }

    fn name(&self) -> &'static str {
        "rustfft"
    }
}
