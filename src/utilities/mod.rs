//! Utility functions for wave simulations: sources and stability checks

pub mod sources;
pub mod stability;

pub use sources::{
    gaussian_derivative, spatial_weight_1d, spatial_weight_2d, SourceWavelet, WaveletKind,
};
pub use stability::{check_cfl, courant_number, stable_time_step};
