//! Error types shared by the stencil generator, the spectral operator and the engines

use thiserror::Error;

/// Errors raised while building operators or engines.
///
/// Every variant is reported synchronously at construction time, before any
/// time stepping starts. Nothing here is retried or corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveError {
    #[error("invalid configuration for `{parameter}`: {reason}")]
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },

    #[error("invalid stencil ({points} points, derivative order {order}): {reason}")]
    InvalidStencil {
        points: usize,
        order: usize,
        reason: String,
    },

    #[error("singular Taylor system for a {points}-point stencil of derivative order {order}")]
    DegenerateStencil { points: usize, order: usize },

    #[error("time step {dt:e} violates the stability bound (dt_max = {dt_max:e})")]
    CflViolation { dt: f64, dt_max: f64 },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

impl WaveError {
    pub(crate) fn config(parameter: &'static str, reason: impl Into<String>) -> Self {
        WaveError::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, WaveError>;

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WaveError::config(
            parameter,
            format!("must be finite and positive, got {value}"),
        ))
    }
}
