//! Courant-Friedrichs-Lewy checks for the explicit schemes
//!
//! The engines never detect instability at run time. Callers derive `dt`
//! from a safety factor `eps < 1` with [`stable_time_step`], or validate a
//! user-chosen `dt` with [`check_cfl`] before building an engine.

use crate::error::{ensure_positive, Result, WaveError};

/// Courant number `c * dt / dx`
pub fn courant_number(dt: f64, spacing: f64, velocity: f64) -> f64 {
    velocity * dt / spacing
}

fn check_safety_factor(eps: f64) -> Result<()> {
    if eps.is_finite() && eps > 0.0 && eps < 1.0 {
        Ok(())
    } else {
        Err(WaveError::config(
            "eps",
            format!("stability factor must lie in (0, 1), got {eps}"),
        ))
    }
}

/// Largest time step allowed by `dt <= eps * dx / c_max`
pub fn stable_time_step(eps: f64, spacing: f64, max_velocity: f64) -> Result<f64> {
    check_safety_factor(eps)?;
    ensure_positive("spacing", spacing)?;
    ensure_positive("velocity", max_velocity)?;
    Ok(eps * spacing / max_velocity)
}

/// Reject `dt` when it exceeds `eps * dx / c_max`
pub fn check_cfl(dt: f64, spacing: f64, max_velocity: f64, eps: f64) -> Result<()> {
    ensure_positive("dt", dt)?;
    let dt_max = stable_time_step(eps, spacing, max_velocity)?;
    if dt > dt_max {
        return Err(WaveError::CflViolation { dt, dt_max });
    }
    Ok(())
}
