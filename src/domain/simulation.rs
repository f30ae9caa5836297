//! High-level drivers: build an engine from a config, run it to the end and
//! collect snapshots

use crate::config::{Acoustic2DConfig, Elastic1DConfig};
use crate::domain::acoustic_2d::Acoustic2D;
use crate::domain::elastic_1d::Elastic1D;
use crate::engine::operator::DerivativeMethod;
use crate::error::{Result, WaveError};
use ndarray::{Array1, Array2};

/// Velocity and stress of a 1D elastic run at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticState {
    pub velocity: Array1<f64>,
    pub stress: Array1<f64>,
}

impl ElasticState {
    fn capture(engine: &Elastic1D) -> Self {
        Self {
            velocity: engine.velocity().to_owned(),
            stress: engine.stress().to_owned(),
        }
    }
}

/// A field saved after `step` steps
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<F> {
    pub step: usize,
    pub time: f64,
    pub field: F,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct SimulationResult<F> {
    /// Fields saved every `save_interval` steps
    pub snapshots: Vec<Snapshot<F>>,
    /// Field after the last step
    pub final_field: F,
    /// Receiver traces, `[receiver, step]`
    pub seismograms: Array2<f64>,
    pub steps: usize,
    pub dt: f64,
}

fn check_interval(save_interval: Option<usize>) -> Result<()> {
    if save_interval == Some(0) {
        return Err(WaveError::config("save_interval", "must be at least 1"));
    }
    Ok(())
}

fn is_saved(step: usize, save_interval: Option<usize>) -> bool {
    matches!(save_interval, Some(interval) if step % interval == 0)
}

/// Run a 1D elastic simulation to completion
///
/// # Arguments
/// * `config` - Grid, medium, source and receivers
/// * `save_interval` - Save velocity and stress every this many steps
///
/// # Returns
/// * `SimulationResult` with the saved states and the velocity seismograms
pub fn simulate_elastic_1d(
    config: &Elastic1DConfig,
    save_interval: Option<usize>,
) -> Result<SimulationResult<ElasticState>> {
    check_interval(save_interval)?;
    let mut engine = Elastic1D::from_config(config)?;
    let mut snapshots = Vec::new();

    engine.run(|step, engine| {
        if is_saved(step, save_interval) {
            snapshots.push(Snapshot {
                step,
                time: engine.time(),
                field: ElasticState::capture(engine),
            });
        }
    });

    log::debug!(
        "elastic 1D simulation: {} steps, {} snapshots",
        engine.current_step(),
        snapshots.len()
    );

    Ok(SimulationResult {
        snapshots,
        final_field: ElasticState::capture(&engine),
        steps: engine.current_step(),
        dt: engine.dt(),
        seismograms: engine.receivers().traces().to_owned(),
    })
}

/// Run a 2D acoustic simulation to completion with the given Laplacian
pub fn simulate_acoustic_2d(
    config: &Acoustic2DConfig,
    method: DerivativeMethod,
    save_interval: Option<usize>,
) -> Result<SimulationResult<Array2<f64>>> {
    check_interval(save_interval)?;
    let mut engine = Acoustic2D::from_config(config, method)?;
    let mut snapshots = Vec::new();

    engine.run(|step, engine| {
        if is_saved(step, save_interval) {
            snapshots.push(Snapshot {
                step,
                time: engine.time(),
                field: engine.pressure().to_owned(),
            });
        }
    });

    log::debug!(
        "acoustic 2D simulation ({}): {} steps, {} snapshots",
        method.name(),
        engine.current_step(),
        snapshots.len()
    );

    Ok(SimulationResult {
        snapshots,
        final_field: engine.pressure().to_owned(),
        steps: engine.current_step(),
        dt: engine.dt(),
        seismograms: engine.receivers().traces().to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::field::all_finite;

    fn small_elastic() -> Elastic1DConfig {
        Elastic1DConfig {
            nx: 600,
            nt: 400,
            source_x: 300.0,
            receivers: vec![250.0, 350.0],
            ..Elastic1DConfig::default()
        }
    }

    #[test]
    fn test_elastic_snapshots() {
        let result = simulate_elastic_1d(&small_elastic(), Some(100)).unwrap();
        let steps: Vec<usize> = result.snapshots.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![100, 200, 300, 400]);
        assert_eq!(result.steps, 400);
        assert_eq!(result.seismograms.dim(), (2, 400));
        assert_eq!(result.snapshots[3].field, result.final_field);
        assert!(all_finite(&result.final_field.velocity));
        assert!((result.snapshots[0].time - 100.0 * result.dt).abs() < 1e-15);
    }

    #[test]
    fn test_symmetric_receivers() {
        let result = simulate_elastic_1d(&small_elastic(), None).unwrap();
        assert!(result.snapshots.is_empty());
        // Receivers 50 m either side of the source see the same velocity
        let peak = result.seismograms.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
        assert!(peak > 0.0);
        for it in 0..result.steps {
            let left = result.seismograms[[0, it]];
            let right = result.seismograms[[1, it]];
            assert!((left - right).abs() <= 1e-9 * peak);
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(simulate_elastic_1d(&small_elastic(), Some(0)).is_err());
    }

    #[test]
    fn test_acoustic_snapshots() {
        let config = Acoustic2DConfig {
            nx: 32,
            nz: 32,
            nt: 200,
            source_x: 160.0,
            source_z: 160.0,
            receivers: vec![[100.0, 160.0]],
            ..Acoustic2DConfig::default()
        };
        let method = DerivativeMethod::FiniteDifference { points: 5 };
        let result = simulate_acoustic_2d(&config, method, Some(100)).unwrap();
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.final_field.dim(), (32, 32));
        assert_eq!(result.seismograms.dim(), (1, 200));
        assert!(all_finite(&result.final_field));
    }
}
