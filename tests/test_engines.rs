//! End-to-end behaviour of the 1D elastic and 2D acoustic engines


use ndarray::{Array1, Array2};
use test_utils::*;
use wavestep::config::{Acoustic2DConfig, Elastic1DConfig};
use wavestep::domain::acoustic_2d::{Acoustic2D, DispersionComparison};
use wavestep::domain::elastic_1d::{Elastic1D, ElasticModel};
use wavestep::domain::grid::{Grid1D, Grid2D};
use wavestep::engine::field::all_finite;
use wavestep::engine::operator::DerivativeMethod;
use wavestep::engine::stencil::StaggeredStencil;

const METHODS: [DerivativeMethod; 2] = [
    DerivativeMethod::Spectral,
    DerivativeMethod::FiniteDifference { points: 5 },
];

#[test]
fn test_elastic_rest_state_without_source() {
    let grid = Grid1D::new(200, 1.0).unwrap();
    let model = ElasticModel::homogeneous(200, 4500.0, 2500.0).unwrap();
    let operator = StaggeredStencil::first_derivative(4).unwrap();
    let dt = 0.5 / 4500.0;
    let mut engine = Elastic1D::new(grid, model, operator, dt, 100, Array1::zeros(300)).unwrap();

    engine.run(|_, e| {
        assert!(e.velocity().iter().all(|&v| v == 0.0));
        assert!(e.stress().iter().all(|&s| s == 0.0));
    });
    assert_eq!(engine.current_step(), 300);
}

#[test]
fn test_acoustic_rest_state_without_source() {
    for method in METHODS {
        let grid = Grid2D::new(32, 32, 10.0, 10.0).unwrap();
        let velocity = Array2::from_elem((32, 32), 3000.0);
        let weight = Array2::from_elem((32, 32), 1.0);
        let mut engine =
            Acoustic2D::new(grid, velocity, method, 6e-4, weight, Array1::zeros(50)).unwrap();
        engine.run(|_, _| {});
        assert_eq!(max_abs(&engine.pressure()), 0.0, "{}", method.name());
    }
}

#[test]
fn test_fields_untouched_after_construction() {
    let elastic = Elastic1D::from_config(&standard_elastic_config()).unwrap();
    assert_eq!(max_abs(&elastic.velocity()), 0.0);
    assert_eq!(max_abs(&elastic.stress()), 0.0);

    for method in METHODS {
        let acoustic = Acoustic2D::from_config(&small_acoustic_config(), method).unwrap();
        assert_eq!(max_abs(&acoustic.pressure()), 0.0);
        assert_eq!(max_abs(&acoustic.previous_pressure()), 0.0);
    }
}

#[test]
fn test_elastic_run_stays_bounded() {
    let mut config = standard_elastic_config();
    config.receivers = vec![250.0, 750.0];
    let mut engine = Elastic1D::from_config(&config).unwrap();
    engine.run(|_, _| {});

    assert_eq!(engine.current_step(), 1300);
    let velocity = engine.velocity().to_owned();
    let stress = engine.stress().to_owned();
    assert!(all_finite(&velocity));
    assert!(all_finite(&stress));
    assert!(max_abs(&velocity) < 1e3);

    // Both receivers saw the pulse go by
    assert!(max_abs(&engine.receivers().trace(0)) > 0.0);
    assert!(max_abs(&engine.receivers().trace(1)) > 0.0);
}

#[test]
fn test_two_point_operator_also_runs() {
    let mut config = standard_elastic_config();
    config.operator_points = 2;
    config.nt = 600;
    let mut engine = Elastic1D::from_config(&config).unwrap();
    engine.run(|_, _| {});
    assert!(all_finite(&engine.velocity().to_owned()));
    assert!(max_abs(&engine.velocity()) > 0.0);
}

#[test]
fn test_source_normalization() {
    // The injected velocity is src / rho regardless of dt
    for dt in [1e-5, 1e-4] {
        let grid = Grid1D::new(100, 1.0).unwrap();
        let model = ElasticModel::homogeneous(100, 4500.0, 2500.0).unwrap();
        let operator = StaggeredStencil::first_derivative(4).unwrap();
        let mut source = Array1::zeros(2);
        source[0] = 5.0;
        let mut engine = Elastic1D::new(grid, model, operator, dt, 50, source).unwrap();
        engine.step();
        assert!((engine.velocity()[50] - 5.0 / 2500.0).abs() < 1e-15);
    }
}

#[test]
fn test_spectral_and_finite_difference_agree_then_drift() {
    let mut comparison = DispersionComparison::from_config(&small_acoustic_config()).unwrap();

    let mut early = None;
    comparison.run(|step, c| {
        if step == 20 {
            early = Some(c.max_abs_difference());
        }
        if step <= 60 {
            let peak = max_abs(&c.spectral().pressure());
            assert!(c.max_abs_difference() <= 0.5 * peak + 1e-30, "step {step}");
        }
    });
    let early = early.unwrap();
    let late = comparison.max_abs_difference();

    let spectral = comparison.spectral().pressure().to_owned();
    let fd = comparison.finite_difference().pressure().to_owned();
    assert!(all_finite(&spectral));
    assert!(all_finite(&fd));

    let peak = max_abs(&spectral);
    assert!(peak > 0.0);
    assert!(late <= 0.5 * peak, "difference {late} vs peak {peak}");
    assert!(late > early);
    assert!(comparison.rms_difference() <= late);
}

#[test]
fn test_acoustic_wavefront_is_symmetric() {
    // Homogeneous medium, centered source: the field is mirror symmetric
    let mut engine = Acoustic2D::from_config(
        &small_acoustic_config(),
        DerivativeMethod::FiniteDifference { points: 5 },
    )
    .unwrap();
    engine.run(|_, _| {});
    let p = engine.pressure().to_owned();
    let peak = max_abs(&p);
    // Mirror about index 32 (x = 320 m), away from the unevaluated edges
    for i in 1..=20 {
        for k in 1..=20 {
            let a = p[[32 - i, 32 - k]];
            let b = p[[32 + i, 32 + k]];
            assert!((a - b).abs() <= 1e-9 * peak);
            let c = p[[32 - i, 32 + k]];
            assert!((a - c).abs() <= 1e-9 * peak);
        }
    }
}

#[test]
fn test_elastic_pulse_travels_at_shear_velocity() {
    // 450 m between receivers at 4500 m/s
    let config = Elastic1DConfig {
        nx: 2000,
        nt: 1800,
        source_x: 500.0,
        receivers: vec![700.0, 1150.0],
        ..Elastic1DConfig::default()
    };
    let mut engine = Elastic1D::from_config(&config).unwrap();
    engine.run(|_, _| {});
    let dt = engine.dt();
    let t0 = config.source.wavelet().unwrap().t0();

    let near = peak_step(engine.receivers().trace(0));
    let far = peak_step(engine.receivers().trace(1));
    let delay = (far - near) as f64 * dt;
    assert!((delay - 0.1).abs() <= 3.0 * dt, "delay {delay}");

    // Trace sample `it` is recorded at t = (it + 1) dt
    let arrival = (near + 1) as f64 * dt - t0;
    assert!((arrival * 4500.0 - 200.0).abs() <= 4.0, "arrival {arrival}");
}

#[test]
fn test_acoustic_arrivals_match_velocity_on_both_axes() {
    // Source at (640, 640); receivers 200 m and 500 m along x, 500 m along z
    let config = Acoustic2DConfig {
        nt: 500,
        receivers: vec![[840.0, 640.0], [1140.0, 640.0], [640.0, 1140.0]],
        ..Acoustic2DConfig::default()
    };

    let mut peaks = Vec::new();
    for method in METHODS {
        let mut engine = Acoustic2D::from_config(&config, method).unwrap();
        engine.run(|_, _| {});
        let dt = engine.dt();
        let receivers = engine.receivers();

        let near_x = peak_step(receivers.trace(0));
        let far_x = peak_step(receivers.trace(1));
        let far_z = peak_step(receivers.trace(2));

        // 300 m at 3000 m/s
        let delay = (far_x - near_x) as f64 * dt;
        assert!((delay - 0.1).abs() <= 0.005, "{}: delay {delay}", method.name());
        assert!(far_x.abs_diff(far_z) <= 1, "{}: x {far_x} vs z {far_z}", method.name());
        peaks.push(far_x);
    }

    // Both Laplacians put the wavefront in the same place
    assert!(peaks[0].abs_diff(peaks[1]) <= 2, "{peaks:?}");
}
