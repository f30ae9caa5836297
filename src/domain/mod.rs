//! Domain module: grids, the two time-domain engines and the run drivers

pub mod acoustic_2d;
pub mod elastic_1d;
pub mod grid;
pub mod receivers;
pub mod simulation;

pub use acoustic_2d::{Acoustic2D, DispersionComparison};
pub use elastic_1d::{Elastic1D, ElasticModel};
pub use grid::{Grid1D, Grid2D};
pub use receivers::Receivers;
pub use simulation::{
    simulate_acoustic_2d, simulate_elastic_1d, ElasticState, SimulationResult, Snapshot,
};
