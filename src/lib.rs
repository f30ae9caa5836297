//! Wavestep - explicit time-domain wave propagation on regular grids
//!
//! This library provides a 1D elastic velocity-stress solver on a staggered
//! grid and a 2D acoustic solver whose Laplacian is either a finite-difference
//! stencil or a Fourier (spectral) derivative. Stencil weights of any odd
//! length and derivative order are derived from Taylor expansions.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod utilities;

// Re-export commonly used types
pub use config::{Acoustic2DConfig, Elastic1DConfig, SourceConfig};
pub use domain::simulation::{simulate_acoustic_2d, simulate_elastic_1d, SimulationResult};
pub use error::{Result, WaveError};

pub mod prelude {
    //! Common imports for using the Wavestep library
    pub use crate::config::{Acoustic2DConfig, Elastic1DConfig, SourceConfig};
    pub use crate::domain::acoustic_2d::{Acoustic2D, DispersionComparison};
    pub use crate::domain::elastic_1d::{Elastic1D, ElasticModel};
    pub use crate::domain::grid::{Grid1D, Grid2D};
    pub use crate::domain::simulation::{
        simulate_acoustic_2d, simulate_elastic_1d, ElasticState, SimulationResult, Snapshot,
    };
    pub use crate::engine::{DerivativeMethod, DerivativeOperator, StaggeredStencil, Stencil};
    pub use crate::error::{Result, WaveError};
    pub use crate::utilities::{SourceWavelet, WaveletKind};
}
