//! Engine module: field buffers and spatial-derivative operators

pub mod backend;
pub mod field;
pub mod operator;
pub mod spectral;
pub mod stencil;

pub use field::{Field1D, Field2D, TimeLevels};
pub use operator::{DerivativeMethod, DerivativeOperator};
pub use spectral::{second_derivative, wavenumbers, SpectralOperator};
pub use stencil::{fd_weights, StaggeredStencil, Stencil};
