//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use scf::prelude::*;
//! ```

// Input data
pub use crate::{Cube, CubeDimensions, Error, Wcs};

// Configuration
pub use crate::{DistanceConfig, RollLags, ScfConfig, ShiftMethod, SpectrumConfig};

// Main API
pub use crate::{AngleUnit, Scf, ScfDistance, ScfSpectrum, ScfSurface};
