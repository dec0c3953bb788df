//! SCF - Spectral Correlation Function for position-position-velocity cubes.
//!
//! The SCF measures how similar the spectra of a cube stay as the cube is
//! shifted against itself in the sky plane. This crate provides:
//! - The 2D SCF surface over a grid of spatial lags (integer or sub-pixel)
//! - Its azimuthal average, the 1D SCF spectrum
//! - Lag reconciliation between cubes with different angular pixel scales
//! - A weighted distance between the surfaces of two cubes
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use scf::prelude::*;
//!
//! let cube = Cube::new(CubeDimensions::new(32, 64, 64), samples)?;
//!
//! let mut scf = Scf::new(&cube, &ScfConfig::default())?;
//! let spectrum = scf.run(&SpectrumConfig::new(false, true));
//! for (lag, value, _) in spectrum.iter() {
//!     println!("{lag:.2} pix: {value:.4}");
//! }
//!
//! let mut distance = ScfDistance::new(&cube, &other, &DistanceConfig::default())?;
//! println!("distance = {}", distance.distance_metric()?);
//! ```

mod config;
mod cube;
mod distance;
mod error;
mod lags;
mod radial;
mod reconcile;
mod shift;
mod spectrum;
mod statistic;
mod surface;
mod wcs;

#[cfg(any(test, feature = "bench"))]
pub mod testing;

#[cfg(feature = "bench")]
pub mod bench;

#[cfg(test)]
mod tests;

pub mod prelude;

// ============================================================================
// Input data
// ============================================================================

pub use cube::{Cube, CubeDimensions};
pub use error::{Error, Result};
pub use wcs::{SCALE_TOLERANCE, Wcs, angular_scale_ratio};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{DistanceConfig, ScfConfig};
pub use lags::RollLags;
pub use radial::RadialBinning;
pub use shift::ShiftMethod;
pub use spectrum::SpectrumConfig;

// ============================================================================
// Surface and spectrum
// ============================================================================

pub use radial::{RadialProfile, radial_profile};
pub use shift::{ShiftEngine, ShiftMode, SpatialAxis, roll};
pub use spectrum::{AngleUnit, LagUnit, ScfSpectrum, compute_spectrum};
pub use statistic::{Scf, ScfResults, SurfaceState};
pub use surface::{ScfSurface, compute_surface, scf_at_lag};

// ============================================================================
// Comparison
// ============================================================================

pub use distance::{ScfDistance, distance_weights, surface_distance};
pub use reconcile::{reconcile_roll_lags, reconcile_with_ratio};
