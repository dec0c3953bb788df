//! Error types for SCF computations.

use thiserror::Error;

use crate::cube::CubeDimensions;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or comparing SCF results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cube has no samples: {dims:?}")]
    EmptyCube { dims: CubeDimensions },

    #[error("Cube data length mismatch: expected {expected} samples, got {actual}")]
    DataLength { expected: usize, actual: usize },

    #[error("Invalid roll lags: {0}")]
    InvalidLags(String),

    #[error("Surface shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Pixels must be square, got scales {scale_x} x {scale_y} deg")]
    NonSquarePixels { scale_x: f64, scale_y: f64 },

    #[error("Invalid angular pixel scale: {0}")]
    InvalidPixelScale(f64),

    #[error("No WCS available to convert lags to angular units")]
    MissingWcs,

    #[error("Fiducial roll lags {fiducial:?} do not match the reconciled lags {expected:?}")]
    FiducialMismatch {
        fiducial: Vec<f64>,
        expected: Vec<f64>,
    },
}
