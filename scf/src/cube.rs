//! Position-position-velocity data cube.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cube extent along the (spectral, spatial-Y, spatial-X) axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeDimensions {
    /// Number of spectral channels
    pub channels: usize,
    /// Spatial rows (Y)
    pub height: usize,
    /// Spatial columns (X)
    pub width: usize,
}

impl CubeDimensions {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// Total number of samples (channels * height * width).
    pub fn sample_count(&self) -> usize {
        self.channels * self.height * self.width
    }

    /// Number of samples in one spectral channel.
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }
}

/// A 3D array of intensity samples stored channel-major, then row-major.
///
/// Non-finite samples mark missing data and are skipped by every reduction
/// in this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    data: Vec<f64>,
    dims: CubeDimensions,
}

impl Cube {
    /// Wrap raw samples laid out as `data[(c * height + y) * width + x]`.
    pub fn new(dims: CubeDimensions, data: Vec<f64>) -> Result<Self> {
        if dims.is_empty() {
            return Err(Error::EmptyCube { dims });
        }
        if data.len() != dims.sample_count() {
            return Err(Error::DataLength {
                expected: dims.sample_count(),
                actual: data.len(),
            });
        }
        Ok(Self { data, dims })
    }

    /// Build a cube by evaluating `f(channel, y, x)` for every sample.
    ///
    /// # Panics
    /// Panics if any dimension is zero.
    pub fn from_fn<F>(dims: CubeDimensions, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        assert!(!dims.is_empty(), "Cube dimensions must be positive");
        let mut data = Vec::with_capacity(dims.sample_count());
        for c in 0..dims.channels {
            for y in 0..dims.height {
                for x in 0..dims.width {
                    data.push(f(c, y, x));
                }
            }
        }
        Self { data, dims }
    }

    /// # Panics
    /// Panics if any dimension is zero.
    pub fn filled(dims: CubeDimensions, value: f64) -> Self {
        assert!(!dims.is_empty(), "Cube dimensions must be positive");
        Self {
            data: vec![value; dims.sample_count()],
            dims,
        }
    }

    /// Same-shaped cube over new samples. Length is checked in debug builds only.
    pub(crate) fn with_data(&self, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            data,
            dims: self.dims,
        }
    }

    #[inline]
    pub fn dims(&self) -> CubeDimensions {
        self.dims
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.dims.channels
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn index(&self, c: usize, y: usize, x: usize) -> usize {
        debug_assert!(c < self.dims.channels && y < self.dims.height && x < self.dims.width);
        (c * self.dims.height + y) * self.dims.width + x
    }

    #[inline]
    pub fn get(&self, c: usize, y: usize, x: usize) -> f64 {
        self.data[self.index(c, y, x)]
    }

    /// Samples of one spectral channel, row-major.
    pub fn channel(&self, c: usize) -> &[f64] {
        let plane = self.dims.plane_len();
        &self.data[c * plane..(c + 1) * plane]
    }

    /// True if at least one sample is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|v| !v.is_finite())
    }
}
