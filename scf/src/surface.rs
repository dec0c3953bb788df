//! SCF surface: correlation of a cube with spatially shifted copies of itself.
//!
//! For a lag `(dx, dy)` every spatial pixel gets
//!
//! ```text
//! value = Σc (I - I')² / (Σc I² + Σc I'²)
//! ```
//!
//! where `I'` is the cube shifted by `dx` along Y and `dy` along X and the
//! sums run over spectral channels. The surface cell is
//! `1 - sqrt(mean(value))` over the pixels where `value` is finite.

use std::ops::Index;

use common::float_ext::{FiniteIterExt, FloatExt};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cube::Cube;
use crate::lags::RollLags;
use crate::shift::{ShiftEngine, ShiftMethod, ShiftMode, SpatialAxis};

/// Square grid of SCF values indexed by (Y-lag index, X-lag index).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScfSurface {
    size: usize,
    values: Vec<f64>,
}

impl ScfSurface {
    /// # Panics
    /// Panics if `values.len() != size * size`.
    pub fn new(size: usize, values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            size * size,
            "surface values length must equal size * size"
        );
        Self { size, values }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.size, self.size)
    }

    /// Row-major values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.size && j < self.size);
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Value at zero lag.
    pub fn center_value(&self) -> f64 {
        let c = self.size / 2;
        self.get(c, c)
    }
}

impl Index<(usize, usize)> for ScfSurface {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.values[i * self.size + j]
    }
}

/// Compute the full SCF surface over `lags × lags`.
///
/// Rows (Y lags) are processed in parallel. Each row shifts along Y once and
/// reuses that copy for every X lag.
pub fn compute_surface(cube: &Cube, lags: &RollLags, method: ShiftMethod) -> ScfSurface {
    let n = lags.len();
    let engine = ShiftEngine::for_cube(cube);
    let modes: Vec<ShiftMode> = lags.iter().map(|l| ShiftMode::resolve(l, method)).collect();

    tracing::debug!(
        lags = n,
        channels = cube.channels(),
        height = cube.height(),
        width = cube.width(),
        missing_data = cube.has_non_finite(),
        ?method,
        "Computing SCF surface"
    );

    let rows: Vec<Vec<f64>> = modes
        .par_iter()
        .map(|&dx| {
            let shifted_y = engine.shift(cube, dx, SpatialAxis::Y);
            modes
                .iter()
                .map(|&dy| {
                    if dx.is_identity() && dy.is_identity() {
                        return 1.0;
                    }
                    let shifted = engine.shift(&shifted_y, dy, SpatialAxis::X);
                    scf_value(cube, &shifted)
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    let surface = ScfSurface::new(n, rows.concat());

    let non_finite = surface.values().iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        tracing::debug!(non_finite, "SCF surface contains non-finite cells");
    }

    surface
}

/// SCF value for a single lag `(dx, dy)`, computed without building a surface.
pub fn scf_at_lag(cube: &Cube, dx: f64, dy: f64, method: ShiftMethod) -> f64 {
    let dx = ShiftMode::resolve(dx, method);
    let dy = ShiftMode::resolve(dy, method);
    if dx.is_identity() && dy.is_identity() {
        return 1.0;
    }
    let engine = ShiftEngine::for_cube(cube);
    let shifted_y = engine.shift(cube, dx, SpatialAxis::Y);
    let shifted = engine.shift(&shifted_y, dy, SpatialAxis::X);
    scf_value(cube, &shifted)
}

/// `1 - sqrt(mean(value))` over the finite per-pixel ratios.
///
/// NaN when no pixel has a finite ratio. Not clamped to [0, 1].
pub(crate) fn scf_value(cube: &Cube, shifted: &Cube) -> f64 {
    let plane = cube.dims().plane_len();
    let mut diff_sq = vec![0.0; plane];
    let mut orig_sq = vec![0.0; plane];
    let mut shifted_sq = vec![0.0; plane];

    for c in 0..cube.channels() {
        let a = cube.channel(c);
        let b = shifted.channel(c);
        for p in 0..plane {
            let (u, v) = (a[p], b[p]);
            diff_sq[p] += ((u - v) * (u - v)).finite_or_zero();
            orig_sq[p] += (u * u).finite_or_zero();
            shifted_sq[p] += (v * v).finite_or_zero();
        }
    }

    let (sum, count) = diff_sq
        .iter()
        .zip(orig_sq.iter().zip(&shifted_sq))
        .map(|(&d, (&a, &b))| d / (a + b))
        .finite_sum_count();

    if count == 0 {
        return f64::NAN;
    }
    1.0 - (sum / count as f64).sqrt()
}
