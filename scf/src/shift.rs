//! Spatial shifts of a cube along one of its two spatial axes.
//!
//! Integral displacements are done with an exact periodic roll. Fractional
//! displacements multiply each line's spectrum by a linear phase ramp, which
//! is also periodic. The phase ramp can ring next to sharp edges and
//! missing-data boundaries.

use std::borrow::Cow;
use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};

use crate::cube::Cube;

/// Shifted mask values at or above this keep their sample.
const MASK_THRESHOLD: f64 = 0.5;

/// Spatial axis of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialAxis {
    /// Rows, the first spatial axis.
    Y,
    /// Columns, the second spatial axis.
    X,
}

/// How non-zero lags are realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftMethod {
    /// Roll integral lags, Fourier-shift fractional ones.
    #[default]
    Auto,
    /// Fourier-shift every non-zero lag.
    Fourier,
}

/// Concrete shift applied for one lag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShiftMode {
    /// Zero displacement, input returned as-is.
    Identity,
    /// Exact periodic roll by whole pixels.
    IntegerRoll(isize),
    /// Phase-ramp shift by a possibly fractional displacement.
    FourierSubpixel(f64),
}

impl ShiftMode {
    pub fn resolve(displacement: f64, method: ShiftMethod) -> Self {
        if displacement == 0.0 {
            return ShiftMode::Identity;
        }
        match method {
            ShiftMethod::Auto if displacement.fract() == 0.0 => {
                ShiftMode::IntegerRoll(displacement as isize)
            }
            _ => ShiftMode::FourierSubpixel(displacement),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, ShiftMode::Identity)
    }
}

#[derive(Clone)]
struct FftPair {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl FftPair {
    fn plan(planner: &mut FftPlanner<f64>, len: usize) -> Self {
        Self {
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }
}

/// Shifts cubes of one fixed spatial size.
///
/// FFT plans are built once and shared read-only, so a single engine can be
/// used from many rayon workers at the same time. All scratch buffers are
/// per call.
#[derive(Clone)]
pub struct ShiftEngine {
    height: usize,
    width: usize,
    rows: FftPair,
    cols: FftPair,
}

impl ShiftEngine {
    pub fn new(height: usize, width: usize) -> Self {
        let mut planner = FftPlanner::new();
        let rows = FftPair::plan(&mut planner, height);
        let cols = FftPair::plan(&mut planner, width);
        Self {
            height,
            width,
            rows,
            cols,
        }
    }

    pub fn for_cube(cube: &Cube) -> Self {
        Self::new(cube.height(), cube.width())
    }

    /// Shift `cube` along `axis`. `Identity` borrows the input.
    ///
    /// A positive displacement moves content towards higher indices:
    /// `out[i] = in[i - d]`.
    pub fn shift<'c>(&self, cube: &'c Cube, mode: ShiftMode, axis: SpatialAxis) -> Cow<'c, Cube> {
        debug_assert_eq!((cube.height(), cube.width()), (self.height, self.width));
        match mode {
            ShiftMode::Identity => Cow::Borrowed(cube),
            ShiftMode::IntegerRoll(d) => Cow::Owned(roll(cube, d, axis)),
            ShiftMode::FourierSubpixel(d) => Cow::Owned(self.fourier_shift(cube, d, axis)),
        }
    }

    /// Sub-pixel periodic shift via a frequency-domain phase ramp.
    ///
    /// Non-finite samples are zeroed before the transform. Their mask is shifted
    /// the same way and samples whose shifted mask drops below one half become
    /// NaN again.
    pub fn fourier_shift(&self, cube: &Cube, displacement: f64, axis: SpatialAxis) -> Cube {
        let (plans, len) = match axis {
            SpatialAxis::Y => (&self.rows, self.height),
            SpatialAxis::X => (&self.cols, self.width),
        };
        let ramp = phase_ramp(len, displacement);
        let scratch_len = plans
            .forward
            .get_inplace_scratch_len()
            .max(plans.inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::new(0.0, 0.0); scratch_len];
        let mut line = vec![Complex::new(0.0, 0.0); len];
        let mut mask_line = vec![Complex::new(0.0, 0.0); len];

        let src = cube.data();
        let mut out = vec![0.0; src.len()];

        for (start, stride) in line_starts(cube, axis) {
            let mut any_missing = false;
            for (k, slot) in line.iter_mut().enumerate() {
                let v = src[start + k * stride];
                if v.is_finite() {
                    *slot = Complex::new(v, 0.0);
                } else {
                    any_missing = true;
                    *slot = Complex::new(0.0, 0.0);
                }
            }
            apply_ramp(plans, &ramp, &mut line, &mut scratch);

            if any_missing {
                for (k, slot) in mask_line.iter_mut().enumerate() {
                    let finite = src[start + k * stride].is_finite();
                    *slot = Complex::new(if finite { 1.0 } else { 0.0 }, 0.0);
                }
                apply_ramp(plans, &ramp, &mut mask_line, &mut scratch);
                for k in 0..len {
                    out[start + k * stride] = if mask_line[k].re >= MASK_THRESHOLD {
                        line[k].re
                    } else {
                        f64::NAN
                    };
                }
            } else {
                for k in 0..len {
                    out[start + k * stride] = line[k].re;
                }
            }
        }

        cube.with_data(out)
    }
}

/// Exact periodic roll by `displacement` pixels along `axis`.
pub fn roll(cube: &Cube, displacement: isize, axis: SpatialAxis) -> Cube {
    let len = match axis {
        SpatialAxis::Y => cube.height(),
        SpatialAxis::X => cube.width(),
    };
    let offset = displacement.rem_euclid(len as isize) as usize;
    let src = cube.data();
    let mut out = vec![0.0; src.len()];

    for (start, stride) in line_starts(cube, axis) {
        for k in 0..len {
            let dst = (k + offset) % len;
            out[start + dst * stride] = src[start + k * stride];
        }
    }

    cube.with_data(out)
}

/// First sample index and stride of every 1D line along `axis`.
fn line_starts(cube: &Cube, axis: SpatialAxis) -> impl Iterator<Item = (usize, usize)> {
    let (channels, height, width) = (cube.channels(), cube.height(), cube.width());
    let plane = height * width;
    let (outer, stride, step) = match axis {
        SpatialAxis::Y => (width, width, 1),
        SpatialAxis::X => (height, 1, width),
    };
    (0..channels).flat_map(move |c| (0..outer).map(move |o| (c * plane + o * step, stride)))
}

/// `exp(-2πi f d) / n` for the FFT frequencies `f` of a length-`n` transform.
///
/// The `1/n` folds in the normalization that rustfft leaves to the caller.
fn phase_ramp(len: usize, displacement: f64) -> Vec<Complex<f64>> {
    let n = len as f64;
    (0..len)
        .map(|k| {
            let freq = fft_frequency(k, len);
            Complex::from_polar(1.0 / n, -2.0 * PI * freq * displacement)
        })
        .collect()
}

/// Sample frequency of FFT bin `k`, in cycles per sample (numpy `fftfreq` order).
fn fft_frequency(k: usize, len: usize) -> f64 {
    let k = if k < len.div_ceil(2) {
        k as f64
    } else {
        k as f64 - len as f64
    };
    k / len as f64
}

fn apply_ramp(
    plans: &FftPair,
    ramp: &[Complex<f64>],
    line: &mut [Complex<f64>],
    scratch: &mut [Complex<f64>],
) {
    plans.forward.process_with_scratch(line, scratch);
    for (v, r) in line.iter_mut().zip(ramp) {
        *v *= *r;
    }
    plans.inverse.process_with_scratch(line, scratch);
}
