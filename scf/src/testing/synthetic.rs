//! Deterministic synthetic cubes.
//!
//! ```rust,ignore
//! use scf::testing::synthetic;
//!
//! let noise = synthetic::random_cube(CubeDimensions::new(10, 16, 16), 42);
//! let smooth = synthetic::smooth_cube(CubeDimensions::new(10, 16, 16), 2.0, 42);
//! ```

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cube::{Cube, CubeDimensions};

/// Positive i.i.d. samples in `[0.5, 1.5)`.
pub fn random_cube(dims: CubeDimensions, seed: u64) -> Cube {
    let mut rng = StdRng::seed_from_u64(seed);
    Cube::from_fn(dims, |_, _, _| 0.5 + rng.random::<f64>())
}

/// Spatially correlated cube: a few low-frequency plane waves per channel
/// on top of a positive offset, plus weak noise.
///
/// `wavelength` is the shortest wave period in pixels. Wave vectors are
/// snapped to whole cycles across the grid so the field wraps without seams.
pub fn smooth_cube(dims: CubeDimensions, wavelength: f64, seed: u64) -> Cube {
    assert!(wavelength > 0.0, "wavelength must be positive");
    let mut rng = StdRng::seed_from_u64(seed);
    let (h, w) = (dims.height as f64, dims.width as f64);

    let waves: Vec<Vec<(f64, f64, f64, f64)>> = (0..dims.channels)
        .map(|_| {
            (0..3)
                .map(|k| {
                    let period = wavelength * (1.0 + k as f64);
                    let angle = rng.random::<f64>() * TAU;
                    let phase = rng.random::<f64>() * TAU;
                    let amplitude = 0.5 / (1.0 + k as f64);
                    let cycles_y = (h / period * angle.sin()).round();
                    let cycles_x = (w / period * angle.cos()).round();
                    (cycles_y / h, cycles_x / w, phase, amplitude)
                })
                .collect()
        })
        .collect();

    Cube::from_fn(dims, |c, y, x| {
        let signal: f64 = waves[c]
            .iter()
            .map(|&(fy, fx, phase, amplitude)| {
                amplitude * (TAU * (fy * y as f64 + fx * x as f64) + phase).sin()
            })
            .sum();
        2.0 + signal + 0.05 * (rng.random::<f64>() - 0.5)
    })
}

/// Plane wave along one spatial axis, identical in every channel.
pub fn sinusoid_cube(dims: CubeDimensions, cycles_y: f64, cycles_x: f64) -> Cube {
    Cube::from_fn(dims, |_, y, x| {
        let arg =
            cycles_y * y as f64 / dims.height as f64 + cycles_x * x as f64 / dims.width as f64;
        2.0 + (TAU * arg).sin()
    })
}

/// Replace every sample of channel `c` with NaN.
pub fn blank_channel(cube: &Cube, c: usize) -> Cube {
    let dims = cube.dims();
    Cube::from_fn(dims, |k, y, x| {
        if k == c { f64::NAN } else { cube.get(k, y, x) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_cube_is_deterministic() {
        let dims = CubeDimensions::new(2, 4, 4);
        assert_eq!(random_cube(dims, 7), random_cube(dims, 7));
        assert_ne!(random_cube(dims, 7), random_cube(dims, 8));
        assert!(random_cube(dims, 7).data().iter().all(|&v| (0.5..1.5).contains(&v)));
    }

    #[test]
    fn test_smooth_cube_positive() {
        let cube = smooth_cube(CubeDimensions::new(3, 8, 8), 2.0, 1);
        assert!(cube.data().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_blank_channel() {
        let cube = random_cube(CubeDimensions::new(3, 4, 4), 1);
        let blanked = blank_channel(&cube, 1);
        assert!(blanked.channel(1).iter().all(|v| v.is_nan()));
        assert_eq!(blanked.channel(0), cube.channel(0));
    }
}
