//! Celestial coordinate metadata for the spatial axes of a cube.
//!
//! Only the linear part of the FITS WCS model matters here: the CD matrix
//! fixes how large a pixel is on the sky, which in turn fixes the angular size
//! of a roll lag.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Two pixel scales closer than this (in degrees) are treated as equal.
pub const SCALE_TOLERANCE: f64 = 1e-5;

/// Linear part of the spatial World Coordinate System of a cube.
///
/// The CD matrix maps a pixel offset `(dx, dy)` to intermediate world
/// coordinates in degrees: `(u, v) = CD × (dx, dy)`. The reference pixel and
/// sky position do not affect lag sizes and are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wcs {
    /// CD matrix in degrees per pixel, [[CD1_1, CD1_2], [CD2_1, CD2_2]]
    pub cd: [[f64; 2]; 2],
}

impl Wcs {
    pub fn new(cd: [[f64; 2]; 2]) -> Self {
        Self { cd }
    }

    /// WCS with an axis-aligned grid given by CDELT1/CDELT2 (degrees per pixel).
    pub fn from_cdelt(cdelt1: f64, cdelt2: f64) -> Self {
        Self::new([[cdelt1, 0.0], [0.0, cdelt2]])
    }

    /// WCS for square pixels of `pixel_scale` arcseconds rotated by `rotation` degrees.
    pub fn from_scale_rotation(pixel_scale: f64, rotation: f64) -> Self {
        let scale_deg = pixel_scale / 3600.0;
        let (sin_r, cos_r) = rotation.to_radians().sin_cos();
        let cd = [
            [scale_deg * cos_r, -scale_deg * sin_r],
            [scale_deg * sin_r, scale_deg * cos_r],
        ];
        Self::new(cd)
    }

    /// Projected size of one pixel along X and Y, in degrees.
    pub fn pixel_scales(&self) -> (f64, f64) {
        let scale_x = (self.cd[0][0].powi(2) + self.cd[1][0].powi(2)).sqrt();
        let scale_y = (self.cd[0][1].powi(2) + self.cd[1][1].powi(2)).sqrt();
        (scale_x, scale_y)
    }

    /// Pixel scale in degrees per pixel.
    ///
    /// Fails unless both axes agree within [`SCALE_TOLERANCE`] and are positive.
    pub fn pixel_scale(&self) -> Result<f64> {
        let (scale_x, scale_y) = self.pixel_scales();
        if (scale_x - scale_y).abs() >= SCALE_TOLERANCE {
            return Err(Error::NonSquarePixels { scale_x, scale_y });
        }
        if !scale_x.is_finite() || scale_x <= 0.0 {
            return Err(Error::InvalidPixelScale(scale_x));
        }
        Ok(scale_x)
    }

    pub fn pixel_scale_arcsec(&self) -> Result<f64> {
        Ok(self.pixel_scale()? * 3600.0)
    }
}

/// Factor that converts a lag in `wcs2` pixels into the same angle in `wcs1` pixels.
///
/// Equal scales (within [`SCALE_TOLERANCE`]) give exactly 1.0. A value above 1
/// means the second cube has the coarser grid.
pub fn angular_scale_ratio(wcs1: &Wcs, wcs2: &Wcs) -> Result<f64> {
    let scale1 = wcs1.pixel_scale()?;
    let scale2 = wcs2.pixel_scale()?;

    if (scale1 - scale2).abs() < SCALE_TOLERANCE {
        return Ok(1.0);
    }

    Ok(scale2 / scale1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_scale_from_cdelt() {
        let wcs = Wcs::from_cdelt(-0.002, 0.002);
        assert!((wcs.pixel_scale().unwrap() - 0.002).abs() < 1e-12);
        assert!((wcs.pixel_scale_arcsec().unwrap() - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_cd_matrix_columns_give_axis_scales() {
        let wcs = Wcs::new([[0.0, -0.003], [0.004, 0.0]]);
        let (scale_x, scale_y) = wcs.pixel_scales();
        assert!((scale_x - 0.004).abs() < 1e-15);
        assert!((scale_y - 0.003).abs() < 1e-15);
        assert_eq!(Wcs::new([[0.001, 0.0], [0.0, 0.001]]), Wcs::from_cdelt(0.001, 0.001));
    }

    #[test]
    fn test_pixel_scale_is_rotation_invariant() {
        let wcs = Wcs::from_scale_rotation(3.6, 30.0);
        assert!((wcs.pixel_scale().unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_non_square_pixels_rejected() {
        let wcs = Wcs::from_cdelt(0.01, 0.02);
        assert!(matches!(
            wcs.pixel_scale(),
            Err(Error::NonSquarePixels { .. })
        ));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let wcs = Wcs::from_cdelt(0.0, 0.0);
        assert!(matches!(
            wcs.pixel_scale(),
            Err(Error::InvalidPixelScale(_))
        ));
    }

    #[test]
    fn test_ratio_equal_scales_is_exactly_one() {
        let a = Wcs::from_cdelt(0.001, 0.001);
        let b = Wcs::from_cdelt(-0.001000001, 0.001000001);
        assert_eq!(angular_scale_ratio(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_ratio_direction() {
        let fine = Wcs::from_cdelt(0.001, 0.001);
        let coarse = Wcs::from_cdelt(0.002, 0.002);
        assert!((angular_scale_ratio(&fine, &coarse).unwrap() - 2.0).abs() < 1e-12);
        assert!((angular_scale_ratio(&coarse, &fine).unwrap() - 0.5).abs() < 1e-12);
    }
}
