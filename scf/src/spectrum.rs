//! 1D SCF spectrum: the surface averaged in rings of equal lag.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::{Error, Result};
use crate::lags::RollLags;
use crate::radial::{RadialBinning, radial_profile};
use crate::surface::ScfSurface;

/// Angular unit for lag conversion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    #[default]
    #[strum(serialize = "deg")]
    Degree,
    #[strum(serialize = "arcmin")]
    Arcminute,
    #[strum(serialize = "arcsec")]
    Arcsecond,
}

impl AngleUnit {
    pub fn per_degree(self) -> f64 {
        match self {
            AngleUnit::Degree => 1.0,
            AngleUnit::Arcminute => 60.0,
            AngleUnit::Arcsecond => 3600.0,
        }
    }
}

/// Unit attached to spectrum lags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LagUnit {
    Pixel,
    Angle(AngleUnit),
}

impl fmt::Display for LagUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LagUnit::Pixel => f.write_str("pix"),
            LagUnit::Angle(unit) => write!(f, "{unit}"),
        }
    }
}

/// Options for reducing a surface to a spectrum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Also report the standard deviation within each radial bin.
    pub return_stddev: bool,
    /// Radial bin layout, including log spacing.
    pub binning: RadialBinning,
}

impl SpectrumConfig {
    pub fn new(log_spacing: bool, return_stddev: bool) -> Self {
        Self {
            return_stddev,
            binning: RadialBinning::default().with_log_spacing(log_spacing),
        }
    }

    pub fn with_binning(mut self, binning: RadialBinning) -> Self {
        self.binning = binning;
        self
    }
}

/// SCF as a function of lag magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScfSpectrum {
    lags: Vec<f64>,
    values: Vec<f64>,
    stddev: Option<Vec<f64>>,
    unit: LagUnit,
}

impl ScfSpectrum {
    /// Lags in pixels.
    pub fn lags(&self) -> &[f64] {
        &self.lags
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn stddev(&self) -> Option<&[f64]> {
        self.stddev.as_deref()
    }

    pub fn unit(&self) -> LagUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    /// `(lag, value, stddev)` per bin.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, Option<f64>)> + '_ {
        self.lags
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(k, (&lag, &value))| (lag, value, self.stddev.as_ref().map(|s| s[k])))
    }

    /// Lags converted to `unit` for a pixel scale given in degrees per pixel.
    pub fn lags_in(&self, unit: AngleUnit, pixel_scale_deg: f64) -> Result<Vec<f64>> {
        if !pixel_scale_deg.is_finite() || pixel_scale_deg <= 0.0 {
            return Err(Error::InvalidPixelScale(pixel_scale_deg));
        }
        let factor = pixel_scale_deg * unit.per_degree();
        Ok(self.lags.iter().map(|&lag| lag * factor).collect())
    }
}

/// Azimuthally average `surface` and express the bin lags in pixels.
///
/// Bin radii count surface cells, so they are scaled by the lag spacing.
pub fn compute_spectrum(
    surface: &ScfSurface,
    lags: &RollLags,
    config: &SpectrumConfig,
) -> ScfSpectrum {
    debug_assert_eq!(surface.size(), lags.len());
    let profile = radial_profile(
        surface.values(),
        surface.size(),
        surface.size(),
        &config.binning,
        config.return_stddev,
    );

    let spacing = lags.spacing();
    ScfSpectrum {
        lags: profile.radii.iter().map(|&r| r * spacing).collect(),
        values: profile.mean,
        stddev: profile.stddev,
        unit: LagUnit::Pixel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cone_surface(size: usize) -> ScfSurface {
        let c = (size / 2) as f64;
        let values = (0..size * size)
            .map(|k| {
                let (i, j) = ((k / size) as f64, (k % size) as f64);
                1.0 - 0.1 * (i - c).hypot(j - c)
            })
            .collect();
        ScfSurface::new(size, values)
    }

    #[test]
    fn test_unit_spacing_keeps_bin_radii() {
        let surface = cone_surface(5);
        let lags = RollLags::centered(5).unwrap();
        let spectrum = compute_spectrum(&surface, &lags, &SpectrumConfig::default());
        let profile = radial_profile(surface.values(), 5, 5, &RadialBinning::default(), false);

        assert_eq!(spectrum.lags(), profile.radii.as_slice());
        assert_eq!(spectrum.values(), profile.mean.as_slice());
        assert_eq!(spectrum.unit(), LagUnit::Pixel);
        assert!(spectrum.stddev().is_none());
    }

    #[test]
    fn test_fractional_spacing_scales_lags() {
        let surface = cone_surface(5);
        let unit = RollLags::centered(5).unwrap();
        let half = RollLags::from_values(vec![-1.0, -0.5, 0.0, 0.5, 1.0]).unwrap();
        let a = compute_spectrum(&surface, &unit, &SpectrumConfig::default());
        let b = compute_spectrum(&surface, &half, &SpectrumConfig::default());
        for (x, y) in a.lags().iter().zip(b.lags()) {
            assert!((x * 0.5 - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spectrum_decreases_for_cone() {
        let surface = cone_surface(7);
        let lags = RollLags::centered(7).unwrap();
        let spectrum = compute_spectrum(&surface, &lags, &SpectrumConfig::new(false, true));
        assert!(spectrum.values().windows(2).all(|w| w[1] < w[0]));
        assert_eq!(spectrum.stddev().unwrap().len(), spectrum.len());
        for (lag, value, stddev) in spectrum.iter() {
            assert!(lag > 0.0);
            assert!(value < 1.0);
            assert!(stddev.is_some());
        }
    }

    #[test]
    fn test_log_spacing_bins_grow() {
        let surface = cone_surface(11);
        let lags = RollLags::centered(11).unwrap();
        let spectrum = compute_spectrum(&surface, &lags, &SpectrumConfig::new(true, false));
        let steps: Vec<f64> = spectrum.lags().windows(2).map(|w| w[1] - w[0]).collect();
        assert!(steps.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_lags_in_angular_units() {
        let surface = cone_surface(5);
        let lags = RollLags::centered(5).unwrap();
        let spectrum = compute_spectrum(&surface, &lags, &SpectrumConfig::default());
        let arcsec = spectrum.lags_in(AngleUnit::Arcsecond, 0.001).unwrap();
        for (pix, ang) in spectrum.lags().iter().zip(&arcsec) {
            assert!((pix * 3.6 - ang).abs() < 1e-9);
        }
        assert!(matches!(
            spectrum.lags_in(AngleUnit::Degree, 0.0),
            Err(Error::InvalidPixelScale(_))
        ));
    }

    #[test]
    fn test_angle_units_scale_consistently() {
        use strum::IntoEnumIterator;

        let surface = cone_surface(5);
        let lags = RollLags::centered(5).unwrap();
        let spectrum = compute_spectrum(&surface, &lags, &SpectrumConfig::default());
        for unit in AngleUnit::iter() {
            let converted = spectrum.lags_in(unit, 0.002).unwrap();
            for (pix, ang) in spectrum.lags().iter().zip(&converted) {
                assert!((ang / unit.per_degree() - pix * 0.002).abs() < 1e-12, "{unit}");
            }
        }
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(LagUnit::Pixel.to_string(), "pix");
        assert_eq!(LagUnit::Angle(AngleUnit::Arcminute).to_string(), "arcmin");
        assert_eq!(AngleUnit::Degree.to_string(), "deg");
    }
}
