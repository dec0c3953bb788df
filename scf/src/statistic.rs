//! Stateful SCF computation over one cube.

use serde::{Deserialize, Serialize};

use crate::config::ScfConfig;
use crate::cube::Cube;
use crate::error::{Error, Result};
use crate::lags::RollLags;
use crate::shift::ShiftMethod;
use crate::spectrum::{AngleUnit, ScfSpectrum, SpectrumConfig, compute_spectrum};
use crate::surface::{ScfSurface, compute_surface};
use crate::wcs::Wcs;

/// Whether the surface has been computed yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SurfaceState {
    #[default]
    Uncomputed,
    Computed(ScfSurface),
}

impl SurfaceState {
    pub fn is_computed(&self) -> bool {
        matches!(self, SurfaceState::Computed(_))
    }

    pub fn surface(&self) -> Option<&ScfSurface> {
        match self {
            SurfaceState::Computed(surface) => Some(surface),
            SurfaceState::Uncomputed => None,
        }
    }

    fn get_or_compute(&mut self, compute: impl FnOnce() -> ScfSurface) -> &ScfSurface {
        if let SurfaceState::Uncomputed = self {
            *self = SurfaceState::Computed(compute());
        }
        match self {
            SurfaceState::Computed(surface) => surface,
            SurfaceState::Uncomputed => unreachable!("surface state populated above"),
        }
    }
}

/// Spectral Correlation Function of a borrowed cube.
///
/// ```rust,ignore
/// let mut scf = Scf::new(&cube, &ScfConfig::default())?;
/// scf.compute_spectrum(&SpectrumConfig::new(false, true));
/// let surface = scf.surface().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Scf<'a> {
    cube: &'a Cube,
    wcs: Option<Wcs>,
    roll_lags: RollLags,
    shift_method: ShiftMethod,
    surface: SurfaceState,
    spectrum: Option<ScfSpectrum>,
    stddev_flag: bool,
}

impl<'a> Scf<'a> {
    pub fn new(cube: &'a Cube, config: &ScfConfig) -> Result<Self> {
        let roll_lags = config.roll_lags()?;
        Ok(Self::with_roll_lags(cube, roll_lags, config.shift_method))
    }

    /// Build from an already validated lag grid.
    pub fn with_roll_lags(cube: &'a Cube, roll_lags: RollLags, shift_method: ShiftMethod) -> Self {
        Self {
            cube,
            wcs: None,
            roll_lags,
            shift_method,
            surface: SurfaceState::Uncomputed,
            spectrum: None,
            stddev_flag: false,
        }
    }

    /// Attach the cube's spatial WCS, enabling angular lag units.
    pub fn with_wcs(mut self, wcs: Wcs) -> Self {
        self.wcs = Some(wcs);
        self
    }

    /// Compute the surface unless it already exists.
    pub fn compute_surface(&mut self) -> &ScfSurface {
        let (cube, lags, method) = (self.cube, &self.roll_lags, self.shift_method);
        self.surface
            .get_or_compute(|| compute_surface(cube, lags, method))
    }

    /// Discard any surface and spectrum and compute the surface again.
    pub fn recompute_surface(&mut self) -> &ScfSurface {
        self.surface = SurfaceState::Uncomputed;
        self.spectrum = None;
        self.stddev_flag = false;
        self.compute_surface()
    }

    /// Reduce the surface to a radial spectrum, computing the surface first if needed.
    pub fn compute_spectrum(&mut self, config: &SpectrumConfig) -> &ScfSpectrum {
        let (cube, lags, method) = (self.cube, &self.roll_lags, self.shift_method);
        let surface = self
            .surface
            .get_or_compute(|| compute_surface(cube, lags, method));
        let spectrum = compute_spectrum(surface, lags, config);

        tracing::debug!(
            bins = spectrum.len(),
            log_spacing = config.binning.log_spacing,
            return_stddev = config.return_stddev,
            "Computed SCF spectrum"
        );

        self.stddev_flag = config.return_stddev;
        self.spectrum.insert(spectrum)
    }

    /// Surface and spectrum in one call.
    pub fn run(&mut self, config: &SpectrumConfig) -> &ScfSpectrum {
        self.compute_surface();
        self.compute_spectrum(config)
    }

    pub fn cube(&self) -> &'a Cube {
        self.cube
    }

    pub fn wcs(&self) -> Option<&Wcs> {
        self.wcs.as_ref()
    }

    pub fn roll_lags(&self) -> &RollLags {
        &self.roll_lags
    }

    pub fn shift_method(&self) -> ShiftMethod {
        self.shift_method
    }

    pub fn surface_state(&self) -> &SurfaceState {
        &self.surface
    }

    pub fn surface(&self) -> Option<&ScfSurface> {
        self.surface.surface()
    }

    pub fn spectrum(&self) -> Option<&ScfSpectrum> {
        self.spectrum.as_ref()
    }

    /// Spectrum lags in pixels.
    pub fn lags(&self) -> Option<&[f64]> {
        self.spectrum.as_ref().map(ScfSpectrum::lags)
    }

    /// Per-bin standard deviation of the spectrum.
    ///
    /// Only available after `compute_spectrum` ran with `return_stddev`.
    /// Otherwise a warning is logged and `None` returned.
    pub fn spectrum_stddev(&self) -> Option<&[f64]> {
        if !self.stddev_flag {
            tracing::warn!(
                "spectrum stddev is only calculated when return_stddev is enabled"
            );
        }
        self.spectrum.as_ref().and_then(ScfSpectrum::stddev)
    }

    pub fn has_stddev(&self) -> bool {
        self.stddev_flag
    }

    /// Spectrum lags converted to angular units using the attached WCS.
    ///
    /// Returns `Ok(None)` when no spectrum has been computed yet.
    pub fn lags_in(&self, unit: AngleUnit) -> Result<Option<Vec<f64>>> {
        let wcs = self.wcs.as_ref().ok_or(Error::MissingWcs)?;
        let scale = wcs.pixel_scale()?;
        self.spectrum
            .as_ref()
            .map(|spectrum| spectrum.lags_in(unit, scale))
            .transpose()
    }

    /// Release the cube borrow, keeping everything that was computed.
    pub fn into_results(self) -> ScfResults {
        ScfResults {
            wcs: self.wcs,
            roll_lags: self.roll_lags,
            surface: self.surface.surface().cloned(),
            spectrum: self.spectrum,
            stddev_flag: self.stddev_flag,
        }
    }
}

/// Owned snapshot of an SCF run without the input cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScfResults {
    pub wcs: Option<Wcs>,
    pub roll_lags: RollLags,
    pub surface: Option<ScfSurface>,
    pub spectrum: Option<ScfSpectrum>,
    pub stddev_flag: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubeDimensions;
    use crate::testing::{WarnCounter, synthetic};

    fn small_cube() -> Cube {
        synthetic::random_cube(CubeDimensions::new(4, 8, 8), 21)
    }

    #[test]
    fn test_starts_uncomputed() {
        let cube = small_cube();
        let scf = Scf::new(&cube, &ScfConfig::default().with_size(5)).unwrap();
        assert!(!scf.surface_state().is_computed());
        assert!(scf.surface().is_none());
        assert!(scf.spectrum().is_none());
        assert!(scf.lags().is_none());
    }

    #[test]
    fn test_even_size_is_reduced() {
        let cube = small_cube();
        let scf = Scf::new(&cube, &ScfConfig::default().with_size(6)).unwrap();
        assert_eq!(scf.roll_lags().len(), 5);
    }

    #[test]
    fn test_compute_surface_is_idempotent() {
        let cube = small_cube();
        let mut scf = Scf::new(&cube, &ScfConfig::default().with_size(5)).unwrap();
        let first = scf.compute_surface().clone();
        let second = scf.compute_surface().clone();
        assert_eq!(first, second);
        assert_eq!(first.shape(), (5, 5));
        assert_eq!(scf.recompute_surface(), &first);
    }

    #[test]
    fn test_spectrum_triggers_surface() {
        let cube = small_cube();
        let mut scf = Scf::new(&cube, &ScfConfig::default().with_size(5)).unwrap();
        let bins = scf.compute_spectrum(&SpectrumConfig::default()).len();
        assert!(bins > 0);
        assert!(scf.surface_state().is_computed());
        assert_eq!(scf.lags().unwrap().len(), bins);
    }

    #[test]
    fn test_stddev_only_when_requested() {
        let cube = small_cube();
        let mut scf = Scf::new(&cube, &ScfConfig::default().with_size(5)).unwrap();
        let warnings = WarnCounter::default();

        tracing::subscriber::with_default(warnings.subscriber(), || {
            assert!(scf.spectrum_stddev().is_none());
            assert_eq!(warnings.count(), 1);

            scf.compute_spectrum(&SpectrumConfig::new(false, false));
            assert!(!scf.has_stddev());
            assert!(scf.spectrum_stddev().is_none());
            assert_eq!(warnings.count(), 2);

            scf.compute_spectrum(&SpectrumConfig::new(false, true));
            assert!(scf.has_stddev());
            assert_eq!(
                scf.spectrum_stddev().unwrap().len(),
                scf.spectrum().unwrap().len()
            );
            assert_eq!(warnings.count(), 2);
        });
    }

    #[test]
    fn test_recompute_clears_spectrum() {
        let cube = small_cube();
        let mut scf = Scf::new(&cube, &ScfConfig::default().with_size(3)).unwrap();
        scf.run(&SpectrumConfig::new(false, true));
        scf.recompute_surface();
        assert!(scf.spectrum().is_none());
        assert!(!scf.has_stddev());
    }

    #[test]
    fn test_angular_lags_need_wcs() {
        let cube = small_cube();
        let mut scf = Scf::new(&cube, &ScfConfig::default().with_size(5)).unwrap();
        scf.run(&SpectrumConfig::default());
        assert!(matches!(
            scf.lags_in(AngleUnit::Degree),
            Err(Error::MissingWcs)
        ));

        let mut scf = scf.with_wcs(Wcs::from_cdelt(0.01, 0.01));
        assert!(scf.lags_in(AngleUnit::Degree).unwrap().is_some());
        scf.recompute_surface();
        assert!(scf.lags_in(AngleUnit::Degree).unwrap().is_none());
        scf.run(&SpectrumConfig::default());

        let pix = scf.lags().unwrap().to_vec();
        let arcmin = scf.lags_in(AngleUnit::Arcminute).unwrap().unwrap();
        for (p, a) in pix.iter().zip(&arcmin) {
            assert!((p * 0.6 - a).abs() < 1e-9);
        }
    }

    #[test]
    fn test_into_results_keeps_computed_state() {
        let cube = small_cube();
        let mut scf = Scf::new(&cube, &ScfConfig::default().with_size(5)).unwrap();
        scf.run(&SpectrumConfig::new(true, true));
        let surface = scf.surface().cloned();

        let results = scf.into_results();
        drop(cube);
        assert_eq!(results.surface, surface);
        assert!(results.stddev_flag);
        assert!(results.spectrum.is_some());
        assert_eq!(results.roll_lags.len(), 5);
    }
}
