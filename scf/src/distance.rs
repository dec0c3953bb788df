//! Distance between the SCF surfaces of two cubes.
//!
//! The distance is a weighted RMS of the surface difference. With weighting
//! enabled each cell counts `1 / r`, where `r` is its offset from the zero-lag
//! cell in grid units, so small-scale differences dominate. The zero-lag
//! cell itself gets weight 1.

use crate::config::DistanceConfig;
use crate::cube::Cube;
use crate::error::{Error, Result};
use crate::lags::RollLags;
use crate::reconcile::reconcile_roll_lags;
use crate::spectrum::SpectrumConfig;
use crate::statistic::Scf;
use crate::surface::ScfSurface;
use crate::wcs::Wcs;

/// Per-cell weights for a `size × size` lag grid, row-major.
pub fn distance_weights(size: usize, weighted: bool) -> Vec<f64> {
    if !weighted {
        return vec![1.0; size * size];
    }
    let half = (size / 2) as f64;
    (0..size)
        .flat_map(|i| {
            (0..size).map(move |j| {
                let (a, b) = (i as f64 - half, j as f64 - half);
                let r = (a * a + b * b).sqrt();
                if r == 0.0 { 1.0 } else { 1.0 / r }
            })
        })
        .collect()
}

/// `sqrt(Σ w (s1 - s2)² / Σ w)`.
pub fn surface_distance(s1: &ScfSurface, s2: &ScfSurface, weighted: bool) -> Result<f64> {
    if s1.shape() != s2.shape() {
        return Err(Error::ShapeMismatch {
            left: s1.shape(),
            right: s2.shape(),
        });
    }

    let weights = distance_weights(s1.size(), weighted);
    let (num, den) = s1
        .values()
        .iter()
        .zip(s2.values())
        .zip(&weights)
        .fold((0.0, 0.0), |(num, den), ((&a, &b), &w)| {
            (num + (a - b) * (a - b) * w, den + w)
        });

    Ok((num / den).sqrt())
}

/// Compares two cubes through their SCF surfaces.
pub struct ScfDistance<'a> {
    scf1: Scf<'a>,
    scf2: Scf<'a>,
    base_lags: RollLags,
    weighted: bool,
    distance: Option<f64>,
}

impl<'a> ScfDistance<'a> {
    /// Compare two cubes sampled on the same pixel grid.
    pub fn new(cube1: &'a Cube, cube2: &'a Cube, config: &DistanceConfig) -> Result<Self> {
        Self::with_wcs(cube1, None, cube2, None, config)
    }

    /// Compare two cubes, reconciling their lag grids when both have a WCS.
    pub fn with_wcs(
        cube1: &'a Cube,
        wcs1: Option<Wcs>,
        cube2: &'a Cube,
        wcs2: Option<Wcs>,
        config: &DistanceConfig,
    ) -> Result<Self> {
        let base_lags = config.roll_lags()?;
        let (lags1, lags2) = reconciled_lags(wcs1.as_ref(), wcs2.as_ref(), &base_lags)?;

        let scf1 = attach_wcs(Scf::with_roll_lags(cube1, lags1, config.shift_method), wcs1);
        let scf2 = attach_wcs(Scf::with_roll_lags(cube2, lags2, config.shift_method), wcs2);

        Self::from_parts(scf1, scf2, base_lags, config.weighted)
    }

    /// Reuse an already computed SCF for the first cube.
    ///
    /// The fiducial's lags must equal the grid this configuration would give
    /// the first cube.
    pub fn from_fiducial(
        fiducial: Scf<'a>,
        cube2: &'a Cube,
        wcs2: Option<Wcs>,
        config: &DistanceConfig,
    ) -> Result<Self> {
        let base_lags = config.roll_lags()?;
        let (lags1, lags2) = reconciled_lags(fiducial.wcs(), wcs2.as_ref(), &base_lags)?;

        if fiducial.roll_lags() != &lags1 {
            return Err(Error::FiducialMismatch {
                fiducial: fiducial.roll_lags().values().to_vec(),
                expected: lags1.values().to_vec(),
            });
        }

        let scf2 = attach_wcs(Scf::with_roll_lags(cube2, lags2, config.shift_method), wcs2);
        Self::from_parts(fiducial, scf2, base_lags, config.weighted)
    }

    fn from_parts(
        mut scf1: Scf<'a>,
        mut scf2: Scf<'a>,
        base_lags: RollLags,
        weighted: bool,
    ) -> Result<Self> {
        let spectrum_config = SpectrumConfig::new(false, true);
        if scf1.spectrum().is_none() {
            scf1.run(&spectrum_config);
        }
        scf2.run(&spectrum_config);

        Ok(Self {
            scf1,
            scf2,
            base_lags,
            weighted,
            distance: None,
        })
    }

    /// Compute the distance and store it as the current value.
    pub fn distance_metric(&mut self) -> Result<f64> {
        let s1 = self.scf1.compute_surface();
        let s2 = self.scf2.compute_surface();
        let distance = surface_distance(s1, s2, self.weighted)?;

        tracing::info!(distance, weighted = self.weighted, "SCF distance");
        self.distance = Some(distance);
        Ok(distance)
    }

    /// Last computed distance.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn scf1(&self) -> &Scf<'a> {
        &self.scf1
    }

    pub fn scf2(&self) -> &Scf<'a> {
        &self.scf2
    }

    /// Shared lag grid before reconciliation.
    pub fn roll_lags(&self) -> &RollLags {
        &self.base_lags
    }

    pub fn size(&self) -> usize {
        self.base_lags.len()
    }

    pub fn weighted(&self) -> bool {
        self.weighted
    }

    pub fn set_weighted(&mut self, weighted: bool) {
        self.weighted = weighted;
    }
}

fn reconciled_lags(
    wcs1: Option<&Wcs>,
    wcs2: Option<&Wcs>,
    base: &RollLags,
) -> Result<(RollLags, RollLags)> {
    match (wcs1, wcs2) {
        (Some(w1), Some(w2)) => reconcile_roll_lags(w1, w2, base),
        _ => Ok((base.clone(), base.clone())),
    }
}

fn attach_wcs(scf: Scf<'_>, wcs: Option<Wcs>) -> Scf<'_> {
    match wcs {
        Some(wcs) => scf.with_wcs(wcs),
        None => scf,
    }
}
