//! Matching lag grids between cubes on different angular pixel scales.
//!
//! The cube with the finer grid gets its lags stretched so that lag `k` in
//! both cubes spans the same angle on the sky. Stretched lags are usually
//! fractional, which sends them through the Fourier shift.

use crate::error::{Error, Result};
use crate::lags::RollLags;
use crate::wcs::{Wcs, angular_scale_ratio};

/// Lag grids for two cubes that cover the same angular displacements.
pub fn reconcile_roll_lags(
    wcs1: &Wcs,
    wcs2: &Wcs,
    base: &RollLags,
) -> Result<(RollLags, RollLags)> {
    let ratio = angular_scale_ratio(wcs1, wcs2)?;
    reconcile_with_ratio(ratio, base)
}

/// Lag grids for a known `scale2 / scale1` ratio.
pub fn reconcile_with_ratio(ratio: f64, base: &RollLags) -> Result<(RollLags, RollLags)> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(Error::InvalidPixelScale(ratio));
    }

    let lags = if ratio == 1.0 {
        (base.clone(), base.clone())
    } else if ratio > 1.0 {
        (base.scaled(ratio), base.clone())
    } else {
        (base.clone(), base.scaled(1.0 / ratio))
    };

    if ratio != 1.0 {
        tracing::info!(
            ratio,
            lags1 = ?lags.0.values(),
            lags2 = ?lags.1.values(),
            "Reconciled roll lags across pixel scales"
        );
    }

    Ok(lags)
}
