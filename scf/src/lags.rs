//! Spatial displacement grids used to build an SCF surface.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Odd-length, strictly increasing pixel displacements with zero at the center.
///
/// The same lags are applied along both spatial axes, so a surface built from
/// `n` lags is `n × n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct RollLags {
    values: Vec<f64>,
}

impl RollLags {
    /// Consecutive integer lags `-(size/2) ..= size/2`.
    ///
    /// An even `size` is reduced to the next smaller odd number.
    pub fn centered(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidLags("size must be positive".to_string()));
        }
        let size = make_odd(size, "size");
        let half = (size / 2) as f64;
        let values = (0..size).map(|i| i as f64 - half).collect();
        Ok(Self { values })
    }

    /// Caller-supplied lags in pixels.
    ///
    /// An even-length array loses its last element. The remaining values must be
    /// finite, strictly increasing and have exactly 0 in the middle.
    pub fn from_values(mut values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidLags("no lags given".to_string()));
        }
        if values.len() % 2 == 0 {
            let len = make_odd(values.len(), "roll lag count");
            values.truncate(len);
        }

        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidLags(format!("non-finite lag {v}")));
        }
        if values.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidLags(format!(
                "lags must be strictly increasing: {values:?}"
            )));
        }
        let center = values[values.len() / 2];
        if center != 0.0 {
            return Err(Error::InvalidLags(format!(
                "center lag must be 0, got {center}"
            )));
        }

        Ok(Self { values })
    }

    /// Every lag multiplied by `factor`. Zero stays exactly zero.
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        debug_assert!(factor.is_finite() && factor > 0.0);
        Self {
            values: self.values.iter().map(|&v| v * factor).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Index of the zero lag.
    #[inline]
    pub fn center_index(&self) -> usize {
        self.values.len() / 2
    }

    /// Distance between the first two lags, used to turn radial bin
    /// positions into pixel lags. A single-lag grid has spacing 1.
    pub fn spacing(&self) -> f64 {
        match self.values.as_slice() {
            [first, second, ..] => (second - first).abs(),
            _ => 1.0,
        }
    }

    /// True when every lag is a whole number of pixels.
    pub fn is_integral(&self) -> bool {
        self.values.iter().all(|v| v.fract() == 0.0)
    }
}

impl TryFrom<Vec<f64>> for RollLags {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_values(values)
    }
}

impl From<RollLags> for Vec<f64> {
    fn from(lags: RollLags) -> Self {
        lags.values
    }
}

fn make_odd(len: usize, what: &str) -> usize {
    if len % 2 == 1 {
        return len;
    }
    tracing::warn!(
        len,
        "{} must be odd, reducing to {}",
        what,
        len - 1
    );
    len - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_odd() {
        let lags = RollLags::centered(5).unwrap();
        assert_eq!(lags.values(), &[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(lags.center_index(), 2);
        assert_eq!(lags.spacing(), 1.0);
        assert!(lags.is_integral());
    }

    #[test]
    fn test_centered_even_drops_to_odd() {
        for k in 1..8 {
            let lags = RollLags::centered(2 * k).unwrap();
            assert_eq!(lags.len(), 2 * k - 1);
            assert_eq!(lags.values()[lags.center_index()], 0.0);
        }
    }

    #[test]
    fn test_centered_zero_size_rejected() {
        assert!(matches!(RollLags::centered(0), Err(Error::InvalidLags(_))));
    }

    #[test]
    fn test_from_values_even_drops_last() {
        let lags = RollLags::from_values(vec![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(lags.values(), &[-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_from_values_fractional() {
        let lags = RollLags::from_values(vec![-1.0, -0.5, 0.0, 0.5, 1.0]).unwrap();
        assert_eq!(lags.spacing(), 0.5);
        assert!(!lags.is_integral());
    }

    #[test]
    fn test_from_values_rejects_off_center_zero() {
        let err = RollLags::from_values(vec![0.0, 1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("center lag must be 0"));
    }

    #[test]
    fn test_from_values_rejects_unsorted_and_nan() {
        assert!(RollLags::from_values(vec![1.0, 0.0, -1.0]).is_err());
        assert!(RollLags::from_values(vec![-1.0, 0.0, f64::NAN]).is_err());
        assert!(RollLags::from_values(vec![]).is_err());
    }

    #[test]
    fn test_scaled_keeps_zero() {
        let lags = RollLags::centered(3).unwrap().scaled(2.5);
        assert_eq!(lags.values(), &[-2.5, 0.0, 2.5]);
        assert_eq!(lags.spacing(), 2.5);
    }

    #[test]
    fn test_single_lag_spacing() {
        let lags = RollLags::centered(1).unwrap();
        assert_eq!(lags.values(), &[0.0]);
        assert_eq!(lags.spacing(), 1.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let lags: RollLags = serde_json::from_str("[-1.0, 0.0, 1.0, 2.0]").unwrap();
        assert_eq!(lags.len(), 3);
        assert!(serde_json::from_str::<RollLags>("[1.0, 2.0, 3.0]").is_err());
    }
}
