//! Azimuthal binning of a 2D array about its center.

use common::float_ext::FiniteIterExt;
use serde::{Deserialize, Serialize};

/// Radial bin layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialBinning {
    /// Number of bins. `None` uses `round(max_radius / binsize) + 1`.
    pub nbins: Option<usize>,
    /// Bin width used to derive the default bin count.
    pub binsize: f64,
    /// Inner edge of the first bin. `None` uses 0.5, which drops the center pixel.
    pub min_bin: Option<f64>,
    /// Outer edge of the last bin. `None` uses the largest radius in the array.
    pub max_bin: Option<f64>,
    /// Use logarithmically spaced bin edges.
    pub log_spacing: bool,
}

impl Default for RadialBinning {
    fn default() -> Self {
        Self {
            nbins: None,
            binsize: 1.0,
            min_bin: None,
            max_bin: None,
            log_spacing: false,
        }
    }
}

impl RadialBinning {
    pub fn with_log_spacing(mut self, log_spacing: bool) -> Self {
        self.log_spacing = log_spacing;
        self
    }

    pub fn with_nbins(mut self, nbins: usize) -> Self {
        assert!(nbins > 0, "nbins must be positive");
        self.nbins = Some(nbins);
        self
    }

    pub fn with_range(mut self, min_bin: f64, max_bin: f64) -> Self {
        assert!(
            min_bin < max_bin,
            "min_bin must be below max_bin, got {min_bin} >= {max_bin}"
        );
        self.min_bin = Some(min_bin);
        self.max_bin = Some(max_bin);
        self
    }

    pub fn validate(&self) {
        assert!(self.nbins.is_none_or(|n| n > 0), "nbins must be positive");
        assert!(
            self.binsize > 0.0,
            "binsize must be positive, got {}",
            self.binsize
        );
        if self.log_spacing {
            if let Some(min_bin) = self.min_bin {
                assert!(
                    min_bin > 0.0,
                    "log-spaced bins need a positive min_bin, got {min_bin}"
                );
            }
        }
    }
}

/// Per-bin statistics, in pixels of the binned array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialProfile {
    /// Bin centers.
    pub radii: Vec<f64>,
    /// NaN-ignoring mean of each bin, NaN for bins without finite samples.
    pub mean: Vec<f64>,
    /// NaN-ignoring population standard deviation, when requested.
    pub stddev: Option<Vec<f64>>,
}

impl RadialProfile {
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}

/// Bin a row-major `height × width` array by distance from
/// `(height / 2, width / 2)`.
///
/// Samples outside `[min_bin, max_bin]` are ignored. The last bin includes its
/// outer edge.
pub fn radial_profile(
    values: &[f64],
    height: usize,
    width: usize,
    binning: &RadialBinning,
    with_stddev: bool,
) -> RadialProfile {
    assert_eq!(
        values.len(),
        height * width,
        "values length must equal height * width"
    );
    binning.validate();

    let (cy, cx) = ((height / 2) as f64, (width / 2) as f64);
    let radii: Vec<f64> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (y as f64 - cy).hypot(x as f64 - cx)))
        .collect();
    let max_radius = radii.iter().copied().fold(0.0, f64::max);

    let nbins = binning
        .nbins
        .unwrap_or_else(|| (max_radius / binning.binsize).round() as usize + 1);
    let min_bin = binning.min_bin.unwrap_or(0.5);
    let max_bin = binning.max_bin.unwrap_or(max_radius);
    let edges = bin_edges(min_bin, max_bin, nbins, binning.log_spacing);

    let mut members: Vec<Vec<f64>> = vec![Vec::new(); nbins];
    for (&r, &v) in radii.iter().zip(values) {
        if let Some(bin) = bin_index(&edges, r) {
            members[bin].push(v);
        }
    }

    let centers = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
    let mean: Vec<f64> = members
        .iter()
        .map(|m| m.iter().copied().finite_mean())
        .collect();
    let stddev = with_stddev.then(|| {
        members
            .iter()
            .zip(&mean)
            .map(|(m, &mu)| m.iter().map(|&v| (v - mu).powi(2)).finite_mean().sqrt())
            .collect()
    });

    RadialProfile {
        radii: centers,
        mean,
        stddev,
    }
}

fn bin_edges(min_bin: f64, max_bin: f64, nbins: usize, log_spacing: bool) -> Vec<f64> {
    let steps = nbins as f64;
    let mut edges: Vec<f64> = if log_spacing {
        let (lo, hi) = (min_bin.log10(), max_bin.log10());
        (0..=nbins)
            .map(|k| 10f64.powf(lo + (hi - lo) * k as f64 / steps))
            .collect()
    } else {
        (0..=nbins)
            .map(|k| min_bin + (max_bin - min_bin) * k as f64 / steps)
            .collect()
    };
    // Pin the end points so the outermost radius is never lost to round-off.
    edges[0] = min_bin;
    edges[nbins] = max_bin;
    edges
}

/// Bin containing `r`: `edges[k] <= r < edges[k + 1]`, with the final edge inclusive.
fn bin_index(edges: &[f64], r: f64) -> Option<usize> {
    let (first, last) = (edges[0], edges[edges.len() - 1]);
    if r < first || r > last {
        return None;
    }
    let nbins = edges.len() - 1;
    let k = edges.partition_point(|&e| e <= r) - 1;
    Some(k.min(nbins - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bins_for_5x5() {
        let values = vec![1.0; 25];
        let profile = radial_profile(&values, 5, 5, &RadialBinning::default(), false);
        // max radius sqrt(8) rounds to 3, plus one
        assert_eq!(profile.len(), 4);
        assert!(profile.stddev.is_none());
        for &m in &profile.mean {
            assert_eq!(m, 1.0);
        }
        let max_radius = 8f64.sqrt();
        let width = (max_radius - 0.5) / 4.0;
        assert!((profile.radii[0] - (0.5 + width / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_center_pixel_excluded() {
        let mut values = vec![0.0; 9];
        values[4] = 100.0;
        let binning = RadialBinning::default().with_nbins(1);
        let profile = radial_profile(&values, 3, 3, &binning, true);
        assert_eq!(profile.mean, vec![0.0]);
        assert_eq!(profile.stddev, Some(vec![0.0]));
    }

    #[test]
    fn test_default_bins_for_3x3_leave_inner_bin_empty() {
        // Edges [0.5, 0.957, 1.414]: no cell has a radius in the first bin.
        let mut values = vec![0.0; 9];
        values[4] = 100.0;
        let profile = radial_profile(&values, 3, 3, &RadialBinning::default(), false);
        assert_eq!(profile.len(), 2);
        assert!(profile.mean[0].is_nan());
        assert_eq!(profile.mean[1], 0.0);
    }

    #[test]
    fn test_mean_and_stddev_of_ring() {
        // 3x3: the four edge neighbours sit at r = 1, corners at r = sqrt(2).
        let values = vec![
            5.0, 1.0, 5.0, //
            3.0, 0.0, 1.0, //
            5.0, 3.0, 5.0,
        ];
        let binning = RadialBinning::default().with_nbins(2).with_range(0.5, 1.7);
        let profile = radial_profile(&values, 3, 3, &binning, true);
        assert_eq!(profile.mean, vec![2.0, 5.0]);
        let stddev = profile.stddev.unwrap();
        assert!((stddev[0] - 1.0).abs() < 1e-12);
        assert_eq!(stddev[1], 0.0);
    }

    #[test]
    fn test_nan_samples_ignored() {
        let values = vec![
            f64::NAN, 2.0, f64::NAN, //
            2.0, 9.0, 2.0, //
            f64::NAN, 2.0, f64::NAN,
        ];
        let binning = RadialBinning::default().with_nbins(2).with_range(0.5, 1.7);
        let profile = radial_profile(&values, 3, 3, &binning, true);
        assert_eq!(profile.mean[0], 2.0);
        assert!(profile.mean[1].is_nan());
        assert!(profile.stddev.unwrap()[1].is_nan());
    }

    #[test]
    fn test_log_spacing_edges() {
        let edges = bin_edges(1.0, 100.0, 2, true);
        assert!((edges[0] - 1.0).abs() < 1e-12);
        assert!((edges[1] - 10.0).abs() < 1e-9);
        assert!((edges[2] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_bin_index_edges() {
        let edges = [0.5, 1.5, 2.5];
        assert_eq!(bin_index(&edges, 0.4), None);
        assert_eq!(bin_index(&edges, 0.5), Some(0));
        assert_eq!(bin_index(&edges, 1.5), Some(1));
        assert_eq!(bin_index(&edges, 2.5), Some(1));
        assert_eq!(bin_index(&edges, 2.6), None);
    }

    #[test]
    #[should_panic(expected = "nbins must be positive")]
    fn test_zero_nbins_from_config_rejected() {
        let binning: RadialBinning = serde_json::from_str(r#"{ "nbins": 0 }"#).unwrap();
        radial_profile(&[1.0; 9], 3, 3, &binning, false);
    }

    #[test]
    #[should_panic(expected = "binsize must be positive")]
    fn test_invalid_binsize() {
        let binning = RadialBinning {
            binsize: 0.0,
            ..Default::default()
        };
        radial_profile(&[1.0], 1, 1, &binning, false);
    }
}
