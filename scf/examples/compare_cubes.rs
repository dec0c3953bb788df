//! Example: Compare two cubes with the SCF distance
//!
//! Builds two synthetic turbulent-looking cubes, one sampled on a pixel grid
//! 1.5x coarser than the other, computes both SCF spectra and the distance
//! between their surfaces on reconciled lag grids.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --example compare_cubes -- [distance_config.json]
//! ```
//!
//! The optional JSON file is a `DistanceConfig`, e.g. `{ "size": 11, "weighted": false }`.

use std::f64::consts::TAU;
use std::path::Path;

use anyhow::Context;
use scf::prelude::*;

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info", None)?;

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => DistanceConfig::default().with_size(11),
    };
    tracing::info!(?config, "Distance configuration");

    let fine = plane_wave_cube(CubeDimensions::new(24, 48, 48), 1.0)?;
    let coarse = plane_wave_cube(CubeDimensions::new(24, 32, 32), 1.5)?;
    let fine_wcs = Wcs::from_scale_rotation(6.0, 0.0);
    let coarse_wcs = Wcs::from_scale_rotation(9.0, 0.0);

    let mut distance =
        ScfDistance::with_wcs(&fine, Some(fine_wcs), &coarse, Some(coarse_wcs), &config)?;

    for (name, scf) in [("fine", distance.scf1()), ("coarse", distance.scf2())] {
        let Some(spectrum) = scf.spectrum() else {
            continue;
        };
        let arcsec = scf
            .lags_in(AngleUnit::Arcsecond)?
            .context("spectrum computed but no lags")?;
        println!("\n{name} cube ({} lags)", scf.roll_lags().len());
        for ((_, value, stddev), lag) in spectrum.iter().zip(&arcsec) {
            println!(
                "  {lag:8.2} arcsec  scf = {value:.4} +/- {:.4}",
                stddev.unwrap_or(f64::NAN)
            );
        }
    }

    let d = distance.distance_metric()?;
    println!("\nSCF distance: {d:.6}");

    let results = serde_json::to_string_pretty(&distance.scf1().clone().into_results())?;
    tracing::debug!(%results, "Fiducial results");

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<DistanceConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Superposed plane waves whose wavelengths are fixed on the sky, so that
/// `pixel_size` (relative to the fine grid) changes only the sampling.
fn plane_wave_cube(dims: CubeDimensions, pixel_size: f64) -> anyhow::Result<Cube> {
    let waves = [(12.0, 0.3), (7.0, 1.1), (4.5, 2.0)];
    let mut data = Vec::with_capacity(dims.sample_count());
    for c in 0..dims.channels {
        let velocity_phase = c as f64 * 0.2;
        for y in 0..dims.height {
            for x in 0..dims.width {
                let (sy, sx) = (y as f64 * pixel_size, x as f64 * pixel_size);
                let signal: f64 = waves
                    .iter()
                    .map(|&(wavelength, angle): &(f64, f64)| {
                        let k = TAU / wavelength;
                        (k * (sy * angle.sin() + sx * angle.cos()) + velocity_phase).sin()
                            / wavelength.sqrt()
                    })
                    .sum();
                data.push(3.0 + signal);
            }
        }
    }
    Ok(Cube::new(dims, data)?)
}
