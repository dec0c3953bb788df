//! Configuration for single-cube SCF runs and two-cube comparisons.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lags::RollLags;
use crate::shift::ShiftMethod;

/// Configuration for a single SCF computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScfConfig {
    /// Number of lags per axis. Even values are reduced by one.
    pub size: usize,
    /// Explicit lags in pixels. Overrides `size` when set.
    pub roll_lags: Option<Vec<f64>>,
    /// How non-zero lags are shifted.
    pub shift_method: ShiftMethod,
}

impl Default for ScfConfig {
    fn default() -> Self {
        Self {
            size: 11,
            roll_lags: None,
            shift_method: ShiftMethod::Auto,
        }
    }
}

impl ScfConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        assert!(size > 0, "size must be positive");
        self.size = size;
        self
    }

    pub fn with_roll_lags(mut self, roll_lags: Vec<f64>) -> Self {
        self.roll_lags = Some(roll_lags);
        self
    }

    pub fn with_shift_method(mut self, shift_method: ShiftMethod) -> Self {
        self.shift_method = shift_method;
        self
    }

    /// Resolve the lag grid described by this configuration.
    pub fn roll_lags(&self) -> Result<RollLags> {
        match &self.roll_lags {
            Some(values) => RollLags::from_values(values.clone()),
            None => RollLags::centered(self.size),
        }
    }
}

/// Configuration for comparing two cubes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    /// Number of lags per axis of the shared grid.
    pub size: usize,
    /// Explicit shared lags in pixels. Overrides `size` when set.
    pub roll_lags: Option<Vec<f64>>,
    /// Weight surface differences by inverse lag distance.
    pub weighted: bool,
    /// How non-zero lags are shifted on both cubes.
    pub shift_method: ShiftMethod,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            size: 21,
            roll_lags: None,
            weighted: true,
            shift_method: ShiftMethod::Auto,
        }
    }
}

impl DistanceConfig {
    pub fn with_size(mut self, size: usize) -> Self {
        assert!(size > 0, "size must be positive");
        self.size = size;
        self
    }

    pub fn with_roll_lags(mut self, roll_lags: Vec<f64>) -> Self {
        self.roll_lags = Some(roll_lags);
        self
    }

    pub fn with_weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    pub fn with_shift_method(mut self, shift_method: ShiftMethod) -> Self {
        self.shift_method = shift_method;
        self
    }

    /// Shared lag grid before any scale reconciliation.
    pub fn roll_lags(&self) -> Result<RollLags> {
        self.scf_config().roll_lags()
    }

    /// Per-cube configuration carrying the same lags and shift method.
    pub fn scf_config(&self) -> ScfConfig {
        ScfConfig {
            size: self.size,
            roll_lags: self.roll_lags.clone(),
            shift_method: self.shift_method,
        }
    }
}
