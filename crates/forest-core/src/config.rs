//! Planner configuration.
//!
//! Every struct here has a `Default` that reproduces the binary
//! passable/impassable model on a pre-binarized raster, and deserializes from
//! partial JSON so config files only need the fields they change.

use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub grid: GridConfig,
    pub search: SearchConfig,
}

/// How a raster becomes a traversal grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub threshold: ThresholdPolicy,
    pub cost_model: CostModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    pub source: ThresholdSource,
    pub obstacle_side: ObstacleSide,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            source: ThresholdSource::Fixed(1),
            obstacle_side: ObstacleSide::Below,
        }
    }
}

impl ThresholdPolicy {
    pub fn fixed(threshold: u8, obstacle_side: ObstacleSide) -> Self {
        Self {
            source: ThresholdSource::Fixed(threshold),
            obstacle_side,
        }
    }

    pub fn isodata(obstacle_side: ObstacleSide) -> Self {
        Self {
            source: ThresholdSource::Isodata,
            obstacle_side,
        }
    }

    /// Classify `intensity` against the threshold this policy resolved to.
    ///
    /// An isodata threshold is the top of the low class, so under `Below` the
    /// threshold value itself is an obstacle.
    pub fn is_obstacle(&self, intensity: u8, threshold: u8) -> bool {
        match (self.source, self.obstacle_side) {
            (ThresholdSource::Isodata, ObstacleSide::Below) => intensity <= threshold,
            (_, side) => side.is_obstacle(intensity, threshold),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Fixed(u8),
    /// Picked from the raster histogram by iterative intermeans.
    Isodata,
}

/// Which side of the threshold is impassable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleSide {
    /// `intensity < threshold` is an obstacle.
    Below,
    /// `intensity > threshold` is an obstacle.
    Above,
}

impl ObstacleSide {
    pub fn is_obstacle(self, intensity: u8, threshold: u8) -> bool {
        match self {
            ObstacleSide::Below => intensity < threshold,
            ObstacleSide::Above => intensity > threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CostModel {
    /// Every passable cell costs `base_cost`.
    Binary { base_cost: f64 },
    /// Darker (denser canopy) cells cost more:
    /// `base_cost * (1 + canopy_weight * (255 - v) / 255)`.
    Weighted { base_cost: f64, canopy_weight: f64 },
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel::Binary { base_cost: 1.0 }
    }
}

impl CostModel {
    pub fn validate(&self) -> Result<()> {
        let (base_cost, canopy_weight) = match *self {
            CostModel::Binary { base_cost } => (base_cost, 0.0),
            CostModel::Weighted {
                base_cost,
                canopy_weight,
            } => (base_cost, canopy_weight),
        };
        if !base_cost.is_finite() || base_cost < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "base_cost must be finite and non-negative, got {base_cost}"
            )));
        }
        if !canopy_weight.is_finite() || canopy_weight < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "canopy_weight must be finite and non-negative, got {canopy_weight}"
            )));
        }
        Ok(())
    }

    /// Entry cost of a passable cell with the given intensity.
    pub fn cell_cost(&self, intensity: u8) -> f64 {
        match *self {
            CostModel::Binary { base_cost } => base_cost,
            CostModel::Weighted {
                base_cost,
                canopy_weight,
            } => {
                let canopy = f64::from(u8::MAX - intensity) / f64::from(u8::MAX);
                base_cost * (1.0 + canopy_weight * canopy)
            }
        }
    }
}

/// Search limits and movement rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of nodes to finalize before giving up as inconclusive.
    pub expansion_budget: Option<usize>,
    /// Allow diagonal moves that squeeze between two cells when one of them
    /// is impassable.
    pub allow_corner_cutting: bool,
}
