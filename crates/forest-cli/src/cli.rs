//! Command line arguments for `forest-plan`.

use crate::config::Config;
use crate::raster::parse_coordinate;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use forest_core::{
    Coordinate, CostModel, GridConfig, ObstacleSide, PlannerConfig, ThresholdPolicy,
    ThresholdSource,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Least-cost route across a forest terrain image", long_about = None)]
pub struct Args {
    /// Terrain image (PNG or JPEG); converted to 8-bit grayscale
    pub image: PathBuf,

    /// Start pixel as ROW,COL (default 0,0)
    #[arg(long, value_parser = parse_coordinate)]
    pub start: Option<Coordinate>,

    /// Target pixel as ROW,COL (default: bottom-right pixel)
    #[arg(long, value_parser = parse_coordinate)]
    pub target: Option<Coordinate>,

    /// Fixed obstacle threshold on grayscale intensity
    #[arg(long, conflicts_with = "isodata")]
    pub threshold: Option<u8>,

    /// Pick the threshold from the image histogram
    #[arg(long)]
    pub isodata: bool,

    /// Which side of the threshold is impassable
    #[arg(long, value_enum)]
    pub obstacle_side: Option<Side>,

    /// Charge darker (denser canopy) pixels more
    #[arg(long)]
    pub weighted: bool,

    /// Entry cost of a passable pixel
    #[arg(long)]
    pub base_cost: Option<f64>,

    /// Extra cost factor for the darkest pixels under --weighted
    #[arg(long)]
    pub canopy_weight: Option<f64>,

    /// Give up after expanding this many search nodes
    #[arg(long)]
    pub budget: Option<usize>,

    /// Allow diagonal moves past blocked corners
    #[arg(long)]
    pub corner_cutting: bool,

    /// PlannerConfig JSON file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Below,
    Above,
}

impl From<Side> for ObstacleSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Below => ObstacleSide::Below,
            Side::Above => ObstacleSide::Above,
        }
    }
}

const DEFAULT_CANOPY_WEIGHT: f64 = 4.0;

fn load_config_file(path: &Path) -> Result<PlannerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid planner config {}", path.display()))?;
    let names_source = value.pointer("/grid/threshold/source").is_some();
    let mut config: PlannerConfig = serde_json::from_value(value)
        .with_context(|| format!("invalid planner config {}", path.display()))?;
    if !names_source {
        config.grid.threshold.source = ThresholdSource::Isodata;
    }
    Ok(config)
}

impl Args {
    /// Load the base config file, if any, and layer environment and flags on top.
    ///
    /// Photographs are not pre-binarized, so unless a flag, `FOREST_THRESHOLD`
    /// or the config file names a threshold source, the isodata threshold is
    /// used.
    pub fn planner_config(&self, env: &Config) -> Result<PlannerConfig> {
        let base = match &self.config {
            Some(path) => load_config_file(path)?,
            None => PlannerConfig {
                grid: GridConfig {
                    threshold: ThresholdPolicy::isodata(ObstacleSide::Below),
                    ..GridConfig::default()
                },
                ..PlannerConfig::default()
            },
        };
        Ok(self.apply_overrides(base, env))
    }

    fn apply_overrides(&self, mut config: PlannerConfig, env: &Config) -> PlannerConfig {
        let policy = &mut config.grid.threshold;
        if self.isodata {
            policy.source = ThresholdSource::Isodata;
        } else if let Some(threshold) = self.threshold.or(env.threshold) {
            policy.source = ThresholdSource::Fixed(threshold);
        }
        if let Some(side) = self.obstacle_side {
            policy.obstacle_side = side.into();
        }

        let (current_base, current_weight) = match config.grid.cost_model {
            CostModel::Binary { base_cost } => (base_cost, None),
            CostModel::Weighted {
                base_cost,
                canopy_weight,
            } => (base_cost, Some(canopy_weight)),
        };
        let base_cost = self.base_cost.unwrap_or(current_base);
        let weighted = self.weighted || env.weighted || current_weight.is_some();
        config.grid.cost_model = if weighted {
            CostModel::Weighted {
                base_cost,
                canopy_weight: self
                    .canopy_weight
                    .or(current_weight)
                    .unwrap_or(DEFAULT_CANOPY_WEIGHT),
            }
        } else {
            CostModel::Binary { base_cost }
        };

        if let Some(budget) = self.budget.or(env.expansion_budget) {
            config.search.expansion_budget = Some(budget);
        }
        if self.corner_cutting {
            config.search.allow_corner_cutting = true;
        }
        config
    }
}
