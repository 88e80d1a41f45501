//! Forest path planning core.
//!
//! Turns a thresholded terrain raster into a traversal grid, finds the
//! least-cost 8-connected route between two cells with A*, and reports path
//! and terrain metrics.

pub mod config;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod models;
pub mod planner;
pub mod search;

pub use config::{
    CostModel, GridConfig, ObstacleSide, PlannerConfig, SearchConfig, ThresholdPolicy,
    ThresholdSource,
};
pub use error::{Endpoint, PlanError, Result};
pub use grid::{build_grid, isodata_threshold, Grid, TraversalCost};
pub use metrics::{compute_metrics, Metrics};
pub use models::{Coordinate, Path};
pub use planner::{
    assemble, plan, plan_on_grid, PlanRequest, PlanStatus, PlanningResult, SearchStats,
};
pub use search::{find_path, search, SearchOutcome};
