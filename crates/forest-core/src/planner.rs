//! Planning pipeline and result assembly.
//!
//! `plan` runs raster -> grid -> search -> metrics -> result in one call.
//! Nothing is cached between calls; a built [`Grid`] may be shared read-only
//! by concurrent `plan_on_grid` calls.

use crate::config::{PlannerConfig, SearchConfig};
use crate::error::{PlanError, Result};
use crate::grid::{build_grid, Grid};
use crate::metrics::{compute_metrics, Metrics};
use crate::models::{Coordinate, Path};
use crate::search::{search, SearchOutcome};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub start: Coordinate,
    pub target: Coordinate,
}

impl PlanRequest {
    pub fn new(start: Coordinate, target: Coordinate) -> Self {
        Self { start, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Found,
    NoPath,
    Inconclusive,
}

/// Search bookkeeping carried into the assembled result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub status: PlanStatus,
    pub nodes_expanded: usize,
}

impl From<&SearchOutcome> for SearchStats {
    fn from(outcome: &SearchOutcome) -> Self {
        let status = match outcome {
            SearchOutcome::Found { .. } => PlanStatus::Found,
            SearchOutcome::NoPath { .. } => PlanStatus::NoPath,
            SearchOutcome::Inconclusive { .. } => PlanStatus::Inconclusive,
        };
        Self {
            status,
            nodes_expanded: outcome.nodes_expanded(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningResult {
    pub status: PlanStatus,
    pub start: Coordinate,
    pub target: Coordinate,
    pub path: Path,
    pub total_cost: f64,
    pub path_length: usize,
    pub coverage_ratio: f64,
    pub anti_coverage_ratio: f64,
    pub travel_distance: f64,
    pub grid_cost_sum: f64,
    pub nodes_expanded: usize,
    /// Wall-clock time of the planning call. Informational only.
    pub elapsed_ms: f64,
}

impl PlanningResult {
    pub fn is_found(&self) -> bool {
        self.status == PlanStatus::Found
    }
}

/// Package a path and its metrics, checking that they agree with the request.
pub fn assemble(
    request: &PlanRequest,
    path: Path,
    metrics: Metrics,
    stats: SearchStats,
) -> Result<PlanningResult> {
    if let (Some(first), Some(last)) = (path.first(), path.last()) {
        if first != request.start || last != request.target {
            return Err(PlanError::InconsistentResult(format!(
                "path runs {first} -> {last} but request was {} -> {}",
                request.start, request.target
            )));
        }
    }
    if metrics.path_length != path.len() {
        return Err(PlanError::InconsistentResult(format!(
            "metrics describe {} cells but path has {}",
            metrics.path_length,
            path.len()
        )));
    }
    if (stats.status == PlanStatus::Found) == path.is_empty() {
        return Err(PlanError::InconsistentResult(format!(
            "status {:?} with a {}-cell path",
            stats.status,
            path.len()
        )));
    }

    Ok(PlanningResult {
        status: stats.status,
        start: request.start,
        target: request.target,
        path,
        total_cost: metrics.total_cost,
        path_length: metrics.path_length,
        coverage_ratio: metrics.coverage_ratio,
        anti_coverage_ratio: metrics.anti_coverage_ratio,
        travel_distance: metrics.travel_distance,
        grid_cost_sum: metrics.grid_cost_sum,
        nodes_expanded: stats.nodes_expanded,
        elapsed_ms: 0.0,
    })
}

/// Build a grid from `raster` and plan a route across it.
pub fn plan<R: AsRef<[u8]>>(
    raster: &[R],
    request: &PlanRequest,
    config: &PlannerConfig,
) -> Result<PlanningResult> {
    let started = Instant::now();
    let grid = build_grid(raster, &config.grid)?;
    let mut result = run(&grid, request, &config.search)?;
    result.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    log_result(&result);
    Ok(result)
}

/// Plan a route across an already built grid.
pub fn plan_on_grid(
    grid: &Grid,
    request: &PlanRequest,
    config: &SearchConfig,
) -> Result<PlanningResult> {
    let started = Instant::now();
    let mut result = run(grid, request, config)?;
    result.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    log_result(&result);
    Ok(result)
}

fn run(grid: &Grid, request: &PlanRequest, config: &SearchConfig) -> Result<PlanningResult> {
    let outcome = search(grid, request.start, request.target, config)?;
    let stats = SearchStats::from(&outcome);
    let path = outcome.into_path();
    let metrics = compute_metrics(grid, &path);
    assemble(request, path, metrics, stats)
}

fn log_result(result: &PlanningResult) {
    info!(
        status = ?result.status,
        start = %result.start,
        target = %result.target,
        path_length = result.path_length,
        total_cost = result.total_cost,
        nodes_expanded = result.nodes_expanded,
        elapsed_ms = result.elapsed_ms,
        "planning finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, ObstacleSide, ThresholdPolicy};

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn test_plan_uniform_raster() {
        let raster = vec![vec![255u8; 3]; 3];
        let result = plan(
            &raster,
            &PlanRequest::new(c(0, 0), c(2, 2)),
            &PlannerConfig::default(),
        )
        .unwrap();
        assert_eq!(result.status, PlanStatus::Found);
        assert_eq!(result.path_length, 3);
        assert!((result.total_cost - 2.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
        assert_eq!(result.coverage_ratio, 100.0);
        assert!(result.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_plan_reports_no_path_as_result() {
        let raster = vec![vec![1u8, 0, 1], vec![1, 0, 1], vec![1, 0, 1]];
        let result = plan(
            &raster,
            &PlanRequest::new(c(0, 0), c(2, 2)),
            &PlannerConfig::default(),
        )
        .unwrap();
        assert_eq!(result.status, PlanStatus::NoPath);
        assert!(result.path.is_empty());
        assert_eq!(result.path_length, 0);
        assert_eq!(result.total_cost, 0.0);
        assert!((result.coverage_ratio - 200.0 / 3.0).abs() < 1e-9);
        assert!((result.coverage_ratio + result.anti_coverage_ratio - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_with_inverted_threshold() {
        // Bright pixels are obstacles here.
        let raster = vec![vec![0u8, 250, 0], vec![0, 250, 0], vec![0, 0, 0]];
        let config = PlannerConfig {
            grid: GridConfig {
                threshold: ThresholdPolicy::fixed(128, ObstacleSide::Above),
                ..GridConfig::default()
            },
            ..PlannerConfig::default()
        };
        let result = plan(&raster, &PlanRequest::new(c(0, 0), c(0, 2)), &config).unwrap();
        assert!(result.is_found());
        assert!(result.path.cells().contains(&c(2, 1)));
    }

    #[test]
    fn test_assemble_rejects_mismatched_endpoints() {
        let grid = Grid::uniform(2, 2, 1.0).unwrap();
        let path = Path::new(vec![c(0, 0), c(1, 1)]);
        let metrics = compute_metrics(&grid, &path);
        let stats = SearchStats {
            status: PlanStatus::Found,
            nodes_expanded: 2,
        };

        let wrong_target = PlanRequest::new(c(0, 0), c(1, 0));
        assert!(matches!(
            assemble(&wrong_target, path.clone(), metrics, stats),
            Err(PlanError::InconsistentResult(_))
        ));

        let request = PlanRequest::new(c(0, 0), c(1, 1));
        let result = assemble(&request, path, metrics, stats).unwrap();
        assert_eq!(result.path_length, 2);
        assert_eq!(result.nodes_expanded, 2);
    }

    #[test]
    fn test_assemble_rejects_status_mismatch() {
        let grid = Grid::uniform(2, 2, 1.0).unwrap();
        let request = PlanRequest::new(c(0, 0), c(1, 1));
        let empty = Path::empty();
        let metrics = compute_metrics(&grid, &empty);
        let stats = SearchStats {
            status: PlanStatus::Found,
            nodes_expanded: 0,
        };
        assert!(assemble(&request, empty.clone(), metrics, stats).is_err());

        let stats = SearchStats {
            status: PlanStatus::NoPath,
            nodes_expanded: 3,
        };
        assert!(assemble(&request, empty, metrics, stats).is_ok());
    }

    #[test]
    fn test_result_json_shape() {
        let grid = Grid::uniform(1, 2, 1.0).unwrap();
        let result = plan_on_grid(
            &grid,
            &PlanRequest::new(c(0, 0), c(0, 1)),
            &SearchConfig::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["path"][1]["col"], 1);
        assert_eq!(json["path_length"], 2);
        assert_eq!(json["total_cost"], 1.0);
    }
}
