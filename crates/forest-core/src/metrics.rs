//! Path-quality and terrain statistics.

use crate::grid::{Grid, TraversalCost};
use crate::models::Path;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Number of cells on the path, endpoints included.
    pub path_length: usize,
    /// Accumulated movement cost; diagonal entries weigh sqrt(2).
    pub total_cost: f64,
    /// Geometric length in pixels.
    pub travel_distance: f64,
    /// Percentage of grid cells that are passable.
    pub coverage_ratio: f64,
    pub anti_coverage_ratio: f64,
    /// Sum of every finite cell cost in the grid.
    pub grid_cost_sum: f64,
}

pub fn compute_metrics(grid: &Grid, path: &Path) -> Metrics {
    let mut total_cost = 0.0;
    let mut travel_distance = 0.0;
    for (from, to) in path.steps() {
        let factor = if from.is_diagonal_to(to) { SQRT_2 } else { 1.0 };
        let entry = grid
            .cost(to)
            .and_then(TraversalCost::value)
            .unwrap_or(0.0);
        total_cost += entry * factor;
        travel_distance += factor;
    }

    let coverage_ratio = grid.passable_count() as f64 / grid.cell_count() as f64 * 100.0;
    let grid_cost_sum: f64 = grid.cells().iter().filter_map(|cell| cell.value()).sum();

    Metrics {
        path_length: path.len(),
        total_cost,
        travel_distance,
        coverage_ratio,
        anti_coverage_ratio: 100.0 - coverage_ratio,
        grid_cost_sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    #[test]
    fn test_metrics_for_diagonal_path() {
        let grid = Grid::uniform(3, 3, 1.0).unwrap();
        let path = Path::new(vec![
            Coordinate::new(0, 0),
            Coordinate::new(1, 1),
            Coordinate::new(2, 2),
        ]);
        let metrics = compute_metrics(&grid, &path);
        assert_eq!(metrics.path_length, 3);
        assert!((metrics.total_cost - 2.0 * SQRT_2).abs() < 1e-12);
        assert!((metrics.travel_distance - 2.0 * SQRT_2).abs() < 1e-12);
        assert_eq!(metrics.coverage_ratio, 100.0);
        assert_eq!(metrics.anti_coverage_ratio, 0.0);
        assert_eq!(metrics.grid_cost_sum, 9.0);
    }

    #[test]
    fn test_start_cell_cost_is_not_charged() {
        let grid = Grid::from_costs(
            1,
            3,
            vec![
                TraversalCost::Passable(7.0),
                TraversalCost::Passable(2.0),
                TraversalCost::Passable(3.0),
            ],
        )
        .unwrap();
        let path = Path::new(vec![
            Coordinate::new(0, 0),
            Coordinate::new(0, 1),
            Coordinate::new(0, 2),
        ]);
        let metrics = compute_metrics(&grid, &path);
        assert_eq!(metrics.total_cost, 5.0);
        assert_eq!(metrics.travel_distance, 2.0);
        assert_eq!(metrics.grid_cost_sum, 12.0);
    }

    #[test]
    fn test_empty_path_still_reports_coverage() {
        let grid = Grid::from_costs(
            2,
            2,
            vec![
                TraversalCost::Passable(1.0),
                TraversalCost::Impassable,
                TraversalCost::Impassable,
                TraversalCost::Impassable,
            ],
        )
        .unwrap();
        let metrics = compute_metrics(&grid, &Path::empty());
        assert_eq!(metrics.path_length, 0);
        assert_eq!(metrics.total_cost, 0.0);
        assert_eq!(metrics.travel_distance, 0.0);
        assert_eq!(metrics.coverage_ratio, 25.0);
        assert_eq!(metrics.anti_coverage_ratio, 75.0);
        assert!((metrics.coverage_ratio + metrics.anti_coverage_ratio - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_cell_path_costs_nothing() {
        let grid = Grid::uniform(2, 2, 4.0).unwrap();
        let metrics = compute_metrics(&grid, &Path::new(vec![Coordinate::new(1, 1)]));
        assert_eq!(metrics.path_length, 1);
        assert_eq!(metrics.total_cost, 0.0);
    }
}
