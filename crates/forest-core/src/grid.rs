//! Terrain grid construction from single-channel rasters.

use crate::config::{GridConfig, ThresholdSource};
use crate::error::{PlanError, Result};
use crate::models::Coordinate;
use tracing::debug;

const ISODATA_MAX_ITERATIONS: usize = 256;

/// Price of entering a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraversalCost {
    Passable(f64),
    Impassable,
}

impl TraversalCost {
    pub fn is_passable(self) -> bool {
        matches!(self, TraversalCost::Passable(_))
    }

    pub fn value(self) -> Option<f64> {
        match self {
            TraversalCost::Passable(cost) => Some(cost),
            TraversalCost::Impassable => None,
        }
    }
}

/// Immutable `rows x cols` array of traversal costs, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<TraversalCost>,
    min_cost: f64,
    passable: usize,
}

impl Grid {
    /// Build a grid from explicit costs.
    pub fn from_costs(rows: usize, cols: usize, cells: Vec<TraversalCost>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(PlanError::InvalidGridShape(format!(
                "grid must be at least 1x1, got {rows}x{cols}"
            )));
        }
        let expected = rows.checked_mul(cols).ok_or_else(|| {
            PlanError::InvalidGridShape(format!("{rows}x{cols} grid is too large"))
        })?;
        if cells.len() != expected {
            return Err(PlanError::InvalidGridShape(format!(
                "expected {expected} cells for a {rows}x{cols} grid, got {}",
                cells.len()
            )));
        }

        let mut min_cost = f64::INFINITY;
        let mut passable = 0usize;
        for (index, cell) in cells.iter().enumerate() {
            if let TraversalCost::Passable(cost) = *cell {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(PlanError::InvalidCost {
                        coord: Coordinate::new(index / cols, index % cols),
                        cost,
                    });
                }
                min_cost = min_cost.min(cost);
                passable += 1;
            }
        }
        if passable == 0 {
            min_cost = 0.0;
        }

        Ok(Self {
            rows,
            cols,
            cells,
            min_cost,
            passable,
        })
    }

    /// Grid where every cell is passable at `cost`.
    pub fn uniform(rows: usize, cols: usize, cost: f64) -> Result<Self> {
        Self::from_costs(
            rows,
            cols,
            vec![TraversalCost::Passable(cost); rows.saturating_mul(cols)],
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Cost of the cell at `coord`, or `None` when out of bounds.
    pub fn cost(&self, coord: Coordinate) -> Option<TraversalCost> {
        self.contains(coord).then(|| self.cells[self.index_of(coord)])
    }

    pub fn is_passable(&self, coord: Coordinate) -> bool {
        self.cost(coord).is_some_and(TraversalCost::is_passable)
    }

    /// Number of passable cells.
    pub fn passable_count(&self) -> usize {
        self.passable
    }

    /// Smallest finite cell cost, `0.0` if nothing is passable.
    pub fn min_cost(&self) -> f64 {
        self.min_cost
    }

    pub fn cells(&self) -> &[TraversalCost] {
        &self.cells
    }

    pub(crate) fn index_of(&self, coord: Coordinate) -> usize {
        coord.row * self.cols + coord.col
    }

    pub(crate) fn coord_of(&self, index: usize) -> Coordinate {
        Coordinate::new(index / self.cols, index % self.cols)
    }

    pub(crate) fn cell_at(&self, index: usize) -> TraversalCost {
        self.cells[index]
    }
}

/// Convert a rectangular intensity raster into a traversal grid.
pub fn build_grid<R: AsRef<[u8]>>(raster: &[R], config: &GridConfig) -> Result<Grid> {
    let (rows, cols) = raster_shape(raster)?;
    config.cost_model.validate()?;

    let threshold = match config.threshold.source {
        ThresholdSource::Fixed(value) => value,
        ThresholdSource::Isodata => {
            isodata_threshold(raster.iter().flat_map(|row| row.as_ref().iter().copied()))
        }
    };
    debug!(
        rows,
        cols,
        threshold,
        obstacle_side = ?config.threshold.obstacle_side,
        "building traversal grid"
    );

    let policy = config.threshold;
    let cells = raster
        .iter()
        .flat_map(|row| row.as_ref().iter().copied())
        .map(|intensity| {
            if policy.is_obstacle(intensity, threshold) {
                TraversalCost::Impassable
            } else {
                TraversalCost::Passable(config.cost_model.cell_cost(intensity))
            }
        })
        .collect();

    Grid::from_costs(rows, cols, cells)
}

fn raster_shape<R: AsRef<[u8]>>(raster: &[R]) -> Result<(usize, usize)> {
    let Some(first) = raster.first() else {
        return Err(PlanError::InvalidGridShape("raster has no rows".to_string()));
    };
    let cols = first.as_ref().len();
    if cols == 0 {
        return Err(PlanError::InvalidGridShape(
            "raster rows are empty".to_string(),
        ));
    }
    if let Some((row, len)) = raster
        .iter()
        .map(|r| r.as_ref().len())
        .enumerate()
        .find(|(_, len)| *len != cols)
    {
        return Err(PlanError::InvalidGridShape(format!(
            "row {row} has {len} values, expected {cols}"
        )));
    }
    Ok((raster.len(), cols))
}

/// Isodata (Ridler-Calvard) threshold over 8-bit intensities.
///
/// Values `<= t` form the low class. Returns 0 for an empty input.
pub fn isodata_threshold<I: IntoIterator<Item = u8>>(values: I) -> u8 {
    let mut histogram = [0u64; 256];
    let mut total = 0u64;
    for value in values {
        histogram[value as usize] += 1;
        total += 1;
    }
    if total == 0 {
        return 0;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(v, &count)| v as f64 * count as f64)
        .sum();
    let mut threshold = (weighted_sum / total as f64).round() as usize;

    for _ in 0..ISODATA_MAX_ITERATIONS {
        let (mut low_n, mut low_sum) = (0u64, 0f64);
        for (v, &count) in histogram.iter().enumerate().take(threshold + 1) {
            low_n += count;
            low_sum += v as f64 * count as f64;
        }
        let high_n = total - low_n;
        let high_sum = weighted_sum - low_sum;
        if low_n == 0 || high_n == 0 {
            // Single class: everything sits on one side of the threshold.
            break;
        }
        let next = ((low_sum / low_n as f64 + high_sum / high_n as f64) / 2.0).round() as usize;
        if next == threshold {
            break;
        }
        threshold = next;
    }

    threshold.min(u8::MAX as usize) as u8
}
