//! A* search over the 8-connected traversal grid.
//!
//! Axis moves cost the destination cell's entry cost, diagonal moves cost the
//! entry cost times sqrt(2). The heuristic is the Euclidean distance to the
//! target scaled by the grid's cheapest cell, which never overestimates and
//! is consistent, so every node is finalized at most once and the returned
//! path is optimal.
//!
//! Open-set ordering: lowest `f`, then highest `g`, then lowest row-major
//! cell index. This fixes which of several equal-cost paths is returned.

use crate::config::SearchConfig;
use crate::error::{Endpoint, PlanError, Result};
use crate::grid::{Grid, TraversalCost};
use crate::models::{Coordinate, Path};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;
use tracing::{debug, trace};

const NO_PARENT: usize = usize::MAX;

/// Axis neighbours first, then diagonals.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
    (-1, -1),
];

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found {
        path: Path,
        cost: f64,
        nodes_expanded: usize,
    },
    /// The open set emptied before reaching the target.
    NoPath { nodes_expanded: usize },
    /// The expansion budget ran out; the target may still be reachable.
    Inconclusive { nodes_expanded: usize },
}

impl SearchOutcome {
    pub fn nodes_expanded(&self) -> usize {
        match self {
            SearchOutcome::Found { nodes_expanded, .. }
            | SearchOutcome::NoPath { nodes_expanded }
            | SearchOutcome::Inconclusive { nodes_expanded } => *nodes_expanded,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// The found path, or an empty path for any other outcome.
    pub fn into_path(self) -> Path {
        match self {
            SearchOutcome::Found { path, .. } => path,
            _ => Path::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    index: usize,
    g_score: FloatOrd,
    f_score: FloatOrd,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    // Wrapped in `Reverse` on the heap, so "smaller" pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| other.g_score.cmp(&self.g_score))
            .then_with(|| self.index.cmp(&other.index))
    }
}

struct Heuristic {
    target: Coordinate,
    scale: f64,
}

impl Heuristic {
    fn estimate(&self, from: Coordinate) -> f64 {
        from.euclidean_distance(self.target) * self.scale
    }
}

/// Shortest path from `start` to `target`, empty if none exists.
pub fn find_path(grid: &Grid, start: Coordinate, target: Coordinate) -> Result<Path> {
    search(grid, start, target, &SearchConfig::default()).map(SearchOutcome::into_path)
}

/// A* search with explicit limits.
pub fn search(
    grid: &Grid,
    start: Coordinate,
    target: Coordinate,
    config: &SearchConfig,
) -> Result<SearchOutcome> {
    check_endpoint(grid, start, Endpoint::Start)?;
    check_endpoint(grid, target, Endpoint::Target)?;

    if start == target {
        return Ok(SearchOutcome::Found {
            path: Path::new(vec![start]),
            cost: 0.0,
            nodes_expanded: 0,
        });
    }

    let cell_count = grid.cell_count();
    let start_idx = grid.index_of(start);
    let target_idx = grid.index_of(target);
    let heuristic = Heuristic {
        target,
        scale: grid.min_cost(),
    };

    let mut g_score = vec![f64::INFINITY; cell_count];
    let mut came_from = vec![NO_PARENT; cell_count];
    let mut closed = vec![false; cell_count];
    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();

    g_score[start_idx] = 0.0;
    open_set.push(Reverse(OpenNode {
        index: start_idx,
        g_score: FloatOrd(0.0),
        f_score: FloatOrd(heuristic.estimate(start)),
    }));

    let mut nodes_expanded = 0usize;

    while let Some(Reverse(current)) = open_set.pop() {
        let current_idx = current.index;
        if closed[current_idx] || current.g_score.0 > g_score[current_idx] {
            continue;
        }

        if config
            .expansion_budget
            .is_some_and(|budget| nodes_expanded >= budget)
        {
            debug!(
                %start,
                %target,
                nodes_expanded,
                "search budget exhausted before reaching target"
            );
            return Ok(SearchOutcome::Inconclusive { nodes_expanded });
        }

        closed[current_idx] = true;
        nodes_expanded += 1;

        if current_idx == target_idx {
            let path = reconstruct_path(grid, &came_from, target_idx);
            let cost = g_score[target_idx];
            debug!(
                %start,
                %target,
                cost,
                length = path.len(),
                nodes_expanded,
                "path found"
            );
            return Ok(SearchOutcome::Found {
                path,
                cost,
                nodes_expanded,
            });
        }

        let current_coord = grid.coord_of(current_idx);
        let current_g = g_score[current_idx];
        trace!(cell = %current_coord, g = current_g, "expanding");

        for &(d_row, d_col) in &NEIGHBOR_OFFSETS {
            let Some(next) = current_coord.offset(d_row, d_col) else {
                continue;
            };
            if !grid.contains(next) {
                continue;
            }
            let next_idx = grid.index_of(next);
            if closed[next_idx] {
                continue;
            }
            let TraversalCost::Passable(entry_cost) = grid.cell_at(next_idx) else {
                continue;
            };

            let diagonal = d_row != 0 && d_col != 0;
            if diagonal
                && !config.allow_corner_cutting
                && !diagonal_is_clear(grid, current_coord, d_row, d_col)
            {
                continue;
            }

            let step_cost = if diagonal {
                entry_cost * SQRT_2
            } else {
                entry_cost
            };
            let tentative_g = current_g + step_cost;
            if tentative_g < g_score[next_idx] {
                g_score[next_idx] = tentative_g;
                came_from[next_idx] = current_idx;
                open_set.push(Reverse(OpenNode {
                    index: next_idx,
                    g_score: FloatOrd(tentative_g),
                    f_score: FloatOrd(tentative_g + heuristic.estimate(next)),
                }));
            }
        }
    }

    debug!(%start, %target, nodes_expanded, "no path between endpoints");
    Ok(SearchOutcome::NoPath { nodes_expanded })
}

fn check_endpoint(grid: &Grid, coord: Coordinate, role: Endpoint) -> Result<()> {
    if !grid.contains(coord) {
        return Err(PlanError::OutOfBoundsCoordinate {
            role,
            coord,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    if !grid.is_passable(coord) {
        return Err(PlanError::UnreachableEndpoint { role, coord });
    }
    Ok(())
}

/// Both cells flanking a diagonal move must be passable.
fn diagonal_is_clear(grid: &Grid, from: Coordinate, d_row: isize, d_col: isize) -> bool {
    let vertical = from.offset(d_row, 0);
    let horizontal = from.offset(0, d_col);
    vertical.is_some_and(|c| grid.is_passable(c)) && horizontal.is_some_and(|c| grid.is_passable(c))
}

fn reconstruct_path(grid: &Grid, came_from: &[usize], target_idx: usize) -> Path {
    let mut cells = Vec::new();
    let mut current = target_idx;
    while current != NO_PARENT {
        cells.push(grid.coord_of(current));
        current = came_from[current];
    }
    cells.reverse();
    Path::new(cells)
}
