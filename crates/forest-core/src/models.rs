//! Core value types shared by the grid, search and metrics modules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position, row-major, zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset by a signed step, or `None` if the result would be negative.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// True if `other` is one of the eight neighbours of `self`.
    pub fn is_adjacent(self, other: Self) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr + dc) > 0
    }

    /// True if `other` is a diagonal neighbour of `self`.
    pub fn is_diagonal_to(self, other: Self) -> bool {
        self.row.abs_diff(other.row) == 1 && self.col.abs_diff(other.col) == 1
    }

    /// Straight-line distance in cells.
    pub fn euclidean_distance(self, other: Self) -> f64 {
        let dr = self.row.abs_diff(other.row) as f64;
        let dc = self.col.abs_diff(other.col) as f64;
        dr.hypot(dc)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Ordered cell sequence from a start cell to a target cell.
///
/// An empty path means no route exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    cells: Vec<Coordinate>,
}

impl Path {
    pub fn new(cells: Vec<Coordinate>) -> Self {
        Self { cells }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.cells.last().copied()
    }

    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Consecutive pairs of cells, one per move.
    pub fn steps(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.cells.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// True if every consecutive pair is one 8-connected move apart.
    pub fn is_connected(&self) -> bool {
        self.steps().all(|(a, b)| a.is_adjacent(b))
    }
}
