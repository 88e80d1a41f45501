//! Error taxonomy for the planning core.
//!
//! "No path" and "inconclusive" are ordinary outcomes, not errors. They are
//! reported through [`crate::search::SearchOutcome`] and
//! [`crate::planner::PlanStatus`].

use crate::models::Coordinate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid grid shape: {0}")]
    InvalidGridShape(String),

    #[error("invalid cell cost {cost} at {coord}")]
    InvalidCost { coord: Coordinate, cost: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{role} coordinate {coord} is outside the {rows}x{cols} grid")]
    OutOfBoundsCoordinate {
        role: Endpoint,
        coord: Coordinate,
        rows: usize,
        cols: usize,
    },

    #[error("{role} cell {coord} is impassable")]
    UnreachableEndpoint { role: Endpoint, coord: Coordinate },

    #[error("inconsistent result: {0}")]
    InconsistentResult(String),
}

/// Which end of a planning request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
