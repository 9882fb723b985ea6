//! walk-planner core
//!
//! Sequences category-constrained walks between two points and verifies them
//! against a routing engine.

pub mod error;
pub mod geometry;
pub mod distance;
pub mod precedence;
pub mod model;
pub mod heuristics;
pub mod solver;
pub mod traits;
pub mod search;
pub mod osrm;
pub mod polyline;

pub use error::{Error, Result};
