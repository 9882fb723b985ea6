//! Collaborator contracts for the route search.
//!
//! These are intentionally minimal. Concrete apps implement them over their
//! own place store and path oracle; [`crate::osrm::OsrmClient`] covers the
//! routing side for an OSRM backend.

use crate::error::Result;
use crate::geometry::{BoundingEllipse, Point};
use crate::model::{Path, Place};

/// Geo-spatial lookup of candidate places.
pub trait EntityIndex {
    /// Request-level category description (keyword, filters, ...). The
    /// search only cares about its position in the request list.
    type Category;

    /// Places inside `region` matching at least one of `categories`.
    ///
    /// Each returned place lists the indices into `categories` it matches.
    fn get_within(&self, region: &BoundingEllipse, categories: &[Self::Category]) -> Result<Vec<Place>>;
}

/// Shortest-path oracle over a street network.
pub trait RoutingEngine {
    /// Paths visiting `waypoints` in the given order. May return several
    /// alternatives, or none if the waypoints cannot be connected.
    fn shortest_paths(&self, waypoints: &[Point]) -> Result<Vec<Path>>;
}
