//! Path geometry as a decoded coordinate sequence.
//!
//! Conversion from wire formats happens at the routing engine boundary; the
//! rest of the crate only sees points.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, haversine_distance};

/// The geometry of a walking path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build from GeoJSON-ordered `[lon, lat]` pairs.
    pub fn from_lon_lat(coordinates: &[[f64; 2]]) -> Self {
        Self {
            points: coordinates.iter().map(|c| Point::new(c[0], c[1])).collect(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Crow-fly length of the line in meters.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_distance(&pair[0], &pair[1]))
            .sum()
    }
}
