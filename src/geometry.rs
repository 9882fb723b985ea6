//! Spherical geometry helpers.
//!
//! Great-circle distance and the bounding ellipse used to narrow entity
//! index queries. Distances are in meters, coordinates in WGS84 degrees.

use serde::{Deserialize, Serialize};

/// Sphere radius of the Web Mercator projection (semi-major axis), meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Extra major axis length added when the walking budget cannot even cover
/// the straight segment between the foci.
const DEGENERATE_MARGIN_M: f64 = 200.0;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Midpoint approximation, only meaningful for short distances.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.lon + other.lon) / 2.0, (self.lat + other.lat) / 2.0)
    }
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance(p1: &Point, p2: &Point) -> f64 {
    let delta_lon = (p2.lon - p1.lon).to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();

    let hav = (delta_lat / 2.0).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);

    let angle = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());

    EARTH_RADIUS_M * angle
}

/// Ellipse with foci at the source and target of a walk.
///
/// A point outside cannot lie on any walk from one focus to the other that
/// is at most `max_distance` long, so the region is a safe pruning bound for
/// candidate lookups. It is never used to accept or reject a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingEllipse {
    foci: (Point, Point),
    center: Point,
    semi_major: f64,
    semi_minor: f64,
    rotation: f64,
}

impl BoundingEllipse {
    /// Build the ellipse for a walk of at most `max_distance` meters.
    ///
    /// Foci are always inside, even if `max_distance` is shorter than the
    /// distance between them.
    pub fn new(source: Point, target: Point, max_distance: f64) -> Self {
        let center = source.midpoint(&target);
        let focal = haversine_distance(&source, &target) / 2.0;

        let major = if max_distance > 2.0 * focal {
            max_distance
        } else {
            2.0 * focal + DEGENERATE_MARGIN_M
        };
        let semi_major = major / 2.0;
        let semi_minor = (semi_major * semi_major - focal * focal).max(0.0).sqrt();

        Self {
            foci: (source, target),
            center,
            semi_major,
            semi_minor,
            rotation: rotation_angle(&source, &target),
        }
    }

    pub fn foci(&self) -> (Point, Point) {
        self.foci
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    /// True if the sum of distances to both foci fits into the major axis.
    pub fn contains(&self, point: &Point) -> bool {
        let sum = haversine_distance(&self.foci.0, point) + haversine_distance(point, &self.foci.1);
        sum <= 2.0 * self.semi_major + 1e-6
    }

    /// Approximate the ellipse by a closed ring of `vertices` distinct points
    /// (the first point is repeated at the end).
    ///
    /// The shape is laid out in meters around the origin, rotated along the
    /// focal axis and projected back onto degrees with respect to the
    /// parallel at the center latitude.
    pub fn polygon(&self, vertices: usize) -> Vec<Point> {
        let vertices = vertices.max(4);
        let lat = self.center.lat.to_radians();
        let (sin, cos) = self.rotation.sin_cos();

        let mut ring = Vec::with_capacity(vertices + 1);
        for k in 0..vertices {
            let theta = 2.0 * std::f64::consts::PI * k as f64 / vertices as f64;
            let x = self.semi_major * theta.cos();
            let y = self.semi_minor * theta.sin();

            let rx = x * cos - y * sin;
            let ry = x * sin + y * cos;

            ring.push(Point::new(
                self.center.lon + (rx / (EARTH_RADIUS_M * lat.cos())).to_degrees(),
                self.center.lat + (ry / EARTH_RADIUS_M).to_degrees(),
            ));
        }
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        ring
    }
}

/// Counter-clockwise angle of the segment `p1 -> p2` in radians, measured in
/// a local frame where longitude is scaled by the midpoint parallel.
fn rotation_angle(p1: &Point, p2: &Point) -> f64 {
    let lat = p1.midpoint(p2).lat.to_radians();
    let x = (p2.lon - p1.lon).to_radians() * lat.cos();
    let y = (p2.lat - p1.lat).to_radians();
    y.atan2(x)
}
