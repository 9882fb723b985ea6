//! Data model shared by the solvers and the route search.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::polyline::Polyline;

/// A place as returned by the entity index.
///
/// `categories` holds indices into the request's category list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: Option<String>,
    pub location: Point,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub categories: BTreeSet<usize>,
}

impl Place {
    /// A synthetic place standing for a request endpoint.
    pub fn terminal(location: Point, category: usize) -> Self {
        Self {
            id: String::new(),
            name: None,
            location,
            keywords: Vec::new(),
            categories: BTreeSet::from([category]),
        }
    }
}

/// "`fr` must be visited before `to`", both category indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecedenceEdge {
    pub fr: usize,
    pub to: usize,
}

impl PrecedenceEdge {
    pub fn new(fr: usize, to: usize) -> Self {
        Self { fr, to }
    }
}

/// A place exercised in one category role; the unit the heuristics sequence.
///
/// `idx` points into the request-scoped place list. Ordering is by place
/// index, then category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolverPlace {
    pub idx: usize,
    pub cat: usize,
}

impl SolverPlace {
    pub fn new(idx: usize, cat: usize) -> Self {
        Self { idx, cat }
    }
}

/// A path returned by the routing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub polyline: Polyline,
}

/// A visited place in route order, in the category role it satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub place_id: String,
    pub category: usize,
}

impl Waypoint {
    pub fn new(place_id: impl Into<String>, category: usize) -> Self {
        Self {
            place_id: place_id.into(),
            category,
        }
    }
}

/// A verified route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Path,
    /// Visited places, one entry per place id.
    pub places: Vec<Place>,
    /// Visited waypoints in order, source and target excluded.
    pub waypoints: Vec<Waypoint>,
}

/// Merge places sharing an id, unioning their category sets.
///
/// The first occurrence of an id keeps its position in the output.
pub fn merge_places(places: Vec<Place>) -> Vec<Place> {
    let mut merged: Vec<Place> = Vec::with_capacity(places.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for place in places {
        match seen.get(&place.id) {
            Some(&i) => merged[i].categories.extend(place.categories),
            None => {
                seen.insert(place.id.clone(), merged.len());
                merged.push(place);
            }
        }
    }
    merged
}
