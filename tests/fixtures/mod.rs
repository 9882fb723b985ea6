//! Test fixtures for walk-planner.
//!
//! Provides:
//! - Real Prague locations (from OpenStreetMap)
//! - In-memory entity index and routing engine fakes

#![allow(dead_code)]

pub mod prague_locations;

use std::cell::Cell;

use walk_planner::error::{Error, Result};
use walk_planner::geometry::{BoundingEllipse, Point, haversine_distance};
use walk_planner::model::{Path, Place};
use walk_planner::polyline::Polyline;
use walk_planner::traits::{EntityIndex, RoutingEngine};

pub use prague_locations::*;

/// Keyword-matching index over a fixed place list.
pub struct FakeEntityIndex {
    places: Vec<(String, Point, Vec<String>)>,
    pub calls: Cell<usize>,
}

impl FakeEntityIndex {
    pub fn new(locations: &[Location]) -> Self {
        let places = locations
            .iter()
            .map(|l| {
                (
                    l.name.to_string(),
                    l.point(),
                    l.keywords.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect();
        Self {
            places,
            calls: Cell::new(0),
        }
    }

    pub fn prague() -> Self {
        Self::new(PLACES)
    }
}

impl EntityIndex for FakeEntityIndex {
    type Category = String;

    fn get_within(&self, region: &BoundingEllipse, categories: &[String]) -> Result<Vec<Place>> {
        self.calls.set(self.calls.get() + 1);

        Ok(self
            .places
            .iter()
            .filter(|(_, location, _)| region.contains(location))
            .filter_map(|(name, location, keywords)| {
                let matched: std::collections::BTreeSet<usize> = categories
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| keywords.contains(*c))
                    .map(|(i, _)| i)
                    .collect();

                (!matched.is_empty()).then(|| Place {
                    id: name.to_lowercase().replace(' ', "-"),
                    name: Some(name.clone()),
                    location: *location,
                    keywords: keywords.clone(),
                    categories: matched,
                })
            })
            .collect())
    }
}

/// Straight-line paths stretched by a detour factor.
pub struct FakeRoutingEngine {
    pub detour: f64,
    pub calls: Cell<usize>,
}

impl FakeRoutingEngine {
    pub fn new(detour: f64) -> Self {
        Self {
            detour,
            calls: Cell::new(0),
        }
    }
}

impl RoutingEngine for FakeRoutingEngine {
    fn shortest_paths(&self, waypoints: &[Point]) -> Result<Vec<Path>> {
        self.calls.set(self.calls.get() + 1);

        let polyline = Polyline::new(waypoints.to_vec());
        let distance = polyline.length() * self.detour;

        Ok(vec![
            Path {
                distance: distance * 1.1,
                duration: distance * 1.1 / 1.4,
                polyline: polyline.clone(),
            },
            Path {
                distance,
                duration: distance / 1.4,
                polyline,
            },
        ])
    }
}

pub struct FailingEntityIndex;

impl EntityIndex for FailingEntityIndex {
    type Category = String;

    fn get_within(&self, _region: &BoundingEllipse, _categories: &[String]) -> Result<Vec<Place>> {
        Err(Error::entity_index("connection refused"))
    }
}

pub struct FailingRoutingEngine;

impl RoutingEngine for FailingRoutingEngine {
    fn shortest_paths(&self, _waypoints: &[Point]) -> Result<Vec<Path>> {
        Err(Error::routing_engine("connection refused"))
    }
}

pub fn crow_fly(a: &Location, b: &Location) -> f64 {
    haversine_distance(&a.point(), &b.point())
}

pub fn categories(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}
