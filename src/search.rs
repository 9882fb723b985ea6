//! Route search: the time-boxed solve, verify and shrink loop.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::distance::HaversineMatrix;
use crate::error::{Error, Result};
use crate::geometry::{BoundingEllipse, Point};
use crate::model::{Path, Place, PrecedenceEdge, Route, SolverPlace, Waypoint, merge_places};
use crate::precedence::PrecedenceMatrix;
use crate::solver::{Solver, SolverOptions};
use crate::traits::{EntityIndex, RoutingEngine};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest<C> {
    pub source: Point,
    pub target: Point,
    /// Meters.
    pub max_distance: f64,
    pub categories: Vec<C>,
    /// Edges between indices into `categories`.
    #[serde(default)]
    pub arrows: Vec<PrecedenceEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Wall-clock budget of the search loop, checked between iterations.
    pub time_budget_ms: u64,
    /// Stop once this many routes were collected.
    pub max_routes: usize,
    pub solver: SolverOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_budget_ms: 1_000,
            max_routes: 32,
            solver: SolverOptions::default(),
        }
    }
}

impl SearchOptions {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

/// Find routes from source to target visiting one place of every requested
/// category, sorted by path distance.
///
/// Each iteration sequences the remaining candidates, verifies the sequence
/// with the routing engine and removes the used candidates, so later
/// iterations explore different places. The loop ends when a category runs
/// out of candidates, the budget elapses or `max_routes` is reached; one
/// iteration may overrun the budget. Collaborator errors abort the search.
pub fn search_routes<E, R>(
    entity_index: &E,
    routing_engine: &R,
    request: &SearchRequest<E::Category>,
    options: &SearchOptions,
) -> Result<Vec<Route>>
where
    E: EntityIndex,
    R: RoutingEngine,
{
    validate(request)?;

    let category_count = request.categories.len();
    if category_count == 0 {
        debug!("no categories requested");
        return Ok(Vec::new());
    }

    let precedence = PrecedenceMatrix::new(category_count, &request.arrows)?;

    let region = BoundingEllipse::new(request.source, request.target, request.max_distance);
    let mut places = entity_index
        .get_within(&region, &request.categories)
        .inspect_err(|err| warn!(error = %err, "entity index query failed"))?;

    places.push(Place::terminal(request.source, category_count));
    places.push(Place::terminal(request.target, category_count + 1));

    let (source, target, mut remaining) = expand(&places, category_count);
    debug!(places = places.len(), candidates = remaining.len(), "working set built");

    let distance = HaversineMatrix::new(places.iter().map(|place| place.location).collect());
    let solver = Solver::new(distance, precedence, source, target, &options.solver);

    let budget = options.time_budget();
    let started = Instant::now();
    let mut routes = Vec::new();
    let mut iterations = 0usize;

    loop {
        iterations += 1;

        let seq = solver.solve(&remaining);
        let trimmed = &seq[1..seq.len() - 1];

        if trimmed.len() < category_count {
            debug!(iterations, found = trimmed.len(), "a category ran out of candidates");
            break;
        }

        let waypoints: Vec<Point> = seq.iter().map(|sp| places[sp.idx].location).collect();
        let path = routing_engine
            .shortest_paths(&waypoints)
            .inspect_err(|err| warn!(error = %err, "routing engine request failed"))?
            .into_iter()
            .filter(|path| path.distance <= request.max_distance)
            .min_by(|l, r| l.distance.total_cmp(&r.distance));

        match path {
            Some(path) => routes.push(build_route(path, trimmed, &places)),
            None => debug!(iterations, "no path within the distance limit"),
        }

        for sp in trimmed {
            remaining.remove(sp);
        }

        if routes.len() >= options.max_routes || started.elapsed() >= budget {
            break;
        }
    }

    routes.sort_by(|l, r| l.path.distance.total_cmp(&r.path.distance));

    info!(
        routes = routes.len(),
        iterations,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "route search finished"
    );
    Ok(routes)
}

/// Paths through `waypoints` in the given order, shortest first.
pub fn search_directions<R: RoutingEngine>(routing_engine: &R, waypoints: &[Point]) -> Result<Vec<Path>> {
    if waypoints.len() < 2 {
        return Ok(Vec::new());
    }

    let mut paths = routing_engine.shortest_paths(waypoints)?;
    paths.sort_by(|l, r| l.distance.total_cmp(&r.distance));
    Ok(paths)
}

fn validate<C>(request: &SearchRequest<C>) -> Result<()> {
    if !request.source.is_finite() {
        return Err(Error::invalid_request("source coordinates must be finite"));
    }
    if !request.target.is_finite() {
        return Err(Error::invalid_request("target coordinates must be finite"));
    }
    if !(request.max_distance.is_finite() && request.max_distance >= 0.0) {
        return Err(Error::invalid_request("max distance must be a non-negative number"));
    }
    Ok(())
}

/// Expand places into solver places, one per (place, requested category).
///
/// The last two places are the source and target; category ids outside
/// `0..category_count` are ignored.
fn expand(places: &[Place], category_count: usize) -> (SolverPlace, SolverPlace, BTreeSet<SolverPlace>) {
    let terminals = places.len() - 2;
    let source = SolverPlace::new(terminals, category_count);
    let target = SolverPlace::new(terminals + 1, category_count + 1);

    let candidates = places[..terminals]
        .iter()
        .enumerate()
        .flat_map(|(idx, place)| {
            place
                .categories
                .iter()
                .filter(move |&&cat| cat < category_count)
                .map(move |&cat| SolverPlace::new(idx, cat))
        })
        .collect();

    (source, target, candidates)
}

/// Materialize a verified sequence (terminals excluded) into a route.
fn build_route(path: Path, trimmed: &[SolverPlace], places: &[Place]) -> Route {
    let visited = trimmed
        .iter()
        .map(|sp| {
            let place = &places[sp.idx];
            Place {
                categories: BTreeSet::from([sp.cat]),
                ..place.clone()
            }
        })
        .collect();

    let waypoints = trimmed
        .iter()
        .map(|sp| Waypoint::new(places[sp.idx].id.clone(), sp.cat))
        .collect();

    Route {
        path,
        places: merge_places(visited),
        waypoints,
    }
}
