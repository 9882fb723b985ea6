//! OSRM HTTP adapter for walking paths.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::model::Path;
use crate::polyline::Polyline;
use crate::traits::RoutingEngine;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, waypoints: &[Point]) -> String {
        let coords = waypoints
            .iter()
            .map(|p| format!("{:.6},{:.6}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?alternatives=true&geometries=geojson&overview=full",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl RoutingEngine for OsrmClient {
    fn shortest_paths(&self, waypoints: &[Point]) -> Result<Vec<Path>> {
        if waypoints.len() < 2 {
            return Ok(Vec::new());
        }

        // OSRM reports routing failures as JSON bodies with a 4xx status
        let body = self
            .client
            .get(self.route_url(waypoints))
            .send()?
            .json::<OsrmRouteResponse>()?;

        let paths = paths_from_response(body)?;
        debug!(waypoints = waypoints.len(), paths = paths.len(), "OSRM route fetched");
        Ok(paths)
    }
}

fn paths_from_response(body: OsrmRouteResponse) -> Result<Vec<Path>> {
    match body.code.as_str() {
        "Ok" => Ok(body
            .routes
            .into_iter()
            .map(|route| Path {
                distance: route.distance,
                duration: route.duration,
                polyline: Polyline::from_lon_lat(&route.geometry.coordinates),
            })
            .collect()),
        "NoRoute" => Ok(Vec::new()),
        code => Err(Error::routing_engine(format!(
            "OSRM returned {}: {}",
            code,
            body.message.unwrap_or_default()
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}
