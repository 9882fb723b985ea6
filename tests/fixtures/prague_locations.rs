//! Prague points of interest for realistic fixtures.
//!
//! Coordinates from OpenStreetMap, rounded to four decimals.

/// A named location with keywords it can satisfy.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lon: f64,
    pub lat: f64,
    pub keywords: &'static [&'static str],
}

impl Location {
    pub const fn new(name: &'static str, lon: f64, lat: f64, keywords: &'static [&'static str]) -> Self {
        Self { name, lon, lat, keywords }
    }

    pub fn point(&self) -> walk_planner::geometry::Point {
        walk_planner::geometry::Point::new(self.lon, self.lat)
    }
}

// ============================================================================
// Walk endpoints
// ============================================================================

pub const OLD_TOWN_SQUARE: Location = Location::new("Old Town Square", 14.4213, 50.0875, &[]);
pub const PRAGUE_CASTLE: Location = Location::new("Prague Castle", 14.4016, 50.0911, &[]);
pub const WENCESLAS_SQUARE: Location = Location::new("Wenceslas Square", 14.4280, 50.0814, &[]);
pub const VYSEHRAD: Location = Location::new("Vysehrad", 14.4178, 50.0643, &[]);

// ============================================================================
// Candidate places
// ============================================================================

pub const PLACES: &[Location] = &[
    Location::new("National Museum", 14.4309, 50.0790, &["museum"]),
    Location::new("Municipal House", 14.4280, 50.0877, &["museum", "cafe"]),
    Location::new("Museum of Decorative Arts", 14.4170, 50.0902, &["museum"]),
    Location::new("Kampa Museum", 14.4085, 50.0841, &["museum", "park"]),
    Location::new("Cafe Louvre", 14.4189, 50.0819, &["cafe"]),
    Location::new("Cafe Savoy", 14.4068, 50.0807, &["cafe"]),
    Location::new("Cafe Slavia", 14.4135, 50.0815, &["cafe"]),
    Location::new("Kavarna Obecni dum", 14.4279, 50.0876, &["cafe"]),
    Location::new("Kampa Park", 14.4073, 50.0856, &["park"]),
    Location::new("Franciscan Garden", 14.4243, 50.0829, &["park"]),
    Location::new("Letna Park", 14.4193, 50.0963, &["park"]),
    Location::new("Vojan Gardens", 14.4076, 50.0893, &["park"]),
    Location::new("Charles Bridge", 14.4114, 50.0865, &["landmark"]),
    Location::new("Dancing House", 14.4141, 50.0754, &["landmark"]),
    Location::new("Petrin Lookout Tower", 14.3951, 50.0836, &["landmark", "park"]),
];
