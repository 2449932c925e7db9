use serde::{Deserialize, Serialize};

/// Half of a full turn of longitude
const HALF_WORLD: f64 = 180.0;
const FULL_WORLD: f64 = 360.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from the `[lng, lat]` pair used by GeoJSON and MapLibre
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns the `[lng, lat]` pair used by GeoJSON and MapLibre
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % FULL_WORLD;
        if wrapped > HALF_WORLD {
            wrapped - FULL_WORLD
        } else if wrapped < -HALF_WORLD {
            wrapped + FULL_WORLD
        } else {
            wrapped
        }
    }

    /// Returns a copy with the longitude wrapped to [-180, 180]
    pub fn wrapped(&self) -> Self {
        Self::new(self.lat, Self::wrap_lng(self.lng))
    }

    /// Returns a copy of `self` whose longitude is moved by whole turns until it
    /// lies within 180 degrees of `reference_lng`.
    ///
    /// The map repeats horizontally, so a feature at -179° is rendered right
    /// next to a cursor at 179° on the copy at 181°. Anchoring a popup there
    /// keeps it on the copy the user actually clicked.
    pub fn nearest_copy_to(&self, reference_lng: f64) -> Self {
        Self::new(self.lat, normalize_lng_near(reference_lng, self.lng))
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<LatLng> for geo_types::Coord<f64> {
    fn from(value: LatLng) -> Self {
        geo_types::coord! { x: value.lng, y: value.lat }
    }
}

impl From<LatLng> for geo_types::Point<f64> {
    fn from(value: LatLng) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<geo_types::Coord<f64>> for LatLng {
    fn from(value: geo_types::Coord<f64>) -> Self {
        LatLng::new(value.y, value.x)
    }
}

/// Shifts `lng` by ±360° until it is within 180° of `cursor_lng`.
///
/// Moves east by whole turns while the cursor is more than 180° east of the
/// feature, and west while it is more than 180° west. The result is congruent
/// to `lng` modulo 360 and applying it again with the same cursor changes
/// nothing. The number of turns is computed directly, so the cost does not
/// depend on how many worlds apart the two longitudes are.
pub fn normalize_lng_near(cursor_lng: f64, lng: f64) -> f64 {
    if !cursor_lng.is_finite() || !lng.is_finite() {
        return lng;
    }

    let offset = cursor_lng - lng;
    if offset.abs() <= HALF_WORLD {
        return lng;
    }
    // fewest turns that bring the offset back within 180°
    let turns = ((offset.abs() - HALF_WORLD) / FULL_WORLD).ceil();
    lng + offset.signum() * turns * FULL_WORLD
}

/// Represents a point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
