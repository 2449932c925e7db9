use crate::core::geo::{normalize_lng_near, LatLng};
use crate::style::Properties;
use geo::{Contains, EuclideanDistance};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Longitude span of one world copy
const FULL_TURN: f64 = 360.0;

static NO_PROPERTIES: Lazy<Properties> = Lazy::new(Properties::default);

/// A `[lng, lat]` position. Extra ordinates such as altitude are dropped on read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub [f64; 2]);

impl Position {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::from_lng_lat(self.0)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ordinates = Vec::<f64>::deserialize(deserializer)?;
        match ordinates.as_slice() {
            [lng, lat, ..] => Ok(Position([*lng, *lat])),
            _ => Err(serde::de::Error::invalid_length(
                ordinates.len(),
                &"a position with at least two ordinates",
            )),
        }
    }
}

impl From<[f64; 2]> for Position {
    fn from(value: [f64; 2]) -> Self {
        Position(value)
    }
}

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Option<Properties>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
    Geometry(GeoJsonGeometry),
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<GeoJsonFeature>,
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn parse(text: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Interprets an already parsed JSON value as GeoJSON
    pub fn from_value(value: Value) -> crate::Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let parsed = match kind.as_str() {
            "Feature" => serde_json::from_value(value).map(GeoJson::Feature),
            "FeatureCollection" => serde_json::from_value::<FeatureCollection>(value)
                .map(|c| GeoJson::FeatureCollection { features: c.features }),
            _ => serde_json::from_value(value).map(GeoJson::Geometry),
        };
        parsed.map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// The features of the document; a bare geometry becomes one feature
    /// without properties
    pub fn into_features(self) -> Vec<GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features,
            GeoJson::Geometry(geometry) => vec![GeoJsonFeature::new(geometry)],
        }
    }
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }

    pub fn point(lat_lng: LatLng) -> Self {
        Self::new(GeoJsonGeometry::Point {
            coordinates: Position(lat_lng.to_lng_lat()),
        })
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Properties::default)
            .insert(key.into(), value.into());
        self
    }

    /// Attributes of the feature; empty when the feature has none
    pub fn properties(&self) -> &Properties {
        self.properties.as_ref().unwrap_or(&*NO_PROPERTIES)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties().get(key)
    }

    /// Attribute as display text: strings verbatim, numbers and booleans in
    /// their JSON form, missing or null as an empty string
    pub fn property_text(&self, key: &str) -> String {
        match self.property(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Coordinate of a `Point` geometry
    pub fn point_coordinates(&self) -> Option<LatLng> {
        match &self.geometry {
            Some(GeoJsonGeometry::Point { coordinates }) => Some(coordinates.lat_lng()),
            _ => None,
        }
    }
}

fn line(positions: &[Position]) -> geo_types::LineString<f64> {
    positions
        .iter()
        .map(|p| geo_types::coord! { x: p.0[0], y: p.0[1] })
        .collect()
}

fn polygon(rings: &[Vec<Position>]) -> Option<geo_types::Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(geo_types::Polygon::new(
        line(exterior),
        interiors.iter().map(|ring| line(ring)).collect(),
    ))
}

impl GeoJsonGeometry {
    /// Converts to a `geo-types` geometry for spatial predicates
    pub fn to_geo(&self) -> Option<geo_types::Geometry<f64>> {
        let geometry = match self {
            GeoJsonGeometry::Point { coordinates } => {
                geo_types::Point::new(coordinates.0[0], coordinates.0[1]).into()
            }
            GeoJsonGeometry::LineString { coordinates } => line(coordinates).into(),
            GeoJsonGeometry::Polygon { coordinates } => polygon(coordinates)?.into(),
            GeoJsonGeometry::MultiPoint { coordinates } => geo_types::MultiPoint::new(
                coordinates
                    .iter()
                    .map(|p| geo_types::Point::new(p.0[0], p.0[1]))
                    .collect(),
            )
            .into(),
            GeoJsonGeometry::MultiLineString { coordinates } => {
                geo_types::MultiLineString::new(coordinates.iter().map(|l| line(l)).collect())
                    .into()
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => geo_types::MultiPolygon::new(
                coordinates.iter().filter_map(|p| polygon(p)).collect(),
            )
            .into(),
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection::new_from(
                    geometries.iter().filter_map(|g| g.to_geo()).collect(),
                ))
            }
        };
        Some(geometry)
    }

    /// Whether a click at `at` lands on this geometry.
    ///
    /// Areas must contain the click. Points and lines count when they are
    /// within `tolerance` degrees. The click may be on any world copy, and
    /// geometries reaching across the antimeridian are hit from either side.
    pub fn hit_test(&self, at: LatLng, tolerance: f64) -> bool {
        match self {
            GeoJsonGeometry::Point { coordinates } => point_hit(coordinates, at, tolerance),
            GeoJsonGeometry::MultiPoint { coordinates } => {
                coordinates.iter().any(|p| point_hit(p, at, tolerance))
            }
            _ => self.to_geo().is_some_and(|geometry| {
                cursor_copies(at).any(|cursor| geo_hit(&geometry, cursor, tolerance))
            }),
        }
    }
}

fn point_hit(position: &Position, at: LatLng, tolerance: f64) -> bool {
    let lng = normalize_lng_near(at.lng, position.0[0]);
    let dx = lng - at.lng;
    let dy = position.0[1] - at.lat;
    (dx * dx + dy * dy).sqrt() <= tolerance
}

/// The cursor wrapped into [-180, 180] and its neighbours one world away
fn cursor_copies(at: LatLng) -> impl Iterator<Item = geo_types::Point<f64>> {
    let wrapped = at.wrapped();
    [-FULL_TURN, 0.0, FULL_TURN]
        .into_iter()
        .map(move |shift| geo_types::Point::new(wrapped.lng + shift, wrapped.lat))
}

fn geo_hit(geometry: &geo_types::Geometry<f64>, at: geo_types::Point<f64>, tolerance: f64) -> bool {
    use geo_types::Geometry;

    match geometry {
        Geometry::Point(point) => point.euclidean_distance(&at) <= tolerance,
        Geometry::MultiPoint(points) => {
            points.0.iter().any(|p| p.euclidean_distance(&at) <= tolerance)
        }
        Geometry::LineString(line) => at.euclidean_distance(line) <= tolerance,
        Geometry::MultiLineString(lines) => {
            lines.0.iter().any(|line| at.euclidean_distance(line) <= tolerance)
        }
        Geometry::Polygon(polygon) => polygon.contains(&at),
        Geometry::MultiPolygon(polygons) => polygons.0.iter().any(|p| p.contains(&at)),
        Geometry::GeometryCollection(collection) => {
            collection.0.iter().any(|g| geo_hit(g, at, tolerance))
        }
        _ => false,
    }
}
