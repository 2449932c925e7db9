use crate::core::geo::{LatLng, Point};
use crate::data::geojson::GeoJsonFeature;

/// Map events handlers can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    Click,
}

impl MapEventKind {
    /// Event name used by the renderer
    pub fn as_str(&self) -> &'static str {
        match self {
            MapEventKind::Click => crate::core::constants::CLICK_EVENT,
        }
    }
}

impl std::fmt::Display for MapEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A click over a layer: where it happened and the layer's features under the cursor.
///
/// `lng_lat` is on whichever world copy the user clicked, so its longitude may
/// lie outside [-180, 180].
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub lng_lat: LatLng,
    /// Screen position in pixels, when the renderer reports it
    pub point: Option<Point>,
    /// Topmost feature first
    pub features: Vec<GeoJsonFeature>,
}

impl ClickEvent {
    pub fn new(lng_lat: LatLng, features: Vec<GeoJsonFeature>) -> Self {
        Self {
            lng_lat,
            point: None,
            features,
        }
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }

    pub fn first_feature(&self) -> Option<&GeoJsonFeature> {
        self.features.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name() {
        assert_eq!(MapEventKind::Click.as_str(), "click");
        assert_eq!(MapEventKind::Click.to_string(), "click");
    }

    #[test]
    fn test_first_feature() {
        let empty = ClickEvent::new(LatLng::new(35.0, 135.7), Vec::new());
        assert!(empty.first_feature().is_none());

        let event = ClickEvent::new(
            LatLng::new(35.0, 135.7),
            vec![
                GeoJsonFeature::point(LatLng::new(35.0, 135.7)).with_property("id", 1),
                GeoJsonFeature::point(LatLng::new(35.0, 135.7)).with_property("id", 2),
            ],
        )
        .with_point(Point::new(10.0, 20.0));
        assert_eq!(event.first_feature().map(|f| f.property_text("id")), Some("1".into()));
        assert_eq!(event.point, Some(Point::new(10.0, 20.0)));
    }
}
