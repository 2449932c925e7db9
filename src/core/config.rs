//! Configuration for the Kyoto map
//!
//! Every field has a default reproducing the stock map, so a config file only
//! needs to name what it changes. Files are JSON in the same shape as
//! [`AppConfig`], with camelCase keys throughout, as in MapLibre options.

use crate::core::constants::*;
use crate::core::geo::LatLng;
use crate::ui::popup::PopupOptions;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest zoom the renderer supports
const MAX_ZOOM: f64 = 24.0;

/// Options handed to the renderer when the map is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    /// DOM element id the map is mounted into
    pub container: String,
    #[serde(with = "lng_lat")]
    pub center: LatLng,
    pub zoom: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER.to_string(),
            center: LatLng::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            zoom: DEFAULT_ZOOM,
            min_zoom: None,
            max_zoom: None,
        }
    }
}

impl MapOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "center {:?} is outside lat [-90, 90] / lng [-180, 180]",
                self.center
            )));
        }

        let min = self.min_zoom.unwrap_or(0.0);
        let max = self.max_zoom.unwrap_or(MAX_ZOOM);
        if min < 0.0 || max > MAX_ZOOM || min > max {
            return Err(MapError::Config(format!(
                "zoom range [{min}, {max}] is not within [0, {MAX_ZOOM}]"
            )));
        }
        if !(min..=max).contains(&self.zoom) {
            return Err(MapError::Config(format!(
                "zoom {} is outside [{min}, {max}]",
                self.zoom
            )));
        }
        if self.container.is_empty() {
            return Err(MapError::Config("container id is empty".into()));
        }
        Ok(())
    }
}

/// Where the tiles and datasets come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataConfig {
    pub raster_tiles: String,
    pub vector_tiles: String,
    pub aed: String,
    pub emergency_routes: String,
    pub parcels: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raster_tiles: OSM_RASTER_TILES.to_string(),
            vector_tiles: OSM_VECTOR_TILES.to_string(),
            aed: AED_DATA.to_string(),
            emergency_routes: EMERGENCY_ROUTE_DATA.to_string(),
            parcels: PARCEL_DATA.to_string(),
        }
    }
}

/// Which feature attributes the popups show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributeConfig {
    /// Name attribute of AED points
    pub point_name: String,
    /// Parcel attributes concatenated, in order, into the address
    pub parcel_fields: Vec<String>,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            point_name: AED_NAME_FIELD.to_string(),
            parcel_fields: vec![
                PARCEL_MUNICIPALITY_FIELD.to_string(),
                PARCEL_DISTRICT_FIELD.to_string(),
                PARCEL_NUMBER_FIELD.to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapOptions,
    pub data: DataConfig,
    pub popup: PopupOptions,
    pub attributes: AttributeConfig,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;

        if !self.popup.offset.is_finite() {
            return Err(MapError::Config("popup offset must be finite".into()));
        }
        if self.attributes.point_name.is_empty() {
            return Err(MapError::Config("point name attribute is empty".into()));
        }
        if self.attributes.parcel_fields.is_empty() {
            return Err(MapError::Config("no parcel attributes configured".into()));
        }
        Ok(())
    }
}

/// Serialises a [`LatLng`] as the `[lng, lat]` pair MapLibre expects
pub(crate) mod lng_lat {
    use crate::core::geo::LatLng;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &LatLng, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(value.to_lng_lat())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LatLng, D::Error> {
        <[f64; 2]>::deserialize(deserializer).map(LatLng::from_lng_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_stock_map() {
        let config = AppConfig::default();
        assert_eq!(config.map.center, LatLng::new(34.960068, 135.712609));
        assert_eq!(config.map.zoom, 12.0);
        assert_eq!(config.map.container, "map");
        assert_eq!(config.popup.offset, 10.0);
        assert!(!config.popup.close_button);
        assert_eq!(config.attributes.parcel_fields, vec!["市町村名", "大字名", "地番"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_json_str(
            r#"{"map": {"zoom": 15, "center": [135.7588, 34.9858]}, "data": {"aed": "aed.geojson"}}"#,
        )
        .unwrap();

        assert_eq!(config.map.zoom, 15.0);
        assert_eq!(config.map.center, LatLng::new(34.9858, 135.7588));
        assert_eq!(config.map.container, "map");
        assert_eq!(config.data.aed, "aed.geojson");
        assert_eq!(config.data.parcels, PARCEL_DATA);
    }

    #[test]
    fn test_map_options_wire_format() {
        let options = MapOptions {
            max_zoom: Some(18.0),
            ..MapOptions::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"container": "map", "center": [135.712609, 34.960068], "zoom": 12.0, "maxZoom": 18.0})
        );
    }

    #[test]
    fn test_file_keys_are_camel_case() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        assert!(value["data"].get("emergencyRoutes").is_some());
        assert!(value["data"].get("rasterTiles").is_some());
        assert!(value["attributes"].get("pointName").is_some());
        assert!(value["attributes"].get("parcelFields").is_some());
        assert!(value["popup"].get("closeButton").is_some());

        let config = AppConfig::from_json_str(
            r#"{"data": {"emergencyRoutes": "routes.geojson"}, "attributes": {"pointName": "name"}}"#,
        )
        .unwrap();
        assert_eq!(config.data.emergency_routes, "routes.geojson");
        assert_eq!(config.attributes.point_name, "name");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_json_str(r#"{"map": {"center": [200, 35]}}"#),
            Err(MapError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            AppConfig::from_json_str(r#"{"map": {"zoom": 3, "minZoom": 5}}"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_json_str(r#"{"attributes": {"parcelFields": []}}"#),
            Err(MapError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_json_str("{not json"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            AppConfig::from_file("/nonexistent/kyomap.json"),
            Err(MapError::Io(_))
        ));
    }
}
