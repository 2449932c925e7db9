//! Defaults for the Kyoto map composition.
//! Keeping them in a single place makes it easier to retarget the map.

/// Style document version understood by MapLibre.
pub const STYLE_VERSION: u8 = 8;

/// DOM element id the map is mounted into.
pub const DEFAULT_CONTAINER: &str = "map";

/// 京都市南区
pub const DEFAULT_CENTER_LAT: f64 = 34.960068;
pub const DEFAULT_CENTER_LNG: f64 = 135.712609;

pub const DEFAULT_ZOOM: f64 = 12.0;

/// Square raster tile size in pixels.
pub const RASTER_TILE_SIZE: u32 = 256;

/// Popup distance from its anchor, in pixels.
pub const POPUP_OFFSET: f64 = 10.0;

/// Event name the engine uses for clicks.
pub const CLICK_EVENT: &str = "click";

pub const OSM_RASTER_TILES: &str =
    "https://tile.openstreetmap.jp/styles/osm-bright-ja/{z}/{x}/{y}.png";
pub const OSM_VECTOR_TILES: &str = "https://tile.openstreetmap.jp/data/planet.json";

pub const AED_DATA: &str = "./data/AED.geojson";
pub const EMERGENCY_ROUTE_DATA: &str = "./data/Kyoto_kinkyu.geojson";
pub const PARCEL_DATA: &str = "./data/26106__6_r_2023.geojson";

/// Facility name attribute of the AED dataset.
pub const AED_NAME_FIELD: &str = "施設名";

/// Parcel address attributes, concatenated in this order.
pub const PARCEL_MUNICIPALITY_FIELD: &str = "市町村名";
pub const PARCEL_DISTRICT_FIELD: &str = "大字名";
pub const PARCEL_NUMBER_FIELD: &str = "地番";

// Source ids
pub const OSM_TILE_SOURCE: &str = "osm-tile";
pub const OSM_VECTOR_SOURCE: &str = "osm-vector-tile";
pub const AED_SOURCE: &str = "spot-point";
pub const EMERGENCY_ROUTE_SOURCE: &str = "river-line";
pub const PARCEL_SOURCE: &str = "moj-polygon";

// Layer ids, in draw order
pub const OSM_LAYER: &str = "osm-layer";
pub const PARCEL_LAYER: &str = "polygon-layer";
pub const AED_LAYER: &str = "point-layer";
pub const EMERGENCY_ROUTE_LAYER: &str = "line-layer";
pub const BUILDING_LAYER: &str = "building-3d-layer";
