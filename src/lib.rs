//! # kyomap
//!
//! Map of Kyoto AED locations, emergency-transport routes and registry-office
//! parcels, composed as a MapLibre style document, with click handlers that
//! turn the feature under the cursor into an attribute popup.
//!
//! The style and the handlers are plain Rust values. Rendering is left to an
//! engine behind the [`Renderer`] trait: MapLibre GL JS in the browser (feature
//! `wasm`) or the in-process [`HeadlessRenderer`].

pub mod core;
pub mod data;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod style;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::{AppConfig, AttributeConfig, DataConfig, MapOptions},
    geo::{normalize_lng_near, LatLng, Point},
    map::Map,
};

pub use data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};

pub use input::{
    events::{ClickEvent, MapEventKind},
    handler::{
        on_point_layer_click, on_polygon_layer_click, ClickHandler, ParcelPopupHandler,
        PointPopupHandler,
    },
};

pub use rendering::headless::HeadlessRenderer;
#[cfg(feature = "wasm")]
pub use rendering::web::WebMap;

pub use style::{kyoto::kyoto_style, Layer, LayerType, Source, Style, StyleError};

pub use traits::Renderer;

pub use ui::popup::{PopupOptions, PopupRequest};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
