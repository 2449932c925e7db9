//! Prelude module for common kyomap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use kyomap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{AppConfig, AttributeConfig, DataConfig, MapOptions},
    geo::{normalize_lng_near, LatLng, Point},
    map::{Map, Subscription},
};

pub use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, Position};

pub use crate::input::{
    events::{ClickEvent, MapEventKind},
    handler::{
        on_point_layer_click, on_polygon_layer_click, ClickHandler, ParcelPopupHandler,
        PointPopupHandler,
    },
};

pub use crate::rendering::headless::HeadlessRenderer;

#[cfg(feature = "wasm")]
pub use crate::rendering::web::WebMap;

pub use crate::style::{
    kyoto::kyoto_style, Expression, Layer, LayerType, PaintValue, PropertyFunction, Source,
    Style, StyleError,
};

pub use crate::traits::Renderer;

pub use crate::ui::popup::{PopupOptions, PopupRequest};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
