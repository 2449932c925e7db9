//! Map builder for fluent API configuration
//!
//! Collects options, data locations, an optional custom style and click
//! handlers, then validates everything at once in [`MapBuilder::build`].

use crate::{
    core::{
        config::{AppConfig, DataConfig, MapOptions},
        constants::{AED_LAYER, PARCEL_LAYER},
        geo::LatLng,
        map::Map,
    },
    input::{
        events::MapEventKind,
        handler::{ClickHandler, ParcelPopupHandler, PointPopupHandler},
    },
    style::{kyoto::kyoto_style, Style},
    Result,
};
use std::rc::Rc;

/// Builder for creating and configuring Map instances
pub struct MapBuilder {
    options: MapOptions,
    data: DataConfig,
    /// Replaces the Kyoto composition when set
    style: Option<Style>,
    handlers: Vec<(MapEventKind, String, Rc<dyn ClickHandler>)>,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings
    pub fn new() -> Self {
        Self {
            options: MapOptions::default(),
            data: DataConfig::default(),
            style: None,
            handlers: Vec::new(),
        }
    }

    /// The stock map as configured: Kyoto style and both popup handlers
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_options(config.map.clone())
            .with_data(config.data.clone())
            .with_kyoto_handlers(config)
    }

    pub fn with_options(mut self, options: MapOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64) -> Self {
        self.options.center = center;
        self.options.zoom = zoom;
        self
    }

    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.options.container = container.into();
        self
    }

    pub fn with_data(mut self, data: DataConfig) -> Self {
        self.data = data;
        self
    }

    /// Use a custom style instead of the Kyoto composition
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn on_click<H>(mut self, layer_id: impl Into<String>, handler: H) -> Self
    where
        H: ClickHandler + 'static,
    {
        self.handlers
            .push((MapEventKind::Click, layer_id.into(), Rc::new(handler)));
        self
    }

    /// AED name popups on the point layer, parcel address popups on the polygon layer
    pub fn with_kyoto_handlers(self, config: &AppConfig) -> Self {
        self.on_click(AED_LAYER, PointPopupHandler::from_config(config))
            .on_click(PARCEL_LAYER, ParcelPopupHandler::from_config(config))
    }

    /// Validates the configuration and creates the map
    pub fn build(self) -> Result<Map> {
        let style = match self.style {
            Some(style) => style,
            None => kyoto_style(&self.data),
        };

        let mut map = Map::new(self.options, style)?;
        for (event, layer_id, handler) in self.handlers {
            map.on_shared(event, &layer_id, handler)?;
        }
        Ok(map)
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
