//! Click handlers that turn the clicked feature into a popup request.
//!
//! Handlers are pure: they read the event and return what to show. Showing it
//! is up to the [`Renderer`](crate::traits::Renderer) the map dispatches to.

use crate::core::config::AppConfig;
use crate::input::events::ClickEvent;
use crate::ui::popup::{PopupOptions, PopupRequest};

/// Something that reacts to a click on a layer
pub trait ClickHandler {
    /// Returns the popup to show, or `None` to show nothing
    fn handle(&self, event: &ClickEvent) -> Option<PopupRequest>;
}

impl<F> ClickHandler for F
where
    F: Fn(&ClickEvent) -> Option<PopupRequest>,
{
    fn handle(&self, event: &ClickEvent) -> Option<PopupRequest> {
        self(event)
    }
}

/// Shows the name of a clicked point, anchored on the copy of the point
/// nearest to the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct PointPopupHandler {
    pub name_field: String,
    pub options: PopupOptions,
}

impl PointPopupHandler {
    pub fn new(name_field: impl Into<String>) -> Self {
        Self {
            name_field: name_field.into(),
            options: PopupOptions::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            name_field: config.attributes.point_name.clone(),
            options: config.popup.clone(),
        }
    }

    pub fn with_options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for PointPopupHandler {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ClickHandler for PointPopupHandler {
    fn handle(&self, event: &ClickEvent) -> Option<PopupRequest> {
        let Some(feature) = event.first_feature() else {
            log::debug!("point click at {:?} without features", event.lng_lat);
            return None;
        };
        let Some(position) = feature.point_coordinates() else {
            log::debug!("point click on a feature without point geometry");
            return None;
        };

        let anchor = position.nearest_copy_to(event.lng_lat.lng);
        let html = feature.property_text(&self.name_field);
        Some(PopupRequest::new(anchor, html).with_options(self.options.clone()))
    }
}

/// Shows the address of a clicked parcel: the configured attributes joined
/// without separators, anchored at the cursor
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelPopupHandler {
    pub fields: Vec<String>,
    pub options: PopupOptions,
}

impl ParcelPopupHandler {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            options: PopupOptions::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fields: config.attributes.parcel_fields.clone(),
            options: config.popup.clone(),
        }
    }

    pub fn with_options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for ParcelPopupHandler {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ClickHandler for ParcelPopupHandler {
    fn handle(&self, event: &ClickEvent) -> Option<PopupRequest> {
        let Some(feature) = event.first_feature() else {
            log::debug!("parcel click at {:?} without features", event.lng_lat);
            return None;
        };

        let address: String = self
            .fields
            .iter()
            .map(|field| feature.property_text(field))
            .collect();
        Some(PopupRequest::new(event.lng_lat, address).with_options(self.options.clone()))
    }
}

/// Popup for a click on the AED point layer
pub fn on_point_layer_click(event: &ClickEvent) -> Option<PopupRequest> {
    PointPopupHandler::default().handle(event)
}

/// Popup for a click on the parcel polygon layer
pub fn on_polygon_layer_click(event: &ClickEvent) -> Option<PopupRequest> {
    ParcelPopupHandler::default().handle(event)
}
