//! The seam between the map description and the engine that draws it.

use crate::{
    core::{config::MapOptions, geo::LatLng},
    data::geojson::GeoJsonFeature,
    style::Style,
    ui::popup::PopupRequest,
    Result,
};

/// A rendering engine the map is mounted on.
///
/// The engine owns tiles, projection and drawing. The map only hands it a
/// style, asks what is under the cursor, and asks it to show popups.
pub trait Renderer {
    /// Creates the engine's map from the options and style
    fn initialize(&mut self, options: &MapOptions, style: &Style) -> Result<()>;

    /// Features of `layer_id` rendered at `at`, topmost first
    fn query_rendered_features(&self, at: LatLng, layer_id: &str) -> Vec<GeoJsonFeature>;

    /// Displays a popup
    fn show_popup(&mut self, popup: &PopupRequest) -> Result<()>;
}
