//! An in-process renderer without a display.
//!
//! It loads GeoJSON sources from disk, answers feature queries with `geo`
//! predicates in the style's draw order, and records popups instead of
//! drawing them. Tiled sources (raster and vector tiles) are not fetched, so
//! their layers never report features.

use crate::{
    core::{config::MapOptions, geo::LatLng},
    data::geojson::{GeoJson, GeoJsonFeature},
    prelude::{HashMap, HashSet},
    style::{GeoJsonData, Source, Style},
    traits::Renderer,
    ui::popup::{PopupManager, PopupRequest},
    MapError, Result,
};
use std::path::{Path, PathBuf};

/// Default hit distance for points and lines, in degrees (about 10 m)
const DEFAULT_TOLERANCE: f64 = 1e-4;

pub struct HeadlessRenderer {
    base_dir: PathBuf,
    tolerance: f64,
    options: Option<MapOptions>,
    style: Option<Style>,
    features: HashMap<String, Vec<GeoJsonFeature>>,
    /// Sources given through `with_source_features`; never reloaded
    supplied: HashSet<String>,
    popups: PopupManager,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            tolerance: DEFAULT_TOLERANCE,
            options: None,
            style: None,
            features: HashMap::default(),
            supplied: HashSet::default(),
            popups: PopupManager::new(),
        }
    }

    /// Directory relative data paths are resolved against
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Hit distance for points and lines, in degrees
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Supplies a source's features directly instead of loading its data
    pub fn with_source_features(
        mut self,
        source_id: impl Into<String>,
        features: Vec<GeoJsonFeature>,
    ) -> Self {
        let source_id = source_id.into();
        self.supplied.insert(source_id.clone());
        self.features.insert(source_id, features);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.style.is_some()
    }

    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    /// Features held for a source
    pub fn source_features(&self, source_id: &str) -> &[GeoJsonFeature] {
        self.features.get(source_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn popups(&self) -> &[PopupRequest] {
        self.popups.popups()
    }

    pub fn clear_popups(&mut self) {
        self.popups.clear();
    }

    /// Ids of the layers drawing something at `at`, topmost first
    pub fn rendered_layers_at(&self, at: LatLng) -> Vec<&str> {
        let Some(style) = &self.style else {
            return Vec::new();
        };
        style
            .layers
            .iter()
            .rev()
            .filter(|layer| !self.query_rendered_features(at, &layer.id).is_empty())
            .map(|layer| layer.id.as_str())
            .collect()
    }

    fn load_source(&self, id: &str, source: &Source) -> Result<Option<Vec<GeoJsonFeature>>> {
        let Source::GeoJson { data, .. } = source else {
            return Ok(None);
        };

        let geojson = match data {
            GeoJsonData::Inline(value) => GeoJson::from_value(value.clone())?,
            GeoJsonData::Url(url) if url.starts_with("http://") || url.starts_with("https://") => {
                log::warn!("source {id}: remote data {url} is not fetched headlessly");
                return Ok(None);
            }
            GeoJsonData::Url(path) => {
                let path = self.resolve(path);
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    MapError::Render(format!("source {id}: cannot read {}: {e}", path.display()))
                })?;
                GeoJson::parse(&text)?
            }
        };
        Ok(Some(geojson.into_features()))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HeadlessRenderer {
    fn initialize(&mut self, options: &MapOptions, style: &Style) -> Result<()> {
        style.validate()?;

        // data loaded for a previous style may point at other files
        let supplied = &self.supplied;
        self.features.retain(|id, _| supplied.contains(id));

        for (id, source) in &style.sources {
            if self.supplied.contains(id) {
                continue;
            }
            // a broken source leaves its layers empty; the rest of the map still works
            match self.load_source(id, source) {
                Ok(Some(features)) => {
                    log::info!("source {id}: {} features", features.len());
                    self.features.insert(id.clone(), features);
                }
                Ok(None) => {}
                Err(e) => log::warn!("source {id} failed to load: {e}"),
            }
        }

        self.options = Some(options.clone());
        self.style = Some(style.clone());
        Ok(())
    }

    fn query_rendered_features(&self, at: LatLng, layer_id: &str) -> Vec<GeoJsonFeature> {
        let Some(layer) = self.style.as_ref().and_then(|s| s.layer(layer_id)) else {
            return Vec::new();
        };
        let Some(features) = layer.source.as_deref().and_then(|id| self.features.get(id)) else {
            return Vec::new();
        };

        // later features in a source draw over earlier ones
        features
            .iter()
            .rev()
            .filter(|f| layer.accepts(f.properties()))
            .filter(|f| {
                f.geometry
                    .as_ref()
                    .is_some_and(|g| g.hit_test(at, self.tolerance))
            })
            .cloned()
            .collect()
    }

    fn show_popup(&mut self, popup: &PopupRequest) -> Result<()> {
        if self.style.is_none() {
            return Err(MapError::Render("renderer is not initialized".into()));
        }
        self.popups.show(popup.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Expression, Layer, LayerType};
    use serde_json::json;

    fn style() -> Style {
        Style::new()
            .with_source("points", Source::geojson("points.geojson"))
            .with_layer(
                Layer::new("visible", LayerType::Circle, "points")
                    .filter(Expression::not_has("hidden")),
            )
    }

    fn features() -> Vec<GeoJsonFeature> {
        vec![
            GeoJsonFeature::point(LatLng::new(35.0, 135.0)).with_property("n", "first"),
            GeoJsonFeature::point(LatLng::new(35.0, 135.0)).with_property("n", "second"),
            GeoJsonFeature::point(LatLng::new(35.0, 135.0))
                .with_property("n", "third")
                .with_property("hidden", true),
        ]
    }

    #[test]
    fn test_query_respects_filter_and_order() {
        let mut renderer = HeadlessRenderer::new().with_source_features("points", features());
        renderer.initialize(&MapOptions::default(), &style()).unwrap();

        let hits = renderer.query_rendered_features(LatLng::new(35.0, 135.0), "visible");
        let names: Vec<String> = hits.iter().map(|f| f.property_text("n")).collect();
        assert_eq!(names, vec!["second", "first"]);

        assert!(renderer
            .query_rendered_features(LatLng::new(36.0, 135.0), "visible")
            .is_empty());
        assert!(renderer
            .query_rendered_features(LatLng::new(35.0, 135.0), "unknown")
            .is_empty());
    }

    #[test]
    fn test_inline_source() {
        let style = Style::new()
            .with_source(
                "inline",
                Source::GeoJson {
                    data: GeoJsonData::Inline(json!({
                        "type": "FeatureCollection",
                        "features": [{
                            "type": "Feature",
                            "properties": {"name": "x"},
                            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
                        }]
                    })),
                    attribution: None,
                },
            )
            .with_layer(Layer::new("dots", LayerType::Circle, "inline"));

        let mut renderer = HeadlessRenderer::new();
        renderer.initialize(&MapOptions::default(), &style).unwrap();
        assert_eq!(renderer.source_features("inline").len(), 1);
    }

    fn inline_points(count: usize) -> Style {
        let features: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "type": "Feature",
                    "properties": {"n": i},
                    "geometry": {"type": "Point", "coordinates": [i as f64, 0.0]}
                })
            })
            .collect();
        Style::new()
            .with_source(
                "inline",
                Source::GeoJson {
                    data: GeoJsonData::Inline(json!({"type": "FeatureCollection", "features": features})),
                    attribution: None,
                },
            )
            .with_layer(Layer::new("dots", LayerType::Circle, "inline"))
    }

    #[test]
    fn test_reinitialize_reloads_changed_data() {
        let mut renderer = HeadlessRenderer::new();
        renderer.initialize(&MapOptions::default(), &inline_points(1)).unwrap();
        assert_eq!(renderer.source_features("inline").len(), 1);

        renderer.initialize(&MapOptions::default(), &inline_points(3)).unwrap();
        assert_eq!(renderer.source_features("inline").len(), 3);

        renderer.initialize(&MapOptions::default(), &Style::new()).unwrap();
        assert!(renderer.source_features("inline").is_empty());
    }

    #[test]
    fn test_supplied_features_survive_reinitialize() {
        let mut renderer = HeadlessRenderer::new().with_source_features("points", features());
        renderer.initialize(&MapOptions::default(), &style()).unwrap();
        renderer.initialize(&MapOptions::default(), &style()).unwrap();
        assert_eq!(renderer.source_features("points").len(), 3);
    }

    #[test]
    fn test_missing_file_leaves_source_empty() {
        let mut renderer = HeadlessRenderer::new().with_base_dir("/nonexistent");
        renderer.initialize(&MapOptions::default(), &style()).unwrap();
        assert!(renderer.source_features("points").is_empty());
        assert!(renderer.is_initialized());
    }

    #[test]
    fn test_popup_requires_initialization() {
        let mut renderer = HeadlessRenderer::new();
        let popup = PopupRequest::new(LatLng::default(), "x");
        assert!(renderer.show_popup(&popup).is_err());

        renderer.initialize(&MapOptions::default(), &style()).unwrap();
        renderer.show_popup(&popup).unwrap();
        assert_eq!(renderer.popups(), &[popup]);
    }
}
