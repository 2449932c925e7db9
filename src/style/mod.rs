//! Declarative map composition: data sources plus ordered layers.
//!
//! A [`Style`] serialises to the JSON document MapLibre accepts as its `style`
//! option. [`Style::validate`] rejects documents the renderer would refuse, so
//! problems surface when the map is built rather than in a browser console.

pub mod expression;
pub mod kyoto;
pub mod layer;
pub mod source;

pub use expression::{Expression, Properties};
pub use layer::{FunctionKind, Layer, LayerType, PaintValue, PropertyFunction};
pub use source::{GeoJsonData, Source};

use crate::core::constants::STYLE_VERSION;
use crate::prelude::HashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("unsupported style version {}, expected {}", .0, STYLE_VERSION)]
    UnsupportedVersion(u8),

    #[error("layer with empty id")]
    EmptyLayerId,

    #[error("duplicate layer id \"{0}\"")]
    DuplicateLayer(String),

    #[error("layer \"{0}\" needs a source")]
    SourceRequired(String),

    #[error("layer \"{layer}\" refers to unknown source \"{source_id}\"")]
    MissingSource { layer: String, source_id: String },

    #[error("{layer_type} layer \"{layer}\" cannot draw from a {source_kind} source")]
    IncompatibleSource {
        layer: String,
        layer_type: LayerType,
        source_kind: &'static str,
    },

    #[error("layer \"{0}\" draws from a vector source and needs a source-layer")]
    MissingSourceLayer(String),

    #[error("layer \"{0}\" sets source-layer on a non-vector source")]
    UnexpectedSourceLayer(String),

    #[error("layer \"{layer}\" has unknown paint property \"{property}\"")]
    PaintProperty { layer: String, property: String },

    #[error("layer \"{layer}\" sets {property} to {value}, outside [0, 1]")]
    OutOfRange {
        layer: String,
        property: String,
        value: f64,
    },

    #[error("source \"{0}\" has neither tiles nor a TileJSON url")]
    MissingTiles(String),

    #[error("source \"{source_id}\" tile template \"{template}\" lacks {{z}}/{{x}}/{{y}}")]
    TileTemplate { source_id: String, template: String },

    #[error("invalid expression: {0}")]
    Expression(String),
}

/// A version 8 style document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sources: BTreeMap<String, Source>,
    pub layers: Vec<Layer>,
    /// `glyphs`, `sprite`, `center`, `light` and other top-level keys, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            version: STYLE_VERSION,
            name: None,
            sources: BTreeMap::new(),
            layers: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, id: impl Into<String>, source: Source) -> Self {
        self.sources.insert(id.into(), source);
        self
    }

    /// Appends a layer on top of the ones already declared
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Parses and validates a style document
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let style: Style = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Position of a layer in draw order (0 is drawn first, at the bottom)
    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Layer ids from bottom to top
    pub fn draw_order(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    /// Of the given layers, the one drawn on top. Unknown ids are ignored.
    pub fn topmost<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        ids.into_iter()
            .filter_map(|id| self.layer_index(id).map(|index| (index, id)))
            .max_by_key(|(index, _)| *index)
            .map(|(_, id)| id)
    }

    /// Attribution strings of all sources, in source-id order
    pub fn attributions(&self) -> Vec<&str> {
        self.sources.values().filter_map(Source::attribution).collect()
    }

    /// Checks the document against the rules the renderer applies when loading it
    pub fn validate(&self) -> Result<(), StyleError> {
        if self.version != STYLE_VERSION {
            return Err(StyleError::UnsupportedVersion(self.version));
        }

        for (id, source) in &self.sources {
            if source.lacks_tiles() {
                return Err(StyleError::MissingTiles(id.clone()));
            }
            for template in source.tile_templates() {
                if !["{z}", "{x}", "{y}"].iter().all(|p| template.contains(p)) {
                    return Err(StyleError::TileTemplate {
                        source_id: id.clone(),
                        template: template.clone(),
                    });
                }
            }
        }

        let mut seen = HashSet::default();
        for layer in &self.layers {
            if layer.id.is_empty() {
                return Err(StyleError::EmptyLayerId);
            }
            if !seen.insert(layer.id.as_str()) {
                return Err(StyleError::DuplicateLayer(layer.id.clone()));
            }
            self.validate_layer(layer)?;
        }

        log::debug!(
            "style validated: {} sources, {} layers",
            self.sources.len(),
            self.layers.len()
        );
        Ok(())
    }

    fn validate_layer(&self, layer: &Layer) -> Result<(), StyleError> {
        if layer.layer_type != LayerType::Background {
            let source_id = layer
                .source
                .as_deref()
                .ok_or_else(|| StyleError::SourceRequired(layer.id.clone()))?;
            let source = self
                .sources
                .get(source_id)
                .ok_or_else(|| StyleError::MissingSource {
                    layer: layer.id.clone(),
                    source_id: source_id.to_string(),
                })?;

            if !layer.layer_type.accepts_source(source.kind()) {
                return Err(StyleError::IncompatibleSource {
                    layer: layer.id.clone(),
                    layer_type: layer.layer_type,
                    source_kind: source.kind(),
                });
            }

            let is_vector = matches!(source, Source::Vector { .. });
            match (is_vector, layer.source_layer.is_some()) {
                (true, false) => return Err(StyleError::MissingSourceLayer(layer.id.clone())),
                (false, true) => return Err(StyleError::UnexpectedSourceLayer(layer.id.clone())),
                _ => {}
            }
        }

        for (property, value) in &layer.paint {
            if !layer.layer_type.accepts_paint(property) {
                return Err(StyleError::PaintProperty {
                    layer: layer.id.clone(),
                    property: property.clone(),
                });
            }
            if property.ends_with("-opacity") {
                if let Some(opacity) = value.as_f64() {
                    if !(0.0..=1.0).contains(&opacity) {
                        return Err(StyleError::OutOfRange {
                            layer: layer.id.clone(),
                            property: property.clone(),
                            value: opacity,
                        });
                    }
                }
            }
        }

        if let Some(filter) = &layer.filter {
            filter.validate().map_err(|e| match e {
                StyleError::Expression(reason) => {
                    StyleError::Expression(format!("layer \"{}\": {reason}", layer.id))
                }
                other => other,
            })?;
        }

        Ok(())
    }
}
