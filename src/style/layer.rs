use crate::style::expression::{Expression, Properties};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Layer types accepted by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerType {
    Background,
    Fill,
    Line,
    Symbol,
    Raster,
    Circle,
    FillExtrusion,
    Heatmap,
    Hillshade,
}

impl LayerType {
    /// Whether a layer of this type can draw from a source of `source_kind`
    pub fn accepts_source(&self, source_kind: &str) -> bool {
        match self {
            LayerType::Background => false,
            LayerType::Raster => matches!(source_kind, "raster" | "image" | "video"),
            LayerType::Hillshade => source_kind == "raster-dem",
            _ => matches!(source_kind, "vector" | "geojson"),
        }
    }

    /// Whether `key` is a paint property of this layer type
    pub fn accepts_paint(&self, key: &str) -> bool {
        match self {
            LayerType::Background => key.starts_with("background-"),
            LayerType::Fill => key.starts_with("fill-") && !key.starts_with("fill-extrusion-"),
            LayerType::Line => key.starts_with("line-"),
            LayerType::Symbol => key.starts_with("icon-") || key.starts_with("text-"),
            LayerType::Raster => key.starts_with("raster-"),
            LayerType::Circle => key.starts_with("circle-"),
            LayerType::FillExtrusion => key.starts_with("fill-extrusion-"),
            LayerType::Heatmap => key.starts_with("heatmap-"),
            LayerType::Hillshade => key.starts_with("hillshade-"),
        }
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LayerType::Background => "background",
            LayerType::Fill => "fill",
            LayerType::Line => "line",
            LayerType::Symbol => "symbol",
            LayerType::Raster => "raster",
            LayerType::Circle => "circle",
            LayerType::FillExtrusion => "fill-extrusion",
            LayerType::Heatmap => "heatmap",
            LayerType::Hillshade => "hillshade",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Identity,
    Exponential,
    Interval,
    Categorical,
}

/// Legacy property function, e.g. `{ "type": "identity", "property": "render_height" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFunction {
    #[serde(rename = "type")]
    pub kind: FunctionKind,
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// `stops`, `base`, `colorSpace` and any other keys, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PropertyFunction {
    pub fn identity(property: impl Into<String>) -> Self {
        Self {
            kind: FunctionKind::Identity,
            property: property.into(),
            default: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// A paint property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintValue {
    Function(PropertyFunction),
    Expression(Expression),
}

impl PaintValue {
    /// Resolves the value for one feature.
    ///
    /// Only identity functions are resolved; other function kinds need zoom
    /// stops and yield their `default`.
    pub fn resolve(&self, properties: &Properties) -> Value {
        match self {
            PaintValue::Function(function) => match function.kind {
                FunctionKind::Identity => properties
                    .get(&function.property)
                    .cloned()
                    .or_else(|| function.default.clone())
                    .unwrap_or(Value::Null),
                _ => function.default.clone().unwrap_or(Value::Null),
            },
            PaintValue::Expression(expression) => expression.evaluate(properties),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PaintValue::Expression(expression) => expression.as_f64(),
            PaintValue::Function(_) => None,
        }
    }
}

impl From<f64> for PaintValue {
    fn from(value: f64) -> Self {
        PaintValue::Expression(Expression::new(Value::from(value)))
    }
}

impl From<&str> for PaintValue {
    fn from(value: &str) -> Self {
        PaintValue::Expression(Expression::new(Value::from(value)))
    }
}

impl From<Expression> for PaintValue {
    fn from(value: Expression) -> Self {
        PaintValue::Expression(value)
    }
}

impl From<PropertyFunction> for PaintValue {
    fn from(value: PropertyFunction) -> Self {
        PaintValue::Function(value)
    }
}

/// A style layer; position in `Style::layers` is its draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "source-layer", default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layout: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub paint: BTreeMap<String, PaintValue>,
    /// Keys the map does not interpret (`metadata`, ...), passed through
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Layer {
    pub fn new(id: impl Into<String>, layer_type: LayerType, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer_type,
            source: Some(source.into()),
            source_layer: None,
            minzoom: None,
            maxzoom: None,
            filter: None,
            layout: BTreeMap::new(),
            paint: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn background(id: impl Into<String>) -> Self {
        Self {
            source: None,
            ..Self::new(id, LayerType::Background, String::new())
        }
    }

    pub fn source_layer(mut self, name: impl Into<String>) -> Self {
        self.source_layer = Some(name.into());
        self
    }

    pub fn filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn paint(mut self, key: impl Into<String>, value: impl Into<PaintValue>) -> Self {
        self.paint.insert(key.into(), value.into());
        self
    }

    /// Whether a feature with these properties passes the layer filter
    pub fn accepts(&self, properties: &Properties) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter.matches(properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_wire_format() {
        let layer = Layer::new("building-3d-layer", LayerType::FillExtrusion, "osm-vector-tile")
            .source_layer("building")
            .paint("fill-extrusion-height", PropertyFunction::identity("render_height"))
            .paint("fill-extrusion-opacity", 0.6);

        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "building-3d-layer",
                "type": "fill-extrusion",
                "source": "osm-vector-tile",
                "source-layer": "building",
                "paint": {
                    "fill-extrusion-height": {"type": "identity", "property": "render_height"},
                    "fill-extrusion-opacity": 0.6
                }
            })
        );

        let back: Layer = serde_json::from_value(value).unwrap();
        assert_eq!(back, layer);
    }

    #[test]
    fn test_zoom_and_property_functions_keep_their_stops() {
        let value = json!({
            "id": "aed-size",
            "type": "circle",
            "source": "spot-point",
            "layout": {"visibility": "visible"},
            "metadata": {"maputnik:renderer": "mlgljs"},
            "paint": {
                "circle-radius": {"type": "exponential", "property": "size", "stops": [[0, 1], [10, 20]], "base": 1.5},
                "circle-blur": {"stops": [[10, 0], [16, 1]]}
            }
        });

        let layer: Layer = serde_json::from_value(value.clone()).unwrap();
        match &layer.paint["circle-radius"] {
            PaintValue::Function(function) => {
                assert_eq!(function.kind, FunctionKind::Exponential);
                assert_eq!(function.extra["stops"], json!([[0, 1], [10, 20]]));
            }
            other => panic!("expected a property function, got {other:?}"),
        }
        assert_eq!(serde_json::to_value(&layer).unwrap(), value);
    }

    #[test]
    fn test_identity_function_reads_property() {
        let height = PaintValue::from(PropertyFunction::identity("render_height"));
        let props: Properties = serde_json::from_value(json!({"render_height": 31.5})).unwrap();
        assert_eq!(height.resolve(&props), json!(31.5));
        assert_eq!(height.resolve(&Properties::default()), Value::Null);
    }

    #[test]
    fn test_paint_prefixes() {
        assert!(LayerType::Fill.accepts_paint("fill-outline-color"));
        assert!(!LayerType::Fill.accepts_paint("fill-extrusion-height"));
        assert!(LayerType::Circle.accepts_paint("circle-radius"));
        assert!(!LayerType::Circle.accepts_paint("line-width"));
        assert!(LayerType::Symbol.accepts_paint("text-color"));
    }

    #[test]
    fn test_source_compatibility() {
        assert!(LayerType::Raster.accepts_source("raster"));
        assert!(!LayerType::Raster.accepts_source("geojson"));
        assert!(LayerType::Circle.accepts_source("geojson"));
        assert!(LayerType::FillExtrusion.accepts_source("vector"));
        assert!(LayerType::Hillshade.accepts_source("raster-dem"));
    }
}
