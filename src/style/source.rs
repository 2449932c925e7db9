use serde::{Deserialize, Serialize};

/// Where a GeoJSON source gets its data: a URL/path, or an inline document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoJsonData {
    Url(String),
    Inline(serde_json::Value),
}

/// A style data source, tagged by its `type` as in the MapLibre style document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Source {
    Raster {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tiles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(rename = "tileSize", default, skip_serializing_if = "Option::is_none")]
        tile_size: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    Vector {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tiles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    RasterDem {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tiles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(rename = "tileSize", default, skip_serializing_if = "Option::is_none")]
        tile_size: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    #[serde(rename = "geojson")]
    GeoJson {
        data: GeoJsonData,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    Image {
        url: String,
        coordinates: [[f64; 2]; 4],
    },
    Video {
        urls: Vec<String>,
        coordinates: [[f64; 2]; 4],
    },
}

impl Source {
    /// Raster tiles from a `{z}/{x}/{y}` URL template
    pub fn raster(template: impl Into<String>, tile_size: u32) -> Self {
        Source::Raster {
            tiles: vec![template.into()],
            url: None,
            tile_size: Some(tile_size),
            attribution: None,
        }
    }

    /// Vector tiles described by a TileJSON endpoint
    pub fn vector_tilejson(url: impl Into<String>) -> Self {
        Source::Vector {
            tiles: Vec::new(),
            url: Some(url.into()),
            attribution: None,
        }
    }

    /// GeoJSON loaded from a URL or relative path
    pub fn geojson(data: impl Into<String>) -> Self {
        Source::GeoJson {
            data: GeoJsonData::Url(data.into()),
            attribution: None,
        }
    }

    pub fn with_attribution(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Source::Raster { attribution, .. }
            | Source::Vector { attribution, .. }
            | Source::RasterDem { attribution, .. }
            | Source::GeoJson { attribution, .. } => *attribution = Some(text.into()),
            Source::Image { .. } | Source::Video { .. } => {}
        }
        self
    }

    /// The `type` string of the source
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Raster { .. } => "raster",
            Source::Vector { .. } => "vector",
            Source::RasterDem { .. } => "raster-dem",
            Source::GeoJson { .. } => "geojson",
            Source::Image { .. } => "image",
            Source::Video { .. } => "video",
        }
    }

    pub fn attribution(&self) -> Option<&str> {
        match self {
            Source::Raster { attribution, .. }
            | Source::Vector { attribution, .. }
            | Source::RasterDem { attribution, .. }
            | Source::GeoJson { attribution, .. } => attribution.as_deref(),
            Source::Image { .. } | Source::Video { .. } => None,
        }
    }

    /// Tile URL templates, for tiled sources
    pub fn tile_templates(&self) -> &[String] {
        match self {
            Source::Raster { tiles, .. }
            | Source::Vector { tiles, .. }
            | Source::RasterDem { tiles, .. } => tiles,
            _ => &[],
        }
    }

    /// Whether the source is tiled and names neither `tiles` nor a TileJSON `url`
    pub fn lacks_tiles(&self) -> bool {
        match self {
            Source::Raster { tiles, url, .. }
            | Source::Vector { tiles, url, .. }
            | Source::RasterDem { tiles, url, .. } => tiles.is_empty() && url.is_none(),
            _ => false,
        }
    }

    /// The data location of a GeoJSON source given by URL
    pub fn geojson_url(&self) -> Option<&str> {
        match self {
            Source::GeoJson {
                data: GeoJsonData::Url(url),
                ..
            } => Some(url),
            _ => None,
        }
    }
}
