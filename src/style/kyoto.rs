//! The Kyoto composition: OSM background, registry parcels, AED points,
//! emergency-transport routes and extruded OSM buildings, bottom to top.

use crate::core::config::DataConfig;
use crate::core::constants::*;
use crate::style::{Expression, Layer, LayerType, PropertyFunction, Source, Style};
use serde_json::json;

const OSM_ATTRIBUTION: &str = "地図の出典：<a href='https://www.openstreetmap.org/copyright' target='_blank'>© OpenStreetMap contributors</a>";
const AED_ATTRIBUTION: &str = "データの出典：<a href='https://data.city.kyoto.lg.jp/resource/?id=20052' target='_blank'>京都市オープンデータポータルサイト</a>";
const ROUTE_ATTRIBUTION: &str = "データの出典：<a href='https://nlftp.mlit.go.jp/ksj/gml/datalist/KsjTmplt-N10-2020.html' target='_blank'>国土交通省国土数値情報ダウンロードサイト</a>";
const PARCEL_ATTRIBUTION: &str = "データの出典：<a href='https://www.geospatial.jp/ckan/organization/moj-mapdata' target='_blank'>「登記所備付データ」（法務省）</a>をもとにG空間情報センターにて変換処理したデータを加工して作成";

/// Builds the style for the given data locations
pub fn kyoto_style(data: &DataConfig) -> Style {
    Style::new()
        .with_name("kyoto-aed")
        .with_source(
            OSM_TILE_SOURCE,
            Source::raster(&data.raster_tiles, RASTER_TILE_SIZE).with_attribution(OSM_ATTRIBUTION),
        )
        .with_source(OSM_VECTOR_SOURCE, Source::vector_tilejson(&data.vector_tiles))
        .with_source(
            AED_SOURCE,
            Source::geojson(&data.aed).with_attribution(AED_ATTRIBUTION),
        )
        .with_source(
            EMERGENCY_ROUTE_SOURCE,
            Source::geojson(&data.emergency_routes).with_attribution(ROUTE_ATTRIBUTION),
        )
        .with_source(
            PARCEL_SOURCE,
            Source::geojson(&data.parcels).with_attribution(PARCEL_ATTRIBUTION),
        )
        .with_layer(Layer::new(OSM_LAYER, LayerType::Raster, OSM_TILE_SOURCE))
        .with_layer(
            Layer::new(PARCEL_LAYER, LayerType::Fill, PARCEL_SOURCE)
                .paint("fill-color", "#fd7e00")
                .paint("fill-opacity", 0.3)
                .paint("fill-outline-color", "#ff0000"),
        )
        .with_layer(
            Layer::new(AED_LAYER, LayerType::Circle, AED_SOURCE)
                .paint("circle-radius", 5.0)
                .paint("circle-color", "#ff0000"),
        )
        .with_layer(
            Layer::new(EMERGENCY_ROUTE_LAYER, LayerType::Line, EMERGENCY_ROUTE_SOURCE)
                .paint("line-color", "#00008b")
                .paint("line-width", 5.0),
        )
        .with_layer(
            Layer::new(BUILDING_LAYER, LayerType::FillExtrusion, OSM_VECTOR_SOURCE)
                .source_layer("building")
                .filter(Expression::all(vec![Expression::not_has("hide_3d")]))
                .paint(
                    "fill-extrusion-height",
                    PropertyFunction::identity("render_height"),
                )
                .paint(
                    "fill-extrusion-base",
                    PropertyFunction::identity("render_min_height"),
                )
                .paint("fill-extrusion-opacity", 0.6)
                .paint(
                    "fill-extrusion-color",
                    Expression::case(
                        Expression::has("colour"),
                        Expression::get("colour"),
                        Expression::new(json!("#C0C0C0")),
                    ),
                ),
        )
}
