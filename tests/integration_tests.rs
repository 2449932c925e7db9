//! End-to-end clicks on the Kyoto map through the headless renderer

use kyomap::constants::{AED_LAYER, AED_SOURCE, EMERGENCY_ROUTE_LAYER, PARCEL_LAYER};
use kyomap::prelude::*;
use std::path::PathBuf;

const STATION: LatLng = LatLng {
    lat: 34.9858,
    lng: 135.7588,
};

/// Writes the three datasets under a fresh directory and returns it
fn data_dir(name: &str) -> anyhow::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("kyomap-{}-{name}", std::process::id()));
    std::fs::create_dir_all(dir.join("data"))?;

    let aed = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"施設名": "京都駅ビル"},
                "geometry": {"type": "Point", "coordinates": [STATION.lng, STATION.lat]}
            },
            {
                "type": "Feature",
                "properties": {"施設名": "東寺"},
                "geometry": {"type": "Point", "coordinates": [135.7478, 34.9806]}
            }
        ]
    });
    let parcels = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"市町村名": "下京区", "大字名": "", "地番": "123"},
            "geometry": {"type": "Polygon", "coordinates": [[
                [135.755, 34.983], [135.762, 34.983], [135.762, 34.988],
                [135.755, 34.988], [135.755, 34.983]
            ]]}
        }]
    });
    let routes = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"N10_002": "国道1号"},
            "geometry": {"type": "LineString", "coordinates": [[135.70, 34.95], [135.80, 34.95]]}
        }]
    });

    std::fs::write(dir.join("data/AED.geojson"), aed.to_string())?;
    std::fs::write(dir.join("data/26106__6_r_2023.geojson"), parcels.to_string())?;
    std::fs::write(dir.join("data/Kyoto_kinkyu.geojson"), routes.to_string())?;
    Ok(dir)
}

fn mounted(name: &str) -> anyhow::Result<(Map, HeadlessRenderer)> {
    let map = MapBuilder::from_config(&AppConfig::default()).build()?;
    let mut renderer = HeadlessRenderer::new().with_base_dir(data_dir(name)?);
    map.mount(&mut renderer)?;
    Ok((map, renderer))
}

#[test]
fn test_datasets_load() -> anyhow::Result<()> {
    let (_, renderer) = mounted("load")?;
    assert_eq!(renderer.source_features(AED_SOURCE).len(), 2);
    assert!(renderer.style().is_some());
    assert_eq!(renderer.options().map(|o| o.zoom), Some(12.0));
    Ok(())
}

#[test]
fn test_click_on_aed_inside_parcel() -> anyhow::Result<()> {
    let (map, mut renderer) = mounted("aed")?;

    let popups = map.dispatch_click(&mut renderer, STATION)?;
    assert_eq!(popups.len(), 2);

    assert_eq!(popups[0].html, "京都駅ビル");
    assert!((popups[0].anchor.lng - STATION.lng).abs() < 1e-12);
    assert!((popups[0].anchor.lat - STATION.lat).abs() < 1e-12);
    assert_eq!(popups[0].options.offset, 10.0);
    assert!(!popups[0].options.close_button);

    assert_eq!(popups[1].html, "下京区123");
    assert_eq!(popups[1].anchor, STATION);

    assert_eq!(renderer.popups(), popups.as_slice());
    Ok(())
}

#[test]
fn test_click_on_parcel_only() -> anyhow::Result<()> {
    let (map, mut renderer) = mounted("parcel")?;

    let at = LatLng::new(34.984, 135.761);
    let popups = map.dispatch_click(&mut renderer, at)?;
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].html, "下京区123");
    assert_eq!(popups[0].anchor, at);
    Ok(())
}

#[test]
fn test_click_on_nothing() -> anyhow::Result<()> {
    let (map, mut renderer) = mounted("nothing")?;

    let popups = map.dispatch_click(&mut renderer, LatLng::new(35.1, 135.6))?;
    assert!(popups.is_empty());
    assert!(renderer.popups().is_empty());
    Ok(())
}

#[test]
fn test_route_line_has_no_popup() -> anyhow::Result<()> {
    let (map, mut renderer) = mounted("route")?;

    let on_route = LatLng::new(34.95, 135.75);
    assert_eq!(renderer.rendered_layers_at(on_route), vec![EMERGENCY_ROUTE_LAYER]);
    assert!(map.dispatch_click(&mut renderer, on_route)?.is_empty());
    Ok(())
}

#[test]
fn test_later_layers_are_on_top() -> anyhow::Result<()> {
    let (map, renderer) = mounted("order")?;

    let layers = renderer.rendered_layers_at(STATION);
    assert_eq!(layers, vec![AED_LAYER, PARCEL_LAYER]);
    assert_eq!(map.style().topmost(layers.iter().copied()), Some(AED_LAYER));
    Ok(())
}

#[test]
fn test_popup_follows_clicked_world_copy() -> anyhow::Result<()> {
    let style = Style::new()
        .with_source("islands", Source::geojson("islands.geojson"))
        .with_layer(Layer::new("islands", LayerType::Circle, "islands"));
    let map = MapBuilder::new()
        .with_style(style)
        .on_click("islands", PointPopupHandler::new("name"))
        .build()?;

    let island = GeoJsonFeature::point(LatLng::new(-16.0, -179.99995)).with_property("name", "Taveuni");
    let mut renderer = HeadlessRenderer::new().with_source_features("islands", vec![island]);
    map.mount(&mut renderer)?;

    let popups = map.dispatch_click(&mut renderer, LatLng::new(-16.0, 180.0))?;
    assert_eq!(popups.len(), 1);
    assert!((popups[0].anchor.lng - 180.00005).abs() < 1e-9);
    assert_eq!(popups[0].anchor.lat, -16.0);
    assert_eq!(popups[0].html, "Taveuni");
    Ok(())
}

#[test]
fn test_config_file_drives_the_map() -> anyhow::Result<()> {
    let dir = data_dir("config")?;
    let path = dir.join("kyomap.json");
    std::fs::write(
        &path,
        r#"{
            "map": {"container": "kyoto", "zoom": 14},
            "popup": {"offset": 20, "closeButton": true},
            "attributes": {"parcelFields": ["地番", "市町村名"]}
        }"#,
    )?;

    let config = AppConfig::from_file(&path)?;
    let map = MapBuilder::from_config(&config).build()?;
    let mut renderer = HeadlessRenderer::new().with_base_dir(&dir);
    map.mount(&mut renderer)?;

    let popups = map.dispatch_click(&mut renderer, LatLng::new(34.984, 135.761))?;
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].html, "123下京区");
    assert_eq!(popups[0].options, PopupOptions { offset: 20.0, close_button: true });
    assert_eq!(map.options().container, "kyoto");
    Ok(())
}

#[test]
fn test_style_document_round_trips_through_json() -> anyhow::Result<()> {
    let style = kyoto_style(&DataConfig::default());
    let json = style.to_json_pretty()?;
    let parsed = Style::from_json_str(&json)?;
    assert_eq!(parsed, style);
    Ok(())
}
