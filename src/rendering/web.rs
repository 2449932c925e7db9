//! MapLibre GL JS in the browser, driven through `wasm-bindgen`.
//!
//! The page must load `maplibre-gl.js` first so that the global `maplibregl`
//! namespace exists. Values cross the boundary as JSON.

use crate::{
    core::{
        builder::MapBuilder,
        config::{AppConfig, MapOptions},
        geo::{LatLng, Point},
        map::Map,
    },
    data::geojson::GeoJsonFeature,
    input::events::ClickEvent,
    style::Style,
    traits::Renderer,
    ui::popup::PopupRequest,
    MapError, Result,
};
use js_sys::{Reflect, JSON};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(js_namespace = maplibregl)]
extern "C" {
    #[wasm_bindgen(js_name = Map)]
    #[derive(Debug, Clone)]
    pub type JsMap;

    #[wasm_bindgen(constructor, js_class = "Map", catch)]
    fn new(options: &JsValue) -> std::result::Result<JsMap, JsValue>;

    #[wasm_bindgen(method, js_class = "Map", js_name = on)]
    fn on_layer(this: &JsMap, event: &str, layer_id: &str, listener: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method, js_class = "Map")]
    fn project(this: &JsMap, lng_lat: &JsValue) -> JsValue;

    #[wasm_bindgen(method, js_class = "Map", js_name = queryRenderedFeatures, catch)]
    fn query_rendered_features(
        this: &JsMap,
        point: &JsValue,
        options: &JsValue,
    ) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = Popup)]
    #[derive(Debug, Clone)]
    pub type JsPopup;

    #[wasm_bindgen(constructor, js_class = "Popup")]
    fn new(options: &JsValue) -> JsPopup;

    #[wasm_bindgen(method, js_class = "Popup", js_name = setLngLat)]
    fn set_lng_lat(this: &JsPopup, lng_lat: &JsValue) -> JsPopup;

    #[wasm_bindgen(method, js_class = "Popup", js_name = setHTML)]
    fn set_html(this: &JsPopup, html: &str) -> JsPopup;

    #[wasm_bindgen(method, js_class = "Popup", js_name = addTo)]
    fn add_to(this: &JsPopup, map: &JsMap) -> JsPopup;
}

/// Options object for `new maplibregl.Map(...)`
#[derive(Serialize)]
struct JsMapOptions<'a> {
    #[serde(flatten)]
    options: &'a MapOptions,
    style: &'a Style,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    JSON::parse(&text)
}

fn from_js<T: serde::de::DeserializeOwned>(value: &JsValue) -> std::result::Result<T, JsValue> {
    let text: String = JSON::stringify(value)?.into();
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: MapError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn render_error(e: JsValue) -> MapError {
    MapError::Render(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn number(object: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(object, &JsValue::from_str(key)).ok()?.as_f64()
}

/// Reads a MapLibre `MapLayerMouseEvent`
fn click_event(event: &JsValue) -> std::result::Result<ClickEvent, JsValue> {
    let lng_lat = Reflect::get(event, &JsValue::from_str("lngLat"))?;
    let (Some(lng), Some(lat)) = (number(&lng_lat, "lng"), number(&lng_lat, "lat")) else {
        return Err(JsValue::from_str("click event without lngLat"));
    };

    let features_js = Reflect::get(event, &JsValue::from_str("features"))?;
    let features: Vec<GeoJsonFeature> = if features_js.is_undefined() || features_js.is_null() {
        Vec::new()
    } else {
        from_js(&features_js)?
    };

    let mut click = ClickEvent::new(LatLng::new(lat, lng), features);
    if let Ok(point) = Reflect::get(event, &JsValue::from_str("point")) {
        if let (Some(x), Some(y)) = (number(&point, "x"), number(&point, "y")) {
            click = click.with_point(Point::new(x, y));
        }
    }
    Ok(click)
}

fn add_popup(map: &JsMap, popup: &PopupRequest) -> std::result::Result<(), JsValue> {
    JsPopup::new(&to_js(&popup.options)?)
        .set_lng_lat(&to_js(&popup.anchor.to_lng_lat())?)
        .set_html(&popup.html)
        .add_to(map);
    Ok(())
}

/// A MapLibre map on the page, with the click listeners bound to it
#[wasm_bindgen]
pub struct WebMap {
    map: Option<JsMap>,
    listeners: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl WebMap {
    pub fn new() -> Self {
        Self {
            map: None,
            listeners: Vec::new(),
        }
    }

    /// Creates the MapLibre map and subscribes every handler registered on `map`
    pub fn mount(map: &Map) -> Result<Self> {
        let mut web = Self::new();
        map.mount(&mut web)?;
        web.bind_handlers(map)?;
        Ok(web)
    }

    /// Subscribes the map's handlers to MapLibre layer events.
    ///
    /// Each click runs to completion inside the MapLibre callback.
    pub fn bind_handlers(&mut self, map: &Map) -> Result<()> {
        let js_map = self
            .map
            .clone()
            .ok_or_else(|| MapError::Render("renderer is not initialized".into()))?;

        for subscription in map.subscriptions() {
            let target = js_map.clone();
            let handler = subscription.handler.clone();
            let layer_id = subscription.layer_id.clone();

            let listener = Closure::wrap(Box::new(move |event: JsValue| {
                let click = match click_event(&event) {
                    Ok(click) => click,
                    Err(e) => {
                        web_sys::console::error_2(&JsValue::from_str(&layer_id), &e);
                        return;
                    }
                };
                if let Some(popup) = handler.handle(&click) {
                    if let Err(e) = add_popup(&target, &popup) {
                        web_sys::console::error_1(&e);
                    }
                }
            }) as Box<dyn FnMut(JsValue)>);

            js_map.on_layer(
                subscription.event.as_str(),
                &subscription.layer_id,
                &listener,
            );
            self.listeners.push(listener);
        }

        log::info!("bound {} layer listeners", self.listeners.len());
        Ok(())
    }
}

impl Default for WebMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for WebMap {
    fn initialize(&mut self, options: &MapOptions, style: &Style) -> Result<()> {
        let js_options = to_js(&JsMapOptions { options, style }).map_err(render_error)?;
        self.map = Some(JsMap::new(&js_options).map_err(render_error)?);
        Ok(())
    }

    fn query_rendered_features(&self, at: LatLng, layer_id: &str) -> Vec<GeoJsonFeature> {
        let Some(map) = &self.map else {
            return Vec::new();
        };

        let query = || -> std::result::Result<Vec<GeoJsonFeature>, JsValue> {
            let point = map.project(&to_js(&at.to_lng_lat())?);
            let options = to_js(&serde_json::json!({ "layers": [layer_id] }))?;
            from_js(&map.query_rendered_features(&point, &options)?)
        };
        query().unwrap_or_else(|e| {
            web_sys::console::error_1(&e);
            Vec::new()
        })
    }

    fn show_popup(&mut self, popup: &PopupRequest) -> Result<()> {
        let map = self
            .map
            .as_ref()
            .ok_or_else(|| MapError::Render("renderer is not initialized".into()))?;
        add_popup(map, popup).map_err(render_error)
    }
}

/// Mounts the Kyoto map. `config_json` is an optional [`AppConfig`] document.
#[wasm_bindgen(js_name = startKyotoMap)]
pub fn start_kyoto_map(config_json: Option<String>) -> std::result::Result<WebMap, JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json {
        Some(text) => AppConfig::from_json_str(&text).map_err(js_error)?,
        None => AppConfig::default(),
    };
    let map = MapBuilder::from_config(&config).build().map_err(js_error)?;
    WebMap::mount(&map).map_err(js_error)
}
