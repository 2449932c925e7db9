use crate::{
    core::{config::MapOptions, geo::LatLng},
    input::{
        events::{ClickEvent, MapEventKind},
        handler::ClickHandler,
    },
    style::Style,
    traits::Renderer,
    ui::popup::PopupRequest,
    MapError, Result,
};
use std::rc::Rc;

/// A handler bound to one event on one layer
#[derive(Clone)]
pub struct Subscription {
    pub event: MapEventKind,
    pub layer_id: String,
    pub handler: Rc<dyn ClickHandler>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("layer_id", &self.layer_id)
            .finish_non_exhaustive()
    }
}

/// The map: renderer options, a validated style and the layer event handlers
#[derive(Debug)]
pub struct Map {
    options: MapOptions,
    style: Style,
    subscriptions: Vec<Subscription>,
}

impl Map {
    /// Creates a map, rejecting options or a style the renderer would refuse
    pub fn new(options: MapOptions, style: Style) -> Result<Self> {
        options.validate()?;
        style.validate()?;

        log::info!(
            "map '{}' at {:?} zoom {}, {} layers",
            options.container,
            options.center,
            options.zoom,
            style.layers.len()
        );

        Ok(Self {
            options,
            style,
            subscriptions: Vec::new(),
        })
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Runs `handler` whenever `event` happens over a feature of `layer_id`
    pub fn on<H>(&mut self, event: MapEventKind, layer_id: &str, handler: H) -> Result<()>
    where
        H: ClickHandler + 'static,
    {
        self.on_shared(event, layer_id, Rc::new(handler))
    }

    /// Like [`Map::on`], for a handler that is already shared
    pub fn on_shared(
        &mut self,
        event: MapEventKind,
        layer_id: &str,
        handler: Rc<dyn ClickHandler>,
    ) -> Result<()> {
        if self.style.layer(layer_id).is_none() {
            return Err(MapError::Layer(format!(
                "cannot listen for {event} on unknown layer \"{layer_id}\""
            )));
        }

        log::debug!("subscribed to {event} on {layer_id}");
        self.subscriptions.push(Subscription {
            event,
            layer_id: layer_id.to_string(),
            handler,
        });
        Ok(())
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    /// Hands the options and style to the renderer
    pub fn mount<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        renderer.initialize(&self.options, &self.style)
    }

    /// Runs the click handlers of one layer for an event the renderer
    /// already resolved, in subscription order
    pub fn handle_click(&self, layer_id: &str, event: &ClickEvent) -> Vec<PopupRequest> {
        self.subscriptions
            .iter()
            .filter(|s| s.event == MapEventKind::Click && s.layer_id == layer_id)
            .filter_map(|s| s.handler.handle(event))
            .collect()
    }

    /// Simulates a click at `at`: every subscribed layer with features under
    /// the cursor gets its handlers run, and the resulting popups are shown.
    ///
    /// Layers without features at `at` are skipped, as the renderer only
    /// fires layer events over rendered features.
    pub fn dispatch_click<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        at: LatLng,
    ) -> Result<Vec<PopupRequest>> {
        let mut shown = Vec::new();

        for subscription in &self.subscriptions {
            if subscription.event != MapEventKind::Click {
                continue;
            }

            let features = renderer.query_rendered_features(at, &subscription.layer_id);
            if features.is_empty() {
                continue;
            }

            let event = ClickEvent::new(at, features);
            if let Some(popup) = subscription.handler.handle(&event) {
                renderer.show_popup(&popup)?;
                shown.push(popup);
            }
        }

        log::debug!("click at {:?} produced {} popups", at, shown.len());
        Ok(shown)
    }
}
