use crate::core::constants::POPUP_OFFSET;
use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Options of a MapLibre popup, serialised as `{ offset, closeButton }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PopupOptions {
    /// Distance from the anchor in pixels
    pub offset: f64,
    pub close_button: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            offset: POPUP_OFFSET,
            close_button: false,
        }
    }
}

/// A popup the renderer should display.
///
/// `html` is inserted as markup without escaping; attribute values that
/// contain markup are rendered as markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupRequest {
    pub anchor: LatLng,
    pub html: String,
    pub options: PopupOptions,
}

impl PopupRequest {
    pub fn new(anchor: LatLng, html: impl Into<String>) -> Self {
        Self {
            anchor,
            html: html.into(),
            options: PopupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }
}

/// Popups shown so far, oldest first
#[derive(Debug, Default)]
pub struct PopupManager {
    popups: Vec<PopupRequest>,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, popup: PopupRequest) {
        log::debug!("popup at {:?}: {}", popup.anchor, popup.html);
        self.popups.push(popup);
    }

    pub fn popups(&self) -> &[PopupRequest] {
        &self.popups
    }

    pub fn last(&self) -> Option<&PopupRequest> {
        self.popups.last()
    }

    pub fn clear(&mut self) {
        self.popups.clear();
    }

    pub fn visible_count(&self) -> usize {
        self.popups.len()
    }
}
