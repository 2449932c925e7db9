pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{ClickEvent, MapEventKind};
pub use handler::{
    on_point_layer_click, on_polygon_layer_click, ClickHandler, ParcelPopupHandler,
    PointPopupHandler,
};
