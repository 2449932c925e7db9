pub mod popup;

pub use popup::{PopupManager, PopupOptions, PopupRequest};
