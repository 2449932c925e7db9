pub mod headless;
#[cfg(feature = "wasm")]
pub mod web;

pub use headless::HeadlessRenderer;
#[cfg(feature = "wasm")]
pub use web::WebMap;
