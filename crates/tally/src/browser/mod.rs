//! Browser runtime for Tally WASM widgets.
//!
//! This module bridges the summary engine to the page: the DOM element the
//! value is written into, the host's crosstalk object, and the console.

#[cfg(target_arch = "wasm32")]
pub mod console;
#[cfg(target_arch = "wasm32")]
pub mod crosstalk;
#[cfg(target_arch = "wasm32")]
pub mod element;
#[cfg(target_arch = "wasm32")]
pub mod widget;

#[cfg(target_arch = "wasm32")]
pub use console::ConsoleLogger;
#[cfg(target_arch = "wasm32")]
pub use crosstalk::CrosstalkBus;
#[cfg(target_arch = "wasm32")]
pub use element::ElementSink;
#[cfg(target_arch = "wasm32")]
pub use widget::TallyWidget;
