//! Tally: live summary statistics for crosstalk-linked pages.
//!
//! A Tally widget shows one number (count, sum, mean, min, max, distinct
//! count, duplicate count or a rate) and keeps it in step with the filter and
//! selection of the widgets it shares a crosstalk group with.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { TallyWidget } from './tally.js';
//!
//! async function main() {
//!     await init();
//!     const widget = new TallyWidget('total');
//!     widget.renderValue({ data: [1, 2, 2, 3], settings: { statistic: 'distinct_count' } });
//! }
//! ```

pub use tally_core::*;
pub use tally_widgets as widgets;

pub mod browser;
pub mod prerender;

#[cfg(target_arch = "wasm32")]
pub use browser::{CrosstalkBus, ElementSink, TallyWidget};

pub use prerender::{prerender, prerender_json};
