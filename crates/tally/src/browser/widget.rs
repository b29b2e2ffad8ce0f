//! WASM export: one summary widget bound to one page element.
//!
//! ```javascript
//! import init, { TallyWidget } from './tally.js';
//!
//! await init();
//! const widget = new TallyWidget('total-sales');
//! widget.renderValue(x);   // x: the host payload object
//! ```

use super::crosstalk::CrosstalkBus;
use super::element::ElementSink;
use tally_core::{LocalBus, Payload};
use tally_widgets::{MountedWidget, SummaryWidget};
use wasm_bindgen::prelude::*;

/// A summary widget living in a DOM element.
#[wasm_bindgen]
pub struct TallyWidget {
    element_id: String,
    mounted: Option<MountedWidget<ElementSink>>,
}

#[wasm_bindgen]
impl TallyWidget {
    /// Create a widget for the element with `element_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str) -> Result<TallyWidget, JsValue> {
        // Fail early if the element is missing.
        ElementSink::by_id(element_id)?;
        Ok(Self {
            element_id: element_id.to_string(),
            mounted: None,
        })
    }

    /// Build the index from a host payload object, subscribe to its
    /// crosstalk group and render.
    ///
    /// A rejected payload is reported on the console and nothing else
    /// changes: the previous value stays on screen and stays live.
    #[wasm_bindgen(js_name = "renderValue")]
    pub fn render_value(&mut self, x: JsValue) {
        match serde_wasm_bindgen::from_value::<Payload>(x) {
            Ok(payload) => self.mount(payload),
            Err(e) => log::error!("tally: malformed payload: {e}"),
        }
    }

    /// Same as `renderValue` for a JSON-encoded payload.
    #[wasm_bindgen(js_name = "renderJson")]
    pub fn render_json(&mut self, json: &str) {
        match Payload::from_json(json) {
            Ok(payload) => self.mount(payload),
            Err(e) => log::error!("tally: {e}"),
        }
    }

    /// Text currently shown, if anything was rendered.
    pub fn value(&self) -> Option<String> {
        self.mounted.as_ref().and_then(MountedWidget::displayed)
    }

    /// Element the widget renders into.
    #[wasm_bindgen(getter, js_name = "elementId")]
    pub fn element_id(&self) -> String {
        self.element_id.clone()
    }

    /// Size changes do not affect a text value.
    pub fn resize(&self, _width: f64, _height: f64) {}
}

impl TallyWidget {
    fn mount(&mut self, payload: Payload) {
        let sink = match ElementSink::by_id(&self.element_id) {
            Ok(sink) => sink,
            Err(e) => {
                log::error!("tally: {e:?}");
                return;
            }
        };
        let widget = match SummaryWidget::new(payload, sink) {
            Ok(widget) => widget,
            Err(e) => {
                log::error!("tally: {e}");
                return;
            }
        };

        // Replacing the previous mount drops its crosstalk subscriptions.
        self.mounted = None;
        let mounted = if widget.group().is_some() {
            match CrosstalkBus::from_global() {
                Ok(bus) => MountedWidget::mount(widget, &bus),
                Err(e) => {
                    log::warn!("tally: {e:?}; rendering without live updates");
                    MountedWidget::mount(widget, &LocalBus::new())
                }
            }
        } else {
            MountedWidget::mount(widget, &LocalBus::new())
        };
        self.mounted = Some(mounted);
    }
}

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    super::console::init(log::LevelFilter::Info);
}

/// Change how much is logged to the console.
#[wasm_bindgen(js_name = "setLogLevel")]
pub fn set_log_level(level: &str) {
    let level = level.parse().unwrap_or(log::LevelFilter::Info);
    log::set_max_level(level);
}
