//! DOM element render sink.

use tally_widgets::RenderSink;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, HtmlElement};

/// Writes the formatted value as the element's visible text.
#[derive(Debug, Clone)]
pub struct ElementSink {
    element: HtmlElement,
}

impl ElementSink {
    /// Wrap an element.
    #[must_use]
    pub const fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    /// Look up an element by ID.
    pub fn by_id(element_id: &str) -> Result<Self, JsValue> {
        let document = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;

        let element = document
            .get_element_by_id(element_id)
            .ok_or_else(|| format!("Element '{element_id}' not found"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "Element is not an HTML element")?;

        Ok(Self::new(element))
    }

    /// The wrapped element.
    #[must_use]
    pub const fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl RenderSink for ElementSink {
    fn render(&mut self, text: &str) {
        self.element.set_inner_text(text);
    }
}
