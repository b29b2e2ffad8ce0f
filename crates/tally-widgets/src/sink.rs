//! Output surfaces a summary widget writes into.

use std::cell::RefCell;
use std::rc::Rc;

/// Destination for the formatted value.
///
/// `render` replaces the whole visible text of the surface.
pub trait RenderSink {
    /// Replace the surface's text with `text`.
    fn render(&mut self, text: &str);
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn render(&mut self, text: &str) {
        (**self).render(text);
    }
}

/// In-memory text surface.
///
/// Clones share the same buffer, so a host can keep one handle while the
/// widget owns another.
#[derive(Debug, Clone, Default)]
pub struct TextSink {
    inner: Rc<RefCell<TextSurface>>,
}

#[derive(Debug, Default)]
struct TextSurface {
    content: String,
    writes: usize,
}

impl TextSink {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    #[must_use]
    pub fn content(&self) -> String {
        self.inner.borrow().content.clone()
    }

    /// Number of renders so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl RenderSink for TextSink {
    fn render(&mut self, text: &str) {
        let mut surface = self.inner.borrow_mut();
        surface.content.clear();
        surface.content.push_str(text);
        surface.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_sink_replaces_content() {
        let mut sink = TextSink::new();
        sink.render("12");
        sink.render("7");
        assert_eq!(sink.content(), "7");
        assert_eq!(sink.writes(), 2);
    }

    #[test]
    fn test_text_sink_clones_share_surface() {
        let host = TextSink::new();
        let mut widget_side = host.clone();
        widget_side.render("42%");
        assert_eq!(host.content(), "42%");
    }

    #[test]
    fn test_boxed_sink() {
        let host = TextSink::new();
        let mut boxed: Box<dyn RenderSink> = Box::new(host.clone());
        boxed.render("ok");
        assert_eq!(host.content(), "ok");
    }
}
