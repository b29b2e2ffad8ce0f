//! Render a payload's initial value without a browser.
//!
//! Useful for static pages and snapshot tests: the result is exactly what a
//! freshly mounted widget would show before any filter event.

use tally_core::{Payload, TallyError};
use tally_widgets::{SummaryWidget, TextSink, BLANK};

/// Initial display text for a payload.
pub fn prerender(payload: Payload) -> Result<String, TallyError> {
    let mut widget = SummaryWidget::new(payload, TextSink::new())?;
    Ok(widget.render().text().unwrap_or(BLANK).to_string())
}

/// Initial display text for a JSON payload.
pub fn prerender_json(json: &str) -> Result<String, TallyError> {
    prerender(Payload::from_json(json)?)
}
