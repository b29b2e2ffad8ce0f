//! Summary display widgets for Tally.
//!
//! A [`SummaryWidget`] shows one statistic over a dataset and recomputes it
//! whenever the filter or selection of its bus group changes. Mount it with
//! [`MountedWidget::mount`] to wire it to a [`tally_core::Bus`].

pub mod sink;
pub mod summary;

pub use sink::{RenderSink, TextSink};
pub use summary::{MountedWidget, RenderOutcome, SummaryWidget, WidgetState, BLANK};
