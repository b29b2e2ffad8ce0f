//! `SummaryWidget`: one live statistic kept in sync with a filter bus.
//!
//! The widget owns its row index and settings for its whole life. Each
//! filter or selection change recomputes over the intersection of the two
//! active key sets and rewrites the sink.
//!
//! Failure policy:
//! - configuration errors log an error and leave the sink untouched;
//! - degenerate input (mean/min/max of nothing, non-numeric values) logs a
//!   warning and renders the blank string.

use crate::sink::RenderSink;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tally_core::{
    Bus, ChangeHandler, Channel, Key, KeySet, Payload, StatisticError, Subscription,
    SummaryModel, TallyError,
};

/// Text rendered when the statistic is undefined for the current subset.
pub const BLANK: &str = "";

/// Lifecycle of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Index built, nothing rendered yet
    #[default]
    Initialized,
    /// A value is on screen
    Displaying,
}

/// Result of one recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The formatted value was written
    Rendered(String),
    /// The statistic was undefined; [`BLANK`] was written
    Blank(StatisticError),
    /// Nothing was written; carries the diagnostic
    Skipped(String),
}

impl RenderOutcome {
    /// Text written to the sink, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Rendered(text) => Some(text),
            Self::Blank(_) => Some(BLANK),
            Self::Skipped(_) => None,
        }
    }
}

/// A summary statistic bound to a render sink.
pub struct SummaryWidget<S> {
    model: SummaryModel,
    sink: S,
    filter: Option<KeySet>,
    selection: Option<KeySet>,
    state: WidgetState,
    displayed: Option<String>,
}

impl<S: RenderSink> SummaryWidget<S> {
    /// Validate a payload and prepare a widget. Nothing is rendered yet.
    pub fn new(payload: Payload, sink: S) -> Result<Self, TallyError> {
        Ok(Self::from_model(SummaryModel::from_payload(payload)?, sink))
    }

    /// Prepare a widget from a validated model.
    pub const fn from_model(model: SummaryModel, sink: S) -> Self {
        Self {
            model,
            sink,
            filter: None,
            selection: None,
            state: WidgetState::Initialized,
            displayed: None,
        }
    }

    /// The underlying model.
    pub const fn model(&self) -> &SummaryModel {
        &self.model
    }

    /// The sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Lifecycle state.
    pub const fn state(&self) -> WidgetState {
        self.state
    }

    /// Last text written to the sink.
    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// Bus group from the settings.
    pub fn group(&self) -> Option<&str> {
        self.model.settings().group.as_deref()
    }

    /// Active filter keys.
    pub const fn filter(&self) -> Option<&KeySet> {
        self.filter.as_ref()
    }

    /// Active selection keys.
    pub const fn selection(&self) -> Option<&KeySet> {
        self.selection.as_ref()
    }

    /// Recompute with the current filter and selection and write the sink.
    pub fn render(&mut self) -> RenderOutcome {
        let statistic = self.model.settings().statistic;
        let outcome = match self.model.display(self.filter.as_ref(), self.selection.as_ref()) {
            Ok(text) => RenderOutcome::Rendered(text),
            Err(TallyError::Statistic(err)) => {
                log::warn!("summary widget: {err}; showing blank");
                RenderOutcome::Blank(err)
            }
            Err(err) => {
                log::error!("summary widget: {err}");
                return RenderOutcome::Skipped(err.to_string());
            }
        };

        if let Some(text) = outcome.text() {
            log::debug!("summary widget: {statistic} -> {text:?}");
            self.sink.render(text);
            self.displayed = Some(text.to_string());
            self.state = WidgetState::Displaying;
        }
        outcome
    }

    /// Apply a filter change and recompute.
    pub fn on_filter(&mut self, keys: Option<&[Key]>) -> RenderOutcome {
        self.filter = KeySet::from_event(keys.map(<[Key]>::to_vec));
        self.render()
    }

    /// Apply a selection change and recompute.
    pub fn on_selection(&mut self, keys: Option<&[Key]>) -> RenderOutcome {
        self.selection = KeySet::from_event(keys.map(<[Key]>::to_vec));
        self.render()
    }

    /// Apply a change on either channel and recompute.
    pub fn handle(&mut self, channel: Channel, keys: Option<&[Key]>) -> RenderOutcome {
        match channel {
            Channel::Filter => self.on_filter(keys),
            Channel::Selection => self.on_selection(keys),
        }
    }
}

impl<S> fmt::Debug for SummaryWidget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryWidget")
            .field("statistic", &self.model.settings().statistic)
            .field("rows", &self.model.index().len())
            .field("state", &self.state)
            .field("displayed", &self.displayed)
            .finish_non_exhaustive()
    }
}

/// A widget subscribed to its bus group.
///
/// Dropping it unsubscribes from the bus.
pub struct MountedWidget<S> {
    widget: Rc<RefCell<SummaryWidget<S>>>,
    subscriptions: Vec<Subscription>,
}

impl<S: RenderSink + 'static> MountedWidget<S> {
    /// Subscribe `widget` to both channels of its group and render it.
    ///
    /// Keys already active on the bus are applied before the first render.
    /// A widget without a group renders once and never updates.
    pub fn mount<B: Bus + ?Sized>(widget: SummaryWidget<S>, bus: &B) -> Self {
        let group = widget.group().map(str::to_string);
        let widget = Rc::new(RefCell::new(widget));
        let mut subscriptions = Vec::new();

        if let Some(group) = group {
            {
                let mut w = widget.borrow_mut();
                w.filter = KeySet::from_event(bus.current(&group, Channel::Filter));
                w.selection = KeySet::from_event(bus.current(&group, Channel::Selection));
            }
            for channel in [Channel::Filter, Channel::Selection] {
                let target: Weak<RefCell<SummaryWidget<S>>> = Rc::downgrade(&widget);
                let handler: ChangeHandler = Box::new(move |keys| {
                    let Some(widget) = target.upgrade() else {
                        return;
                    };
                    let Ok(mut widget) = widget.try_borrow_mut() else {
                        log::warn!("summary widget: dropped re-entrant {channel} event");
                        return;
                    };
                    widget.handle(channel, keys);
                });
                subscriptions.push(bus.subscribe(&group, channel, handler));
            }
            log::debug!("summary widget: mounted on group '{group}'");
        }

        widget.borrow_mut().render();
        Self {
            widget,
            subscriptions,
        }
    }

    /// Last text written to the sink.
    pub fn displayed(&self) -> Option<String> {
        self.widget.borrow().displayed().map(str::to_string)
    }

    /// Lifecycle state.
    pub fn state(&self) -> WidgetState {
        self.widget.borrow().state()
    }

    /// Run `f` against the widget.
    pub fn with<R>(&self, f: impl FnOnce(&SummaryWidget<S>) -> R) -> R {
        f(&self.widget.borrow())
    }

    /// Run `f` against the widget mutably.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut SummaryWidget<S>) -> R) -> R {
        f(&mut self.widget.borrow_mut())
    }

    /// Number of live bus subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl<S> fmt::Debug for MountedWidget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedWidget")
            .field("widget", &self.widget.borrow())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
