//! Shared filter/selection bus.
//!
//! Widgets on one page that share a group see each other's filter and
//! selection changes. The bus is injected: the browser runtime bridges to the
//! host's crosstalk object, tests and native hosts use [`LocalBus`].
//!
//! Everything here is single-threaded. Handlers run synchronously inside
//! [`LocalBus::publish`], one after another.

use crate::datum::Key;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Which stream of a group an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Rows kept by filters in the group
    Filter,
    /// Rows highlighted by a brush or click
    Selection,
}

impl Channel {
    /// Lowercase channel name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Selection => "selection",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callback for channel changes. `None` means the channel was cleared.
pub type ChangeHandler = Box<dyn FnMut(Option<&[Key]>)>;

/// Handle returned by [`Bus::subscribe`]. Unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a handle that runs `cancel` on drop.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub const fn detached() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// A cross-widget filter/selection channel.
pub trait Bus {
    /// Register `handler` for changes on `channel` of `group`.
    fn subscribe(&self, group: &str, channel: Channel, handler: ChangeHandler) -> Subscription;

    /// Keys currently active on `channel` of `group`, if any.
    fn current(&self, _group: &str, _channel: Channel) -> Option<Vec<Key>> {
        None
    }
}

type SharedHandler = Rc<RefCell<ChangeHandler>>;

struct Entry {
    id: u64,
    group: String,
    channel: Channel,
    handler: SharedHandler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
    state: HashMap<(String, Channel), Vec<Key>>,
}

/// In-process [`Bus`] implementation.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct LocalBus {
    registry: Rc<RefCell<Registry>>,
}

impl LocalBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the keys on a channel and notify its subscribers.
    ///
    /// `None` and an empty list both clear the channel.
    pub fn publish(&self, group: &str, channel: Channel, keys: Option<Vec<Key>>) {
        let keys = keys.filter(|k| !k.is_empty());
        let handlers: Vec<SharedHandler> = {
            let mut registry = self.registry.borrow_mut();
            let slot = (group.to_string(), channel);
            match &keys {
                Some(keys) => {
                    registry.state.insert(slot, keys.clone());
                }
                None => {
                    registry.state.remove(&slot);
                }
            }
            registry
                .entries
                .iter()
                .filter(|e| e.group == group && e.channel == channel)
                .map(|e| Rc::clone(&e.handler))
                .collect()
        };

        log::debug!(
            "bus {group}/{channel}: {} keys to {} subscribers",
            keys.as_ref().map_or(0, Vec::len),
            handlers.len()
        );

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => handler(keys.as_deref()),
                Err(_) => log::warn!("bus {group}/{channel}: skipped re-entrant handler"),
            }
        }
    }

    /// Set the filter keys of a group.
    pub fn set_filter<I, K>(&self, group: &str, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.publish(group, Channel::Filter, Some(keys.into_iter().map(Into::into).collect()));
    }

    /// Clear the filter of a group.
    pub fn clear_filter(&self, group: &str) {
        self.publish(group, Channel::Filter, None);
    }

    /// Set the selection keys of a group.
    pub fn set_selection<I, K>(&self, group: &str, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.publish(group, Channel::Selection, Some(keys.into_iter().map(Into::into).collect()));
    }

    /// Clear the selection of a group.
    pub fn clear_selection(&self, group: &str) {
        self.publish(group, Channel::Selection, None);
    }

    /// Number of live subscriptions in a group.
    #[must_use]
    pub fn subscriber_count(&self, group: &str) -> usize {
        self.registry
            .borrow()
            .entries
            .iter()
            .filter(|e| e.group == group)
            .count()
    }
}

impl Bus for LocalBus {
    fn subscribe(&self, group: &str, channel: Channel, handler: ChangeHandler) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push(Entry {
                id,
                group: group.to_string(),
                channel,
                handler: Rc::new(RefCell::new(handler)),
            });
            id
        };

        let registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().entries.retain(|e| e.id != id);
            }
        })
    }

    fn current(&self, group: &str, channel: Channel) -> Option<Vec<Key>> {
        self.registry
            .borrow()
            .state
            .get(&(group.to_string(), channel))
            .cloned()
    }
}

impl fmt::Debug for LocalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("LocalBus")
            .field("subscriptions", &registry.entries.len())
            .field("active_channels", &registry.state.len())
            .finish()
    }
}
