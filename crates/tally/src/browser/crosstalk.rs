//! Bridge from the host page's `crosstalk` object to [`Bus`].
//!
//! Each subscription owns one `crosstalk.FilterHandle` or
//! `crosstalk.SelectionHandle` joined to the group. Change events carry the
//! active keys in `e.value`; `null` means the channel was cleared.

use js_sys::{Array, Function, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use tally_core::{Bus, ChangeHandler, Channel, Key, Subscription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CHANGE: &str = "change";

fn handle_class(channel: Channel) -> &'static str {
    match channel {
        Channel::Filter => "FilterHandle",
        Channel::Selection => "SelectionHandle",
    }
}

fn get(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
}

fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    get(target, name)?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("'{name}' is not a function")))
}

fn decode_keys(value: &JsValue) -> Option<Vec<Key>> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    match serde_wasm_bindgen::from_value::<Vec<Key>>(value.clone()) {
        Ok(keys) => Some(keys),
        Err(e) => {
            log::error!("crosstalk: unreadable key list: {e}");
            None
        }
    }
}

/// [`Bus`] backed by the global `crosstalk` object.
#[derive(Debug, Clone)]
pub struct CrosstalkBus {
    crosstalk: JsValue,
}

impl CrosstalkBus {
    /// Bind to `globalThis.crosstalk`.
    pub fn from_global() -> Result<Self, JsValue> {
        let crosstalk = get(&js_sys::global(), "crosstalk")?;
        if crosstalk.is_undefined() || crosstalk.is_null() {
            return Err(JsValue::from_str("crosstalk is not loaded on this page"));
        }
        Ok(Self { crosstalk })
    }

    /// Create a handle of the right class and join it to `group`.
    fn open_handle(&self, group: &str, channel: Channel) -> Result<JsValue, JsValue> {
        let class = method(&self.crosstalk, handle_class(channel))?;
        let handle = Reflect::construct(&class, &Array::new())?;
        method(&handle, "setGroup")?.call1(&handle, &JsValue::from_str(group))?;
        Ok(handle)
    }

    fn close_handle(handle: &JsValue) {
        if let Err(e) = method(handle, "close").and_then(|close| close.call0(handle)) {
            log::warn!("crosstalk: failed to close handle: {e:?}");
        }
    }

    fn try_subscribe(
        &self,
        group: &str,
        channel: Channel,
        handler: ChangeHandler,
    ) -> Result<Subscription, JsValue> {
        let handle = self.open_handle(group, channel)?;

        let handler = Rc::new(RefCell::new(handler));
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let keys = get(&event, "value").ok().and_then(|v| decode_keys(&v));
            match handler.try_borrow_mut() {
                Ok(mut handler) => handler(keys.as_deref()),
                Err(_) => log::warn!("crosstalk: skipped re-entrant {channel} event"),
            }
        });

        let token = method(&handle, "on")?.call2(
            &handle,
            &JsValue::from_str(CHANGE),
            callback.as_ref().unchecked_ref(),
        )?;

        log::debug!("crosstalk: subscribed to {channel} of '{group}'");
        Ok(Subscription::new(move || {
            if let Err(e) =
                method(&handle, "off").and_then(|off| off.call2(&handle, &JsValue::from_str(CHANGE), &token))
            {
                log::warn!("crosstalk: failed to unsubscribe: {e:?}");
            }
            Self::close_handle(&handle);
            drop(callback);
        }))
    }

    fn try_current(&self, group: &str, channel: Channel) -> Result<Option<Vec<Key>>, JsValue> {
        let handle = self.open_handle(group, channel)?;
        let property = match channel {
            Channel::Filter => "filteredKeys",
            Channel::Selection => "value",
        };
        let keys = get(&handle, property).map(|v| decode_keys(&v));
        Self::close_handle(&handle);
        keys
    }
}

impl Bus for CrosstalkBus {
    fn subscribe(&self, group: &str, channel: Channel, handler: ChangeHandler) -> Subscription {
        self.try_subscribe(group, channel, handler)
            .unwrap_or_else(|e| {
                log::error!("crosstalk: cannot subscribe to {channel} of '{group}': {e:?}");
                Subscription::detached()
            })
    }

    fn current(&self, group: &str, channel: Channel) -> Option<Vec<Key>> {
        self.try_current(group, channel).unwrap_or_else(|e| {
            log::warn!("crosstalk: cannot read {channel} of '{group}': {e:?}");
            None
        })
    }
}
