#![forbid(unsafe_code)]

//! Owned DOM event listeners.
//!
//! An [`EventSubscription`] keeps its closure alive and removes the listener
//! when dropped, so unmounting is just dropping the list.

use tracing::trace;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// How a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenOptions {
    pub capture: bool,
    /// Passive listeners cannot cancel the default action.
    pub passive: bool,
}

impl ListenOptions {
    pub(crate) const BUBBLE: Self = Self {
        capture: false,
        passive: false,
    };

    pub(crate) const CAPTURE: Self = Self {
        capture: true,
        passive: false,
    };
}

/// A registered listener.
pub(crate) struct EventSubscription {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventSubscription {
    /// Register `handler` for `event` on `target`.
    pub(crate) fn listen(
        target: &EventTarget,
        event: &'static str,
        options: ListenOptions,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let opts = AddEventListenerOptions::new();
        opts.set_capture(options.capture);
        opts.set_passive(options.passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &opts,
        )?;
        trace!(event, capture = options.capture, "listener subscribed");
        Ok(Self {
            target: target.clone(),
            event,
            capture: options.capture,
            callback,
        })
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
        trace!(event = self.event, "listener unsubscribed");
    }
}
