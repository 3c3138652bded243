#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use lightbox_core::input::{PointerKind, PointerPhase};
use lightbox_core::{
    ClickInput, DecodeLedger, Direction, KeyCode, KeyInput, Lightbox, LightboxConfig,
    LightboxError, Modifiers, PointerInput,
};
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, MouseEvent, PointerEvent};

use crate::dom::{self, DecodeRequest, DomHost};
use crate::markup;
use crate::subscription::{EventSubscription, ListenOptions};

fn js_error(err: &LightboxError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Engine plus host, shared with every listener.
#[derive(Clone)]
struct Session(Rc<RefCell<Lightbox<DomHost>>>);

impl Session {
    /// Run `f` against the engine, then start any decodes it queued.
    /// Re-entrant calls (a DOM call dispatching a synchronous event back
    /// into us) are dropped.
    fn run<R>(&self, f: impl FnOnce(&mut Lightbox<DomHost>) -> R) -> Option<R> {
        let (out, queued) = {
            let Ok(mut lightbox) = self.0.try_borrow_mut() else {
                trace!("re-entrant event ignored");
                return None;
            };
            let out = f(&mut lightbox);
            (out, lightbox.host_mut().take_decode_requests())
        };
        for request in queued {
            self.spawn_decode(request);
        }
        Some(out)
    }

    fn spawn_decode(&self, request: DecodeRequest) {
        let weak: Weak<_> = Rc::downgrade(&self.0);
        let Some(window) = web_sys::window() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            dom::confirm_decode(&window, &request.image, request.mode).await;
            // The lightbox may have been unmounted meanwhile.
            if let Some(inner) = weak.upgrade() {
                Session(inner).run(|lb| lb.complete_decode(request.ticket));
            }
        });
    }

    fn listen(
        &self,
        target: &EventTarget,
        event: &'static str,
        options: ListenOptions,
        handler: impl Fn(&Session, &Event) + 'static,
    ) -> Result<EventSubscription, JsValue> {
        let weak = Rc::downgrade(&self.0);
        EventSubscription::listen(target, event, options, move |ev: Event| {
            if let Some(inner) = weak.upgrade() {
                handler(&Session(inner), &ev);
            }
        })
    }
}

fn pointer_input(ev: &PointerEvent, phase: PointerPhase) -> PointerInput {
    PointerInput {
        phase,
        pointer_id: ev.pointer_id(),
        kind: PointerKind::from_dom(&ev.pointer_type()),
        x: f64::from(ev.client_x()),
        y: f64::from(ev.client_y()),
        time_ms: ev.time_stamp(),
    }
}

fn key_input(ev: &KeyboardEvent) -> KeyInput {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, ev.shift_key());
    mods.set(Modifiers::ALT, ev.alt_key());
    mods.set(Modifiers::CTRL, ev.ctrl_key());
    mods.set(Modifiers::SUPER, ev.meta_key());
    KeyInput {
        key: KeyCode::from_dom_key(&ev.key()),
        mods,
    }
}

fn cancel(ev: &Event) {
    ev.prevent_default();
    ev.stop_immediate_propagation();
}

/// Closest ancestor of the event target matching `selector`.
fn closest(ev: &Event, selector: &str) -> Option<Element> {
    ev.target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

/// Capture-phase click router: synthetic-click guard and backdrop dismissal
/// first, then close controls, then thumbnail delegation.
fn on_click(session: &Session, ev: &Event) {
    let Some(mouse) = ev.dyn_ref::<MouseEvent>() else {
        return;
    };
    let click = ClickInput {
        x: f64::from(mouse.client_x()),
        y: f64::from(mouse.client_y()),
        time_ms: ev.time_stamp(),
    };
    // Keyboard-activated clicks (detail 0) carry no meaningful position.
    let positioned = mouse.detail() != 0;
    session.run(|lb| {
        let outcome = if positioned {
            lb.handle_click(&click)
        } else {
            lb.handle_unpositioned_click()
        };
        if outcome.cancels_event() {
            cancel(ev);
            return;
        }
        let bindings = lb.config().dom.clone();
        if lb.is_open() {
            if closest(ev, &bindings.close_selector).is_some() {
                cancel(ev);
                lb.close();
            }
            return;
        }
        let Some(thumbnail) = closest(ev, &bindings.photo_selector) else {
            return;
        };
        match dom::descriptor_from_element(&thumbnail, &bindings) {
            Ok(descriptor) => {
                ev.prevent_default();
                lb.open(&descriptor);
            }
            Err(err) => debug!(%err, "thumbnail click without a usable descriptor"),
        }
    });
}

fn on_keydown(session: &Session, ev: &Event) {
    let Some(key) = ev.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    let input = key_input(key);
    if session.run(|lb| lb.handle_key(&input)) == Some(true) {
        ev.prevent_default();
    }
}

fn on_pointer(phase: PointerPhase) -> impl Fn(&Session, &Event) {
    move |session: &Session, ev: &Event| {
        let Some(pointer) = ev.dyn_ref::<PointerEvent>() else {
            return;
        };
        let input = pointer_input(pointer, phase);
        if session.run(|lb| lb.handle_pointer(&input)) == Some(true) {
            ev.prevent_default();
        }
    }
}

/// Photo lightbox bound to the page's `<dialog>`.
#[wasm_bindgen]
pub struct PhotoModal {
    config: LightboxConfig,
    ledger: DecodeLedger,
    session: Option<Session>,
    subscriptions: Vec<EventSubscription>,
    warned: bool,
}

#[wasm_bindgen]
impl PhotoModal {
    /// Create an unmounted lightbox. `options` is a plain object in the
    /// configuration shape; omitted fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<PhotoModal, JsValue> {
        let json = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                js_sys::JSON::stringify(&value)?.as_string()
            }
            _ => None,
        };
        let config = markup::parse_options(json.as_deref()).map_err(|err| js_error(&err))?;
        Ok(Self {
            config,
            ledger: DecodeLedger::new(),
            session: None,
            subscriptions: Vec::new(),
            warned: false,
        })
    }

    /// Resolve the modal host and subscribe every listener. A page without
    /// the modal host reports it once and keeps browsing without a viewer.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.session.is_some() {
            return Ok(());
        }
        match self.try_mount() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.subscriptions.clear();
                self.session = None;
                if !self.warned {
                    self.warned = true;
                    warn!(%err, "photo modal unavailable");
                    web_sys::console::warn_1(&JsValue::from_str(&format!(
                        "photo modal unavailable: {err}"
                    )));
                }
                Err(js_error(&err))
            }
        }
    }

    /// Remove every listener and slide. The decoded-image memory survives,
    /// so a later `mount()` still skips placeholders it no longer needs.
    pub fn unmount(&mut self) {
        self.subscriptions.clear();
        if let Some(session) = self.session.take() {
            session.run(Lightbox::teardown);
        }
    }

    /// Open the viewer on a thumbnail element.
    #[wasm_bindgen(js_name = openElement)]
    pub fn open_element(&mut self, element: Element) -> Result<(), JsValue> {
        let session = self.session()?;
        let descriptor = dom::descriptor_from_element(&element, &self.config.dom)
            .map_err(|err| js_error(&err))?;
        session.run(|lb| lb.open(&descriptor));
        Ok(())
    }

    /// Open the viewer without a photo (diagnostics).
    #[wasm_bindgen(js_name = openBlank)]
    pub fn open_blank(&mut self) -> Result<(), JsValue> {
        self.session()?.run(Lightbox::open_empty);
        Ok(())
    }

    pub fn close(&mut self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.run(Lightbox::close))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.0.try_borrow().ok().map(|lb| lb.is_open()))
            .unwrap_or(false)
    }

    pub fn next(&mut self) -> bool {
        self.step(Direction::Next)
    }

    pub fn previous(&mut self) -> bool {
        self.step(Direction::Previous)
    }

    /// Cache statistics as a JSON string.
    pub fn stats(&self) -> Result<String, JsValue> {
        let session = self.session()?;
        let stats = session
            .0
            .try_borrow()
            .map_err(|_| JsValue::from_str("lightbox busy"))?
            .stats();
        serde_json::to_string(&stats).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl PhotoModal {
    fn session(&self) -> Result<Session, JsValue> {
        self.session
            .clone()
            .ok_or_else(|| JsValue::from_str("photo modal is not mounted"))
    }

    fn step(&mut self, direction: Direction) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.run(|lb| lb.step(direction)))
            .unwrap_or(false)
    }

    fn try_mount(&mut self) -> Result<(), LightboxError> {
        let host = DomHost::resolve(self.config.dom.clone())?;
        let document: EventTarget = host.document().clone().into();
        let dialog: EventTarget = host.dialog().clone().into();
        let lightbox = Lightbox::with_ledger(self.config.clone(), host, self.ledger.clone())?;
        let session = Session(Rc::new(RefCell::new(lightbox)));

        let subscribe = |target: &EventTarget,
                         event: &'static str,
                         options: ListenOptions,
                         handler: Box<dyn Fn(&Session, &Event)>| {
            session
                .listen(target, event, options, handler)
                .map_err(|err| {
                    LightboxError::MissingElement(format!("listener `{event}`: {err:?}"))
                })
        };

        let mut subscriptions = vec![
            subscribe(&document, "click", ListenOptions::CAPTURE, Box::new(on_click))?,
            subscribe(&document, "keydown", ListenOptions::BUBBLE, Box::new(on_keydown))?,
            // Escape on a modal dialog fires `cancel` and closes it natively;
            // route it through the engine instead so scroll is unlocked too.
            subscribe(
                &dialog,
                "cancel",
                ListenOptions::BUBBLE,
                Box::new(|s: &Session, ev: &Event| {
                    ev.prevent_default();
                    s.run(Lightbox::close);
                }),
            )?,
        ];
        for (event, phase) in [
            ("pointerdown", PointerPhase::Down),
            ("pointermove", PointerPhase::Move),
            ("pointerup", PointerPhase::Up),
            ("pointercancel", PointerPhase::Cancel),
        ] {
            subscriptions.push(subscribe(
                &dialog,
                event,
                ListenOptions::BUBBLE,
                Box::new(on_pointer(phase)),
            )?);
        }

        debug!(listeners = subscriptions.len(), "photo modal mounted");
        self.subscriptions = subscriptions;
        self.session = Some(session);
        Ok(())
    }
}

impl Drop for PhotoModal {
    fn drop(&mut self) {
        self.unmount();
    }
}
