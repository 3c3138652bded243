#![forbid(unsafe_code)]

//! The lightbox: slide cache, navigation, swipe recognizer and modal
//! lifecycle wired to one host.
//!
//! The host implements [`GalleryPage`] (thumbnails, captions, slide
//! visuals) and [`ModalChrome`] (dialog, scroll lock, pointer capture). It
//! pushes normalized input through the `handle_*` methods and reports decode
//! completions through [`Lightbox::complete_decode`]. Every call runs to
//! completion synchronously; nothing here blocks or spawns.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::LightboxConfig;
use crate::descriptor::{Caption, PhotoDescriptor};
use crate::error::Result;
use crate::gesture::{GestureAction, GesturePhase, SwipeRecognizer};
use crate::input::{ClickInput, KeyInput, LightboxInput, PointerInput};
use crate::modal::{ModalChrome, ModalCommand, ModalLifecycle, is_outside_card};
use crate::navigation::{Direction, GalleryPage, NavigationController};
use crate::slide_cache::{CacheStats, DecodeLedger, DecodeOutcome, DecodeTicket, SlideCache};

/// Everything a host must provide.
pub trait LightboxHost: GalleryPage + ModalChrome {}

impl<T: GalleryPage + ModalChrome> LightboxHost for T {}

/// Result of routing a click through the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not ours; let it reach the page.
    Ignored,
    /// Synthetic click after a touch dismissal; cancel it.
    Suppressed,
    /// Click on the backdrop closed the modal; cancel it.
    Dismissed,
}

impl ClickOutcome {
    #[must_use]
    pub const fn cancels_event(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Diagnostic snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightboxStats {
    pub open: bool,
    pub current_index: Option<usize>,
    pub cache: CacheStats,
    pub decoded_indices: usize,
}

/// Photo lightbox bound to host `H`.
pub struct Lightbox<H: LightboxHost> {
    config: LightboxConfig,
    host: H,
    cache: SlideCache<H::Handle>,
    navigator: NavigationController,
    gesture: SwipeRecognizer,
    modal: ModalLifecycle,
}

impl<H: LightboxHost> Lightbox<H> {
    /// Create a lightbox with a fresh decode ledger.
    pub fn new(config: LightboxConfig, host: H) -> Result<Self> {
        Self::with_ledger(config, host, DecodeLedger::new())
    }

    /// Create a lightbox sharing an existing decode ledger.
    pub fn with_ledger(config: LightboxConfig, host: H, ledger: DecodeLedger) -> Result<Self> {
        config.validate()?;
        info!(capacity = config.cache_capacity, "lightbox ready");
        Ok(Self {
            cache: SlideCache::new(config.cache_capacity, ledger),
            gesture: SwipeRecognizer::new(config.gesture.clone()),
            modal: ModalLifecycle::new(config.click_guard_ms),
            navigator: NavigationController::new(),
            config,
            host,
        })
    }

    #[must_use]
    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn cache(&self) -> &SlideCache<H::Handle> {
        &self.cache
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.navigator.current()
    }

    #[must_use]
    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    #[must_use]
    pub fn stats(&self) -> LightboxStats {
        LightboxStats {
            open: self.is_open(),
            current_index: self.navigator.current(),
            cache: self.cache.stats(),
            decoded_indices: self.cache.ledger().len(),
        }
    }

    /// Show `descriptor` and open the modal (locking page scroll), then warm
    /// its neighbors. Opening while already open just switches photos.
    pub fn open(&mut self, descriptor: &PhotoDescriptor) {
        debug!(index = descriptor.index, "open");
        self.navigator.present(descriptor, &mut self.cache, &mut self.host);
        self.modal.open(&mut self.host);
        self.navigator.preload_neighbors(descriptor.index, &mut self.cache, &mut self.host);
    }

    /// Open the modal without a photo (diagnostics).
    pub fn open_empty(&mut self) {
        self.abort_gesture();
        self.navigator.reset();
        self.cache.deactivate_all(&mut self.host);
        self.host.show_caption(&Caption::default());
        self.modal.open(&mut self.host);
    }

    /// Close the modal and release the page scroll.
    pub fn close(&mut self) -> bool {
        self.abort_gesture();
        self.modal.close(&mut self.host)
    }

    /// Jump to `index` while open. Missing thumbnails are a silent no-op.
    pub fn navigate_to(&mut self, index: usize) -> bool {
        if !self.is_open() {
            return false;
        }
        self.navigator.navigate_to(index, &mut self.cache, &mut self.host)
    }

    /// Move one photo left or right while open.
    pub fn step(&mut self, direction: Direction) -> bool {
        if !self.is_open() {
            return false;
        }
        self.navigator.step(direction, &mut self.cache, &mut self.host)
    }

    /// Feed a pointer event. Returns `true` when the host must suppress the
    /// event's default action (the page scroll during a swipe).
    pub fn handle_pointer(&mut self, event: &PointerInput) -> bool {
        if !self.is_open() {
            return false;
        }
        let action = self.gesture.handle(event);
        match action {
            GestureAction::Ignore | GestureAction::Pending => {}
            GestureAction::Begin { pointer_id } => {
                self.host.capture_pointer(pointer_id);
                self.cache.set_active_offset(0.0, &mut self.host);
            }
            GestureAction::Drag { dx } => {
                self.cache.set_active_offset(dx, &mut self.host);
            }
            GestureAction::Commit {
                pointer_id,
                direction,
            } => {
                self.release(pointer_id);
                self.navigator.step(direction, &mut self.cache, &mut self.host);
            }
            GestureAction::SnapBack { pointer_id } | GestureAction::Cancel { pointer_id } => {
                self.release(pointer_id);
            }
            GestureAction::Tap { pointer_id, x, y } => {
                self.release(pointer_id);
                if is_outside_card(self.host.card_rect(), x, y) {
                    debug!(x, y, "tap on backdrop");
                    self.modal.close_from_pointer(&mut self.host, event.time_ms);
                }
            }
        }
        action.claims_event()
    }

    /// Feed a key press. Returns `true` when the key was consumed and its
    /// default action must be suppressed.
    pub fn handle_key(&mut self, key: &KeyInput) -> bool {
        if !self.is_open() {
            return false;
        }
        match ModalCommand::from_key(key) {
            Some(ModalCommand::Close) => {
                self.close();
                true
            }
            Some(ModalCommand::Navigate(direction)) => {
                self.navigator.step(direction, &mut self.cache, &mut self.host);
                true
            }
            None => false,
        }
    }

    /// Route a click (capture phase, before the page sees it).
    pub fn handle_click(&mut self, click: &ClickInput) -> ClickOutcome {
        if self.modal.intercept_click(click.time_ms) {
            debug!("synthetic click suppressed");
            return ClickOutcome::Suppressed;
        }
        if self.is_open() && is_outside_card(self.host.card_rect(), click.x, click.y) {
            self.close();
            return ClickOutcome::Dismissed;
        }
        ClickOutcome::Ignored
    }

    /// Route a click without a pointer position (keyboard activation). A
    /// tap's synthetic click never looks like this, so it is never
    /// suppressed, but it still spends a pending click guard.
    pub fn handle_unpositioned_click(&mut self) -> ClickOutcome {
        if self.modal.disarm_click_guard() {
            debug!("click guard spent by keyboard activation");
        }
        ClickOutcome::Ignored
    }

    /// Replay entry point for recorded inputs. Returns whether the event's
    /// default action is suppressed.
    pub fn handle_input(&mut self, input: &LightboxInput) -> bool {
        match input {
            LightboxInput::Pointer(pointer) => self.handle_pointer(pointer),
            LightboxInput::Key(key) => self.handle_key(key),
            LightboxInput::Click(click) => self.handle_click(click).cancels_event(),
        }
    }

    /// Deliver a decode completion from the host.
    pub fn complete_decode(&mut self, ticket: DecodeTicket) -> DecodeOutcome {
        self.cache.complete_decode(ticket, &mut self.host)
    }

    /// Close and drop every slide (host unmount).
    pub fn teardown(&mut self) {
        self.close();
        self.cache.clear(&mut self.host);
        self.navigator.reset();
    }

    /// Release the pointer and reset the drag translation.
    fn release(&mut self, pointer_id: i32) {
        self.cache.set_active_offset(0.0, &mut self.host);
        self.host.release_pointer(pointer_id);
    }

    fn abort_gesture(&mut self) {
        if let Some(pointer_id) = self.gesture.tracked_pointer() {
            self.gesture.reset();
            self.release(pointer_id);
        }
    }
}

impl<H> core::fmt::Debug for Lightbox<H>
where
    H: LightboxHost,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lightbox")
            .field("open", &self.is_open())
            .field("current", &self.navigator.current())
            .field("slides", &self.cache.len())
            .field("gesture", &self.gesture.phase())
            .finish()
    }
}
