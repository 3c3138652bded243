#![forbid(unsafe_code)]

//! Modal lifecycle, scroll lock and synthetic-click guard.
//!
//! The modal is either [`ModalState::Closed`] or [`ModalState::Open`]. The
//! page scroll is locked exactly while it is open.
//!
//! A touch that dismisses the modal is followed by a browser-synthesized
//! click at the same spot. With the modal already hidden, that click would
//! land on the page (often on another thumbnail) and reopen the viewer. A
//! pointer-driven close therefore arms a one-shot [`ClickGuard`]; the host's
//! capturing click listener consults it and cancels the next click inside
//! the guard window.

use tracing::debug;

use crate::geometry::Rect;
use crate::input::{KeyCode, KeyInput, Modifiers};
use crate::navigation::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalState {
    Closed,
    Open,
}

/// Dialog chrome the lifecycle drives.
pub trait ModalChrome {
    /// Show the dialog (and move focus into it).
    fn show_dialog(&mut self);
    /// Hide the dialog (and hand focus back to the page).
    fn hide_dialog(&mut self);
    fn lock_scroll(&mut self);
    fn unlock_scroll(&mut self);
    /// Bounding box of the visual content card, used for backdrop
    /// dismissal. `None` when it cannot be measured.
    fn card_rect(&self) -> Option<Rect>;
    fn capture_pointer(&mut self, pointer_id: i32);
    fn release_pointer(&mut self, pointer_id: i32);
}

/// Keyboard commands understood while the modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalCommand {
    Close,
    Navigate(Direction),
}

impl ModalCommand {
    /// Map a key press. Arrow keys with shortcut modifiers are left to the
    /// browser.
    #[must_use]
    pub fn from_key(key: &KeyInput) -> Option<Self> {
        match key.key {
            KeyCode::Escape => Some(Self::Close),
            KeyCode::ArrowLeft | KeyCode::ArrowRight
                if key.mods.intersects(Modifiers::SHORTCUT) =>
            {
                None
            }
            KeyCode::ArrowLeft => Some(Self::Navigate(Direction::Previous)),
            KeyCode::ArrowRight => Some(Self::Navigate(Direction::Next)),
            KeyCode::Other(_) => None,
        }
    }
}

/// One-shot click interceptor armed after a pointer-driven close.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickGuard {
    armed_at_ms: Option<f64>,
}

impl ClickGuard {
    pub fn arm(&mut self, now_ms: f64) {
        self.armed_at_ms = Some(now_ms);
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed_at_ms.is_some()
    }

    /// Consume the guard. Returns `true` when the click at `now_ms` must be
    /// cancelled. An expired guard disarms without cancelling.
    pub fn take(&mut self, now_ms: f64, window_ms: f64) -> bool {
        match self.armed_at_ms.take() {
            Some(armed) => now_ms - armed <= window_ms,
            None => false,
        }
    }
}

/// Open/closed state plus the click guard.
#[derive(Debug, Clone)]
pub struct ModalLifecycle {
    state: ModalState,
    guard: ClickGuard,
    guard_window_ms: f64,
}

impl ModalLifecycle {
    #[must_use]
    pub fn new(guard_window_ms: u64) -> Self {
        Self {
            state: ModalState::Closed,
            guard: ClickGuard::default(),
            guard_window_ms: guard_window_ms as f64,
        }
    }

    #[must_use]
    pub fn state(&self) -> ModalState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// Closed → Open. Returns `false` when already open.
    pub fn open(&mut self, chrome: &mut impl ModalChrome) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = ModalState::Open;
        chrome.lock_scroll();
        chrome.show_dialog();
        debug!("modal opened");
        true
    }

    /// Open → Closed. Returns `false` when already closed.
    pub fn close(&mut self, chrome: &mut impl ModalChrome) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ModalState::Closed;
        chrome.hide_dialog();
        chrome.unlock_scroll();
        debug!("modal closed");
        true
    }

    /// Close because a pointer was lifted on the backdrop; arms the click
    /// guard so the synthesized click that follows is swallowed.
    pub fn close_from_pointer(&mut self, chrome: &mut impl ModalChrome, now_ms: f64) -> bool {
        let closed = self.close(chrome);
        if closed {
            self.guard.arm(now_ms);
        }
        closed
    }

    /// Ask whether the click at `now_ms` must be cancelled (one-shot).
    pub fn intercept_click(&mut self, now_ms: f64) -> bool {
        self.guard.take(now_ms, self.guard_window_ms)
    }

    /// Drop a pending guard without swallowing anything. Returns whether
    /// one was armed.
    pub fn disarm_click_guard(&mut self) -> bool {
        self.guard.armed_at_ms.take().is_some()
    }

    #[must_use]
    pub fn click_guard_armed(&self) -> bool {
        self.guard.is_armed()
    }
}

/// Whether `(x, y)` falls outside the content card. Without a measurable
/// card nothing counts as outside, so the modal never closes by accident.
#[must_use]
pub fn is_outside_card(card: Option<Rect>, x: f64, y: f64) -> bool {
    card.is_some_and(|rect| !rect.is_empty() && !rect.contains(x, y))
}
