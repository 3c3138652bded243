#![forbid(unsafe_code)]

//! Pointer-driven swipe recognizer.
//!
//! Interprets touch/pen pointer sequences as horizontal swipe navigation,
//! vertical page scroll, or a tap. Mouse pointers are ignored: desktop users
//! navigate with the keyboard and dismiss with a click.
//!
//! # State Machine
//!
//! ```text
//!          down (touch/pen)            |dx| > lock && |dx| > |dy| * ratio
//!  Idle ─────────────────────▶ Tracking ──────────────────────────────▶ Swiping
//!   ▲                             │                                        │
//!   └──────── up / cancel ────────┴──────────── up / cancel ───────────────┘
//! ```
//!
//! While `Tracking` the gesture is not claimed, so the page may still scroll
//! vertically. Once `Swiping`, every move translates the active slide and
//! suppresses the default scroll.
//!
//! On release a swipe commits when the horizontal travel exceeds the
//! distance threshold or the release velocity exceeds the velocity threshold.
//! Positive travel (drag toward the right) goes to the previous photo.
//!
//! # Invariants
//!
//! 1. Exactly one pointer id is tracked; events for other ids are ignored.
//! 2. Every [`GestureAction::Begin`] is followed by exactly one releasing
//!    action ([`Commit`](GestureAction::Commit),
//!    [`SnapBack`](GestureAction::SnapBack), [`Tap`](GestureAction::Tap) or
//!    [`Cancel`](GestureAction::Cancel)) for the same pointer.
//! 3. Every releasing action tells the host to reset the drag translation.

use tracing::trace;

use crate::config::GestureConfig;
use crate::input::{PointerInput, PointerPhase};
use crate::navigation::Direction;

/// Recognizer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Idle,
    Tracking,
    Swiping,
}

/// What the host must do in response to one pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    /// Event not relevant to the recognizer.
    Ignore,
    /// A gesture started: capture the pointer and clear any residual drag
    /// translation on the active slide.
    Begin { pointer_id: i32 },
    /// Still deciding between swipe and scroll; leave the event alone.
    Pending,
    /// Swiping: translate the active slide by `dx` and suppress the default
    /// scroll.
    Drag { dx: f64 },
    /// Swipe committed: reset the translation, release the pointer and
    /// navigate.
    Commit {
        pointer_id: i32,
        direction: Direction,
    },
    /// Swipe too short and too slow: reset the translation and release.
    SnapBack { pointer_id: i32 },
    /// Pointer lifted without meaningful travel at `(x, y)`: release, then
    /// hit-test for backdrop dismissal.
    Tap { pointer_id: i32, x: f64, y: f64 },
    /// Pointer cancelled: reset the translation and release.
    Cancel { pointer_id: i32 },
}

impl GestureAction {
    /// Whether the host must call `preventDefault` on the DOM event.
    #[must_use]
    pub const fn claims_event(&self) -> bool {
        matches!(self, Self::Drag { .. } | Self::Commit { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Track {
    pointer_id: i32,
    start_x: f64,
    start_y: f64,
    start_ms: f64,
    swiping: bool,
}

/// Swipe recognizer state machine.
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    config: GestureConfig,
    track: Option<Track>,
}

impl SwipeRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            track: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self.track {
            None => GesturePhase::Idle,
            Some(Track { swiping: false, .. }) => GesturePhase::Tracking,
            Some(Track { swiping: true, .. }) => GesturePhase::Swiping,
        }
    }

    /// Pointer id currently tracked, if any.
    #[must_use]
    pub fn tracked_pointer(&self) -> Option<i32> {
        self.track.map(|t| t.pointer_id)
    }

    /// Drop any gesture in progress without producing an action. Used when
    /// the modal closes underneath a gesture.
    pub fn reset(&mut self) {
        self.track = None;
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: &PointerInput) -> GestureAction {
        match event.phase {
            PointerPhase::Down => self.on_down(event),
            PointerPhase::Move => self.on_move(event),
            PointerPhase::Up => self.on_up(event),
            PointerPhase::Cancel => self.on_cancel(event),
        }
    }

    fn on_down(&mut self, event: &PointerInput) -> GestureAction {
        if !event.kind.drives_swipe() || self.track.is_some() {
            return GestureAction::Ignore;
        }
        self.track = Some(Track {
            pointer_id: event.pointer_id,
            start_x: event.x,
            start_y: event.y,
            start_ms: event.time_ms,
            swiping: false,
        });
        trace!(pointer_id = event.pointer_id, "gesture tracking");
        GestureAction::Begin {
            pointer_id: event.pointer_id,
        }
    }

    fn on_move(&mut self, event: &PointerInput) -> GestureAction {
        let (lock_distance, lock_ratio) = (self.config.lock_distance_px, self.config.lock_ratio);
        let Some(track) = self.tracked_mut(event.pointer_id) else {
            return GestureAction::Ignore;
        };
        let dx = event.x - track.start_x;
        let dy = event.y - track.start_y;
        if !track.swiping {
            let locked = dx.abs() > lock_distance && dx.abs() > dy.abs() * lock_ratio;
            if !locked {
                return GestureAction::Pending;
            }
            track.swiping = true;
            trace!(pointer_id = event.pointer_id, dx, dy, "gesture locked to swipe");
        }
        GestureAction::Drag { dx }
    }

    fn on_up(&mut self, event: &PointerInput) -> GestureAction {
        if self.tracked_pointer() != Some(event.pointer_id) {
            return GestureAction::Ignore;
        }
        let Some(track) = self.track.take() else {
            return GestureAction::Ignore;
        };
        let pointer_id = track.pointer_id;
        let dx = event.x - track.start_x;
        let dy = event.y - track.start_y;
        let elapsed_ms = (event.time_ms - track.start_ms).max(1.0);
        let velocity = dx.abs() / elapsed_ms;

        if !track.swiping {
            let still = dx.abs() <= self.config.lock_distance_px
                && dy.abs() <= self.config.lock_distance_px;
            return if still {
                GestureAction::Tap {
                    pointer_id,
                    x: event.x,
                    y: event.y,
                }
            } else {
                GestureAction::SnapBack { pointer_id }
            };
        }

        let far = dx.abs() > self.config.commit_distance_px;
        let fast = velocity > self.config.commit_velocity_px_per_ms;
        if !(far || fast) || dx == 0.0 {
            trace!(dx, velocity, "swipe below thresholds");
            return GestureAction::SnapBack { pointer_id };
        }
        let direction = if dx > 0.0 {
            Direction::Previous
        } else {
            Direction::Next
        };
        trace!(dx, velocity, ?direction, "swipe committed");
        GestureAction::Commit {
            pointer_id,
            direction,
        }
    }

    fn on_cancel(&mut self, event: &PointerInput) -> GestureAction {
        if self.tracked_pointer() != Some(event.pointer_id) {
            return GestureAction::Ignore;
        }
        self.track = None;
        GestureAction::Cancel {
            pointer_id: event.pointer_id,
        }
    }

    fn tracked_mut(&mut self, pointer_id: i32) -> Option<&mut Track> {
        self.track.as_mut().filter(|t| t.pointer_id == pointer_id)
    }
}

impl Default for SwipeRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerKind;

    fn touch(phase: PointerPhase, x: f64, y: f64, t: f64) -> PointerInput {
        PointerInput::touch(phase, x, y, t)
    }

    /// Horizontal drag from x=200 by `dx` over `ms`, in four moves.
    fn drag(rec: &mut SwipeRecognizer, dx: f64, ms: f64) -> GestureAction {
        rec.handle(&touch(PointerPhase::Down, 200.0, 300.0, 0.0));
        for step in 1..=4 {
            let f = f64::from(step) / 4.0;
            rec.handle(&touch(PointerPhase::Move, 200.0 + dx * f, 300.0, ms * f));
        }
        rec.handle(&touch(PointerPhase::Up, 200.0 + dx, 300.0, ms))
    }

    #[test]
    fn slow_forty_pixel_drag_snaps_back() {
        let mut rec = SwipeRecognizer::default();
        assert_eq!(
            drag(&mut rec, -40.0, 400.0),
            GestureAction::SnapBack { pointer_id: 1 }
        );
        assert_eq!(rec.phase(), GesturePhase::Idle);
    }

    #[test]
    fn sixty_pixel_drag_commits() {
        let mut rec = SwipeRecognizer::default();
        assert_eq!(
            drag(&mut rec, -60.0, 600.0),
            GestureAction::Commit {
                pointer_id: 1,
                direction: Direction::Next
            }
        );
    }

    #[test]
    fn fast_short_flick_commits() {
        let mut rec = SwipeRecognizer::default();
        assert_eq!(
            drag(&mut rec, 20.0, 20.0),
            GestureAction::Commit {
                pointer_id: 1,
                direction: Direction::Previous
            }
        );
    }

    #[test]
    fn vertical_motion_never_locks() {
        let mut rec = SwipeRecognizer::default();
        rec.handle(&touch(PointerPhase::Down, 100.0, 100.0, 0.0));
        let action = rec.handle(&touch(PointerPhase::Move, 130.0, 200.0, 50.0));
        assert_eq!(action, GestureAction::Pending);
        assert!(!action.claims_event());
        assert_eq!(rec.phase(), GesturePhase::Tracking);
        assert_eq!(
            rec.handle(&touch(PointerPhase::Up, 130.0, 260.0, 80.0)),
            GestureAction::SnapBack { pointer_id: 1 }
        );
    }

    #[test]
    fn lock_requires_both_distance_and_ratio() {
        let mut rec = SwipeRecognizer::default();
        rec.handle(&touch(PointerPhase::Down, 0.0, 0.0, 0.0));
        // 9px: under the distance threshold.
        assert_eq!(
            rec.handle(&touch(PointerPhase::Move, 9.0, 0.0, 10.0)),
            GestureAction::Pending
        );
        // 14px vs 10px vertical: ratio 1.4 not exceeded.
        assert_eq!(
            rec.handle(&touch(PointerPhase::Move, 14.0, 10.0, 20.0)),
            GestureAction::Pending
        );
        let action = rec.handle(&touch(PointerPhase::Move, 15.0, 10.0, 30.0));
        assert_eq!(action, GestureAction::Drag { dx: 15.0 });
        assert!(action.claims_event());
        assert_eq!(rec.phase(), GesturePhase::Swiping);
    }

    #[test]
    fn lock_thresholds_come_from_config() {
        let mut rec = SwipeRecognizer::new(GestureConfig {
            lock_distance_px: 30.0,
            lock_ratio: 2.0,
            ..GestureConfig::default()
        });
        rec.handle(&touch(PointerPhase::Down, 0.0, 0.0, 0.0));
        assert_eq!(
            rec.handle(&touch(PointerPhase::Move, 20.0, 0.0, 10.0)),
            GestureAction::Pending
        );
        // Passes the default 1.4 ratio but not 2.0.
        assert_eq!(
            rec.handle(&touch(PointerPhase::Move, 35.0, 20.0, 20.0)),
            GestureAction::Pending
        );
        assert_eq!(
            rec.handle(&touch(PointerPhase::Move, 35.0, 10.0, 30.0)),
            GestureAction::Drag { dx: 35.0 }
        );
    }

    #[test]
    fn mouse_pointers_are_ignored() {
        let mut rec = SwipeRecognizer::default();
        let mut down = touch(PointerPhase::Down, 0.0, 0.0, 0.0);
        down.kind = PointerKind::Mouse;
        assert_eq!(rec.handle(&down), GestureAction::Ignore);
        assert_eq!(rec.phase(), GesturePhase::Idle);
    }

    #[test]
    fn second_pointer_is_ignored_until_release() {
        let mut rec = SwipeRecognizer::default();
        rec.handle(&touch(PointerPhase::Down, 0.0, 0.0, 0.0));
        let mut other = touch(PointerPhase::Down, 50.0, 50.0, 5.0);
        other.pointer_id = 2;
        assert_eq!(rec.handle(&other), GestureAction::Ignore);
        other.phase = PointerPhase::Move;
        other.x = 300.0;
        assert_eq!(rec.handle(&other), GestureAction::Ignore);
        other.phase = PointerPhase::Up;
        assert_eq!(rec.handle(&other), GestureAction::Ignore);
        assert_eq!(rec.tracked_pointer(), Some(1));
    }

    #[test]
    fn cancel_releases_and_returns_to_idle() {
        let mut rec = SwipeRecognizer::default();
        rec.handle(&touch(PointerPhase::Down, 0.0, 0.0, 0.0));
        rec.handle(&touch(PointerPhase::Move, -80.0, 0.0, 40.0));
        assert_eq!(
            rec.handle(&touch(PointerPhase::Cancel, -80.0, 0.0, 50.0)),
            GestureAction::Cancel { pointer_id: 1 }
        );
        assert_eq!(rec.phase(), GesturePhase::Idle);
        // An up after cancel belongs to no gesture.
        assert_eq!(
            rec.handle(&touch(PointerPhase::Up, -80.0, 0.0, 60.0)),
            GestureAction::Ignore
        );
    }

    #[test]
    fn still_release_is_a_tap() {
        let mut rec = SwipeRecognizer::default();
        rec.handle(&touch(PointerPhase::Down, 5.0, 5.0, 0.0));
        assert_eq!(
            rec.handle(&touch(PointerPhase::Up, 7.0, 6.0, 120.0)),
            GestureAction::Tap {
                pointer_id: 1,
                x: 7.0,
                y: 6.0
            }
        );
    }
}
