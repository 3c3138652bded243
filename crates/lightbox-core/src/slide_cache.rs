#![forbid(unsafe_code)]

//! LRU-bounded slide cache with page-lifetime decode memory.
//!
//! Each photo index the viewer has visited (or prefetched) owns one
//! [`Slide`]: an opaque host handle (placeholder layer plus full image) and
//! its decode/visual state. The cache keeps at most `capacity` slides and
//! evicts the least recently touched one, never the active slide.
//!
//! # Decode protocol
//!
//! Creating a slide issues a [`SlideSurface::request_decode`] call carrying a
//! [`DecodeTicket`]. The host answers later through
//! [`SlideCache::complete_decode`]:
//!
//! - [`DecodeMode::Remembered`]: the index was decoded earlier in this page
//!   lifetime. The host defers one rendering frame, then completes, so the
//!   reveal transition is still observable.
//! - [`DecodeMode::Fresh`]: the host awaits the image decode, falls back to
//!   the load event on failure, then completes.
//!
//! Completion records the index in the shared [`DecodeLedger`] and reveals
//! the slide once. Tickets for slides that were evicted in the meantime are
//! tolerated: they still record the index, but touch no slide.
//!
//! # Invariants
//!
//! 1. `len() <= capacity()` after every call.
//! 2. The active slide is never evicted.
//! 3. At most one slide is [`VisualState::Active`].
//! 4. A slide is revealed at most once; an index enters the ledger at most
//!    once per page lifetime.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use lru::LruCache;
use tracing::{debug, trace};

use crate::config::MIN_CACHE_CAPACITY;
use crate::descriptor::PhotoDescriptor;

// ---------------------------------------------------------------------------
// DecodeLedger
// ---------------------------------------------------------------------------

/// Page-lifetime record of photo indices whose full image has been decoded.
///
/// Cloning shares the record. A full page reload is modelled by creating a
/// new ledger.
#[derive(Debug, Clone, Default)]
pub struct DecodeLedger {
    decoded: Rc<RefCell<HashSet<usize>>>,
}

impl DecodeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.decoded.borrow().contains(&index)
    }

    /// Record `index` as decoded. Returns `true` only the first time.
    pub fn mark(&self, index: usize) -> bool {
        self.decoded.borrow_mut().insert(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decoded.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoded.borrow().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Slide
// ---------------------------------------------------------------------------

/// Identity of one slide instance. A slide recreated after eviction gets a
/// new id, which lets stale decode tickets be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlideId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeState {
    Pending,
    Decoded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    Inactive,
    Active,
}

/// How the host should confirm a slide's full image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeMode {
    /// Decoded earlier this page lifetime; complete after one frame.
    Remembered,
    /// Await the image decode (load event on failure).
    Fresh,
}

/// Token handed to the host with a decode request and returned on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeTicket {
    pub index: usize,
    pub slide: SlideId,
}

/// What a decode completion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The slide crossfaded from placeholder to full image.
    Revealed,
    /// The slide had already been revealed; nothing happened.
    AlreadyDecoded,
    /// The slide was evicted (or replaced) before the decode finished.
    Stale,
}

/// One cached photo view.
#[derive(Debug)]
pub struct Slide<H> {
    index: usize,
    id: SlideId,
    descriptor: PhotoDescriptor,
    decode: DecodeState,
    visual: VisualState,
    offset_x: f64,
    handle: H,
}

impl<H> Slide<H> {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn id(&self) -> SlideId {
        self.id
    }

    #[must_use]
    pub fn descriptor(&self) -> &PhotoDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn decode_state(&self) -> DecodeState {
        self.decode
    }

    #[must_use]
    pub fn visual_state(&self) -> VisualState {
        self.visual
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.visual == VisualState::Active
    }

    /// Current drag translation in CSS pixels.
    #[must_use]
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

// ---------------------------------------------------------------------------
// SlideSurface
// ---------------------------------------------------------------------------

/// Rendering surface that materializes slides.
///
/// The cache owns every handle the surface creates and hands it back exactly
/// once through [`remove_slide`](SlideSurface::remove_slide).
pub trait SlideSurface {
    type Handle;

    /// Build the visual for `descriptor`. `show_placeholder` is false when
    /// the full image was already shown once at this index.
    fn create_slide(&mut self, descriptor: &PhotoDescriptor, show_placeholder: bool)
    -> Self::Handle;

    /// Tear the visual down.
    fn remove_slide(&mut self, handle: Self::Handle);

    fn set_slide_active(&mut self, handle: &Self::Handle, active: bool);

    /// Apply a horizontal drag translation (`0.0` clears it).
    fn set_slide_offset(&mut self, handle: &Self::Handle, dx: f64);

    /// Start confirming the full image; answer with
    /// [`SlideCache::complete_decode`].
    fn request_decode(&mut self, handle: &Self::Handle, ticket: DecodeTicket, mode: DecodeMode);

    /// Run the placeholder → full image transition.
    fn reveal_slide(&mut self, handle: &Self::Handle);
}

// ---------------------------------------------------------------------------
// SlideCache
// ---------------------------------------------------------------------------

/// Statistics about cache behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Current number of live slides.
    pub size: usize,
    pub capacity: usize,
}

/// LRU map from photo index to [`Slide`].
#[derive(Debug)]
pub struct SlideCache<H> {
    slides: LruCache<usize, Slide<H>>,
    capacity: usize,
    active: Option<usize>,
    ledger: DecodeLedger,
    next_id: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<H> SlideCache<H> {
    /// Create a cache holding at most `capacity` slides.
    ///
    /// Capacities below 2 are raised to 2: the active slide plus the
    /// incoming one must always fit.
    #[must_use]
    pub fn new(capacity: usize, ledger: DecodeLedger) -> Self {
        Self {
            slides: LruCache::unbounded(),
            capacity: capacity.max(MIN_CACHE_CAPACITY),
            active: None,
            ledger,
            next_id: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Check for a slide without touching LRU order.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.slides.contains(&index)
    }

    /// Look at a slide without touching LRU order.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&Slide<H>> {
        self.slides.peek(&index)
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn active_slide(&self) -> Option<&Slide<H>> {
        self.active.and_then(|index| self.slides.peek(&index))
    }

    /// Cached indices from most to least recently used.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slides.iter().map(|(index, _)| *index)
    }

    #[must_use]
    pub fn ledger(&self) -> &DecodeLedger {
        &self.ledger
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.slides.len(),
            capacity: self.capacity,
        }
    }

    /// Return the slide for `descriptor.index`, creating it on a miss.
    ///
    /// A hit marks the slide most recently used. A miss evicts at most one
    /// slide when the cache is full, then builds the slide through `surface`
    /// and requests its decode. Never blocks: decode completion arrives
    /// later through [`complete_decode`](Self::complete_decode).
    pub fn ensure_slide<S>(&mut self, descriptor: &PhotoDescriptor, surface: &mut S) -> &Slide<H>
    where
        S: SlideSurface<Handle = H>,
    {
        let index = descriptor.index;
        if self.slides.contains(&index) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.slides.len() >= self.capacity {
                self.evict_one(surface);
            }
        }

        let ledger = &self.ledger;
        let next_id = &mut self.next_id;
        self.slides
            .get_or_insert(index, || build_slide(descriptor, ledger, next_id, surface))
    }

    /// Make `index` the only active slide.
    ///
    /// Returns `false` (and changes nothing) when `index` is not cached.
    /// Deactivated slides lose any drag translation.
    pub fn activate<S>(&mut self, index: usize, surface: &mut S) -> bool
    where
        S: SlideSurface<Handle = H>,
    {
        if !self.slides.contains(&index) {
            return false;
        }
        for (slide_index, slide) in self.slides.iter_mut() {
            if *slide_index == index {
                if slide.visual != VisualState::Active {
                    slide.visual = VisualState::Active;
                    surface.set_slide_active(&slide.handle, true);
                }
                continue;
            }
            if slide.offset_x != 0.0 {
                slide.offset_x = 0.0;
                surface.set_slide_offset(&slide.handle, 0.0);
            }
            if slide.visual == VisualState::Active {
                slide.visual = VisualState::Inactive;
                surface.set_slide_active(&slide.handle, false);
            }
        }
        self.active = Some(index);
        true
    }

    /// Leave no slide active (diagnostic open without a photo).
    pub fn deactivate_all<S>(&mut self, surface: &mut S)
    where
        S: SlideSurface<Handle = H>,
    {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(slide) = self.slides.peek_mut(&active) {
            if slide.offset_x != 0.0 {
                slide.offset_x = 0.0;
                surface.set_slide_offset(&slide.handle, 0.0);
            }
            slide.visual = VisualState::Inactive;
            surface.set_slide_active(&slide.handle, false);
        }
    }

    /// Translate the active slide by `dx` (drag feedback). No-op without an
    /// active slide or when the offset is unchanged.
    pub fn set_active_offset<S>(&mut self, dx: f64, surface: &mut S)
    where
        S: SlideSurface<Handle = H>,
    {
        let Some(active) = self.active else {
            return;
        };
        if let Some(slide) = self.slides.peek_mut(&active) {
            if slide.offset_x != dx {
                slide.offset_x = dx;
                surface.set_slide_offset(&slide.handle, dx);
            }
        }
    }

    /// Deliver a decode completion from the host.
    pub fn complete_decode<S>(&mut self, ticket: DecodeTicket, surface: &mut S) -> DecodeOutcome
    where
        S: SlideSurface<Handle = H>,
    {
        if self.ledger.mark(ticket.index) {
            trace!(index = ticket.index, "index decoded for the first time");
        }
        match self.slides.peek_mut(&ticket.index) {
            Some(slide) if slide.id == ticket.slide => {
                if slide.decode == DecodeState::Decoded {
                    return DecodeOutcome::AlreadyDecoded;
                }
                slide.decode = DecodeState::Decoded;
                surface.reveal_slide(&slide.handle);
                trace!(index = ticket.index, slide = slide.id.0, "slide revealed");
                DecodeOutcome::Revealed
            }
            _ => {
                trace!(index = ticket.index, "decode finished for an evicted slide");
                DecodeOutcome::Stale
            }
        }
    }

    /// Remove every slide (host teardown). The ledger is kept.
    pub fn clear<S>(&mut self, surface: &mut S)
    where
        S: SlideSurface<Handle = H>,
    {
        while let Some((_, slide)) = self.slides.pop_lru() {
            surface.remove_slide(slide.handle);
        }
        self.active = None;
    }

    /// Remove the least recently used slide that is not active.
    fn evict_one<S>(&mut self, surface: &mut S) -> Option<usize>
    where
        S: SlideSurface<Handle = H>,
    {
        let active = self.active;
        let victim = self
            .slides
            .iter()
            .rev()
            .map(|(index, _)| *index)
            .find(|index| Some(*index) != active)?;
        let slide = self.slides.pop(&victim)?;
        self.evictions += 1;
        debug!(
            index = victim,
            live = self.slides.len(),
            capacity = self.capacity,
            "evicting slide"
        );
        surface.remove_slide(slide.handle);
        Some(victim)
    }
}

fn build_slide<S: SlideSurface>(
    descriptor: &PhotoDescriptor,
    ledger: &DecodeLedger,
    next_id: &mut u64,
    surface: &mut S,
) -> Slide<S::Handle> {
    let id = SlideId(*next_id);
    *next_id += 1;
    let remembered = ledger.contains(descriptor.index);
    let handle = surface.create_slide(descriptor, !remembered);
    let mode = if remembered {
        DecodeMode::Remembered
    } else {
        DecodeMode::Fresh
    };
    surface.request_decode(
        &handle,
        DecodeTicket {
            index: descriptor.index,
            slide: id,
        },
        mode,
    );
    trace!(index = descriptor.index, slide = id.0, ?mode, "slide created");
    Slide {
        index: descriptor.index,
        id,
        descriptor: descriptor.clone(),
        decode: DecodeState::Pending,
        visual: VisualState::Inactive,
        offset_x: 0.0,
        handle,
    }
}
