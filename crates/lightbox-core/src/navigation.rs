#![forbid(unsafe_code)]

//! Navigation controller: index lookups, caption updates, slide activation
//! and neighbor prefetch.
//!
//! The page is the source of truth for which photos exist. Moving to an
//! index resolves its thumbnail through [`GalleryPage::descriptor_at`]; a
//! missing thumbnail (gallery boundary) makes the move a silent no-op.
//! Prefetch warms `index - 1` and `index + 1` only.

use tracing::debug;

use crate::descriptor::{Caption, PhotoDescriptor};
use crate::slide_cache::{SlideCache, SlideSurface};

/// Horizontal navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Neighbor of `index` in this direction; `None` left of zero.
    #[must_use]
    pub fn step(self, index: usize) -> Option<usize> {
        match self {
            Self::Previous => index.checked_sub(1),
            Self::Next => index.checked_add(1),
        }
    }
}

/// The page the lightbox lives in: thumbnail lookup plus caption display,
/// on top of the slide surface.
pub trait GalleryPage: SlideSurface {
    /// Descriptor of the thumbnail carrying `index`, if one exists.
    fn descriptor_at(&self, index: usize) -> Option<PhotoDescriptor>;

    /// Replace the caption text shown under the photo.
    fn show_caption(&mut self, caption: &Caption);
}

/// Tracks the current index and drives the slide cache.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    current: Option<usize>,
}

impl NavigationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Forget the current index (modal closed).
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Show `descriptor`: set the current index, update the caption, ensure
    /// and activate its slide. Does not prefetch.
    pub fn present<P>(
        &mut self,
        descriptor: &PhotoDescriptor,
        cache: &mut SlideCache<P::Handle>,
        page: &mut P,
    ) where
        P: GalleryPage,
    {
        self.current = Some(descriptor.index);
        page.show_caption(&descriptor.caption);
        cache.ensure_slide(descriptor, page);
        cache.activate(descriptor.index, page);
    }

    /// Move to `next`. Returns `false` (leaving everything untouched) when
    /// no thumbnail carries that index.
    pub fn navigate_to<P>(&mut self, next: usize, cache: &mut SlideCache<P::Handle>, page: &mut P) -> bool
    where
        P: GalleryPage,
    {
        let Some(descriptor) = resolve(page, next) else {
            debug!(index = next, "no thumbnail at index; staying put");
            return false;
        };
        debug!(from = ?self.current, to = next, "navigating");
        self.present(&descriptor, cache, page);
        self.preload_neighbors(next, cache, page);
        true
    }

    /// Move one step from the current index.
    pub fn step<P>(&mut self, direction: Direction, cache: &mut SlideCache<P::Handle>, page: &mut P) -> bool
    where
        P: GalleryPage,
    {
        match self.current.and_then(|index| direction.step(index)) {
            Some(next) => self.navigate_to(next, cache, page),
            None => false,
        }
    }

    /// Warm the cache for `index - 1` and `index + 1` without activating.
    /// Already-cached neighbors are skipped (and keep their LRU position).
    /// Returns how many slides were created.
    pub fn preload_neighbors<P>(
        &self,
        index: usize,
        cache: &mut SlideCache<P::Handle>,
        page: &mut P,
    ) -> usize
    where
        P: GalleryPage,
    {
        let mut created = 0;
        for neighbor in [Direction::Previous, Direction::Next]
            .into_iter()
            .filter_map(|d| d.step(index))
        {
            if cache.contains(neighbor) {
                continue;
            }
            if let Some(descriptor) = resolve(page, neighbor) {
                cache.ensure_slide(&descriptor, page);
                created += 1;
            }
        }
        created
    }
}

/// Descriptor for `index`, rejecting a thumbnail that reports another index.
fn resolve<P: GalleryPage>(page: &P, index: usize) -> Option<PhotoDescriptor> {
    page.descriptor_at(index).filter(|d| d.index == index)
}
