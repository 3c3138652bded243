#![forbid(unsafe_code)]

//! Lightbox core: a host-agnostic photo viewer engine.
//!
//! The engine owns the interesting state of a full-screen photo lightbox:
//! - [`descriptor`]: normalized per-photo metadata read from thumbnails,
//! - [`slide_cache`]: LRU-bounded slides with page-lifetime decode memory,
//! - [`navigation`]: neighbor lookup, activation and prefetch,
//! - [`gesture`]: touch/pen swipe recognition,
//! - [`modal`]: open/close lifecycle, scroll lock, synthetic-click guard,
//! - [`lightbox`]: all of the above wired to one host.
//!
//! Rendering and DOM access stay behind the [`SlideSurface`],
//! [`GalleryPage`] and [`ModalChrome`] traits; `lightbox-web` implements
//! them for the browser.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod input;
pub mod lightbox;
pub mod logging;
pub mod modal;
pub mod navigation;
pub mod slide_cache;

pub use config::{DomBindings, GestureConfig, LightboxConfig};
pub use descriptor::{AttributeSource, Caption, CaptionField, PhotoDescriptor, ResponsiveSet};
pub use error::LightboxError;
pub use geometry::Rect;
pub use input::{ClickInput, KeyCode, KeyInput, LightboxInput, Modifiers, PointerInput};
pub use lightbox::{ClickOutcome, Lightbox, LightboxHost, LightboxStats};
pub use modal::ModalChrome;
pub use navigation::{Direction, GalleryPage};
pub use slide_cache::{
    CacheStats, DecodeLedger, DecodeMode, DecodeOutcome, DecodeTicket, SlideCache, SlideSurface,
};
