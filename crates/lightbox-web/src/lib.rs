#![forbid(unsafe_code)]

//! WASM frontend for the photo lightbox.
//!
//! Binds `lightbox-core` to a page through `web-sys`:
//! - thumbnails are discovered by selector and read through their attributes,
//! - slides are `<div>`s appended to the modal's track,
//! - the modal host is a `<dialog>` shown with `showModal()`,
//! - every DOM listener is an owned subscription removed on unmount.
//!
//! The JS class is `PhotoModal`.

pub mod markup;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod subscription;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PhotoModal;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PhotoModal;

#[cfg(not(target_arch = "wasm32"))]
impl PhotoModal {
    pub fn new() -> Self {
        Self
    }

    /// Always closed: there is no DOM to open into.
    #[must_use]
    pub fn is_open(&self) -> bool {
        false
    }
}
