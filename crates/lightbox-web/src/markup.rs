#![forbid(unsafe_code)]

//! DOM-facing strings and attribute plans.
//!
//! Everything here is plain data so it runs (and is tested) on native
//! targets; the wasm host only copies the results into elements.

use lightbox_core::descriptor::{AttributeSource, Caption, CaptionField, PhotoDescriptor, attr};
use lightbox_core::error::Result;
use lightbox_core::{DomBindings, LightboxConfig};

/// Class of a slide root element.
pub const SLIDE_CLASS: &str = "photo-modal__slide";
/// Class of the blurred low-res layer.
pub const PLACEHOLDER_CLASS: &str = "photo-modal__placeholder";
/// Class of the full-resolution image.
pub const IMAGE_CLASS: &str = "photo-modal__image";
/// `touch-action` of the dialog. Vertical pans stay with the browser;
/// horizontal ones reach the swipe recognizer.
pub const TOUCH_ACTION: &str = "pan-y";

/// Attributes for the full image, in assignment order.
///
/// `sizes` and `srcset` come before `src`: once `src` is set the browser
/// starts fetching, and it must already know it may pick a candidate.
#[must_use]
pub fn full_image_attributes(descriptor: &PhotoDescriptor) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::with_capacity(5);
    attrs.push(("decoding", "async".to_string()));
    if let Some(set) = &descriptor.responsive {
        if let Some(sizes) = &set.sizes {
            attrs.push((attr::SIZES, sizes.clone()));
        }
        attrs.push((attr::SRCSET, set.srcset.clone()));
    }
    attrs.push((attr::ALT, descriptor.alt.clone()));
    attrs.push((attr::SRC, descriptor.primary_src.clone()));
    attrs
}

/// Source of the placeholder layer, if one should be drawn.
#[must_use]
pub fn placeholder_src(descriptor: &PhotoDescriptor, show_placeholder: bool) -> Option<&str> {
    if show_placeholder {
        descriptor.placeholder.as_deref()
    } else {
        None
    }
}

/// CSS `transform` for a drag offset; empty clears the property.
#[must_use]
pub fn slide_transform(dx: f64) -> String {
    if dx == 0.0 || !dx.is_finite() {
        String::new()
    } else {
        format!("translate3d({dx}px, 0, 0)")
    }
}

/// Caption slot selector for `field`, e.g. `[data-caption="date"]`.
#[must_use]
pub fn caption_selector(bindings: &DomBindings, field: CaptionField) -> String {
    format!("[{}=\"{}\"]", bindings.caption_attribute, field.key())
}

/// `(field, text)` pairs to write into the caption slots.
#[must_use]
pub fn caption_text(caption: &Caption) -> [(CaptionField, &str); 5] {
    CaptionField::ALL.map(|field| (field, caption.display(field)))
}

/// Selector for the thumbnail carrying `index`.
///
/// A selector list gets the index filter on every alternative.
#[must_use]
pub fn thumbnail_selector(bindings: &DomBindings, index: usize) -> String {
    let filter = format!("[{}=\"{index}\"]", bindings.index_attribute);
    split_selector_list(&bindings.photo_selector)
        .map(|part| format!("{part}{filter}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level alternatives of a selector list. Commas inside brackets,
/// parentheses or quoted strings do not split.
fn split_selector_list(list: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts.into_iter().map(str::trim).filter(|part| !part.is_empty())
}

/// Parse the JSON options object handed to the constructor. `None`, `null`
/// and `undefined` mean defaults.
pub fn parse_options(json: Option<&str>) -> Result<LightboxConfig> {
    match json.map(str::trim) {
        None | Some("" | "null" | "undefined") => Ok(LightboxConfig::default()),
        Some(json) => LightboxConfig::from_json_str(json),
    }
}

/// Attribute view of a thumbnail: the clickable element first, then the
/// image inside it. The index is read from the configured attribute.
#[derive(Debug)]
pub struct ThumbnailAttributes<'a, T, I> {
    pub thumbnail: T,
    pub image: Option<I>,
    pub index_attribute: &'a str,
}

impl<T: AttributeSource, I: AttributeSource> AttributeSource for ThumbnailAttributes<'_, T, I> {
    fn attribute(&self, name: &str) -> Option<String> {
        let name = if name == attr::INDEX {
            self.index_attribute
        } else {
            name
        };
        self.thumbnail
            .attribute(name)
            .or_else(|| self.image.as_ref().and_then(|img| img.attribute(name)))
    }
}
