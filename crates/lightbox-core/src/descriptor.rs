#![forbid(unsafe_code)]

//! Photo descriptors and their extraction from thumbnail attributes.
//!
//! A thumbnail on the page carries everything the lightbox needs as plain
//! attributes (see [`attr`]). Extraction reads them through the
//! [`AttributeSource`] seam so the same normalization runs against a live
//! DOM element in the browser and against a map in tests.
//!
//! Extraction is all-or-nothing: either a complete [`PhotoDescriptor`] comes
//! back or an error naming the offending attribute.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{LightboxError, Result};

/// Glyph shown for caption fields that have no value.
pub const PLACEHOLDER_GLYPH: &str = "—";

/// Attribute names read during extraction.
pub mod attr {
    pub const INDEX: &str = "data-index";
    /// Full-size image URL; preferred over [`SRC`] when present.
    pub const FULL_SRC: &str = "data-full";
    pub const SRC: &str = "src";
    pub const SRCSET: &str = "srcset";
    pub const SIZES: &str = "sizes";
    pub const ALT: &str = "alt";
    pub const DATE: &str = "data-date";
    pub const CAMERA: &str = "data-camera";
    pub const FILM: &str = "data-film";
    pub const DESCRIPTION: &str = "data-description";
    pub const LOCATION: &str = "data-location";
    /// Inline low-res placeholder (usually a data URL).
    pub const PLACEHOLDER: &str = "data-lqip";
}

/// Read-only access to the attributes of one thumbnail.
pub trait AttributeSource {
    /// Value of `name`, or `None` when the attribute is absent.
    fn attribute(&self, name: &str) -> Option<String>;
}

impl AttributeSource for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for BTreeMap<&str, &str> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).map(|value| (*value).to_string())
    }
}

// ---------------------------------------------------------------------------
// Responsive sources
// ---------------------------------------------------------------------------

/// One width-annotated `srcset` candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub url: String,
    pub width: u32,
}

/// A responsive source set: `srcset` candidates plus the `sizes` rule.
///
/// When present, the host assigns `srcset` and `sizes` before `src` so the
/// browser picks one candidate and the fallback URL never fetches on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveSet {
    pub srcset: String,
    pub sizes: Option<String>,
}

impl ResponsiveSet {
    /// Parse `url 640w, url 1280w` candidates. Entries without a width
    /// descriptor are skipped.
    #[must_use]
    pub fn candidates(&self) -> Vec<SourceCandidate> {
        self.srcset
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split_whitespace();
                let url = parts.next()?;
                let width = parts.next()?.strip_suffix('w')?.parse().ok()?;
                Some(SourceCandidate {
                    url: url.to_string(),
                    width,
                })
            })
            .collect()
    }

    /// Widest candidate, used as the lightbox's fallback `src` when the
    /// thumbnail does not name a full-size URL.
    #[must_use]
    pub fn widest(&self) -> Option<SourceCandidate> {
        self.candidates().into_iter().max_by_key(|c| c.width)
    }
}

// ---------------------------------------------------------------------------
// Caption
// ---------------------------------------------------------------------------

/// Caption fields shown under the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionField {
    Date,
    Camera,
    Film,
    Description,
    Location,
}

impl CaptionField {
    pub const ALL: [Self; 5] = [
        Self::Date,
        Self::Camera,
        Self::Film,
        Self::Description,
        Self::Location,
    ];

    /// Stable key, matching the caption attribute value in the page.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Camera => "camera",
            Self::Film => "film",
            Self::Description => "description",
            Self::Location => "location",
        }
    }

    const fn attribute(self) -> &'static str {
        match self {
            Self::Date => attr::DATE,
            Self::Camera => attr::CAMERA,
            Self::Film => attr::FILM,
            Self::Description => attr::DESCRIPTION,
            Self::Location => attr::LOCATION,
        }
    }
}

/// Display strings for one photo. Blank values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub date: Option<String>,
    pub camera: Option<String>,
    pub film: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl Caption {
    /// Text to display for `field`, falling back to [`PLACEHOLDER_GLYPH`].
    #[must_use]
    pub fn display(&self, field: CaptionField) -> &str {
        let value = match field {
            CaptionField::Date => &self.date,
            CaptionField::Camera => &self.camera,
            CaptionField::Film => &self.film,
            CaptionField::Description => &self.description,
            CaptionField::Location => &self.location,
        };
        value.as_deref().unwrap_or(PLACEHOLDER_GLYPH)
    }

    fn set(&mut self, field: CaptionField, value: Option<String>) {
        let slot = match field {
            CaptionField::Date => &mut self.date,
            CaptionField::Camera => &mut self.camera,
            CaptionField::Film => &mut self.film,
            CaptionField::Description => &mut self.description,
            CaptionField::Location => &mut self.location,
        };
        *slot = value;
    }
}

// ---------------------------------------------------------------------------
// PhotoDescriptor
// ---------------------------------------------------------------------------

/// Normalized per-photo metadata consumed by the lightbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDescriptor {
    /// Dense, unique position among navigable photos. Cache key.
    pub index: usize,
    /// Fallback image URL.
    pub primary_src: String,
    pub responsive: Option<ResponsiveSet>,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: Caption,
    /// Inline low-res image data shown until the full image is decoded.
    pub placeholder: Option<String>,
}

impl PhotoDescriptor {
    /// Minimal descriptor, mostly for tests and programmatic use.
    #[must_use]
    pub fn new(index: usize, primary_src: impl Into<String>) -> Self {
        Self {
            index,
            primary_src: primary_src.into(),
            responsive: None,
            alt: String::new(),
            caption: Caption::default(),
            placeholder: None,
        }
    }

    /// Extract a descriptor from thumbnail attributes.
    ///
    /// The index must parse as a non-negative integer. The primary source is
    /// `data-full`, then `src`, then the widest `srcset` candidate.
    pub fn from_attributes(source: &impl AttributeSource) -> Result<Self> {
        let raw_index = non_blank(source.attribute(attr::INDEX)).ok_or(
            LightboxError::InvalidDescriptor {
                attribute: attr::INDEX,
                reason: "missing",
            },
        )?;
        let index = raw_index
            .parse::<usize>()
            .map_err(|_| LightboxError::InvalidDescriptor {
                attribute: attr::INDEX,
                reason: "not a non-negative integer",
            })?;

        let responsive = non_blank(source.attribute(attr::SRCSET))
            .map(|srcset| ResponsiveSet {
                srcset,
                sizes: non_blank(source.attribute(attr::SIZES)),
            })
            .filter(|set| !set.candidates().is_empty());

        let primary_src = non_blank(source.attribute(attr::FULL_SRC))
            .or_else(|| non_blank(source.attribute(attr::SRC)))
            .or_else(|| {
                responsive
                    .as_ref()
                    .and_then(ResponsiveSet::widest)
                    .map(|c| c.url)
            })
            .ok_or(LightboxError::InvalidDescriptor {
                attribute: attr::SRC,
                reason: "no image source",
            })?;

        let mut caption = Caption::default();
        for field in CaptionField::ALL {
            caption.set(field, non_blank(source.attribute(field.attribute())));
        }

        Ok(Self {
            index,
            primary_src,
            responsive,
            alt: source.attribute(attr::ALT).unwrap_or_default(),
            caption,
            placeholder: non_blank(source.attribute(attr::PLACEHOLDER)),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(pairs: &[(&'static str, &'static str)]) -> BTreeMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn full_attribute_set_is_extracted() {
        let source = thumb(&[
            ("data-index", "3"),
            ("src", "/thumbs/3.jpg"),
            ("data-full", "/photos/3-1600.jpg"),
            ("srcset", "/photos/3-800.jpg 800w, /photos/3-1600.jpg 1600w"),
            ("sizes", "(max-width: 800px) 100vw, 80vw"),
            ("alt", "Harbour at dusk"),
            ("data-date", "12 March 2024"),
            ("data-camera", "Nikon FM2"),
            ("data-film", "Portra 400"),
            ("data-lqip", "data:image/webp;base64,AAAA"),
        ]);
        let desc = PhotoDescriptor::from_attributes(&source).expect("complete thumbnail");
        assert_eq!(desc.index, 3);
        assert_eq!(desc.primary_src, "/photos/3-1600.jpg");
        assert_eq!(desc.alt, "Harbour at dusk");
        assert_eq!(desc.caption.display(CaptionField::Film), "Portra 400");
        assert_eq!(desc.caption.display(CaptionField::Location), PLACEHOLDER_GLYPH);
        let set = desc.responsive.expect("srcset");
        assert_eq!(set.candidates().len(), 2);
        assert_eq!(set.sizes.as_deref(), Some("(max-width: 800px) 100vw, 80vw"));
        assert!(desc.placeholder.is_some());
    }

    #[test]
    fn blank_caption_values_use_placeholder_glyph() {
        let source = thumb(&[("data-index", "0"), ("src", "a.jpg"), ("data-date", "   ")]);
        let desc = PhotoDescriptor::from_attributes(&source).unwrap();
        assert_eq!(desc.caption.date, None);
        assert_eq!(desc.caption.display(CaptionField::Date), "—");
        assert_eq!(desc.alt, "");
    }

    #[test]
    fn missing_index_is_rejected() {
        let err = PhotoDescriptor::from_attributes(&thumb(&[("src", "a.jpg")])).unwrap_err();
        assert!(matches!(
            err,
            LightboxError::InvalidDescriptor {
                attribute: "data-index",
                ..
            }
        ));
    }

    #[test]
    fn negative_index_is_rejected() {
        let source = thumb(&[("data-index", "-1"), ("src", "a.jpg")]);
        assert!(PhotoDescriptor::from_attributes(&source).is_err());
    }

    #[test]
    fn widest_candidate_backs_up_missing_src() {
        let source = thumb(&[
            ("data-index", "1"),
            ("srcset", "b-400.jpg 400w, b-1200.jpg 1200w, b-800.jpg 800w"),
        ]);
        let desc = PhotoDescriptor::from_attributes(&source).unwrap();
        assert_eq!(desc.primary_src, "b-1200.jpg");
    }

    #[test]
    fn srcset_without_width_descriptors_is_dropped() {
        let source = thumb(&[("data-index", "1"), ("src", "c.jpg"), ("srcset", "c.jpg 2x")]);
        let desc = PhotoDescriptor::from_attributes(&source).unwrap();
        assert!(desc.responsive.is_none());
    }

    #[test]
    fn no_source_at_all_is_rejected() {
        let err = PhotoDescriptor::from_attributes(&thumb(&[("data-index", "4")])).unwrap_err();
        assert!(matches!(
            err,
            LightboxError::InvalidDescriptor { attribute: "src", .. }
        ));
    }
}
