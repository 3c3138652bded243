#![forbid(unsafe_code)]

//! Lightbox configuration.
//!
//! Every field has a default, so hosts may pass a partial JSON document (or
//! none at all). [`LightboxConfig::from_json_str`] parses and validates in one
//! step; [`LightboxConfig::validate`] is also run by [`crate::Lightbox::new`].

use serde::{Deserialize, Serialize};

use crate::error::{LightboxError, Result};

/// Default number of slides kept alive by the slide cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 40;

/// Smallest accepted capacity: the active slide plus one incoming slide.
pub const MIN_CACHE_CAPACITY: usize = 2;

// ---------------------------------------------------------------------------
// Gesture thresholds
// ---------------------------------------------------------------------------

/// Thresholds for the swipe recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Horizontal travel (px) required before a gesture may lock to swiping.
    /// Default: 10
    pub lock_distance_px: f64,

    /// Horizontal travel must exceed vertical travel by this factor to lock.
    /// Default: 1.4
    pub lock_ratio: f64,

    /// Total horizontal travel (px) that commits a swipe on release.
    /// Default: 50
    pub commit_distance_px: f64,

    /// Release velocity (px/ms) that commits a swipe regardless of distance.
    /// Default: 0.5
    pub commit_velocity_px_per_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            lock_distance_px: 10.0,
            lock_ratio: 1.4,
            commit_distance_px: 50.0,
            commit_velocity_px_per_ms: 0.5,
        }
    }
}

impl GestureConfig {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("gesture.lock_distance_px", self.lock_distance_px),
            ("gesture.lock_ratio", self.lock_ratio),
            ("gesture.commit_distance_px", self.commit_distance_px),
            (
                "gesture.commit_velocity_px_per_ms",
                self.commit_velocity_px_per_ms,
            ),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(LightboxError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DOM bindings
// ---------------------------------------------------------------------------

/// Selectors, ids and class names the web host binds to.
///
/// The engine itself never reads these; they travel with the rest of the
/// configuration so a page can be retargeted from one options object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomBindings {
    /// Selector matching clickable photo thumbnails.
    pub photo_selector: String,
    /// Attribute carrying the dense photo index on each thumbnail.
    pub index_attribute: String,
    /// Id of the `<dialog>` element hosting the lightbox.
    pub modal_id: String,
    /// Selector (inside the dialog) of the visual content card used for
    /// backdrop hit-testing.
    pub card_selector: String,
    /// Selector (inside the dialog) of the container slides are appended to.
    pub track_selector: String,
    /// Attribute naming which caption field an element displays.
    pub caption_attribute: String,
    /// Selector of explicit close controls inside the dialog.
    pub close_selector: String,
    /// Class marking the active slide.
    pub active_class: String,
    /// Class added when the full image is ready to crossfade in.
    pub ready_class: String,
    /// Class put on the document root while the page scroll is locked.
    pub scroll_lock_class: String,
}

impl Default for DomBindings {
    fn default() -> Self {
        Self {
            photo_selector: "[data-photo]".to_string(),
            index_attribute: "data-index".to_string(),
            modal_id: "photo-modal".to_string(),
            card_selector: ".photo-modal__card".to_string(),
            track_selector: ".photo-modal__track".to_string(),
            caption_attribute: "data-caption".to_string(),
            close_selector: "[data-modal-close]".to_string(),
            active_class: "is-active".to_string(),
            ready_class: "is-ready".to_string(),
            scroll_lock_class: "modal-open".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// LightboxConfig
// ---------------------------------------------------------------------------

/// Top-level lightbox configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightboxConfig {
    /// Maximum number of live slides.
    /// Default: 40
    pub cache_capacity: usize,

    /// Swipe recognizer thresholds.
    pub gesture: GestureConfig,

    /// How long (ms) the synthetic-click interceptor stays armed after a
    /// pointer-driven close. A click arriving later is treated as real.
    /// Default: 700
    pub click_guard_ms: u64,

    /// Web host bindings.
    pub dom: DomBindings,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            gesture: GestureConfig::default(),
            click_guard_ms: 700,
            dom: DomBindings::default(),
        }
    }
}

impl LightboxConfig {
    /// Parse a (possibly partial) JSON options document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style capacity override.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity < MIN_CACHE_CAPACITY {
            return Err(LightboxError::InvalidConfig(format!(
                "cache_capacity must be at least {MIN_CACHE_CAPACITY}, got {}",
                self.cache_capacity
            )));
        }
        self.gesture.validate()?;
        if self.dom.photo_selector.trim().is_empty() {
            return Err(LightboxError::InvalidConfig(
                "dom.photo_selector must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = LightboxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_capacity, 40);
        assert_eq!(config.gesture.commit_distance_px, 50.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            LightboxConfig::from_json_str(r#"{"cache_capacity": 8, "gesture": {"lock_ratio": 2.0}}"#)
                .expect("valid config");
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.gesture.lock_ratio, 2.0);
        assert_eq!(config.gesture.lock_distance_px, 10.0);
        assert_eq!(config.dom.modal_id, "photo-modal");
    }

    #[test]
    fn capacity_below_two_is_rejected() {
        let err = LightboxConfig::from_json_str(r#"{"cache_capacity": 1}"#).unwrap_err();
        assert!(matches!(err, LightboxError::InvalidConfig(_)));
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let mut config = LightboxConfig::default();
        config.gesture.commit_velocity_px_per_ms = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = LightboxConfig::from_json_str("{cache_capacity").unwrap_err();
        assert!(matches!(err, LightboxError::Config(_)));
    }
}
