//! Native tests for the DOM-facing plans the wasm host applies.

use std::collections::BTreeMap;

use lightbox_core::descriptor::{Caption, CaptionField, PhotoDescriptor, ResponsiveSet};
use lightbox_core::{DomBindings, LightboxError};
use lightbox_web::markup::{
    TOUCH_ACTION, ThumbnailAttributes, caption_selector, caption_text, full_image_attributes, parse_options,
    placeholder_src, thumbnail_selector,
};
use pretty_assertions::assert_eq;

fn responsive_photo() -> PhotoDescriptor {
    let mut d = PhotoDescriptor::new(4, "/photos/2024-03-05-1600.jpg");
    d.alt = "Harbour at dusk".to_string();
    d.responsive = Some(ResponsiveSet {
        srcset: "/photos/2024-03-05-800.jpg 800w, /photos/2024-03-05-1600.jpg 1600w".to_string(),
        sizes: Some("(max-width: 900px) 100vw, 80vw".to_string()),
    });
    d.placeholder = Some("data:image/webp;base64,UklGRh".to_string());
    d
}

#[test]
fn full_image_plan_sets_src_last() {
    let plan = full_image_attributes(&responsive_photo());
    assert_eq!(
        plan,
        vec![
            ("decoding", "async".to_string()),
            ("sizes", "(max-width: 900px) 100vw, 80vw".to_string()),
            (
                "srcset",
                "/photos/2024-03-05-800.jpg 800w, /photos/2024-03-05-1600.jpg 1600w".to_string()
            ),
            ("alt", "Harbour at dusk".to_string()),
            ("src", "/photos/2024-03-05-1600.jpg".to_string()),
        ]
    );
}

#[test]
fn plain_photo_plan_has_no_responsive_attributes() {
    let plan = full_image_attributes(&PhotoDescriptor::new(0, "/a.jpg"));
    let names: Vec<_> = plan.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["decoding", "alt", "src"]);
}

#[test]
fn placeholder_only_until_first_decode() {
    let d = responsive_photo();
    assert_eq!(placeholder_src(&d, true), Some("data:image/webp;base64,UklGRh"));
    assert_eq!(placeholder_src(&d, false), None);
    assert_eq!(placeholder_src(&PhotoDescriptor::new(1, "/b.jpg"), true), None);
}

#[test]
fn selectors_follow_bindings() {
    let mut bindings = DomBindings::default();
    assert_eq!(
        thumbnail_selector(&bindings, 7),
        "[data-photo][data-index=\"7\"]"
    );
    assert_eq!(
        caption_selector(&bindings, CaptionField::Film),
        "[data-caption=\"film\"]"
    );

    bindings.photo_selector = "a.thumb".to_string();
    bindings.index_attribute = "data-photo-index".to_string();
    assert_eq!(
        thumbnail_selector(&bindings, 0),
        "a.thumb[data-photo-index=\"0\"]"
    );
}

#[test]
fn every_selector_alternative_gets_the_index_filter() {
    let mut bindings = DomBindings::default();
    bindings.photo_selector = "a.photo, figure.photo".to_string();
    assert_eq!(
        thumbnail_selector(&bindings, 3),
        "a.photo[data-index=\"3\"], figure.photo[data-index=\"3\"]"
    );

    bindings.photo_selector = ":is(a, figure)[data-kind=\"film, digital\"]".to_string();
    assert_eq!(
        thumbnail_selector(&bindings, 3),
        ":is(a, figure)[data-kind=\"film, digital\"][data-index=\"3\"]"
    );
}

#[test]
fn dialog_leaves_horizontal_pans_to_the_recognizer() {
    assert_eq!(TOUCH_ACTION, "pan-y");
}

#[test]
fn caption_text_fills_blanks_with_glyph() {
    let caption = Caption {
        date: Some("2024-03-05".to_string()),
        camera: Some("Nikon FM2".to_string()),
        ..Caption::default()
    };
    assert_eq!(
        caption_text(&caption),
        [
            (CaptionField::Date, "2024-03-05"),
            (CaptionField::Camera, "Nikon FM2"),
            (CaptionField::Film, "—"),
            (CaptionField::Description, "—"),
            (CaptionField::Location, "—"),
        ]
    );
}

#[test]
fn thumbnail_view_reads_link_then_inner_image() {
    let link = BTreeMap::from([
        ("data-photo-index", "3"),
        ("data-full", "/photos/3-2400.jpg"),
        ("data-date", "2023-11-02"),
    ]);
    let image = BTreeMap::from([
        ("src", "/photos/3-400.jpg"),
        ("alt", "Fog over the bridge"),
        ("data-lqip", "data:image/webp;base64,AAAA"),
    ]);
    let view = ThumbnailAttributes {
        thumbnail: link,
        image: Some(image),
        index_attribute: "data-photo-index",
    };
    let descriptor = PhotoDescriptor::from_attributes(&view).expect("complete thumbnail");
    assert_eq!(descriptor.index, 3);
    assert_eq!(descriptor.primary_src, "/photos/3-2400.jpg");
    assert_eq!(descriptor.alt, "Fog over the bridge");
    assert_eq!(descriptor.caption.date.as_deref(), Some("2023-11-02"));
    assert_eq!(
        descriptor.placeholder.as_deref(),
        Some("data:image/webp;base64,AAAA")
    );
}

#[test]
fn thumbnail_without_index_is_rejected() {
    let view: ThumbnailAttributes<'_, _, BTreeMap<&str, &str>> = ThumbnailAttributes {
        thumbnail: BTreeMap::from([("data-index", "2"), ("src", "/x.jpg")]),
        image: None,
        index_attribute: "data-photo-index",
    };
    assert!(matches!(
        PhotoDescriptor::from_attributes(&view),
        Err(LightboxError::InvalidDescriptor { .. })
    ));
}

#[test]
fn options_default_and_override() {
    assert_eq!(parse_options(None).expect("defaults").cache_capacity, 40);
    assert_eq!(
        parse_options(Some("null")).expect("defaults").cache_capacity,
        40
    );
    let config = parse_options(Some(r#"{"cache_capacity": 12, "dom": {"modal_id": "viewer"}}"#))
        .expect("valid options");
    assert_eq!(config.cache_capacity, 12);
    assert_eq!(config.dom.modal_id, "viewer");
    assert_eq!(config.dom.track_selector, ".photo-modal__track");
    assert!(parse_options(Some(r#"{"cache_capacity": 1}"#)).is_err());
}

#[test]
fn native_stub_is_never_open() {
    assert!(!lightbox_web::PhotoModal::new().is_open());
    assert!(!lightbox_web::PhotoModal::default().is_open());
}
