#![forbid(unsafe_code)]

//! Browser host: implements the engine's surface traits on top of `web-sys`.

use js_sys::Promise;
use lightbox_core::descriptor::{Caption, CaptionField, PhotoDescriptor};
use lightbox_core::{
    AttributeSource, DecodeMode, DecodeTicket, DomBindings, GalleryPage, LightboxError,
    ModalChrome, Rect, SlideSurface,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlDialogElement, HtmlElement, HtmlImageElement, Window};

use crate::markup::{self, ThumbnailAttributes};

/// [`AttributeSource`] over a live element.
pub(crate) struct ElementAttributes<'a>(pub &'a Element);

impl AttributeSource for ElementAttributes<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

/// Read a descriptor from a thumbnail element (or the `<img>` inside it).
pub(crate) fn descriptor_from_element(
    element: &Element,
    bindings: &DomBindings,
) -> Result<PhotoDescriptor, LightboxError> {
    let inner = element.query_selector("img").ok().flatten();
    let view = ThumbnailAttributes {
        thumbnail: ElementAttributes(element),
        image: inner.as_ref().map(ElementAttributes),
        index_attribute: &bindings.index_attribute,
    };
    PhotoDescriptor::from_attributes(&view)
}

/// DOM nodes of one slide.
#[derive(Debug, Clone)]
pub(crate) struct SlideNodes {
    root: HtmlElement,
    image: HtmlImageElement,
}

/// A decode the engine asked for, waiting to be spawned.
pub(crate) struct DecodeRequest {
    pub image: HtmlImageElement,
    pub ticket: DecodeTicket,
    pub mode: DecodeMode,
}

/// The modal host and everything it resolved at mount.
pub(crate) struct DomHost {
    document: Document,
    bindings: DomBindings,
    dialog: HtmlDialogElement,
    card: Element,
    track: Element,
    captions: Vec<(CaptionField, Element)>,
    restore_focus: Option<HtmlElement>,
    pending: Vec<DecodeRequest>,
}

fn missing(what: impl Into<String>) -> LightboxError {
    LightboxError::MissingElement(what.into())
}

impl DomHost {
    /// Resolve the dialog, its card and its track.
    pub(crate) fn resolve(bindings: DomBindings) -> Result<Self, LightboxError> {
        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;
        let dialog = document
            .get_element_by_id(&bindings.modal_id)
            .and_then(|el| el.dyn_into::<HtmlDialogElement>().ok())
            .ok_or_else(|| missing(format!("dialog#{}", bindings.modal_id)))?;
        // Cancelling pointermove does not stop a touch pan the browser
        // already claimed; only touch-action does.
        if let Err(err) = dialog.style().set_property("touch-action", markup::TOUCH_ACTION) {
            warn!(?err, "could not set touch-action on the dialog");
        }
        let card = dialog
            .query_selector(&bindings.card_selector)
            .ok()
            .flatten()
            .ok_or_else(|| missing(bindings.card_selector.clone()))?;
        let track = dialog
            .query_selector(&bindings.track_selector)
            .ok()
            .flatten()
            .ok_or_else(|| missing(bindings.track_selector.clone()))?;
        let captions = CaptionField::ALL
            .into_iter()
            .filter_map(|field| {
                let slot = dialog
                    .query_selector(&markup::caption_selector(&bindings, field))
                    .ok()
                    .flatten()?;
                Some((field, slot))
            })
            .collect();
        Ok(Self {
            document,
            bindings,
            dialog,
            card,
            track,
            captions,
            restore_focus: None,
            pending: Vec::new(),
        })
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn dialog(&self) -> &HtmlDialogElement {
        &self.dialog
    }

    pub(crate) fn take_decode_requests(&mut self) -> Vec<DecodeRequest> {
        std::mem::take(&mut self.pending)
    }

    fn create_image(&self, class: &str) -> Option<HtmlImageElement> {
        let image = self
            .document
            .create_element("img")
            .ok()?
            .dyn_into::<HtmlImageElement>()
            .ok()?;
        image.set_class_name(class);
        Some(image)
    }

    fn build_slide(
        &self,
        descriptor: &PhotoDescriptor,
        show_placeholder: bool,
    ) -> Result<SlideNodes, wasm_bindgen::JsValue> {
        let root = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()?;
        root.set_class_name(markup::SLIDE_CLASS);
        root.set_attribute("aria-hidden", "true")?;

        if let Some(src) = markup::placeholder_src(descriptor, show_placeholder) {
            if let Some(layer) = self.create_image(markup::PLACEHOLDER_CLASS) {
                layer.set_alt("");
                layer.set_attribute("aria-hidden", "true")?;
                layer.set_src(src);
                root.append_child(&layer)?;
            }
        }

        let image = self
            .create_image(markup::IMAGE_CLASS)
            .ok_or_else(|| wasm_bindgen::JsValue::from_str("img element"))?;
        for (name, value) in markup::full_image_attributes(descriptor) {
            image.set_attribute(name, &value)?;
        }
        root.append_child(&image)?;
        self.track.append_child(&root)?;
        Ok(SlideNodes { root, image })
    }

    fn toggle_class(element: &Element, class: &str, on: bool) {
        let _ = element.class_list().toggle_with_force(class, on);
    }
}

impl SlideSurface for DomHost {
    type Handle = Option<SlideNodes>;

    fn create_slide(&mut self, descriptor: &PhotoDescriptor, show_placeholder: bool) -> Self::Handle {
        match self.build_slide(descriptor, show_placeholder) {
            Ok(nodes) => Some(nodes),
            Err(err) => {
                warn!(index = descriptor.index, ?err, "could not build slide");
                None
            }
        }
    }

    fn remove_slide(&mut self, handle: Self::Handle) {
        if let Some(nodes) = handle {
            nodes.root.remove();
        }
    }

    fn set_slide_active(&mut self, handle: &Self::Handle, active: bool) {
        let Some(nodes) = handle else { return };
        Self::toggle_class(&nodes.root, &self.bindings.active_class, active);
        let _ = nodes
            .root
            .set_attribute("aria-hidden", if active { "false" } else { "true" });
    }

    fn set_slide_offset(&mut self, handle: &Self::Handle, dx: f64) {
        let Some(nodes) = handle else { return };
        let style = nodes.root.style();
        let transform = markup::slide_transform(dx);
        let _ = if transform.is_empty() {
            style.remove_property("transform").map(drop)
        } else {
            style.set_property("transform", &transform)
        };
    }

    fn request_decode(&mut self, handle: &Self::Handle, ticket: DecodeTicket, mode: DecodeMode) {
        let Some(nodes) = handle else { return };
        self.pending.push(DecodeRequest {
            image: nodes.image.clone(),
            ticket,
            mode,
        });
    }

    fn reveal_slide(&mut self, handle: &Self::Handle) {
        if let Some(nodes) = handle {
            Self::toggle_class(&nodes.root, &self.bindings.ready_class, true);
        }
    }
}

impl GalleryPage for DomHost {
    fn descriptor_at(&self, index: usize) -> Option<PhotoDescriptor> {
        let selector = markup::thumbnail_selector(&self.bindings, index);
        let thumbnail = self.document.query_selector(&selector).ok().flatten()?;
        match descriptor_from_element(&thumbnail, &self.bindings) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                debug!(index, %err, "thumbnail without a usable descriptor");
                None
            }
        }
    }

    fn show_caption(&mut self, caption: &Caption) {
        for (field, text) in markup::caption_text(caption) {
            if let Some((_, slot)) = self.captions.iter().find(|(f, _)| *f == field) {
                slot.set_text_content(Some(text));
            }
        }
    }
}

impl ModalChrome for DomHost {
    fn show_dialog(&mut self) {
        self.restore_focus = self
            .document
            .active_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if !self.dialog.open() {
            if let Err(err) = self.dialog.show_modal() {
                warn!(?err, "showModal failed");
            }
        }
    }

    fn hide_dialog(&mut self) {
        self.dialog.close();
        if let Some(previous) = self.restore_focus.take() {
            let _ = previous.focus();
        }
    }

    fn lock_scroll(&mut self) {
        if let Some(root) = self.document.document_element() {
            Self::toggle_class(&root, &self.bindings.scroll_lock_class, true);
        }
    }

    fn unlock_scroll(&mut self) {
        if let Some(root) = self.document.document_element() {
            Self::toggle_class(&root, &self.bindings.scroll_lock_class, false);
        }
    }

    fn card_rect(&self) -> Option<Rect> {
        let r = self.card.get_bounding_client_rect();
        let rect = Rect::new(r.x(), r.y(), r.width(), r.height());
        (!rect.is_empty()).then_some(rect)
    }

    fn capture_pointer(&mut self, pointer_id: i32) {
        let _ = self.dialog.set_pointer_capture(pointer_id);
    }

    fn release_pointer(&mut self, pointer_id: i32) {
        if self.dialog.has_pointer_capture(pointer_id) {
            let _ = self.dialog.release_pointer_capture(pointer_id);
        }
    }
}

/// Wait until `image` can be revealed.
///
/// Remembered images wait one animation frame so the reveal transition still
/// runs. Fresh images await `decode()`; if that rejects (broken image, or a
/// browser that refuses to decode detached content) they fall back to the
/// load event. Errors are never surfaced.
pub(crate) async fn confirm_decode(window: &Window, image: &HtmlImageElement, mode: DecodeMode) {
    match mode {
        DecodeMode::Remembered => {
            let frame = Promise::new(&mut |resolve, _reject| {
                let _ = window.request_animation_frame(&resolve);
            });
            let _ = JsFuture::from(frame).await;
        }
        DecodeMode::Fresh => {
            if JsFuture::from(image.decode()).await.is_err() && !image.complete() {
                let loaded = Promise::new(&mut |resolve, _reject| {
                    image.set_onload(Some(&resolve));
                    image.set_onerror(Some(&resolve));
                });
                let _ = JsFuture::from(loaded).await;
                image.set_onload(None);
                image.set_onerror(None);
            }
        }
    }
}
