//! Recording host shared by the integration tests.

#![allow(dead_code)]

use lightbox_core::descriptor::{Caption, CaptionField, PhotoDescriptor};
use lightbox_core::{
    DecodeMode, DecodeTicket, GalleryPage, LightboxConfig, ModalChrome, Rect, SlideSurface,
};
use lightbox_core::Lightbox;

/// Slide handle: the photo index plus a serial so recreated slides differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub index: usize,
    pub serial: u32,
}

/// In-memory page with `count` thumbnails and a content card at
/// (100, 100, 400 x 300).
#[derive(Debug)]
pub struct RecordingHost {
    pub count: usize,
    pub card: Option<Rect>,
    pub live: Vec<Handle>,
    pub active: Vec<Handle>,
    pub offsets: Vec<(Handle, f64)>,
    pub decode_requests: Vec<(DecodeTicket, DecodeMode)>,
    pub reveals: Vec<Handle>,
    pub removed: Vec<Handle>,
    pub caption_dates: Vec<String>,
    pub dialog_shown: bool,
    pub scroll_locked: bool,
    pub captured: Option<i32>,
    pub capture_log: Vec<(i32, bool)>,
    serial: u32,
}

impl RecordingHost {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            card: Some(Rect::new(100.0, 100.0, 400.0, 300.0)),
            live: Vec::new(),
            active: Vec::new(),
            offsets: Vec::new(),
            decode_requests: Vec::new(),
            reveals: Vec::new(),
            removed: Vec::new(),
            caption_dates: Vec::new(),
            dialog_shown: false,
            scroll_locked: false,
            captured: None,
            capture_log: Vec::new(),
            serial: 0,
        }
    }

    /// Latest translation applied to the slide at `index`.
    pub fn offset_of(&self, index: usize) -> f64 {
        self.offsets
            .iter()
            .rev()
            .find(|(h, _)| h.index == index)
            .map_or(0.0, |(_, dx)| *dx)
    }

    pub fn take_decode_requests(&mut self) -> Vec<(DecodeTicket, DecodeMode)> {
        std::mem::take(&mut self.decode_requests)
    }
}

pub fn photo(index: usize) -> PhotoDescriptor {
    let mut d = PhotoDescriptor::new(index, format!("/photos/{index}-1600.jpg"));
    d.caption.date = Some(format!("2024-03-{:02}", index + 1));
    d.placeholder = Some("data:image/webp;base64,UklG".to_string());
    d
}

pub fn lightbox(count: usize, capacity: usize) -> Lightbox<RecordingHost> {
    let config = LightboxConfig::default().with_cache_capacity(capacity);
    Lightbox::new(config, RecordingHost::new(count)).expect("valid config")
}

impl SlideSurface for RecordingHost {
    type Handle = Handle;

    fn create_slide(&mut self, descriptor: &PhotoDescriptor, _show_placeholder: bool) -> Handle {
        self.serial += 1;
        let handle = Handle {
            index: descriptor.index,
            serial: self.serial,
        };
        self.live.push(handle);
        handle
    }

    fn remove_slide(&mut self, handle: Handle) {
        self.live.retain(|h| *h != handle);
        self.active.retain(|h| *h != handle);
        self.removed.push(handle);
    }

    fn set_slide_active(&mut self, handle: &Handle, active: bool) {
        self.active.retain(|h| h != handle);
        if active {
            self.active.push(*handle);
        }
    }

    fn set_slide_offset(&mut self, handle: &Handle, dx: f64) {
        self.offsets.push((*handle, dx));
    }

    fn request_decode(&mut self, _handle: &Handle, ticket: DecodeTicket, mode: DecodeMode) {
        self.decode_requests.push((ticket, mode));
    }

    fn reveal_slide(&mut self, handle: &Handle) {
        self.reveals.push(*handle);
    }
}

impl GalleryPage for RecordingHost {
    fn descriptor_at(&self, index: usize) -> Option<PhotoDescriptor> {
        (index < self.count).then(|| photo(index))
    }

    fn show_caption(&mut self, caption: &Caption) {
        self.caption_dates
            .push(caption.display(CaptionField::Date).to_string());
    }
}

impl ModalChrome for RecordingHost {
    fn show_dialog(&mut self) {
        self.dialog_shown = true;
    }

    fn hide_dialog(&mut self) {
        self.dialog_shown = false;
    }

    fn lock_scroll(&mut self) {
        self.scroll_locked = true;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locked = false;
    }

    fn card_rect(&self) -> Option<Rect> {
        self.card
    }

    fn capture_pointer(&mut self, pointer_id: i32) {
        self.captured = Some(pointer_id);
        self.capture_log.push((pointer_id, true));
    }

    fn release_pointer(&mut self, pointer_id: i32) {
        if self.captured == Some(pointer_id) {
            self.captured = None;
        }
        self.capture_log.push((pointer_id, false));
    }
}
