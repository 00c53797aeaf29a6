use common::{GalleryEntry, Thumbnail};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlVideoElement,
    MediaStream,
};

use crate::recorder::state;
use crate::recorder::utils::format_capture_time;

const ERROR_COLOR: &str = "#fecaca";
const INFO_COLOR: &str = "#9ca3af";

#[derive(Clone)]
pub struct UiController {
    pub video: HtmlVideoElement,
    pub record_btn_cont: HtmlElement,
    pub record_btn: HtmlElement,
    pub capture_btn_cont: HtmlElement,
    pub capture_btn: HtmlElement,
    pub status_indicator: HtmlElement,
    pub permission_status: HtmlElement,
    pub audio_toggle: HtmlInputElement,
    pub screen_mode_toggle: HtmlInputElement,
    pub timer: HtmlElement,
    pub filter_layer: HtmlElement,
    pub filter_palette: HtmlElement,
    pub gallery_list: HtmlElement,
}

impl UiController {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        Ok(Self {
            video: get_element_by_id(&document, "preview")?,
            record_btn_cont: get_element_by_id(&document, "record-btn-cont")?,
            record_btn: get_element_by_id(&document, "record-btn")?,
            capture_btn_cont: get_element_by_id(&document, "capture-btn-cont")?,
            capture_btn: get_element_by_id(&document, "capture-btn")?,
            status_indicator: get_element_by_id(&document, "status-indicator")?,
            permission_status: get_element_by_id(&document, "permission-status")?,
            audio_toggle: get_element_by_id(&document, "audio-toggle")?,
            screen_mode_toggle: get_element_by_id(&document, "screen-mode-toggle")?,
            timer: get_element_by_id(&document, "timer")?,
            filter_layer: get_element_by_id(&document, "filter-layer")?,
            filter_palette: get_element_by_id(&document, "filter-palette")?,
            gallery_list: get_element_by_id(&document, "gallery-list")?,
        })
    }

    pub fn set_permission_message(&self, message: &str, is_error: bool) {
        self.permission_status.set_text_content(Some(message));
        let _ = self
            .permission_status
            .style()
            .set_property("color", if is_error { ERROR_COLOR } else { INFO_COLOR });
        let _ = self
            .permission_status
            .class_list()
            .toggle_with_force("status-error", is_error);
    }

    /// Status badge, record button animation, and the source toggles (which
    /// stay disabled until the recording has been saved).
    pub fn set_recording(&self, recording: bool) {
        self.status_indicator
            .set_text_content(Some(if recording { "Recording" } else { "Idle" }));
        let classes = self.status_indicator.class_list();
        let _ = classes.toggle_with_force("status-recording", recording);
        let _ = classes.toggle_with_force("status-idle", !recording);

        let _ = self.record_btn.class_list().toggle_with_force("scale-record", recording);

        self.audio_toggle.set_disabled(recording);
        self.screen_mode_toggle.set_disabled(recording);
    }

    pub fn render_timer(&self, text: &str, visible: bool) {
        self.timer.set_text_content(Some(text));
        let _ = self
            .timer
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }

    pub fn set_overlay(&self, css: &str) {
        let _ = self.filter_layer.style().set_property("background-color", css);
    }

    pub fn bind_preview(&self, stream: Option<&MediaStream>) {
        self.video.set_src_object(stream);
        if stream.is_some() {
            self.video.set_muted(true);
            if let Err(e) = self.video.play() {
                log::warn!("[Stream] Preview playback failed: {:?}", e);
            }
        }
    }

    pub fn set_capture_flash(&self, active: bool) {
        let _ = self.capture_btn.class_list().toggle_with_force("scale-capture", active);
    }

    pub fn render_palette(&self, swatches: &[String]) -> Result<(), JsValue> {
        let document = document()?;
        self.filter_palette.set_inner_html("");

        for css in swatches {
            let swatch: HtmlElement = document.create_element("div")?.dyn_into()?;
            swatch.set_class_name("filter");
            swatch.set_title(css);
            swatch.style().set_property("background-color", css)?;
            self.filter_palette.append_child(&swatch)?;

            let target = swatch.clone();
            on(&swatch, "click", move |_event| select_swatch(&target))?;
        }
        Ok(())
    }

    /// Rebuild the gallery list from `entries` (most recent first).
    pub fn render_gallery(&self, entries: &[GalleryEntry]) -> Result<(), JsValue> {
        let document = document()?;
        self.gallery_list.set_inner_html("");

        for entry in entries {
            let item = create_div(&document, "gallery-item")?;
            item.set_attribute("data-id", &entry.id.to_string())?;

            let thumb = create_div(&document, "gallery-thumb")?;
            match entry.thumbnail {
                Thumbnail::MutedVideo => {
                    let v: HtmlVideoElement = document.create_element("video")?.dyn_into()?;
                    v.set_src(&entry.url);
                    v.set_controls(false);
                    v.set_muted(true);
                    v.set_autoplay(false);
                    v.set_attribute("playsinline", "")?;
                    thumb.append_child(&v)?;
                }
                Thumbnail::Image => {
                    let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
                    img.set_src(&entry.url);
                    img.set_alt(entry.badge);
                    thumb.append_child(&img)?;
                }
            }

            let meta = create_div(&document, "gallery-meta")?;
            let badge = document.create_element("span")?;
            badge.set_class_name(entry.badge_class);
            badge.set_text_content(Some(entry.badge));
            let time = document.create_element("span")?;
            time.set_text_content(Some(&format_capture_time(entry.timestamp)));
            meta.append_child(&badge)?;
            meta.append_child(&time)?;

            let actions = create_div(&document, "gallery-actions")?;
            for (action, label) in [("preview", "Preview"), ("download", "Download")] {
                let button = document.create_element("button")?;
                button.set_class_name("btn-ghost");
                button.set_attribute("data-action", action)?;
                button.set_text_content(Some(label));
                actions.append_child(&button)?;
            }

            item.append_child(&thumb)?;
            item.append_child(&meta)?;
            item.append_child(&actions)?;
            self.gallery_list.append_child(&item)?;
        }
        Ok(())
    }

    pub fn register_event_listeners(&self) -> Result<(), JsValue> {
        on(&self.record_btn_cont, "click", |_event| {
            state::with_session(|session| session.toggle_record());
        })?;

        on(&self.capture_btn_cont, "click", |_event| {
            state::with_session(|session| session.take_snapshot());
        })?;

        let screen_toggle = self.screen_mode_toggle.clone();
        on(&self.screen_mode_toggle, "change", move |_event| {
            let checked = screen_toggle.checked();
            let request = state::with_session(|session| session.set_screen_mode(checked)).flatten();
            state::acquire(request);
        })?;

        let audio_toggle = self.audio_toggle.clone();
        on(&self.audio_toggle, "change", move |_event| {
            let checked = audio_toggle.checked();
            let request = state::with_session(|session| session.set_audio(checked)).flatten();
            state::acquire(request);
        })?;

        // Gallery buttons are recreated on every render; one delegated
        // listener on the list handles all of them.
        on(&self.gallery_list, "click", |event| {
            if let Some((action, id)) = gallery_action(&event) {
                state::with_session(|session| match action.as_str() {
                    "preview" => session.preview_item(id),
                    "download" => session.download_item(id),
                    _ => {}
                });
            }
        })?;

        log::info!("[UI] Event listeners registered");
        Ok(())
    }
}

fn select_swatch(swatch: &HtmlElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let color = match window.get_computed_style(swatch) {
        Ok(Some(style)) => style.get_property_value("background-color").unwrap_or_default(),
        _ => return,
    };

    let accepted = state::with_session(|session| session.select_filter(&color).is_ok());
    if accepted == Some(true) {
        if let Some(parent) = swatch.parent_element() {
            let children = parent.children();
            for i in 0..children.length() {
                if let Some(child) = children.item(i) {
                    let _ = child.class_list().remove_1("selected");
                }
            }
        }
        let _ = swatch.class_list().add_1("selected");
    }
}

fn gallery_action(event: &Event) -> Option<(String, u64)> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let button = target.closest("[data-action]").ok()??;
    let action = button.get_attribute("data-action")?;
    let item = button.closest(".gallery-item").ok()??;
    let id = item.get_attribute("data-id")?.parse().ok()?;
    Some((action, id))
}

fn on(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn create_div(document: &Document, class: &str) -> Result<Element, JsValue> {
    let div = document.create_element("div")?;
    div.set_class_name(class);
    Ok(div)
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or_else(|| "No document".into())
}

fn get_element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element #{} not found", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has unexpected type", id)))
}
