use common::CaptureError;
use js_sys::Date;
use wasm_bindgen::prelude::*;

pub fn current_timestamp_ms() -> f64 {
    Date::now()
}

/// Locale time string (e.g. "3:04:05 PM") for a capture timestamp.
pub fn format_capture_time(timestamp_ms: f64) -> String {
    let locale = web_sys::window()
        .and_then(|w| w.navigator().language())
        .unwrap_or_else(|| "en-US".to_string());
    let date = Date::new(&JsValue::from_f64(timestamp_ms));
    String::from(date.to_locale_time_string(&locale))
}

/// Best-effort "Name: message" text for a thrown JS value.
pub fn js_error_text(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    let field = |name: &str| {
        js_sys::Reflect::get(err, &name.into())
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    };
    match (field("name"), field("message")) {
        (name, message) if name.is_empty() && message.is_empty() => format!("{:?}", err),
        (name, message) if message.is_empty() => name,
        (name, message) => format!("{}: {}", name, message),
    }
}

pub fn media_access_error(err: JsValue) -> CaptureError {
    CaptureError::MediaAccess(js_error_text(&err))
}

pub fn encoder_error(err: JsValue) -> CaptureError {
    CaptureError::Encoder(js_error_text(&err))
}

pub fn snapshot_error(err: JsValue) -> CaptureError {
    CaptureError::Snapshot(js_error_text(&err))
}
