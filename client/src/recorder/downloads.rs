//! Handing artifacts to the user: save-to-disk and open-in-new-tab.
//! Both are fire-and-forget; the browser reports nothing back.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, HtmlAnchorElement};

pub fn save_to_disk(url: &str, filename: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let a: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    a.set_href(url);
    a.set_download(filename);
    a.click();
    Ok(())
}

pub fn open_in_new_tab(url: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    window.open_with_url_and_target(url, "_blank")?;
    Ok(())
}

/// Object URL for `blob`. The URL stays valid for the page's lifetime, which
/// is what the gallery needs.
pub fn object_url(blob: &Blob) -> Result<String, JsValue> {
    web_sys::Url::create_object_url_with_blob(blob)
}
