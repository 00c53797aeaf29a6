use common::{AcquireRequest, CaptureError, MediaConstraints, StreamSource};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaDevices, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::recorder::utils::media_access_error;

/// `navigator.mediaDevices`, or `UnsupportedPlatform` when the browser has no
/// capture API at all (insecure context, very old engine).
pub fn media_devices() -> Result<MediaDevices, CaptureError> {
    let unsupported = || CaptureError::UnsupportedPlatform("navigator.mediaDevices unavailable".to_string());

    let window = web_sys::window().ok_or_else(unsupported)?;
    let devices = js_sys::Reflect::get(&window.navigator(), &"mediaDevices".into())
        .map_err(|_| unsupported())?;
    if devices.is_undefined() || devices.is_null() {
        return Err(unsupported());
    }
    if !has_method(&devices, "getUserMedia") {
        return Err(unsupported());
    }
    Ok(devices.unchecked_into())
}

pub fn screen_capture_supported() -> bool {
    media_devices()
        .map(|devices| has_method(&devices, "getDisplayMedia"))
        .unwrap_or(false)
}

fn has_method(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::get(target, &name.into())
        .map(|f| f.is_function())
        .unwrap_or(false)
}

pub async fn acquire(request: &AcquireRequest) -> Result<MediaStream, CaptureError> {
    let devices = media_devices()?;
    let result = match request.source {
        StreamSource::Camera => get_camera_stream(&devices, request.constraints).await,
        StreamSource::Screen => get_screen_stream(&devices, request.constraints).await,
    };
    result.map_err(media_access_error)
}

pub async fn get_camera_stream(
    devices: &MediaDevices,
    constraints: MediaConstraints,
) -> Result<MediaStream, JsValue> {
    let js_constraints = MediaStreamConstraints::new();
    js_constraints.set_audio(&JsValue::from_bool(constraints.audio));
    js_constraints.set_video(&JsValue::from_bool(constraints.video));

    let promise = devices.get_user_media_with_constraints(&js_constraints)?;
    let stream_js = JsFuture::from(promise).await?;
    Ok(MediaStream::from(stream_js))
}

pub async fn get_screen_stream(
    devices: &MediaDevices,
    constraints: MediaConstraints,
) -> Result<MediaStream, JsValue> {
    let js_constraints = web_sys::DisplayMediaStreamConstraints::new();
    js_constraints.set_audio(&JsValue::from_bool(constraints.audio));
    js_constraints.set_video(&JsValue::from_bool(constraints.video));

    let promise = devices.get_display_media_with_constraints(&js_constraints)?;
    let stream_js = JsFuture::from(promise).await?;
    Ok(MediaStream::from(stream_js))
}

/// Call `callback` once the stream's video track ends without us stopping it
/// (the user pressed "Stop sharing", a camera was unplugged).
pub fn add_stream_end_listener(stream: &MediaStream, callback: Box<dyn Fn()>) -> Result<(), JsValue> {
    let tracks = stream.get_video_tracks();
    if tracks.length() > 0 {
        let track = MediaStreamTrack::from(tracks.get(0));
        let closure = Closure::wrap(callback as Box<dyn Fn()>);
        track.add_event_listener_with_callback("ended", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

pub fn stop_stream(stream: &MediaStream) {
    let tracks = stream.get_tracks();
    for i in 0..tracks.length() {
        let track = MediaStreamTrack::from(tracks.get(i));
        track.stop();
    }
}
