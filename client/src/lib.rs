use common::{CaptureSession, StreamConfig};
use wasm_bindgen::prelude::*;

pub mod recorder;

use recorder::{state, BrowserHost, ClientOptions, UiController};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("WASM client initialized");
}

/// Boot the capture page. `options` may be `undefined` or a partial
/// `ClientOptions` object.
#[wasm_bindgen]
pub fn start(options: JsValue) -> Result<(), JsValue> {
    let options: ClientOptions = if options.is_undefined() || options.is_null() {
        ClientOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    log::info!("[App] Starting with {:?}", options);

    let ui = UiController::new()?;
    ui.audio_toggle.set_checked(options.initial_audio);
    ui.screen_mode_toggle.set_checked(options.initial_screen);
    ui.render_palette(&options.swatches())?;
    ui.set_overlay("transparent");
    ui.set_recording(false);
    ui.render_timer("00:00:00", false);

    let config = StreamConfig::from_toggles(options.initial_screen, options.initial_audio);
    let session_options = options.session.clone();
    let host = BrowserHost::new(ui.clone(), options);
    state::install(CaptureSession::new(host, config, session_options));

    ui.register_event_listeners()?;

    let request = state::with_session(|session| session.request_stream()).flatten();
    state::acquire(request);

    log::info!("[App] Capture page ready");
    Ok(())
}
