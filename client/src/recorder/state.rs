use std::cell::RefCell;

use common::{AcquireRequest, CaptureSession};

use crate::recorder::host::BrowserHost;
use crate::recorder::media_streams;

pub type Session = CaptureSession<BrowserHost>;

thread_local! {
    static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
}

pub fn install(session: Session) {
    SESSION.with(|cell| *cell.borrow_mut() = Some(session));
}

/// Run `f` against the installed session. Returns `None` before `start()`.
///
/// Never hold the session across an `.await`; every browser callback
/// re-enters through here.
pub fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Option<R> {
    SESSION.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Drive one acquisition request to completion in the background.
pub fn acquire(request: Option<AcquireRequest>) {
    let Some(request) = request else {
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        let result = media_streams::acquire(&request).await;

        if let Ok(stream) = &result {
            let generation = request.generation;
            let on_end = Box::new(move || {
                with_session(|session| session.stream_ended(generation));
            });
            if let Err(e) = media_streams::add_stream_end_listener(stream, on_end) {
                log::warn!("[Stream] Could not watch for track end: {:?}", e);
            }
        }

        let accepted = with_session(|session| session.complete_acquire(request.generation, result));
        if accepted.is_none() {
            log::warn!("[Stream] Session gone before acquisition finished");
        }
    });
}
