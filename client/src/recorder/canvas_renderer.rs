use common::{raster, Rgba};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, ImageData};

/// Offscreen surface sized to one video frame.
pub struct SnapshotRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl SnapshotRenderer {
    /// Allocate a surface matching the video's current display size.
    /// Returns `Ok(None)` until the video has a decodable frame.
    pub fn for_video(video: &HtmlVideoElement) -> Result<Option<Self>, JsValue> {
        if video.ready_state() < 2 {
            return Ok(None);
        }

        let width = video.video_width();
        let height = video.video_height();
        if width == 0 || height == 0 {
            return Ok(None);
        }

        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")?
            .ok_or("No 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Some(Self { canvas, ctx, width, height }))
    }

    pub fn draw_frame(&self, video: &HtmlVideoElement) -> Result<(), JsValue> {
        self.ctx.draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
        )
    }

    /// Flat fill over the whole surface, composited in Rust so the result
    /// does not depend on the engine's blending.
    pub fn apply_overlay(&self, overlay: Rgba) -> Result<(), JsValue> {
        if overlay.is_transparent() {
            return Ok(());
        }

        let image = self
            .ctx
            .get_image_data(0.0, 0.0, self.width as f64, self.height as f64)?;
        let mut pixels = image.data().0;
        raster::apply_overlay(&mut pixels, overlay);

        let tinted = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&pixels), self.width, self.height)?;
        self.ctx.put_image_data(&tinted, 0.0, 0.0)
    }

    pub fn to_data_url(&self, mime_type: &str) -> Result<String, JsValue> {
        self.canvas.to_data_url_with_type(mime_type)
    }
}

/// Draw, tint and serialize the current frame of `video`.
pub fn capture_snapshot(
    video: &HtmlVideoElement,
    overlay: Rgba,
    mime_type: &str,
) -> Result<Option<String>, JsValue> {
    let Some(renderer) = SnapshotRenderer::for_video(video)? else {
        return Ok(None);
    };
    renderer.draw_frame(video)?;
    renderer.apply_overlay(overlay)?;
    renderer.to_data_url(mime_type).map(Some)
}
