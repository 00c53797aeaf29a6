//! Full-surface flat fill over an RGBA8 pixel buffer, matching the canvas
//! `fillRect` source-over result for opaque video frames.

use crate::filter::Rgba;

/// Composite `overlay` over every pixel of `pixels` (row-major RGBA8).
///
/// Alpha 0 leaves the buffer untouched and alpha 255 replaces every color
/// channel with the overlay color.
pub fn apply_overlay(pixels: &mut [u8], overlay: Rgba) {
    if overlay.is_transparent() {
        return;
    }

    let a = overlay.a as u32;
    let inv = 255 - a;
    let color = [overlay.r as u32, overlay.g as u32, overlay.b as u32];

    for px in pixels.chunks_exact_mut(4) {
        for (channel, over) in px[..3].iter_mut().zip(color) {
            *channel = ((*channel as u32 * inv + over * a + 127) / 255) as u8;
        }
        px[3] = (a + (px[3] as u32 * inv + 127) / 255) as u8;
    }
}
