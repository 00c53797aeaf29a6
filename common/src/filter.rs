//! Overlay ("filter") colors.
//!
//! A filter is a flat tint composited over the frame, not a color transform.
//! The CSS text is kept as-is for the live preview layer; the parsed RGBA
//! value drives the snapshot compositor.

use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterColor {
    css: String,
    rgba: Rgba,
}

impl FilterColor {
    pub fn transparent() -> Self {
        Self {
            css: "transparent".to_string(),
            rgba: Rgba::TRANSPARENT,
        }
    }

    pub fn parse(css: &str) -> Result<Self, CaptureError> {
        let trimmed = css.trim();
        let rgba = parse_css_color(trimmed)
            .ok_or_else(|| CaptureError::InvalidColor(trimmed.to_string()))?;
        Ok(Self {
            css: trimmed.to_string(),
            rgba,
        })
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn rgba(&self) -> Rgba {
        self.rgba
    }
}

impl Default for FilterColor {
    fn default() -> Self {
        Self::transparent()
    }
}

/// Swatches offered when the page does not configure its own.
pub fn default_palette() -> Vec<String> {
    vec![
        "transparent".to_string(),
        "rgba(255, 165, 0, 0.2)".to_string(),
        "rgba(255, 0, 0, 0.15)".to_string(),
        "rgba(0, 128, 255, 0.18)".to_string(),
        "rgba(128, 0, 128, 0.15)".to_string(),
    ]
}

fn parse_css_color(text: &str) -> Option<Rgba> {
    let lower = text.to_ascii_lowercase();
    if lower == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex);
    }
    let body = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    parse_rgb_body(body)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba { r: nibble(0)?, g: nibble(1)?, b: nibble(2)?, a: 255 }),
        4 => Some(Rgba { r: nibble(0)?, g: nibble(1)?, b: nibble(2)?, a: nibble(3)? }),
        6 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: 255 }),
        8 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
        _ => None,
    }
}

// Accepts both the legacy comma form and the space/slash form that newer
// engines return from getComputedStyle.
fn parse_rgb_body(body: &str) -> Option<Rgba> {
    let normalized = body.replace([',', '/'], " ");
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = match parts.get(3) {
        Some(s) => {
            let v: f64 = match s.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => s.parse().ok()?,
            };
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_transparent() {
        let color = FilterColor::default();
        assert_eq!(color.css(), "transparent");
        assert!(color.rgba().is_transparent());
    }

    #[test]
    fn test_parse_computed_style_forms() {
        let legacy = FilterColor::parse("rgba(255, 165, 0, 0.2)").unwrap();
        assert_eq!(legacy.rgba(), Rgba { r: 255, g: 165, b: 0, a: 51 });
        assert_eq!(legacy.css(), "rgba(255, 165, 0, 0.2)");

        let modern = FilterColor::parse("rgb(255 165 0 / 20%)").unwrap();
        assert_eq!(modern.rgba(), legacy.rgba());

        let opaque = FilterColor::parse("rgb(10, 20, 30)").unwrap();
        assert!(opaque.rgba().is_opaque());
        assert_eq!(computed_zero_alpha(), Rgba { r: 0, g: 0, b: 0, a: 0 });
    }

    fn computed_zero_alpha() -> Rgba {
        FilterColor::parse("rgba(0, 0, 0, 0)").unwrap().rgba()
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            FilterColor::parse("#ff8000").unwrap().rgba(),
            Rgba { r: 255, g: 128, b: 0, a: 255 }
        );
        assert_eq!(
            FilterColor::parse("#f80").unwrap().rgba(),
            Rgba { r: 255, g: 136, b: 0, a: 255 }
        );
        assert_eq!(FilterColor::parse("#00000080").unwrap().rgba().a, 128);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            FilterColor::parse("sepia(1)"),
            Err(CaptureError::InvalidColor(_))
        ));
        assert!(FilterColor::parse("rgb(1, 2)").is_err());
        assert!(FilterColor::parse("#12345").is_err());
        assert!(FilterColor::parse("#gggggg").is_err());
    }

    #[test]
    fn test_default_palette_parses() {
        let palette = default_palette();
        assert_eq!(palette[0], "transparent");
        for css in &palette {
            assert!(FilterColor::parse(css).is_ok(), "{} should parse", css);
        }
    }
}
