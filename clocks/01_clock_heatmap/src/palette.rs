//! Palette module - maps correctness to colors
//!
//! Two contexts share each scheme: full cells (overview grid and the text
//! cells of the zoomed view) and small indicators (dots and micro-rects in the
//! zoomed view), which get a brighter curve so they read against the dark
//! backdrop.

use nannou::prelude::*;
use serde::{Deserialize, Serialize};
use shared::is_correct;

/// Selectable color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Blue to red over a dark floor
    #[default]
    Default,
    /// Hue sweep from blue to red
    Rainbow,
    /// Brightness only
    Greyscale,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [
        ColorScheme::Default,
        ColorScheme::Rainbow,
        ColorScheme::Greyscale,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Default => "Default",
            ColorScheme::Rainbow => "Rainbow",
            ColorScheme::Greyscale => "Greyscale",
        }
    }
}

pub const WHITE: Srgb<u8> = Srgb {
    red: 255,
    green: 255,
    blue: 255,
    standard: std::marker::PhantomData,
};

/// Color of a full-size cell
pub fn cell_color(correctness: f32, scheme: ColorScheme) -> Srgb<u8> {
    let c = correctness.clamp(0.0, 1.0);
    if is_correct(c) {
        return WHITE;
    }

    match scheme {
        ColorScheme::Default => srgb(
            channel(255.0 * c.powf(0.8)),
            channel(70.0 * c.powi(2)),
            channel(255.0 * (1.0 - c).powf(0.5)),
        ),
        ColorScheme::Rainbow => hsl_to_srgb(240.0 * (1.0 - c), 1.0, 0.5 + 0.5 * c),
        ColorScheme::Greyscale => {
            let v = channel(255.0 * c);
            srgb(v, v, v)
        }
    }
}

/// Color of a small indicator (dot or micro-rect)
pub fn indicator_color(correctness: f32, scheme: ColorScheme) -> Srgb<u8> {
    let c = correctness.clamp(0.0, 1.0);
    if is_correct(c) {
        return WHITE;
    }

    match scheme {
        ColorScheme::Default => srgb(
            channel(255.0 * c.powf(0.7)),
            channel(100.0 * c.powi(2)),
            channel(255.0 * (1.0 - c).powf(0.4)),
        ),
        ColorScheme::Rainbow => hsl_to_srgb(240.0 * (1.0 - c), 1.0, 0.6),
        ColorScheme::Greyscale => {
            let v = channel(255.0 * (30.0 + 70.0 * c) / 100.0);
            srgb(v, v, v)
        }
    }
}

fn channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert HSL (hue in degrees, saturation and lightness in 0..1) to sRGB
fn hsl_to_srgb(hue: f32, saturation: f32, lightness: f32) -> Srgb<u8> {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    srgb(
        channel((r + m) * 255.0),
        channel((g + m) * 255.0),
        channel((b + m) * 255.0),
    )
}
