//! Color type and the color resolver
//!
//! The resolver expands a base palette to N distinct colors and picks a
//! legible foreground for a given background via a YIQ-style luminance
//! threshold at midpoint brightness.

use serde::{Deserialize, Serialize};

/// RGBA color
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a fully opaque color from RGB values
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex string ("#FF0000", "FF0000", or 8-digit RGBA)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Format as a hex string without the # prefix
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// YIQ-style perceived brightness, 0-255
    pub fn brightness(&self) -> f64 {
        (299.0 * self.r as f64 + 587.0 * self.g as f64 + 114.0 * self.b as f64) / 1000.0
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Expand a base palette to exactly `count` distinct colors
///
/// Cycles through the palette, shifting brightness on each repeat pass so
/// the fifth slice of a four-color palette does not collide with the first.
/// An empty palette yields a neutral gray ramp.
pub fn ensure_distinct_colors(palette: &[Color], count: usize) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    if palette.is_empty() {
        return (0..count)
            .map(|i| {
                let level = 64 + ((i * 160) / count.max(1)) as i16;
                let level = level.clamp(0, 255) as u8;
                Color::rgb(level, level, level)
            })
            .collect();
    }

    (0..count)
        .map(|i| {
            let base = palette[i % palette.len()];
            let pass = (i / palette.len()) as i16;
            if pass == 0 {
                base
            } else {
                // Alternate lighter/darker passes: +40, -40, +80, -80, ...
                let step = 40 * ((pass + 1) / 2);
                let amount = if pass % 2 == 1 { step } else { -step };
                adjust_brightness(base, amount)
            }
        })
        .collect()
}

/// Pick black or white for legibility against the given background
///
/// Uses the YIQ brightness formula with the threshold at midpoint (128).
pub fn best_contrast_color(background: Color) -> Color {
    if background.brightness() >= 128.0 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

/// Shift each channel by `amount`, clamped to [0, 255]
pub fn adjust_brightness(color: Color, amount: i16) -> Color {
    let shift = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
    Color::rgba(shift(color.r), shift(color.g), shift(color.b), color.a)
}
