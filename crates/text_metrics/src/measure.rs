//! Text measurement
//!
//! The `CharClassMeasurer` is a deterministic stand-in for a real font
//! rasterizer: every character advances by a fixed fraction of the em
//! depending on its width class. This keeps layout output repeatable
//! across machines and independent of installed font assets.

use crate::{FontSpec, FontWeight, RenderTarget};
use serde::{Deserialize, Serialize};

/// Detailed metrics for a measured string
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
    pub descent: f64,
}

/// Measures string dimensions for a font spec and render target
///
/// Implementations must be pure: the same inputs always yield the same
/// output, and the Pdf target multiplies every dimension by the fixed
/// calibration constant relative to Screen.
pub trait TextMeasurer {
    /// Measure the pixel width of a string
    fn measure_width(&self, text: &str, font: &FontSpec, target: RenderTarget) -> f64;

    /// Measure width plus vertical metrics; `height == ascent + descent`
    fn measure(&self, text: &str, font: &FontSpec, target: RenderTarget) -> TextMetrics;
}

/// Fraction of the em a character advances, by width class
fn char_advance_factor(ch: char) -> f64 {
    match ch {
        ' ' => 0.33,
        'i' | 'j' | 'l' | 't' | 'f' | 'r' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '!'
        | '(' | ')' | '[' | ']' => 0.30,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.90,
        'A'..='Z' | '0'..='9' | '$' | '#' | '&' => 0.70,
        _ => 0.55,
    }
}

/// Deterministic character-class width model
#[derive(Debug, Clone, Default)]
pub struct CharClassMeasurer;

impl CharClassMeasurer {
    pub fn new() -> Self {
        Self
    }
}

impl TextMeasurer for CharClassMeasurer {
    fn measure_width(&self, text: &str, font: &FontSpec, target: RenderTarget) -> f64 {
        let weight_factor = match font.weight {
            FontWeight::Normal => 1.0,
            FontWeight::Medium => 1.03,
            FontWeight::Bold => 1.06,
        };

        let mut width = 0.0;
        let mut chars = 0usize;
        for ch in text.chars() {
            width += char_advance_factor(ch) * font.size * weight_factor;
            chars += 1;
        }
        if chars > 1 {
            width += font.letter_spacing * (chars - 1) as f64;
        }

        width * target.calibration()
    }

    fn measure(&self, text: &str, font: &FontSpec, target: RenderTarget) -> TextMetrics {
        let width = self.measure_width(text, font, target);
        let ascent = font.size * 0.8 * target.calibration();
        let descent = font.size * 0.2 * target.calibration();
        TextMetrics {
            width,
            height: ascent + descent,
            ascent,
            descent,
        }
    }
}
