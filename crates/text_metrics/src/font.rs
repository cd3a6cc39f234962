//! Font specification and render targets

use serde::{Deserialize, Serialize};

/// Calibration multiplier applied to all dimensions for the print target
///
/// The print rasterizer renders text roughly 10% larger than the screen
/// for the same nominal size; layout must account for it up front or
/// exported labels clip.
pub const PDF_CALIBRATION: f64 = 1.10;

/// Where the measured text will be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    Screen,
    Pdf,
}

impl RenderTarget {
    /// Dimension multiplier for this target relative to screen
    pub fn calibration(&self) -> f64 {
        match self {
            RenderTarget::Screen => 1.0,
            RenderTarget::Pdf => PDF_CALIBRATION,
        }
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        RenderTarget::Screen
    }
}

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
    Bold,
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Normal
    }
}

/// A font specification for measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font family name
    pub family: String,
    /// Size in pixels
    pub size: f64,
    /// Weight
    pub weight: FontWeight,
    /// Additional spacing per character gap, in pixels
    pub letter_spacing: f64,
}

impl FontSpec {
    /// Create a font spec with default weight and no letter spacing
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::default(),
            letter_spacing: 0.0,
        }
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Set letter spacing
    pub fn with_letter_spacing(mut self, spacing: f64) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Scale the size by a multiplier, keeping everything else
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            family: self.family.clone(),
            size: self.size * factor,
            weight: self.weight,
            letter_spacing: self.letter_spacing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_factor() {
        assert_eq!(RenderTarget::Screen.calibration(), 1.0);
        assert!((RenderTarget::Pdf.calibration() - 1.10).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_font() {
        let font = FontSpec::new("Inter", 12.0).with_weight(FontWeight::Bold);
        let big = font.scaled(2.0);
        assert_eq!(big.size, 24.0);
        assert_eq!(big.weight, FontWeight::Bold);
        assert_eq!(big.family, "Inter");
    }
}
