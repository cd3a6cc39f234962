//! Style configuration
//!
//! Visual styling for a chart: palette, font, mode, legend placement, and
//! the infographic-mode options bag (hero emphasis, external-label layout).

use crate::{Color, NumberFormat};
use serde::{Deserialize, Serialize};

/// Overall visual mode of a chart
///
/// Infographic mode implies larger font multipliers, heavier weights, and
/// larger margins than classic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    Classic,
    Infographic,
}

impl Default for ChartMode {
    fn default() -> Self {
        ChartMode::Classic
    }
}

/// Legend placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
    None,
}

impl Default for LegendPosition {
    fn default() -> Self {
        LegendPosition::Bottom
    }
}

/// External-label layout strategy for radial and treemap charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelLayout {
    /// Externals fan out left/right by their natural angle
    Radial,
    /// Force all external labels into a left-hand column
    ColumnLeft,
    /// Force all external labels into a right-hand column
    ColumnRight,
    /// Split externals by the cosine sign of their angle
    Balanced,
}

impl LabelLayout {
    /// Columnar layouts reserve a side column and tighten internal fit
    pub fn is_columnar(&self) -> bool {
        matches!(self, LabelLayout::ColumnLeft | LabelLayout::ColumnRight)
    }
}

impl Default for LabelLayout {
    fn default() -> Self {
        LabelLayout::Radial
    }
}

/// Infographic-mode options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfographicConfig {
    /// Index of the emphasized ("hero") data point, if any
    pub hero_index: Option<usize>,
    /// External-label layout strategy
    pub label_layout: LabelLayout,
    /// Force labels visible regardless of level-of-detail tiering
    pub show_all_labels: bool,
    /// Sort categories by value before layout
    pub auto_sort: bool,
    /// Show the category name alongside the value
    pub show_category_label: bool,
}

impl Default for InfographicConfig {
    fn default() -> Self {
        Self {
            hero_index: None,
            label_layout: LabelLayout::default(),
            show_all_labels: false,
            auto_sort: false,
            show_category_label: true,
        }
    }
}

/// Visual styling for a chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Color palette for series/categories; may be empty
    pub palette: Vec<Color>,
    /// Font family name
    pub font_family: String,
    /// Classic or infographic mode
    pub mode: ChartMode,
    /// Legend placement
    pub legend_position: LegendPosition,
    /// Number formatting for value labels
    pub number_format: NumberFormat,
    /// Infographic options bag
    pub infographic: InfographicConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            font_family: "Inter".to_string(),
            mode: ChartMode::default(),
            legend_position: LegendPosition::default(),
            number_format: NumberFormat::default(),
            infographic: InfographicConfig::default(),
        }
    }
}

impl StyleConfig {
    /// Hero-value font multiplier for this mode
    ///
    /// Infographic hero values scale far more aggressively than classic,
    /// which is why the value-axis safety gap differs between modes.
    pub fn hero_multiplier(&self) -> f64 {
        match self.mode {
            ChartMode::Classic => 1.0,
            ChartMode::Infographic => 2.6,
        }
    }
}

/// Default color palette
pub fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb(79, 129, 189),  // Blue
        Color::rgb(192, 80, 77),   // Red
        Color::rgb(155, 187, 89),  // Green
        Color::rgb(128, 100, 162), // Purple
        Color::rgb(75, 172, 198),  // Teal
        Color::rgb(247, 150, 70),  // Orange
        Color::rgb(119, 146, 60),  // Olive
        Color::rgb(166, 166, 166), // Gray
    ]
}
