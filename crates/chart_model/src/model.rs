//! Chart description types
//!
//! This module defines the data structures describing a chart: its kind,
//! category labels, datasets, and optional title. The layout engine treats
//! `labels[i]` as the category for `values[i]` in every dataset; the lengths
//! need not match structurally.

use crate::StyleConfig;
use serde::{Deserialize, Serialize};

/// The kinds of charts the layout engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Column,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Bubble,
    Radar,
    Histogram,
    Mixed,
    BoxPlot,
    Pictogram,
    Treemap,
}

impl ChartKind {
    /// Bar-family charts share the cartesian margin rules
    pub fn is_bar_family(&self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::Column | ChartKind::Histogram)
    }

    /// Pie and donut charts take the radial layout path
    pub fn is_radial(&self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Donut)
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::Column
    }
}

/// A complete chart description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    /// The kind of chart (bar, pie, treemap, ...)
    pub kind: ChartKind,
    /// Category labels and datasets
    pub data: ChartData,
    /// Visual styling
    pub style: StyleConfig,
    /// Optional chart title
    pub title: Option<String>,
}

impl ChartSpec {
    /// Create a new chart of the given kind with empty data
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            data: ChartData::default(),
            style: StyleConfig::default(),
            title: None,
        }
    }

    /// Set the chart title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the category labels
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.data.labels = labels;
        self
    }

    /// Add a dataset
    pub fn add_dataset(&mut self, dataset: Dataset) {
        self.data.datasets.push(dataset);
    }
}

/// Chart data: ordered category labels plus one or more datasets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    /// Category labels (one per category index)
    pub labels: Vec<String>,
    /// Data series
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Create chart data with the given labels
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            datasets: Vec::new(),
        }
    }

    /// Number of categories (max values length across datasets)
    pub fn category_count(&self) -> usize {
        self.datasets
            .iter()
            .map(|d| d.values.len())
            .max()
            .unwrap_or(0)
    }

    /// Number of datasets
    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    /// Maximum value across all datasets, floored at 1.0
    ///
    /// The floor keeps downstream scale math away from division by zero
    /// when a chart holds only zeros or tiny values.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter())
            .copied()
            .fold(1.0, f64::max)
    }

    /// Minimum value across all datasets, capped at 0.0
    pub fn min_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter())
            .copied()
            .fold(0.0, f64::min)
    }

    /// True if any value is non-finite (NaN or infinity)
    pub fn has_non_finite(&self) -> bool {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter())
            .any(|v| !v.is_finite())
    }
}

/// A single data series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Series name (shown in the legend)
    pub label: String,
    /// Numeric values, one per category
    pub values: Vec<f64>,
}

impl Dataset {
    /// Create a dataset with a label and values
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Grid/typography configuration supplied by the page model
///
/// The layout engine reads only the base font fields; page geometry is the
/// caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Base font size in `base_font_unit`
    pub base_font_size: f64,
    /// Unit for the base font size ("px", "pt")
    pub base_font_unit: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            base_font_size: 12.0,
            base_font_unit: "px".to_string(),
        }
    }
}

/// The pixel box a chart must occupy; never mutated by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailableSpace {
    pub width: f64,
    pub height: f64,
}

impl AvailableSpace {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are positive and finite
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
