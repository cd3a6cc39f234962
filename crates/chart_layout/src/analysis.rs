//! Chart analysis
//!
//! Derived, immutable facts about a chart computed once per layout call:
//! counts, value extremes, and measured label/value widths. Everything
//! downstream reads this instead of re-walking the datasets.

use chart_model::{ChartMode, ChartSpec, GridConfig, LegendPosition};
use text_metrics::{CachedMeasurer, FontSpec, RenderTarget, TextMeasurer};

/// Derived facts about a chart, computed once per layout call
#[derive(Debug, Clone)]
pub struct ChartAnalysis {
    /// Number of categories
    pub category_count: usize,
    /// Number of datasets
    pub dataset_count: usize,
    /// Maximum value across all datasets, never below 1.0
    pub max_value: f64,
    /// Minimum value across all datasets, never above 0.0
    pub min_value: f64,
    /// Widest category label in pixels at the base font
    pub max_label_width: f64,
    /// Longest category label in characters
    pub max_label_chars: usize,
    /// Widest formatted value in pixels at the base font
    pub max_value_width: f64,
    /// True iff more than one dataset and the legend is not disabled
    pub needs_legend: bool,
    /// Chosen visual mode
    pub mode: ChartMode,
}

/// The label font for a chart at its base size
pub fn label_font(chart: &ChartSpec, grid: &GridConfig) -> FontSpec {
    FontSpec::new(chart.style.font_family.clone(), grid.base_font_size)
}

/// Analyze a chart: counts, extremes, measured widths
pub fn analyze<M: TextMeasurer>(
    chart: &ChartSpec,
    grid: &GridConfig,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> ChartAnalysis {
    let font = label_font(chart, grid);

    let mut max_label_width: f64 = 0.0;
    let mut max_label_chars = 0usize;
    for label in &chart.data.labels {
        let width = measurer.measure_width(label, &font, target);
        max_label_width = max_label_width.max(width);
        max_label_chars = max_label_chars.max(label.chars().count());
    }

    // The widest formatted value is at one of the extremes
    let max_value = chart.data.max_value();
    let min_value = chart.data.min_value();
    let fmt = &chart.style.number_format;
    let max_value_width = measurer
        .measure_width(&fmt.format(max_value), &font, target)
        .max(measurer.measure_width(&fmt.format(min_value), &font, target));

    ChartAnalysis {
        category_count: chart.data.category_count(),
        dataset_count: chart.data.dataset_count(),
        max_value,
        min_value,
        max_label_width,
        max_label_chars,
        max_value_width,
        needs_legend: chart.data.dataset_count() > 1
            && chart.style.legend_position != LegendPosition::None,
        mode: chart.style.mode,
    }
}
