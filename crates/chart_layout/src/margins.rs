//! Margin solver
//!
//! Computes the four-sided margin band around the plot area: axis-label
//! margin from the wrapper, value-label margin from measured formatted
//! widths, legend footprint, title band, the symmetric rule for bar
//! charts, export padding, and the overflow-risk shrink pass.

use crate::geometry::{Margins, Size};
use crate::legend::LegendBlock;
use crate::wrap::{self, WrapStrategy, WrappedLabel};
use crate::ChartAnalysis;
use chart_model::{ChartKind, ChartMode, ChartSpec, LegendPosition};
use serde::{Deserialize, Serialize};
use text_metrics::{CachedMeasurer, FontSpec, FontWeight, RenderTarget, TextMeasurer};

/// Base margin for cartesian charts
pub const BASE_MARGIN: f64 = 20.0;
/// Base margin for radial and treemap charts
pub const BASE_MARGIN_RADIAL: f64 = 40.0;
/// Minimum value-axis margin
pub const MIN_VALUE_MARGIN: f64 = 40.0;
/// Value-axis safety gap in classic mode
pub const SAFETY_GAP_CLASSIC: f64 = 16.0;
/// Value-axis safety gap in infographic mode (hero values scale at 2.6x)
pub const SAFETY_GAP_INFOGRAPHIC: f64 = 40.0;
/// Padding below the title band
pub const TITLE_PADDING: f64 = 12.0;
/// Gap between the legend block and the plot
pub const LEGEND_GAP: f64 = 12.0;
/// Padding added to all four margins for the print target
pub const EXPORT_PADDING: f64 = 40.0;
/// Title font size as a multiple of the base font
pub const TITLE_FONT_FACTOR: f64 = 1.4;
/// Minimum plot width as a share of the container
pub const MIN_PLOT_WIDTH_RATIO: f64 = 0.40;
/// Minimum plot height as a share of the container
pub const MIN_PLOT_HEIGHT_RATIO: f64 = 0.30;
/// Absolute floor margins can be shrunk to by the overflow pass
pub const SHRINK_FLOOR: f64 = 20.0;
/// Reserved external-label column: share of container width, clamped
pub const EXTERNAL_COLUMN_RATIO: f64 = 0.25;
pub const EXTERNAL_COLUMN_MIN: f64 = 120.0;
pub const EXTERNAL_COLUMN_MAX: f64 = 220.0;

/// Width of the side column reserved for external labels
pub fn external_column_width(container_width: f64) -> f64 {
    (container_width * EXTERNAL_COLUMN_RATIO).clamp(EXTERNAL_COLUMN_MIN, EXTERNAL_COLUMN_MAX)
}

/// Report emitted when the overflow-risk pass had to shrink margins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverflowReport {
    /// Plot width before shrinking, as a share of container width
    pub plot_width_ratio: f64,
    /// Plot height before shrinking, as a share of container height
    pub plot_height_ratio: f64,
    /// Amount removed from each horizontal side margin
    pub shrunk_horizontal: f64,
    /// Amount removed from each vertical side margin
    pub shrunk_vertical: f64,
}

/// Resolved margin plan for a cartesian chart
#[derive(Debug, Clone)]
pub struct MarginPlan {
    pub margins: Margins,
    /// True when category labels render above the plot instead of beside it
    pub is_stacked: bool,
    /// Wrapped category labels, in input order
    pub wrapped_labels: Vec<WrappedLabel>,
    /// Maximum line count across wrapped labels, at least 1
    pub estimated_label_lines: usize,
    /// Informational wrap strategy
    pub strategy: WrapStrategy,
    /// Measured legend block (may be empty)
    pub legend: LegendBlock,
    /// Present when the overflow-risk pass fired
    pub overflow: Option<OverflowReport>,
}

/// Decide whether the stacked-label layout applies
///
/// Bar-family only: infographic mode, a label over 15 characters, or a
/// label wider than a quarter of the container all push labels above the
/// plot.
pub fn is_stacked_layout(
    kind: ChartKind,
    mode: ChartMode,
    analysis: &ChartAnalysis,
    container_width: f64,
) -> bool {
    kind.is_bar_family()
        && (mode == ChartMode::Infographic
            || analysis.max_label_chars > 15
            || analysis.max_label_width > container_width * 0.25)
}

fn safety_gap(mode: ChartMode) -> f64 {
    match mode {
        ChartMode::Classic => SAFETY_GAP_CLASSIC,
        ChartMode::Infographic => SAFETY_GAP_INFOGRAPHIC,
    }
}

fn title_font(chart: &ChartSpec, base_size: f64) -> FontSpec {
    FontSpec::new(chart.style.font_family.clone(), base_size * TITLE_FONT_FACTOR)
        .with_weight(FontWeight::Bold)
}

/// Top margin: measured title height plus padding, or a mode-scaled default
fn top_margin<M: TextMeasurer>(
    chart: &ChartSpec,
    base_size: f64,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> f64 {
    match &chart.title {
        Some(title) => {
            let metrics = measurer.measure(title, &title_font(chart, base_size), target);
            metrics.height + TITLE_PADDING
        }
        None => match chart.style.mode {
            ChartMode::Classic => 20.0,
            ChartMode::Infographic => 32.0,
        },
    }
}

/// Solve cartesian margins: left/bottom/right/top in priority order,
/// then symmetry, legend claims, overflow pass, export padding
pub fn solve_cartesian<M: TextMeasurer>(
    chart: &ChartSpec,
    analysis: &ChartAnalysis,
    space: Size,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
    legend: LegendBlock,
) -> MarginPlan {
    let mode = chart.style.mode;
    let stacked = is_stacked_layout(chart.kind, mode, analysis, space.width);

    let right = MIN_VALUE_MARGIN.max(analysis.max_value_width + safety_gap(mode));

    // Stacked labels sit above the plot and wrap against the full
    // container width; the left margin then mirrors the right one.
    let (left, wrapped_labels, estimated_label_lines, strategy) = if stacked {
        let wrap_width = (space.width - 2.0 * BASE_MARGIN).max(1.0);
        let wrapped: Vec<WrappedLabel> = chart
            .data
            .labels
            .iter()
            .map(|l| {
                wrap::wrap_label(l, wrap_width, font, measurer, target, wrap::MAX_WORDS_PER_LINE)
            })
            .collect();
        let lines = wrapped.iter().map(|w| w.line_count()).max().unwrap_or(1);
        let label_analysis = wrap::analyze_labels(&chart.data.labels, font, measurer, target);
        let strategy = wrap::select_strategy(space.width, &label_analysis);
        (right, wrapped, lines, strategy)
    } else {
        let sm = wrap::smart_margin(
            &chart.data.labels,
            space.width,
            font,
            measurer,
            target,
            chart.kind,
            mode,
        );
        (sm.margin, sm.wrapped, sm.estimated_label_lines, sm.strategy)
    };

    let mut margins = Margins {
        top: top_margin(chart, font.size, measurer, target),
        right,
        bottom: if legend.position == Some(LegendPosition::Bottom) {
            legend.height + LEGEND_GAP
        } else {
            28.0
        },
        left,
    };

    // Bar charts balance left and right after independent computation
    if chart.kind.is_bar_family() {
        let side = margins.left.max(margins.right);
        margins.left = side;
        margins.right = side;
    }

    match legend.position {
        Some(LegendPosition::Top) => margins.top += legend.vertical_claim() + LEGEND_GAP,
        Some(LegendPosition::Left) => margins.left += legend.horizontal_claim() + LEGEND_GAP,
        Some(LegendPosition::Right) => margins.right += legend.horizontal_claim() + LEGEND_GAP,
        _ => {}
    }

    let overflow = overflow_pass(&mut margins, space);

    if target == RenderTarget::Pdf {
        margins.expand_all(EXPORT_PADDING);
    }

    MarginPlan {
        margins,
        is_stacked: stacked,
        wrapped_labels,
        estimated_label_lines,
        strategy,
        legend,
        overflow,
    }
}

/// Shrink margins that leave too little plot area
///
/// Fires when the plot would fall under 40% of the container width or 30%
/// of its height; each offending pair of margins gives back half the
/// deficit, floored at an absolute minimum. The risk may persist after
/// shrinking; it is reported either way.
pub fn overflow_pass(margins: &mut Margins, container: Size) -> Option<OverflowReport> {
    let plot = margins.plot_zone(container);
    let width_ratio = plot.width / container.width;
    let height_ratio = plot.height / container.height;

    let width_deficit = (container.width * MIN_PLOT_WIDTH_RATIO - plot.width).max(0.0);
    let height_deficit = (container.height * MIN_PLOT_HEIGHT_RATIO - plot.height).max(0.0);
    if width_deficit <= 0.0 && height_deficit <= 0.0 {
        return None;
    }

    let shrink_h = width_deficit / 2.0;
    let shrink_v = height_deficit / 2.0;
    if shrink_h > 0.0 {
        margins.left = (margins.left - shrink_h).max(SHRINK_FLOOR);
        margins.right = (margins.right - shrink_h).max(SHRINK_FLOOR);
    }
    if shrink_v > 0.0 {
        margins.top = (margins.top - shrink_v).max(SHRINK_FLOOR);
        margins.bottom = (margins.bottom - shrink_v).max(SHRINK_FLOOR);
    }

    tracing::warn!(
        width_ratio,
        height_ratio,
        shrink_h,
        shrink_v,
        "plot area under minimum share, shrinking margins"
    );

    Some(OverflowReport {
        plot_width_ratio: width_ratio,
        plot_height_ratio: height_ratio,
        shrunk_horizontal: shrink_h,
        shrunk_vertical: shrink_v,
    })
}
