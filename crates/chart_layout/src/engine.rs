//! Layout engine orchestrator
//!
//! Runs chart analysis, dispatches to one of a closed set of layout
//! strategies (cartesian, radial, treemap), and returns one normalized
//! layout result. Every call computes from scratch; the only state the
//! engine carries is its measurement cache, which can be cleared at any
//! time without affecting output.

use crate::analysis::{analyze, label_font};
use crate::geometry::{Margins, Size, Zone};
use crate::legend::{measure_legend, LegendBlock};
use crate::margins::{solve_cartesian, OverflowReport, LEGEND_GAP};
use crate::radial::{solve_radial, RadialDetail};
use crate::treemap::{solve_treemap, TreemapDetail};
use crate::wrap::{WrapStrategy, WrappedLabel};
use crate::{LayoutError, LayoutResult};
use chart_model::{
    ensure_distinct_colors, AvailableSpace, ChartKind, ChartSpec, Color, GridConfig,
    LegendPosition,
};
use serde::{Deserialize, Serialize};
use text_metrics::{CachedMeasurer, CacheStats, CharClassMeasurer, RenderTarget, TextMeasurer};

/// Gap between bars within one category slot
const BAR_SLOT_GAP: f64 = 10.0;

/// The closed set of layout strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    Cartesian,
    Radial,
    Treemap,
}

impl LayoutStrategy {
    /// Strategy lookup by chart kind
    ///
    /// Pie and donut take the radial path, treemaps their own; every
    /// other kind shares the cartesian margin math (shape-specific
    /// geometry beyond margins is the renderer's concern).
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Pie | ChartKind::Donut => LayoutStrategy::Radial,
            ChartKind::Treemap => LayoutStrategy::Treemap,
            _ => LayoutStrategy::Cartesian,
        }
    }
}

/// Cartesian-path geometry attached to the computed layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartesianDetail {
    /// Thickness of one bar, for bar-family charts
    pub bar_thickness: f64,
    /// Category labels render above the plot instead of beside it
    pub is_stacked: bool,
    /// Wrapped category labels, in input order
    pub wrapped_labels: Vec<WrappedLabel>,
    pub estimated_label_lines: usize,
    pub strategy: WrapStrategy,
    /// Resolved per-series colors
    pub series_colors: Vec<Color>,
}

/// Chart-family-specific geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum TypeSpecific {
    Cartesian(CartesianDetail),
    Radial(RadialDetail),
    Treemap(TreemapDetail),
}

/// The engine's output: everything the renderer needs, immutable once
/// returned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedLayout {
    pub container: Size,
    pub margins: Margins,
    /// Plot zone in container coordinates
    pub plot: Zone,
    /// Legend zone, when a legend is shown
    pub legend: Option<Zone>,
    pub strategy: LayoutStrategy,
    pub type_specific: TypeSpecific,
    /// Present when the overflow-risk pass had to shrink margins
    pub overflow_risk: Option<OverflowReport>,
}

/// The chart layout engine
///
/// Owns a bounded measurement cache; everything else is computed fresh
/// per call.
pub struct LayoutEngine<M: TextMeasurer = CharClassMeasurer> {
    measurer: CachedMeasurer<M>,
}

impl Default for LayoutEngine<CharClassMeasurer> {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine<CharClassMeasurer> {
    /// Engine with the deterministic character-class measurer
    pub fn new() -> Self {
        Self {
            measurer: CachedMeasurer::new(CharClassMeasurer::new()),
        }
    }
}

impl<M: TextMeasurer> LayoutEngine<M> {
    /// Engine with a custom measurer (e.g. a platform text stack)
    pub fn with_measurer(measurer: M) -> Self {
        Self {
            measurer: CachedMeasurer::new(measurer),
        }
    }

    /// Drop all cached measurements, e.g. after font assets load
    pub fn clear_measurement_cache(&mut self) {
        self.measurer.clear();
    }

    /// Measurement cache statistics
    pub fn cache_stats(&self) -> &CacheStats {
        self.measurer.stats()
    }

    /// Compute a complete layout for a chart within the given box
    pub fn compute_layout(
        &mut self,
        chart: &ChartSpec,
        grid: &GridConfig,
        space: AvailableSpace,
        target: RenderTarget,
    ) -> LayoutResult<ComputedLayout> {
        if !space.is_valid() {
            return Err(LayoutError::InvalidContainer {
                width: space.width,
                height: space.height,
            });
        }
        if chart.data.has_non_finite() {
            return Err(LayoutError::NonFiniteData);
        }

        let container = Size::new(space.width, space.height);
        let analysis = analyze(chart, grid, &mut self.measurer, target);
        let font = label_font(chart, grid);
        let legend = measure_legend(chart, container.width, &font, &mut self.measurer, target);
        let strategy = LayoutStrategy::for_kind(chart.kind);

        tracing::debug!(
            kind = ?chart.kind,
            ?strategy,
            ?target,
            categories = analysis.category_count,
            datasets = analysis.dataset_count,
            "computing chart layout"
        );

        let (margins, legend_block, overflow, type_specific) = match strategy {
            LayoutStrategy::Cartesian => {
                let plan = solve_cartesian(
                    chart,
                    &analysis,
                    container,
                    &font,
                    &mut self.measurer,
                    target,
                    legend,
                );
                let plot = plan.margins.plot_zone(container);
                let detail = CartesianDetail {
                    bar_thickness: bar_thickness(chart.kind, plot, &analysis),
                    is_stacked: plan.is_stacked,
                    wrapped_labels: plan.wrapped_labels,
                    estimated_label_lines: plan.estimated_label_lines,
                    strategy: plan.strategy,
                    series_colors: ensure_distinct_colors(
                        &chart.style.palette,
                        analysis.dataset_count,
                    ),
                };
                (
                    plan.margins,
                    plan.legend,
                    plan.overflow,
                    TypeSpecific::Cartesian(detail),
                )
            }
            LayoutStrategy::Radial => {
                let plan = solve_radial(
                    chart,
                    &analysis,
                    container,
                    &font,
                    &mut self.measurer,
                    target,
                    legend,
                );
                (
                    plan.margins,
                    plan.legend,
                    plan.overflow,
                    TypeSpecific::Radial(plan.detail),
                )
            }
            LayoutStrategy::Treemap => {
                let plan = solve_treemap(
                    chart,
                    container,
                    &font,
                    &mut self.measurer,
                    target,
                    legend,
                );
                (
                    plan.margins,
                    plan.legend,
                    plan.overflow,
                    TypeSpecific::Treemap(plan.detail),
                )
            }
        };

        let plot = margins.plot_zone(container);
        let legend_zone = place_legend(&legend_block, container, plot);

        Ok(ComputedLayout {
            container,
            margins,
            plot,
            legend: legend_zone,
            strategy,
            type_specific,
            overflow_risk: overflow,
        })
    }
}

/// Thickness of one bar: the category slot minus a fixed gap, split
/// across datasets
fn bar_thickness(kind: ChartKind, plot: Zone, analysis: &crate::ChartAnalysis) -> f64 {
    if !kind.is_bar_family() || analysis.category_count == 0 {
        return 0.0;
    }
    // Horizontal bars run categories down the y axis
    let axis_span = if kind == ChartKind::Bar {
        plot.height
    } else {
        plot.width
    };
    let slot = axis_span / analysis.category_count as f64;
    let datasets = analysis.dataset_count.max(1) as f64;
    ((slot - BAR_SLOT_GAP) / datasets).max(1.0)
}

/// Place the legend block adjacent to the plot, inside the margin band
/// that was reserved for it
fn place_legend(legend: &LegendBlock, container: Size, plot: Zone) -> Option<Zone> {
    let position = legend.position?;
    let zone = match position {
        LegendPosition::Bottom => Zone::new(
            (container.width - legend.width).max(0.0) / 2.0,
            plot.bottom() + LEGEND_GAP,
            legend.width,
            legend.height,
        ),
        LegendPosition::Top => Zone::new(
            (container.width - legend.width).max(0.0) / 2.0,
            (plot.y - LEGEND_GAP - legend.height).max(0.0),
            legend.width,
            legend.height,
        ),
        LegendPosition::Left => Zone::new(
            (plot.x - LEGEND_GAP - legend.width).max(0.0),
            plot.y + (plot.height - legend.height).max(0.0) / 2.0,
            legend.width,
            legend.height,
        ),
        LegendPosition::Right => Zone::new(
            plot.right() + LEGEND_GAP,
            plot.y + (plot.height - legend.height).max(0.0) / 2.0,
            legend.width,
            legend.height,
        ),
        LegendPosition::None => return None,
    };
    Some(zone)
}
