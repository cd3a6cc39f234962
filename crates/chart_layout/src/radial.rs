//! Radial layout solver
//!
//! Pie and donut geometry: level-of-detail tiering by plot size,
//! minimum-visual-angle distortion with proportional redistribution,
//! variable donut-band thickness, per-slice internal/external label
//! placement, leader-line generation, and vertical collision relaxation
//! for external labels.
//!
//! Angles start at twelve o'clock (-pi/2) and run clockwise-positive in
//! screen coordinates: a point on a slice edge is
//! `(cx + r*cos(a), cy + r*sin(a))`. External label positions and leader
//! points are relative to the pie center, so a negative x means left of
//! center.

use crate::geometry::{Margins, Point, Size, Zone};
use crate::legend::LegendBlock;
use crate::margins::{self, OverflowReport, BASE_MARGIN_RADIAL, EXPORT_PADDING, LEGEND_GAP};
use crate::ChartAnalysis;
use chart_model::{best_contrast_color, ensure_distinct_colors, ChartKind, ChartMode, ChartSpec, Color, LabelLayout, LegendPosition};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use text_metrics::{CachedMeasurer, FontSpec, RenderTarget, TextMeasurer};

/// Minimum visual angle any nonzero slice is allowed to occupy
pub const MIN_VISUAL_ANGLE: f64 = 20.0 * PI / 180.0;
/// Plot smaller-dimension threshold below which no labels are drawn
pub const LOD_TINY_BELOW: f64 = 150.0;
/// Threshold below which labels are hidden unless forced
pub const LOD_SMALL_BELOW: f64 = 300.0;
/// Outer radius as a share of the plot's half-min-dimension
pub const OUTER_RADIUS_FACTOR: f64 = 0.9;
/// Donut band thickness floor, as a share of the outer radius
pub const DONUT_THICKNESS_FLOOR: f64 = 0.22;
/// Base donut band in infographic mode
pub const DONUT_BAND_INFOGRAPHIC: f64 = 0.35;
/// Base donut band in classic mode
pub const DONUT_BAND_CLASSIC: f64 = 0.40;
/// Fixed pad used by the internal label-fit test
pub const LABEL_FIT_PAD: f64 = 8.0;
/// Category count above which every label goes external
pub const MAX_INTERNAL_CATEGORIES: usize = 8;
/// Horizontal run of the leader-line elbow past the outer radius
pub const LEADER_ELBOW: f64 = 16.0;
/// Minimum vertical gap between adjacent external label blocks
pub const EXTERNAL_LABEL_GAP: f64 = 6.0;

/// Level-of-detail tier driven by the plot's smaller dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadialLod {
    /// No labels at all; the legend carries the information
    Tiny,
    /// Labels hidden unless explicitly forced
    Small,
    Normal,
}

/// Which side of the center an external label lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSide {
    Left,
    Right,
}

/// Where a slice's label ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadialPlacement {
    Internal,
    External,
    Hidden,
}

/// One slice's computed geometry and label placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceLayout {
    /// Category index in input order
    pub index: usize,
    pub label: String,
    pub value: f64,
    /// Proportional angle before minimum-angle correction
    pub natural_angle: f64,
    /// Angle actually drawn; sums to 2*pi across all slices
    pub visual_angle: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub outer_radius: f64,
    /// Zero for pie slices
    pub inner_radius: f64,
    pub color: Color,
    /// Black or white, whichever contrasts with the slice fill
    pub text_color: Color,
    pub placement: RadialPlacement,
    /// Label anchor relative to the pie center; None when hidden
    pub label_position: Option<Point>,
    pub label_lines: Vec<String>,
    /// Leader polyline (center-relative) for external labels
    pub leader: Option<Vec<Point>>,
    pub side: Option<LabelSide>,
}

impl SliceLayout {
    /// Mid angle of the drawn slice
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Radial geometry attached to the computed layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialDetail {
    /// Pie center in container coordinates
    pub center: Point,
    pub outer_radius: f64,
    pub lod: RadialLod,
    pub slices: Vec<SliceLayout>,
}

impl RadialDetail {
    /// True if any slice carries an external label on the given side
    pub fn has_external(&self, side: LabelSide) -> bool {
        self.slices
            .iter()
            .any(|s| s.placement == RadialPlacement::External && s.side == Some(side))
    }
}

/// Full radial solution: margins plus slice geometry
#[derive(Debug, Clone)]
pub struct RadialPlan {
    pub margins: Margins,
    pub legend: LegendBlock,
    pub overflow: Option<OverflowReport>,
    pub detail: RadialDetail,
}

/// Classify the plot size into a level-of-detail tier
pub fn lod_for(plot_min_dimension: f64, show_all: bool) -> RadialLod {
    if show_all {
        return RadialLod::Normal;
    }
    if plot_min_dimension < LOD_TINY_BELOW {
        RadialLod::Tiny
    } else if plot_min_dimension < LOD_SMALL_BELOW {
        RadialLod::Small
    } else {
        RadialLod::Normal
    }
}

/// Compute visual angles with the minimum-angle floor
///
/// Slices under the floor get exactly the floor; the remaining budget is
/// redistributed over the other slices by their share of the non-tiny
/// value sum. Intentional distortion: strict proportionality is traded
/// for guaranteed visibility of small categories. When the floor cannot
/// be honored (too many tiny slices) the natural proportional angles are
/// kept unchanged.
pub fn compute_visual_angles(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let clamped: Vec<f64> = values.iter().map(|v| v.max(0.0)).collect();
    let total: f64 = clamped.iter().sum();
    if total <= 0.0 {
        return vec![TAU / n as f64; n];
    }

    let natural: Vec<f64> = clamped.iter().map(|v| v / total * TAU).collect();
    let tiny: Vec<bool> = natural.iter().map(|a| *a < MIN_VISUAL_ANGLE).collect();
    let tiny_count = tiny.iter().filter(|t| **t).count();
    if tiny_count == 0 {
        return natural;
    }

    let budget = TAU - tiny_count as f64 * MIN_VISUAL_ANGLE;
    let non_tiny_sum: f64 = clamped
        .iter()
        .zip(&tiny)
        .filter(|(_, t)| !**t)
        .map(|(v, _)| *v)
        .sum();
    if budget <= 0.0 || non_tiny_sum <= 0.0 {
        return natural;
    }

    clamped
        .iter()
        .zip(&tiny)
        .map(|(v, t)| {
            if *t {
                MIN_VISUAL_ANGLE
            } else {
                v / non_tiny_sum * budget
            }
        })
        .collect()
}

/// Per-slice donut inner radius
///
/// Classic donuts use a uniform band; infographic donuts scale the band
/// by the slice's share of the maximum value, floored so no segment
/// collapses to a sliver.
fn inner_radius(kind: ChartKind, mode: ChartMode, outer: f64, value: f64, max_value: f64) -> f64 {
    if kind != ChartKind::Donut {
        return 0.0;
    }
    match mode {
        ChartMode::Classic => outer - outer * DONUT_BAND_CLASSIC,
        ChartMode::Infographic => {
            let band = (value / max_value) * outer * DONUT_BAND_INFOGRAPHIC;
            outer - band.max(outer * DONUT_THICKNESS_FLOOR)
        }
    }
}

/// Side assignment for an external label
///
/// `radial` splits by the natural (pre-distortion) mid angle's sweep
/// half; `balanced` splits by the cosine sign of the drawn mid angle.
/// The two can disagree near the vertical boundary; both behaviors are
/// kept.
fn side_for(strategy: LabelLayout, natural_mid: f64, visual_mid: f64) -> LabelSide {
    match strategy {
        LabelLayout::ColumnLeft => LabelSide::Left,
        LabelLayout::ColumnRight => LabelSide::Right,
        LabelLayout::Radial => {
            // Normalize the natural mid into [-pi/2, 3pi/2) and split at
            // the vertical axis
            let a = (natural_mid + PI / 2.0).rem_euclid(TAU) - PI / 2.0;
            if a < PI / 2.0 {
                LabelSide::Right
            } else {
                LabelSide::Left
            }
        }
        LabelLayout::Balanced => {
            if visual_mid.cos() >= 0.0 {
                LabelSide::Right
            } else {
                LabelSide::Left
            }
        }
    }
}

struct ExternalItem {
    slice: usize,
    y: f64,
    height: f64,
}

/// Forward-then-backward vertical relaxation of one side's labels
///
/// Items must be sorted by natural y. The forward pass pushes labels
/// down to honor the minimum gap; the backward pass pulls the chain up
/// when the last label would clip the extent. Relative order is
/// preserved, so leader lines never cross.
fn relax_column(items: &mut [ExternalItem], max_extent: f64) {
    for i in 1..items.len() {
        let min_y = items[i - 1].y
            + (items[i - 1].height + items[i].height) / 2.0
            + EXTERNAL_LABEL_GAP;
        if items[i].y < min_y {
            items[i].y = min_y;
        }
    }
    if let Some(last) = items.last_mut() {
        let limit = max_extent - last.height / 2.0;
        if last.y > limit {
            last.y = limit;
        }
    }
    for i in (0..items.len().saturating_sub(1)).rev() {
        let max_y = items[i + 1].y
            - (items[i].height + items[i + 1].height) / 2.0
            - EXTERNAL_LABEL_GAP;
        if items[i].y > max_y {
            items[i].y = max_y;
        }
    }
}

/// Lay out all slices against a plot zone
fn layout_slices<M: TextMeasurer>(
    chart: &ChartSpec,
    analysis: &ChartAnalysis,
    plot: Zone,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> RadialDetail {
    let center = plot.center();
    let outer = (plot.min_dimension() / 2.0 * OUTER_RADIUS_FACTOR).max(0.0);
    let info = &chart.style.infographic;
    let lod = lod_for(plot.min_dimension(), info.show_all_labels);

    let values: Vec<f64> = chart
        .data
        .datasets
        .first()
        .map(|d| d.values.clone())
        .unwrap_or_default();
    let n = values.len();
    let visual = compute_visual_angles(&values);
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    let max_value = values.iter().copied().fold(f64::MIN, f64::max).max(1.0);
    let colors = ensure_distinct_colors(&chart.style.palette, n);

    let min_internal_angle = if info.label_layout.is_columnar() {
        60.0 * PI / 180.0
    } else {
        30.0 * PI / 180.0
    };

    let fmt = &chart.style.number_format;
    let mut slices = Vec::with_capacity(n);
    let mut start = -PI / 2.0;
    let mut natural_start = -PI / 2.0;

    for (i, &value) in values.iter().enumerate() {
        let visual_angle = visual.get(i).copied().unwrap_or(0.0);
        let natural_angle = if total > 0.0 {
            value.max(0.0) / total * TAU
        } else {
            TAU / n as f64
        };
        let end = start + visual_angle;
        let mid = (start + end) / 2.0;
        let natural_mid = natural_start + natural_angle / 2.0;

        let label = chart.data.labels.get(i).cloned().unwrap_or_default();
        let ir = inner_radius(chart.kind, chart.style.mode, outer, value.max(0.0), max_value);
        let color = colors.get(i).copied().unwrap_or(Color::BLACK);
        let text_color = best_contrast_color(color);

        let mut label_lines = Vec::new();
        if info.show_category_label && !label.is_empty() {
            label_lines.push(label.clone());
        }
        label_lines.push(fmt.format(value));

        let label_width = label_lines
            .iter()
            .map(|l| measurer.measure_width(l, font, target))
            .fold(0.0, f64::max);
        let line_height = measurer.measure("Mg", font, target).height;
        let label_height = line_height * label_lines.len() as f64;

        let hidden = match lod {
            RadialLod::Tiny => true,
            RadialLod::Small => !info.show_all_labels,
            RadialLod::Normal => false,
        };

        let (placement, label_position, leader, side) = if hidden {
            (RadialPlacement::Hidden, None, None, None)
        } else {
            let mid_radius = (ir + outer) / 2.0;
            let arc_width = visual_angle * mid_radius;
            let band = outer - ir;
            let fits_internal = arc_width > label_width + LABEL_FIT_PAD
                && band > label_height + LABEL_FIT_PAD
                && visual_angle >= min_internal_angle
                && analysis.category_count <= MAX_INTERNAL_CATEGORIES;

            if fits_internal {
                let pos = Point::new(mid.cos() * mid_radius, mid.sin() * mid_radius);
                (RadialPlacement::Internal, Some(pos), None, None)
            } else {
                let side = side_for(info.label_layout, natural_mid, mid);
                let sign = match side {
                    LabelSide::Left => -1.0,
                    LabelSide::Right => 1.0,
                };
                let elbow_x = sign * (outer + LEADER_ELBOW);
                let y = mid.sin() * (outer + LEADER_ELBOW);
                let anchor_x = match side {
                    LabelSide::Right => elbow_x + LABEL_FIT_PAD,
                    LabelSide::Left => elbow_x - LABEL_FIT_PAD - label_width,
                };
                let attach = Point::new(mid.cos() * outer, mid.sin() * outer);
                let leader = vec![attach, Point::new(elbow_x, y), Point::new(anchor_x, y)];
                (
                    RadialPlacement::External,
                    Some(Point::new(anchor_x, y)),
                    Some(leader),
                    Some(side),
                )
            }
        };

        slices.push(SliceLayout {
            index: i,
            label,
            value,
            natural_angle,
            visual_angle,
            start_angle: start,
            end_angle: end,
            outer_radius: outer,
            inner_radius: ir,
            color,
            text_color,
            placement,
            label_position,
            label_lines,
            leader,
            side,
        });

        start = end;
        natural_start += natural_angle;
    }

    // Vertical collision relaxation, one side at a time
    let line_height = measurer.measure("Mg", font, target).height;
    for side in [LabelSide::Left, LabelSide::Right] {
        let mut items: Vec<ExternalItem> = slices
            .iter()
            .enumerate()
            .filter(|(_, s)| s.placement == RadialPlacement::External && s.side == Some(side))
            .map(|(idx, s)| ExternalItem {
                slice: idx,
                y: s.label_position.map(|p| p.y).unwrap_or(0.0),
                height: line_height * s.label_lines.len() as f64,
            })
            .collect();
        if items.len() < 2 {
            continue;
        }
        items.sort_by(|a, b| a.y.total_cmp(&b.y));
        relax_column(&mut items, plot.height / 2.0);
        for item in items {
            let slice = &mut slices[item.slice];
            if let Some(pos) = slice.label_position.as_mut() {
                pos.y = item.y;
            }
            if let Some(leader) = slice.leader.as_mut() {
                if leader.len() == 3 {
                    leader[1].y = item.y;
                    leader[2].y = item.y;
                }
            }
        }
    }

    RadialDetail {
        center,
        outer_radius: outer,
        lod,
        slices,
    }
}

/// Solve a pie/donut chart: margins (two-pass, with external-column
/// reservation and reclaim) plus slice geometry
pub fn solve_radial<M: TextMeasurer>(
    chart: &ChartSpec,
    analysis: &ChartAnalysis,
    space: Size,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
    legend: LegendBlock,
) -> RadialPlan {
    // Radial charts start from four equal margins
    let mut margins = Margins::uniform(BASE_MARGIN_RADIAL);
    match legend.position {
        Some(LegendPosition::Bottom) => margins.bottom += legend.height + LEGEND_GAP,
        Some(LegendPosition::Top) => margins.top += legend.height + LEGEND_GAP,
        Some(LegendPosition::Left) => margins.left += legend.width + LEGEND_GAP,
        Some(LegendPosition::Right) => margins.right += legend.width + LEGEND_GAP,
        _ => {}
    }
    if chart.title.is_some() {
        // Same title band the cartesian path reserves
        let title_font = FontSpec::new(
            chart.style.font_family.clone(),
            font.size * margins::TITLE_FONT_FACTOR,
        );
        let h = measurer.measure("Mg", &title_font, target).height;
        margins.top += h + margins::TITLE_PADDING;
    }
    if target == RenderTarget::Pdf {
        margins.expand_all(EXPORT_PADDING);
    }

    // First pass decides which sides need an external label column
    let preliminary = layout_slices(chart, analysis, margins.plot_zone(space), font, measurer, target);

    let column = margins::external_column_width(space.width);
    let mut widened = false;
    if preliminary.has_external(LabelSide::Left) && margins.left < column {
        margins.left = column;
        widened = true;
    }
    if preliminary.has_external(LabelSide::Right) && margins.right < column {
        margins.right = column;
        widened = true;
    }
    // No externals: margins collapse back to the tight defaults above
    // (reclaim), even when a columnar layout was requested.

    let overflow = margins::overflow_pass(&mut margins, space);

    let detail = if widened || overflow.is_some() {
        layout_slices(chart, analysis, margins.plot_zone(space), font, measurer, target)
    } else {
        preliminary
    };

    tracing::debug!(
        lod = ?detail.lod,
        slices = detail.slices.len(),
        externals = detail
            .slices
            .iter()
            .filter(|s| s.placement == RadialPlacement::External)
            .count(),
        "radial layout solved"
    );

    RadialPlan {
        margins,
        legend,
        overflow,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, label_font};
    use chart_model::{ChartSpec, Dataset, GridConfig};
    use proptest::prelude::*;
    use text_metrics::CharClassMeasurer;

    fn measurer() -> CachedMeasurer<CharClassMeasurer> {
        CachedMeasurer::new(CharClassMeasurer::new())
    }

    fn pie(labels: Vec<&str>, values: Vec<f64>) -> ChartSpec {
        let mut chart = ChartSpec::new(ChartKind::Pie)
            .with_labels(labels.iter().map(|s| s.to_string()).collect());
        chart.add_dataset(Dataset::new("share", values));
        chart
    }

    fn solve(chart: &ChartSpec, width: f64, height: f64) -> RadialPlan {
        let grid = GridConfig::default();
        let mut m = measurer();
        let analysis = analyze(chart, &grid, &mut m, RenderTarget::Screen);
        let font = label_font(chart, &grid);
        solve_radial(
            chart,
            &analysis,
            Size::new(width, height),
            &font,
            &mut m,
            RenderTarget::Screen,
            LegendBlock::default(),
        )
    }

    #[test]
    fn test_tiny_slice_pinned_to_floor() {
        let angles = compute_visual_angles(&[1.0, 1000.0]);
        assert!((angles[0] - MIN_VISUAL_ANGLE).abs() < 0.05);
        assert!((angles[1] - (TAU - MIN_VISUAL_ANGLE)).abs() < 0.05);
    }

    #[test]
    fn test_no_floor_when_all_large() {
        let angles = compute_visual_angles(&[1.0, 1.0, 1.0, 1.0]);
        for a in &angles {
            assert!((a - TAU / 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_total_splits_evenly() {
        let angles = compute_visual_angles(&[0.0, 0.0, 0.0]);
        for a in &angles {
            assert!((a - TAU / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_too_many_tiny_falls_back_to_natural() {
        // 20 equal slices: every natural angle (18 deg) is under the floor
        // and the budget cannot be honored, so natural angles are kept
        let values = vec![1.0; 20];
        let angles = compute_visual_angles(&values);
        let sum: f64 = angles.iter().sum();
        assert!((sum - TAU).abs() < 1e-9);
        assert!((angles[0] - TAU / 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_lod_tiers() {
        assert_eq!(lod_for(100.0, false), RadialLod::Tiny);
        assert_eq!(lod_for(200.0, false), RadialLod::Small);
        assert_eq!(lod_for(400.0, false), RadialLod::Normal);
        assert_eq!(lod_for(100.0, true), RadialLod::Normal);
    }

    #[test]
    fn test_tiny_plot_hides_all_labels() {
        let chart = pie(vec!["a", "b"], vec![1.0, 2.0]);
        let plan = solve(&chart, 200.0, 200.0);
        assert_eq!(plan.detail.lod, RadialLod::Tiny);
        for slice in &plan.detail.slices {
            assert_eq!(slice.placement, RadialPlacement::Hidden);
        }
    }

    #[test]
    fn test_classic_donut_uniform_band() {
        let mut chart = pie(vec!["a", "b"], vec![1.0, 3.0]);
        chart.kind = ChartKind::Donut;
        let plan = solve(&chart, 600.0, 500.0);
        let ir0 = plan.detail.slices[0].inner_radius;
        let ir1 = plan.detail.slices[1].inner_radius;
        assert!((ir0 - ir1).abs() < 1e-9);
        assert!(ir0 > 0.0);
    }

    #[test]
    fn test_infographic_donut_variable_band_with_floor() {
        let mut chart = pie(vec!["a", "b"], vec![1.0, 100.0]);
        chart.kind = ChartKind::Donut;
        chart.style.mode = ChartMode::Infographic;
        let plan = solve(&chart, 600.0, 500.0);
        let outer = plan.detail.outer_radius;
        let band0 = outer - plan.detail.slices[0].inner_radius;
        let band1 = outer - plan.detail.slices[1].inner_radius;
        // The large slice carries the full base band; the small one sits
        // on the integrity floor
        assert!(band1 > band0);
        assert!((band0 - outer * DONUT_THICKNESS_FLOOR).abs() < 1e-9);
        assert!((band1 - outer * DONUT_BAND_INFOGRAPHIC).abs() < 1e-9);
    }

    #[test]
    fn test_column_left_places_all_externals_left_of_center() {
        let labels: Vec<String> = (0..12).map(|i| format!("Category {i}")).collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let mut chart = pie(label_refs, vec![10.0; 12]);
        chart.style.infographic.label_layout = LabelLayout::ColumnLeft;
        chart.style.infographic.show_all_labels = true;
        let plan = solve(&chart, 800.0, 600.0);
        let externals: Vec<_> = plan
            .detail
            .slices
            .iter()
            .filter(|s| s.placement == RadialPlacement::External)
            .collect();
        assert!(!externals.is_empty());
        for slice in &externals {
            assert_eq!(slice.side, Some(LabelSide::Left));
            assert!(slice.label_position.unwrap().x < 0.0);
        }
        // Reserved left column widens the left margin
        assert!(plan.margins.left >= margins::EXTERNAL_COLUMN_MIN);
    }

    #[test]
    fn test_single_huge_slice_reclaims_column_margin() {
        let mut chart = pie(vec!["Everything"], vec![1000.0]);
        chart.style.infographic.label_layout = LabelLayout::ColumnLeft;
        let plan = solve(&chart, 800.0, 600.0);
        assert_eq!(plan.detail.slices[0].placement, RadialPlacement::Internal);
        assert!(plan.margins.left < 100.0);
    }

    #[test]
    fn test_balanced_splits_by_cosine_sign() {
        let labels: Vec<String> = (0..10).map(|i| format!("Slice number {i}")).collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let mut chart = pie(label_refs, vec![10.0; 10]);
        chart.style.infographic.label_layout = LabelLayout::Balanced;
        chart.style.infographic.show_all_labels = true;
        let plan = solve(&chart, 800.0, 600.0);
        for slice in &plan.detail.slices {
            if slice.placement == RadialPlacement::External {
                let expected = if slice.mid_angle().cos() >= 0.0 {
                    LabelSide::Right
                } else {
                    LabelSide::Left
                };
                assert_eq!(slice.side, Some(expected));
            }
        }
    }

    #[test]
    fn test_relaxation_keeps_gap_and_order() {
        let mut items = vec![
            ExternalItem { slice: 0, y: -10.0, height: 20.0 },
            ExternalItem { slice: 1, y: -8.0, height: 20.0 },
            ExternalItem { slice: 2, y: -6.0, height: 20.0 },
        ];
        relax_column(&mut items, 300.0);
        for pair in items.windows(2) {
            let gap = pair[1].y - pair[0].y;
            assert!(gap >= (pair[0].height + pair[1].height) / 2.0 + EXTERNAL_LABEL_GAP - 1e-9);
        }
    }

    #[test]
    fn test_relaxation_respects_bottom_extent() {
        let mut items = vec![
            ExternalItem { slice: 0, y: 90.0, height: 20.0 },
            ExternalItem { slice: 1, y: 95.0, height: 20.0 },
            ExternalItem { slice: 2, y: 98.0, height: 20.0 },
        ];
        relax_column(&mut items, 100.0);
        let last = items.last().unwrap();
        assert!(last.y + last.height / 2.0 <= 100.0 + 1e-9);
        assert!(items[0].y < items[1].y && items[1].y < items[2].y);
    }

    #[test]
    fn test_slice_angles_start_at_twelve_oclock() {
        let chart = pie(vec!["a", "b"], vec![1.0, 1.0]);
        let plan = solve(&chart, 600.0, 500.0);
        assert!((plan.detail.slices[0].start_angle + PI / 2.0).abs() < 1e-9);
        assert!((plan.detail.slices.last().unwrap().end_angle - 3.0 * PI / 2.0).abs() < 1e-9);
    }

    proptest! {
        /// Visual angles always sum to a full turn
        #[test]
        fn prop_angle_conservation(values in proptest::collection::vec(0.0f64..1000.0, 1..20)) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let angles = compute_visual_angles(&values);
            let sum: f64 = angles.iter().sum();
            prop_assert!((sum - TAU).abs() < 1e-6);
        }

        /// Every sub-floor slice gets exactly the floor when the budget allows
        #[test]
        fn prop_minimum_angle_enforced(big in 100.0f64..10000.0, small in 0.01f64..1.0) {
            let angles = compute_visual_angles(&[small, big]);
            prop_assert!((angles[0] - MIN_VISUAL_ANGLE).abs() < 1e-9);
        }
    }
}
