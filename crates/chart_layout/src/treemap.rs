//! Treemap layout solver
//!
//! Squarified rectangle partition plus a per-rectangle label-fit search
//! across descending font multipliers, with a density-limited column of
//! external labels for rectangles whose labels cannot be drawn inside.

use crate::geometry::{Margins, Point, Size, Zone};
use crate::legend::LegendBlock;
use crate::margins::{self, OverflowReport, BASE_MARGIN_RADIAL, EXPORT_PADDING, LEGEND_GAP};
use crate::wrap;
use chart_model::{best_contrast_color, ensure_distinct_colors, ChartMode, ChartSpec, Color, LegendPosition};
use serde::{Deserialize, Serialize};
use text_metrics::{CachedMeasurer, FontSpec, RenderTarget, TextMeasurer};

/// Inner padding between a rectangle's edge and its label block
pub const RECT_PADDING: f64 = 6.0;
/// Minimum rectangle area eligible for an external label
pub const MIN_EXTERNAL_AREA: f64 = 900.0;
/// Minimum occupied height per external column entry
pub const MIN_EXTERNAL_ITEM_HEIGHT: f64 = 20.0;
/// Vertical gap between external column entries
pub const EXTERNAL_ITEM_GAP: f64 = 8.0;

/// Font multipliers tried for hero rectangles and infographic mode
const EMPHASIS_MULTIPLIERS: [f64; 6] = [2.0, 1.6, 1.3, 1.0, 0.85, 0.7];
/// Font multipliers tried for everything else
const NORMAL_MULTIPLIERS: [f64; 4] = [1.2, 1.0, 0.85, 0.7];

/// Where a rectangle's label ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreemapPlacement {
    Internal,
    External,
    Hidden,
}

/// One category's computed rectangle and label placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreemapRect {
    /// Category index in input order
    pub index: usize,
    pub label: String,
    pub value: f64,
    /// Rectangle in container coordinates
    pub zone: Zone,
    pub color: Color,
    pub text_color: Color,
    pub placement: TreemapPlacement,
    /// Accepted font multiplier for internal labels
    pub font_multiplier: Option<f64>,
    pub label_lines: Vec<String>,
    /// Label anchor in container coordinates; None when hidden
    pub label_position: Option<Point>,
    /// Leader polyline for external labels
    pub leader: Option<Vec<Point>>,
}

/// Treemap geometry attached to the computed layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreemapDetail {
    pub rects: Vec<TreemapRect>,
    /// Reserved external label column, when any label went external
    pub external_column: Option<Zone>,
}

impl TreemapDetail {
    pub fn has_external(&self) -> bool {
        self.rects
            .iter()
            .any(|r| r.placement == TreemapPlacement::External)
    }
}

/// Full treemap solution: margins plus rectangle geometry
#[derive(Debug, Clone)]
pub struct TreemapPlan {
    pub margins: Margins,
    pub legend: LegendBlock,
    pub overflow: Option<OverflowReport>,
    pub detail: TreemapDetail,
}

/// Worst aspect ratio in a row of areas laid against side length `w`
fn worst_aspect(areas: &[f64], w: f64) -> f64 {
    let sum: f64 = areas.iter().sum();
    if sum <= 0.0 || w <= 0.0 {
        return f64::INFINITY;
    }
    let max_a = areas.iter().copied().fold(f64::MIN, f64::max);
    let min_a = areas.iter().copied().fold(f64::MAX, f64::min);
    let s2 = sum * sum;
    let w2 = w * w;
    (w2 * max_a / s2).max(s2 / (w2 * min_a))
}

/// Squarified partition of `(index, value)` pairs into a zone
///
/// Callers pass values sorted descending; rows grow while the next item
/// does not worsen the row's worst aspect ratio, then lay out along the
/// remaining rectangle's shorter side.
pub fn squarify(items: &[(usize, f64)], zone: Zone) -> Vec<(usize, Zone)> {
    let total: f64 = items.iter().map(|(_, v)| v).sum();
    if items.is_empty() || total <= 0.0 || zone.area() <= 0.0 {
        return Vec::new();
    }
    let scale = zone.area() / total;

    let mut out = Vec::with_capacity(items.len());
    let mut remaining = zone;
    let mut row: Vec<(usize, f64)> = Vec::new();

    let lay_row = |row: &[(usize, f64)], remaining: &mut Zone, out: &mut Vec<(usize, Zone)>| {
        let sum: f64 = row.iter().map(|(_, a)| a).sum();
        if sum <= 0.0 {
            return;
        }
        if remaining.width >= remaining.height {
            // Row is a vertical strip on the left edge
            let strip_w = sum / remaining.height.max(1e-9);
            let mut y = remaining.y;
            for (idx, area) in row {
                let h = area / strip_w;
                out.push((*idx, Zone::new(remaining.x, y, strip_w, h)));
                y += h;
            }
            remaining.x += strip_w;
            remaining.width = (remaining.width - strip_w).max(0.0);
        } else {
            // Row is a horizontal strip along the top edge
            let strip_h = sum / remaining.width.max(1e-9);
            let mut x = remaining.x;
            for (idx, area) in row {
                let w = area / strip_h;
                out.push((*idx, Zone::new(x, remaining.y, w, strip_h)));
                x += w;
            }
            remaining.y += strip_h;
            remaining.height = (remaining.height - strip_h).max(0.0);
        }
    };

    for (idx, value) in items {
        let area = value * scale;
        let side = remaining.min_dimension();
        if row.is_empty() {
            row.push((*idx, area));
            continue;
        }
        let current: Vec<f64> = row.iter().map(|(_, a)| *a).collect();
        let mut candidate = current.clone();
        candidate.push(area);
        if worst_aspect(&candidate, side) <= worst_aspect(&current, side) {
            row.push((*idx, area));
        } else {
            lay_row(&row, &mut remaining, &mut out);
            row.clear();
            row.push((*idx, area));
        }
    }
    lay_row(&row, &mut remaining, &mut out);
    out
}

/// Point on the plot edge nearest to a rectangle center, by axis distance
fn nearest_edge_point(center: Point, plot: Zone) -> Point {
    let d_left = center.x - plot.x;
    let d_right = plot.right() - center.x;
    let d_top = center.y - plot.y;
    let d_bottom = plot.bottom() - center.y;
    let min = d_left.min(d_right).min(d_top).min(d_bottom);
    if min == d_left {
        Point::new(plot.x, center.y)
    } else if min == d_right {
        Point::new(plot.right(), center.y)
    } else if min == d_top {
        Point::new(center.x, plot.y)
    } else {
        Point::new(center.x, plot.bottom())
    }
}

struct FitResult {
    multiplier: f64,
    lines: Vec<String>,
    block_height: f64,
}

/// Try font multipliers in descending order until the wrapped label block
/// fits inside the rectangle minus padding
fn fit_label<M: TextMeasurer>(
    label: &str,
    rect: Zone,
    base_font: &FontSpec,
    emphasized: bool,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> Option<FitResult> {
    let multipliers: &[f64] = if emphasized {
        &EMPHASIS_MULTIPLIERS
    } else {
        &NORMAL_MULTIPLIERS
    };
    let avail_w = rect.width - 2.0 * RECT_PADDING;
    let avail_h = rect.height - 2.0 * RECT_PADDING;
    if avail_w <= 0.0 || avail_h <= 0.0 || label.is_empty() {
        return None;
    }

    for &mult in multipliers {
        let font = base_font.scaled(mult);
        let wrapped = wrap::wrap_label(label, avail_w, &font, measurer, target, wrap::MAX_WORDS_PER_LINE);
        let line_height = measurer.measure("Mg", &font, target).height;
        let block_height = line_height * wrapped.line_count() as f64;
        if wrapped.width <= avail_w && block_height <= avail_h {
            return Some(FitResult {
                multiplier: mult,
                lines: wrapped.lines,
                block_height,
            });
        }
    }
    None
}

/// Lay out the treemap against a plot zone
fn layout_rects<M: TextMeasurer>(
    chart: &ChartSpec,
    plot: Zone,
    column: Option<Zone>,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> TreemapDetail {
    let info = &chart.style.infographic;
    let values: Vec<f64> = chart
        .data
        .datasets
        .first()
        .map(|d| d.values.clone())
        .unwrap_or_default();

    // Only positive values partition area
    let mut items: Vec<(usize, f64)> = values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| *v > 0.0)
        .collect();
    items.sort_by(|a, b| b.1.total_cmp(&a.1));

    let placed = squarify(&items, plot);
    let colors = ensure_distinct_colors(&chart.style.palette, values.len());
    let hero = info.hero_index.or_else(|| items.first().map(|(i, _)| *i));
    let infographic = chart.style.mode == ChartMode::Infographic;

    let mut rects: Vec<TreemapRect> = Vec::with_capacity(placed.len());
    for (idx, zone) in placed {
        let label = chart.data.labels.get(idx).cloned().unwrap_or_default();
        let value = values[idx];
        let color = colors.get(idx).copied().unwrap_or(Color::BLACK);
        let emphasized = infographic || hero == Some(idx);
        let fit = fit_label(&label, zone, font, emphasized, measurer, target);

        let (placement, font_multiplier, label_lines, label_position) = match fit {
            Some(fit) => (
                TreemapPlacement::Internal,
                Some(fit.multiplier),
                fit.lines,
                Some(zone.center()),
            ),
            None => {
                let eligible =
                    zone.area() >= MIN_EXTERNAL_AREA || hero == Some(idx) || info.show_all_labels;
                if eligible && !label.is_empty() {
                    (TreemapPlacement::External, None, vec![label.clone()], None)
                } else {
                    (TreemapPlacement::Hidden, None, Vec::new(), None)
                }
            }
        };

        rects.push(TreemapRect {
            index: idx,
            label,
            value,
            zone,
            color,
            text_color: best_contrast_color(color),
            placement,
            font_multiplier,
            label_lines,
            label_position,
            leader: None,
        });
    }

    place_external_column(&mut rects, plot, column, hero, font, measurer, target);

    TreemapDetail {
        rects,
        external_column: column,
    }
}

/// Density-limited external column
///
/// Candidates are ranked hero-first then by value descending and admitted
/// greedily up to the column height; the rest are suppressed. Admitted
/// items are re-sorted by their rectangle's vertical position and
/// centered as a block within the plot's vertical span.
fn place_external_column<M: TextMeasurer>(
    rects: &mut [TreemapRect],
    plot: Zone,
    column: Option<Zone>,
    hero: Option<usize>,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) {
    let Some(column) = column else {
        // No column reserved yet (first pass); external candidates keep
        // their placement so the caller knows to reserve one.
        return;
    };

    let mut candidates: Vec<usize> = rects
        .iter()
        .enumerate()
        .filter(|(_, r)| r.placement == TreemapPlacement::External)
        .map(|(i, _)| i)
        .collect();
    candidates.sort_by(|&a, &b| {
        let a_hero = hero == Some(rects[a].index);
        let b_hero = hero == Some(rects[b].index);
        b_hero
            .cmp(&a_hero)
            .then_with(|| rects[b].value.total_cmp(&rects[a].value))
    });

    let wrap_width = (column.width - EXTERNAL_ITEM_GAP).max(1.0);
    let mut admitted: Vec<(usize, Vec<String>, f64)> = Vec::new();
    let mut used = 0.0;
    let mut suppressed = 0usize;
    for i in candidates {
        let wrapped = wrap::wrap_label(
            &rects[i].label,
            wrap_width,
            font,
            measurer,
            target,
            wrap::MAX_WORDS_PER_LINE,
        );
        let line_height = measurer.measure("Mg", font, target).height;
        let block = (line_height * wrapped.line_count() as f64).max(MIN_EXTERNAL_ITEM_HEIGHT);
        let occupied = block + EXTERNAL_ITEM_GAP;
        // The hero is never suppressed, even over budget
        if used + occupied <= column.height || hero == Some(rects[i].index) {
            used += occupied;
            admitted.push((i, wrapped.lines, block));
        } else {
            rects[i].placement = TreemapPlacement::Hidden;
            rects[i].label_lines = Vec::new();
            suppressed += 1;
        }
    }
    if suppressed > 0 {
        tracing::warn!(suppressed, "external treemap labels suppressed by density limit");
    }

    // Re-sort by rectangle vertical position and center the block
    admitted.sort_by(|a, b| rects[a.0].zone.center_y().total_cmp(&rects[b.0].zone.center_y()));
    let total: f64 = admitted.iter().map(|(_, _, h)| h + EXTERNAL_ITEM_GAP).sum::<f64>()
        - if admitted.is_empty() { 0.0 } else { EXTERNAL_ITEM_GAP };
    let mut y = plot.y + ((plot.height - total) / 2.0).max(0.0);

    for (i, lines, block) in admitted {
        let slot = Point::new(column.x + EXTERNAL_ITEM_GAP, y + block / 2.0);
        let center = rects[i].zone.center();
        let edge = nearest_edge_point(center, plot);
        rects[i].label_lines = lines;
        rects[i].label_position = Some(slot);
        rects[i].leader = Some(vec![center, edge, slot]);
        y += block + EXTERNAL_ITEM_GAP;
    }
}

/// Solve a treemap chart: margins (two-pass, reserving a right-hand
/// external column when needed) plus rectangle geometry
pub fn solve_treemap<M: TextMeasurer>(
    chart: &ChartSpec,
    space: Size,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
    legend: LegendBlock,
) -> TreemapPlan {
    let mut margins = Margins::uniform(BASE_MARGIN_RADIAL);
    match legend.position {
        Some(LegendPosition::Bottom) => margins.bottom += legend.height + LEGEND_GAP,
        Some(LegendPosition::Top) => margins.top += legend.height + LEGEND_GAP,
        Some(LegendPosition::Left) => margins.left += legend.width + LEGEND_GAP,
        Some(LegendPosition::Right) => margins.right += legend.width + LEGEND_GAP,
        _ => {}
    }
    if chart.title.is_some() {
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

    // First pass without a column decides whether one is needed
    let preliminary = layout_rects(chart, margins.plot_zone(space), None, font, measurer, target);

    let mut overflow = None;
    let detail = if preliminary.has_external() {
        margins.right = margins.right.max(margins::external_column_width(space.width));
        overflow = margins::overflow_pass(&mut margins, space);
        let plot = margins.plot_zone(space);
        let column = Zone::new(
            plot.right(),
            plot.y,
            (space.width - plot.right() - EXTERNAL_ITEM_GAP).max(0.0),
            plot.height,
        );
        layout_rects(chart, plot, Some(column), font, measurer, target)
    } else {
        preliminary
    };

    tracing::debug!(
        rects = detail.rects.len(),
        externals = detail
            .rects
            .iter()
            .filter(|r| r.placement == TreemapPlacement::External)
            .count(),
        "treemap layout solved"
    );

    TreemapPlan {
        margins,
        legend,
        overflow,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_model::{ChartKind, ChartSpec, Dataset, GridConfig};
    use crate::analysis::label_font;
    use proptest::prelude::*;
    use text_metrics::CharClassMeasurer;

    fn measurer() -> CachedMeasurer<CharClassMeasurer> {
        CachedMeasurer::new(CharClassMeasurer::new())
    }

    fn treemap(labels: Vec<&str>, values: Vec<f64>) -> ChartSpec {
        let mut chart = ChartSpec::new(ChartKind::Treemap)
            .with_labels(labels.iter().map(|s| s.to_string()).collect());
        chart.add_dataset(Dataset::new("size", values));
        chart
    }

    fn solve(chart: &ChartSpec, width: f64, height: f64) -> TreemapPlan {
        let grid = GridConfig::default();
        let mut m = measurer();
        let font = label_font(chart, &grid);
        solve_treemap(
            chart,
            Size::new(width, height),
            &font,
            &mut m,
            RenderTarget::Screen,
            LegendBlock::default(),
        )
    }

    #[test]
    fn test_squarify_conserves_area() {
        let zone = Zone::new(0.0, 0.0, 400.0, 300.0);
        let items = vec![(0, 6.0), (1, 5.0), (2, 4.0), (3, 3.0), (4, 2.0), (5, 1.0)];
        let placed = squarify(&items, zone);
        assert_eq!(placed.len(), 6);
        let total: f64 = placed.iter().map(|(_, z)| z.area()).sum();
        assert!((total - zone.area()).abs() < 1e-6);
    }

    #[test]
    fn test_squarify_rect_proportional_to_value() {
        let zone = Zone::new(0.0, 0.0, 200.0, 200.0);
        let placed = squarify(&[(0, 3.0), (1, 1.0)], zone);
        let a0 = placed.iter().find(|(i, _)| *i == 0).unwrap().1.area();
        let a1 = placed.iter().find(|(i, _)| *i == 1).unwrap().1.area();
        assert!((a0 / a1 - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_squarify_empty_and_nonpositive() {
        let zone = Zone::new(0.0, 0.0, 100.0, 100.0);
        assert!(squarify(&[], zone).is_empty());
        assert!(squarify(&[(0, 0.0)], zone).is_empty());
    }

    #[test]
    fn test_nonpositive_values_excluded() {
        let chart = treemap(vec!["a", "b", "c"], vec![10.0, -5.0, 0.0]);
        let plan = solve(&chart, 600.0, 400.0);
        assert_eq!(plan.detail.rects.len(), 1);
        assert_eq!(plan.detail.rects[0].index, 0);
    }

    #[test]
    fn test_large_rects_get_internal_labels() {
        let chart = treemap(vec!["Alpha", "Beta"], vec![3.0, 2.0]);
        let plan = solve(&chart, 800.0, 600.0);
        for rect in &plan.detail.rects {
            assert_eq!(rect.placement, TreemapPlacement::Internal);
            assert!(rect.font_multiplier.is_some());
        }
        assert!(plan.detail.external_column.is_none());
    }

    #[test]
    fn test_hero_gets_larger_multiplier_set() {
        let labels: Vec<String> = (0..5).map(|i| format!("L{i}")).collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let chart = treemap(label_refs, vec![50.0, 10.0, 5.0, 3.0, 2.0]);
        let plan = solve(&chart, 800.0, 600.0);
        let hero = plan.detail.rects.iter().find(|r| r.index == 0).unwrap();
        // The largest value is the default hero; its short label fits at
        // the top emphasis multiplier
        assert_eq!(hero.font_multiplier, Some(2.0));
    }

    #[test]
    fn test_unfittable_label_goes_external_with_leader() {
        let long = "An unreasonably verbose category description";
        let chart = treemap(vec![long, "B"], vec![1.0, 40.0]);
        let plan = solve(&chart, 500.0, 300.0);
        let small = plan.detail.rects.iter().find(|r| r.index == 0).unwrap();
        assert_eq!(small.placement, TreemapPlacement::External);
        let leader = small.leader.as_ref().unwrap();
        assert_eq!(leader.len(), 3);
        assert!(plan.detail.external_column.is_some());
        // The column reservation widened the right margin
        assert!(plan.margins.right >= margins::EXTERNAL_COLUMN_MIN);
    }

    #[test]
    fn test_density_limiter_suppresses_overflow() {
        // Many external candidates against a short plot: only some fit
        let labels: Vec<String> = (0..30)
            .map(|i| format!("Quite a long label for category number {i}"))
            .collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let mut chart = treemap(label_refs, (1..=30).map(|v| v as f64).collect());
        chart.style.infographic.show_all_labels = true;
        let plan = solve(&chart, 500.0, 260.0);
        let external = plan
            .detail
            .rects
            .iter()
            .filter(|r| r.placement == TreemapPlacement::External)
            .count();
        let hidden = plan
            .detail
            .rects
            .iter()
            .filter(|r| r.placement == TreemapPlacement::Hidden)
            .count();
        assert!(hidden > 0);
        assert!(external > 0);
    }

    #[test]
    fn test_admitted_externals_ordered_by_rect_position() {
        let labels: Vec<String> = (0..8)
            .map(|i| format!("A deliberately overlong external candidate description {i}"))
            .collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let mut chart = treemap(label_refs, vec![8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        chart.style.infographic.show_all_labels = true;
        let plan = solve(&chart, 420.0, 420.0);
        let mut slots: Vec<(f64, f64)> = plan
            .detail
            .rects
            .iter()
            .filter(|r| r.placement == TreemapPlacement::External)
            .map(|r| (r.zone.center_y(), r.label_position.unwrap().y))
            .collect();
        slots.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in slots.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_nearest_edge_point_picks_closest_axis() {
        let plot = Zone::new(0.0, 0.0, 400.0, 300.0);
        let p = nearest_edge_point(Point::new(10.0, 150.0), plot);
        assert_eq!(p, Point::new(0.0, 150.0));
        let p = nearest_edge_point(Point::new(200.0, 290.0), plot);
        assert_eq!(p, Point::new(200.0, 300.0));
    }

    proptest! {
        /// Rectangle areas always sum to the plot area
        #[test]
        fn prop_area_conservation(values in proptest::collection::vec(0.1f64..1000.0, 1..15)) {
            let zone = Zone::new(0.0, 0.0, 640.0, 480.0);
            let mut items: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
            items.sort_by(|a, b| b.1.total_cmp(&a.1));
            let placed = squarify(&items, zone);
            prop_assert_eq!(placed.len(), values.len());
            let total: f64 = placed.iter().map(|(_, z)| z.area()).sum();
            prop_assert!((total - zone.area()).abs() < 1e-6);
        }

        /// Every rectangle stays inside the plot zone
        #[test]
        fn prop_rects_within_bounds(values in proptest::collection::vec(0.1f64..1000.0, 1..15)) {
            let zone = Zone::new(10.0, 20.0, 500.0, 400.0);
            let mut items: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
            items.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (_, z) in squarify(&items, zone) {
                prop_assert!(z.x >= zone.x - 1e-6);
                prop_assert!(z.y >= zone.y - 1e-6);
                prop_assert!(z.right() <= zone.right() + 1e-6);
                prop_assert!(z.bottom() <= zone.bottom() + 1e-6);
            }
        }
    }
}
