//! Legend block measurement
//!
//! Measures the space a legend needs before the plot zone is carved out.
//! Horizontal legends (top/bottom) wrap items into rows against the
//! container width; vertical legends (left/right) stack items and are as
//! wide as their widest entry.

use chart_model::{ChartSpec, LegendPosition};
use serde::{Deserialize, Serialize};
use text_metrics::{CachedMeasurer, FontSpec, RenderTarget, TextMeasurer};

/// Side length of the color swatch drawn before each legend entry
pub const SWATCH_SIZE: f64 = 12.0;
/// Gap between a swatch and its entry text
pub const SWATCH_GAP: f64 = 6.0;
/// Horizontal padding trailing each entry
pub const ITEM_PADDING: f64 = 16.0;
/// Vertical gap between wrapped legend rows
pub const ROW_GAP: f64 = 6.0;
/// Padding around the whole legend block
pub const BLOCK_PADDING: f64 = 8.0;
/// Line height as a multiple of the legend font size
pub const LINE_HEIGHT_FACTOR: f64 = 1.4;

/// Measured legend block, before placement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendBlock {
    pub position: Option<LegendPosition>,
    pub width: f64,
    pub height: f64,
    /// Row count for horizontal legends, item count for vertical ones
    pub rows: usize,
}

impl LegendBlock {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
    }

    /// Height claimed from the top or bottom margin, zero for side legends
    pub fn vertical_claim(&self) -> f64 {
        match self.position {
            Some(LegendPosition::Top) | Some(LegendPosition::Bottom) => self.height,
            _ => 0.0,
        }
    }

    /// Width claimed from the left or right margin, zero otherwise
    pub fn horizontal_claim(&self) -> f64 {
        match self.position {
            Some(LegendPosition::Left) | Some(LegendPosition::Right) => self.width,
            _ => 0.0,
        }
    }
}

fn item_width<M: TextMeasurer>(
    name: &str,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> f64 {
    SWATCH_SIZE + SWATCH_GAP + measurer.measure_width(name, font, target) + ITEM_PADDING
}

/// Measure the legend block for a chart, or an empty block when the chart
/// has no legend to show
///
/// Single-dataset charts carry no legend regardless of the configured
/// position.
pub fn measure_legend<M: TextMeasurer>(
    chart: &ChartSpec,
    container_width: f64,
    font: &FontSpec,
    measurer: &mut CachedMeasurer<M>,
    target: RenderTarget,
) -> LegendBlock {
    let position = chart.style.legend_position;
    if position == LegendPosition::None || chart.data.datasets.len() < 2 {
        return LegendBlock::default();
    }

    let line_height = font.size * LINE_HEIGHT_FACTOR;
    let names: Vec<String> = chart.data.datasets.iter().map(|d| d.label.clone()).collect();

    match position {
        LegendPosition::Top | LegendPosition::Bottom => {
            // Wrap items into rows against the available width
            let avail = (container_width - 2.0 * BLOCK_PADDING).max(1.0);
            let mut rows = 1usize;
            let mut row_width = 0.0f64;
            let mut widest_row = 0.0f64;
            for name in &names {
                let w = item_width(name, font, measurer, target);
                if row_width > 0.0 && row_width + w > avail {
                    widest_row = widest_row.max(row_width);
                    rows += 1;
                    row_width = 0.0;
                }
                row_width += w;
            }
            widest_row = widest_row.max(row_width);
            LegendBlock {
                position: Some(position),
                width: widest_row + 2.0 * BLOCK_PADDING,
                height: rows as f64 * line_height
                    + (rows - 1) as f64 * ROW_GAP
                    + 2.0 * BLOCK_PADDING,
                rows,
            }
        }
        LegendPosition::Left | LegendPosition::Right => {
            // Vertical stack: one item per row, width of the widest entry
            let widest = names
                .iter()
                .map(|n| item_width(n, font, measurer, target))
                .fold(0.0, f64::max);
            let count = names.len();
            LegendBlock {
                position: Some(position),
                width: widest + 2.0 * BLOCK_PADDING,
                height: count as f64 * line_height
                    + (count - 1) as f64 * ROW_GAP
                    + 2.0 * BLOCK_PADDING,
                rows: count,
            }
        }
        LegendPosition::None => LegendBlock::default(),
    }
}
