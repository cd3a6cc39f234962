//! Layout geometry primitives

use serde::{Deserialize, Serialize};

/// A point in layout coordinates, relative to the container's top-left
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangular zone in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Zone {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The shorter of the two side lengths
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Shrink by different amounts on each side, clamped to non-negative
    pub fn inset_sides(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

/// Four-sided margin band around the plot area
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Add a constant to all four sides
    pub fn expand_all(&mut self, amount: f64) {
        self.top += amount;
        self.right += amount;
        self.bottom += amount;
        self.left += amount;
    }

    /// The plot zone left inside a container after these margins
    pub fn plot_zone(&self, container: Size) -> Zone {
        Zone::new(
            self.left,
            self.top,
            (container.width - self.left - self.right).max(0.0),
            (container.height - self.top - self.bottom).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_edges() {
        let z = Zone::new(10.0, 20.0, 100.0, 80.0);
        assert_eq!(z.right(), 110.0);
        assert_eq!(z.bottom(), 100.0);
        assert_eq!(z.center_x(), 60.0);
        assert_eq!(z.center_y(), 60.0);
    }

    #[test]
    fn test_inset_clamps_to_zero() {
        let z = Zone::new(0.0, 0.0, 10.0, 10.0);
        let inset = z.inset_sides(0.0, 20.0, 0.0, 0.0);
        assert_eq!(inset.width, 0.0);
    }

    #[test]
    fn test_margins_plot_zone() {
        let m = Margins {
            top: 10.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        };
        let plot = m.plot_zone(Size::new(400.0, 300.0));
        assert_eq!(plot, Zone::new(40.0, 10.0, 340.0, 260.0));
    }
}
