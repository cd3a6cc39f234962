//! Chart model - the chart description consumed by the layout engine
//!
//! This crate provides:
//! - Chart kinds, data, and per-chart styling
//! - Number formatting (plain, percent, currency)
//! - Color type with palette expansion and contrast utilities
//! - Grid/typography configuration passed down from the page model

mod color;
mod format;
mod model;
mod style;

pub use color::*;
pub use format::*;
pub use model::*;
pub use style::*;
