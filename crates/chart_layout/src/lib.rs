//! Chart layout engine
//!
//! Given a chart description, a grid/typography configuration, and the
//! pixel box the chart must occupy, this crate computes an exact,
//! deterministic geometry: margins, plot and legend zones, wrapped axis
//! labels, radial slice geometry with leader lines, and squarified
//! treemap partitions.
//!
//! The engine is purely synchronous and side-effect free; every call to
//! [`LayoutEngine::compute_layout`] allocates only local structures. The
//! only stateful piece is the measurement cache inside the engine, which
//! can be cleared at any time without affecting output.

mod analysis;
mod engine;
mod error;
mod geometry;
mod legend;
mod margins;
mod radial;
mod treemap;
mod wrap;

pub use analysis::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use legend::*;
pub use margins::*;
pub use radial::*;
pub use treemap::*;
pub use wrap::*;
