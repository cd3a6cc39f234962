//! Text metrics - deterministic string measurement for chart layout
//!
//! This crate provides:
//! - A `TextMeasurer` trait: width and detailed ascent/descent measurement
//!   for a string under a given font spec and render target
//! - A deterministic character-class measurer usable without font assets
//! - A bounded LRU measurement cache with hit/miss statistics
//!
//! Measurement must be pure for a given input. The print target applies a
//! fixed calibration multiplier to every returned dimension, modeling the
//! systematic size difference between on-screen rasterization and the
//! print engine.

mod cache;
mod font;
mod measure;

pub use cache::*;
pub use font::*;
pub use measure::*;
