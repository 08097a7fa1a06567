//! Text and SVG renderings of analysis results.

pub mod chart;
pub mod text;
