//! Burning elevation lines into a DEM.
//!
//! Every pixel a line segment passes through, including pixels it only
//! clips at a corner, receives the segment's Z interpolated at the middle of
//! its passage through that pixel. Lines are burned in order, so where two
//! lines overlap the later one wins.

pub mod burn;
pub mod trace;

pub use burn::{burn_lines, BurnStats};
pub use trace::{trace_segment, TouchedPixel};
