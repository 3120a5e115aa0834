//! DEM hydro adjustment pipeline.
//!
//! The three commands mirror the stages of the adjustment:
//!
//! 1. `sample-line-z`: give 2-point culvert lines the DEM elevation at their
//!    endpoints.
//! 2. `sample-horseshoe-z-lines`: render 4-point horseshoe cross-sections as
//!    bundles of elevation lines.
//! 3. `burn-line-z`: burn one or more elevation-line layers into a copy of
//!    the DEM.

pub mod commands;
pub mod config;

pub use commands::{run_burn_line_z, run_sample_horseshoe_z_lines, run_sample_line_z};
pub use config::{AdjustConfig, OutputConfig};
