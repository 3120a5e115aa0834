//! DEM sampling along vector geometries.
//!
//! This crate turns 2-point line objects and 4-point horseshoe
//! cross-sections into elevation-tagged lines by sampling a DEM:
//!
//! ```text
//! InputGeometry
//!      │
//!      ▼
//! ProfileSampler
//!      │
//!      ├─► get_window(raster, bbox)      small padded, pixel-aligned copy
//!      │
//!      ├─► GridInterpolator::build       bilinear over cell centers
//!      │
//!      └─► query endpoints / profiles    all finite? emit : count as nodata
//!               │
//!               ▼
//!          SampleOutput { lines, counters }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dem_sampling::{ProfileSampler, SamplerConfig};
//!
//! let sampler = ProfileSampler::new(SamplerConfig::default());
//! let output = sampler.sample_horseshoes(&dem, &horseshoes)?;
//! assert_eq!(output.counters.processed, output.counters.valid + output.counters.invalid_nodata);
//! ```

pub mod config;
pub mod interpolation;
pub mod profile;
pub mod window;

pub use config::SamplerConfig;
pub use interpolation::{AxisOrientation, GridInterpolator};
pub use profile::{
    horseshoe_sample_count, profile_abscissa, CounterSummary, ProfileSampler, MAX_PROFILE_SAMPLES,
};
pub use window::{get_window, window_bounds, WindowBounds};
