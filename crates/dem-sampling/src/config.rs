//! Configuration for the profile sampler.

use hydro_common::{GeoTransform, HydroError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the profile sampler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Maximum distance between samples along a horseshoe profile.
    ///
    /// `None` means half the diagonal pixel size of the sampled raster.
    pub max_sample_dist: Option<f64>,

    /// Sample features on the rayon thread pool.
    ///
    /// Output order and counters are identical to the sequential path.
    pub parallel: bool,
}

impl SamplerConfig {
    pub fn with_max_sample_dist(mut self, max_sample_dist: f64) -> Self {
        self.max_sample_dist = Some(max_sample_dist);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(dist) = self.max_sample_dist {
            if !(dist.is_finite() && dist > 0.0) {
                return Err(HydroError::invalid_config(format!(
                    "max_sample_dist must be a positive number, got {}",
                    dist
                )));
            }
        }
        Ok(())
    }

    /// The effective horseshoe sample spacing for a raster.
    pub fn resolve_max_sample_dist(&self, geotransform: &GeoTransform) -> Result<f64> {
        self.validate()?;
        let dist = self
            .max_sample_dist
            .unwrap_or_else(|| 0.5 * geotransform.diagonal_pixel_size());
        if !(dist.is_finite() && dist > 0.0) {
            return Err(HydroError::invalid_config(format!(
                "cannot derive a sample distance from pixel size ({}, {})",
                geotransform.pixel_width, geotransform.pixel_height
            )));
        }
        Ok(dist)
    }
}
