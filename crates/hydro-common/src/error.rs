//! Error types for DEM hydro adjustment.

use thiserror::Error;

/// Result type alias using HydroError.
pub type Result<T> = std::result::Result<T, HydroError>;

/// Fatal errors raised by the sampling and burning core.
///
/// Recoverable per-feature conditions (point-count mismatches, missing DEM
/// data) are never reported through this type; they are tallied in
/// [`SampleCounters`](crate::SampleCounters) instead.
#[derive(Debug, Error)]
pub enum HydroError {
    #[error("geotransforms with rotation are unsupported (row rotation {row_rotation}, column rotation {col_rotation})")]
    UnsupportedGeoTransform { row_rotation: f64, col_rotation: f64 },

    #[error("encountered unexpected geometry type at feature {index}: {geometry_type}")]
    InvalidGeometry { index: usize, geometry_type: String },

    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

impl HydroError {
    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(index: usize, geometry_type: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            index,
            geometry_type: geometry_type.into(),
        }
    }

    /// Create an InvalidRaster error.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a ShapeMismatch error from two printable shapes.
    pub fn shape_mismatch(expected: impl std::fmt::Debug, actual: impl std::fmt::Debug) -> Self {
        Self::ShapeMismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}
