//! Error types for raster and vector I/O.

use hydro_common::HydroError;
use thiserror::Error;

/// Result type alias using IoError.
pub type Result<T> = std::result::Result<T, IoError>;

/// Errors reading or writing GeoTIFF and GeoJSON files.
#[derive(Error, Debug)]
pub enum IoError {
    /// Storage/IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding or encoding error.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A raster the tool cannot work with (multi-band, missing
    /// georeferencing, too large).
    #[error("unsupported raster: {0}")]
    UnsupportedRaster(String),

    /// A feature whose geometry cannot be decoded.
    #[error("invalid geometry at feature {index}: {reason}")]
    InvalidGeometry { index: usize, reason: String },

    #[error(transparent)]
    Hydro(#[from] HydroError),
}

impl IoError {
    pub fn unsupported_raster(msg: impl Into<String>) -> Self {
        Self::UnsupportedRaster(msg.into())
    }

    pub fn invalid_geometry(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            index,
            reason: reason.into(),
        }
    }
}
