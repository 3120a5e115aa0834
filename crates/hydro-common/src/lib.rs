//! Common types shared by the DEM hydro-adjustment crates.
//!
//! Everything here is a plain value type: bounding boxes, affine
//! geotransforms, single-band raster grids and the line geometries that flow
//! from the profile sampler into the line burner.

pub mod bbox;
pub mod error;
pub mod geometry;
pub mod geotransform;
pub mod raster;

pub use bbox::BoundingBox;
pub use error::{HydroError, Result};
pub use geometry::{
    ElevationLine, Geometry, InputGeometry, Point3, SampleCounters, SampleOutput, ShapeMismatch,
    Vertex,
};
pub use geotransform::GeoTransform;
pub use raster::RasterGrid;
