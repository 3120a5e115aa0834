//! File formats for DEM hydro adjustment.
//!
//! - [`geotiff`]: single-band GeoTIFF rasters, read as f64 and written back
//!   in their source sample type, keeping the source georeferencing.
//! - [`geojson`]: line layers to be sampled and the elevation-line layers
//!   that are burned.

pub mod error;
pub mod geojson;
pub mod geotiff;

pub use error::{IoError, Result};
pub use geojson::{
    elevation_layer_to_string, parse_elevation_layer, parse_line_layer, read_elevation_layer, read_line_layer,
    write_elevation_layer, ElevationLayer, LineLayer,
};
pub use geotiff::{read_geotiff, write_geotiff, GeoKeys, GeoTiffRaster, SampleType};
