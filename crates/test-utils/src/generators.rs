//! Raster generators for creating synthetic DEM-like data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use hydro_common::{GeoTransform, RasterGrid};
use ndarray::Array2;

/// Creates a raster whose cells count up in row-major order.
///
/// Cell `(row, col)` holds `row * cols + col`, so a 4×5 grid holds `0..20`.
///
/// # Example
///
/// ```
/// use hydro_common::GeoTransform;
/// use test_utils::arange_raster;
///
/// let raster = arange_raster(4, 5, GeoTransform::north_up(0.0, 0.0, 1.0, -1.0), None);
/// assert_eq!(raster.get(0, 1), Some(1.0));
/// assert_eq!(raster.get(1, 0), Some(5.0));
/// assert_eq!(raster.get(3, 4), Some(19.0));
/// ```
pub fn arange_raster(
    rows: usize,
    cols: usize,
    geotransform: GeoTransform,
    nodata: Option<f64>,
) -> RasterGrid {
    let data = Array2::from_shape_fn((rows, cols), |(row, col)| (row * cols + col) as f64);
    RasterGrid::new(data, geotransform, nodata)
}

/// Creates a raster sampling the plane `z = a*x + b*y + c` at cell centers.
///
/// Bilinear interpolation reproduces a plane exactly, which makes these
/// rasters useful for checking interpolation away from cell centers.
pub fn plane_raster(
    rows: usize,
    cols: usize,
    geotransform: GeoTransform,
    a: f64,
    b: f64,
    c: f64,
) -> RasterGrid {
    let data = Array2::from_shape_fn((rows, cols), |(row, col)| {
        let (x, y) = geotransform.cell_center(col, row);
        a * x + b * y + c
    });
    RasterGrid::new(data, geotransform, None)
}

/// Creates a flat raster at `elevation` with a nodata sentinel defined.
pub fn flat_raster(
    rows: usize,
    cols: usize,
    geotransform: GeoTransform,
    elevation: f64,
    nodata: Option<f64>,
) -> RasterGrid {
    RasterGrid::filled(rows, cols, elevation, geotransform, nodata)
}

/// Sets the given `(row, col)` cells to the raster's nodata sentinel.
///
/// # Panics
///
/// Panics if the raster has no sentinel or a cell is out of range.
pub fn punch_nodata(raster: &mut RasterGrid, cells: &[(usize, usize)]) {
    let nodata = raster
        .nodata()
        .expect("punch_nodata needs a raster with a nodata value");
    for &(row, col) in cells {
        raster.data_mut()[[row, col]] = nodata;
    }
}
