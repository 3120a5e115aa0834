//! Common test fixtures.
//!
//! Reference rasters and geometries with hand-verified expected results.

use crate::generators::arange_raster;
use hydro_common::{BoundingBox, ElevationLine, GeoTransform, Point3, RasterGrid};
use ndarray::{array, Array2};

/// Nodata sentinel of the window reference raster.
pub const WINDOW_NODATA: f64 = -1337.0;

/// A 4×5 raster holding `0..20` with origin `(600000, 6200000)` and 1 m
/// pixels, north-up.
pub fn reference_burn_raster() -> RasterGrid {
    arange_raster(
        4,
        5,
        GeoTransform::from_gdal([600000.0, 1.0, 0.0, 6200000.0, 0.0, -1.0]),
        None,
    )
}

/// A diagonal line at constant Z = 42 across [`reference_burn_raster`].
pub fn reference_burn_line() -> ElevationLine {
    ElevationLine::segment(
        Point3::new(600000.5, 6199996.5, 42.0),
        Point3::new(600003.5, 6199998.5, 42.0),
    )
}

/// Expected grid after burning [`reference_burn_line`] with all-touched.
pub fn reference_burn_expected() -> Array2<f64> {
    array![
        [0., 1., 2., 3., 4.],
        [5., 6., 42., 42., 9.],
        [10., 42., 42., 13., 14.],
        [42., 42., 17., 18., 19.],
    ]
}

/// A 6×5 raster holding `0..30` at 0.1 m pixels with one nodata cell at
/// row 3, column 2.
pub fn window_source_raster() -> RasterGrid {
    let mut raster = arange_raster(
        6,
        5,
        GeoTransform::from_gdal([600000.0, 0.1, 0.0, 6200000.0, 0.0, -0.1]),
        Some(WINDOW_NODATA),
    );
    raster.data_mut()[[3, 2]] = WINDOW_NODATA;
    raster
}

/// A non-pixel-aligned bbox exceeding [`window_source_raster`] on the
/// eastern side.
pub fn window_bbox() -> BoundingBox {
    BoundingBox::new(600000.21, 600000.42, 6199999.61, 6199999.79)
}

/// Expected window extracted from [`window_source_raster`] for
/// [`window_bbox`].
pub fn window_expected() -> Array2<f64> {
    let nd = WINDOW_NODATA;
    array![
        [6., 7., 8., 9., nd],
        [11., 12., 13., 14., nd],
        [16., nd, 18., 19., nd],
        [21., 22., 23., 24., nd],
    ]
}

/// Expected geotransform of the extracted window.
pub fn window_expected_geotransform() -> [f64; 6] {
    [600000.1, 0.1, 0.0, 6199999.9, 0.0, -0.1]
}
