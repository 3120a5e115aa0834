//! Pixel-aligned raster windows.

use hydro_common::{BoundingBox, RasterGrid, Result};
use ndarray::Array2;

/// Index rectangle of a window in source pixel space.
///
/// Bounds are half-open (`col_min..col_max`) and may extend past the source
/// raster on any side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub col_min: i64,
    pub col_max: i64,
    pub row_min: i64,
    pub row_max: i64,
}

impl WindowBounds {
    pub fn num_cols(&self) -> usize {
        (self.col_max - self.col_min) as usize
    }

    pub fn num_rows(&self) -> usize {
        (self.row_max - self.row_min) as usize
    }
}

/// Pixel bounds of the window covering `bbox` in `raster`.
///
/// The window is aligned to the source pixels and padded by at least one
/// pixel on every side, so small floating-point errors in the bbox
/// coordinates can never leave a sample point outside it.
pub fn window_bounds(raster: &RasterGrid, bbox: &BoundingBox) -> Result<WindowBounds> {
    let gt = raster.geotransform();
    gt.ensure_north_up()?;

    let (mut col_lo, mut col_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut row_lo, mut row_hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in bbox.corners() {
        let (col, row) = gt.geo_to_pixel(x, y);
        col_lo = col_lo.min(col);
        col_hi = col_hi.max(col);
        row_lo = row_lo.min(row);
        row_hi = row_hi.max(row);
    }

    Ok(WindowBounds {
        col_min: col_lo.floor() as i64 - 1,
        col_max: col_hi.ceil() as i64 + 1,
        row_min: row_lo.floor() as i64 - 1,
        row_max: row_hi.ceil() as i64 + 1,
    })
}

/// Return a window of `raster` containing at least `bbox`.
///
/// The window keeps the source pixel size and nodata value. Cells outside
/// the source extent are filled with the source nodata value, or NaN when
/// the source has none.
pub fn get_window(raster: &RasterGrid, bbox: &BoundingBox) -> Result<RasterGrid> {
    let bounds = window_bounds(raster, bbox)?;
    let source = raster.data();
    let fill = raster.missing_marker();
    let (src_rows, src_cols) = (raster.rows() as i64, raster.cols() as i64);

    let data = Array2::from_shape_fn((bounds.num_rows(), bounds.num_cols()), |(row, col)| {
        let src_row = bounds.row_min + row as i64;
        let src_col = bounds.col_min + col as i64;
        if (0..src_rows).contains(&src_row) && (0..src_cols).contains(&src_col) {
            source[[src_row as usize, src_col as usize]]
        } else {
            fill
        }
    });

    let geotransform = raster
        .geotransform()
        .offset(bounds.col_min, bounds.row_min);

    Ok(RasterGrid::new(data, geotransform, raster.nodata()))
}
