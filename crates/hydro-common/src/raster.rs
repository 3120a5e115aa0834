//! Single-band raster grids.

use crate::{BoundingBox, GeoTransform, HydroError, Result};
use ndarray::Array2;

/// A single-band raster: a rows × cols grid of samples, its geotransform and
/// an optional nodata sentinel.
///
/// Rows run along the transform's row axis (top to bottom for north-up
/// rasters), columns along the column axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    data: Array2<f64>,
    geotransform: GeoTransform,
    nodata: Option<f64>,
}

impl RasterGrid {
    /// Wrap an existing array.
    pub fn new(data: Array2<f64>, geotransform: GeoTransform, nodata: Option<f64>) -> Self {
        Self {
            data,
            geotransform,
            nodata,
        }
    }

    /// Build from row-major samples.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        values: Vec<f64>,
        geotransform: GeoTransform,
        nodata: Option<f64>,
    ) -> Result<Self> {
        let len = values.len();
        let data = Array2::from_shape_vec((rows, cols), values).map_err(|_| {
            HydroError::invalid_raster(format!(
                "{} samples cannot fill a {}x{} grid",
                len, rows, cols
            ))
        })?;
        Ok(Self::new(data, geotransform, nodata))
    }

    /// A grid with every cell set to `value`.
    pub fn filled(
        rows: usize,
        cols: usize,
        value: f64,
        geotransform: GeoTransform,
        nodata: Option<f64>,
    ) -> Self {
        Self::new(Array2::from_elem((rows, cols), value), geotransform, nodata)
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn geotransform(&self) -> &GeoTransform {
        &self.geotransform
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<f64> {
        &mut self.data
    }

    /// Value at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Value used for cells that hold no data: the sentinel, or NaN when the
    /// raster defines none.
    pub fn missing_marker(&self) -> f64 {
        self.nodata.unwrap_or(f64::NAN)
    }

    /// Whether `value` counts as missing in this raster.
    pub fn is_missing(&self, value: f64) -> bool {
        value.is_nan() || self.nodata.is_some_and(|nodata| value == nodata)
    }

    /// Copy of the samples with every missing cell replaced by NaN.
    ///
    /// This is the single place where the nodata sentinel is interpreted;
    /// downstream arithmetic works on NaN only.
    pub fn normalized(&self) -> Array2<f64> {
        self.data
            .mapv(|value| if self.is_missing(value) { f64::NAN } else { value })
    }

    /// Georeferenced extent of the whole grid.
    pub fn bbox(&self) -> BoundingBox {
        let gt = &self.geotransform;
        let (x0, y0) = gt.pixel_to_geo(0.0, 0.0);
        let (x1, y1) = gt.pixel_to_geo(self.cols() as f64, self.rows() as f64);
        BoundingBox::new(x0, x1, y0, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gt() -> GeoTransform {
        GeoTransform::north_up(0.0, 10.0, 1.0, -1.0)
    }

    #[test]
    fn test_from_vec_shape() {
        let raster = RasterGrid::from_vec(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], gt(), None)
            .unwrap();
        assert_eq!(raster.rows(), 2);
        assert_eq!(raster.cols(), 3);
        assert_eq!(raster.get(1, 0), Some(3.0));
        assert_eq!(raster.get(2, 0), None);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let result = RasterGrid::from_vec(2, 3, vec![0.0; 5], gt(), None);
        assert!(matches!(result, Err(HydroError::InvalidRaster(_))));
    }

    #[test]
    fn test_missing_semantics() {
        let raster = RasterGrid::filled(1, 1, 0.0, gt(), Some(-9999.0));
        assert!(raster.is_missing(-9999.0));
        assert!(raster.is_missing(f64::NAN));
        assert!(!raster.is_missing(0.0));
        assert_eq!(raster.missing_marker(), -9999.0);

        let raster = RasterGrid::filled(1, 1, 0.0, gt(), None);
        assert!(raster.missing_marker().is_nan());
    }

    #[test]
    fn test_normalized_replaces_sentinel() {
        let raster =
            RasterGrid::from_vec(1, 3, vec![1.0, -1337.0, 3.0], gt(), Some(-1337.0)).unwrap();
        let normalized = raster.normalized();
        assert_eq!(normalized[[0, 0]], 1.0);
        assert!(normalized[[0, 1]].is_nan());
        assert_eq!(normalized[[0, 2]], 3.0);
        // source untouched
        assert_eq!(raster.get(0, 1), Some(-1337.0));
    }

    #[test]
    fn test_bbox() {
        let raster = RasterGrid::filled(4, 5, 0.0, gt(), None);
        assert_eq!(raster.bbox(), BoundingBox::new(0.0, 5.0, 6.0, 10.0));
    }
}
