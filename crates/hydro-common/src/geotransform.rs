//! Affine geotransforms.

use crate::{HydroError, Result};
use serde::{Deserialize, Serialize};

/// Affine mapping from pixel (column, row) space to georeferenced (x, y).
///
/// Coefficients follow the GDAL ordering:
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// `pixel_height` is commonly negative (north-up rasters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Create a non-rotated geotransform.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    /// Build from the six GDAL coefficients.
    pub fn from_gdal(coefficients: [f64; 6]) -> Self {
        Self {
            origin_x: coefficients[0],
            pixel_width: coefficients[1],
            row_rotation: coefficients[2],
            origin_y: coefficients[3],
            col_rotation: coefficients[4],
            pixel_height: coefficients[5],
        }
    }

    /// The six GDAL coefficients.
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    pub fn is_rotated(&self) -> bool {
        self.row_rotation != 0.0 || self.col_rotation != 0.0
    }

    /// Fail with `UnsupportedGeoTransform` if any rotation term is set.
    pub fn ensure_north_up(&self) -> Result<()> {
        if self.is_rotated() {
            return Err(HydroError::UnsupportedGeoTransform {
                row_rotation: self.row_rotation,
                col_rotation: self.col_rotation,
            });
        }
        Ok(())
    }

    /// Georeferenced coordinates of a fractional pixel position.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Fractional (column, row) of a georeferenced point.
    ///
    /// Only valid for non-rotated transforms; callers check with
    /// [`ensure_north_up`](Self::ensure_north_up) first.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// Georeferenced center of the pixel at `(col, row)`.
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        self.pixel_to_geo(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Transform of a sub-grid whose pixel (0, 0) is `(col, row)` here.
    ///
    /// Pixel sizes are unchanged.
    pub fn offset(&self, col: i64, row: i64) -> Self {
        self.offset_fractional(col as f64, row as f64)
    }

    /// Transform whose origin is the fractional pixel position `(col, row)`.
    pub fn offset_fractional(&self, col: f64, row: f64) -> Self {
        let (origin_x, origin_y) = self.pixel_to_geo(col, row);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Length of the pixel diagonal, `hypot(pixel_width, pixel_height)`.
    pub fn diagonal_pixel_size(&self) -> f64 {
        self.pixel_width.hypot(self.pixel_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdal_roundtrip_order() {
        let gt = GeoTransform::from_gdal([600000.0, 0.1, 0.0, 6200000.0, 0.0, -0.1]);
        assert_eq!(gt.origin_x, 600000.0);
        assert_eq!(gt.pixel_width, 0.1);
        assert_eq!(gt.origin_y, 6200000.0);
        assert_eq!(gt.pixel_height, -0.1);
        assert_eq!(gt.to_gdal(), [600000.0, 0.1, 0.0, 6200000.0, 0.0, -0.1]);
    }

    #[test]
    fn test_rotation_rejected() {
        let gt = GeoTransform::from_gdal([0.0, 1.0, 0.5, 0.0, 0.0, -1.0]);
        assert!(gt.is_rotated());
        assert!(matches!(
            gt.ensure_north_up(),
            Err(HydroError::UnsupportedGeoTransform { row_rotation, .. }) if row_rotation == 0.5
        ));

        assert!(GeoTransform::north_up(0.0, 0.0, 1.0, -1.0).ensure_north_up().is_ok());
    }

    #[test]
    fn test_pixel_geo_conversion() {
        let gt = GeoTransform::north_up(100.0, 200.0, 2.0, -4.0);
        assert_eq!(gt.pixel_to_geo(1.0, 1.0), (102.0, 196.0));
        assert_eq!(gt.geo_to_pixel(102.0, 196.0), (1.0, 1.0));
        assert_eq!(gt.cell_center(0, 0), (101.0, 198.0));
    }

    #[test]
    fn test_offset_keeps_pixel_size() {
        let gt = GeoTransform::north_up(100.0, 200.0, 2.0, -4.0);
        let sub = gt.offset(-1, 3);
        assert_eq!(sub.origin_x, 98.0);
        assert_eq!(sub.origin_y, 188.0);
        assert_eq!(sub.pixel_width, 2.0);
        assert_eq!(sub.pixel_height, -4.0);
    }

    #[test]
    fn test_diagonal_pixel_size() {
        let gt = GeoTransform::north_up(0.0, 0.0, 3.0, -4.0);
        assert_eq!(gt.diagonal_pixel_size(), 5.0);
    }
}
