//! Bilinear interpolation over a raster's cell-center grid.

use hydro_common::{BoundingBox, HydroError, RasterGrid, Result};
use ndarray::{Array, Array2, Axis, Dimension, Zip};

/// Direction of a raster axis in georeferenced space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    /// Coordinates grow with the pixel index.
    Ascending,
    /// Coordinates shrink with the pixel index (e.g. a negative pixel height).
    Descending,
}

impl AxisOrientation {
    fn from_step(step: f64) -> Self {
        if step > 0.0 {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// Bilinear interpolator for a single-band raster.
///
/// Values live on the cell centers. Both axes are stored in strictly
/// increasing coordinate order; the original direction of each axis is kept
/// in its [`AxisOrientation`]. Queries outside the cell-center domain, or
/// whose interpolation cell has a missing corner, yield NaN.
#[derive(Debug, Clone)]
pub struct GridInterpolator {
    /// Increasing x of the cell centers.
    xs: Vec<f64>,
    /// Increasing y of the cell centers.
    ys: Vec<f64>,
    /// Values indexed `[y, x]` in increasing coordinate order, NaN for nodata.
    values: Array2<f64>,
    x_orientation: AxisOrientation,
    y_orientation: AxisOrientation,
}

impl GridInterpolator {
    /// Build an interpolator for `grid`.
    pub fn build(grid: &RasterGrid) -> Result<Self> {
        let gt = grid.geotransform();
        gt.ensure_north_up()?;

        if grid.rows() == 0 || grid.cols() == 0 {
            return Err(HydroError::invalid_raster("cannot interpolate an empty grid"));
        }
        if gt.pixel_width == 0.0 || gt.pixel_height == 0.0 {
            return Err(HydroError::invalid_raster("pixel size must be non-zero"));
        }

        let mut xs: Vec<f64> = (0..grid.cols())
            .map(|i| gt.origin_x + gt.pixel_width * (i as f64 + 0.5))
            .collect();
        let mut ys: Vec<f64> = (0..grid.rows())
            .map(|j| gt.origin_y + gt.pixel_height * (j as f64 + 0.5))
            .collect();

        let mut values = grid.normalized();

        let x_orientation = AxisOrientation::from_step(gt.pixel_width);
        if x_orientation == AxisOrientation::Descending {
            xs.reverse();
            values.invert_axis(Axis(1));
        }

        let y_orientation = AxisOrientation::from_step(gt.pixel_height);
        if y_orientation == AxisOrientation::Descending {
            ys.reverse();
            values.invert_axis(Axis(0));
        }

        Ok(Self {
            xs,
            ys,
            values,
            x_orientation,
            y_orientation,
        })
    }

    pub fn x_orientation(&self) -> AxisOrientation {
        self.x_orientation
    }

    pub fn y_orientation(&self) -> AxisOrientation {
        self.y_orientation
    }

    /// Extent spanned by the cell centers; the interpolation domain.
    pub fn domain(&self) -> BoundingBox {
        BoundingBox::new(
            self.xs[0],
            self.xs[self.xs.len() - 1],
            self.ys[0],
            self.ys[self.ys.len() - 1],
        )
    }

    /// Interpolate at a single point.
    pub fn query(&self, x: f64, y: f64) -> f64 {
        let (Some((ix, fx)), Some((iy, fy))) = (locate(&self.xs, x), locate(&self.ys, y)) else {
            return f64::NAN;
        };

        let ix1 = (ix + 1).min(self.xs.len() - 1);
        let iy1 = (iy + 1).min(self.ys.len() - 1);

        let v00 = self.values[[iy, ix]];
        let v10 = self.values[[iy, ix1]];
        let v01 = self.values[[iy1, ix]];
        let v11 = self.values[[iy1, ix1]];

        // Any missing corner poisons the whole cell, even at zero weight.
        if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
            return f64::NAN;
        }

        let bottom = v00 * (1.0 - fx) + v10 * fx;
        let top = v01 * (1.0 - fx) + v11 * fx;
        bottom * (1.0 - fy) + top * fy
    }

    /// Interpolate at a batch of `[x, y]` points.
    pub fn query_points(&self, points: &[[f64; 2]]) -> Vec<f64> {
        points.iter().map(|&[x, y]| self.query(x, y)).collect()
    }

    /// Interpolate at paired coordinate arrays.
    pub fn query_xy(&self, xs: &[f64], ys: &[f64]) -> Result<Vec<f64>> {
        if xs.len() != ys.len() {
            return Err(HydroError::shape_mismatch(xs.len(), ys.len()));
        }
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| self.query(x, y))
            .collect())
    }

    /// Interpolate at coordinate arrays of any dimensionality.
    ///
    /// The output has the same shape as the inputs.
    pub fn query_array<D: Dimension>(
        &self,
        xs: &Array<f64, D>,
        ys: &Array<f64, D>,
    ) -> Result<Array<f64, D>> {
        if xs.shape() != ys.shape() {
            return Err(HydroError::shape_mismatch(xs.shape(), ys.shape()));
        }
        Ok(Zip::from(xs)
            .and(ys)
            .map_collect(|&x, &y| self.query(x, y)))
    }
}

/// Find the interval of `centers` containing `value`.
///
/// Returns the lower index and the fractional position inside the interval,
/// or `None` outside `[first, last]` (NaN included).
fn locate(centers: &[f64], value: f64) -> Option<(usize, f64)> {
    let n = centers.len();
    if !(value >= centers[0] && value <= centers[n - 1]) {
        return None;
    }
    if n == 1 {
        return Some((0, 0.0));
    }
    let upper = centers.partition_point(|&c| c < value);
    let lower = upper.saturating_sub(1).min(n - 2);
    let frac = (value - centers[lower]) / (centers[lower + 1] - centers[lower]);
    Some((lower, frac))
}
