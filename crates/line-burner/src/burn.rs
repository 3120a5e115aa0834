//! Z-valued all-touched burning of elevation lines.

use crate::trace::trace_segment;
use hydro_common::{ElevationLine, HydroError, Point3, RasterGrid, Result};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use tracing::debug;

/// Tally of one burn call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnStats {
    pub lines: usize,
    pub segments: usize,
    /// Segments ignored because a coordinate was NaN or infinite.
    pub skipped_segments: usize,
    /// Pixel writes, counting overwrites.
    pub pixels_written: usize,
}

impl AddAssign for BurnStats {
    fn add_assign(&mut self, other: Self) {
        self.lines += other.lines;
        self.segments += other.segments;
        self.skipped_segments += other.skipped_segments;
        self.pixels_written += other.pixels_written;
    }
}

/// Burn `lines` into `raster` in order.
///
/// Each pixel touched by a segment gets the segment's Z interpolated at the
/// middle of the passage through the pixel. Later lines overwrite earlier
/// ones. Pixels outside the raster are ignored.
pub fn burn_lines(raster: &mut RasterGrid, lines: &[ElevationLine]) -> Result<BurnStats> {
    let gt = *raster.geotransform();
    gt.ensure_north_up()?;
    if gt.pixel_width == 0.0 || gt.pixel_height == 0.0 {
        return Err(HydroError::invalid_raster("pixel size must be non-zero"));
    }

    let (rows, cols) = (raster.rows(), raster.cols());
    let data = raster.data_mut();
    let mut stats = BurnStats::default();

    for (index, line) in lines.iter().enumerate() {
        let mut written = 0;

        for (p0, p1) in line.segments() {
            stats.segments += 1;

            let start = gt.geo_to_pixel(p0.x, p0.y);
            let end = gt.geo_to_pixel(p1.x, p1.y);
            if !(is_finite(&p0) && is_finite(&p1)) || !finite_pair(start) || !finite_pair(end) {
                debug!(line = index, "skipping segment with non-finite coordinates");
                stats.skipped_segments += 1;
                continue;
            }

            for pixel in trace_segment(start, end, cols, rows) {
                data[[pixel.row, pixel.col]] = p0.z + pixel.t * (p1.z - p0.z);
                written += 1;
            }
        }

        debug!(line = index, pixels = written, "burned line");
        stats.lines += 1;
        stats.pixels_written += written;
    }

    Ok(stats)
}

fn is_finite(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

fn finite_pair((a, b): (f64, f64)) -> bool {
    a.is_finite() && b.is_finite()
}
