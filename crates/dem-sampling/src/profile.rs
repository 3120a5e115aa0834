//! Elevation sampling along line objects and horseshoe profiles.

use crate::config::SamplerConfig;
use crate::interpolation::GridInterpolator;
use crate::window::get_window;
use hydro_common::{
    BoundingBox, ElevationLine, Geometry, HydroError, InputGeometry, Point3, RasterGrid, Result,
    SampleCounters, SampleOutput, Vertex,
};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

/// Upper bound on the samples taken along one horseshoe profile.
pub const MAX_PROFILE_SAMPLES: usize = 1 << 20;

/// Sampling mode, selecting which geometry variant the input must form.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Line,
    Horseshoe { max_sample_dist: f64 },
}

impl Mode {
    fn label(&self) -> &'static str {
        match self {
            Mode::Line => "line",
            Mode::Horseshoe { .. } => "horseshoe",
        }
    }

    fn expected_points(&self) -> usize {
        match self {
            Mode::Line => Geometry::LINE_POINTS,
            Mode::Horseshoe { .. } => Geometry::HORSESHOE_POINTS,
        }
    }
}

/// What happened to a single input feature.
#[derive(Debug)]
enum FeatureOutcome {
    ShapeMismatch,
    Valid(Vec<ElevationLine>),
    InvalidNodata,
}

/// Samples DEM elevation along vector geometries.
#[derive(Debug, Clone, Default)]
pub struct ProfileSampler {
    config: SamplerConfig,
}

impl ProfileSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Sample Z at the endpoints of 2-point line objects.
    pub fn sample_lines(
        &self,
        raster: &RasterGrid,
        geometries: &[InputGeometry],
    ) -> Result<SampleOutput> {
        self.run(raster, geometries, Mode::Line)
    }

    /// Render 4-point horseshoes as cross-profile lines with sampled Z.
    pub fn sample_horseshoes(
        &self,
        raster: &RasterGrid,
        geometries: &[InputGeometry],
    ) -> Result<SampleOutput> {
        let max_sample_dist = self
            .config
            .resolve_max_sample_dist(raster.geotransform())?;
        self.run(raster, geometries, Mode::Horseshoe { max_sample_dist })
    }

    /// Sample a single validated geometry.
    ///
    /// Returns `None` when any sampled Z is missing. `max_sample_dist` is
    /// only used for horseshoes.
    pub fn sample_geometry(
        &self,
        raster: &RasterGrid,
        geometry: &Geometry,
        max_sample_dist: f64,
    ) -> Result<Option<Vec<ElevationLine>>> {
        match *geometry {
            Geometry::Line { p0, p1 } => sample_line(raster, p0, p1),
            Geometry::HorseshoeQuad { a, b, c, d } => {
                sample_horseshoe(raster, [a, b, c, d], max_sample_dist)
            }
        }
    }

    fn run(
        &self,
        raster: &RasterGrid,
        geometries: &[InputGeometry],
        mode: Mode,
    ) -> Result<SampleOutput> {
        raster.geotransform().ensure_north_up()?;

        // A foreign geometry type fails the whole run before any sampling.
        if let Some((index, other)) = geometries
            .iter()
            .enumerate()
            .find(|(_, g)| matches!(g, InputGeometry::Other(_)))
        {
            return Err(HydroError::invalid_geometry(index, other.type_name()));
        }

        let outcomes: Vec<FeatureOutcome> = if self.config.parallel {
            geometries
                .par_iter()
                .enumerate()
                .map(|(index, g)| self.sample_feature(raster, index, g, mode))
                .collect::<Result<_>>()?
        } else {
            geometries
                .iter()
                .enumerate()
                .map(|(index, g)| self.sample_feature(raster, index, g, mode))
                .collect::<Result<_>>()?
        };

        let mut output = SampleOutput::default();
        for outcome in outcomes {
            match outcome {
                FeatureOutcome::ShapeMismatch => output.counters.shape_mismatch += 1,
                FeatureOutcome::Valid(lines) => {
                    output.counters.processed += 1;
                    output.counters.valid += 1;
                    output.lines.extend(lines);
                }
                FeatureOutcome::InvalidNodata => {
                    output.counters.processed += 1;
                    output.counters.invalid_nodata += 1;
                }
            }
        }

        output
            .counters
            .log_summary(mode.label(), mode.expected_points());
        Ok(output)
    }

    fn sample_feature(
        &self,
        raster: &RasterGrid,
        index: usize,
        geometry: &InputGeometry,
        mode: Mode,
    ) -> Result<FeatureOutcome> {
        let vertices = match geometry {
            InputGeometry::LineString(vertices) => vertices,
            InputGeometry::Other(name) => {
                return Err(HydroError::invalid_geometry(index, name.as_str()))
            }
        };

        let (validated, max_sample_dist) = match mode {
            Mode::Line => (Geometry::line(vertices), 0.0),
            Mode::Horseshoe { max_sample_dist } => {
                (Geometry::horseshoe(vertices), max_sample_dist)
            }
        };

        let geometry = match validated {
            Ok(geometry) => geometry,
            Err(mismatch) => {
                debug!(
                    feature = index,
                    expected = mismatch.expected,
                    actual = mismatch.actual,
                    "skipping geometry with unexpected point count"
                );
                return Ok(FeatureOutcome::ShapeMismatch);
            }
        };

        Ok(
            match self.sample_geometry(raster, &geometry, max_sample_dist)? {
                Some(lines) => FeatureOutcome::Valid(lines),
                None => FeatureOutcome::InvalidNodata,
            },
        )
    }
}

fn sample_line(
    raster: &RasterGrid,
    p0: Vertex,
    p1: Vertex,
) -> Result<Option<Vec<ElevationLine>>> {
    let interpolator = window_interpolator(raster, &[p0, p1])?;

    let z0 = interpolator.query(p0.x, p0.y);
    let z1 = interpolator.query(p1.x, p1.y);
    if !(z0.is_finite() && z1.is_finite()) {
        return Ok(None);
    }

    Ok(Some(vec![ElevationLine::segment(
        Point3::new(p0.x, p0.y, z0),
        Point3::new(p1.x, p1.y, z1),
    )]))
}

fn sample_horseshoe(
    raster: &RasterGrid,
    [a, b, c, d]: [Vertex; 4],
    max_sample_dist: f64,
) -> Result<Option<Vec<ElevationLine>>> {
    let interpolator = window_interpolator(raster, &[a, b, c, d])?;

    let open_length = (d.x - a.x).hypot(d.y - a.y);
    let closed_length = (c.x - b.x).hypot(c.y - b.y);
    let num_samples = horseshoe_sample_count(open_length, closed_length, max_sample_dist);
    if num_samples > MAX_PROFILE_SAMPLES {
        return Err(HydroError::invalid_config(format!(
            "max_sample_dist {} needs {} samples per profile, more than {}",
            max_sample_dist, num_samples, MAX_PROFILE_SAMPLES
        )));
    }

    let mut lines = Vec::with_capacity(num_samples);
    for t in profile_abscissa(num_samples) {
        let (open_x, open_y) = lerp(a, d, t);
        let (closed_x, closed_y) = lerp(b, c, t);

        let open_z = interpolator.query(open_x, open_y);
        let closed_z = interpolator.query(closed_x, closed_y);

        // One missing sample discards the whole horseshoe.
        if !(open_z.is_finite() && closed_z.is_finite()) {
            return Ok(None);
        }

        lines.push(ElevationLine::segment(
            Point3::new(open_x, open_y, open_z),
            Point3::new(closed_x, closed_y, closed_z),
        ));
    }

    Ok(Some(lines))
}

/// Interpolator over a small window around `vertices`.
fn window_interpolator(raster: &RasterGrid, vertices: &[Vertex]) -> Result<GridInterpolator> {
    let bbox = BoundingBox::from_points(vertices.iter().map(Vertex::xy))
        .ok_or_else(|| HydroError::invalid_raster("cannot window an empty geometry"))?;
    let window = get_window(raster, &bbox)?;
    GridInterpolator::build(&window)
}

fn lerp(from: Vertex, to: Vertex, t: f64) -> (f64, f64) {
    (from.x + t * (to.x - from.x), from.y + t * (to.y - from.y))
}

/// Number of samples along both horseshoe profiles (at least 2).
pub fn horseshoe_sample_count(open_length: f64, closed_length: f64, max_sample_dist: f64) -> usize {
    let longest = open_length.max(closed_length);
    let segments = (longest / max_sample_dist).ceil();
    // NaN or negative spans give zero intervals; huge ones saturate
    let segments = if segments > 0.0 { segments as usize } else { 0 };
    segments.saturating_add(1).max(2)
}

/// `num_samples` evenly spaced positions over `[0, 1]`, both ends included.
pub fn profile_abscissa(num_samples: usize) -> Vec<f64> {
    match num_samples {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let last = (n - 1) as f64;
            (0..n).map(|k| k as f64 / last).collect()
        }
    }
}

/// End-of-run reporting for sample counters.
pub trait CounterSummary {
    /// Log the counters the way the command-line tools report them.
    fn log_summary(&self, kind: &str, expected_points: usize);
}

impl CounterSummary for SampleCounters {
    fn log_summary(&self, kind: &str, expected_points: usize) {
        info!(kind, processed = self.processed, "processed {} geometries", kind);
        if self.shape_mismatch != 0 {
            error!(
                kind,
                skipped = self.shape_mismatch,
                "skipped geometries with point count not equal to {}",
                expected_points
            );
        }
        info!(kind, rendered = self.valid, "rendered {} objects with sampled Z", kind);
        if self.invalid_nodata != 0 {
            warn!(
                kind,
                skipped = self.invalid_nodata,
                "skipped rendering of {} objects due to missing DEM data",
                kind
            );
        }
    }
}
