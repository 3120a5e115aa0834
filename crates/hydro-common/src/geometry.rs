//! Vector geometries flowing through the sampling and burning stages.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// An input vertex. Z is optional because the sampled layers are usually 2-D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// A raw feature geometry as read from a vector source.
#[derive(Debug, Clone, PartialEq)]
pub enum InputGeometry {
    /// Any line-like geometry (2-D, Z, M or ZM line string).
    LineString(Vec<Vertex>),
    /// Any other geometry type, identified by its type name.
    Other(String),
}

impl InputGeometry {
    pub fn line_string<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Self::LineString(points.into_iter().map(|(x, y)| Vertex::new(x, y)).collect())
    }

    /// Name of the geometry type, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Self::LineString(_) => "LineString",
            Self::Other(name) => name,
        }
    }
}

/// A line-like geometry whose point count does not fit the requested variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// A validated sampling geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A two-point line object.
    Line { p0: Vertex, p1: Vertex },
    /// A culvert cross-section. A–D is the open profile edge, B–C the closed
    /// profile edge.
    HorseshoeQuad {
        a: Vertex,
        b: Vertex,
        c: Vertex,
        d: Vertex,
    },
}

impl Geometry {
    pub const LINE_POINTS: usize = 2;
    pub const HORSESHOE_POINTS: usize = 4;

    /// Build a line from exactly two vertices.
    pub fn line(vertices: &[Vertex]) -> Result<Self, ShapeMismatch> {
        match *vertices {
            [p0, p1] => Ok(Self::Line { p0, p1 }),
            _ => Err(ShapeMismatch {
                expected: Self::LINE_POINTS,
                actual: vertices.len(),
            }),
        }
    }

    /// Build a horseshoe from exactly four vertices, ordered A, B, C, D.
    pub fn horseshoe(vertices: &[Vertex]) -> Result<Self, ShapeMismatch> {
        match *vertices {
            [a, b, c, d] => Ok(Self::HorseshoeQuad { a, b, c, d }),
            _ => Err(ShapeMismatch {
                expected: Self::HORSESHOE_POINTS,
                actual: vertices.len(),
            }),
        }
    }

    /// The vertices in input order.
    pub fn vertices(&self) -> Vec<Vertex> {
        match *self {
            Self::Line { p0, p1 } => vec![p0, p1],
            Self::HorseshoeQuad { a, b, c, d } => vec![a, b, c, d],
        }
    }
}

/// A georeferenced point with elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// An elevation-tagged polyline, ready to be burned into a raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationLine {
    pub vertices: Vec<Point3>,
}

impl ElevationLine {
    /// A two-vertex line.
    pub fn segment(p0: Point3, p1: Point3) -> Self {
        Self {
            vertices: vec![p0, p1],
        }
    }

    pub fn new(vertices: Vec<Point3>) -> Self {
        Self { vertices }
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Per-run outcome tally of the profile sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCounters {
    /// Geometries with the expected point count that were sampled.
    pub processed: usize,
    /// Geometries skipped because of their point count.
    pub shape_mismatch: usize,
    /// Geometries rendered into output lines.
    pub valid: usize,
    /// Geometries discarded because a sampled Z was missing.
    pub invalid_nodata: usize,
}

impl AddAssign for SampleCounters {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.shape_mismatch += other.shape_mismatch;
        self.valid += other.valid;
        self.invalid_nodata += other.invalid_nodata;
    }
}

/// Output of one sampling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleOutput {
    pub lines: Vec<ElevationLine>,
    pub counters: SampleCounters,
}
