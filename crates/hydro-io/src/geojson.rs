//! GeoJSON line layers.
//!
//! Input layers may hold any geometry type; line strings become
//! [`InputGeometry::LineString`] and everything else is passed on as
//! [`InputGeometry::Other`] so the sampler can reject it. Elevation layers
//! are always 3-D line strings.

use crate::error::{IoError, Result};
use hydro_common::{ElevationLine, InputGeometry, Point3, Vertex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A layer of features to be sampled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineLayer {
    pub name: Option<String>,
    /// The collection's `crs` member, kept verbatim.
    pub crs: Option<Value>,
    pub geometries: Vec<InputGeometry>,
}

/// A layer of elevation-tagged lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElevationLayer {
    pub name: Option<String>,
    pub crs: Option<Value>,
    pub lines: Vec<ElevationLine>,
}

impl ElevationLayer {
    pub fn new(name: impl Into<String>, crs: Option<Value>, lines: Vec<ElevationLine>) -> Self {
        Self {
            name: Some(name.into()),
            crs,
            lines,
        }
    }
}

/// A GeoJSON FeatureCollection as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeatureCollectionDoc {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    crs: Option<Value>,

    features: Vec<FeatureDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeatureDoc {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    type_: String,

    #[serde(default)]
    properties: Option<Map<String, Value>>,

    geometry: Option<GeometryDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type")]
    type_: String,

    #[serde(default)]
    coordinates: Value,
}

impl FeatureCollectionDoc {
    fn parse(text: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(text)?;
        if doc.type_ != "FeatureCollection" {
            return Err(IoError::invalid_geometry(
                0,
                format!("expected a FeatureCollection, found {}", doc.type_),
            ));
        }
        Ok(doc)
    }

    /// Geometries of all features, failing on a null geometry.
    fn geometries(&self) -> Result<impl Iterator<Item = (usize, &GeometryDoc)> + '_> {
        if let Some(index) = self.features.iter().position(|f| f.geometry.is_none()) {
            return Err(IoError::invalid_geometry(index, "feature has no geometry"));
        }
        Ok(self
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, f)| f.geometry.as_ref().map(|g| (index, g))))
    }
}

/// Parse a line layer from GeoJSON text.
pub fn parse_line_layer(text: &str) -> Result<LineLayer> {
    let doc = FeatureCollectionDoc::parse(text)?;

    let geometries = doc
        .geometries()?
        .map(|(index, geometry)| match geometry.type_.as_str() {
            "LineString" => {
                let vertices = parse_positions(index, &geometry.coordinates)?;
                Ok(InputGeometry::LineString(vertices))
            }
            other => Ok(InputGeometry::Other(other.to_string())),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LineLayer {
        name: doc.name,
        crs: doc.crs,
        geometries,
    })
}

/// Read a line layer from a GeoJSON file.
pub fn read_line_layer<P: AsRef<Path>>(path: P) -> Result<LineLayer> {
    let path = path.as_ref();
    let layer = parse_line_layer(&fs::read_to_string(path)?)?;
    debug!(
        path = %path.display(),
        features = layer.geometries.len(),
        "read line layer"
    );
    Ok(layer)
}

/// Parse an elevation layer from GeoJSON text.
///
/// Every feature must be a line string with Z on every vertex.
pub fn parse_elevation_layer(text: &str) -> Result<ElevationLayer> {
    let doc = FeatureCollectionDoc::parse(text)?;

    let lines = doc
        .geometries()?
        .map(|(index, geometry)| {
            if geometry.type_ != "LineString" {
                return Err(IoError::invalid_geometry(
                    index,
                    format!("expected LineString, found {}", geometry.type_),
                ));
            }
            let vertices = parse_positions(index, &geometry.coordinates)?
                .into_iter()
                .map(|v| match v.z {
                    Some(z) => Ok(Point3::new(v.x, v.y, z)),
                    None => Err(IoError::invalid_geometry(index, "vertex has no Z")),
                })
                .collect::<Result<Vec<_>>>()?;
            if vertices.len() < 2 {
                return Err(IoError::invalid_geometry(
                    index,
                    "line needs at least two vertices",
                ));
            }
            Ok(ElevationLine::new(vertices))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ElevationLayer {
        name: doc.name,
        crs: doc.crs,
        lines,
    })
}

/// Read an elevation layer from a GeoJSON file.
pub fn read_elevation_layer<P: AsRef<Path>>(path: P) -> Result<ElevationLayer> {
    let path = path.as_ref();
    let layer = parse_elevation_layer(&fs::read_to_string(path)?)?;
    debug!(
        path = %path.display(),
        lines = layer.lines.len(),
        "read elevation layer"
    );
    Ok(layer)
}

/// Serialize an elevation layer as a GeoJSON FeatureCollection.
pub fn elevation_layer_to_string(layer: &ElevationLayer) -> Result<String> {
    let features = layer
        .lines
        .iter()
        .map(|line| FeatureDoc {
            type_: "Feature".to_string(),
            properties: Some(Map::new()),
            geometry: Some(GeometryDoc {
                type_: "LineString".to_string(),
                coordinates: Value::from(
                    line.vertices
                        .iter()
                        .map(|p| vec![p.x, p.y, p.z])
                        .collect::<Vec<_>>(),
                ),
            }),
        })
        .collect();

    let doc = FeatureCollectionDoc {
        type_: "FeatureCollection".to_string(),
        name: layer.name.clone(),
        crs: layer.crs.clone(),
        features,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Write an elevation layer to a GeoJSON file, replacing any existing file.
pub fn write_elevation_layer<P: AsRef<Path>>(path: P, layer: &ElevationLayer) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, elevation_layer_to_string(layer)?)?;
    debug!(
        path = %path.display(),
        lines = layer.lines.len(),
        "wrote elevation layer"
    );
    Ok(())
}

/// Vertices of a LineString. Ordinates past Z (M) are dropped.
fn parse_positions(index: usize, coordinates: &Value) -> Result<Vec<Vertex>> {
    let positions = coordinates
        .as_array()
        .ok_or_else(|| IoError::invalid_geometry(index, "coordinates must be an array"))?;

    positions
        .iter()
        .map(|position| {
            let ordinates = position
                .as_array()
                .ok_or_else(|| IoError::invalid_geometry(index, "position must be an array"))?;
            let values = ordinates
                .iter()
                .map(|v| {
                    v.as_f64()
                        .ok_or_else(|| IoError::invalid_geometry(index, "ordinate is not a number"))
                })
                .collect::<Result<Vec<f64>>>()?;
            match values[..] {
                [x, y] => Ok(Vertex::new(x, y)),
                [x, y, z, ..] => Ok(Vertex::with_z(x, y, z)),
                _ => Err(IoError::invalid_geometry(
                    index,
                    "position needs at least two ordinates",
                )),
            }
        })
        .collect()
}
