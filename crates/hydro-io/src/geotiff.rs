//! Single-band GeoTIFF reading and writing.
//!
//! Georeferencing is read from either ModelPixelScale + ModelTiepoint or
//! ModelTransformation. The GeoKey tags that describe the spatial reference
//! are carried through untouched, so a raster written back keeps the CRS of
//! the one it was read from.

use crate::error::{IoError, Result};
use hydro_common::{GeoTransform, RasterGrid};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::colortype::{
    ColorType, Gray16, Gray32, Gray32Float, Gray64, Gray64Float, Gray8, GrayI16, GrayI32, GrayI64,
    GrayI8,
};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind, TiffValue};
use tiff::tags::Tag;
use tracing::{debug, warn};

// GeoTIFF tags
const GEOTIFF_MODELPIXELSCALE: Tag = Tag::ModelPixelScaleTag;
const GEOTIFF_MODELTIEPOINT: Tag = Tag::ModelTiepointTag;
const GEOTIFF_MODELTRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GEOTIFF_GEOKEYDIRECTORY: Tag = Tag::GeoKeyDirectoryTag;
const GEOTIFF_GEODOUBLEPARAMS: Tag = Tag::GeoDoubleParamsTag;
const GEOTIFF_GEOASCIIPARAMS: Tag = Tag::GeoAsciiParamsTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

// GeoKey codes
const GT_RASTER_TYPE_GEOKEY: u16 = 1025;
const RASTER_PIXEL_IS_POINT: u16 = 2;

/// The spatial-reference tags of a GeoTIFF, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoKeys {
    pub directory: Option<Vec<u16>>,
    pub double_params: Option<Vec<f64>>,
    pub ascii_params: Option<String>,
}

impl GeoKeys {
    fn read<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Self> {
        let directory = decoder
            .find_tag(GEOTIFF_GEOKEYDIRECTORY)?
            .map(|v| v.into_u16_vec())
            .transpose()?;
        let double_params = decoder
            .find_tag(GEOTIFF_GEODOUBLEPARAMS)?
            .map(|v| v.into_f64_vec())
            .transpose()?;
        let ascii_params = decoder
            .find_tag(GEOTIFF_GEOASCIIPARAMS)?
            .map(|v| v.into_string())
            .transpose()?
            .map(|s| s.trim_end_matches(char::from(0)).to_string());
        Ok(Self {
            directory,
            double_params,
            ascii_params,
        })
    }

    fn write<W: Write + Seek, K: TiffKind>(&self, dir: &mut DirectoryEncoder<W, K>) -> Result<()> {
        if let Some(directory) = &self.directory {
            dir.write_tag(GEOTIFF_GEOKEYDIRECTORY, directory.as_slice())?;
        }
        if let Some(params) = &self.double_params {
            dir.write_tag(GEOTIFF_GEODOUBLEPARAMS, params.as_slice())?;
        }
        if let Some(params) = &self.ascii_params {
            dir.write_tag(GEOTIFF_GEOASCIIPARAMS, params.as_str())?;
        }
        Ok(())
    }

    /// Value of a GeoKey stored inline in the directory.
    ///
    /// Keys whose value lives in one of the params tags return `None`.
    pub fn short_value(&self, key: u16) -> Option<u16> {
        let directory = self.directory.as_deref()?;
        // Header is [version, revision, minor, count]; entries are
        // [key, location, count, value].
        directory
            .get(4..)?
            .chunks_exact(4)
            .find(|entry| entry[0] == key && entry[1] == 0)
            .map(|entry| entry[3])
    }

    /// Whether the tie point refers to the center rather than the corner of
    /// a pixel.
    pub fn is_pixel_is_point(&self) -> bool {
        self.short_value(GT_RASTER_TYPE_GEOKEY) == Some(RASTER_PIXEL_IS_POINT)
    }
}

/// Numeric type of the samples stored in a GeoTIFF band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    #[default]
    F32,
    F64,
}

impl SampleType {
    /// `value` as it compares against samples of this type once widened to
    /// f64.
    pub fn quantize(self, value: f64) -> f64 {
        match self {
            SampleType::F32 => value as f32 as f64,
            _ => value,
        }
    }
}

/// A raster read from, or to be written to, a GeoTIFF.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTiffRaster {
    /// Samples and corner-based geotransform.
    pub grid: RasterGrid,
    pub georef: GeoKeys,
    /// Sample type written back to disk.
    pub sample_type: SampleType,
}

impl GeoTiffRaster {
    /// A raster written as 32-bit float.
    pub fn new(grid: RasterGrid, georef: GeoKeys) -> Self {
        Self {
            grid,
            georef,
            sample_type: SampleType::F32,
        }
    }

    pub fn with_sample_type(mut self, sample_type: SampleType) -> Self {
        self.sample_type = sample_type;
        self
    }
}

/// Read band 1 of a GeoTIFF into f64 samples.
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> Result<GeoTiffRaster> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    // DEM tiles are routinely larger than the default decoding limits
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024;
    limits.intermediate_buffer_size = 1024 * 1024 * 1024;
    limits.ifd_value_size = 1024 * 1024 * 1024;
    decoder = decoder.with_limits(limits);

    let (width, height) = decoder.dimensions()?;

    match decoder.colortype()? {
        tiff::ColorType::Gray(_) => {}
        other => {
            return Err(IoError::unsupported_raster(format!(
                "expected a single-band raster, found {:?}",
                other
            )))
        }
    }

    let georef = GeoKeys::read(&mut decoder)?;
    let geotransform = read_geotransform(&mut decoder, &georef)?;
    let nodata = read_nodata_value(&mut decoder)?;
    let (data, sample_type) = decode_samples(&mut decoder)?;
    // Samples are widened from the band type; the sentinel must be too
    let nodata = nodata.map(|v| sample_type.quantize(v));

    debug!(
        path = %path.display(),
        width,
        height,
        sample_type = ?sample_type,
        nodata = ?nodata,
        "read GeoTIFF"
    );

    let grid = RasterGrid::from_vec(height as usize, width as usize, data, geotransform, nodata)?;
    Ok(GeoTiffRaster {
        grid,
        georef,
        sample_type,
    })
}

/// Write a raster as a single-band GeoTIFF of its sample type.
///
/// Integer samples are rounded and saturated to the type's range; NaN cells
/// are written as the nodata value, or 0 without one.
pub fn write_geotiff<P: AsRef<Path>>(path: P, raster: &GeoTiffRaster) -> Result<()> {
    let path = path.as_ref();
    let grid = &raster.grid;

    let width = u32::try_from(grid.cols())
        .map_err(|_| IoError::unsupported_raster("raster is too wide for TIFF"))?;
    let height = u32::try_from(grid.rows())
        .map_err(|_| IoError::unsupported_raster("raster is too tall for TIFF"))?;
    if width == 0 || height == 0 {
        return Err(IoError::unsupported_raster("cannot write an empty raster"));
    }

    let writer = BufWriter::new(File::create(path)?);
    let mut tiff = TiffEncoder::new(writer)?;

    let fill = grid.nodata().unwrap_or(0.0);
    let int = |v: f64| if v.is_nan() { fill } else { v.round() };
    match raster.sample_type {
        SampleType::U8 => write_image::<Gray8, _, _>(&mut tiff, raster, |v| int(v) as u8)?,
        SampleType::I8 => write_image::<GrayI8, _, _>(&mut tiff, raster, |v| int(v) as i8)?,
        SampleType::U16 => write_image::<Gray16, _, _>(&mut tiff, raster, |v| int(v) as u16)?,
        SampleType::I16 => write_image::<GrayI16, _, _>(&mut tiff, raster, |v| int(v) as i16)?,
        SampleType::U32 => write_image::<Gray32, _, _>(&mut tiff, raster, |v| int(v) as u32)?,
        SampleType::I32 => write_image::<GrayI32, _, _>(&mut tiff, raster, |v| int(v) as i32)?,
        SampleType::U64 => write_image::<Gray64, _, _>(&mut tiff, raster, |v| int(v) as u64)?,
        SampleType::I64 => write_image::<GrayI64, _, _>(&mut tiff, raster, |v| int(v) as i64)?,
        SampleType::F32 => write_image::<Gray32Float, _, _>(&mut tiff, raster, |v| v as f32)?,
        SampleType::F64 => write_image::<Gray64Float, _, _>(&mut tiff, raster, |v| v)?,
    }

    debug!(
        path = %path.display(),
        width,
        height,
        sample_type = ?raster.sample_type,
        "wrote GeoTIFF"
    );
    Ok(())
}

fn write_image<C, W, F>(
    encoder: &mut TiffEncoder<W>,
    raster: &GeoTiffRaster,
    convert: F,
) -> Result<()>
where
    C: ColorType,
    [C::Inner]: TiffValue,
    W: Write + Seek,
    F: Fn(f64) -> C::Inner,
{
    let grid = &raster.grid;
    // Dimensions were checked against u32 by the caller
    let mut image = encoder.new_image::<C>(grid.cols() as u32, grid.rows() as u32)?;

    write_georeferencing(image.encoder(), raster)?;
    if let Some(nodata) = grid.nodata() {
        let text = format!("{}", nodata);
        image.encoder().write_tag(GDAL_NODATA, text.as_str())?;
    }

    let samples: Vec<C::Inner> = grid.data().iter().map(|&v| convert(v)).collect();
    image.write_data(&samples)?;
    Ok(())
}

fn read_f64_tag<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> Result<Option<Vec<f64>>> {
    Ok(decoder
        .find_tag(tag)?
        .map(|v| v.into_f64_vec())
        .transpose()?)
}

fn read_geotransform<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    georef: &GeoKeys,
) -> Result<GeoTransform> {
    let transformation = read_f64_tag(decoder, GEOTIFF_MODELTRANSFORMATION)?;
    let tiepoint = read_f64_tag(decoder, GEOTIFF_MODELTIEPOINT)?;
    let pixel_scale = read_f64_tag(decoder, GEOTIFF_MODELPIXELSCALE)?;

    let geotransform = match (transformation, tiepoint, pixel_scale) {
        // Row-major 4×4 matrix mapping (col, row, 0, 1) to (x, y, z, 1)
        (Some(m), _, _) if m.len() >= 16 => {
            GeoTransform::from_gdal([m[3], m[0], m[1], m[7], m[4], m[5]])
        }
        // Tiepoint [I, J, K, X, Y, Z] and scale [ScaleX, ScaleY, ScaleZ]
        (_, Some(tp), Some(scale)) if tp.len() >= 6 && scale.len() >= 2 => {
            let (sx, sy) = (scale[0], scale[1]);
            GeoTransform::north_up(tp[3] - tp[0] * sx, tp[4] + tp[1] * sy, sx, -sy)
        }
        _ => {
            return Err(IoError::unsupported_raster(
                "no ModelTransformation or ModelTiepoint/ModelPixelScale tags",
            ))
        }
    };

    if georef.is_pixel_is_point() {
        // Tie point is a pixel center; move it to the corner.
        return Ok(geotransform.offset_fractional(-0.5, -0.5));
    }
    Ok(geotransform)
}

fn write_georeferencing<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<W, K>,
    raster: &GeoTiffRaster,
) -> Result<()> {
    let mut gt = *raster.grid.geotransform();
    if raster.georef.is_pixel_is_point() {
        gt = gt.offset_fractional(0.5, 0.5);
    }

    if !gt.is_rotated() && gt.pixel_height < 0.0 {
        // ModelPixelScale: [ScaleX, ScaleY, ScaleZ]
        let pixel_scale = [gt.pixel_width, -gt.pixel_height, 0.0];
        dir.write_tag(GEOTIFF_MODELPIXELSCALE, pixel_scale.as_slice())?;

        // ModelTiepoint: pixel (0, 0) to the origin
        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        dir.write_tag(GEOTIFF_MODELTIEPOINT, tiepoint.as_slice())?;
    } else {
        let matrix = [
            gt.pixel_width,
            gt.row_rotation,
            0.0,
            gt.origin_x,
            gt.col_rotation,
            gt.pixel_height,
            0.0,
            gt.origin_y,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ];
        dir.write_tag(GEOTIFF_MODELTRANSFORMATION, matrix.as_slice())?;
    }

    raster.georef.write(dir)
}

/// Read the no-data value from the GDAL_NODATA tag.
fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>> {
    let Some(value) = decoder.find_tag(GDAL_NODATA)? else {
        return Ok(None);
    };
    let text = value.into_string()?;
    let text = text.trim_matches(char::from(0)).trim();
    match text.parse::<f64>() {
        Ok(nodata) => Ok(Some(nodata)),
        Err(_) => {
            warn!(value = text, "ignoring unparseable GDAL_NODATA tag");
            Ok(None)
        }
    }
}

/// Decode the image samples of any numeric type into f64.
fn decode_samples<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<(Vec<f64>, SampleType)> {
    let result = decoder.read_image()?;

    Ok(match result {
        DecodingResult::F32(data) => (data.into_iter().map(f64::from).collect(), SampleType::F32),
        DecodingResult::F64(data) => (data, SampleType::F64),
        DecodingResult::I16(data) => (data.into_iter().map(f64::from).collect(), SampleType::I16),
        DecodingResult::I32(data) => (data.into_iter().map(f64::from).collect(), SampleType::I32),
        DecodingResult::U16(data) => (data.into_iter().map(f64::from).collect(), SampleType::U16),
        DecodingResult::U32(data) => (data.into_iter().map(f64::from).collect(), SampleType::U32),
        DecodingResult::U8(data) => (data.into_iter().map(f64::from).collect(), SampleType::U8),
        DecodingResult::I8(data) => (data.into_iter().map(f64::from).collect(), SampleType::I8),
        DecodingResult::U64(data) => (data.into_iter().map(|v| v as f64).collect(), SampleType::U64),
        DecodingResult::I64(data) => (data.into_iter().map(|v| v as f64).collect(), SampleType::I64),
    })
}
