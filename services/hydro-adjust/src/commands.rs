//! The sampling and burning commands.

use crate::config::AdjustConfig;
use anyhow::{Context, Result};
use dem_sampling::ProfileSampler;
use hydro_common::{InputGeometry, RasterGrid, SampleCounters, SampleOutput};
use hydro_io::{
    read_elevation_layer, read_geotiff, read_line_layer, write_elevation_layer, write_geotiff,
    ElevationLayer,
};
use line_burner::{burn_lines, BurnStats};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sample DEM elevation at the endpoints of 2-point lines.
pub fn run_sample_line_z(
    config: &AdjustConfig,
    input_raster: &Path,
    input_lines: &Path,
    output_lines: &Path,
) -> Result<SampleCounters> {
    run_sampling(
        config,
        input_raster,
        input_lines,
        output_lines,
        &config.output.lines_layer_name,
        |sampler, raster, geometries| sampler.sample_lines(raster, geometries),
    )
}

/// Render 4-point horseshoes as elevation lines across their profiles.
pub fn run_sample_horseshoe_z_lines(
    config: &AdjustConfig,
    input_raster: &Path,
    input_horseshoes: &Path,
    output_lines: &Path,
) -> Result<SampleCounters> {
    run_sampling(
        config,
        input_raster,
        input_horseshoes,
        output_lines,
        &config.output.horseshoe_layer_name,
        |sampler, raster, geometries| sampler.sample_horseshoes(raster, geometries),
    )
}

fn run_sampling<F>(
    config: &AdjustConfig,
    input_raster: &Path,
    input_lines: &Path,
    output_lines: &Path,
    layer_name: &str,
    sample: F,
) -> Result<SampleCounters>
where
    F: FnOnce(&ProfileSampler, &RasterGrid, &[InputGeometry]) -> hydro_common::Result<SampleOutput>,
{
    config.validate()?;

    let raster = read_geotiff(input_raster)
        .with_context(|| format!("Failed to read raster: {:?}", input_raster))?;
    let layer = read_line_layer(input_lines)
        .with_context(|| format!("Failed to read lines: {:?}", input_lines))?;

    let sampler = ProfileSampler::new(config.sampling.clone());
    let output = sample(&sampler, &raster.grid, &layer.geometries)
        .with_context(|| format!("Failed to sample {:?}", input_lines))?;

    let rendered = ElevationLayer::new(layer_name, layer.crs, output.lines);
    write_elevation_layer(output_lines, &rendered)
        .with_context(|| format!("Failed to write lines: {:?}", output_lines))?;

    info!(
        output = %output_lines.display(),
        layer = layer_name,
        lines = rendered.lines.len(),
        "wrote elevation lines"
    );
    Ok(output.counters)
}

/// Burn elevation-line layers, in order, into a copy of `input_raster`.
///
/// The output raster is only written once every layer has been burned.
pub fn run_burn_line_z(
    input_raster: &Path,
    output_raster: &Path,
    lines: &[PathBuf],
) -> Result<BurnStats> {
    let mut raster = read_geotiff(input_raster)
        .with_context(|| format!("Failed to read raster: {:?}", input_raster))?;

    let mut total = BurnStats::default();
    for path in lines {
        let layer = read_elevation_layer(path)
            .with_context(|| format!("Failed to read lines: {:?}", path))?;
        let stats = burn_lines(&mut raster.grid, &layer.lines)
            .with_context(|| format!("Failed to burn {:?}", path))?;

        info!(
            layer = %path.display(),
            lines = stats.lines,
            segments = stats.segments,
            skipped_segments = stats.skipped_segments,
            pixels = stats.pixels_written,
            "burned layer"
        );
        total += stats;
    }

    write_geotiff(output_raster, &raster)
        .with_context(|| format!("Failed to write raster: {:?}", output_raster))?;

    info!(
        output = %output_raster.display(),
        layers = lines.len(),
        pixels = total.pixels_written,
        "wrote burned raster"
    );
    Ok(total)
}
