//! hydro-adjust command-line tool.
//!
//! Samples culvert lines and horseshoe cross-sections against a DEM and
//! burns the resulting elevation lines back into it.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use hydro_adjust::{run_burn_line_z, run_sample_horseshoe_z_lines, run_sample_line_z, AdjustConfig};

#[derive(Parser, Debug)]
#[command(name = "hydro-adjust")]
#[command(about = "Hydrological adjustment of DEMs along culverts and bridges")]
struct Args {
    /// Log level, used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "HYDRO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample Z at the endpoints of 2-point line objects
    SampleLineZ {
        /// DEM to sample
        input_raster: PathBuf,
        /// GeoJSON layer of 2-point lines
        input_lines: PathBuf,
        /// GeoJSON file to write the lines with Z to
        output_lines: PathBuf,
        /// Sample features in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Render 4-point horseshoes as Z lines across their profiles
    SampleHorseshoeZLines {
        /// DEM to sample
        input_raster: PathBuf,
        /// GeoJSON layer of 4-point horseshoes
        input_horseshoes: PathBuf,
        /// GeoJSON file to write the rendered lines to
        output_lines: PathBuf,
        /// Maximum distance between profile samples (default: half the
        /// pixel diagonal)
        #[arg(long)]
        max_sample_dist: Option<f64>,
        /// Sample features in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Burn Z lines into a copy of a DEM
    BurnLineZ {
        /// DEM to burn into
        input_raster: PathBuf,
        /// Where to write the burned DEM
        output_raster: PathBuf,
        /// GeoJSON layers of Z lines, burned in the given order
        #[arg(required = true)]
        lines: Vec<PathBuf>,
    },
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .json()
            .init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(false).init(),
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format);

    let mut config = AdjustConfig::load(args.config.as_deref())?;

    match args.command {
        Command::SampleLineZ {
            input_raster,
            input_lines,
            output_lines,
            parallel,
        } => {
            config.sampling.parallel |= parallel;
            config.validate()?;
            info!(input = %input_lines.display(), "sampling line Z");
            run_sample_line_z(&config, &input_raster, &input_lines, &output_lines)?;
        }
        Command::SampleHorseshoeZLines {
            input_raster,
            input_horseshoes,
            output_lines,
            max_sample_dist,
            parallel,
        } => {
            if let Some(dist) = max_sample_dist {
                config.sampling.max_sample_dist = Some(dist);
            }
            config.sampling.parallel |= parallel;
            config.validate()?;
            info!(input = %input_horseshoes.display(), "sampling horseshoe Z lines");
            run_sample_horseshoe_z_lines(&config, &input_raster, &input_horseshoes, &output_lines)?;
        }
        Command::BurnLineZ {
            input_raster,
            output_raster,
            lines,
        } => {
            info!(layers = lines.len(), "burning line Z");
            run_burn_line_z(&input_raster, &output_raster, &lines)?;
        }
    }

    Ok(())
}
