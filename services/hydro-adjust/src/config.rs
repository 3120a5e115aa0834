//! Configuration for the hydro-adjust commands.
//!
//! Built-in defaults are overridden by an optional YAML file, then by
//! `HYDRO_*` environment variables, then by command-line flags.

use anyhow::{bail, Context, Result};
use dem_sampling::SamplerConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_LINES_LAYER_NAME: &str = "rendered_lines";
pub const DEFAULT_HORSESHOE_LAYER_NAME: &str = "rendered_horseshoe_lines";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustConfig {
    pub sampling: SamplerConfig,
    pub output: OutputConfig,
}

/// Names of the layers written by the sampling commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub lines_layer_name: String,
    pub horseshoe_layer_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            lines_layer_name: DEFAULT_LINES_LAYER_NAME.to_string(),
            horseshoe_layer_name: DEFAULT_HORSESHOE_LAYER_NAME.to_string(),
        }
    }
}

impl AdjustConfig {
    /// Defaults, overlaid with `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `HYDRO_*` overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HYDRO_MAX_SAMPLE_DIST") {
            let dist = value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("HYDRO_MAX_SAMPLE_DIST is not a number: {}", value))?;
            self.sampling.max_sample_dist = Some(dist);
        }
        if let Some(value) = lookup("HYDRO_PARALLEL") {
            self.sampling.parallel = parse_bool(&value)
                .with_context(|| format!("HYDRO_PARALLEL is not a boolean: {}", value))?;
        }
        if let Some(value) = lookup("HYDRO_LINES_LAYER_NAME") {
            self.output.lines_layer_name = value;
        }
        if let Some(value) = lookup("HYDRO_HORSESHOE_LAYER_NAME") {
            self.output.horseshoe_layer_name = value;
        }
        Ok(())
    }

    /// Reject invalid settings before any file is touched.
    pub fn validate(&self) -> Result<()> {
        self.sampling.validate()?;
        if self.output.lines_layer_name.trim().is_empty() {
            bail!("output.lines_layer_name must not be empty");
        }
        if self.output.horseshoe_layer_name.trim().is_empty() {
            bail!("output.horseshoe_layer_name must not be empty");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
