//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use galaxy_trail::{
    points_from_json, points_from_path_data, GeneratedPath, GenerationMode, PathConfig, Point,
};
use log::info;
use serde::{Deserialize, Serialize};

/// Output format for a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Standalone SVG document
    Svg,
    /// JSON array of `{x, y}` points
    Json,
    /// Bare SVG path data (the `d` attribute)
    Path,
    /// Raster image (needs --output)
    Png,
}

/// Which renderer draws PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Renderer {
    /// Rasterize the SVG document with resvg
    #[default]
    Svg,
    /// Replay draw commands onto a tiny-skia canvas
    Canvas,
}

/// Flags shared by every command that writes a trail.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "svg")]
    pub format: OutputFormat,

    /// Output file (stdout when omitted or "-")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Wrap JSON output with seed, mode and config
    #[arg(long)]
    pub meta: bool,

    /// PNG renderer
    #[arg(long, value_enum, default_value = "svg")]
    pub renderer: Renderer,

    /// PNG scale factor
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,
}

impl OutputArgs {
    /// The output file, if one was named.
    pub fn file(&self) -> Option<&Path> {
        self.output.as_deref().filter(|p| p.as_os_str() != "-")
    }
}

/// JSON document that records how a trail was made.
///
/// `galaxy-trail render` reads these back as well as bare point arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailDocument {
    /// RFC 3339 timestamp
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<GenerationMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(default)]
    pub config: PathConfig,
    pub points: Vec<Point>,
}

impl TrailDocument {
    pub fn from_generated(path: &GeneratedPath, config: &PathConfig) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            seed: Some(path.seed),
            mode: Some(path.mode),
            complete: Some(path.complete),
            config: config.clone(),
            points: path.points.clone(),
        }
    }
}

/// A trail read from disk, plus the canvas config if the file carried one.
#[derive(Debug, Clone)]
pub struct LoadedTrail {
    pub points: Vec<Point>,
    pub config: Option<PathConfig>,
}

/// Parse trail input: a JSON point array, a [`TrailDocument`], or SVG path data.
pub fn parse_trail(text: &str) -> Result<LoadedTrail> {
    let trimmed = text.trim_start();

    if trimmed.starts_with('[') {
        let points = points_from_json(trimmed)?;
        return Ok(LoadedTrail { points, config: None });
    }

    if trimmed.starts_with('{') {
        let doc: TrailDocument =
            serde_json::from_str(trimmed).context("Failed to parse trail document")?;
        return Ok(LoadedTrail { points: doc.points, config: Some(doc.config) });
    }

    let points = points_from_path_data(trimmed.trim_end())?;
    if points.is_empty() {
        bail!("No trail points found in input");
    }
    Ok(LoadedTrail { points, config: None })
}

/// Read a whole input file, or stdin for "-".
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write text output to the named file, or stdout.
pub fn write_text(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
