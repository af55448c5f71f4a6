//! Render command implementation.
//!
//! Reads a trail back (JSON points, a trail document, or SVG path data) and
//! writes it in any output format. Useful for re-styling a saved trail or
//! turning a hand-edited path into a PNG.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use galaxy_trail::export::points_to_json_pretty;
use galaxy_trail::{catmull_rom, path_data, trail_to_svg, PathConfig, Trail, Violation};
use log::{info, warn};

use super::common::{parse_trail, read_input, write_text, OutputArgs, OutputFormat};
use super::config::RunConfig;
use super::raster::{save_png, Frame};

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Trail file ("-" for stdin)
    pub input: PathBuf,

    /// Run config YAML (only the path and style sections are used)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Canvas width (defaults to the trail document's, then the config's)
    #[arg(long)]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    pub height: Option<f64>,

    /// Report placement rules the trail breaks
    #[arg(long)]
    pub audit: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the render command.
pub fn cmd_render(args: &RenderArgs) -> Result<()> {
    let run = RunConfig::load_or_default(args.config.as_deref())?;
    let loaded = parse_trail(&read_input(&args.input)?)?;
    info!("Loaded {} points from {}", loaded.points.len(), args.input.display());

    let mut config: PathConfig = loaded.config.unwrap_or(run.path);
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }

    if args.audit {
        report_violations(&Trail::from_points(loaded.points.clone(), &config));
    }

    let points = loaded.points;
    let output = &args.output;
    match output.format {
        OutputFormat::Svg => write_text(
            output.file(),
            &trail_to_svg(&points, &run.style, config.width, config.height),
        ),
        OutputFormat::Path => write_text(output.file(), &path_data(&catmull_rom(&points))),
        OutputFormat::Json => write_text(output.file(), &points_to_json_pretty(&points)?),
        OutputFormat::Png => {
            let Some(file) = output.file() else {
                bail!("PNG output needs --output <file>");
            };
            let frame = Frame { width: config.width, height: config.height, scale: output.scale };
            save_png(file, output.renderer, &points, &run.style, frame)
        }
    }
}

fn report_violations(trail: &Trail) {
    let violations = trail.audit();
    if violations.is_empty() {
        info!("Audit: trail follows every placement rule");
        return;
    }

    warn!("Audit: {} problem(s)", violations.len());
    for v in &violations {
        match v {
            Violation::OutOfBounds { index } => warn!("  point {} is outside the margin", index),
            Violation::PointsTooClose { a, b, distance } => {
                warn!("  points {} and {} are {:.2} apart", a, b, distance)
            }
            Violation::SegmentsCross { a, b } => warn!("  segments {} and {} cross", a, b),
            Violation::SegmentsTooClose { a, b, distance } => {
                warn!("  segments {} and {} are {:.2} apart", a, b, distance)
            }
        }
    }
}
