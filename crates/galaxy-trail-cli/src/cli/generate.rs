//! Generate command implementation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use galaxy_trail::export::points_to_json_pretty;
use galaxy_trail::{
    generate, generate_within, path_data, trail_to_svg, GeneratedPath, GenerationMode, PathConfig,
    TrailStyle,
};
use log::{info, warn};
use rand::Rng;

use super::common::{write_text, OutputArgs, OutputFormat, TrailDocument};
use super::config::RunConfig;
use super::raster::{save_png, Frame};

/// Mode names as the command line spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One random proposal per attempt, then a step toward the center
    Simple,
    /// Proposals first, then the six fallback strategies
    Cascade,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => GenerationMode::Simple,
            ModeArg::Cascade => GenerationMode::Cascade,
        }
    }
}

/// Trail shape flags. Each one overrides the run config.
#[derive(Debug, Clone, Default, Args)]
pub struct PathArgs {
    /// Run config YAML (mode, seed, path and style sections)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(long)]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    pub height: Option<f64>,

    /// Minimum distance from the canvas edge
    #[arg(short, long)]
    pub boundary: Option<f64>,

    /// Minimum distance between points
    #[arg(short, long)]
    pub spacing: Option<f64>,

    /// Minimum distance between segments (defaults to --spacing)
    #[arg(long)]
    pub segment_spacing: Option<f64>,

    /// Number of points to place
    #[arg(short = 'n', long)]
    pub points: Option<usize>,

    /// Attempt budget per point
    #[arg(long)]
    pub attempts: Option<usize>,
}

impl PathArgs {
    /// Load the run config and lay the flags over it.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut run = RunConfig::load_or_default(self.config.as_deref())?;
        self.apply(&mut run.path);
        Ok(run)
    }

    fn apply(&self, path: &mut PathConfig) {
        if let Some(v) = self.width {
            path.width = v;
        }
        if let Some(v) = self.height {
            path.height = v;
        }
        if let Some(v) = self.boundary {
            path.min_boundary_distance = v;
        }
        if let Some(v) = self.spacing {
            path.min_path_distance = v;
        }
        if let Some(v) = self.segment_spacing {
            path.min_segment_distance = Some(v);
        }
        if let Some(v) = self.points {
            path.num_points = v;
        }
        if let Some(v) = self.attempts {
            path.max_attempts = v;
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// Placement mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop placing points after this many milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Execute the generate command.
pub fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let run = args.path.resolve()?;
    let mode = args.mode.map(GenerationMode::from).or(run.mode).unwrap_or_default();
    let seed = args.seed.or(run.seed).unwrap_or_else(|| rand::rng().random());

    info!(
        "Generating {} points on {}x{} ({} mode, seed {})",
        run.path.num_points,
        run.path.width,
        run.path.height,
        mode,
        seed
    );

    let path = match args.timeout {
        Some(ms) => generate_within(&run.path, mode, seed, Duration::from_millis(ms)),
        None => generate(&run.path, mode, seed),
    };
    if !path.complete {
        warn!(
            "Placed {} of {} points",
            path.len(),
            run.path.num_points
        );
    }
    if path.has_relaxed_points() {
        warn!("Some points were placed with relaxed spacing");
    }

    write_trail(&path, &run.path, &run.style, &args.output)
}

/// Write a generated trail in the requested format.
pub fn write_trail(
    path: &GeneratedPath,
    config: &PathConfig,
    style: &TrailStyle,
    output: &OutputArgs,
) -> Result<()> {
    match output.format {
        OutputFormat::Svg => write_text(
            output.file(),
            &trail_to_svg(&path.points, style, config.width, config.height),
        ),
        OutputFormat::Path => write_text(output.file(), &path_data(&path.commands())),
        OutputFormat::Json if output.meta => {
            let doc = TrailDocument::from_generated(path, config);
            write_text(output.file(), &serde_json::to_string_pretty(&doc)?)
        }
        OutputFormat::Json => write_text(output.file(), &points_to_json_pretty(&path.points)?),
        OutputFormat::Png => {
            let Some(file) = output.file() else {
                bail!("PNG output needs --output <file>");
            };
            let frame = Frame { width: config.width, height: config.height, scale: output.scale };
            save_png(file, output.renderer, &path.points, style, frame)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_run_config() {
        let args = PathArgs {
            width: Some(300.0),
            spacing: Some(25.0),
            points: Some(8),
            ..PathArgs::default()
        };
        let run = args.resolve().unwrap();
        assert_eq!(run.path.width, 300.0);
        assert_eq!(run.path.height, PathConfig::default().height);
        assert_eq!(run.path.min_path_distance, 25.0);
        assert_eq!(run.path.segment_distance(), 25.0);
        assert_eq!(run.path.num_points, 8);
    }

    #[test]
    fn segment_spacing_flag_is_separate() {
        let args = PathArgs { spacing: Some(30.0), segment_spacing: Some(10.0), ..PathArgs::default() };
        let run = args.resolve().unwrap();
        assert_eq!(run.path.min_path_distance, 30.0);
        assert_eq!(run.path.segment_distance(), 10.0);
    }

    #[test]
    fn mode_arg_maps_to_generation_mode() {
        assert_eq!(GenerationMode::from(ModeArg::Simple), GenerationMode::Simple);
        assert_eq!(GenerationMode::from(ModeArg::Cascade), GenerationMode::Cascade);
    }
}
