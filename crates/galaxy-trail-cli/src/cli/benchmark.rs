//! Benchmark command implementation.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use galaxy_trail::spline::curve_length;
use galaxy_trail::{generate, GenerationMode, PathConfig};
use log::info;

use super::generate::{ModeArg, PathArgs};

#[derive(Debug, Clone, Args)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub path: PathArgs,

    /// Only benchmark this mode (default: both)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Trails to generate per mode
    #[arg(short, long, default_value_t = 20)]
    pub runs: u64,

    /// First seed; run i uses seed + i
    #[arg(long, default_value_t = 1)]
    pub seed: u64,
}

/// Flattening tolerance for the curve length column, in canvas units.
const LENGTH_TOLERANCE: f64 = 0.1;

/// Totals for one mode.
#[derive(Debug, Default)]
struct ModeStats {
    elapsed: Duration,
    points: usize,
    complete: usize,
    relaxed_trails: usize,
    curve_length: f64,
    placements: BTreeMap<&'static str, usize>,
}

fn run_mode(config: &PathConfig, mode: GenerationMode, runs: u64, first_seed: u64) -> ModeStats {
    let mut stats = ModeStats::default();

    for i in 0..runs {
        let start = Instant::now();
        let path = generate(config, mode, first_seed.wrapping_add(i));
        stats.elapsed += start.elapsed();

        stats.points += path.len();
        stats.complete += usize::from(path.complete);
        stats.relaxed_trails += usize::from(path.has_relaxed_points());
        stats.curve_length += curve_length(&path.commands(), LENGTH_TOLERANCE);
        for placement in &path.placements {
            *stats.placements.entry(placement.name()).or_default() += 1;
        }
    }

    stats
}

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &BenchmarkArgs) -> Result<()> {
    let run = args.path.resolve()?;
    let config = run.path;
    let runs = args.runs.max(1);
    let modes: Vec<GenerationMode> = match args.mode {
        Some(mode) => vec![mode.into()],
        None => vec![GenerationMode::Simple, GenerationMode::Cascade],
    };

    info!(
        "Benchmarking {} runs of {} points on {}x{}",
        runs, config.num_points, config.width, config.height
    );

    for mode in modes {
        let stats = run_mode(&config, mode, runs, args.seed);
        let ms = stats.elapsed.as_secs_f64() * 1000.0;

        println!();
        println!("═══════════════════════════════════════════════");
        println!("  BENCHMARK: {}", mode.name().to_uppercase());
        println!("═══════════════════════════════════════════════");
        println!("  Runs: {}", runs);
        println!("  Points requested: {}", config.num_points);
        println!("  Avg points placed: {:.1}", stats.points as f64 / runs as f64);
        println!("  Complete trails: {}/{}", stats.complete, runs);
        println!("  Trails with relaxed points: {}", stats.relaxed_trails);
        println!("  Avg curve length: {:.1}", stats.curve_length / runs as f64);
        println!("  Time (ms): {:.2}", ms);
        println!("  Avg per trail: {:.3}ms", ms / runs as f64);
        println!("  Placements:");
        for (name, count) in &stats.placements {
            println!("    {:<16} {}", name, count);
        }
        println!("═══════════════════════════════════════════════");
    }

    Ok(())
}
