//! galaxy-trail - CLI for winding galaxy-map trails
//!
//! Usage:
//!   galaxy-trail generate [options]        Place a trail and write it out
//!   galaxy-trail render <trail> [options]  Re-render a saved trail
//!   galaxy-trail strategies                List the fallback strategies
//!   galaxy-trail benchmark [options]       Time generation in both modes
//!
//! Set RUST_LOG (or pass -v / -q) to control how chatty it is on stderr.

mod cli;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use cli::{BenchmarkArgs, GenerateArgs, RenderArgs};

#[derive(Debug, Parser)]
#[command(name = "galaxy-trail", version, about = "Winding galaxy-map trail generator")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Place a new trail and write it as SVG, JSON, path data or PNG
    Generate(GenerateArgs),
    /// Re-render a saved trail (JSON points, trail document or path data)
    Render(RenderArgs),
    /// List the fallback strategies in cascade order
    Strategies,
    /// Time generation and count how points were placed
    Benchmark(BenchmarkArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Command::Generate(args) => cli::cmd_generate(args),
        Command::Render(args) => cli::cmd_render(args),
        Command::Strategies => {
            cli::cmd_strategies();
            Ok(())
        }
        Command::Benchmark(args) => cli::cmd_benchmark(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
