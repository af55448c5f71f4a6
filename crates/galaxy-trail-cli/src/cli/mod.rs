//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `generate` - Place a new trail and write it as SVG, JSON, path data or PNG
//! - `render` - Re-render a saved trail in another format or style
//! - `strategies` - List the fallback strategies in cascade order
//! - `benchmark` - Time generation and count how points were placed

pub mod benchmark;
pub mod common;
pub mod config;
pub mod generate;
pub mod raster;
pub mod render;

pub use benchmark::{cmd_benchmark, BenchmarkArgs};
pub use generate::{cmd_generate, GenerateArgs};
pub use render::{cmd_render, RenderArgs};

use galaxy_trail::Strategy;

/// Execute the strategies command.
pub fn cmd_strategies() {
    println!("Fallback strategies (cascade mode tries them in this order):");
    for (i, strategy) in Strategy::all().iter().enumerate() {
        println!("  {}. {:<16} {}", i + 1, strategy.name(), strategy.description());
    }
}
