//! # galaxy-trail
//!
//! Winding "galaxy map" trails: constrained random point placement plus a
//! Catmull-Rom curve through the result.
//!
//! ```
//! use galaxy_trail::{generate, svg::path_data, GenerationMode, PathConfig};
//!
//! let config = PathConfig::default().with_num_points(12);
//! let path = generate(&config, GenerationMode::Cascade, 42);
//! let d = path_data(&path.commands());
//! assert!(d.starts_with("M "));
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level

pub mod config;
pub mod constraints;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod rng;
pub mod spline;
pub mod strategy;
pub mod svg;
pub mod trail;

// Re-export common types at crate root for convenience.
pub use config::{Bounds, PathConfig};
pub use constraints::{Constraints, Rejection};
pub use error::TrailError;
pub use export::{points_from_json, points_to_json};
pub use generator::{
    generate, generate_cascade, generate_simple, generate_within, GeneratedPath, GenerationMode,
    PathGenerator, Placement,
};
pub use geometry::{
    distance, point_to_segment_distance, segment_to_segment_distance, segments_intersect, Point,
    Segment,
};
pub use spline::{catmull_rom, draw, Canvas, DrawCommand};
pub use strategy::Strategy;
pub use svg::{path_data, points_from_path_data, trail_to_svg, TrailStyle};
pub use trail::{Trail, Violation};
