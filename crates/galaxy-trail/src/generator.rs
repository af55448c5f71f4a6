//! Constrained random trail generation.
//!
//! Points are placed one at a time. Each new point turns away from the last
//! heading by 30-90 degrees and steps between one and three times the point
//! spacing, and must pass [`Constraints::check`]. When a run of randomized
//! proposals finds nothing:
//!
//! - [`GenerationMode::Simple`] steps straight towards the middle of the
//!   canvas once, and stops if that is not allowed either.
//! - [`GenerationMode::Cascade`] tries every [`Strategy`] in order.
//!
//! A run that cannot place another point stops with what it has. That is the
//! normal outcome for a crowded or over-constrained canvas, not an error.
//!
//! [`PathGenerator`] is an iterator over placed points, so a caller that
//! needs to bound wall-clock time can stop pulling between points.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::PathConfig;
use crate::constraints::Constraints;
use crate::geometry::Point;
use crate::rng::Rng;
use crate::spline::{catmull_rom, DrawCommand};
use crate::strategy::{SearchContext, Strategy};

/// Smallest turn between consecutive steps (30 degrees).
pub const MIN_TURN: f64 = FRAC_PI_2 / 3.0;
/// Largest turn between consecutive steps (90 degrees).
pub const MAX_TURN: f64 = FRAC_PI_2;

/// How the generator recovers when randomized proposals run dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// One step towards the canvas center, then give up
    Simple,
    /// Ordered fallback strategies
    #[default]
    Cascade,
}

impl GenerationMode {
    pub fn name(&self) -> &'static str {
        match self {
            GenerationMode::Simple => "simple",
            GenerationMode::Cascade => "cascade",
        }
    }

    pub fn from_name(name: &str) -> Option<GenerationMode> {
        match name.to_lowercase().as_str() {
            "simple" | "svg" | "declarative" => Some(GenerationMode::Simple),
            "cascade" | "canvas" | "interactive" => Some(GenerationMode::Cascade),
            _ => None,
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a point of a generated trail was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// First point, uniform in the valid rectangle
    Seed,
    /// A randomized turn-and-step proposal
    Proposal,
    /// The simple mode's step towards the canvas center
    TowardCenter,
    /// Found by a cascade strategy
    Fallback(Strategy),
}

impl Placement {
    pub fn name(&self) -> &'static str {
        match self {
            Placement::Seed => "seed",
            Placement::Proposal => "proposal",
            Placement::TowardCenter => "toward-center",
            Placement::Fallback(strategy) => strategy.name(),
        }
    }

    /// Whether the point only satisfies the relaxed constraints.
    #[inline]
    pub fn is_relaxed(&self) -> bool {
        matches!(self, Placement::Fallback(s) if s.is_relaxed())
    }
}

/// The result of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPath {
    /// Trail points in drawing order
    pub points: Vec<Point>,
    /// One entry per point
    pub placements: Vec<Placement>,
    /// False when the run stopped before reaching `num_points`
    pub complete: bool,
    pub seed: u64,
    pub mode: GenerationMode,
}

impl GeneratedPath {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A trail needs two points before there is anything to draw.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Whether any point came from the relaxed last resort.
    pub fn has_relaxed_points(&self) -> bool {
        self.placements.iter().any(Placement::is_relaxed)
    }

    /// Catmull-Rom draw commands through every point.
    pub fn commands(&self) -> Vec<DrawCommand> {
        catmull_rom(&self.points)
    }
}

/// Append-only trail state owned by the generator.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    points: Vec<Point>,
    placements: Vec<Placement>,
    heading: f64,
}

impl Accumulator {
    fn accept(mut self, point: Point, placement: Placement) -> Self {
        if let Some(last) = self.points.last() {
            self.heading = last.angle_to(point);
        }
        self.points.push(point);
        self.placements.push(placement);
        self
    }
}

/// Iterator that places trail points one at a time.
///
/// ```
/// use galaxy_trail::{GenerationMode, PathConfig, PathGenerator};
///
/// let config = PathConfig::default().with_num_points(5);
/// let mut generator = PathGenerator::new(&config, GenerationMode::Cascade, 7);
/// let first = generator.next();
/// assert!(first.is_some());
/// let path = generator.finish();
/// assert_eq!(path.len(), 1);
/// ```
pub struct PathGenerator {
    config: PathConfig,
    mode: GenerationMode,
    seed: u64,
    constraints: Constraints,
    rng: Rng,
    acc: Accumulator,
    stopped: bool,
}

impl PathGenerator {
    pub fn new(config: &PathConfig, mode: GenerationMode, seed: u64) -> Self {
        Self {
            config: config.clone(),
            mode,
            seed,
            constraints: Constraints::strict(config),
            rng: Rng::new(seed),
            acc: Accumulator::default(),
            stopped: false,
        }
    }

    /// Points placed so far.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.acc.points
    }

    /// Stop pulling and take the trail built so far.
    pub fn finish(self) -> GeneratedPath {
        let complete = self.acc.points.len() >= self.config.num_points;
        GeneratedPath {
            points: self.acc.points,
            placements: self.acc.placements,
            complete,
            seed: self.seed,
            mode: self.mode,
        }
    }

    /// Uniform seed in the valid rectangle; `None` when the margin leaves no room.
    fn place_seed(&mut self) -> Option<Point> {
        let bounds = self.constraints.bounds;
        if bounds.is_empty() {
            return None;
        }
        let seed = Point::new(
            self.rng.next_range(bounds.min_x, bounds.max_x),
            self.rng.next_range(bounds.min_y, bounds.max_y),
        );
        self.acc.heading = self.rng.next_angle();
        Some(seed)
    }

    /// Randomized turn-and-step proposals from the current point.
    fn propose(&mut self) -> Option<Point> {
        let current = *self.acc.points.last()?;
        let min_step = self.config.min_path_distance;
        let max_step = self.config.max_step();

        for _ in 0..self.config.max_attempts {
            let turn = self.rng.next_range(MIN_TURN, MAX_TURN) * self.rng.next_sign();
            let length = self.rng.next_range(min_step, max_step);
            let candidate = current.offset(self.acc.heading + turn, length);

            if self.constraints.is_valid(&self.acc.points, candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// One step of the point spacing towards the middle of the valid rectangle.
    fn toward_center(&self) -> Option<Point> {
        let current = *self.acc.points.last()?;
        let center = self.constraints.bounds.center();
        let candidate = current.offset(current.angle_to(center), self.config.min_path_distance);

        match self.constraints.check(&self.acc.points, candidate) {
            Ok(()) => Some(candidate),
            Err(rejection) => {
                debug!("toward-center step refused: {}", rejection);
                None
            }
        }
    }

    fn cascade(&mut self) -> Option<(Point, Placement)> {
        let ctx = SearchContext {
            points: &self.acc.points,
            heading: self.acc.heading,
            constraints: self.constraints,
            min_step: self.config.min_path_distance,
            max_step: self.config.max_step(),
        };

        for strategy in Strategy::all() {
            if let Some(point) = strategy.search(&ctx, &mut self.rng) {
                debug!("point {} placed by {}", ctx.points.len(), strategy.name());
                return Some((point, Placement::Fallback(*strategy)));
            }
            debug!("point {}: {} found nothing", ctx.points.len(), strategy.name());
        }
        None
    }

    fn next_point(&mut self) -> Option<(Point, Placement)> {
        if self.acc.points.is_empty() {
            return self.place_seed().map(|p| (p, Placement::Seed));
        }

        if let Some(point) = self.propose() {
            return Some((point, Placement::Proposal));
        }

        debug!(
            "point {}: {} proposals exhausted, falling back ({})",
            self.acc.points.len(),
            self.config.max_attempts,
            self.mode
        );

        match self.mode {
            GenerationMode::Simple => self.toward_center().map(|p| (p, Placement::TowardCenter)),
            GenerationMode::Cascade => self.cascade(),
        }
    }
}

impl Iterator for PathGenerator {
    type Item = (Point, Placement);

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped || self.acc.points.len() >= self.config.num_points {
            return None;
        }

        match self.next_point() {
            Some((point, placement)) => {
                let acc = std::mem::take(&mut self.acc);
                self.acc = acc.accept(point, placement);
                Some((point, placement))
            }
            None => {
                self.stopped = true;
                warn!(
                    "stopped early at {}/{} points: no valid placement left",
                    self.acc.points.len(),
                    self.config.num_points
                );
                None
            }
        }
    }
}

/// Generate a complete trail (or as much of it as fits).
pub fn generate(config: &PathConfig, mode: GenerationMode, seed: u64) -> GeneratedPath {
    let mut generator = PathGenerator::new(config, mode, seed);
    generator.by_ref().for_each(drop);
    let path = generator.finish();

    info!(
        "generated {}/{} points ({} mode, seed {})",
        path.len(),
        config.num_points,
        mode,
        seed
    );
    path
}

/// Like [`generate`], but stop placing points once `budget` has elapsed.
///
/// The clock is checked between points, so a single slow placement can
/// overrun the budget by its own cost. A budget too large to represent as a
/// deadline (`Duration::MAX`) means no limit.
pub fn generate_within(
    config: &PathConfig,
    mode: GenerationMode,
    seed: u64,
    budget: Duration,
) -> GeneratedPath {
    let deadline = Instant::now().checked_add(budget);
    let mut generator = PathGenerator::new(config, mode, seed);
    while deadline.is_none_or(|d| Instant::now() < d) && generator.next().is_some() {}

    let path = generator.finish();
    if !path.complete {
        warn!("time budget of {:?} ended the run at {} points", budget, path.len());
    }
    path
}

/// Declarative variant: proposals plus one step towards the center.
pub fn generate_simple(config: &PathConfig, seed: u64) -> GeneratedPath {
    generate(config, GenerationMode::Simple, seed)
}

/// Interactive variant: proposals plus the full fallback cascade.
pub fn generate_cascade(config: &PathConfig, seed: u64) -> GeneratedPath {
    generate(config, GenerationMode::Cascade, seed)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::constraints::RELAXED_FACTOR;
    use crate::geometry::{segment_to_segment_distance, segments_intersect};

    const MODES: [GenerationMode; 2] = [GenerationMode::Simple, GenerationMode::Cascade];

    fn galaxy_config() -> PathConfig {
        PathConfig::new(900.0, 900.0)
            .with_boundary_distance(50.0)
            .with_path_distance(50.0)
            .with_num_points(20)
    }

    /// Check the boundary, spacing and non-crossing invariants of a trail.
    fn assert_invariants(path: &GeneratedPath, config: &PathConfig) {
        let bounds = config.bounds();
        let eps = 1e-6;

        for (i, p) in path.points.iter().enumerate() {
            assert!(bounds.contains(*p), "point {} at {:?} out of bounds", i, p);
        }

        for i in 0..path.len() {
            for j in (i + 1)..path.len() {
                let relaxed = path.placements[i].is_relaxed() || path.placements[j].is_relaxed();
                let min = if relaxed {
                    config.min_path_distance * RELAXED_FACTOR
                } else {
                    config.min_path_distance
                };
                let d = path.points[i].distance(path.points[j]);
                assert!(d >= min - eps, "points {} and {} only {} apart", i, j, d);
            }
        }

        // Segment k runs from point k to point k + 1 and was checked when
        // point k + 1 was placed.
        let pts = &path.points;
        for j in 2..pts.len().saturating_sub(1) {
            if path.placements[j + 1].is_relaxed() {
                continue;
            }
            for i in 0..j - 1 {
                assert!(
                    !segments_intersect(pts[i], pts[i + 1], pts[j], pts[j + 1]),
                    "segments {} and {} cross",
                    i,
                    j
                );
                let d = segment_to_segment_distance(pts[i], pts[i + 1], pts[j], pts[j + 1]);
                assert!(d >= config.segment_distance() - eps, "segments {} and {} only {} apart", i, j, d);
            }
        }
    }

    #[test]
    fn galaxy_scenario_respects_invariants() {
        let config = galaxy_config();
        for mode in MODES {
            for seed in 0..10 {
                let path = generate(&config, mode, seed);
                assert!(path.len() >= 2 && path.len() <= 20, "{} points", path.len());
                assert_eq!(path.placements.len(), path.len());
                assert_eq!(path.placements[0], Placement::Seed);
                assert_invariants(&path, &config);
            }
        }
    }

    #[test]
    fn two_points_requested() {
        let config = galaxy_config().with_num_points(2);
        for mode in MODES {
            let path = generate(&config, mode, 3);
            assert_eq!(path.len(), 2);
            assert!(path.complete);
            assert!(path.is_drawable());
        }
    }

    #[test]
    fn oversized_spacing_yields_single_point() {
        let config = galaxy_config().with_path_distance(1800.0);
        for mode in MODES {
            let path = generate(&config, mode, 9);
            assert_eq!(path.len(), 1);
            assert!(!path.complete);
            assert!(path.commands().is_empty());
        }
    }

    #[test]
    fn margin_wider_than_canvas_places_nothing() {
        let config = galaxy_config().with_boundary_distance(500.0);
        for mode in MODES {
            let path = generate(&config, mode, 4);
            assert!(path.is_empty());
            assert!(!path.complete);
        }
    }

    #[test]
    fn degenerate_point_counts() {
        let config = galaxy_config();
        assert!(generate_cascade(&config.clone().with_num_points(0), 1).is_empty());
        assert!(generate_cascade(&config.clone().with_num_points(0), 1).complete);

        let single = generate_simple(&config.with_num_points(1), 1);
        assert_eq!(single.len(), 1);
        assert!(!single.is_drawable());
    }

    #[test]
    fn same_seed_same_trail() {
        let config = galaxy_config();
        for mode in MODES {
            assert_eq!(generate(&config, mode, 42), generate(&config, mode, 42));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let config = galaxy_config();
        let a = generate_cascade(&config, 1);
        let b = generate_cascade(&config, 2);
        assert_ne!(a.points[0], b.points[0]);
    }

    #[test]
    fn heading_turns_between_steps() {
        let config = galaxy_config().with_num_points(10);
        let path = generate_simple(&config, 17);

        // Consecutive proposal steps turn by 30-90 degrees.
        for w in 1..path.len() - 1 {
            if path.placements[w + 1] != Placement::Proposal {
                continue;
            }
            let a = path.points[w - 1].angle_to(path.points[w]);
            let b = path.points[w].angle_to(path.points[w + 1]);
            let mut turn = (b - a).abs() % std::f64::consts::TAU;
            if turn > std::f64::consts::PI {
                turn = std::f64::consts::TAU - turn;
            }
            assert!(turn >= MIN_TURN - 1e-9 && turn <= MAX_TURN + 1e-9, "turn {} out of range", turn);
        }
    }

    #[test]
    fn cascade_fills_crowded_canvas_further_than_simple() {
        // Tight canvas: randomized proposals stall quickly.
        let config = PathConfig::new(400.0, 400.0)
            .with_boundary_distance(20.0)
            .with_path_distance(40.0)
            .with_num_points(60)
            .with_max_attempts(50);

        let mut simple_total = 0;
        let mut cascade_total = 0;
        for seed in 0..5 {
            let simple = generate_simple(&config, seed);
            let cascade = generate_cascade(&config, seed);
            assert_invariants(&simple, &config);
            assert_invariants(&cascade, &config);
            simple_total += simple.len();
            cascade_total += cascade.len();
        }
        assert!(cascade_total >= simple_total, "cascade {} < simple {}", cascade_total, simple_total);
    }

    #[test]
    fn cascade_records_fallback_placements() {
        let config = PathConfig::new(400.0, 400.0)
            .with_boundary_distance(20.0)
            .with_path_distance(40.0)
            .with_num_points(80)
            .with_max_attempts(10);
        let path = generate_cascade(&config, 4);
        assert!(
            path.placements.iter().any(|p| matches!(p, Placement::Fallback(_))),
            "ten proposals per point should not be enough for 80 points"
        );
    }

    #[test]
    fn two_hundred_points_terminate() {
        let config = PathConfig::new(900.0, 900.0)
            .with_boundary_distance(20.0)
            .with_path_distance(20.0)
            .with_num_points(200);

        let start = Instant::now();
        for mode in MODES {
            let path = generate(&config, mode, 8);
            assert!(path.len() <= 200);
            assert_invariants(&path, &config);
        }
        assert!(start.elapsed() < Duration::from_secs(60));
    }

    #[test]
    fn iterator_can_stop_early() {
        let config = galaxy_config();
        let mut generator = PathGenerator::new(&config, GenerationMode::Cascade, 5);
        let taken: Vec<_> = generator.by_ref().take(3).collect();
        assert_eq!(taken.len(), 3);
        assert_eq!(generator.points().len(), 3);

        let path = generator.finish();
        assert_eq!(path.len(), 3);
        assert!(!path.complete);
    }

    #[test]
    fn zero_budget_places_nothing() {
        let path = generate_within(&galaxy_config(), GenerationMode::Cascade, 5, Duration::ZERO);
        assert!(path.is_empty());
        assert!(!path.complete);
    }

    #[test]
    fn generous_budget_matches_unbounded_run() {
        let config = galaxy_config();
        let bounded = generate_within(&config, GenerationMode::Cascade, 8, Duration::from_secs(60));
        assert_eq!(bounded, generate(&config, GenerationMode::Cascade, 8));
    }

    #[test]
    fn unrepresentable_budget_means_no_deadline() {
        let config = PathConfig::default().with_num_points(3);
        let bounded = generate_within(&config, GenerationMode::Cascade, 1, Duration::MAX);
        assert!(bounded.complete);
        assert_eq!(bounded, generate(&config, GenerationMode::Cascade, 1));
    }

    fn dry_simple_config(num_points: usize) -> PathConfig {
        // No proposals at all, so every point after the seed comes from the center step
        PathConfig::new(400.0, 400.0)
            .with_boundary_distance(20.0)
            .with_path_distance(40.0)
            .with_num_points(num_points)
            .with_max_attempts(0)
    }

    #[test]
    fn simple_mode_steps_toward_center_when_proposals_run_dry() {
        let config = dry_simple_config(2);
        let center = config.bounds().center();

        for seed in 0..20 {
            let path = generate(&config, GenerationMode::Simple, seed);
            assert_eq!(path.placements, vec![Placement::Seed, Placement::TowardCenter], "seed {seed}");
            assert!(path.complete);

            let (from, to) = (path.points[0], path.points[1]);
            assert_abs_diff_eq!(from.distance(to), 40.0, epsilon = 1e-9);
            let expected = from.offset(from.angle_to(center), 40.0);
            assert_abs_diff_eq!(to.x, expected.x, epsilon = 1e-9);
            assert_abs_diff_eq!(to.y, expected.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn refused_center_step_ends_the_run() {
        let config = dry_simple_config(60);
        for seed in 0..10 {
            let mut generator = PathGenerator::new(&config, GenerationMode::Simple, seed);
            while generator.next().is_some() {}

            // Stepping back over the center lands on an earlier point
            assert!(generator.toward_center().is_none());
            let path = generator.finish();
            assert!(!path.complete);
            assert!(path.len() < 60);
            assert!(path.placements[1..].iter().all(|p| *p == Placement::TowardCenter));
            assert_invariants(&path, &config);
        }
    }

    #[test]
    fn iterator_is_fused_after_stopping() {
        let config = galaxy_config().with_path_distance(1800.0);
        let mut generator = PathGenerator::new(&config, GenerationMode::Simple, 1);
        assert!(generator.next().is_some());
        assert!(generator.next().is_none());
        assert!(generator.next().is_none());
    }

    #[test]
    fn mode_names() {
        assert_eq!(GenerationMode::from_name("canvas"), Some(GenerationMode::Cascade));
        assert_eq!(GenerationMode::from_name("SVG"), Some(GenerationMode::Simple));
        assert_eq!(GenerationMode::Cascade.to_string(), "cascade");
        assert_eq!(Placement::Fallback(Strategy::GridCells).name(), "grid-cells");
    }
}
