//! Fallback strategies for placing the next trail point.
//!
//! When the randomized proposals of the generator run dry, the cascade mode
//! walks [`Strategy::all`] in order and takes the first point any strategy
//! finds. Each strategy has a fixed evaluation budget, so a failed cascade is
//! always a bounded amount of work.
//!
//! Strategies only read the trail built so far (`&[Point]`); appending the
//! accepted point is the generator's job.

use std::f64::consts::FRAC_PI_2;

use crate::constraints::{Constraints, RELAXED_FACTOR};
use crate::geometry::Point;
use crate::rng::Rng;

/// Angles in the systematic sweep, spread over heading +-90 degrees.
pub const SWEEP_ANGLES: usize = 36;
/// Step lengths tried per sweep angle.
pub const SWEEP_DISTANCES: usize = 5;
/// Draws for the random walk strategy.
pub const RANDOM_DRAWS: usize = 300;
/// Uniform samples for the farthest-point search.
pub const FARTHEST_SAMPLES: usize = 500;
/// Draws for the relaxed last resort.
pub const RELAXED_DRAWS: usize = 400;

/// Cell size multiplier (of the point spacing) for the coarse grid.
const COARSE_CELL_FACTOR: f64 = 2.0;
/// Cell size multiplier (of the point spacing) for the exhaustive grid.
const FINE_CELL_FACTOR: f64 = 1.5;

/// Everything a strategy needs to look for the next point.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// Trail accumulated so far
    pub points: &'a [Point],
    /// Direction of the last accepted step, radians
    pub heading: f64,
    /// Strict constraints for this run
    pub constraints: Constraints,
    /// Shortest step from the current point
    pub min_step: f64,
    /// Longest regular step from the current point
    pub max_step: f64,
}

impl SearchContext<'_> {
    /// The point the next segment starts from.
    #[inline]
    pub fn current(&self) -> Option<Point> {
        self.points.last().copied()
    }

    #[inline]
    fn accepts(&self, candidate: Point) -> bool {
        self.constraints.is_valid(self.points, candidate)
    }
}

/// One fallback search, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    AngularSweep,
    GridCells,
    RandomWalk,
    FarthestPoint,
    ExhaustiveGrid,
    Relaxed,
}

impl Strategy {
    /// All strategies in the order the cascade tries them.
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::AngularSweep,
            Strategy::GridCells,
            Strategy::RandomWalk,
            Strategy::FarthestPoint,
            Strategy::ExhaustiveGrid,
            Strategy::Relaxed,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AngularSweep => "angular-sweep",
            Strategy::GridCells => "grid-cells",
            Strategy::RandomWalk => "random-walk",
            Strategy::FarthestPoint => "farthest-point",
            Strategy::ExhaustiveGrid => "exhaustive-grid",
            Strategy::Relaxed => "relaxed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::AngularSweep => "36 angles x 5 step lengths around the heading, jittered",
            Strategy::GridCells => "shuffled centers of a coarse grid (2x spacing)",
            Strategy::RandomWalk => "300 random angle/length draws from the current point",
            Strategy::FarthestPoint => "500 canvas samples, keep the one farthest from the trail",
            Strategy::ExhaustiveGrid => "every cell of a fine grid (1.5x spacing), near or far first",
            Strategy::Relaxed => "400 random draws with spacing relaxed to 80%",
        }
    }

    /// Parse a strategy from its name.
    pub fn from_name(name: &str) -> Option<Strategy> {
        match name.to_lowercase().as_str() {
            "angular-sweep" | "sweep" => Some(Strategy::AngularSweep),
            "grid-cells" | "grid" => Some(Strategy::GridCells),
            "random-walk" | "random" => Some(Strategy::RandomWalk),
            "farthest-point" | "farthest" | "maximin" => Some(Strategy::FarthestPoint),
            "exhaustive-grid" | "exhaustive" => Some(Strategy::ExhaustiveGrid),
            "relaxed" => Some(Strategy::Relaxed),
            _ => None,
        }
    }

    /// Whether points from this strategy only satisfy the relaxed constraints.
    #[inline]
    pub fn is_relaxed(&self) -> bool {
        matches!(self, Strategy::Relaxed)
    }

    /// Constraints this strategy validates against.
    pub fn constraints(&self, strict: Constraints) -> Constraints {
        if self.is_relaxed() {
            strict.relaxed(RELAXED_FACTOR)
        } else {
            strict
        }
    }

    /// Run the search. `None` means the budget ran out without a valid point.
    pub fn search(&self, ctx: &SearchContext<'_>, rng: &mut Rng) -> Option<Point> {
        match self {
            Strategy::AngularSweep => angular_sweep(ctx, rng),
            Strategy::GridCells => grid_cells(ctx, rng),
            Strategy::RandomWalk => random_walk(ctx, rng, RANDOM_DRAWS),
            Strategy::FarthestPoint => farthest_point(ctx, rng),
            Strategy::ExhaustiveGrid => exhaustive_grid(ctx, rng),
            Strategy::Relaxed => {
                let relaxed = SearchContext {
                    constraints: self.constraints(ctx.constraints),
                    min_step: ctx.min_step * RELAXED_FACTOR,
                    ..*ctx
                };
                random_walk(&relaxed, rng, RELAXED_DRAWS)
            }
        }
    }
}

/// Sweep offsets ordered from straight ahead outwards, alternating sides.
fn sweep_offsets() -> Vec<f64> {
    let step = 2.0 * FRAC_PI_2 / (SWEEP_ANGLES - 1) as f64;
    let mut offsets: Vec<f64> = (0..SWEEP_ANGLES)
        .map(|i| -FRAC_PI_2 + i as f64 * step)
        .collect();
    offsets.sort_by(|a, b| a.abs().total_cmp(&b.abs()));
    offsets
}

fn angular_sweep(ctx: &SearchContext<'_>, rng: &mut Rng) -> Option<Point> {
    let current = ctx.current()?;
    let angle_step = 2.0 * FRAC_PI_2 / (SWEEP_ANGLES - 1) as f64;
    let span = ctx.max_step - ctx.min_step;

    for offset in sweep_offsets() {
        for d in 0..SWEEP_DISTANCES {
            let jitter = rng.next_range(-0.5, 0.5) * angle_step;
            let angle = ctx.heading + (offset + jitter).clamp(-FRAC_PI_2, FRAC_PI_2);
            let length = ctx.min_step + span * (d as f64 + rng.next_f64() * 0.5) / SWEEP_DISTANCES as f64;

            let candidate = current.offset(angle, length);
            if ctx.accepts(candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

fn grid_cells(ctx: &SearchContext<'_>, rng: &mut Rng) -> Option<Point> {
    let cell = ctx.constraints.min_point_distance * COARSE_CELL_FACTOR;
    let mut centers = ctx.constraints.bounds.cell_centers(cell);
    rng.shuffle(&mut centers);
    centers.into_iter().find(|c| ctx.accepts(*c))
}

fn random_walk(ctx: &SearchContext<'_>, rng: &mut Rng, draws: usize) -> Option<Point> {
    let current = ctx.current()?;
    let reach = ctx.max_step * 2.0;

    for _ in 0..draws {
        let candidate = current.offset(rng.next_angle(), rng.next_range(ctx.min_step, reach));
        if ctx.accepts(candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Maximin placement: among valid samples, the one whose nearest trail point is farthest.
fn farthest_point(ctx: &SearchContext<'_>, rng: &mut Rng) -> Option<Point> {
    let bounds = ctx.constraints.bounds;
    let mut best: Option<(Point, f64)> = None;

    for _ in 0..FARTHEST_SAMPLES {
        let candidate = Point::new(
            rng.next_range(bounds.min_x, bounds.max_x),
            rng.next_range(bounds.min_y, bounds.max_y),
        );
        if !ctx.accepts(candidate) {
            continue;
        }

        let nearest = ctx
            .points
            .iter()
            .map(|p| p.distance(candidate))
            .fold(f64::INFINITY, f64::min);

        if best.is_none_or(|(_, d)| nearest > d) {
            best = Some((candidate, nearest));
        }
    }

    best.map(|(p, _)| p)
}

fn exhaustive_grid(ctx: &SearchContext<'_>, rng: &mut Rng) -> Option<Point> {
    let cell = ctx.constraints.min_point_distance * FINE_CELL_FACTOR;
    let mut centers = ctx.constraints.bounds.cell_centers(cell);
    rng.shuffle(&mut centers);

    // Stable sort keeps the shuffled order among equidistant cells.
    if let Some(current) = ctx.current() {
        centers.sort_by(|a, b| a.distance(current).total_cmp(&b.distance(current)));
        if rng.next_bool(0.5) {
            centers.reverse();
        }
    }

    centers.into_iter().find(|c| ctx.accepts(*c))
}
