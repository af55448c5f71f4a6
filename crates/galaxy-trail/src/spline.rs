//! Catmull-Rom spline through the trail points.
//!
//! The curve is expressed as renderer-agnostic [`DrawCommand`]s: one move-to
//! and then a cubic Bézier per consecutive pair of points. For the pair
//! `p1 -> p2` with neighbours `p0` and `p3`:
//!
//! ```text
//! ctrl1 = p1 + (p2 - p0) / 6
//! ctrl2 = p2 - (p3 - p1) / 6
//! ```
//!
//! At the ends the missing neighbour is replaced by the endpoint itself
//! (`p0 = p1` on the first pair, `p3 = p2` on the last), so the curve starts
//! and ends heading straight at its neighbour.
//!
//! Two consumers read the same commands: [`crate::svg::path_data`] builds a
//! declarative `d` string, and anything implementing [`Canvas`] can replay
//! them as immediate-mode drawing calls.

use lyon_geom::{point, CubicBezierSegment};

use crate::geometry::Point;

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
}

impl DrawCommand {
    /// The on-curve point this command ends at.
    #[inline]
    pub fn end(&self) -> Point {
        match *self {
            DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => p,
            DrawCommand::CubicTo { to, .. } => to,
        }
    }
}

/// Build the draw commands for a smooth curve through `points`.
///
/// - fewer than 2 points: nothing to draw, empty result
/// - 2 points: a straight line
/// - 3 or more: one cubic segment per pair
pub fn catmull_rom(points: &[Point]) -> Vec<DrawCommand> {
    match points {
        [] | [_] => Vec::new(),
        [a, b] => vec![DrawCommand::MoveTo(*a), DrawCommand::LineTo(*b)],
        _ => {
            let n = points.len();
            let mut commands = Vec::with_capacity(n);
            commands.push(DrawCommand::MoveTo(points[0]));

            for i in 0..n - 1 {
                let p0 = if i == 0 { points[0] } else { points[i - 1] };
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = if i + 2 < n { points[i + 2] } else { p2 };

                commands.push(DrawCommand::CubicTo {
                    ctrl1: p1 + (p2 - p0) / 6.0,
                    ctrl2: p2 - (p3 - p1) / 6.0,
                    to: p2,
                });
            }
            commands
        }
    }
}

/// An immediate-mode drawing surface.
///
/// Mirrors the path half of a 2D canvas API; implement it for whatever
/// rasterizer or recorder should receive the curve.
pub trait Canvas {
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point);
}

/// Replay draw commands onto a canvas.
pub fn draw<C: Canvas + ?Sized>(commands: &[DrawCommand], canvas: &mut C) {
    for command in commands {
        match *command {
            DrawCommand::MoveTo(p) => canvas.move_to(p),
            DrawCommand::LineTo(p) => canvas.line_to(p),
            DrawCommand::CubicTo { ctrl1, ctrl2, to } => canvas.cubic_to(ctrl1, ctrl2, to),
        }
    }
}

/// Canvas that approximates the curve with a polyline.
#[derive(Debug, Clone)]
pub struct Flattener {
    tolerance: f64,
    points: Vec<Point>,
}

impl Flattener {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, points: Vec::new() }
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

impl Canvas for Flattener {
    fn move_to(&mut self, p: Point) {
        self.points.push(p);
    }

    fn line_to(&mut self, p: Point) {
        self.points.push(p);
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let Some(from) = self.points.last().copied() else {
            self.points.push(to);
            return;
        };

        let curve = CubicBezierSegment {
            from: point(from.x, from.y),
            ctrl1: point(ctrl1.x, ctrl1.y),
            ctrl2: point(ctrl2.x, ctrl2.y),
            to: point(to.x, to.y),
        };

        // Callback receives each LineSegment; its end is the next polyline vertex
        curve.for_each_flattened(self.tolerance, &mut |segment| {
            self.points.push(Point::new(segment.to.x, segment.to.y));
        });
    }
}

/// Flatten draw commands into a polyline within `tolerance` of the curve.
pub fn flatten(commands: &[DrawCommand], tolerance: f64) -> Vec<Point> {
    let mut flattener = Flattener::new(tolerance);
    draw(commands, &mut flattener);
    flattener.into_points()
}

/// Approximate arc length of the curve.
pub fn curve_length(commands: &[DrawCommand], tolerance: f64) -> f64 {
    flatten(commands, tolerance)
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .sum()
}
