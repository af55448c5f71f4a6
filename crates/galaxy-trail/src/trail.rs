//! Editable trail for interactive use.
//!
//! A [`Trail`] starts from a generated path (or empty) and then follows the
//! user: points can be placed by hand, dragged and removed. None of these
//! edits re-run the placement constraints; the user is allowed to make a
//! trail the generator never would. [`Trail::audit`] reports what a
//! presentation layer may want to highlight, without changing anything.

use crate::config::PathConfig;
use crate::constraints::DISTANCE_TOLERANCE;
use crate::error::TrailError;
use crate::generator::GeneratedPath;
use crate::geometry::{segment_to_segment_distance, segments_intersect, Point};
use crate::spline::{catmull_rom, DrawCommand};

/// A broken placement rule found by [`Trail::audit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    OutOfBounds { index: usize },
    PointsTooClose { a: usize, b: usize, distance: f64 },
    /// Segments are named by their first point index
    SegmentsCross { a: usize, b: usize },
    SegmentsTooClose { a: usize, b: usize, distance: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: Vec<Point>,
    config: PathConfig,
}

impl Trail {
    pub fn new(config: &PathConfig) -> Self {
        Self { points: Vec::new(), config: config.clone() }
    }

    pub fn from_points(points: Vec<Point>, config: &PathConfig) -> Self {
        Self { points, config: config.clone() }
    }

    pub fn from_path(path: &GeneratedPath, config: &PathConfig) -> Self {
        Self::from_points(path.points.clone(), config)
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Snap to the grid (if configured) and keep inside the valid rectangle.
    pub fn snap(&self, p: Point) -> Point {
        let snapped = match self.config.grid_size {
            Some(grid) if grid > 0.0 => {
                Point::new((p.x / grid).round() * grid, (p.y / grid).round() * grid)
            }
            _ => p,
        };
        self.config.bounds().clamp(snapped)
    }

    /// Append a user-placed point and return its index.
    pub fn add_point(&mut self, p: Point) -> usize {
        self.points.push(self.snap(p));
        self.points.len() - 1
    }

    /// Index of the point nearest to `p`, if any lies within `radius`.
    pub fn pick(&self, p: Point, radius: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, q)| (i, q.distance(p)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Move one point in place and return where it landed.
    ///
    /// Only that point's coordinates change; the rest of the trail and the
    /// point order are untouched.
    pub fn drag(&mut self, index: usize, to: Point) -> Result<Point, TrailError> {
        let len = self.points.len();
        let snapped = self.snap(to);
        let slot = self
            .points
            .get_mut(index)
            .ok_or(TrailError::PointIndex { index, len })?;
        *slot = snapped;
        Ok(snapped)
    }

    pub fn remove(&mut self, index: usize) -> Result<Point, TrailError> {
        if index >= self.points.len() {
            return Err(TrailError::PointIndex { index, len: self.points.len() });
        }
        Ok(self.points.remove(index))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        catmull_rom(&self.points)
    }

    /// Every placement rule the current trail breaks.
    pub fn audit(&self) -> Vec<Violation> {
        let bounds = self.config.bounds();
        let min_point = self.config.min_path_distance - DISTANCE_TOLERANCE;
        let min_segment = self.config.segment_distance() - DISTANCE_TOLERANCE;
        let pts = &self.points;
        let mut violations = Vec::new();

        for (index, p) in pts.iter().enumerate() {
            if !bounds.contains(*p) {
                violations.push(Violation::OutOfBounds { index });
            }
        }

        for a in 0..pts.len() {
            for b in (a + 1)..pts.len() {
                let distance = pts[a].distance(pts[b]);
                if distance < min_point {
                    violations.push(Violation::PointsTooClose { a, b, distance });
                }
            }
        }

        // Non-adjacent segment pairs only
        for b in 2..pts.len().saturating_sub(1) {
            for a in 0..b - 1 {
                if segments_intersect(pts[a], pts[a + 1], pts[b], pts[b + 1]) {
                    violations.push(Violation::SegmentsCross { a, b });
                    continue;
                }
                let distance = segment_to_segment_distance(pts[a], pts[a + 1], pts[b], pts[b + 1]);
                if distance < min_segment {
                    violations.push(Violation::SegmentsTooClose { a, b, distance });
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_cascade;

    fn config() -> PathConfig {
        PathConfig::new(400.0, 400.0)
            .with_boundary_distance(20.0)
            .with_path_distance(30.0)
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn add_point_without_grid_keeps_position() {
        let mut trail = Trail::new(&config());
        assert_eq!(trail.add_point(p(100.3, 200.7)), 0);
        assert_eq!(trail.points(), &[p(100.3, 200.7)]);
    }

    #[test]
    fn add_point_snaps_and_clamps() {
        let mut trail = Trail::new(&config().with_grid_size(25.0));
        trail.add_point(p(112.0, 138.0));
        trail.add_point(p(5.0, 399.0));
        assert_eq!(trail.points(), &[p(100.0, 150.0), p(20.0, 380.0)]);
    }

    #[test]
    fn placement_is_not_validated() {
        let mut trail = Trail::new(&config());
        trail.add_point(p(100.0, 100.0));
        trail.add_point(p(101.0, 100.0));
        assert_eq!(trail.len(), 2);
        assert_eq!(
            trail.audit(),
            vec![Violation::PointsTooClose { a: 0, b: 1, distance: 1.0 }]
        );
    }

    #[test]
    fn pick_nearest_within_radius() {
        let trail = Trail::from_points(vec![p(100.0, 100.0), p(110.0, 100.0), p(300.0, 300.0)], &config());
        assert_eq!(trail.pick(p(108.0, 101.0), 10.0), Some(1));
        assert_eq!(trail.pick(p(200.0, 200.0), 10.0), None);
    }

    #[test]
    fn drag_moves_only_that_point() {
        let mut trail = Trail::from_path(&generate_cascade(&config().with_num_points(6), 3), &config());
        let before = trail.points().to_vec();

        let landed = trail.drag(2, p(42.0, 43.0)).unwrap();
        assert_eq!(landed, p(42.0, 43.0));
        for (i, (old, new)) in before.iter().zip(trail.points()).enumerate() {
            if i == 2 {
                assert_eq!(*new, p(42.0, 43.0));
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn repeated_drags_keep_the_sequence_intact() {
        let mut trail = Trail::from_points(vec![p(50.0, 50.0), p(150.0, 50.0), p(150.0, 150.0)], &config());
        for step in 0..100 {
            trail.drag(1, p(100.0 + step as f64, 60.0)).unwrap();
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.points()[0], p(50.0, 50.0));
        assert_eq!(trail.points()[1], p(199.0, 60.0));
        assert_eq!(trail.points()[2], p(150.0, 150.0));
    }

    #[test]
    fn drag_out_of_range_leaves_trail_untouched() {
        let mut trail = Trail::from_points(vec![p(50.0, 50.0)], &config());
        let err = trail.drag(3, p(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, TrailError::PointIndex { index: 3, len: 1 }));
        assert_eq!(trail.points(), &[p(50.0, 50.0)]);
    }

    #[test]
    fn drag_never_revalidates_but_audit_notices() {
        let mut trail = Trail::from_points(
            vec![p(50.0, 100.0), p(150.0, 100.0), p(150.0, 200.0), p(250.0, 200.0)],
            &config(),
        );
        assert!(trail.audit().is_empty());

        // Pull the last point back across the first segment.
        trail.drag(3, p(100.0, 50.0)).unwrap();
        assert_eq!(trail.points()[3], p(100.0, 50.0));
        assert!(trail.audit().contains(&Violation::SegmentsCross { a: 0, b: 2 }));
    }

    #[test]
    fn remove_and_clear() {
        let mut trail = Trail::from_points(vec![p(50.0, 50.0), p(150.0, 50.0)], &config());
        assert_eq!(trail.remove(0).unwrap(), p(50.0, 50.0));
        assert!(trail.remove(5).is_err());
        assert_eq!(trail.len(), 1);
        trail.clear();
        assert!(trail.is_empty());
        assert!(trail.commands().is_empty());
    }

    #[test]
    fn generated_trail_audits_clean() {
        let config = config().with_num_points(15);
        let path = generate_cascade(&config, 12);
        let trail = Trail::from_path(&path, &config);
        if !path.has_relaxed_points() {
            assert!(trail.audit().is_empty(), "{:?}", trail.audit());
        }
    }
}
