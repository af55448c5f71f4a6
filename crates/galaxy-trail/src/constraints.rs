//! Placement rules for a new trail point.
//!
//! A candidate is accepted when it lies inside the valid rectangle, keeps its
//! distance from every earlier point, and the new segment from the current
//! end of the trail neither crosses nor crowds any earlier segment it does
//! not share a vertex with.

use std::fmt;

use crate::config::{Bounds, PathConfig};
use crate::geometry::{Point, Segment};

/// Slack on every distance comparison so a candidate placed at exactly the
/// minimum distance survives floating point rounding.
pub const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Scale applied to both minimum distances by the last-resort search.
pub const RELAXED_FACTOR: f64 = 0.8;

/// Why a candidate point was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutOfBounds,
    /// Closer than the point spacing to the trail point at `index`
    TooCloseToPoint { index: usize },
    /// The new segment properly crosses the segment starting at `index`
    CrossesSegment { index: usize },
    /// The new segment comes within the segment spacing of the segment starting at `index`
    TooCloseToSegment { index: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutOfBounds => write!(f, "outside the valid rectangle"),
            Rejection::TooCloseToPoint { index } => write!(f, "too close to point {}", index),
            Rejection::CrossesSegment { index } => write!(f, "crosses segment {}", index),
            Rejection::TooCloseToSegment { index } => write!(f, "too close to segment {}", index),
        }
    }
}

/// The thresholds a candidate is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub bounds: Bounds,
    pub min_point_distance: f64,
    pub min_segment_distance: f64,
}

impl Constraints {
    /// Full-strength constraints for a config.
    pub fn strict(config: &PathConfig) -> Self {
        Self {
            bounds: config.bounds(),
            min_point_distance: config.min_path_distance,
            min_segment_distance: config.segment_distance(),
        }
    }

    /// Same bounds, both minimum distances multiplied by `factor`.
    pub fn relaxed(&self, factor: f64) -> Self {
        Self {
            bounds: self.bounds,
            min_point_distance: self.min_point_distance * factor,
            min_segment_distance: self.min_segment_distance * factor,
        }
    }

    /// Check `candidate` as the next point after `points`.
    ///
    /// Segment checks only start once the trail has three points: before
    /// that every existing segment shares the current end point with the new
    /// segment, and adjacent segments are never compared.
    pub fn check(&self, points: &[Point], candidate: Point) -> Result<(), Rejection> {
        if !self.bounds.contains(candidate) {
            return Err(Rejection::OutOfBounds);
        }

        let min_point = self.min_point_distance - DISTANCE_TOLERANCE;
        if let Some(index) = points.iter().position(|p| p.distance(candidate) < min_point) {
            return Err(Rejection::TooCloseToPoint { index });
        }

        let n = points.len();
        if n < 3 {
            return Ok(());
        }

        let new_segment = Segment::new(points[n - 1], candidate);
        let min_segment = self.min_segment_distance - DISTANCE_TOLERANCE;

        // The segment ending at points[n - 1] is adjacent, so stop before it.
        for index in 0..n - 2 {
            let existing = Segment::new(points[index], points[index + 1]);
            if new_segment.intersects(&existing) {
                return Err(Rejection::CrossesSegment { index });
            }
            if new_segment.distance_to(&existing) < min_segment {
                return Err(Rejection::TooCloseToSegment { index });
            }
        }

        Ok(())
    }

    #[inline]
    pub fn is_valid(&self, points: &[Point], candidate: Point) -> bool {
        self.check(points, candidate).is_ok()
    }
}
