//! Core geometry types and predicates for galaxy-trail.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = lets you print with `{:?}`
//! - `Clone` + `Copy` = small stack values that copy implicitly
//! - `PartialEq` = can compare with `==`
//! - `Serialize` / `Deserialize` = serde turns the struct into `{"x":..,"y":..}`
//!
//! Everything in here is a pure function: no state, no allocation, and every
//! function is total over finite inputs (zero-length segments are special-cased
//! instead of dividing by zero).

use serde::{Deserialize, Serialize};

/// Below this magnitude the direction cross product of two segments is
/// treated as zero (parallel or collinear).
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// A 2D point in canvas-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A line segment between two points.
///
/// Segments are never stored in a trail; they are derived on demand from
/// consecutive points with [`segments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    ///
    /// `Point` is `Copy`, so passing it by value costs nothing.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point reached by walking `length` from here along `angle` (radians).
    #[inline]
    pub fn offset(&self, angle: f64, length: f64) -> Point {
        Point::new(self.x + angle.cos() * length, self.y + angle.sin() * length)
    }

    /// Heading from this point towards `other`, in radians.
    #[inline]
    pub fn angle_to(&self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

// ## Rust Lesson #8: Operator Overloading
//
// Implementing `std::ops::Add` lets us write `a + b` for points.
// The spline math reads almost like the formula on paper because of this.

impl std::ops::Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f64> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Segment {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Midpoint of the segment.
    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Whether this segment properly crosses `other`.
    #[inline]
    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(self.start, self.end, other.start, other.end)
    }

    /// Minimum endpoint-to-segment distance between the two segments.
    #[inline]
    pub fn distance_to(&self, other: &Segment) -> f64 {
        segment_to_segment_distance(self.start, self.end, other.start, other.end)
    }
}

/// Iterate the segments formed by consecutive points.
///
/// A slice of `n` points yields `n - 1` segments (none for `n < 2`).
pub fn segments(points: &[Point]) -> impl Iterator<Item = Segment> + '_ {
    points.windows(2).map(|w| Segment::new(w[0], w[1]))
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Z component of the cross product `(b - a) x (c - a)`.
///
/// Positive when `c` is to the left of the directed line `a -> b`.
#[inline]
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper-crossing test for segments `p1-p2` and `p3-p4`.
///
/// Parallel and collinear segments never intersect here, and neither do
/// segments that merely touch (a shared endpoint or an endpoint lying on the
/// other segment): every side test is a strict inequality.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let o1 = orientation(p3, p4, p1);
    let o2 = orientation(p3, p4, p2);
    let o3 = orientation(p1, p2, p3);
    let o4 = orientation(p1, p2, p4);

    let straddles_first = (o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0);
    let straddles_second = (o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0);
    straddles_first && straddles_second
}

/// Distance from `p` to the closest point of segment `s1-s2`.
pub fn point_to_segment_distance(p: Point, s1: Point, s2: Point) -> f64 {
    let dx = s2.x - s1.x;
    let dy = s2.y - s1.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq == 0.0 {
        return p.distance(s1);
    }

    let t = (((p.x - s1.x) * dx + (p.y - s1.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(s1.x + t * dx, s1.y + t * dy))
}

/// Minimum of the four endpoint-to-segment distances between `a1-a2` and `b1-b2`.
///
/// This is the separation measure used by the trail constraints. It is zero
/// when the segments share an endpoint, but it does not detect a crossing in
/// the middle of both segments, so callers pair it with [`segments_intersect`].
pub fn segment_to_segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    point_to_segment_distance(a1, b1, b2)
        .min(point_to_segment_distance(a2, b1, b2))
        .min(point_to_segment_distance(b1, a1, a2))
        .min(point_to_segment_distance(b2, a1, a2))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn point_distance() {
        assert_eq!(distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn segment_length_and_midpoint() {
        let seg = Segment::new(p(0.0, 0.0), p(3.0, 4.0));
        assert_eq!(seg.length(), 5.0);
        assert_eq!(seg.midpoint(), p(1.5, 2.0));
    }

    #[test]
    fn offset_walks_along_angle() {
        let q = p(10.0, 10.0).offset(std::f64::consts::FRAC_PI_2, 5.0);
        assert_abs_diff_eq!(q.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.y, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn segments_iterator_counts() {
        let pts = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        assert_eq!(segments(&pts).count(), 2);
        assert_eq!(segments(&pts[..1]).count(), 0);
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)));
    }

    #[test]
    fn disjoint_segments_do_not_intersect() {
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 1.0), p(5.0, 0.0), p(6.0, -3.0)));
    }

    #[test]
    fn shared_endpoint_is_not_an_intersection() {
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)));
    }

    #[test]
    fn t_junction_is_not_an_intersection() {
        // Endpoint of the second segment lies exactly on the first.
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 10.0)));
    }

    #[test]
    fn parallel_and_collinear_segments_do_not_intersect() {
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 1.0), p(10.0, 1.0)));
        // Overlapping collinear segments are a documented blind spot.
        assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(15.0, 0.0)));
    }

    #[test]
    fn point_to_segment_projects_inside() {
        let d = point_to_segment_distance(p(5.0, 3.0), p(0.0, 0.0), p(10.0, 0.0));
        assert_abs_diff_eq!(d, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn point_to_segment_clamps_to_endpoints() {
        let d = point_to_segment_distance(p(13.0, 4.0), p(0.0, 0.0), p(10.0, 0.0));
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
        let d = point_to_segment_distance(p(-3.0, -4.0), p(0.0, 0.0), p(10.0, 0.0));
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_length_segment_falls_back_to_point_distance() {
        let d = point_to_segment_distance(p(3.0, 4.0), p(0.0, 0.0), p(0.0, 0.0));
        assert_eq!(d, 5.0);
        let d = segment_to_segment_distance(p(0.0, 0.0), p(0.0, 0.0), p(3.0, 4.0), p(3.0, 4.0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn segment_distance_parallel() {
        let d = segment_to_segment_distance(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 7.0), p(10.0, 7.0));
        assert_abs_diff_eq!(d, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn segment_distance_uses_closest_endpoint() {
        // Second segment's start hangs 2 units above the middle of the first.
        let a = Segment::new(p(0.0, 0.0), p(10.0, 0.0));
        let b = Segment::new(p(5.0, 2.0), p(5.0, 20.0));
        assert_abs_diff_eq!(a.distance_to(&b), 2.0, epsilon = 1e-12);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn operators_compose() {
        let q = (p(1.0, 2.0) + p(3.0, 4.0)) * 2.0 - p(1.0, 1.0);
        assert_eq!(q, p(7.0, 11.0));
        assert_eq!(q / 2.0, p(3.5, 5.5));
    }
}
