//! Generation parameters and the valid placement rectangle.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Parameters for one generation run.
///
/// Supplied by the caller and never mutated by the generator. Values are not
/// validated: a config that cannot be satisfied simply yields a shorter trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Minimum distance from any point to the canvas edges
    pub min_boundary_distance: f64,
    /// Minimum distance between any two points of the trail
    pub min_path_distance: f64,
    /// Requested number of points
    pub num_points: usize,
    /// Minimum distance between non-adjacent segments (None = min_path_distance)
    pub min_segment_distance: Option<f64>,
    /// Randomized proposals per point before falling back
    pub max_attempts: usize,
    /// Snap grid used by interactive placement and dragging (None = no snapping)
    pub grid_size: Option<f64>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 900.0,
            min_boundary_distance: 50.0,
            min_path_distance: 50.0,
            num_points: 20,
            min_segment_distance: None,
            max_attempts: 1000,
            grid_size: None,
        }
    }
}

impl PathConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn with_boundary_distance(mut self, distance: f64) -> Self {
        self.min_boundary_distance = distance;
        self
    }

    pub fn with_path_distance(mut self, distance: f64) -> Self {
        self.min_path_distance = distance;
        self
    }

    pub fn with_segment_distance(mut self, distance: f64) -> Self {
        self.min_segment_distance = Some(distance);
        self
    }

    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.num_points = num_points;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    /// Separation required between non-adjacent segments.
    #[inline]
    pub fn segment_distance(&self) -> f64 {
        self.min_segment_distance.unwrap_or(self.min_path_distance)
    }

    /// Longest step a proposal may take from the current point.
    #[inline]
    pub fn max_step(&self) -> f64 {
        self.min_path_distance * 3.0
    }

    /// The boundary-shrunk rectangle every generated point must lie in.
    pub fn bounds(&self) -> Bounds {
        let b = self.min_boundary_distance;
        Bounds::new(b, b, self.width - b, self.height - b)
    }
}

/// Grid searches never split an axis into more cells than this.
pub const MAX_CELLS_PER_AXIS: usize = 256;

/// Axis-aligned rectangle, inclusive on all edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True for an inverted rectangle (boundary distance over half the canvas).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() < 0.0 || self.height() < 0.0
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Nearest point inside the rectangle.
    ///
    /// An empty rectangle collapses onto its center.
    pub fn clamp(&self, p: Point) -> Point {
        if self.is_empty() {
            return self.center();
        }
        Point::new(p.x.clamp(self.min_x, self.max_x), p.y.clamp(self.min_y, self.max_y))
    }

    /// Centers of a regular grid of roughly `cell`-sized cells covering the rectangle.
    ///
    /// The cell count per axis is `floor(extent / cell)`, between one and
    /// [`MAX_CELLS_PER_AXIS`], so each actual cell is at least `cell` wide.
    /// Row-major order.
    pub fn cell_centers(&self, cell: f64) -> Vec<Point> {
        if self.is_empty() || !(cell > 0.0) {
            return Vec::new();
        }

        let cols = ((self.width() / cell).floor() as usize).clamp(1, MAX_CELLS_PER_AXIS);
        let rows = ((self.height() / cell).floor() as usize).clamp(1, MAX_CELLS_PER_AXIS);
        let cell_w = self.width() / cols as f64;
        let cell_h = self.height() / rows as f64;

        let mut centers = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                centers.push(Point::new(
                    self.min_x + (col as f64 + 0.5) * cell_w,
                    self.min_y + (row as f64 + 0.5) * cell_h,
                ));
            }
        }
        centers
    }
}
