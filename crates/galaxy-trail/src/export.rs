//! JSON export - a trail is just an array of `{x, y}` points.

use crate::error::TrailError;
use crate::geometry::Point;

/// Serialize points as a compact JSON array.
pub fn points_to_json(points: &[Point]) -> Result<String, TrailError> {
    Ok(serde_json::to_string(points)?)
}

/// Serialize points as an indented JSON array.
pub fn points_to_json_pretty(points: &[Point]) -> Result<String, TrailError> {
    Ok(serde_json::to_string_pretty(points)?)
}

/// Parse a JSON array of `{x, y}` points.
pub fn points_from_json(json: &str) -> Result<Vec<Point>, TrailError> {
    Ok(serde_json::from_str(json)?)
}
