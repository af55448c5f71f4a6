//! Error type for the fallible edges of the library.
//!
//! Generation never fails (it degrades to a shorter trail). Errors only come
//! from editing a trail with a bad index or from reading trails back in.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrailError {
    #[error("point index {index} out of range for a trail of {len} points")]
    PointIndex { index: usize, len: usize },

    #[error("invalid path data: {0}")]
    PathData(String),

    #[error("invalid trail JSON: {0}")]
    Json(#[from] serde_json::Error),
}
