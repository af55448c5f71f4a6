//! SVG output - and reading a trail back from path data.
//!
//! The declarative renderer: [`path_data`] turns draw commands into the text
//! of a `d` attribute, and [`trail_to_svg`] wraps it in a standalone document
//! with a background and a star on every trail point.
//!
//! ## Path data round trip
//!
//! An exported `d` string holds every trail point as the end of a command, so
//! [`points_from_path_data`] can recover the trail from it. svgtypes does the
//! parsing and already resolves relative and shorthand commands, so any
//! hand-edited path works too.

use std::fmt::Write;

use log::debug;
use serde::{Deserialize, Serialize};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use crate::error::TrailError;
use crate::geometry::Point;
use crate::spline::{catmull_rom, DrawCommand};

/// Colors and sizes for the SVG document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailStyle {
    /// Canvas fill
    pub background: String,
    /// Trail stroke color
    pub stroke: String,
    /// Trail stroke width in pixels
    pub stroke_width: f64,
    /// Star marker fill
    pub star_color: String,
    /// Star marker radius (0 = no markers)
    pub star_radius: f64,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            background: "#0b0d2a".to_string(),
            stroke: "#f5d76e".to_string(),
            stroke_width: 4.0,
            star_color: "#ffffff".to_string(),
            star_radius: 6.0,
        }
    }
}

/// Text of an SVG `d` attribute for the commands.
///
/// `"M x y C cx1 cy1, cx2 cy2, x y ..."`, `"M x y L x y"` for a straight
/// trail and an empty string when there is nothing to draw. Coordinates are
/// written at full precision so [`points_from_path_data`] recovers them exactly.
pub fn path_data(commands: &[DrawCommand]) -> String {
    let mut d = String::new();

    for command in commands {
        if !d.is_empty() {
            d.push(' ');
        }
        // Writing into a String cannot fail
        let _ = match command {
            DrawCommand::MoveTo(p) => write!(d, "M {} {}", p.x, p.y),
            DrawCommand::LineTo(p) => write!(d, "L {} {}", p.x, p.y),
            DrawCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                d,
                "C {} {}, {} {}, {} {}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
        };
    }

    d
}

/// Standalone SVG document showing the trail on a `width` x `height` canvas.
pub fn trail_to_svg(points: &[Point], style: &TrailStyle, width: f64, height: f64) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect width="100%" height="100%" fill="{bg}"/>
"#,
        w = width,
        h = height,
        bg = style.background,
    ));

    let d = path_data(&catmull_rom(points));
    if !d.is_empty() {
        svg.push_str(&format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" fill=\"none\"/>\n",
            d, style.stroke, style.stroke_width
        ));
    }

    if style.star_radius > 0.0 && !points.is_empty() {
        svg.push_str(&format!("<g fill=\"{}\">\n", style.star_color));
        for p in points {
            svg.push_str(&format!(
                "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\"/>\n",
                p.x, p.y, style.star_radius
            ));
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Recover trail points from path data.
///
/// Every command end point becomes a trail point; control points are
/// dropped. Only the first subpath is read.
pub fn points_from_path_data(d: &str) -> Result<Vec<Point>, TrailError> {
    let mut points = Vec::new();

    for segment in SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|e| TrailError::PathData(e.to_string()))?;
        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                if !points.is_empty() {
                    debug!("ignoring subpath after {} points", points.len());
                    break;
                }
                points.push(Point::new(x, y));
            }
            SimplePathSegment::LineTo { x, y }
            | SimplePathSegment::CurveTo { x, y, .. }
            | SimplePathSegment::Quadratic { x, y, .. } => {
                points.push(Point::new(x, y));
            }
            SimplePathSegment::ClosePath => {}
        }
    }

    Ok(points)
}
