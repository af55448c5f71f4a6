//! PNG output.
//!
//! Two renderers produce the same picture by different routes:
//!
//! - [`render_svg`] builds the SVG document and rasterizes it with resvg
//!   (the declarative path).
//! - [`render_canvas`] replays the draw commands onto a tiny-skia path
//!   builder through [`galaxy_trail::Canvas`] (the immediate-mode path).

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use galaxy_trail::{catmull_rom, draw, trail_to_svg, Canvas, Point, TrailStyle};
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use resvg::usvg;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::common::Renderer;

/// Canvas size in trail units.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub scale: f32,
}

impl Frame {
    fn pixel_size(&self) -> Result<(u32, u32)> {
        let w = (self.width * self.scale as f64).round();
        let h = (self.height * self.scale as f64).round();
        if !(w >= 1.0 && h >= 1.0) {
            return Err(anyhow!("Image size {}x{} is too small", w, h));
        }
        Ok((w as u32, h as u32))
    }
}

/// Render the trail with the chosen renderer.
pub fn render(renderer: Renderer, points: &[Point], style: &TrailStyle, frame: Frame) -> Result<Pixmap> {
    match renderer {
        Renderer::Svg => render_svg(points, style, frame),
        Renderer::Canvas => render_canvas(points, style, frame),
    }
}

/// Rasterize the SVG document with resvg.
pub fn render_svg(points: &[Point], style: &TrailStyle, frame: Frame) -> Result<Pixmap> {
    let svg = trail_to_svg(points, style, frame.width, frame.height);
    let (w, h) = frame.pixel_size()?;

    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
        .context("Failed to parse generated SVG")?;
    let mut pixmap = Pixmap::new(w, h).ok_or_else(|| anyhow!("Failed to allocate {}x{} image", w, h))?;

    resvg::render(&tree, Transform::from_scale(frame.scale, frame.scale), &mut pixmap.as_mut());
    debug!("resvg rendered {}x{}", w, h);
    Ok(pixmap)
}

/// tiny-skia path builder that accepts trail draw commands.
struct SkiaCanvas {
    builder: PathBuilder,
    scale: f32,
}

impl SkiaCanvas {
    fn new(scale: f32) -> Self {
        Self { builder: PathBuilder::new(), scale }
    }

    fn xy(&self, p: Point) -> (f32, f32) {
        (p.x as f32 * self.scale, p.y as f32 * self.scale)
    }
}

impl Canvas for SkiaCanvas {
    fn move_to(&mut self, p: Point) {
        let (x, y) = self.xy(p);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, p: Point) {
        let (x, y) = self.xy(p);
        self.builder.line_to(x, y);
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let (x1, y1) = self.xy(ctrl1);
        let (x2, y2) = self.xy(ctrl2);
        let (x, y) = self.xy(to);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }
}

/// Draw the trail directly onto a tiny-skia pixmap.
pub fn render_canvas(points: &[Point], style: &TrailStyle, frame: Frame) -> Result<Pixmap> {
    let (w, h) = frame.pixel_size()?;
    let mut pixmap = Pixmap::new(w, h).ok_or_else(|| anyhow!("Failed to allocate {}x{} image", w, h))?;
    pixmap.fill(parse_color(&style.background)?);

    let mut canvas = SkiaCanvas::new(frame.scale);
    draw(&catmull_rom(points), &mut canvas);

    // finish() is None for an empty builder
    if let Some(path) = canvas.builder.finish() {
        let paint = solid_paint(&style.stroke)?;
        let stroke = Stroke {
            width: style.stroke_width as f32 * frame.scale,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    if style.star_radius > 0.0 {
        let paint = solid_paint(&style.star_color)?;
        let radius = style.star_radius as f32 * frame.scale;
        for p in points {
            let (x, y) = (p.x as f32 * frame.scale, p.y as f32 * frame.scale);
            if let Some(circle) = PathBuilder::from_circle(x, y, radius) {
                pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
    }

    debug!("canvas rendered {}x{}", w, h);
    Ok(pixmap)
}

fn solid_paint(color: &str) -> Result<Paint<'static>> {
    let mut paint = Paint::default();
    paint.set_color(parse_color(color)?);
    paint.anti_alias = true;
    Ok(paint)
}

/// Parse any CSS color the SVG document would accept.
pub fn parse_color(text: &str) -> Result<tiny_skia::Color> {
    let c: svgtypes::Color = text
        .parse()
        .map_err(|e| anyhow!("Invalid color '{}': {}", text, e))?;
    Ok(tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha))
}

/// Convert a rendered pixmap into an image buffer.
pub fn to_image(pixmap: Pixmap) -> Result<RgbaImage> {
    let (w, h) = (pixmap.width(), pixmap.height());
    // Opaque background, so premultiplied and straight RGBA agree
    RgbaImage::from_raw(w, h, pixmap.take()).ok_or_else(|| anyhow!("Pixel buffer size mismatch"))
}

/// Render and save a PNG.
pub fn save_png(
    path: &Path,
    renderer: Renderer,
    points: &[Point],
    style: &TrailStyle,
    frame: Frame,
) -> Result<()> {
    let image = to_image(render(renderer, points, style, frame)?)?;
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote: {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}
