//! Raster drawing surface
//!
//! CPU-side RGBA8 pixmap with the handful of primitives a card needs:
//! rectangles, anti-aliased shapes, a coverage clip mask, scaled image
//! blits and glyph-by-glyph text. Every write goes through
//! [`blend_over`], so clip, global alpha and coverage compose uniformly.

use image::imageops::FilterType;
use image::RgbaImage;
use log::trace;

use crate::constants::{AA_WIDTH_SOLID, ALPHA_THRESHOLD};
use crate::drawing::geometry::{aa_alpha_from_distance, circle_sdf, distance_to_segment, rounded_rect_sdf};
use crate::error::CardError;
use crate::font::FontFace;
use crate::utils::{blend_over, Color};

/// Closed shapes the surface can fill, stroke and clip to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    RoundedRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
    },
}

impl Shape {
    /// Signed distance from a point (positive inside)
    pub fn sdf(&self, px: f32, py: f32) -> f32 {
        match *self {
            Shape::RoundedRect { x, y, w, h, radius } => rounded_rect_sdf(px, py, x, y, w, h, radius),
            Shape::Circle { cx, cy, radius } => circle_sdf(px, py, cx, cy, radius),
        }
    }

    /// Bounding box (x0, y0, x1, y1) grown by `pad`
    fn bounds(&self, pad: f32) -> (f32, f32, f32, f32) {
        match *self {
            Shape::RoundedRect { x, y, w, h, .. } => (x - pad, y - pad, x + w + pad, y + h + pad),
            Shape::Circle { cx, cy, radius } => {
                (cx - radius - pad, cy - radius - pad, cx + radius + pad, cy + radius + pad)
            }
        }
    }
}

/// RGBA8 drawing surface
pub struct Surface {
    width: u32,
    height: u32,
    /// Straight-alpha RGBA, row-major
    pixels: Vec<u8>,
    /// Per-pixel clip coverage (None = unclipped)
    clip: Option<Vec<u8>>,
    global_alpha: f32,
}

impl Surface {
    /// Allocate a transparent surface
    pub fn new(width: u32, height: u32) -> Result<Self, CardError> {
        if width == 0 || height == 0 {
            return Err(CardError::Surface { width, height });
        }
        trace!("Surface allocated: {}x{}", width, height);
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; (width * height * 4) as usize],
            clip: None,
            global_alpha: 1.0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y); transparent outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Opacity applied to every subsequent draw (0.0-1.0)
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Composite one pixel, honoring clip and global alpha
    fn blend(&mut self, x: i64, y: i64, src: [u8; 4], coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let offset = (y as u32 * self.width + x as u32) as usize;
        let clip = match &self.clip {
            Some(mask) => mask[offset] as f32 / 255.0,
            None => 1.0,
        };
        let coverage = coverage * clip * self.global_alpha;
        if coverage < ALPHA_THRESHOLD {
            return;
        }
        let idx = offset * 4;
        let dst = [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ];
        self.pixels[idx..idx + 4].copy_from_slice(&blend_over(dst, src, coverage));
    }

    /// Visit pixel centers inside a box, clamped to the surface
    fn pixel_range(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> (i64, i64, i64, i64) {
        let clamp_x = |v: f32| (v.floor() as i64).clamp(0, self.width as i64);
        let clamp_y = |v: f32| (v.floor() as i64).clamp(0, self.height as i64);
        (clamp_x(x0), clamp_y(y0), clamp_x(x1.ceil()), clamp_y(y1.ceil()))
    }

    /// Fill an axis-aligned rectangle (pixel centers inside are covered)
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, y0, x1, y1) = self.pixel_range(x, y, x + w, y + h);
        let src = color.to_array();
        for py in y0..y1 {
            let cy = py as f32 + 0.5;
            if cy < y || cy > y + h {
                continue;
            }
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                if cx >= x && cx <= x + w {
                    self.blend(px, py, src, 1.0);
                }
            }
        }
    }

    /// Fill a shape with anti-aliased edges
    pub fn fill_shape(&mut self, shape: &Shape, color: Color) {
        let (bx0, by0, bx1, by1) = shape.bounds(AA_WIDTH_SOLID + 1.0);
        let (x0, y0, x1, y1) = self.pixel_range(bx0, by0, bx1, by1);
        let src = color.to_array();
        for py in y0..y1 {
            for px in x0..x1 {
                let d = shape.sdf(px as f32 + 0.5, py as f32 + 0.5);
                let coverage = aa_alpha_from_distance(d, AA_WIDTH_SOLID);
                if coverage > 0.0 {
                    self.blend(px, py, src, coverage);
                }
            }
        }
    }

    /// Stroke a shape outline centered on its edge
    pub fn stroke_shape(&mut self, shape: &Shape, color: Color, line_width: f32) {
        let half = line_width * 0.5;
        let (bx0, by0, bx1, by1) = shape.bounds(half + AA_WIDTH_SOLID + 1.0);
        let (x0, y0, x1, y1) = self.pixel_range(bx0, by0, bx1, by1);
        let src = color.to_array();
        for py in y0..y1 {
            for px in x0..x1 {
                let d = half - shape.sdf(px as f32 + 0.5, py as f32 + 0.5).abs();
                let coverage = aa_alpha_from_distance(d, AA_WIDTH_SOLID);
                if coverage > 0.0 {
                    self.blend(px, py, src, coverage);
                }
            }
        }
    }

    /// Stroke a straight line segment
    pub fn stroke_line(&mut self, ax: f32, ay: f32, bx: f32, by: f32, color: Color, line_width: f32) {
        let half = line_width * 0.5;
        let pad = half + AA_WIDTH_SOLID + 1.0;
        let (x0, y0, x1, y1) = self.pixel_range(
            ax.min(bx) - pad,
            ay.min(by) - pad,
            ax.max(bx) + pad,
            ay.max(by) + pad,
        );
        let src = color.to_array();
        for py in y0..y1 {
            for px in x0..x1 {
                let dist = distance_to_segment(px as f32 + 0.5, py as f32 + 0.5, ax, ay, bx, by);
                let coverage = aa_alpha_from_distance(half - dist, AA_WIDTH_SOLID);
                if coverage > 0.0 {
                    self.blend(px, py, src, coverage);
                }
            }
        }
    }

    /// Intersect the clip region with a shape
    pub fn clip_to(&mut self, shape: &Shape) {
        let width = self.width;
        let mask = self
            .clip
            .get_or_insert_with(|| vec![255u8; (width * self.height) as usize]);
        for (offset, value) in mask.iter_mut().enumerate() {
            if *value == 0 {
                continue;
            }
            let px = (offset as u32 % width) as f32 + 0.5;
            let py = (offset as u32 / width) as f32 + 0.5;
            let coverage = aa_alpha_from_distance(shape.sdf(px, py), AA_WIDTH_SOLID);
            *value = (*value as f32 * coverage).round() as u8;
        }
    }

    /// Drop the clip region
    pub fn reset_clip(&mut self) {
        self.clip = None;
    }

    /// Draw an image scaled into the box (x, y, w, h)
    pub fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        let target_w = w.round().max(1.0) as u32;
        let target_h = h.round().max(1.0) as u32;

        let resized;
        let source = if image.dimensions() == (target_w, target_h) {
            image
        } else {
            resized = image::imageops::resize(image, target_w, target_h, FilterType::Lanczos3);
            &resized
        };

        let ox = x.round() as i64;
        let oy = y.round() as i64;
        for (px, py, pixel) in source.enumerate_pixels() {
            if pixel.0[3] == 0 {
                continue;
            }
            self.blend(ox + px as i64, oy + py as i64, pixel.0, 1.0);
        }
    }

    /// Draw text with its baseline at `baseline`, starting at `x`.
    ///
    /// Returns the advance width drawn.
    pub fn fill_text(
        &mut self,
        face: &dyn FontFace,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        color: Color,
    ) -> f32 {
        let src = color.to_array();
        let mut pen = x;
        for ch in text.chars() {
            let glyph = face.rasterize(ch, size);
            let gx = pen.round() as i64 + glyph.xmin as i64;
            let gy = baseline.round() as i64 - (glyph.ymin as i64 + glyph.height as i64);
            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let cov = glyph.coverage.get(row * glyph.width + col).copied().unwrap_or(0);
                    if cov == 0 {
                        continue;
                    }
                    self.blend(gx + col as i64, gy + row as i64, src, cov as f32 / 255.0);
                }
            }
            pen += glyph.advance;
        }
        pen - x
    }

    /// Encode the surface as PNG (RGBA8)
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(out)
    }
}
