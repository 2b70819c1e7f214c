//! Font faces
//!
//! Wraps `fontdue::Font` behind the [`FontFace`] trait so the layout
//! engine and the surface measure and draw through the same object.

use fontdue::{Font, FontSettings};
use log::info;

use crate::error::FontError;
use crate::text::TextMeasure;

/// Coverage bitmap for one rasterized glyph
#[derive(Debug, Clone, Default)]
pub struct GlyphBitmap {
    /// Bitmap width (pixels)
    pub width: usize,
    /// Bitmap height (pixels)
    pub height: usize,
    /// Horizontal offset from pen position
    pub xmin: i32,
    /// Bottom edge offset from baseline (positive = above baseline)
    pub ymin: i32,
    /// Horizontal advance to next character
    pub advance: f32,
    /// Row-major coverage, one byte per pixel
    pub coverage: Vec<u8>,
}

/// A font usable for both measurement and rasterization
pub trait FontFace: TextMeasure + Send + Sync {
    /// Family name this face was registered under
    fn family(&self) -> &str;

    fn rasterize(&self, ch: char, size: f32) -> GlyphBitmap;
}

/// `fontdue`-backed font face
pub struct FontdueFace {
    family: String,
    font: Font,
}

impl FontdueFace {
    /// Parse a TTF/OTF font from bytes
    pub fn from_bytes(family: &str, data: Vec<u8>, origin: &str) -> Result<Self, FontError> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|e| {
            FontError::Parse {
                path: origin.to_string(),
                reason: e.to_string(),
            }
        })?;
        info!("Font loaded: {} ({} glyphs) from {}", family, font.glyph_count(), origin);
        Ok(Self {
            family: family.to_string(),
            font,
        })
    }
}

impl TextMeasure for FontdueFace {
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|ch| self.font.metrics(ch, size).advance_width)
            .sum()
    }
}

impl FontFace for FontdueFace {
    fn family(&self) -> &str {
        &self.family
    }

    fn rasterize(&self, ch: char, size: f32) -> GlyphBitmap {
        let (metrics, coverage) = self.font.rasterize(ch, size);
        GlyphBitmap {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            advance: metrics.advance_width,
            coverage,
        }
    }
}
