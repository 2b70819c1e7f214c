//! Color emoji fonts
//!
//! Extracts emoji bitmaps from the following tables:
//! - CBDT/CBLC: Bitmap format (Noto Color Emoji, etc.)
//! - COLR/CPAL: Vector format (layer compositing)
//!
//! Bitmaps are located once at load time and decoded on demand.
//! Multi-code-point clusters (flags, ZWJ sequences) go through GSUB via
//! rustybuzz.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, info, trace, warn};

use crate::constants::{EMOJI_FONT_PATHS, EMOJI_RASTER_SIZE, VS16};
use crate::emoji::GlyphSource;
use crate::error::{FontError, GlyphError};
use crate::text::is_emoji_cluster;

const SFNT_TRUETYPE: u32 = 0x0001_0000;
const SFNT_OPENTYPE: u32 = 0x4F54_544F;
const SFNT_COLLECTION: u32 = 0x7474_6366;
const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// Where a CBDT bitmap lives
#[derive(Debug, Clone, Copy)]
struct BitmapRecord {
    offset: usize,
    format: u16,
}

/// COLR layer information
#[derive(Debug, Clone, Copy)]
struct ColrLayer {
    glyph_id: u16,
    palette_index: u16,
}

/// Offsets of the tables this reader understands
#[derive(Debug, Default)]
struct TableDirectory {
    cmap: Option<usize>,
    cblc: Option<usize>,
    cbdt: Option<usize>,
    colr: Option<usize>,
    cpal: Option<usize>,
}

/// A loaded color emoji font
pub struct EmojiFont {
    data: Vec<u8>,
    /// Face index for rustybuzz (first face of a collection)
    face_index: u32,
    /// cmap table (codepoint -> glyph ID)
    cmap: HashMap<u32, u16>,
    /// Glyph ID -> CBDT bitmap location
    bitmaps: HashMap<u16, BitmapRecord>,
    /// COLR layer map (base_glyph_id -> layer list)
    colr_layers: HashMap<u16, Vec<ColrLayer>>,
    /// CPAL color palette (RGBA)
    cpal_colors: Vec<[u8; 4]>,
    /// Outline rasterizer for COLR layers
    outlines: Option<fontdue::Font>,
}

impl EmojiFont {
    /// Load an emoji font file
    pub fn load<P: AsRef<Path>>(path: P, target_size: u32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|cause| FontError::Read {
            path: path.display().to_string(),
            cause,
        })?;
        info!("EmojiFont: {} bytes read from {:?}", data.len(), path);
        Self::from_bytes(data, target_size, &path.display().to_string())
    }

    /// Parse an emoji font, picking the bitmap strike closest to `target_size`
    pub fn from_bytes(data: Vec<u8>, target_size: u32, origin: &str) -> Result<Self, FontError> {
        let parse_error = |reason: &str| FontError::Parse {
            path: origin.to_string(),
            reason: reason.to_string(),
        };

        if data.len() < 12 {
            return Err(parse_error("data too short"));
        }

        let (font_offset, face_index) = match read_u32(&data, 0) {
            SFNT_TRUETYPE | SFNT_OPENTYPE => (0, 0),
            SFNT_COLLECTION => {
                if read_u32(&data, 8) == 0 {
                    return Err(parse_error("font collection is empty"));
                }
                debug!("EmojiFont: collection detected, using first face");
                (read_u32(&data, 12) as usize, 0)
            }
            other => return Err(parse_error(&format!("unknown sfnt version 0x{:08X}", other))),
        };

        let tables = read_table_directory(&data, font_offset);
        let outlines = fontdue::Font::from_bytes(data.as_slice(), fontdue::FontSettings::default()).ok();

        let mut font = Self {
            data: Vec::new(),
            face_index,
            cmap: HashMap::new(),
            bitmaps: HashMap::new(),
            colr_layers: HashMap::new(),
            cpal_colors: Vec::new(),
            outlines,
        };

        match tables.cmap {
            Some(offset) => font.parse_cmap(&data, offset),
            None => return Err(parse_error("cmap table not found")),
        }
        if let (Some(cblc), Some(cbdt)) = (tables.cblc, tables.cbdt) {
            font.parse_cblc(&data, cblc, cbdt, target_size);
        }
        if let (Some(colr), Some(cpal)) = (tables.colr, tables.cpal) {
            font.parse_cpal(&data, cpal);
            font.parse_colr(&data, colr);
        }

        if font.bitmaps.is_empty() && font.colr_layers.is_empty() {
            return Err(parse_error("no CBDT or COLR glyphs (sbix and SVG fonts are not supported)"));
        }

        info!(
            "EmojiFont: {} bitmaps, {} COLR glyphs, {} cmap entries from {}",
            font.bitmaps.len(),
            font.colr_layers.len(),
            font.cmap.len(),
            origin
        );

        font.data = data;
        Ok(font)
    }

    /// Number of glyphs with color data
    pub fn glyph_count(&self) -> usize {
        self.bitmaps.len() + self.colr_layers.len()
    }

    fn has_color_glyph(&self, glyph_id: u16) -> bool {
        self.bitmaps.contains_key(&glyph_id) || self.colr_layers.contains_key(&glyph_id)
    }

    /// Find the color glyph for a grapheme cluster
    pub fn lookup(&self, cluster: &str) -> Option<u16> {
        let chars: Vec<char> = cluster.chars().filter(|&c| c != VS16).collect();

        if chars.len() == 1 {
            let glyph_id = *self.cmap.get(&(chars[0] as u32))?;
            return self.has_color_glyph(glyph_id).then_some(glyph_id);
        }

        if let Some(glyph_id) = self.shape_cluster(cluster) {
            return Some(glyph_id);
        }

        // GSUB failed: fall back to the first emoji code point
        trace!("EmojiFont: shaping failed for {:?}, using first emoji char", cluster);
        chars
            .iter()
            .filter(|c| is_emoji_cluster(c.encode_utf8(&mut [0; 4])))
            .filter_map(|c| self.cmap.get(&(*c as u32)).copied())
            .find(|&id| self.has_color_glyph(id))
    }

    /// Shape a cluster and return its glyph when it ligates to one
    fn shape_cluster(&self, cluster: &str) -> Option<u16> {
        let face = rustybuzz::Face::from_slice(&self.data, self.face_index)?;
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(cluster);

        let glyphs = rustybuzz::shape(&face, &[], buffer);
        let infos = glyphs.glyph_infos();
        trace!(
            "EmojiFont: {:?} shaped to {:?}",
            cluster,
            infos.iter().map(|i| i.glyph_id).collect::<Vec<_>>()
        );

        match infos {
            [single] => {
                let glyph_id = u16::try_from(single.glyph_id).ok()?;
                self.has_color_glyph(glyph_id).then_some(glyph_id)
            }
            _ => None,
        }
    }

    /// Render a cluster to RGBA (CBDT first, then COLR)
    pub fn render(&self, cluster: &str, size: f32) -> Result<RgbaImage, GlyphError> {
        let glyph_id = self
            .lookup(cluster)
            .ok_or_else(|| GlyphError::NotFound(cluster.to_string()))?;

        if let Some(record) = self.bitmaps.get(&glyph_id) {
            return self.decode_bitmap(*record);
        }
        self.render_colr(glyph_id, size)
            .ok_or_else(|| GlyphError::NotFound(cluster.to_string()))
    }

    /// Parse cmap table (format 12 only)
    fn parse_cmap(&mut self, data: &[u8], offset: usize) {
        let num_tables = read_u16(data, offset + 2) as usize;

        for i in 0..num_tables {
            let record = offset + 4 + i * 8;
            if record + 8 > data.len() {
                break;
            }
            let platform_id = read_u16(data, record);
            let encoding_id = read_u16(data, record + 2);
            let subtable = offset + read_u32(data, record + 4) as usize;

            let unicode = platform_id == 0 || (platform_id == 3 && encoding_id == 10);
            if unicode && read_u16(data, subtable) == 12 {
                self.parse_cmap_format12(data, subtable);
                return;
            }
        }
        warn!("EmojiFont: no format 12 cmap subtable");
    }

    fn parse_cmap_format12(&mut self, data: &[u8], offset: usize) {
        let num_groups = read_u32(data, offset + 12) as usize;

        for i in 0..num_groups {
            let group = offset + 16 + i * 12;
            if group + 12 > data.len() {
                break;
            }
            let start_char = read_u32(data, group);
            let end_char = read_u32(data, group + 4).min(MAX_CODE_POINT);
            let start_glyph = read_u32(data, group + 8);
            if start_char > end_char {
                continue;
            }

            // Glyph ids are 16-bit, so one group maps at most 65536 code points
            for (index, cp) in (start_char..=end_char).enumerate() {
                let glyph = u32::try_from(index)
                    .ok()
                    .and_then(|i| start_glyph.checked_add(i))
                    .and_then(|g| u16::try_from(g).ok());
                match glyph {
                    Some(glyph) => {
                        self.cmap.insert(cp, glyph);
                    }
                    None => break,
                }
            }
        }
    }

    /// Index the CBDT bitmaps of the best strike.
    ///
    /// The smallest strike at or above `target_size` wins; otherwise the largest.
    fn parse_cblc(&mut self, data: &[u8], cblc: usize, cbdt: usize, target_size: u32) {
        let major_version = read_u16(data, cblc);
        if major_version != 2 && major_version != 3 {
            warn!("CBLC: unsupported version {}", major_version);
            return;
        }

        let num_sizes = read_u32(data, cblc + 4) as usize;
        let strikes: Vec<(usize, u8)> = (0..num_sizes)
            .map(|i| cblc + 8 + i * 48)
            .take_while(|&offset| offset + 48 <= data.len())
            .map(|offset| (offset, data[offset + 45]))
            .collect();

        let best = strikes
            .iter()
            .filter(|(_, ppem)| *ppem as u32 >= target_size)
            .min_by_key(|(_, ppem)| *ppem)
            .or_else(|| strikes.iter().max_by_key(|(_, ppem)| *ppem));

        let Some(&(strike, ppem)) = best else {
            warn!("CBLC: no suitable strike found");
            return;
        };
        debug!("CBLC: using strike with ppem={}", ppem);

        let array = cblc + read_u32(data, strike) as usize;
        let num_subtables = read_u32(data, strike + 8) as usize;

        for i in 0..num_subtables {
            let entry = array + i * 8;
            if entry + 8 > data.len() {
                break;
            }
            let first_glyph = read_u16(data, entry);
            let last_glyph = read_u16(data, entry + 2);
            let header = array + read_u32(data, entry + 4) as usize;
            if header + 8 > data.len() || last_glyph < first_glyph {
                continue;
            }

            let index_format = read_u16(data, header);
            let image_format = read_u16(data, header + 2);
            let image_data = cbdt + read_u32(data, header + 4) as usize;

            for (j, glyph_id) in (first_glyph..=last_glyph).enumerate() {
                let offset = match index_format {
                    1 => image_data + read_u32(data, header + 8 + j * 4) as usize,
                    2 => image_data + j * read_u32(data, header + 8) as usize,
                    3 => image_data + read_u16(data, header + 8 + j * 2) as usize,
                    other => {
                        trace!("CBLC: unsupported index format {}", other);
                        break;
                    }
                };
                self.bitmaps.insert(
                    glyph_id,
                    BitmapRecord {
                        offset,
                        format: image_format,
                    },
                );
            }
        }
    }

    /// Decode one CBDT bitmap (formats 17, 18, 19 carry PNG data)
    fn decode_bitmap(&self, record: BitmapRecord) -> Result<RgbaImage, GlyphError> {
        let data = &self.data;
        let (len_offset, png_offset) = match record.format {
            // small metrics (5 bytes) + length
            17 => (record.offset + 5, record.offset + 9),
            // big metrics (8 bytes) + length
            18 => (record.offset + 8, record.offset + 12),
            // metrics live in CBLC
            19 => (record.offset, record.offset + 4),
            other => {
                return Err(GlyphError::NotFound(format!("CBDT image format {}", other)));
            }
        };

        let len = read_u32(data, len_offset) as usize;
        let png = data
            .get(png_offset..png_offset + len)
            .ok_or_else(|| GlyphError::NotFound("CBDT data out of bounds".to_string()))?;

        let img = image::io::Reader::new(Cursor::new(png))
            .with_guessed_format()
            .map_err(|e| GlyphError::Decode(e.into()))?
            .decode()?;
        Ok(img.to_rgba8())
    }

    /// Parse CPAL table (first palette only)
    fn parse_cpal(&mut self, data: &[u8], offset: usize) {
        let num_entries = read_u16(data, offset + 2) as usize;
        let num_records = read_u16(data, offset + 6) as usize;
        let records = offset + read_u32(data, offset + 8) as usize;

        // Color records are BGRA
        for i in 0..num_entries.min(num_records) {
            let c = records + i * 4;
            if c + 4 > data.len() {
                break;
            }
            self.cpal_colors.push([data[c + 2], data[c + 1], data[c], data[c + 3]]);
        }
        trace!("CPAL: loaded {} colors", self.cpal_colors.len());
    }

    /// Parse COLR v0 layer records
    fn parse_colr(&mut self, data: &[u8], offset: usize) {
        let version = read_u16(data, offset);
        let num_base_glyphs = read_u16(data, offset + 2) as usize;
        let base_records = offset + read_u32(data, offset + 4) as usize;
        let layer_records = offset + read_u32(data, offset + 8) as usize;

        if version > 0 {
            warn!("COLR: version {} not supported (v0 layers only)", version);
        }

        for i in 0..num_base_glyphs {
            let record = base_records + i * 6;
            if record + 6 > data.len() {
                break;
            }
            let glyph_id = read_u16(data, record);
            let first_layer = read_u16(data, record + 2) as usize;
            let num_layers = read_u16(data, record + 4) as usize;

            let layers: Vec<ColrLayer> = (0..num_layers)
                .map(|j| layer_records + (first_layer + j) * 4)
                .take_while(|&l| l + 4 <= data.len())
                .map(|l| ColrLayer {
                    glyph_id: read_u16(data, l),
                    palette_index: read_u16(data, l + 2),
                })
                .collect();

            if !layers.is_empty() {
                self.colr_layers.insert(glyph_id, layers);
            }
        }
    }

    /// Rasterize a COLR glyph by compositing its layers bottom to top
    fn render_colr(&self, glyph_id: u16, size: f32) -> Option<RgbaImage> {
        let layers = self.colr_layers.get(&glyph_id)?;
        let font = self.outlines.as_ref()?;

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        for layer in layers {
            let m = font.metrics_indexed(layer.glyph_id, size);
            let top = -(m.ymin + m.height as i32);
            min_x = min_x.min(m.xmin);
            min_y = min_y.min(top);
            max_x = max_x.max(m.xmin + m.width as i32);
            max_y = max_y.max(top + m.height as i32);
        }
        if max_x <= min_x || max_y <= min_y {
            return None;
        }

        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;
        let mut out = RgbaImage::new(width, height);

        for layer in layers {
            let (m, coverage) = font.rasterize_indexed(layer.glyph_id, size);
            let color = self
                .cpal_colors
                .get(layer.palette_index as usize)
                .copied()
                .unwrap_or([0, 0, 0, 255]);
            let ox = m.xmin - min_x;
            let oy = -(m.ymin + m.height as i32) - min_y;

            for py in 0..m.height {
                for px in 0..m.width {
                    let cov = coverage[py * m.width + px];
                    if cov == 0 {
                        continue;
                    }
                    let (x, y) = (ox + px as i32, oy + py as i32);
                    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                        continue;
                    }
                    let dst = out.get_pixel_mut(x as u32, y as u32);
                    dst.0 = crate::utils::blend_over(dst.0, color, cov as f32 / 255.0);
                }
            }
        }

        Some(out)
    }
}

/// Emoji glyphs rasterized from a local color font
#[derive(Clone)]
pub struct FontEmojiSource {
    font: Arc<EmojiFont>,
    size: f32,
}

impl FontEmojiSource {
    pub fn new(font: EmojiFont) -> Self {
        Self {
            font: Arc::new(font),
            size: EMOJI_RASTER_SIZE as f32,
        }
    }

    /// Load the first usable emoji font: `explicit`, then well-known paths
    pub fn discover(explicit: Option<&str>) -> Option<Self> {
        for path in explicit.into_iter().chain(EMOJI_FONT_PATHS.iter().copied()) {
            if !Path::new(path).exists() {
                trace!("EmojiFont: not found: {}", path);
                continue;
            }
            match EmojiFont::load(path, EMOJI_RASTER_SIZE) {
                Ok(font) => {
                    info!("EmojiFont: using {}", path);
                    return Some(Self::new(font));
                }
                Err(e) => warn!("EmojiFont: skipping {}: {}", path, e),
            }
        }
        warn!("EmojiFont: no usable emoji font found");
        None
    }
}

impl GlyphSource for FontEmojiSource {
    async fn fetch_glyph(&self, cluster: &str) -> Result<RgbaImage, GlyphError> {
        self.font.render(cluster, self.size)
    }
}

fn read_table_directory(data: &[u8], font_offset: usize) -> TableDirectory {
    let mut tables = TableDirectory::default();
    let num_tables = read_u16(data, font_offset + 4) as usize;

    for i in 0..num_tables {
        let entry = font_offset + 12 + i * 16;
        if entry + 16 > data.len() {
            break;
        }
        let offset = Some(read_u32(data, entry + 8) as usize);
        match &data[entry..entry + 4] {
            b"cmap" => tables.cmap = offset,
            b"CBLC" => tables.cblc = offset,
            b"CBDT" => tables.cbdt = offset,
            b"COLR" => tables.colr = offset,
            b"CPAL" => tables.cpal = offset,
            _ => {}
        }
    }
    tables
}

// Big-endian readers; out-of-range reads yield 0
fn read_u16(data: &[u8], offset: usize) -> u16 {
    data.get(offset..offset + 2)
        .map_or(0, |b| u16::from_be_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    data.get(offset..offset + 4)
        .map_or(0, |b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba(color));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageOutputFormat::Png)
            .unwrap();
        out
    }

    /// Minimal sfnt: cmap (U+1F600 -> glyph 1) + one CBDT format 17 bitmap
    fn tiny_emoji_font() -> Vec<u8> {
        let png = png_bytes([255, 200, 0, 255]);

        let mut cmap = Vec::new();
        cmap.extend(0u16.to_be_bytes()); // version
        cmap.extend(1u16.to_be_bytes()); // numTables
        cmap.extend(3u16.to_be_bytes()); // platform
        cmap.extend(10u16.to_be_bytes()); // encoding
        cmap.extend(12u32.to_be_bytes()); // subtable offset
        cmap.extend(12u16.to_be_bytes()); // format
        cmap.extend(0u16.to_be_bytes());
        cmap.extend(28u32.to_be_bytes()); // length
        cmap.extend(0u32.to_be_bytes()); // language
        cmap.extend(1u32.to_be_bytes()); // numGroups
        cmap.extend(0x1F600u32.to_be_bytes());
        cmap.extend(0x1F600u32.to_be_bytes());
        cmap.extend(1u32.to_be_bytes());

        let mut cblc = Vec::new();
        cblc.extend(3u16.to_be_bytes());
        cblc.extend(0u16.to_be_bytes());
        cblc.extend(1u32.to_be_bytes()); // numSizes
        let mut strike = vec![0u8; 48];
        strike[0..4].copy_from_slice(&56u32.to_be_bytes()); // indexSubTableArrayOffset
        strike[8..12].copy_from_slice(&1u32.to_be_bytes()); // numberOfIndexSubTables
        strike[44] = 109;
        strike[45] = 109;
        cblc.extend(strike);
        cblc.extend(1u16.to_be_bytes()); // firstGlyph
        cblc.extend(1u16.to_be_bytes()); // lastGlyph
        cblc.extend(8u32.to_be_bytes()); // additionalOffset
        cblc.extend(1u16.to_be_bytes()); // indexFormat
        cblc.extend(17u16.to_be_bytes()); // imageFormat
        cblc.extend(0u32.to_be_bytes()); // imageDataOffset
        cblc.extend(4u32.to_be_bytes());
        cblc.extend((4 + 9 + png.len() as u32).to_be_bytes());

        let mut cbdt = Vec::new();
        cbdt.extend(3u16.to_be_bytes());
        cbdt.extend(0u16.to_be_bytes());
        cbdt.extend([2u8, 2, 0, 2, 2]); // small metrics
        cbdt.extend((png.len() as u32).to_be_bytes());
        cbdt.extend(&png);

        let tables: [(&[u8; 4], Vec<u8>); 3] = [(b"CBDT", cbdt), (b"CBLC", cblc), (b"cmap", cmap)];
        let mut font = Vec::new();
        font.extend(SFNT_TRUETYPE.to_be_bytes());
        font.extend(3u16.to_be_bytes());
        font.extend([0u8; 6]);
        let mut offset = 12 + tables.len() * 16;
        for (tag, body) in &tables {
            font.extend(tag.iter());
            font.extend(0u32.to_be_bytes());
            font.extend((offset as u32).to_be_bytes());
            font.extend((body.len() as u32).to_be_bytes());
            offset += body.len();
        }
        for (_, body) in &tables {
            font.extend(body);
        }
        font
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = EmojiFont::from_bytes(vec![0u8; 64], 72, "memory").err();
        assert!(matches!(err, Some(FontError::Parse { .. })));
    }

    #[test]
    fn test_cbdt_lookup_and_decode() {
        let font = EmojiFont::from_bytes(tiny_emoji_font(), 72, "memory").unwrap();
        assert_eq!(font.glyph_count(), 1);
        assert_eq!(font.lookup("\u{1F600}"), Some(1));
        // VS16 is ignored for single code points
        assert_eq!(font.lookup("\u{1F600}\u{FE0F}"), Some(1));

        let img = font.render("\u{1F600}", 72.0).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0).0, [255, 200, 0, 255]);
    }

    fn format12_subtable(groups: &[(u32, u32, u32)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend(12u16.to_be_bytes());
        data.extend(0u16.to_be_bytes());
        data.extend((16 + groups.len() as u32 * 12).to_be_bytes());
        data.extend(0u32.to_be_bytes());
        data.extend((groups.len() as u32).to_be_bytes());
        for (start, end, glyph) in groups {
            data.extend(start.to_be_bytes());
            data.extend(end.to_be_bytes());
            data.extend(glyph.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_malformed_cmap_groups_are_bounded() {
        let mut font = EmojiFont::from_bytes(tiny_emoji_font(), 72, "memory").unwrap();
        font.cmap.clear();
        let data = format12_subtable(&[
            // whole u32 range: clamped to Unicode, then cut where glyph ids leave u16
            (0, u32::MAX, 0),
            // reversed range
            (0x20, 0x10, 5),
            // glyph id overflows u32 on the second code point
            (0x1F600, 0x1F601, u32::MAX),
            // glyph id past u16
            (0x1F680, 0x1F680, 0x1_0000),
        ]);
        font.parse_cmap_format12(&data, 0);

        assert_eq!(font.cmap.len(), 65536);
        assert_eq!(font.cmap.get(&0xFFFF), Some(&0xFFFF));
        assert_eq!(font.cmap.get(&0x1_0000), None);
        assert_eq!(font.cmap.get(&0x1F601), None);
        assert_eq!(font.cmap.get(&0x1F680), None);
    }

    #[test]
    fn test_truncated_cmap_stops_at_data_end() {
        let mut font = EmojiFont::from_bytes(tiny_emoji_font(), 72, "memory").unwrap();
        font.cmap.clear();
        let mut data = format12_subtable(&[(0x41, 0x41, 7)]);
        // claims far more groups than the buffer holds
        data[12..16].copy_from_slice(&u32::MAX.to_be_bytes());
        font.parse_cmap_format12(&data, 0);
        assert_eq!(font.cmap.len(), 1);
        assert_eq!(font.cmap.get(&0x41), Some(&7));
    }

    #[test]
    fn test_missing_glyph_is_not_found() {
        let font = EmojiFont::from_bytes(tiny_emoji_font(), 72, "memory").unwrap();
        assert!(matches!(font.render("\u{1F680}", 72.0), Err(GlyphError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_font_source_fetch() {
        let font = EmojiFont::from_bytes(tiny_emoji_font(), 72, "memory").unwrap();
        let source = FontEmojiSource::new(font);
        assert!(source.fetch_glyph("\u{1F600}").await.is_ok());
        assert!(source.fetch_glyph("x").await.is_err());
    }
}
