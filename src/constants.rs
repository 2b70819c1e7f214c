//! Global constants for canvacard
//!
//! Consolidates layout, text, emoji and network constants
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Text Layout Constants
// ============================================================================

/// Line spacing multiplier shared by the height estimate and the draw pass.
///
/// Both passes advance by `line_height * LINE_SPACING`, so the surface
/// allocated after pre-measure always matches what is drawn.
pub const LINE_SPACING: f32 = 1.0;

/// Hard cap on body text length (grapheme clusters) before wrapping
pub const MAX_BODY_CHARS: usize = 2490;

/// Marker appended to any truncated text
pub const ELLIPSIS: &str = "...";

// ============================================================================
// Emoji Constants
// ============================================================================

/// Default Twemoji CDN (72x72 PNG per code point sequence)
pub const TWEMOJI_BASE_URL: &str = "https://twemoji.maxcdn.com/v/latest/72x72";

/// Pixel size emoji glyphs are rasterized at before scaling to the line
pub const EMOJI_RASTER_SIZE: u32 = 72;

/// Candidate paths for a color emoji font
pub const EMOJI_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
    "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
    "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
    "/usr/share/fonts/TTF/NotoColorEmoji.ttf",
    "/usr/share/fonts/noto/NotoColorEmoji.ttf",
];

/// Zero Width Joiner
pub const ZWJ: char = '\u{200D}';

/// Variation Selector-16 (emoji presentation selector)
pub const VS16: char = '\u{FE0F}';

/// Combining Enclosing Keycap
pub const KEYCAP: char = '\u{20E3}';

/// Regional Indicator Symbols range (flag halves)
pub const REGIONAL_INDICATOR_START: u32 = 0x1F1E6;
pub const REGIONAL_INDICATOR_END: u32 = 0x1F1FF;

/// Check if a code point is a Regional Indicator Symbol
#[inline]
pub const fn is_regional_indicator(cp: u32) -> bool {
    cp >= REGIONAL_INDICATOR_START && cp <= REGIONAL_INDICATOR_END
}

// ============================================================================
// Rendering Constants
// ============================================================================

/// Anti-aliasing width for filled shapes (rounded frames, circles)
pub const AA_WIDTH_SOLID: f32 = 1.0;

/// Coverage below this is treated as fully transparent
pub const ALPHA_THRESHOLD: f32 = 0.004;

// ============================================================================
// Network Constants
// ============================================================================

/// Default timeout for a single asset fetch in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = concat!("canvacard/", env!("CARGO_PKG_VERSION"));
