//! Error types for canvacard
//!
//! Three tiers:
//! - [`ConfigError`]: raised by builders before any rendering starts
//! - [`GlyphError`]: emoji lookups; always recovered by drawing plain text
//! - [`CardError`]: fatal render errors (avatar, background, font, encoding)

use std::time::Duration;

use thiserror::Error;

/// Invalid card configuration. Each variant names the offending field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid color for `{field}`: {value:?} (expected a hexadecimal color like #fff or #a7b9c5)")]
    InvalidColor { field: &'static str, value: String },

    #[error("`{field}` must be at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("`{field}` must not be empty")]
    Empty { field: &'static str },

    #[error("`overlay_opacity` must be between 0 and 1 (got {0})")]
    Opacity(f32),

    #[error("invalid theme {0:?}: expected one of dark, light, dim")]
    Theme(String),

    #[error("invalid background type {0:?}: expected color or image")]
    BackgroundType(String),

    #[error("invalid card kind {0:?}: expected welcome, leave or tweet")]
    CardKind(String),
}

/// Failure to fetch raw bytes for an asset
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Failure to turn an asset location into a decoded bitmap
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("cannot fetch {location}: {cause}")]
    Fetch {
        location: String,
        #[source]
        cause: FetchError,
    },

    #[error("cannot decode {location}: {cause}")]
    Decode {
        location: String,
        #[source]
        cause: image::ImageError,
    },
}

impl ImageLoadError {
    /// Whether the failure happened before any bytes arrived
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Fetch {
                cause: FetchError::Http(_) | FetchError::Timeout(_),
                ..
            }
        )
    }
}

/// Emoji glyph lookup failure (never fatal)
#[derive(Debug, Error)]
pub enum GlyphError {
    #[error("no glyph for {0}")]
    NotFound(String),

    #[error("glyph fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("glyph decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("emoji rendering disabled")]
    Disabled,
}

/// Font loading failure
#[derive(Debug, Error)]
pub enum FontError {
    #[error("cannot read font file {path}: {cause}")]
    Read {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("cannot parse font file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("no usable font found (set a font path or CANVACARD_FONT)")]
    Unavailable,
}

/// Fatal render error. No PNG is produced when one of these is returned.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("{}", describe_asset("avatar", .cause))]
    Avatar {
        #[source]
        cause: ImageLoadError,
    },

    #[error("{}", describe_asset("background", .cause))]
    Background {
        #[source]
        cause: ImageLoadError,
    },

    #[error("font error: {0}")]
    Font(#[from] FontError),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("invalid surface size {width}x{height}")]
    Surface { width: u32, height: u32 },
}

fn describe_asset(what: &str, cause: &ImageLoadError) -> String {
    let hint = if cause.is_network() {
        "check the URL and that you are connected to the internet"
    } else {
        "the location does not point to a valid image"
    };
    format!("the {} image is not valid or unreachable ({}): {}", what, hint, cause)
}
