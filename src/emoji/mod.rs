//! Emoji resolution
//!
//! - [`cache`]: shared cluster -> bitmap map, negative results included
//! - [`resolver`]: cache-first lookup in front of a [`GlyphSource`]
//! - [`twemoji`]: remote PNG glyphs from a Twemoji-style CDN
//!
//! Local colour-emoji fonts live in [`crate::font::emoji`].

pub mod cache;
pub mod resolver;
pub mod twemoji;

use std::future::Future;

use image::RgbaImage;

use crate::error::GlyphError;
use crate::font::FontEmojiSource;
use crate::net::AssetFetcher;

pub use cache::{CacheEntry, EmojiCache, EmojiGlyphHandle};
pub use resolver::EmojiResolver;
pub use twemoji::TwemojiSource;

/// Produces a bitmap for one emoji grapheme cluster
pub trait GlyphSource: Send + Sync {
    fn fetch_glyph(&self, cluster: &str) -> impl Future<Output = Result<RgbaImage, GlyphError>> + Send;
}

/// Glyph source selected at runtime
pub enum EmojiSource<F: AssetFetcher> {
    Remote(TwemojiSource<F>),
    Font(FontEmojiSource),
    /// Every emoji falls back to plain text
    Disabled,
}

impl<F: AssetFetcher> EmojiSource<F> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remote(_) => "twemoji",
            Self::Font(_) => "font",
            Self::Disabled => "none",
        }
    }
}

impl<F: AssetFetcher> GlyphSource for EmojiSource<F> {
    async fn fetch_glyph(&self, cluster: &str) -> Result<RgbaImage, GlyphError> {
        match self {
            Self::Remote(source) => source.fetch_glyph(cluster).await,
            Self::Font(source) => source.fetch_glyph(cluster).await,
            Self::Disabled => Err(GlyphError::Disabled),
        }
    }
}
