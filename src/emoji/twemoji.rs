//! Twemoji-style remote glyphs (`{base_url}/{code-points}.png`)

use std::io::ErrorKind;

use image::RgbaImage;
use log::trace;

use crate::constants::TWEMOJI_BASE_URL;
use crate::emoji::GlyphSource;
use crate::error::{FetchError, GlyphError};
use crate::net::{decode_image, AssetFetcher};
use crate::text::asset_file_key;

/// Emoji PNGs served from a CDN or a local directory with the same layout
#[derive(Debug, Clone)]
pub struct TwemojiSource<F> {
    fetcher: F,
    base_url: String,
}

impl<F: AssetFetcher> TwemojiSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_base_url(fetcher, TWEMOJI_BASE_URL)
    }

    pub fn with_base_url(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Asset location for a cluster
    pub fn url_for(&self, cluster: &str) -> String {
        format!("{}/{}.png", self.base_url, asset_file_key(cluster))
    }
}

impl<F: AssetFetcher> GlyphSource for TwemojiSource<F> {
    async fn fetch_glyph(&self, cluster: &str) -> Result<RgbaImage, GlyphError> {
        let url = self.url_for(cluster);
        trace!("Twemoji: {:?} -> {}", cluster, url);
        let bytes = match self.fetcher.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(FetchError::Status(404)) => return Err(GlyphError::NotFound(url)),
            Err(FetchError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(GlyphError::NotFound(url))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(decode_image(&bytes)?)
    }
}
