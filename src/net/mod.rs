//! Asset fetching (HTTP, filesystem) and image decoding

use std::future::Future;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use image::RgbaImage;
use log::{debug, trace};

use crate::constants::{DEFAULT_FETCH_TIMEOUT_MS, USER_AGENT};
use crate::error::{FetchError, ImageLoadError};

/// Where an asset lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    /// `http://` or `https://`
    Url(String),
    /// `file://` URI or a plain path
    File(PathBuf),
}

impl AssetLocation {
    /// Classify a location string
    ///
    /// Supported formats:
    /// - `http://...` or `https://...` - URL
    /// - `file:///path/to/image.png` - File path
    /// - `/path/to/image.png` - Treated as file path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else if let Some(path) = location.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

/// Fetches raw asset bytes
pub trait AssetFetcher: Send + Sync {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// HTTP + filesystem fetcher with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn with_default_timeout() -> Result<Self, FetchError> {
        Self::new(Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS), USER_AGENT)
    }

    /// The client timeout and the outer timeout report the same error
    fn http_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(e)
        }
    }

    async fn fetch_inner(&self, location: AssetLocation) -> Result<Vec<u8>, FetchError> {
        match location {
            AssetLocation::Url(url) => {
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| self.http_error(e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status(status.as_u16()));
                }
                let body = response.bytes().await.map_err(|e| self.http_error(e))?;
                Ok(body.to_vec())
            }
            AssetLocation::File(path) => Ok(tokio::fs::read(&path).await?),
        }
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        trace!("Fetching {}", location);
        let parsed = AssetLocation::parse(location);
        let bytes = tokio::time::timeout(self.timeout, self.fetch_inner(parsed))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;
        debug!("Fetched {} ({} bytes)", location, bytes.len());
        Ok(bytes)
    }
}

/// Decode image bytes (PNG/JPEG/GIF/WebP) to RGBA8
pub fn decode_image(data: &[u8]) -> Result<RgbaImage, image::ImageError> {
    use image::io::Reader as ImageReader;

    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let img = reader.decode()?;
    Ok(img.to_rgba8())
}

/// Fetch and decode an image
pub async fn load_image<F: AssetFetcher>(
    fetcher: &F,
    location: &str,
) -> Result<RgbaImage, ImageLoadError> {
    let data = fetcher
        .fetch(location)
        .await
        .map_err(|cause| ImageLoadError::Fetch {
            location: location.to_string(),
            cause,
        })?;
    decode_image(&data).map_err(|cause| ImageLoadError::Decode {
        location: location.to_string(),
        cause,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            AssetLocation::parse("https://cdn.example.com/a.png"),
            AssetLocation::Url("https://cdn.example.com/a.png".to_string())
        );
        assert_eq!(
            AssetLocation::parse("file:///tmp/a.png"),
            AssetLocation::File(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            AssetLocation::parse("assets/a.png"),
            AssetLocation::File(PathBuf::from("assets/a.png"))
        );
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(1, 1).0, [10, 20, 30, 255]);
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let fetcher = HttpFetcher::with_default_timeout().unwrap();
        let err = load_image(&fetcher, "/definitely/not/here.png").await.err();
        assert!(matches!(err, Some(ImageLoadError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts connections (backlog) but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/avatar.png", listener.local_addr().unwrap());

        let fetcher = HttpFetcher::new(Duration::from_millis(200), USER_AGENT).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)), "{:?}", err);

        let err = load_image(&fetcher, &url).await.unwrap_err();
        assert!(err.is_network());
        drop(listener);
    }
}
