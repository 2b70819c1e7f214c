//! Font loading and registration
//!
//! Handles:
//! - TTF/OTF font loading (fontdue)
//! - Family registration from explicit paths
//! - System font fallback
//! - Color emoji fonts (CBDT/CBLC, COLR/CPAL)

pub mod emoji;
pub mod face;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use log::{info, trace, warn};

use crate::error::FontError;

pub use emoji::{EmojiFont, FontEmojiSource};
pub use face::{FontFace, FontdueFace, GlyphBitmap};

/// Environment variable naming a fallback font file
pub const FONT_ENV: &str = "CANVACARD_FONT";

/// Candidate paths for a default sans-serif font
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font selection taken from a card configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChoice {
    /// Family name
    pub family: String,
    /// Explicit font file; failing to load it aborts the render
    pub path: Option<String>,
}

impl FontChoice {
    pub fn family(family: &str) -> Self {
        Self {
            family: family.to_string(),
            path: None,
        }
    }
}

/// Registry of loaded font faces, keyed by family name.
///
/// Shared across renders; registration is idempotent per family.
#[derive(Default)]
pub struct FontBook {
    faces: RwLock<HashMap<String, Arc<dyn FontFace>>>,
    fallback: RwLock<Option<Arc<dyn FontFace>>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book whose fallback is the given face
    pub fn with_fallback(face: Arc<dyn FontFace>) -> Self {
        let book = Self::default();
        book.set_fallback(face);
        book
    }

    /// Face used for any family that is not registered
    pub fn set_fallback(&self, face: Arc<dyn FontFace>) {
        if let Ok(mut fallback) = self.fallback.write() {
            *fallback = Some(face);
        }
    }

    /// Register an already constructed face under its family name
    pub fn insert(&self, face: Arc<dyn FontFace>) {
        if let Ok(mut faces) = self.faces.write() {
            faces.insert(face.family().to_string(), face);
        }
    }

    /// Load a font file and register it under `family`
    pub async fn register_font(&self, path: &str, family: &str) -> Result<Arc<dyn FontFace>, FontError> {
        let data = tokio::fs::read(path).await.map_err(|cause| FontError::Read {
            path: path.to_string(),
            cause,
        })?;
        let face: Arc<dyn FontFace> = Arc::new(FontdueFace::from_bytes(family, data, path)?);
        self.insert(Arc::clone(&face));
        Ok(face)
    }

    /// Look up a registered family
    pub fn get(&self, family: &str) -> Option<Arc<dyn FontFace>> {
        self.faces.read().ok()?.get(family).cloned()
    }

    /// Resolve the face a render should use.
    ///
    /// An explicit path is registered (errors propagate). Otherwise the
    /// family is looked up, then the system fallback is used.
    pub async fn resolve(&self, choice: &FontChoice) -> Result<Arc<dyn FontFace>, FontError> {
        if let Some(path) = &choice.path {
            if let Some(face) = self.get(&choice.family) {
                trace!("Font {} already registered", choice.family);
                return Ok(face);
            }
            return self.register_font(path, &choice.family).await;
        }
        if let Some(face) = self.get(&choice.family) {
            return Ok(face);
        }
        self.system_fallback().await
    }

    /// Default face: configured fallback, `CANVACARD_FONT`, then well-known paths
    pub async fn system_fallback(&self) -> Result<Arc<dyn FontFace>, FontError> {
        if let Some(face) = self.fallback.read().ok().and_then(|f| f.clone()) {
            return Ok(face);
        }

        let env_path = std::env::var(FONT_ENV).ok();
        let candidates = env_path
            .iter()
            .map(String::as_str)
            .chain(SYSTEM_FONT_PATHS.iter().copied());

        for path in candidates {
            if !Path::new(path).exists() {
                trace!("Font not found: {}", path);
                continue;
            }
            let data = match tokio::fs::read(path).await {
                Ok(data) => data,
                Err(e) => {
                    warn!("Cannot read font {}: {}", path, e);
                    continue;
                }
            };
            match FontdueFace::from_bytes("sans-serif", data, path) {
                Ok(face) => {
                    info!("System fallback font: {}", path);
                    let face: Arc<dyn FontFace> = Arc::new(face);
                    if let Ok(mut fallback) = self.fallback.write() {
                        *fallback = Some(Arc::clone(&face));
                    }
                    return Ok(face);
                }
                Err(e) => warn!("Skipping font {}: {}", path, e),
            }
        }

        Err(FontError::Unavailable)
    }
}
