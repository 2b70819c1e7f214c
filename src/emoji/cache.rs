//! Emoji bitmap cache
//!
//! Keys are hyphen-joined code points of the whole cluster. Entries are
//! immutable once inserted; on a racing miss the first insert wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use image::RgbaImage;

/// Decoded emoji bitmap, shared by every render that uses it
pub type EmojiGlyphHandle = Arc<RgbaImage>;

/// Outcome of a resolution attempt
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Resolved(EmojiGlyphHandle),
    /// Lookup failed; never retried for the lifetime of the cache
    Failed,
}

impl CacheEntry {
    pub fn handle(&self) -> Option<EmojiGlyphHandle> {
        match self {
            Self::Resolved(handle) => Some(Arc::clone(handle)),
            Self::Failed => None,
        }
    }
}

/// Process- or renderer-scoped emoji cache, safe to share across tasks
#[derive(Debug, Default)]
pub struct EmojiCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl EmojiCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Insert unless present; returns the entry that ends up cached
    pub fn insert(&self, key: String, entry: CacheEntry) -> CacheEntry {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(entry)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
