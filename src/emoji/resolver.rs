//! Cache-first emoji resolver

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::emoji::cache::{CacheEntry, EmojiCache, EmojiGlyphHandle};
use crate::emoji::GlyphSource;
use crate::error::GlyphError;
use crate::text::emoji_key;

/// Maps emoji clusters to bitmaps through a [`GlyphSource`].
///
/// A cluster is fetched at most once per cache, whether the lookup
/// succeeded or not. Failures are never surfaced; `None` means "draw the
/// cluster as text".
pub struct EmojiResolver<G> {
    source: G,
    cache: Arc<EmojiCache>,
}

impl<G: GlyphSource> EmojiResolver<G> {
    /// Resolver with a private cache
    pub fn new(source: G) -> Self {
        Self::with_cache(source, Arc::new(EmojiCache::new()))
    }

    /// Resolver sharing a cache with other resolvers
    pub fn with_cache(source: G, cache: Arc<EmojiCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &Arc<EmojiCache> {
        &self.cache
    }

    pub fn source(&self) -> &G {
        &self.source
    }

    pub async fn resolve(&self, cluster: &str) -> Option<EmojiGlyphHandle> {
        let key = emoji_key(cluster);
        if let Some(entry) = self.cache.get(&key) {
            trace!("Emoji cache hit: {}", key);
            return entry.handle();
        }

        let entry = match self.source.fetch_glyph(cluster).await {
            Ok(bitmap) => {
                debug!("Emoji resolved: {} ({}x{})", key, bitmap.width(), bitmap.height());
                CacheEntry::Resolved(Arc::new(bitmap))
            }
            Err(e @ (GlyphError::NotFound(_) | GlyphError::Disabled)) => {
                debug!("Emoji unresolved: {}: {}", key, e);
                CacheEntry::Failed
            }
            Err(e) => {
                warn!("Emoji {} falls back to text: {}", key, e);
                CacheEntry::Failed
            }
        };

        self.cache.insert(key, entry).handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolves only U+1F600, counting every call
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl GlyphSource for CountingSource {
        async fn fetch_glyph(&self, cluster: &str) -> Result<RgbaImage, GlyphError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if cluster == "\u{1F600}" {
                Ok(RgbaImage::new(4, 4))
            } else {
                Err(GlyphError::NotFound(cluster.to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_hits_cache() {
        let resolver = EmojiResolver::new(CountingSource::default());
        let a = resolver.resolve("\u{1F600}").await.unwrap();
        let b = resolver.resolve("\u{1F600}").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(resolver.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_cached() {
        let resolver = EmojiResolver::new(CountingSource::default());
        assert!(resolver.resolve("\u{1F680}").await.is_none());
        assert!(resolver.resolve("\u{1F680}").await.is_none());
        assert_eq!(resolver.source().calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_shared_cache_across_resolvers() {
        let cache = Arc::new(EmojiCache::new());
        let first = EmojiResolver::with_cache(CountingSource::default(), Arc::clone(&cache));
        let second = EmojiResolver::with_cache(CountingSource::default(), Arc::clone(&cache));
        first.resolve("\u{1F600}").await;
        assert!(second.resolve("\u{1F600}").await.is_some());
        assert_eq!(second.source().calls.load(Ordering::SeqCst), 0);
    }

    /// Yields before answering so concurrent lookups interleave
    #[derive(Default)]
    struct YieldingSource {
        calls: AtomicUsize,
    }

    impl GlyphSource for YieldingSource {
        async fn fetch_glyph(&self, _cluster: &str) -> Result<RgbaImage, GlyphError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(RgbaImage::new(2, 2))
        }
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_entry() {
        let cache = Arc::new(EmojiCache::new());
        let first = EmojiResolver::with_cache(YieldingSource::default(), Arc::clone(&cache));
        let second = EmojiResolver::with_cache(YieldingSource::default(), Arc::clone(&cache));

        let (a, b, c) = tokio::join!(
            first.resolve("\u{1F600}"),
            second.resolve("\u{1F600}"),
            first.resolve("\u{1F680}"),
        );

        // Both missed before either inserted; the first insert is what both hand out
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(c.is_some());
        assert_eq!(cache.len(), 2);

        let again = second.resolve("\u{1F600}").await.unwrap();
        assert!(Arc::ptr_eq(&again, &a));
    }
}
