//! Completion caching keyed by the exact prompt text

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheExt, CacheKeyGenerator, ContentHashKeyGenerator};
use crate::domain::Completion;
use crate::infrastructure::observability::record_cache_lookup;

const NAMESPACE: &str = "completions";

/// Default lifetime of a cached completion
pub const DEFAULT_COMPLETION_TTL: Duration = Duration::from_secs(3600);

/// Memoizes provider answers per prompt.
///
/// Backend failures are logged and treated as misses; callers never see a
/// cache error.
#[derive(Debug, Clone)]
pub struct CompletionCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
    key_generator: ContentHashKeyGenerator,
}

impl CompletionCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::with_ttl(cache, DEFAULT_COMPLETION_TTL)
    }

    pub fn with_ttl(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            key_generator: ContentHashKeyGenerator::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache key for a prompt
    pub fn key_for(&self, prompt: &str) -> String {
        self.key_generator.generate_with_namespace(NAMESPACE, prompt)
    }

    /// Returns a fresh cached completion, if any
    pub async fn get(&self, prompt: &str) -> Option<Completion> {
        let key = self.key_for(prompt);

        let cached = match self.cache.get::<Completion>(&key).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Completion cache read failed, treating as miss");
                None
            }
        };

        record_cache_lookup(cached.is_some());
        if cached.is_some() {
            debug!(key = %key, "Completion cache hit");
        }

        cached
    }

    /// Stores a completion under its prompt, replacing any previous entry
    pub async fn put(&self, prompt: &str, completion: &Completion) {
        let key = self.key_for(prompt);

        match self.cache.set(&key, completion, self.ttl).await {
            Ok(()) => {
                let entries = self.entry_count().await;
                debug!(key = %key, entries = entries, "Completion cached")
            }
            Err(e) => warn!(error = %e, "Completion cache write failed"),
        }
    }

    /// Number of stored entries, expired ones possibly included
    pub async fn entry_count(&self) -> usize {
        self.cache.size().await.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::infrastructure::cache::InMemoryCache;

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = CompletionCache::new(Arc::new(InMemoryCache::new()));
        let completion = Completion::new("Refunds take 5 days.", 42);

        cache.put("prompt", &completion).await;

        assert_eq!(cache.get("prompt").await, Some(completion));
        assert_eq!(cache.get("other prompt").await, None);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache =
            CompletionCache::with_ttl(Arc::new(InMemoryCache::new()), Duration::from_millis(30));

        cache.put("prompt", &Completion::new("r", 1)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get("prompt").await, None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = CompletionCache::new(Arc::new(InMemoryCache::new()));

        cache.put("prompt", &Completion::new("first", 1)).await;
        cache.put("prompt", &Completion::new("second", 2)).await;

        assert_eq!(cache.get("prompt").await.unwrap().reply, "second");
    }

    #[tokio::test]
    async fn test_distinct_prompts_have_distinct_keys() {
        let cache = CompletionCache::new(Arc::new(MockCache::new()));

        assert_ne!(cache.key_for("a"), cache.key_for("b"));
        assert_eq!(cache.key_for("a"), cache.key_for("a"));
        assert!(cache.key_for("a").starts_with("completions:"));
    }

    #[tokio::test]
    async fn test_backend_errors_are_swallowed() {
        let cache = CompletionCache::new(Arc::new(MockCache::new().with_error("backend down")));

        cache.put("prompt", &Completion::new("r", 1)).await;

        assert_eq!(cache.get("prompt").await, None);
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let backend = MockCache::new();
        let key = CompletionCache::new(Arc::new(MockCache::new())).key_for("prompt");
        let backend = backend.with_raw_entry(&key, "not json");

        let cache = CompletionCache::new(Arc::new(backend));

        assert_eq!(cache.get("prompt").await, None);
    }
}
