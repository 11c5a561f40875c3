use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use crate::CachedResponse;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cache storage failed: {0}")]
pub struct CacheError(pub String);

/// Named buckets of URL → response, shaped after the browser's `CacheStorage`.
#[allow(async_fn_in_trait)]
pub trait CacheStorage {
    async fn match_url(&self, bucket: &str, url: &str) -> Result<Option<CachedResponse>, CacheError>;

    async fn put(&self, bucket: &str, url: &str, response: &CachedResponse) -> Result<(), CacheError>;

    /// Only called once every response of the batch is in hand.
    async fn put_all(
        &self,
        bucket: &str,
        entries: &[(String, CachedResponse)],
    ) -> Result<(), CacheError> {
        for (url, response) in entries {
            self.put(bucket, url, response).await?;
        }
        Ok(())
    }

    async fn buckets(&self) -> Result<Vec<String>, CacheError>;

    /// Returns whether the bucket existed.
    async fn delete(&self, bucket: &str) -> Result<bool, CacheError>;
}

impl<C: CacheStorage> CacheStorage for &C {
    async fn match_url(&self, bucket: &str, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        (**self).match_url(bucket, url).await
    }

    async fn put(&self, bucket: &str, url: &str, response: &CachedResponse) -> Result<(), CacheError> {
        (**self).put(bucket, url, response).await
    }

    async fn put_all(
        &self,
        bucket: &str,
        entries: &[(String, CachedResponse)],
    ) -> Result<(), CacheError> {
        (**self).put_all(bucket, entries).await
    }

    async fn buckets(&self) -> Result<Vec<String>, CacheError> {
        (**self).buckets().await
    }

    async fn delete(&self, bucket: &str) -> Result<bool, CacheError> {
        (**self).delete(bucket).await
    }
}

#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    buckets: RefCell<BTreeMap<String, BTreeMap<String, CachedResponse>>>,
    writes: Cell<usize>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket_len(&self, bucket: &str) -> usize {
        self.buckets.borrow().get(bucket).map_or(0, BTreeMap::len)
    }

    /// Total number of `put`s so far, including overwrites.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn match_url(&self, bucket: &str, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        Ok(self
            .buckets
            .borrow()
            .get(bucket)
            .and_then(|entries| entries.get(url))
            .cloned())
    }

    async fn put(&self, bucket: &str, url: &str, response: &CachedResponse) -> Result<(), CacheError> {
        self.writes.set(self.writes.get() + 1);
        self.buckets
            .borrow_mut()
            .entry(bucket.to_string())
            .or_default()
            .insert(url.to_string(), response.clone());
        Ok(())
    }

    async fn buckets(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.buckets.borrow().keys().cloned().collect())
    }

    async fn delete(&self, bucket: &str) -> Result<bool, CacheError> {
        Ok(self.buckets.borrow_mut().remove(bucket).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_buckets_are_separate() {
        let caches = MemoryCacheStorage::new();
        let response = CachedResponse::new("/about", 200, "about");
        block_on(async {
            caches.put("v1", "/about", &response).await.unwrap();
            assert_eq!(caches.match_url("v1", "/about").await, Ok(Some(response.clone())));
            assert_eq!(caches.match_url("v2", "/about").await, Ok(None));
            assert_eq!(caches.buckets().await, Ok(vec!["v1".to_string()]));
            assert_eq!(caches.delete("v1").await, Ok(true));
            assert_eq!(caches.delete("v1").await, Ok(false));
        });
        assert_eq!(caches.writes(), 1);
    }

    #[test]
    fn test_put_all_writes_every_entry() {
        let caches = MemoryCacheStorage::new();
        let entries = vec![
            ("/".to_string(), CachedResponse::new("/", 200, "home")),
            ("/login".to_string(), CachedResponse::new("/login", 200, "login")),
        ];
        block_on(caches.put_all("v1", &entries)).unwrap();
        assert_eq!(caches.bucket_len("v1"), 2);
    }
}
