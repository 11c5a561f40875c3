use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use crate::{
    CacheError, CacheStorage, CachedResponse, FetchRequest, MemoryCacheStorage, Network, NetworkError,
};

/// Scripted network. Unknown URLs and every request made while offline fail to connect.
pub struct FakeNetwork {
    responses: RefCell<HashMap<String, CachedResponse>>,
    online: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            online: Cell::new(true),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(&self, response: CachedResponse) -> &Self {
        self.responses
            .borrow_mut()
            .insert(response.url.clone(), response);
        self
    }

    pub fn json(&self, url: &str, payload: serde_json::Value) -> &Self {
        self.respond(CachedResponse::new(url, 200, payload.to_string()))
    }

    pub fn page(&self, url: &str, body: &str) -> &Self {
        self.respond(CachedResponse::new(url, 200, body))
    }

    pub fn status(&self, url: &str, status: u16) -> &Self {
        self.respond(CachedResponse::new(url, status, ""))
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Network for FakeNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, NetworkError> {
        self.calls.borrow_mut().push(request.url.clone());
        if !self.online.get() {
            return Err(NetworkError {
                url: request.url.clone(),
                message: "offline".to_string(),
            });
        }
        self.responses
            .borrow()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| NetworkError {
                url: request.url.clone(),
                message: "connection refused".to_string(),
            })
    }
}

/// Accepts a fixed number of writes, then fails every `put` like a full quota.
pub struct QuotaCacheStorage {
    pub inner: MemoryCacheStorage,
    writes_left: Cell<usize>,
}

impl QuotaCacheStorage {
    pub fn new(writes: usize) -> Self {
        Self {
            inner: MemoryCacheStorage::new(),
            writes_left: Cell::new(writes),
        }
    }
}

impl CacheStorage for QuotaCacheStorage {
    async fn match_url(&self, bucket: &str, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        self.inner.match_url(bucket, url).await
    }

    async fn put(&self, bucket: &str, url: &str, response: &CachedResponse) -> Result<(), CacheError> {
        let left = self.writes_left.get();
        if left == 0 {
            return Err(CacheError("QuotaExceededError".to_string()));
        }
        self.writes_left.set(left - 1);
        self.inner.put(bucket, url, response).await
    }

    async fn buckets(&self) -> Result<Vec<String>, CacheError> {
        self.inner.buckets().await
    }

    async fn delete(&self, bucket: &str) -> Result<bool, CacheError> {
        self.inner.delete(bucket).await
    }
}
