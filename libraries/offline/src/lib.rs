//! This is a library for reading the conference REST API in a way that survives losing the network.
//!
//! Caching strategy:
//! 1. Every GET goes to the network first. A successful response is handed to the caller and also written to a
//!    persistent key-value store, serialized as JSON text.
//! 2. If the network fails, the last stored value for the same key is parsed and handed to the caller instead.
//!    Only when there is neither network nor a stored value does the caller see an error.
//! 3. Once per page load, [`OfflineCache::refresh_if_stale`] checks a `lastUpdated` timestamp. If it is missing or
//!    older than a day, every conference and its abstracts, geo data, schedule and info are fetched and stored,
//!    so that pages the user never opened are available offline too.
//!
//! The store is a cache, not a source of truth: concurrent writers race and the last one wins.

pub mod api;
pub mod cache;
pub mod config;
pub mod http;
pub mod model;
pub mod refresh;
pub mod store;

#[cfg(target_arch = "wasm32")]
#[cfg(feature = "local-storage")]
pub mod local_storage;

#[cfg(feature = "opfs")]
pub mod opfs;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::OfflineCache;
pub use config::{IntervalOutOfRange, OfflineConfig};
pub use http::{HttpClient, HttpError, JsonClient};
pub use refresh::{CacheState, RefreshOutcome, RefreshReport};
pub use store::{KeyValueStore, MemoryStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error("{key} is neither reachable nor stored locally ({reason})")]
    Unavailable { key: String, reason: HttpError },

    #[error("local store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    State(#[from] astate::StateError),

    #[error("unexpected payload for {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
}
