//! The service worker side of offline support: a versioned cache of the application shell.
//!
//! Lifecycle:
//! 1. **install**: the resource manifest is the static list of views and assets, followed by routes discovered
//!    from the API (one set of views per conference, one view per abstract). Every entry is fetched and the lot is
//!    written to a cache bucket named after the version string. If a single entry fails, nothing is written and
//!    the install fails; the browser will retry on its own schedule. If writing fails halfway, the bucket is
//!    deleted again, so a version is either cached completely or not at all.
//! 2. **activate**: buckets named after any other version are deleted.
//! 3. **fetch**: anything but GET goes straight to the network. For GET, a request to `/` probes the connection.
//!    Online, requests go to the network and responses are backfilled into the bucket if it doesn't have them
//!    yet. Offline, requests are answered from the bucket, and anything missing is answered with the cached
//!    `/conferences` page.
//!
//! Network and cache storage are traits, so the policy is testable without a browser. The browser bindings live
//! in [`web`].

pub mod config;
pub mod controller;
pub mod discovery;
pub mod network;
pub mod response;
pub mod storage;

#[cfg(target_arch = "wasm32")]
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ShellConfig;
pub use controller::{InstallReport, ShellCache};
pub use discovery::{CONFERENCE_VIEWS, abstract_route, conference_routes, discover_dynamic_routes};
pub use network::{Network, NetworkError};
pub use response::{CachedResponse, FetchRequest};
pub use storage::{CacheError, CacheStorage, MemoryCacheStorage};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("could not discover dynamic routes from {url}: {message}")]
    Discovery { url: String, message: String },

    #[error("install failed, {url} could not be cached: {reason}")]
    InstallFailed { url: String, reason: String },

    #[error("{url} is not cached and there is no fallback page")]
    NotCached { url: String },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}
