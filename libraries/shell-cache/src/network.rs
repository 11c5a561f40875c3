use crate::{CachedResponse, FetchRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fetching {url} failed: {message}")]
pub struct NetworkError {
    pub url: String,
    pub message: String,
}

/// The worker's `fetch`. An HTTP error status is still a response; only a failed connection is an error.
#[allow(async_fn_in_trait)]
pub trait Network {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, NetworkError>;
}

impl<N: Network> Network for &N {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, NetworkError> {
        (**self).fetch(request).await
    }
}
