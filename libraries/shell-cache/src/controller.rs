use futures::future::join_all;
use indexmap::IndexSet;

use crate::{
    CacheStorage, CachedResponse, FetchRequest, Network, NetworkError, ShellConfig, ShellError,
    discover_dynamic_routes,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct InstallReport {
    pub version: String,
    pub resources: usize,
}

pub struct ShellCache<N, C> {
    network: N,
    caches: C,
    config: ShellConfig,
}

impl<N: Network, C: CacheStorage> ShellCache<N, C> {
    pub fn new(network: N, caches: C, config: ShellConfig) -> Self {
        Self {
            network,
            caches,
            config,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    /// Static resources followed by the discovered routes, first occurrence wins.
    pub async fn manifest(&self) -> Result<IndexSet<String>, ShellError> {
        let dynamic = discover_dynamic_routes(&self.network, &self.config.conferences_url).await?;
        Ok(self
            .config
            .static_resources
            .iter()
            .cloned()
            .chain(dynamic)
            .collect())
    }

    pub async fn install(&self) -> Result<InstallReport, ShellError> {
        let manifest = self.manifest().await?;
        log::info!(
            "Installing shell {} with {} resources",
            self.config.version,
            manifest.len()
        );

        let fetched = join_all(manifest.iter().map(|url| async move {
            let response = self
                .network
                .fetch(&FetchRequest::get(url.as_str()))
                .await
                .map_err(|e| ShellError::InstallFailed {
                    url: url.clone(),
                    reason: e.message,
                })?;
            if !response.ok() {
                return Err(ShellError::InstallFailed {
                    url: url.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok((url.clone(), response))
        }))
        .await;
        let entries = fetched
            .into_iter()
            .collect::<Result<Vec<(String, CachedResponse)>, ShellError>>()
            .inspect_err(|e| log::error!("{e}"))?;

        if let Err(e) = self.caches.put_all(&self.config.version, &entries).await {
            log::error!("Writing shell {} failed, discarding it: {e}", self.config.version);
            if let Err(delete_error) = self.caches.delete(&self.config.version).await {
                log::error!("Could not discard shell {}: {delete_error}", self.config.version);
            }
            return Err(e.into());
        }
        Ok(InstallReport {
            version: self.config.version.clone(),
            resources: entries.len(),
        })
    }

    /// Deletes every bucket left over from another version. Returns the deleted names.
    pub async fn activate(&self) -> Result<Vec<String>, ShellError> {
        let mut evicted = Vec::new();
        for bucket in self.caches.buckets().await? {
            if bucket != self.config.version && self.caches.delete(&bucket).await? {
                log::info!("Evicted stale shell cache {bucket}");
                evicted.push(bucket);
            }
        }
        Ok(evicted)
    }

    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<CachedResponse, ShellError> {
        self.respond(request, self.network.fetch(request)).await
    }

    /// Like [`Self::handle_fetch`], with `live` as the network answer for `request`. `live` is only awaited when
    /// the network is used, so it can wrap the page's own request with its headers and body.
    ///
    /// Anything but GET goes straight to the network and is never cached.
    pub async fn respond(
        &self,
        request: &FetchRequest,
        live: impl Future<Output = Result<CachedResponse, NetworkError>>,
    ) -> Result<CachedResponse, ShellError> {
        if !request.is_get() {
            return Ok(live.await?);
        }

        if self.can_connect().await {
            match live.await {
                Ok(response) => {
                    self.backfill(request, &response).await;
                    return Ok(response);
                }
                Err(e) => log::warn!("{e}, answering from cache"),
            }
        }
        self.serve_from_cache(request).await
    }

    pub async fn can_connect(&self) -> bool {
        self.network
            .fetch(&FetchRequest::get(self.config.probe_url.as_str()))
            .await
            .is_ok()
    }

    /// Adds a live response to the bucket unless it already has one for that URL.
    async fn backfill(&self, request: &FetchRequest, response: &CachedResponse) {
        if !response.ok() {
            return;
        }
        let version = &self.config.version;
        match self.caches.match_url(version, &request.url).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                if let Err(e) = self.caches.put(version, &request.url, response).await {
                    log::warn!("Could not backfill {}: {e}", request.url);
                }
            }
            Err(e) => log::warn!("Could not look up {}: {e}", request.url),
        }
    }

    pub async fn serve_from_cache(&self, request: &FetchRequest) -> Result<CachedResponse, ShellError> {
        let version = &self.config.version;
        let cached = match self.caches.match_url(version, &request.url).await? {
            Some(response) => Some(response),
            None => {
                self.caches
                    .match_url(version, &self.config.fallback_url)
                    .await?
            }
        };
        match cached {
            Some(response) if response.redirected => Ok(response.unredirect()),
            Some(response) => Ok(response),
            None => Err(ShellError::NotCached {
                url: request.url.clone(),
            }),
        }
    }
}
