use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{JsonClient, KeyValueStore, OfflineConfig, OfflineError, StoreError};

pub struct OfflineCache<S, C> {
    pub(crate) store: S,
    pub(crate) client: C,
    pub(crate) config: OfflineConfig,
}

impl<S: KeyValueStore, C: JsonClient> OfflineCache<S, C> {
    pub fn new(store: S, client: C, config: OfflineConfig) -> Self {
        Self {
            store,
            client,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }

    /// GET `url`, falling back to the value last stored under `key`.
    ///
    /// A successful response is written back under `key` before it is returned, so the fallback is never older
    /// than the last successful read. Failing to write is logged and otherwise ignored.
    pub async fn request_json(&self, key: &str, url: &str) -> Result<Value, OfflineError> {
        let reason = match self.client.get_json(url).await {
            Ok(payload) => {
                if let Err(e) = self.store_json(key, &payload).await {
                    log::warn!("Could not store {key} locally: {e}");
                }
                return Ok(payload);
            }
            Err(reason) => reason,
        };

        log::info!("Request for {url} failed ({reason}), looking for a local copy of {key}");

        match self.stored_json(key).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(OfflineError::Unavailable {
                key: key.to_string(),
                reason,
            }),
            Err(e) => {
                log::error!("Error reading {key} from the local store: {e}");
                Err(OfflineError::Unavailable {
                    key: key.to_string(),
                    reason,
                })
            }
        }
    }

    /// Typed version of [`Self::request_json`].
    pub async fn request<T: DeserializeOwned>(&self, key: &str, url: &str) -> Result<T, OfflineError> {
        let payload = self.request_json(key, url).await?;
        serde_json::from_value(payload).map_err(|source| OfflineError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// The parsed value stored under `key`. Text that is not valid JSON counts as missing.
    pub async fn stored_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let Some(stored) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&stored) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Ignoring stored value for {key}, it is not valid JSON: {e}");
                Ok(None)
            }
        }
    }

    pub(crate) async fn store_json(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.store.set(key, &value.to_string()).await
    }
}
