use astate::{AbstractState, Openness, Role, StateChange, StateLogEntry};
use offline::{
    HttpClient, KeyValueStore, OfflineCache, StoreError, local_storage::LocalStorageStore,
    opfs::OpfsStore,
};
use wasm_bindgen::prelude::*;

use crate::{FrontendConfig, FrontendError, StorageBackend};

/// The store picked at startup. wasm-bindgen types can't be generic, so the choice is made here.
enum BrowserStore {
    LocalStorage(LocalStorageStore),
    Opfs(OpfsStore),
}

impl KeyValueStore for BrowserStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            BrowserStore::LocalStorage(store) => store.get(key).await,
            BrowserStore::Opfs(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::LocalStorage(store) => store.set(key, value).await,
            BrowserStore::Opfs(store) => store.set(key, value).await,
        }
    }
}

#[wasm_bindgen]
pub struct Offline {
    cache: OfflineCache<BrowserStore, HttpClient>,
}

#[wasm_bindgen]
impl Offline {
    /// `config` is an optional JSON object, see [`FrontendConfig`].
    #[wasm_bindgen(constructor)]
    pub async fn new(config: Option<String>) -> Result<Offline, FrontendError> {
        crate::init_logging();

        let mut config = FrontendConfig::from_json(config.as_deref())?;
        let store = match config.storage {
            StorageBackend::LocalStorage => BrowserStore::LocalStorage(
                LocalStorageStore::new().map_err(|e| FrontendError::Storage(e.to_string()))?,
            ),
            StorageBackend::Opfs => BrowserStore::Opfs(
                OpfsStore::new(config.opfs_directory())
                    .await
                    .map_err(|e| FrontendError::Storage(format!("{e:?}")))?,
            ),
        };
        // reqwest only takes absolute URLs in the browser
        if config.offline.api_base.is_none() {
            config.offline.api_base = web_sys::window().and_then(|window| window.location().origin().ok());
        }
        let client = HttpClient::new(config.offline.api_base.clone())
            .map_err(|e| FrontendError::Config(e.to_string()))?;

        Ok(Offline {
            cache: OfflineCache::new(store, client, config.offline),
        })
    }

    /// Network first, stored copy as fallback.
    #[wasm_bindgen(js_name = requestJson)]
    pub async fn request_json(&self, key: String, url: String) -> Result<JsValue, FrontendError> {
        let value = self.cache.request_json(&key, &url).await?;
        to_js(&value)
    }

    #[wasm_bindgen(js_name = refreshIfStale)]
    pub async fn refresh_if_stale(&self) -> Result<JsValue, FrontendError> {
        let outcome = self.cache.refresh_if_stale().await?;
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = stateLog)]
    pub async fn state_log(&self, abstract_id: String) -> Result<Vec<StateLogEntry>, FrontendError> {
        let now = chrono::Local::now();
        Ok(self.cache.state_log(&abstract_id, &now).await?)
    }

    #[wasm_bindgen(js_name = changeState)]
    pub async fn change_state(
        &self,
        abstract_id: String,
        role: Role,
        is_open: bool,
        from: AbstractState,
        to: AbstractState,
        note: Option<String>,
    ) -> Result<Vec<StateLogEntry>, FrontendError> {
        let change = StateChange::new(to, note)?;
        let now = chrono::Local::now();
        Ok(self
            .cache
            .change_state(
                &abstract_id,
                role,
                Openness::from_is_open(is_open),
                from,
                &change,
                &now,
            )
            .await?)
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, FrontendError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| FrontendError::Js(e.to_string()))
}
