use shell_cache::{
    ShellCache,
    web::{WebCacheStorage, WorkerNetwork, to_fetch_request, to_response},
};
use wasm_bindgen::prelude::*;

use crate::{FrontendConfig, FrontendError};

/// Drives the shell cache from the service worker script:
///
/// ```js
/// const worker = new ServiceWorker(config);
/// self.addEventListener("install", (e) => e.waitUntil(worker.install()));
/// self.addEventListener("activate", (e) => e.waitUntil(worker.activate()));
/// self.addEventListener("fetch", (e) => e.respondWith(worker.handleFetch(e.request)));
/// ```
#[wasm_bindgen]
pub struct ServiceWorker {
    shell: ShellCache<WorkerNetwork, WebCacheStorage>,
}

#[wasm_bindgen]
impl ServiceWorker {
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<ServiceWorker, FrontendError> {
        crate::init_logging();

        let config = FrontendConfig::from_json(config.as_deref())?;
        Ok(ServiceWorker {
            shell: ShellCache::new(WorkerNetwork, WebCacheStorage, config.shell),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> String {
        self.shell.config().version.clone()
    }

    /// Resolves to `{version, resources}`. Rejects if any resource could not be cached.
    pub async fn install(&self) -> Result<JsValue, FrontendError> {
        let report = self.shell.install().await?;
        log::info!("Cached {} resources in {}", report.resources, report.version);
        serde_wasm_bindgen::to_value(&report).map_err(|e| FrontendError::Js(e.to_string()))
    }

    /// Resolves to the names of the evicted caches.
    pub async fn activate(&self) -> Result<Vec<String>, FrontendError> {
        Ok(self.shell.activate().await?)
    }

    #[wasm_bindgen(js_name = handleFetch)]
    pub async fn handle_fetch(&self, request: web_sys::Request) -> Result<web_sys::Response, JsValue> {
        let live = WorkerNetwork.fetch_page_request(&request);
        let response = self
            .shell
            .respond(&to_fetch_request(&request), live)
            .await
            .map_err(FrontendError::from)?;
        to_response(&response)
    }
}
