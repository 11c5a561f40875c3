//! Browser bindings: the worker's `fetch` and its `caches`.
//!
//! A response written to the Cache API loses its `redirected` flag, so it is carried in a header that never leaves
//! this module.

use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, ResponseInit, WorkerGlobalScope};

use crate::{CacheError, CacheStorage, CachedResponse, FetchRequest, Network, NetworkError};

const REDIRECTED_HEADER: &str = "x-gca-redirected";

fn describe(error: JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

fn worker_scope() -> Result<WorkerGlobalScope, String> {
    js_sys::global()
        .dyn_into::<WorkerGlobalScope>()
        .map_err(|_| "not running in a worker".to_string())
}

pub async fn read_response(response: &Response) -> Result<CachedResponse, JsValue> {
    let body = JsFuture::from(response.array_buffer()?).await?;
    let body = Uint8Array::new(&body).to_vec();

    let mut headers = Vec::new();
    let mut redirected = response.redirected();
    if let Some(entries) = js_sys::try_iter(&response.headers())? {
        for entry in entries {
            let entry: Array = entry?.dyn_into()?;
            let name = entry.get(0).as_string().unwrap_or_default();
            let value = entry.get(1).as_string().unwrap_or_default();
            if name.eq_ignore_ascii_case(REDIRECTED_HEADER) {
                redirected = true;
            } else {
                headers.push((name, value));
            }
        }
    }

    Ok(CachedResponse {
        url: response.url(),
        status: response.status(),
        status_text: response.status_text(),
        headers,
        body,
        redirected,
    })
}

fn build_response(cached: &CachedResponse, mark_redirect: bool) -> Result<Response, JsValue> {
    let headers = Headers::new()?;
    for (name, value) in &cached.headers {
        headers.append(name, value)?;
    }
    if mark_redirect && cached.redirected {
        headers.append(REDIRECTED_HEADER, "1")?;
    }

    let init = ResponseInit::new();
    init.set_status(cached.status);
    init.set_status_text(&cached.status_text);
    init.set_headers(&headers);

    // null body statuses refuse a body, even an empty one
    if cached.body.is_empty() {
        return Response::new_with_opt_buffer_source_and_init(None, &init);
    }
    let body = Uint8Array::from(cached.body.as_slice());
    Response::new_with_opt_buffer_source_and_init(Some(body.as_ref()), &init)
}

/// What the page receives. Never carries the redirect marker.
pub fn to_response(cached: &CachedResponse) -> Result<Response, JsValue> {
    build_response(cached, false)
}

pub fn to_fetch_request(request: &Request) -> FetchRequest {
    FetchRequest {
        url: request.url(),
        method: request.method(),
    }
}

/// `fetch` from the worker global scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkerNetwork;

impl WorkerNetwork {
    /// Sends a clone of the page's own request, with its headers, body, mode and credentials.
    pub async fn fetch_page_request(&self, request: &Request) -> Result<CachedResponse, NetworkError> {
        let error = |message: String| NetworkError {
            url: request.url(),
            message,
        };

        let scope = worker_scope().map_err(error)?;
        let request = request.clone().map_err(|e| error(describe(e)))?;
        let response = JsFuture::from(scope.fetch_with_request(&request))
            .await
            .map_err(|e| error(describe(e)))?;
        let response: Response = response.dyn_into().map_err(|e| error(describe(e)))?;
        read_response(&response)
            .await
            .map_err(|e| error(describe(e)))
    }
}

impl Network for WorkerNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, NetworkError> {
        let error = |message: String| NetworkError {
            url: request.url.clone(),
            message,
        };

        let scope = worker_scope().map_err(error)?;
        let init = RequestInit::new();
        init.set_method(&request.method);
        let js_request =
            Request::new_with_str_and_init(&request.url, &init).map_err(|e| error(describe(e)))?;

        let response = JsFuture::from(scope.fetch_with_request(&js_request))
            .await
            .map_err(|e| error(describe(e)))?;
        let response: Response = response.dyn_into().map_err(|e| error(describe(e)))?;
        read_response(&response)
            .await
            .map_err(|e| error(describe(e)))
    }
}

/// The worker's `caches`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebCacheStorage;

impl WebCacheStorage {
    fn storage(&self) -> Result<web_sys::CacheStorage, CacheError> {
        worker_scope()
            .map_err(CacheError)?
            .caches()
            .map_err(|e| CacheError(describe(e)))
    }

    async fn open(&self, bucket: &str) -> Result<web_sys::Cache, CacheError> {
        let cache = JsFuture::from(self.storage()?.open(bucket))
            .await
            .map_err(|e| CacheError(describe(e)))?;
        cache.dyn_into().map_err(|e| CacheError(describe(e)))
    }
}

impl CacheStorage for WebCacheStorage {
    async fn match_url(&self, bucket: &str, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        let cache = self.open(bucket).await?;
        let found = JsFuture::from(cache.match_with_str(url))
            .await
            .map_err(|e| CacheError(describe(e)))?;
        if found.is_undefined() || found.is_null() {
            return Ok(None);
        }
        let response: Response = found.dyn_into().map_err(|e| CacheError(describe(e)))?;
        let mut cached = read_response(&response)
            .await
            .map_err(|e| CacheError(describe(e)))?;
        if cached.url.is_empty() {
            cached.url = url.to_string();
        }
        Ok(Some(cached))
    }

    async fn put(&self, bucket: &str, url: &str, response: &CachedResponse) -> Result<(), CacheError> {
        let cache = self.open(bucket).await?;
        let js_response = build_response(response, true).map_err(|e| CacheError(describe(e)))?;
        JsFuture::from(cache.put_with_str(url, &js_response))
            .await
            .map_err(|e| CacheError(describe(e)))?;
        Ok(())
    }

    async fn buckets(&self) -> Result<Vec<String>, CacheError> {
        let keys = JsFuture::from(self.storage()?.keys())
            .await
            .map_err(|e| CacheError(describe(e)))?;
        let keys: Array = keys.dyn_into().map_err(|e| CacheError(describe(e)))?;
        Ok(keys.iter().filter_map(|key| key.as_string()).collect())
    }

    async fn delete(&self, bucket: &str) -> Result<bool, CacheError> {
        let deleted = JsFuture::from(self.storage()?.delete(bucket))
            .await
            .map_err(|e| CacheError(describe(e)))?;
        Ok(deleted.as_bool().unwrap_or(false))
    }
}
