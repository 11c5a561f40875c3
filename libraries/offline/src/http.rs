use reqwest::Url;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode the response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("{url} is not a usable URL: {message}")]
    InvalidUrl { url: String, message: String },
}

/// The part of the REST API this crate talks to. Non-2xx answers are errors.
#[allow(async_fn_in_trait)]
pub trait JsonClient {
    async fn get_json(&self, url: &str) -> Result<Value, HttpError>;

    async fn put_json(&self, url: &str, body: &Value) -> Result<Value, HttpError>;
}

impl<C: JsonClient> JsonClient for &C {
    async fn get_json(&self, url: &str) -> Result<Value, HttpError> {
        (**self).get_json(url).await
    }

    async fn put_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
        (**self).put_json(url, body).await
    }
}

/// `reqwest` based client. On wasm this goes through the browser's `fetch`.
///
/// Links handed out by the API (`conference.abstracts` etc.) are absolute paths, so relative URLs are resolved
/// against `base_url` the way a browser resolves links.
#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpClient {
    pub fn new(base_url: Option<String>) -> Result<Self, HttpError> {
        let base_url = base_url
            .map(|base| {
                // without the slash, relative links would replace the last path segment
                let base = format!("{}/", base.trim_end_matches('/'));
                Url::parse(&base).map_err(|e| HttpError::InvalidUrl {
                    url: base,
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn resolve(&self, url: &str) -> Result<String, HttpError> {
        let Some(base) = &self.base_url else {
            return Ok(url.to_string());
        };
        base.join(url)
            .map(String::from)
            .map_err(|e| HttpError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn send(&self, url: String, request: reqwest::RequestBuilder) -> Result<Value, HttpError> {
        let response = request.send().await.map_err(|e| HttpError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| HttpError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl JsonClient for HttpClient {
    async fn get_json(&self, url: &str) -> Result<Value, HttpError> {
        let url = self.resolve(url)?;
        let request = self.client.get(&url);
        self.send(url, request).await
    }

    async fn put_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
        let url = self.resolve(url)?;
        let request = self.client.put(&url).json(body);
        self.send(url, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_links() {
        let client = HttpClient::new(Some("https://abstracts.example.org/".to_string())).unwrap();
        assert_eq!(
            client.resolve("/api/conferences").unwrap(),
            "https://abstracts.example.org/api/conferences"
        );
        assert_eq!(
            client.resolve("api/conferences").unwrap(),
            "https://abstracts.example.org/api/conferences"
        );
        assert_eq!(
            client.resolve("https://cdn.example.org/x.json").unwrap(),
            "https://cdn.example.org/x.json"
        );
    }

    #[test]
    fn test_resolve_scheme_relative_link() {
        let client = HttpClient::new(Some("https://abstracts.example.org".to_string())).unwrap();
        assert_eq!(
            client.resolve("//cdn.example.org/x.json").unwrap(),
            "https://cdn.example.org/x.json"
        );
        assert_eq!(
            client.resolve("HTTPS://cdn.example.org/y.json").unwrap(),
            "https://cdn.example.org/y.json"
        );
    }

    #[test]
    fn test_base_path_is_kept_for_relative_links() {
        let client = HttpClient::new(Some("https://example.org/gca".to_string())).unwrap();
        assert_eq!(
            client.resolve("api/conferences").unwrap(),
            "https://example.org/gca/api/conferences"
        );
        assert_eq!(client.resolve("/api/conferences").unwrap(), "https://example.org/api/conferences");
    }

    #[test]
    fn test_resolve_without_base() {
        let client = HttpClient::new(None).unwrap();
        assert_eq!(client.resolve("/api/conferences").unwrap(), "/api/conferences");
    }

    #[test]
    fn test_unusable_base() {
        assert!(matches!(
            HttpClient::new(Some("abstracts.example.org".to_string())),
            Err(HttpError::InvalidUrl { .. })
        ));
    }
}
