use std::{cell::RefCell, collections::HashMap};

use serde_json::Value;

use crate::{HttpError, JsonClient};

/// Scripted API. Unknown URLs fail like a dropped connection.
#[derive(Default)]
pub(crate) struct FakeClient {
    responses: RefCell<HashMap<String, Result<Value, HttpError>>>,
    calls: RefCell<Vec<String>>,
    puts: RefCell<Vec<(String, Value)>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, payload: Value) -> &Self {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), Ok(payload));
        self
    }

    pub fn fail(&self, url: &str, status: u16) -> &Self {
        self.responses.borrow_mut().insert(
            url.to_string(),
            Err(HttpError::Status {
                url: url.to_string(),
                status,
            }),
        );
        self
    }

    /// Every URL requested so far, GETs and PUTs alike.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn puts(&self) -> Vec<(String, Value)> {
        self.puts.borrow().clone()
    }

    fn answer(&self, url: &str) -> Result<Value, HttpError> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses
            .borrow()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(HttpError::Network {
                    url: url.to_string(),
                    message: "offline".to_string(),
                })
            })
    }
}

impl JsonClient for FakeClient {
    async fn get_json(&self, url: &str) -> Result<Value, HttpError> {
        self.answer(url)
    }

    async fn put_json(&self, url: &str, body: &Value) -> Result<Value, HttpError> {
        self.puts
            .borrow_mut()
            .push((url.to_string(), body.clone()));
        self.answer(url)
    }
}
