//! Normalized provider result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The one stable shape every provider response is reduced to.
///
/// `result_url` is always the first entry of `urls`, so it is never set
/// while `urls` is empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedResult {
    urls: Vec<String>,
    result_url: Option<String>,
    raw: Value,
}

impl NormalizedResult {
    pub fn new(urls: Vec<String>, raw: Value) -> Self {
        let result_url = urls.first().cloned();
        Self { urls, result_url, raw }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn primary_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
