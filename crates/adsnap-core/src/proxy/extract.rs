//! Result URL extraction.
//!
//! Image-editing providers answer in several incompatible shapes. They are
//! classified into [`ResponseShape`] first (priority order, first match wins)
//! and only then reduced to a URL list, so extraction is total over any JSON.

use adsnap_types::NormalizedResult;
use serde_json::Value;

/// Known response layouts, in the order they are checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// `{"result_urls": [...]}`
    ResultUrls(&'a [Value]),
    /// `{"result_url": "..."}`
    ResultUrl(&'a Value),
    /// `{"result": [...]}` with heterogeneous items
    ResultItems(&'a [Value]),
    /// `{"urls": [...]}`
    Urls(&'a [Value]),
    Unknown,
}

impl<'a> ResponseShape<'a> {
    pub fn classify(response: &'a Value) -> Self {
        let Some(obj) = response.as_object() else {
            return Self::Unknown;
        };

        if let Some(list) = obj.get("result_urls").and_then(Value::as_array) {
            return Self::ResultUrls(list);
        }
        if let Some(url) = obj.get("result_url") {
            return Self::ResultUrl(url);
        }
        if let Some(items) = obj.get("result").and_then(Value::as_array) {
            return Self::ResultItems(items);
        }
        if let Some(list) = obj.get("urls").and_then(Value::as_array) {
            return Self::Urls(list);
        }
        Self::Unknown
    }

    pub fn urls(&self) -> Vec<String> {
        match self {
            Self::ResultUrls(list) | Self::Urls(list) => strings(list),
            Self::ResultUrl(url) => url.as_str().map(|s| vec![s.to_string()]).unwrap_or_default(),
            Self::ResultItems(items) => items.iter().filter_map(item_url).collect(),
            Self::Unknown => Vec::new(),
        }
    }
}

/// Extract the ordered result URLs from any provider response.
pub fn extract_urls(response: &Value) -> Vec<String> {
    ResponseShape::classify(response).urls()
}

/// Reduce a raw provider response to the stable result contract.
pub fn normalize(raw: Value) -> NormalizedResult {
    let urls = extract_urls(&raw);
    NormalizedResult::new(urls, raw)
}

fn strings(list: &[Value]) -> Vec<String> {
    list.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
}

fn item_url(item: &Value) -> Option<String> {
    match item {
        Value::Object(obj) => {
            let first_of_urls = obj
                .get("urls")
                .and_then(Value::as_array)
                .and_then(|urls| urls.first());
            if let Some(first) = first_of_urls {
                return first.as_str().map(str::to_string);
            }
            obj.get("url").and_then(Value::as_str).map(str::to_string)
        },
        Value::Array(list) => list.first().and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_urls_returned_verbatim() {
        let resp = json!({"result_urls": ["https://a", "https://b"], "urls": ["https://z"]});
        assert_eq!(extract_urls(&resp), vec!["https://a", "https://b"]);
    }

    #[test]
    fn single_result_url() {
        let resp = json!({"result_url": "https://only", "result": ["https://ignored"]});
        assert_eq!(extract_urls(&resp), vec!["https://only"]);
    }

    #[test]
    fn result_items_of_mixed_shapes() {
        let resp = json!({
            "result": [
                {"urls": ["https://first", "https://second"], "seed": 1},
                {"url": "https://by-url"},
                ["https://nested", "https://nested-2"],
                "https://plain",
                {"urls": [], "url": "https://fallback-url"},
                {"seed": 7},
                42,
                []
            ]
        });
        assert_eq!(
            extract_urls(&resp),
            vec![
                "https://first",
                "https://by-url",
                "https://nested",
                "https://plain",
                "https://fallback-url",
            ]
        );
    }

    #[test]
    fn urls_key_is_last_resort() {
        let resp = json!({"urls": ["https://u1", "https://u2"]});
        assert_eq!(extract_urls(&resp), vec!["https://u1", "https://u2"]);
    }

    #[test]
    fn first_match_wins_even_when_empty() {
        let resp = json!({"result_urls": [], "result_url": "https://unused"});
        assert!(extract_urls(&resp).is_empty());
    }

    #[test]
    fn unknown_shapes_yield_nothing() {
        for resp in [
            json!(null),
            json!("https://not-an-object"),
            json!([1, 2, 3]),
            json!({"result": "not-a-list"}),
            json!({"status": "queued", "request_id": "r-1"}),
        ] {
            assert!(extract_urls(&resp).is_empty(), "expected empty for {resp}");
        }
    }

    #[test]
    fn normalize_sets_primary() {
        let result = normalize(json!({"result": [{"urls": ["https://p"]}]}));
        assert_eq!(result.primary_url(), Some("https://p"));
        assert_eq!(result.raw()["result"][0]["urls"][0], "https://p");
    }
}
