//! Request fingerprints used to detect duplicate in-flight calls
//!
//! A fingerprint is built as
//! `<method>^<url>&<key>=<value>...#<key>=<value>...`: the lowercase method,
//! the URL as given by the caller, every query parameter in insertion order
//! and, for JSON object bodies, every top-level key in sorted order.
//!
//! Values are rendered with their JSON representation, so `1` and `"1"` do
//! not collide.

use std::fmt;
use std::fmt::Write as _;

use reqwest::Method;
use serde_json::Value;

use crate::request::{ApiRequest, RequestBody};

/// De-duplication key of a logical request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already computed key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fingerprint of a request about to be dispatched
pub fn of_request(request: &ApiRequest) -> Fingerprint {
    fingerprint(
        request.method(),
        request.url(),
        request.query(),
        request.request_body(),
    )
}

/// Derive the fingerprint for `method`, `url`, `params` and `body`
pub fn fingerprint(
    method: &Method,
    url: &str,
    params: &[(String, String)],
    body: Option<&RequestBody>,
) -> Fingerprint {
    let mut key = method.as_str().to_lowercase();

    if !url.is_empty() {
        key.push('^');
        key.push_str(url);
    }

    for (name, value) in params {
        let _ = write!(key, "&{name}={value}");
    }

    if let Some(body) = body {
        append_body(&mut key, body);
    }

    Fingerprint(key)
}

fn append_body(key: &mut String, body: &RequestBody) {
    match body {
        RequestBody::Json(value) => append_json(key, value),
        RequestBody::Text { content, .. } if body.is_declared_json() => {
            if let Some(value) = parse_body(content) {
                append_json(key, &value);
            }
        }
        RequestBody::Text { content, .. } => {
            if content.starts_with('{') && content.ends_with('}') {
                if let Some(value @ Value::Object(_)) = parse_body(content) {
                    append_json(key, &value);
                }
            }
        }
        RequestBody::Form(_) => {}
    }
}

fn append_json(key: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            for (name, value) in entries {
                let _ = write!(key, "#{name}={value}");
            }
        }
        other => {
            let _ = write!(key, "#{other}");
        }
    }
}

fn parse_body(content: &str) -> Option<Value> {
    match serde_json::from_str(content) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Ignoring unparsable request body in fingerprint: {}", err);
            None
        }
    }
}
