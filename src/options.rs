use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::AuthClient;

/// Per-call request configuration.
///
/// Built once per call and treated as immutable: the same options drive the
/// initial attempt and every retry.
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Optional authenticator capability.
    pub auth: Option<Arc<dyn AuthClient>>,
    /// API path, e.g. `/invoices`.
    pub endpoint: String,
    /// Query parameters. `Null` values mean "absent" and are omitted.
    pub params: Map<String, Value>,
    /// JSON body, sent only on POST.
    pub request_body: Option<Value>,
    /// HTTP method, GET by default.
    pub method: Method,
    /// Retry budget for HTTP 429 responses, after the initial attempt.
    pub max_retries: usize,
    /// Per-call override of [`crate::BASE_URL`].
    pub base_url: Option<String>,
    /// Caller-supplied headers, highest precedence on merge.
    pub headers: HeaderMap,
    /// Per-call override of the 120 s request timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthClient>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds one query parameter. Arrays produce repeated `key=value` pairs.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces the whole query parameter map.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Sets the JSON request body. Only sent when the method is POST.
    pub fn with_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replaces the caller header set. These win over authenticator headers
    /// on name collisions.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("auth", &self.auth.as_ref().map(|_| "<auth client>"))
            .field("endpoint", &self.endpoint)
            .field("params", &self.params)
            .field("request_body", &self.request_body)
            .field("method", &self.method)
            .field("max_retries", &self.max_retries)
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_get_with_no_retries() {
        let options = RequestOptions::new("/invoices");
        assert_eq!(options.method, Method::GET);
        assert_eq!(options.max_retries, 0);
        assert!(options.auth.is_none());
        assert!(options.base_url.is_none());
        assert!(options.request_body.is_none());
        assert!(options.params.is_empty());
    }

    #[test]
    fn param_builder_accumulates() {
        let options = RequestOptions::new("/invoices")
            .param("items", 25)
            .param("tag", json!(["a", "b"]));
        assert_eq!(options.params.len(), 2);
        assert_eq!(options.params["items"], json!(25));
    }
}
