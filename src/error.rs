use std::collections::HashMap;

use serde_json::{Map, Value};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum AlbyError {
    /// Network or request execution error from `reqwest`, surfaced before
    /// any response was received. The inner error is carried unmodified.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status from the Alby API.
    #[error("{0}")]
    Api(AlbyResponseError),
    /// An authenticator or caller supplied a header name or value that is
    /// not valid HTTP.
    #[error("invalid header: {0}")]
    Header(String),
    /// A 2xx response body that could not be parsed as the requested JSON
    /// shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Structured error for any API response with a status outside 200–299.
#[derive(Debug, Clone)]
pub struct AlbyResponseError {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, empty when the status has none.
    pub status_text: String,
    /// All response headers, names lower-cased, values decoded lossily.
    pub headers: HashMap<String, String>,
    /// Parsed JSON error body. Empty when the body is absent, not valid
    /// JSON, or not a JSON object.
    pub error: Map<String, Value>,
}

impl AlbyResponseError {
    /// Consumes a non-success response into its structured form.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_ascii_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<Map<String, Value>>(&body).unwrap_or_default();

        Self {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            headers,
            error,
        }
    }
}

impl std::fmt::Display for AlbyResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "alby api error {}", self.status)?;
        if !self.status_text.is_empty() {
            write!(f, " {}", self.status_text)?;
        }
        if !self.error.is_empty() {
            write!(f, ": {}", Value::Object(self.error.clone()))?;
        }
        Ok(())
    }
}

impl std::error::Error for AlbyResponseError {}
