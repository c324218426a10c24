use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::error::AlbyResponseError;
use crate::query::build_query_string;
use crate::{AlbyError, RequestOptions, Result};

/// Default base address of the Alby REST API.
pub const BASE_URL: &str = "https://api.getalby.com";

/// Default per-attempt timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(120_000);

/// Fixed retry delay when the rate limit still has allowance left.
const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_millis(1000);

const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-rate-limit-remaining";

/// HTTP client for the Alby REST API.
///
/// Wraps one shared `reqwest::Client`; cloning shares the connection pool.
/// No state is retained between calls.
#[derive(Clone, Debug, Default)]
pub struct AlbyClient {
    http: reqwest::Client,
}

impl AlbyClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client on top of a caller-configured `reqwest::Client`,
    /// e.g. with a proxy or custom TLS setup.
    pub fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Performs a request and returns the raw response.
    ///
    /// Returns [`AlbyError::Api`] when the final status is outside 200–299.
    /// HTTP 429 is retried up to `options.max_retries` times, waiting on the
    /// server's `x-rate-limit-*` headers between attempts; every retry
    /// reissues the identical request.
    pub async fn request(&self, options: &RequestOptions) -> Result<Response> {
        let url = build_url(options);
        let is_post = options.method == Method::POST && options.request_body.is_some();

        let mut headers = HeaderMap::new();
        if is_post {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
        }
        if let Some(auth) = &options.auth {
            let auth_headers = auth.get_auth_header(&url, &options.method).await?;
            for (name, value) in auth_headers {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|err| AlbyError::Header(format!("{name}: {err}")))?;
                let value = HeaderValue::from_str(&value)
                    .map_err(|err| AlbyError::Header(format!("{name}: {err}")))?;
                headers.insert(name, value);
            }
        }
        // Caller headers win on collision.
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let body = if is_post {
            // Keep the bytes for identical reissue on retry.
            options
                .request_body
                .as_ref()
                .map(|body| serde_json::to_vec(body).unwrap_or_default())
        } else {
            None
        };

        let timeout = options.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let mut remaining_retries = options.max_retries;

        loop {
            let mut request = self
                .http
                .request(options.method.clone(), &url)
                .headers(headers.clone())
                .timeout(timeout);
            if let Some(bytes) = &body {
                request = request.body(bytes.clone());
            }

            let response = request.send().await.map_err(AlbyError::Transport)?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS && remaining_retries > 0 {
                let delay = rate_limit_delay(response.headers(), unix_millis_now());

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    remaining_retries,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, retrying {url}"
                );

                sleep(delay).await;
                remaining_retries -= 1;
                continue;
            }

            if response.status().is_success() {
                return Ok(response);
            }
            return Err(AlbyError::Api(
                AlbyResponseError::from_response(response).await,
            ));
        }
    }

    /// Performs a request and parses the response body as JSON.
    ///
    /// The shape `T` is a caller-asserted contract; nothing beyond serde
    /// deserialization is validated.
    pub async fn fetch_json<T: DeserializeOwned>(&self, options: &RequestOptions) -> Result<T> {
        let response = self.request(options).await?;
        let body = response.text().await.map_err(AlbyError::Transport)?;
        serde_json::from_str::<T>(&body)
            .map_err(|err| AlbyError::Decode(format!("invalid JSON response: {err}; body: {body}")))
    }
}

fn build_url(options: &RequestOptions) -> String {
    let base = options.base_url.as_deref().unwrap_or(BASE_URL);
    let mut url = format!("{}{}", base.trim_end_matches('/'), options.endpoint);
    let query = build_query_string(&options.params);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Computes how long to wait before reissuing a 429'd request.
///
/// When `x-rate-limit-remaining` is exactly 0, waits until the reset moment
/// from `x-rate-limit-reset` (unix seconds), clamped to zero when that
/// moment already passed. Anything else — allowance left, or missing or
/// unparseable headers — waits the fixed 1000 ms.
fn rate_limit_delay(headers: &HeaderMap, now_ms: u64) -> Duration {
    let remaining = parse_header::<u64>(headers, RATE_LIMIT_REMAINING_HEADER);
    let reset = parse_header::<u64>(headers, RATE_LIMIT_RESET_HEADER);

    match (remaining, reset) {
        (Some(0), Some(reset_secs)) => {
            Duration::from_millis(reset_secs.saturating_mul(1000).saturating_sub(now_ms))
        }
        _ => RATE_LIMIT_RETRY_DELAY,
    }
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
