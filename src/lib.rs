//! `alby-http` is an async HTTP request helper for the Alby REST API.
//!
//! The crate builds requests against `https://api.getalby.com` and exposes
//! two entry points on [`AlbyClient`]:
//! - [`AlbyClient::request`] — raw [`reqwest::Response`] for callers that
//!   need status or headers directly
//! - [`AlbyClient::fetch_json`] — parsed JSON body, typed by the caller
//!
//! Authentication is pluggable through the [`AuthClient`] capability: given
//! the final URL and method it produces headers (e.g. an OAuth signature or
//! a bearer token) that are merged into the outgoing request. HTTP 429
//! responses are retried against the `x-rate-limit-*` headers up to a
//! per-call budget; every other non-2xx status surfaces as a typed
//! [`AlbyResponseError`].
//!
//! # Example
//!
//! ```no_run
//! use alby_http::{AlbyClient, RequestOptions, StaticTokenAuth};
//! use std::sync::Arc;
//!
//! # async fn run() -> alby_http::Result<()> {
//! let client = AlbyClient::new();
//! let invoices: serde_json::Value = client
//!     .fetch_json(
//!         &RequestOptions::new("/invoices")
//!             .with_auth(Arc::new(StaticTokenAuth::new("my-token")))
//!             .param("items", 25),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod error;
mod options;
mod query;

pub use auth::{AuthClient, StaticTokenAuth};
pub use client::{AlbyClient, BASE_URL};
pub use error::{AlbyError, AlbyResponseError};
pub use options::RequestOptions;
pub use query::build_query_string;

pub type Result<T> = std::result::Result<T, AlbyError>;
