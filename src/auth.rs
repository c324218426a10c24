use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;

use crate::Result;

/// Capability producing authentication headers for an outgoing request.
///
/// The client invokes this once per call with the fully-resolved URL
/// (including query string) and the HTTP method, before the first attempt.
/// Retries reissue the identical request without calling it again.
///
/// Implementations may suspend — OAuth token refresh or NWC-style request
/// signing are expected to do network or cryptographic work here.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Returns headers to merge into the request, e.g.
    /// `{"Authorization": "Bearer <token>"}`.
    async fn get_auth_header(&self, url: &str, method: &Method)
        -> Result<HashMap<String, String>>;
}

/// Bearer-token authenticator for static access tokens.
///
/// The `Bearer ` prefix is added when missing; an existing prefix is kept
/// as-is regardless of case.
#[derive(Clone)]
pub struct StaticTokenAuth {
    authorization: String,
}

impl StaticTokenAuth {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self {
            authorization: normalize_bearer_authorization(token.as_ref()),
        }
    }
}

impl std::fmt::Debug for StaticTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenAuth")
            .field("authorization", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AuthClient for StaticTokenAuth {
    async fn get_auth_header(
        &self,
        _url: &str,
        _method: &Method,
    ) -> Result<HashMap<String, String>> {
        Ok(HashMap::from([(
            "Authorization".to_owned(),
            self.authorization.clone(),
        )]))
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
