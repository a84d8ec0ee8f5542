//! Thin HTTP plumbing shared by every store operation.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// Client-level request timeout. The original relied on transport defaults;
/// a dashboard hanging forever on a dead backend is worse than a visible
/// timeout error.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url: String = base_url.into();
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::BaseUrlMissing);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .build()?;
        Ok(Self {
            base_url: trimmed.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get_json<T>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        debug!(path, authenticated = token.is_some(), "GET");
        let mut request = self.http.get(self.endpoint(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        decode_response(request.send().await?).await
    }

    pub async fn post_json<Req, Res>(
        &self,
        path: &str,
        token: Option<&str>,
        payload: &Req,
    ) -> Result<Res, ApiError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        debug!(path, authenticated = token.is_some(), "POST");
        let mut request = self.http.post(self.endpoint(path)).json(payload);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        decode_response(request.send().await?).await
    }

    pub async fn put_json<Req, Res>(
        &self,
        path: &str,
        token: Option<&str>,
        payload: &Req,
    ) -> Result<Res, ApiError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        debug!(path, authenticated = token.is_some(), "PUT");
        let mut request = self.http.put(self.endpoint(path)).json(payload);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        decode_response(request.send().await?).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        debug!(path, authenticated = token.is_some(), "DELETE");
        let mut request = self.http.delete(self.endpoint(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Fetch { status, body });
        }
        Ok(())
    }
}

/// Check the status line, then decode the body as JSON.
///
/// A non-OK status becomes [`ApiError::Fetch`] carrying the raw body text,
/// so "HTTP 500: boom" style failures stay diagnosable from the error
/// message alone.
async fn decode_response<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(ApiError::Fetch {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = ApiClient::new("http://localhost:5001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
        assert_eq!(
            client.endpoint("/api/messages"),
            "http://localhost:5001/api/messages"
        );
        assert_eq!(
            client.endpoint("api/messages"),
            "http://localhost:5001/api/messages"
        );
    }

    #[test]
    fn empty_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("   "),
            Err(ApiError::BaseUrlMissing)
        ));
    }
}
