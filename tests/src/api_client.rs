//! HTTP client for the API under test

use anyhow::{Context, Result};
use http::header::{AUTHORIZATION, LOCATION};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thingful_config::ApiConfig;
use tracing::debug;
use url::Url;

/// Status, headers and decoded body of one response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body; `Null` when empty, a string when not JSON
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone())
            .with_context(|| format!("Unexpected response body: {}", self.body))
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION)?.to_str().ok()
    }
}

/// Client bound to the API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).context("Invalid API base URL")?;
        // keep a trailing slash so joins stay under the base path
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Absolute URL for an API path such as `/api/things`
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid request path: {}", path))
    }

    pub async fn get(&self, path: &str, auth: Option<&str>) -> Result<ApiResponse> {
        let mut request = self.client.get(self.url(path)?);
        if let Some(auth) = auth {
            request = request.header(AUTHORIZATION, auth);
        }
        self.send(path, request).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        auth: Option<&str>,
    ) -> Result<ApiResponse> {
        let mut request = self.client.post(self.url(path)?).json(body);
        if let Some(auth) = auth {
            request = request.header(AUTHORIZATION, auth);
        }
        self.send(path, request).await
    }

    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", path))?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        debug!("{} -> {}", path, status);
        Ok(ApiResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8000", "/api/things", "http://localhost:8000/api/things")]
    #[case("http://localhost:8000/", "api/things/1", "http://localhost:8000/api/things/1")]
    #[case("http://example.com/v1", "/api/reviews", "http://example.com/v1/api/reviews")]
    fn test_url_joining(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        let client = ApiClient::new(&ApiConfig::new(base)).unwrap();
        assert_eq!(client.url(path).unwrap().as_str(), expected);
    }

    #[test]
    fn test_response_json() {
        let response = ApiResponse {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: serde_json::json!({ "error": "thing doesn't exist" }),
        };

        let body: thingful_api_types::ErrorBody = response.json().unwrap();
        assert_eq!(body, thingful_api_types::ErrorBody::thing_not_found());
        assert_eq!(response.location(), None);
    }
}
