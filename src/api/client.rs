//! Arcane REST API client implementation.
//!
//! This module provides the HTTP client for interacting with the Arcane API:
//! JSON request encoding, `X-API-Key` authentication, status translation and
//! decoding of the `{ success, data }` response envelope.

use reqwest::{Client, Method, RequestBuilder, Url, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::ProviderSettings;
use crate::error::{ApiError, ConfigError, Result};

/// Default request timeout when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest error body kept in an error message.
const MAX_ERROR_BODY_BYTES: usize = 1 << 20;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-API-Key";

/// Arcane API client.
#[derive(Clone)]
pub struct ArcaneClient {
    /// HTTP client.
    client: Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// API key.
    api_key: String,
}

impl std::fmt::Debug for ArcaneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcaneClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Decodes an explicit `null` as the type's default value.
///
/// The API encodes empty slices, maps and strings as `null`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Standard response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default, deserialize_with = "nullable")]
    success: bool,
    data: T,
}

impl ArcaneClient {
    /// Creates a new client with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP
    /// client cannot be created.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        Self::with_timeout(endpoint, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP
    /// client cannot be created.
    pub fn with_timeout(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut endpoint = endpoint.to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base_url = Url::parse(&endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    /// Creates a client from resolved provider settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        Self::with_timeout(&settings.endpoint, &settings.api_key, settings.timeout)
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an authenticated request for a path relative to the base URL.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::network(format!("Invalid request path '{path}': {e}")))?;

        debug!("{method} {url}");

        Ok(self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key))
    }

    /// Sends a request and returns the raw body of a successful response.
    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path)?;
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(body)?;
            trace!("Request body: {} bytes", payload.len());
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        if status.as_u16() >= 300 {
            let capped = &bytes[..bytes.len().min(MAX_ERROR_BODY_BYTES)];
            let text = String::from_utf8_lossy(capped);
            return Err(ApiError::status(status.as_u16(), status.to_string(), text.trim()).into());
        }

        trace!("Response {status}: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Decodes an enveloped response body.
    fn decode_envelope<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T> {
        let envelope: Envelope<T> = serde_json::from_slice(bytes).map_err(|e| {
            ApiError::invalid_response(format!("Failed to decode response from {path}: {e}"))
        })?;
        if !envelope.success {
            debug!("Response envelope from {path} reported success=false");
        }
        Ok(envelope.data)
    }

    /// Decodes a bare (non-enveloped) response body.
    fn decode_raw<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| {
            ApiError::invalid_response(format!("Failed to decode response from {path}: {e}"))
                .into()
        })
    }

    /// `GET` an enveloped resource.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let bytes = self.execute::<()>(Method::GET, path, &[], None).await?;
        Self::decode_envelope(path, &bytes)
    }

    /// `GET` a bare JSON document.
    pub(crate) async fn get_raw<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let bytes = self.execute::<()>(Method::GET, path, &[], None).await?;
        Self::decode_raw(path, &bytes)
    }

    /// `POST` a JSON body and decode an enveloped response.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::decode_envelope(path, &bytes)
    }

    /// `POST` a JSON body and decode a bare response.
    pub(crate) async fn post_raw<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::decode_raw(path, &bytes)
    }

    /// `POST` without a body, discarding the response.
    pub(crate) async fn post_action(&self, path: &str) -> Result<()> {
        self.execute::<()>(Method::POST, path, &[], None).await?;
        Ok(())
    }

    /// `PUT` a JSON body and decode an enveloped response.
    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let bytes = self.execute(Method::PUT, path, &[], Some(body)).await?;
        Self::decode_envelope(path, &bytes)
    }

    /// `DELETE`, discarding the response.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// `DELETE` with query parameters, discarding the response.
    pub(crate) async fn delete_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        self.execute::<()>(Method::DELETE, path, query, None).await?;
        Ok(())
    }

    /// `DELETE` with a JSON body, discarding the response.
    pub(crate) async fn delete_with_body<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.execute(Method::DELETE, path, &[], Some(body)).await?;
        Ok(())
    }
}

/// Percent-encodes one path segment for use in a request path.
pub(crate) fn segment(value: &str) -> String {
    let Ok(mut url) = Url::parse("http://arcane/") else {
        return value.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(value);
    }
    url.path().trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArcaneError;
    use serde_json::json;
    use wiremock::matchers::{body_json, header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = ArcaneClient::new("http://localhost:3552/api", "k").expect("client");
        assert_eq!(client.base_url().as_str(), "http://localhost:3552/api/");
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(ArcaneClient::new("::nope", "k").is_err());
    }

    #[test]
    fn test_segment_escaping() {
        assert_eq!(segment("abc-123"), "abc-123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("env:web?x#y"), "env:web%3Fx%23y");
    }

    #[tokio::test]
    async fn test_get_sends_headers_and_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/things/1"))
            .and(header_eq("X-API-Key", "secret"))
            .and(header_eq("Accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "data": {"value": 7}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "secret").expect("client");
        let value: serde_json::Value = client.get("things/1").await.expect("get");
        assert_eq!(value, json!({"value": 7}));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/things"))
            .and(header_eq("Content-Type", "application/json"))
            .and(body_json(json!({"name": "<a&b>"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"success": true, "data": "ok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ArcaneClient::new(&format!("{}/api/", server.uri()), "k").expect("client");
        let out: String = client
            .post("things", &json!({"name": "<a&b>"}))
            .await
            .expect("post");
        assert_eq!(out, "ok");
    }

    #[tokio::test]
    async fn test_error_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("  not here \n"))
            .mount(&server)
            .await;

        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "k").expect("client");
        let err = client
            .get::<serde_json::Value>("missing")
            .await
            .expect_err("404 must fail");

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "arcane API error: 404 Not Found: not here");
    }

    #[tokio::test]
    async fn test_redirect_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/moved"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "k").expect("client");
        let err = client.delete("moved").await.expect_err("304 must fail");
        assert_eq!(err.status_code(), Some(304));
    }

    #[tokio::test]
    async fn test_delete_with_query() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/c/1"))
            .and(query_param("force", "true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "k").expect("client");
        client
            .delete_with_query("c/1", &[("force", "true")])
            .await
            .expect("delete");
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bad"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ArcaneClient::new(&format!("{}/api", server.uri()), "k").expect("client");
        let err = client
            .get::<serde_json::Value>("bad")
            .await
            .expect_err("html is not json");
        assert!(matches!(
            err,
            ArcaneError::Api(ApiError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let project: crate::api::Project = serde_json::from_value(json!({
            "id": "p1",
            "name": null,
            "path": null,
            "status": null,
            "serviceCount": null
        }))
        .expect("project");
        assert_eq!(project.path, "");
        assert_eq!(project.service_count, 0);

        let volume: crate::api::Volume = serde_json::from_value(json!({
            "name": "pgdata",
            "containers": null,
            "inUse": null
        }))
        .expect("volume");
        assert!(volume.containers.is_empty());
        assert!(!volume.in_use);

        let settings: crate::api::NotificationSettings = serde_json::from_value(json!({
            "provider": "discord",
            "enabled": true,
            "config": null
        }))
        .expect("notification");
        assert!(settings.config.is_empty());

        let envelope: Envelope<Vec<String>> =
            serde_json::from_value(json!({"success": null, "data": []})).expect("envelope");
        assert!(!envelope.success);
    }
}
