//! REST client for the forms backend.

use crate::config::{AuthConfig, TuiConfig};
use formdesk_core::{DateRange, Record, RecordError, RecordId, Resource};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed record: {0}")]
    Record(#[from] RecordError),
    /// Non-2xx response. Carries the server's message when it sent one.
    #[error("{0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Error body shape used by the backend.
#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: String,
}

/// Requester / approver details from `/users/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_settings(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
            &config.auth,
        )
    }

    pub fn with_settings(
        base_url: &str,
        timeout: Duration,
        auth: &AuthConfig,
    ) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth_header = build_auth_headers(auth)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the whole collection. Entities that filter by date on the
    /// server get the range as `startDate` / `endDate`.
    pub async fn list(
        &self,
        resource: Resource,
        range: Option<&DateRange>,
    ) -> Result<Vec<Record>, ApiClientError> {
        let path = format!("/api/{}", resource.path());
        let query = range.map(DateRange::query_params).unwrap_or_default();
        let value: Value = self.get_json(&path, &query).await?;
        Ok(Record::many_from_value(value, resource.profile().id_field)?)
    }

    pub async fn get(&self, resource: Resource, id: &RecordId) -> Result<Record, ApiClientError> {
        let path = format!("/api/{}/{}", resource.path(), id);
        let value: Value = self.get_json(&path, &[]).await?;
        Ok(Record::from_value(value, resource.profile().id_field)?)
    }

    /// Returns the server's canonical record, including its assigned id.
    pub async fn create(&self, resource: Resource, body: &Value) -> Result<Record, ApiClientError> {
        let path = format!("/api/{}", resource.path());
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(url)
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        let value: Value = self.parse_response(response).await?;
        Ok(Record::from_value(value, resource.profile().id_field)?)
    }

    /// Returns the updated record. A response without an id is stamped with
    /// the one that was sent.
    pub async fn update(
        &self,
        resource: Resource,
        id: &RecordId,
        body: &Value,
    ) -> Result<Record, ApiClientError> {
        let path = format!("/api/{}/{}", resource.path(), id);
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .put(url)
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        let mut value: Value = self.parse_response(response).await?;
        let id_field = resource.profile().id_field;
        if let Some(object) = value.as_object_mut() {
            object.entry(id_field).or_insert_with(|| id.to_value());
        }
        Ok(Record::from_value(value, id_field)?)
    }

    pub async fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), ApiClientError> {
        let url = format!("{}/api/{}/{}", self.base_url, resource.path(), id);
        let response = self
            .client
            .delete(url)
            .headers(self.auth_header.clone())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(error_from_body(status, &text))
    }

    pub async fn user_profile(&self, id: &RecordId) -> Result<UserProfile, ApiClientError> {
        let path = format!("/users/{}", id);
        self.get_json(&path, &[]).await
    }

    pub fn signature_url(&self, filename: &str) -> String {
        format!("{}/uploads/signatures/{}", self.base_url, filename)
    }

    async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(url).headers(self.auth_header.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        self.parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            Ok(serde_json::from_str::<T>(&text)?)
        } else {
            Err(error_from_body(status, &text))
        }
    }
}

fn error_from_body(status: reqwest::StatusCode, text: &str) -> ApiClientError {
    if let Ok(server) = serde_json::from_str::<ServerMessage>(text) {
        return ApiClientError::InvalidResponse(server.message);
    }
    ApiClientError::InvalidResponse(format!("HTTP {}: {}", status.as_u16(), text))
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    if let Some(token) = &auth.bearer_token {
        let value = format!("Bearer {}", token);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}
