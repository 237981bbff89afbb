//! PostgREST record store
//!
//! Talks to the hosted database's REST layer (`{url}/rest/v1/{table}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::api_key::{
    ApiKeyId, ApiKeyPatch, ApiKeyRecord, KeyField, NewApiKey, RecordStore,
};
use crate::domain::DomainError;

/// Error code PostgREST returns when a single object was requested and the
/// query matched zero (or more than one) rows
pub const SINGLE_OBJECT_NO_ROWS: &str = "PGRST116";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Connection settings for a PostgREST endpoint
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub url: String,
    /// Anonymous (or service) key sent as `apikey` and bearer token
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl PostgrestConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: "api_keys".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}

/// Error body returned by PostgREST
#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl PostgrestError {
    fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(SINGLE_OBJECT_NO_ROWS)
    }
}

/// RecordStore backed by a PostgREST table
#[derive(Debug, Clone)]
pub struct PostgrestRecordStore {
    client: reqwest::Client,
    config: PostgrestConfig,
}

impl PostgrestRecordStore {
    pub fn new(config: PostgrestConfig) -> Result<Self, DomainError> {
        if config.url.trim().is_empty() {
            return Err(DomainError::configuration("Record store URL is required"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.config.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DomainError> {
        request
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Request failed: {}", e)))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        response
            .json()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to parse response: {}", e)))
    }

    async fn read_error(response: Response) -> (StatusCode, PostgrestError) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let error = serde_json::from_str(&body).unwrap_or_else(|_| PostgrestError {
            code: None,
            message: (!body.is_empty()).then_some(body),
        });
        (status, error)
    }

    fn status_error(status: StatusCode, error: &PostgrestError) -> DomainError {
        let message = error.message.as_deref().unwrap_or("no message");
        warn!(%status, code = ?error.code, "Record store request failed");
        DomainError::storage(format!("HTTP {}: {}", status, message))
    }

    /// Read a single-object response, mapping the "no rows" code to `None`
    async fn read_single(response: Response) -> Result<Option<ApiKeyRecord>, DomainError> {
        if response.status().is_success() {
            return Self::read_json(response).await.map(Some);
        }

        let (status, error) = Self::read_error(response).await;
        if status == StatusCode::NOT_ACCEPTABLE && error.is_no_rows() {
            return Ok(None);
        }

        Err(Self::status_error(status, &error))
    }
}

#[async_trait]
impl RecordStore for PostgrestRecordStore {
    async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let request = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "id.asc")]);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            let (status, error) = Self::read_error(response).await;
            return Err(Self::status_error(status, &error));
        }

        Self::read_json(response).await
    }

    async fn insert(&self, api_key: NewApiKey) -> Result<ApiKeyRecord, DomainError> {
        let request = self
            .request(Method::POST)
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&api_key);
        let response = self.send(request).await?;

        Self::read_single(response)
            .await?
            .ok_or_else(|| DomainError::storage("Insert returned no row"))
    }

    async fn update_by_id(
        &self,
        id: ApiKeyId,
        patch: ApiKeyPatch,
    ) -> Result<ApiKeyRecord, DomainError> {
        let request = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .header("Accept", SINGLE_OBJECT)
            .json(&patch);
        let response = self.send(request).await?;

        Self::read_single(response)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))
    }

    async fn delete_by_id(&self, id: ApiKeyId) -> Result<bool, DomainError> {
        let request = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", RETURN_REPRESENTATION);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            let (status, error) = Self::read_error(response).await;
            return Err(Self::status_error(status, &error));
        }

        let removed: Vec<ApiKeyRecord> = Self::read_json(response).await?;
        Ok(!removed.is_empty())
    }

    async fn find_one_by_field(
        &self,
        field: KeyField,
        value: &str,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        debug!(column = field.column(), "Looking up API key");

        let request = self
            .request(Method::GET)
            .query(&[
                ("select", "*".to_string()),
                (field.column(), format!("eq.{}", value)),
            ])
            .header("Accept", SINGLE_OBJECT);
        let response = self.send(request).await?;

        Self::read_single(response).await
    }
}
