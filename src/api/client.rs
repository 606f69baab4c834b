use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::api::models::{
    ExtractionResult, StoreResponse, StoredBusinessCard, StoredVisitorLog,
};
use crate::infra::config::AppConfig;

/// Blocking HTTP client for the extraction backend. Cheap to clone; clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|error| ApiError::Unknown(error.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.backend_url, config.request_timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload an image and get the extracted `{type, data}` payload back.
    pub fn extract_validate(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<ExtractionResult, ApiError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|error| ApiError::Unknown(error.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let url = format!("{}/extract_validate/", self.base_url);
        tracing::debug!(%url, file_name, "sending extraction request");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|error| self.transport_error(&error))?;
        self.parse_json(response)
    }

    /// Post a user-confirmed extraction result for storage. Rejects
    /// `unknown` payloads locally without touching the network.
    pub fn store_data(&self, result: &ExtractionResult) -> Result<StoreResponse, ApiError> {
        if !result.is_storable() {
            return Err(ApiError::Validation(
                "No valid data available to save.".to_string(),
            ));
        }

        let url = format!("{}/store_data/", self.base_url);
        tracing::debug!(%url, "sending store request");
        let response = self
            .client
            .post(&url)
            .json(result)
            .send()
            .map_err(|error| self.transport_error(&error))?;
        self.parse_json(response)
    }

    pub fn get_business_cards(&self) -> Result<Vec<StoredBusinessCard>, ApiError> {
        self.get_list("/get_business_cards/")
    }

    pub fn get_visitor_logs(&self) -> Result<Vec<StoredVisitorLog>, ApiError> {
        self.get_list("/get_visitor_logs/")
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "fetching records");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|error| self.transport_error(&error))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|error| ApiError::Unknown(error.to_string()))?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "record fetch failed");
            return Err(ApiError::from_status(status, &body));
        }
        parse_list_body(&body)
    }

    fn parse_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|error| ApiError::Unknown(error.to_string()))?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backend request failed");
            return Err(ApiError::from_status(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|error| ApiError::Unknown(format!("Unexpected response shape: {error}")))
    }

    fn transport_error(&self, error: &reqwest::Error) -> ApiError {
        let classified = ApiError::from_transport(error, &self.base_url);
        tracing::warn!(%error, "transport failure");
        classified
    }
}

/// List endpoints may answer with an empty body; treat that as no records.
fn parse_list_body<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
        .map_err(|error| ApiError::Unknown(format!("Unexpected response shape: {error}")))
}
