use reqwest::{header::AUTHORIZATION, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{
    domain::{DataEnvelope, ProjectId, StartEntryPayload, TimeEntry, TimeEntryId, UserProfile},
    TogglURL,
};

use super::Credentials;

#[derive(Debug, Clone)]
pub struct TogglClient {
    client: reqwest::Client,
    credentials: Credentials,
    base_url: TogglURL,
}

impl TogglClient {
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<TogglURL>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            base_url: base_url.into(),
        }
    }

    /// Send an authenticated request and return the raw body of a 2xx response.
    async fn send(
        &self,
        method: &Method,
        url: &TogglURL,
        body: Option<&impl Serialize>,
    ) -> Result<Vec<u8>, TogglFetchError> {
        tracing::debug!(%method, url = url.as_ref(), "toggl request");

        let mut request = self
            .client
            .request(method.clone(), url.as_ref())
            .header(AUTHORIZATION, self.credentials.as_authorization_header());
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::warn!(%method, url = url.as_ref(), error = %e, "toggl request failed");
            TogglFetchError::ResponseError(e.to_string())
        })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%method, url = url.as_ref(), %status, "toggl rejected api token");
            return Err(TogglFetchError::Unauthorized);
        }
        if !status.is_success() {
            tracing::warn!(%method, url = url.as_ref(), %status, "toggl returned error status");
            return Err(TogglFetchError::ResponseError(format!(
                "Unexpected status {}",
                status
            )));
        }

        let bytes = resp.bytes().await.map_err(|e| {
            tracing::warn!(%method, url = url.as_ref(), error = %e, "toggl body could not be read");
            TogglFetchError::ResponseError(e.to_string())
        })?;

        Ok(bytes.to_vec())
    }

    fn decode<T: DeserializeOwned>(
        method: &Method,
        url: &TogglURL,
        body: &[u8],
    ) -> Result<T, TogglFetchError> {
        let envelope: DataEnvelope<T> = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(%method, url = url.as_ref(), error = %e, "toggl response did not parse");
            TogglFetchError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        Ok(envelope.into_inner())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: TogglURL,
        body: Option<&impl Serialize>,
    ) -> Result<T, TogglFetchError> {
        let bytes = self.send(&method, &url, body).await?;
        Self::decode(&method, &url, &bytes)
    }

    /// `GET me?with_related_data=true`: the user, their projects and their entry history.
    pub async fn fetch_profile(&self) -> Result<UserProfile, TogglFetchError> {
        let url = self
            .base_url
            .append_path("me")
            .with_query("with_related_data", "true");

        self.request(Method::GET, url, None::<&()>).await
    }

    /// `GET time_entries/current`. `None` means nothing is running, which
    /// Toggl reports either as `{"data": null}` or as an empty body.
    pub async fn fetch_current_entry(&self) -> Result<Option<TimeEntry>, TogglFetchError> {
        let url = self.base_url.append_path("time_entries/current");

        let bytes = self.send(&Method::GET, &url, None::<&()>).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Self::decode(&Method::GET, &url, &bytes)
    }

    pub async fn start_entry(
        &self,
        description: &str,
        project_id: Option<ProjectId>,
    ) -> Result<TimeEntry, TogglFetchError> {
        let url = self.base_url.append_path("time_entries/start");
        let payload = StartEntryPayload::new(description, project_id);

        self.request(Method::POST, url, Some(&payload)).await
    }

    pub async fn stop_entry(&self, entry_id: TimeEntryId) -> Result<TimeEntry, TogglFetchError> {
        let url = self
            .base_url
            .append_path(&format!("time_entries/{}/stop", entry_id));

        self.request(Method::PUT, url, None::<&()>).await
    }
}

/// Everything that can go wrong talking to Toggl.
#[derive(Error, Debug)]
pub enum TogglFetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}
