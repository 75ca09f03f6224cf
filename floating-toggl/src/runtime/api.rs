use async_trait::async_trait;
use toggl::domain::{ProjectId, TimeEntry, TimeEntryId, UserProfile};
use toggl::{Credentials, TogglClient, TogglFetchError, TogglURL};

/// The four remote operations the view model relies on.
///
/// The client is created per call with the token the command carries, so a
/// credential change never races an old client.
#[async_trait]
pub trait TimeTrackingApi: Send + Sync + 'static {
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, TogglFetchError>;

    async fn fetch_current_entry(&self, token: &str)
        -> Result<Option<TimeEntry>, TogglFetchError>;

    async fn start_entry(
        &self,
        token: &str,
        description: &str,
        project_id: Option<ProjectId>,
    ) -> Result<TimeEntry, TogglFetchError>;

    async fn stop_entry(&self, token: &str, entry_id: TimeEntryId)
        -> Result<TimeEntry, TogglFetchError>;
}

#[derive(Debug, Clone)]
pub struct TogglApi {
    base_url: TogglURL,
}

impl TogglApi {
    pub fn new(base_url: impl Into<TogglURL>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn client(&self, token: &str) -> TogglClient {
        TogglClient::with_base_url(Credentials::new(token), self.base_url.clone())
    }
}

#[async_trait]
impl TimeTrackingApi for TogglApi {
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, TogglFetchError> {
        self.client(token).fetch_profile().await
    }

    async fn fetch_current_entry(
        &self,
        token: &str,
    ) -> Result<Option<TimeEntry>, TogglFetchError> {
        self.client(token).fetch_current_entry().await
    }

    async fn start_entry(
        &self,
        token: &str,
        description: &str,
        project_id: Option<ProjectId>,
    ) -> Result<TimeEntry, TogglFetchError> {
        self.client(token).start_entry(description, project_id).await
    }

    async fn stop_entry(
        &self,
        token: &str,
        entry_id: TimeEntryId,
    ) -> Result<TimeEntry, TogglFetchError> {
        self.client(token).stop_entry(entry_id).await
    }
}
