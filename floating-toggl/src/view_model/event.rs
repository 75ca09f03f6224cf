use toggl::domain::{ProjectId, TimeEntry, TimeEntryId, UserProfile};

/// Everything that can change the view model. Network results carry the
/// generation they were issued under so superseded results can be dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `None` (or a blank token) signs out.
    CredentialChanged(Option<String>),
    ForegroundChanged(bool),
    /// Periodic poll of the running entry.
    Refresh,
    InputChanged(String),
    Start,
    Stop,
    /// Clock for the completion debounce.
    Tick,
    CurrentEntryLoaded {
        generation: u64,
        entry: Option<TimeEntry>,
    },
    ProfileLoaded {
        generation: u64,
        profile: Option<UserProfile>,
    },
}

/// Network work requested by the view model. The runtime executes these and
/// reports back with the matching `*Loaded` event.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchCurrentEntry {
        generation: u64,
        token: String,
    },
    FetchProfile {
        generation: u64,
        token: String,
    },
    StartEntry {
        generation: u64,
        token: String,
        description: String,
        project_id: Option<ProjectId>,
    },
    /// Always reported back as "nothing running", whatever the outcome.
    StopEntry {
        generation: u64,
        token: String,
        entry_id: TimeEntryId,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::FetchCurrentEntry { .. } => "fetch_current_entry",
            Command::FetchProfile { .. } => "fetch_profile",
            Command::StartEntry { .. } => "start_entry",
            Command::StopEntry { .. } => "stop_entry",
        }
    }
}
