use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type TimeEntryId = u64;

/// A running or stopped time entry as returned by Toggl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(default)]
    pub description: Option<String>,
}

impl TimeEntry {
    /// Whole seconds elapsed since `start`, clamped at zero for clock skew.
    pub fn elapsed_seconds(&self, now: OffsetDateTime) -> u64 {
        let elapsed = (now - self.start).whole_seconds();
        u64::try_from(elapsed).unwrap_or(0)
    }
}
