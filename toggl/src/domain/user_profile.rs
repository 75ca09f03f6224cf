use serde::{Deserialize, Serialize};

use super::{null_as_default, Project, TimeEntry};

/// The authenticated user together with the related data returned by
/// `me?with_related_data=true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    #[serde(rename = "fullname", default)]
    pub display_name: String,
    /// In the order the server returned them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    /// Not guaranteed to be in any order, see [`UserProfile::entries_newest_first`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_entries: Vec<TimeEntry>,
}

impl UserProfile {
    /// History sorted by start time, most recent first.
    pub fn entries_newest_first(&self) -> Vec<&TimeEntry> {
        let mut entries: Vec<&TimeEntry> = self.time_entries.iter().collect();
        entries.sort_by(|a, b| b.start.cmp(&a.start));
        entries
    }
}
