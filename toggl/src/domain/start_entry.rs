use serde::Serialize;

use super::ProjectId;

/// Tag sent as `created_with` so Toggl can attribute entries to this client.
pub const CLIENT_TAG: &str = "FloatingToggl";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartEntryPayload {
    pub time_entry: StartEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartEntry {
    pub description: String,
    /// Serialized as `null` when no project was matched.
    pub pid: Option<ProjectId>,
    pub created_with: String,
}

impl StartEntryPayload {
    pub fn new(description: impl Into<String>, pid: Option<ProjectId>) -> Self {
        Self {
            time_entry: StartEntry {
                description: description.into(),
                pid,
                created_with: CLIENT_TAG.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_null_project() {
        let payload = StartEntryPayload::new("Fix bug", None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"time_entry": {"description": "Fix bug", "pid": null, "created_with": "FloatingToggl"}})
        );
    }
}
