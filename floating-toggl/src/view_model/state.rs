use time::OffsetDateTime;
use toggl::domain::{TimeEntry, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub credential: Option<String>,
    /// Only meaningful while `credential` is present.
    pub current_entry: Option<TimeEntry>,
    pub profile: Option<UserProfile>,
    pub input_text: String,
    pub is_foreground: bool,
}

impl AppState {
    pub fn new(credential: Option<String>) -> Self {
        Self {
            credential,
            current_entry: None,
            profile: None,
            input_text: String::new(),
            is_foreground: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Nothing running, empty input.
    Idle,
    /// Nothing running, the user is typing.
    Composing,
    /// An entry is running; the input mirrors its description and is read-only.
    Running,
}

/// What the timer label shows for the running entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDisplay {
    pub description: String,
    pub elapsed_seconds: u64,
}

impl EntryDisplay {
    pub fn from_entry(entry: &TimeEntry, now: OffsetDateTime) -> Self {
        Self {
            description: entry.description.clone().unwrap_or_default(),
            elapsed_seconds: entry.elapsed_seconds(now),
        }
    }

    pub fn format_elapsed(&self) -> String {
        let secs = self.elapsed_seconds;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_formatted_as_clock() {
        let display = EntryDisplay {
            description: String::new(),
            elapsed_seconds: 3 * 3600 + 7 * 60 + 9,
        };
        assert_eq!(display.format_elapsed(), "03:07:09");
    }
}
