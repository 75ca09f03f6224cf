pub const DEFAULT_BASE_URL: &str = "https://www.toggl.com/api/v8/";

#[derive(Debug, Clone)]
pub struct TogglURL(String);

impl AsRef<str> for TogglURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Default for TogglURL {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TogglURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_query(&self, key: &str, value: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&{}={}", self.0, key, value))
        } else {
            Self(format!("{}?{}={}", self.0, key, value))
        }
    }
}

impl From<&str> for TogglURL {
    fn from(value: &str) -> Self {
        TogglURL::new(value)
    }
}

impl From<String> for TogglURL {
    fn from(value: String) -> Self {
        TogglURL::new(value)
    }
}
