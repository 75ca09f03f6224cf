use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::{io::Write, os::unix::fs::OpenOptionsExt};

/// The single key this application stores.
pub const TOKEN_KEY: &str = "api_token";

/// Secure storage for the one API token the app knows about.
pub trait CredentialStore: Send {
    fn get(&self) -> Result<Option<String>>;
    fn set(&mut self, value: &str) -> Result<()>;
    fn delete(&mut self) -> Result<()>;
}

pub fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("floating-toggl"))
}

fn secure_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?
            .write_all(content.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, content)?;
    }

    Ok(())
}

/// Keeps the token in a user-only readable file under the config directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(root_path()?.join(TOKEN_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let token = std::fs::read_to_string(&self.path).context("Failed to read token file")?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token))
    }

    fn set(&mut self, value: &str) -> Result<()> {
        secure_write(&self.path, value)
            .with_context(|| format!("Failed to write token to {}", self.path.display()))
    }

    fn delete(&mut self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// In-memory store that records how often it was written to.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    inner: std::sync::Arc<std::sync::Mutex<MemoryInner>>,
}

#[cfg(test)]
#[derive(Debug, Default)]
struct MemoryInner {
    value: Option<String>,
    sets: usize,
    deletes: usize,
}

#[cfg(test)]
impl MemoryCredentialStore {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.lock().value = Some(token.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means a test panicked mid-write; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn value(&self) -> Option<String> {
        self.lock().value.clone()
    }

    pub fn set_count(&self) -> usize {
        self.lock().sets
    }

    pub fn delete_count(&self) -> usize {
        self.lock().deletes
    }
}

#[cfg(test)]
impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.value())
    }

    fn set(&mut self, value: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.value = Some(value.to_string());
        inner.sets += 1;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let mut inner = self.lock();
        inner.value = None;
        inner.deletes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> FileCredentialStore {
        let dir = std::env::temp_dir().join(format!(
            "floating-toggl-test-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        FileCredentialStore::new(dir.join(TOKEN_KEY))
    }

    #[test]
    fn file_store_round_trips_token() {
        let mut store = temp_store("round-trip");
        assert_eq!(store.get().unwrap(), None);

        store.set("abc123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc123"));

        store.delete().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // Deleting twice is fine.
        store.delete().unwrap();
    }

    #[test]
    fn blank_token_file_is_absent() {
        let mut store = temp_store("blank");
        store.set("  \n").unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let mut store = temp_store("private");
        store.set("abc123").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryCredentialStore::with_token("a");
        let observer = store.clone();
        store.set("b").unwrap();
        store.delete().unwrap();

        assert_eq!(observer.set_count(), 1);
        assert_eq!(observer.delete_count(), 1);
        assert_eq!(observer.value(), None);
    }
}
