use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::credentials::{CredentialStore, TokenKind};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Token pair returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// On-disk layout of the session file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl SessionFile {
    fn slot(&mut self, kind: TokenKind) -> &mut Option<String> {
        match kind {
            TokenKind::Access => &mut self.access_token,
            TokenKind::Refresh => &mut self.refresh_token,
        }
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Tokens persisted as JSON in the cache directory.
///
/// Every read goes back to disk. Writes are serialized through an internal
/// lock and replace the file atomically; the file is removed once both
/// tokens are gone.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store the session in `<cache_dir>/session.json`
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self::at_path(cache_dir.as_ref().join(SESSION_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the session file was last written, if it exists
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.updated_at)
    }

    fn read(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    fn write(&self, data: &SessionFile) -> Result<()> {
        if data.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove session file")?;
            }
            return Ok(());
        }
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        // Rename over the old file: readers never observe a partial write
        let mut tmp = NamedTempFile::new_in(parent).context("Failed to create temp session file")?;
        restrict_permissions(tmp.path())?;
        serde_json::to_writer_pretty(&mut tmp, data)?;
        tmp.as_file_mut()
            .sync_all()
            .context("Failed to write session file")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .context("Failed to replace session file")?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut SessionFile)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Session file lock poisoned"))?;
        let mut data = self.read()?;
        f(&mut data);
        data.updated_at = Some(Utc::now());
        self.write(&data)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .context("Failed to restrict session file permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl CredentialStore for FileStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        Ok(self.read()?.slot(kind).take())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.update(|data| *data.slot(kind) = Some(value.to_string()))
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        self.update(|data| *data.slot(kind) = None)
    }

    fn store_session(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.update(|data| {
            data.access_token = Some(access_token.to_string());
            data.refresh_token = Some(refresh_token.to_string());
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(|data| {
            data.access_token = None;
            data.refresh_token = None;
        })
    }
}
