//! Persisted session record.
//!
//! The signed-in [`Identity`] is stored as a single JSON file. The file's
//! absence means nobody is signed in.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use meetpulse_core::Identity;
use tracing::{debug, info};

use crate::error::{SessionError, SessionResult};

const APP_DIR: &str = "meetpulse";
const SESSION_FILE: &str = "session.json";

/// File-backed storage for the signed-in identity.
#[derive(Debug, Clone)]
pub struct IdentityStorage {
    path: PathBuf,
}

impl IdentityStorage {
    /// Creates storage backed by the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default location, `$XDG_DATA_HOME/meetpulse/session.json`.
    pub fn default_path() -> SessionResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(SESSION_FILE))
            .ok_or(SessionError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record from disk.
    ///
    /// Returns `Ok(None)` if no record exists.
    pub fn load(&self) -> SessionResult<Option<Identity>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no session file");
                return Ok(None);
            }
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let identity: Identity =
            serde_json::from_str(&content).map_err(|source| SessionError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), email = %identity.email, "loaded session");
        Ok(Some(identity))
    }

    /// Writes `identity` to disk, replacing any existing record.
    pub fn set(&self, identity: &Identity) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(identity).map_err(SessionError::Serialize)?;

        // Write to a sibling temp file, then rename over the record.
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|source| SessionError::Write {
            path: temp_path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&temp_path, perms).map_err(|source| SessionError::Write {
                path: temp_path.clone(),
                source,
            })?;
        }

        fs::rename(&temp_path, &self.path).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), email = %identity.email, "saved session");
        Ok(())
    }

    /// Removes the record. Removing a missing record is not an error.
    pub fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "removed session file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity() -> Identity {
        Identity::new("sub-1", "ada@example.com", "Ada").with_avatar("https://example.com/a.png")
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = IdentityStorage::new(dir.path().join("session.json"));

        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn set_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let storage = IdentityStorage::new(&path);
        storage.set(&identity()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = IdentityStorage::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(identity()));
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        IdentityStorage::new(&path).set(&identity()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["id"], "sub-1");
        assert_eq!(raw["role"], "user");
        assert_eq!(raw["avatar"], "https://example.com/a.png");
    }

    #[cfg(unix)]
    #[test]
    fn record_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        IdentityStorage::new(&path).set(&identity()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let err = IdentityStorage::new(&path).load().unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn clear_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let storage = IdentityStorage::new(&path);
        storage.set(&identity()).unwrap();

        storage.clear().unwrap();
        assert!(!path.exists());
        assert!(storage.load().unwrap().is_none());

        storage.clear().unwrap();
    }

    #[test]
    fn load_reflects_changes_made_by_another_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let ours = IdentityStorage::new(&path);
        ours.set(&identity()).unwrap();

        IdentityStorage::new(&path).clear().unwrap();
        assert!(ours.load().unwrap().is_none());
    }
}
