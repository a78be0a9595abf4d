//! Durable session storage.
//!
//! Exactly two keys are ever stored: the opaque auth token and a JSON snapshot of
//! the signed-in user. They are written together on login/register and cleared
//! together on logout or on a 401 from the API.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};

use crate::error::AppError;
use crate::models::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    AuthToken,
    User,
}

impl StorageKey {
    pub const ALL: [StorageKey; 2] = [StorageKey::AuthToken, StorageKey::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AuthToken => "auth_token",
            StorageKey::User => "user",
        }
    }
}

/// What rehydration found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    /// Both keys present and the user snapshot parsed.
    Complete { token: String, user: User },
    /// At least one key is absent.
    Missing,
    /// Both keys present but the user snapshot is not valid JSON for `User`.
    Corrupt(String),
}

/// Key-value storage that outlives the process.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: StorageKey) -> Result<Option<String>, AppError>;
    fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: StorageKey) -> Result<(), AppError>;

    fn save_session(&self, token: &str, user: &User) -> Result<(), AppError> {
        let snapshot = serde_json::to_string(user)?;
        self.set(StorageKey::AuthToken, token)?;
        self.set(StorageKey::User, &snapshot)
    }

    fn load_session(&self) -> Result<StoredSession, AppError> {
        let token = self.get(StorageKey::AuthToken)?;
        let snapshot = self.get(StorageKey::User)?;
        match (token, snapshot) {
            (Some(token), Some(snapshot)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&snapshot) {
                    Ok(user) => Ok(StoredSession::Complete { token, user }),
                    Err(e) => Ok(StoredSession::Corrupt(e.to_string())),
                }
            }
            _ => Ok(StoredSession::Missing),
        }
    }

    fn clear_session(&self) -> Result<(), AppError> {
        for key in StorageKey::ALL {
            self.remove(key)?;
        }
        Ok(())
    }
}

fn lock_poisoned<T>(_: T) -> AppError {
    AppError::Storage("session storage lock poisoned".into())
}

/// In-process storage; forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().map_err(lock_poisoned)?.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError> {
        self.entries
            .lock()
            .map_err(lock_poisoned)?
            .insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), AppError> {
        self.entries.lock().map_err(lock_poisoned)?.remove(&key);
        Ok(())
    }
}

/// Stores both keys in a single JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // An unreadable file is treated as empty; the next write replaces it.
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        debug!("Wrote session file {}", self.path.display());
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, AppError> {
        let _guard = self.guard.lock().map_err(lock_poisoned)?;
        Ok(self.read_entries()?.remove(key.as_str()))
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), AppError> {
        let _guard = self.guard.lock().map_err(lock_poisoned)?;
        let mut entries = self.read_entries()?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: StorageKey) -> Result<(), AppError> {
        let _guard = self.guard.lock().map_err(lock_poisoned)?;
        let mut entries = self.read_entries()?;
        if entries.remove(key.as_str()).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
