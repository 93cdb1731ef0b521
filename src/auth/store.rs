//! Session token storage. The client owns one store and never touches a
//! process-wide slot, so independent sessions can coexist.

use super::error::AuthError;
use serde_json::{Map, Value};
use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::RwLock,
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Key the session token is stored under.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Storage capability for the single session token.
///
/// Reads must not fail: an unreadable store is an empty store.
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Option<String>;

    /// # Errors
    /// Returns `AuthError::Store` if the token cannot be persisted.
    fn set_token(&self, token: &str) -> Result<(), AuthError>;

    /// # Errors
    /// Returns `AuthError::Store` if the token cannot be removed.
    fn clear_token(&self) -> Result<(), AuthError>;
}

/// In-process store, one per session.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), AuthError> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| AuthError::Store("token lock poisoned".to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<(), AuthError> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| AuthError::Store("token lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Store for contexts without client-local storage: always unauthenticated.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTokenStore;

impl TokenStore for NoopTokenStore {
    fn get_token(&self) -> Option<String> {
        None
    }

    fn set_token(&self, _token: &str) -> Result<(), AuthError> {
        Ok(())
    }

    fn clear_token(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Persistent key/value store backed by a JSON object file.
///
/// Only the `auth_token` key is managed; other keys in the file are kept.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Option<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!("Failed to read session file {}: {}", self.path.display(), err);
                return None;
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) | Err(_) => {
                warn!("Ignoring malformed session file {}", self.path.display());
                None
            }
        }
    }

    /// Replaces the file through a sibling temp file (created `0600` on unix)
    /// renamed over the target.
    fn write_map(&self, map: &Map<String, Value>) -> Result<(), AuthError> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|err| {
                    AuthError::Store(format!("failed to create {}: {err}", parent.display()))
                })?;
                parent
            }
            None => Path::new("."),
        };

        let contents = serde_json::to_vec_pretty(map)
            .map_err(|err| AuthError::Store(format!("failed to encode session: {err}")))?;

        let write_error = |err: io::Error| {
            AuthError::Store(format!("failed to write {}: {err}", self.path.display()))
        };

        let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
        file.write_all(&contents).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file
            .persist(&self.path)
            .map_err(|err| write_error(err.error))?;

        debug!("session file updated: {}", self.path.display());

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get_token(&self) -> Option<String> {
        let _guard = self.lock.read().ok()?;
        self.read_map()?
            .get(AUTH_TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_token(&self, token: &str) -> Result<(), AuthError> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| AuthError::Store("session lock poisoned".to_string()))?;
        let mut map = self.read_map().unwrap_or_default();
        map.insert(AUTH_TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn clear_token(&self) -> Result<(), AuthError> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| AuthError::Store("session lock poisoned".to_string()))?;
        let Some(mut map) = self.read_map() else {
            return Ok(());
        };
        if map.remove(AUTH_TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}
