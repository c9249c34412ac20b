//! Client storage and the admin session gate
//!
//! The gate is a UI convenience: the credential pair ships with the client
//! and is not authentication. Authorization is one string flag persisted in
//! client storage so it survives restarts.
//!
//! ```text
//! Anonymous --[credential match]--> Authorized --[logout]--> Anonymous
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::{APP_DIR_NAME, VaultConfig};
use crate::error::{Error, Result};

/// Storage key of the session flag
pub const SESSION_KEY: &str = "luxe_auth";

/// The only value the flag is ever set to
const AUTHORIZED_VALUE: &str = "true";

/// Persistent string key-value storage
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile storage for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
        Ok(())
    }
}

/// JSON object file, one string per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{data_dir}/LuxeArchive/storage.json`
    pub fn default_location() -> Result<Self> {
        dirs::data_local_dir()
            .map(|dir| Self::new(dir.join(APP_DIR_NAME).join("storage.json")))
            .ok_or(Error::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn store(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.store(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.load();
        if values.remove(key).is_some() {
            self.store(&values)?;
        }
        Ok(())
    }
}

/// The credential pair the gate compares against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub passcode: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            passcode: passcode.into(),
        }
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self::new(&config.admin_identifier, &config.admin_passcode)
    }

    /// Exact match on both fields
    pub fn matches(&self, identifier: &str, passcode: &str) -> bool {
        self.identifier == identifier && self.passcode == passcode
    }
}

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authorized,
}

/// Navigable locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Storefront,
    Admin,
}

/// Session context handed to the screens that need the gate.
///
/// Created once at application mount; cloning shares the same storage.
#[derive(Clone)]
pub struct SessionContext {
    storage: Arc<dyn ClientStorage>,
    credentials: Credentials,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn ClientStorage>, credentials: Credentials) -> Self {
        Self {
            storage,
            credentials,
        }
    }

    /// Current state, read through to storage
    pub fn state(&self) -> SessionState {
        match self.storage.get(SESSION_KEY).as_deref() {
            Some(AUTHORIZED_VALUE) => SessionState::Authorized,
            _ => SessionState::Anonymous,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.state() == SessionState::Authorized
    }

    /// Check the pair and persist the flag on a match.
    ///
    /// A mismatch leaves storage untouched.
    pub fn login(&self, identifier: &str, passcode: &str) -> Result<SessionState> {
        if !self.credentials.matches(identifier, passcode) {
            tracing::warn!("Rejected admin login attempt");
            return Err(Error::AuthorizationFailed);
        }
        self.storage.set(SESSION_KEY, AUTHORIZED_VALUE)?;
        tracing::info!("Admin session authorized");
        Ok(SessionState::Authorized)
    }

    pub fn logout(&self) -> Result<SessionState> {
        self.storage.remove(SESSION_KEY)?;
        tracing::info!("Admin session cleared");
        Ok(SessionState::Anonymous)
    }

    /// Where a navigation request actually lands
    pub fn resolve(&self, requested: Route) -> Route {
        match (requested, self.state()) {
            (Route::Admin, SessionState::Anonymous) => Route::Storefront,
            (route, _) => route,
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn credentials() -> Credentials {
        Credentials::new("vault@archive.luxe", "open sesame")
    }

    #[test]
    fn test_login_persists_flag_across_contexts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");

        let session = SessionContext::new(Arc::new(FileStorage::new(&path)), credentials());
        assert_eq!(session.resolve(Route::Admin), Route::Storefront);
        session.login("vault@archive.luxe", "open sesame").unwrap();

        // A fresh context over the same file models an application restart
        let reloaded = SessionContext::new(Arc::new(FileStorage::new(&path)), credentials());
        assert!(reloaded.is_authorized());
        assert_eq!(reloaded.resolve(Route::Admin), Route::Admin);
    }

    #[test]
    fn test_wrong_credentials_leave_flag_unset() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::new(storage.clone(), credentials());

        let err = session.login("vault@archive.luxe", "wrong").unwrap_err();
        assert_eq!(err.to_string(), "Authorization Failed.");
        assert_eq!(storage.get(SESSION_KEY), None);
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_logout_clears_flag() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::new(storage.clone(), credentials());
        session.login("vault@archive.luxe", "open sesame").unwrap();

        session.logout().unwrap();
        assert_eq!(storage.get(SESSION_KEY), None);
        assert_eq!(session.resolve(Route::Admin), Route::Storefront);
    }

    #[test]
    fn test_only_exact_true_authorizes() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(SESSION_KEY, "yes").unwrap();
        let session = SessionContext::new(storage, credentials());
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_file_storage_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("s.json"));
        storage.remove(SESSION_KEY).unwrap();
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("v"));
    }
}
