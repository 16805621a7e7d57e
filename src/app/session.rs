//! Fake-account session and the key-value file it is persisted in.
//!
//! The session is an ordinary value owned by `AppState`; it is loaded once
//! at startup and cleared on logout. Nothing here checks credentials.
//!
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Context, Result};
use crate::model::FakeAccount;

/// Storage key of the serialized current account.
pub const AUTH_USER_KEY: &str = "auth_user";
pub const STORAGE_FILE: &str = "storage.json";

/// String-to-string store backed by one JSON object on disk.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/storage.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_ctx(|| format!("read {}", self.path.display()))?;
        Ok(Some(raw).filter(|r| !r.trim().is_empty()))
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw()? {
            Some(raw) => {
                serde_json::from_str(&raw).with_ctx(|| format!("parse {}", self.path.display()))
            }
            None => Ok(BTreeMap::new()),
        }
    }

    /// Current contents as the base for a write. Unparseable content is
    /// replaced; a file that cannot be read aborts the write.
    fn map_for_write(&self) -> Result<BTreeMap<String, String>> {
        let Some(raw) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "replacing corrupt storage file");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_ctx(|| format!("create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(map).with_ctx(|| "encode storage".to_string())?;
        fs::write(&self.path, raw).with_ctx(|| format!("write {}", self.path.display()))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.map_for_write()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        let mut map = self.map_for_write()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Who is logged in, if anyone.
#[derive(Debug, Default)]
pub struct Session {
    storage: Option<LocalStorage>,
    user: Option<FakeAccount>,
}

impl Session {
    /// Session that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restore the stored account. Unreadable or malformed records count as logged out.
    pub fn load(storage: LocalStorage) -> Self {
        let user = match storage.get_item(AUTH_USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<FakeAccount>(&raw) {
                Ok(account) => Some(account),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring malformed stored account");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "cannot read session storage");
                None
            }
        };
        if let Some(account) = &user {
            tracing::info!(account = %account.email, "restored session");
        }
        Self {
            storage: Some(storage),
            user,
        }
    }

    pub fn user(&self) -> Option<&FakeAccount> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Log in as `account`. The in-memory session changes even if persisting fails.
    pub fn login(&mut self, account: FakeAccount) -> Result<()> {
        tracing::info!(account = %account.email, role = %account.role, "login");
        let encoded = serde_json::to_string(&account).with_ctx(|| "encode account".to_string());
        self.user = Some(account);
        if let Some(storage) = &self.storage {
            storage.set_item(AUTH_USER_KEY, &encoded?)?;
        }
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(account) = self.user.take() {
            tracing::info!(account = %account.email, "logout");
        }
        if let Some(storage) = &self.storage {
            storage.remove_item(AUTH_USER_KEY)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fake_accounts;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_storage(tag: &str) -> LocalStorage {
        let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("userdeck_{tag}_{}_{nonce}.json", std::process::id()));
        LocalStorage::new(path)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let storage = temp_storage("missing");
        assert_eq!(storage.get_item(AUTH_USER_KEY).unwrap(), None);
    }

    #[test]
    fn login_survives_reload_and_logout_clears() {
        let storage = temp_storage("reload");
        let account = fake_accounts().remove(1);

        let mut session = Session::load(storage.clone());
        assert!(!session.is_authenticated());
        session.login(account.clone()).unwrap();

        let restored = Session::load(storage.clone());
        assert_eq!(restored.user(), Some(&account));

        let mut restored = restored;
        restored.logout().unwrap();
        assert!(!restored.is_authenticated());
        assert_eq!(storage.get_item(AUTH_USER_KEY).unwrap(), None);
        let _ = fs::remove_file(storage.path());
    }

    #[test]
    fn malformed_record_means_logged_out() {
        let storage = temp_storage("corrupt");
        storage.set_item(AUTH_USER_KEY, "{not json").unwrap();
        let session = Session::load(storage.clone());
        assert!(session.user().is_none());
        let _ = fs::remove_file(storage.path());
    }

    #[test]
    fn corrupt_file_is_replaced_on_write() {
        let storage = temp_storage("rewrite");
        fs::write(storage.path(), "{not json").unwrap();
        assert!(storage.get_item(AUTH_USER_KEY).is_err());
        storage.set_item(AUTH_USER_KEY, "v").unwrap();
        assert_eq!(storage.get_item(AUTH_USER_KEY).unwrap().as_deref(), Some("v"));
        let _ = fs::remove_file(storage.path());
    }

    #[test]
    fn unreadable_file_is_not_overwritten() {
        let storage = temp_storage("unreadable");
        // A directory at the storage path cannot be read as a file.
        fs::create_dir(storage.path()).unwrap();
        assert!(storage.set_item(AUTH_USER_KEY, "v").is_err());
        assert!(storage.remove_item(AUTH_USER_KEY).is_err());
        assert!(storage.path().is_dir());
        let _ = fs::remove_dir(storage.path());
    }

    #[test]
    fn other_keys_are_kept() {
        let storage = temp_storage("keys");
        storage.set_item("theme", "dark").unwrap();
        storage.set_item(AUTH_USER_KEY, "x").unwrap();
        storage.remove_item(AUTH_USER_KEY).unwrap();
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
        let _ = fs::remove_file(storage.path());
    }
}
