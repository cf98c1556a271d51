//! Persisted key-value preference store
//!
//! Preferences live in an embedded sled database under the application data
//! directory. Values are bincode-encoded; per-mode preferences compose a
//! compound key from the logical key and the mode's string key. A missing key
//! or a value that does not decode as the requested type reads as absent —
//! the migration path treats both as "nothing to do".

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SettingsError};
use crate::models::ApplicationMode;

/// Handle to the persisted preference store.
///
/// Cloning is cheap; clones share the same underlying database.
#[derive(Clone)]
pub struct PreferenceStore {
    db: sled::Db,
}

impl PreferenceStore {
    /// Open (creating if needed) the preference store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db = sled::open(data_dir)
            .map_err(|e| SettingsError::Store(format!("failed to open preference store: {e}")))?;
        Ok(Self { db })
    }

    /// Compound key for a per-mode preference.
    #[must_use]
    pub fn scoped_key(key: &str, mode: ApplicationMode) -> String {
        format!("{key}_{}", mode.key())
    }

    /// Read a typed value. Absent keys and undecodable values both read as
    /// `None`.
    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => match bincode::deserialize(&bytes) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    debug!(key, error = %e, "stored value does not decode as requested type, treating as absent");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Write a typed value.
    pub fn set_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    /// Read a typed per-mode value.
    pub fn get_mode_value<T: DeserializeOwned>(
        &self,
        key: &str,
        mode: ApplicationMode,
    ) -> Result<Option<T>> {
        self.get_value(&Self::scoped_key(key, mode))
    }

    /// Write a typed per-mode value.
    pub fn set_mode_value<T: Serialize>(
        &self,
        key: &str,
        mode: ApplicationMode,
        value: &T,
    ) -> Result<()> {
        self.set_value(&Self::scoped_key(key, mode), value)
    }

    /// Whether a key is present in the store.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key.as_bytes())?)
    }

    /// Remove a key; removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.db.remove(key.as_bytes())?;
        Ok(())
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_typed_round_trip() {
        let (_dir, store) = open_temp_store();
        store.set_value("flag", &true).unwrap();
        assert_eq!(store.get_value::<bool>("flag").unwrap(), Some(true));

        let pages = vec![vec!["speed".to_string()], vec!["altitude".to_string()]];
        store.set_value("pages", &pages).unwrap();
        assert_eq!(
            store.get_value::<Vec<Vec<String>>>("pages").unwrap(),
            Some(pages)
        );
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let (_dir, store) = open_temp_store();
        assert_eq!(store.get_value::<String>("absent").unwrap(), None);
    }

    #[test]
    fn test_undecodable_value_reads_as_none() {
        let (_dir, store) = open_temp_store();
        store.set_value("flag", &true).unwrap();
        assert_eq!(store.get_value::<String>("flag").unwrap(), None);
    }

    #[test]
    fn test_mode_scoping_is_independent() {
        let (_dir, store) = open_temp_store();
        store
            .set_mode_value("visibility", ApplicationMode::Car, &"speed".to_string())
            .unwrap();
        assert_eq!(
            store
                .get_mode_value::<String>("visibility", ApplicationMode::Car)
                .unwrap()
                .as_deref(),
            Some("speed")
        );
        assert_eq!(
            store
                .get_mode_value::<String>("visibility", ApplicationMode::Bicycle)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_remove_and_contains() {
        let (_dir, store) = open_temp_store();
        store.set_value("flag", &true).unwrap();
        assert!(store.contains("flag").unwrap());
        store.remove("flag").unwrap();
        assert!(!store.contains("flag").unwrap());
        store.remove("flag").unwrap();
    }
}
