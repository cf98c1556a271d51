//! Typed preference registry
//!
//! Every preference the migration engine touches goes through a typed
//! accessor: a logical key plus a default value, scoped per application mode.
//! `AppSettings` registers the full set and validates it at startup, so key
//! names are checked once instead of being formatted ad hoc at every call
//! site.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, SettingsError};
use crate::keys;
use crate::models::ApplicationMode;
use crate::store::PreferenceStore;
use crate::validation::InputValidator;

/// Typed accessor for a per-mode preference.
#[derive(Debug, Clone)]
pub struct Preference<T> {
    key: String,
    default: T,
}

impl<T> Preference<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
{
    /// Define a preference with its logical key and default value.
    pub fn new(key: impl Into<String>, default: T) -> Self {
        Self {
            key: key.into(),
            default,
        }
    }

    /// Logical key of this preference.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Default value returned when nothing is stored.
    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Storage key for `mode`.
    #[must_use]
    pub fn storage_key(&self, mode: ApplicationMode) -> String {
        PreferenceStore::scoped_key(&self.key, mode)
    }

    /// Stored value for `mode`, or the default when absent.
    pub fn get(&self, store: &PreferenceStore, mode: ApplicationMode) -> Result<T> {
        Ok(self
            .get_opt(store, mode)?
            .unwrap_or_else(|| self.default.clone()))
    }

    /// Stored value for `mode`, `None` when absent.
    pub fn get_opt(&self, store: &PreferenceStore, mode: ApplicationMode) -> Result<Option<T>> {
        store.get_value(&self.storage_key(mode))
    }

    /// Write the value for `mode`.
    pub fn set(&self, store: &PreferenceStore, mode: ApplicationMode, value: &T) -> Result<()> {
        store.set_value(&self.storage_key(mode), value)
    }

    /// Write the value for `mode` only when it differs from what is stored.
    /// Returns whether a write happened.
    pub fn set_if_changed(
        &self,
        store: &PreferenceStore,
        mode: ApplicationMode,
        value: &T,
    ) -> Result<bool> {
        if self.get_opt(store, mode)?.as_ref() == Some(value) {
            return Ok(false);
        }
        self.set(store, mode, value)?;
        Ok(true)
    }
}

/// The registered set of widget preferences.
///
/// Keys are validated once at construction: well-formed and unique.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Top panel order under the schema v0 key
    pub top_widget_panel_order_old: Preference<Vec<Vec<String>>>,
    /// Top panel order under the current key
    pub top_widget_panel_order: Preference<Vec<Vec<String>>>,
    /// Bottom panel order under the schema v0 key
    pub bottom_widget_panel_order_old: Preference<Vec<Vec<String>>>,
    /// Bottom panel order under the current key
    pub bottom_widget_panel_order: Preference<Vec<Vec<String>>>,
    /// Left panel order
    pub left_widget_panel_order: Preference<Vec<Vec<String>>>,
    /// Right panel order
    pub right_widget_panel_order: Preference<Vec<Vec<String>>>,
    /// Custom widget instance ids
    pub custom_widget_keys: Preference<Vec<String>>,
    /// Widget visibility string, `;`-delimited
    pub map_info_controls: Preference<String>,
}

impl AppSettings {
    /// Register the known preferences and validate the key set.
    pub fn new() -> Result<Self> {
        let settings = Self {
            top_widget_panel_order_old: Preference::new(keys::panels::TOP_ORDER_OLD, Vec::new()),
            top_widget_panel_order: Preference::new(keys::panels::TOP_ORDER, Vec::new()),
            bottom_widget_panel_order_old: Preference::new(
                keys::panels::BOTTOM_ORDER_OLD,
                Vec::new(),
            ),
            bottom_widget_panel_order: Preference::new(keys::panels::BOTTOM_ORDER, Vec::new()),
            left_widget_panel_order: Preference::new(keys::panels::LEFT_ORDER, Vec::new()),
            right_widget_panel_order: Preference::new(keys::panels::RIGHT_ORDER, Vec::new()),
            custom_widget_keys: Preference::new(keys::widgets::CUSTOM_KEYS, Vec::new()),
            map_info_controls: Preference::new(keys::widgets::VISIBILITY, String::new()),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Logical keys of every registered preference.
    #[must_use]
    pub fn registered_keys(&self) -> Vec<&str> {
        vec![
            self.top_widget_panel_order_old.key(),
            self.top_widget_panel_order.key(),
            self.bottom_widget_panel_order_old.key(),
            self.bottom_widget_panel_order.key(),
            self.left_widget_panel_order.key(),
            self.right_widget_panel_order.key(),
            self.custom_widget_keys.key(),
            self.map_info_controls.key(),
        ]
    }

    fn validate(&self) -> Result<()> {
        let keys = self.registered_keys();
        let mut seen = std::collections::HashSet::new();
        for key in keys {
            InputValidator::validate_preference_key(key)
                .map_err(|e| SettingsError::InvalidKey(e.to_string()))?;
            if !seen.insert(key) {
                return Err(SettingsError::InvalidKey(format!(
                    "duplicate preference key: {key}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_validates() {
        let settings = AppSettings::new().unwrap();
        assert_eq!(settings.registered_keys().len(), 8);
    }

    #[test]
    fn test_get_returns_default_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path()).unwrap();
        let settings = AppSettings::new().unwrap();

        let pages = settings
            .top_widget_panel_order
            .get(&store, ApplicationMode::Car)
            .unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_set_if_changed_skips_equal_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path()).unwrap();
        let pref: Preference<String> = Preference::new("visibility_test", String::new());

        assert!(pref
            .set_if_changed(&store, ApplicationMode::Car, &"speed".to_string())
            .unwrap());
        assert!(!pref
            .set_if_changed(&store, ApplicationMode::Car, &"speed".to_string())
            .unwrap());
        assert!(pref
            .set_if_changed(&store, ApplicationMode::Car, &"altitude".to_string())
            .unwrap());
    }
}
