//! Versioned settings migration engine
//!
//! Runs once on the startup path, before anything else reads the preference
//! store. The store carries a persisted schema version record; every step
//! newer than the recorded version runs in ascending order, and the record is
//! advanced after each step, so each step executes at most once per
//! installation. Fresh installs are stamped with the current version and
//! nothing is rewritten.
//!
//! Absent preferences, an absent plugin, or values of an unexpected type are
//! "nothing to migrate": the affected step is skipped silently. Only
//! storage-layer failures surface as errors.

use tracing::{debug, info};

use crate::error::Result;
use crate::keys;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{ApplicationMode, SchemaVersionRecord, WidgetSizeStyle};
use crate::plugin::{AntSensorsPlugin, SensorsPlugin};
use crate::registry::{AppSettings, Preference};
use crate::store::PreferenceStore;

/// Schema version the current build writes and expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A single migration step.
struct MigrationStep {
    /// Schema version this step upgrades the store to
    version: u32,
    /// Stable step name, used in logs and metrics
    name: &'static str,
    /// The rewrite pass; returns the number of preferences rewritten
    run: fn(&MigrationContext) -> Result<u64>,
}

/// Everything a migration step may touch.
struct MigrationContext<'a> {
    store: &'a PreferenceStore,
    settings: &'a AppSettings,
    plugin: Option<&'a dyn SensorsPlugin>,
}

/// All migration steps in ascending version order.
fn migration_steps() -> Vec<MigrationStep> {
    vec![MigrationStep {
        version: 1,
        name: "change_widget_ids",
        run: migrate_widget_ids_v1,
    }]
}

/// Settings migration engine over a preference store.
pub struct Migrator {
    store: PreferenceStore,
    settings: AppSettings,
    plugin: Option<Box<dyn SensorsPlugin>>,
    metrics: MetricsCollector,
}

impl Migrator {
    /// Build a migrator with the shipped sensors plugin.
    pub fn new(store: PreferenceStore) -> Result<Self> {
        Self::with_plugin(store, Some(Box::new(AntSensorsPlugin)))
    }

    /// Build a migrator with an explicit plugin, or none when the plugin is
    /// not installed.
    pub fn with_plugin(
        store: PreferenceStore,
        plugin: Option<Box<dyn SensorsPlugin>>,
    ) -> Result<Self> {
        Ok(Self {
            store,
            settings: AppSettings::new()?,
            plugin,
            metrics: MetricsCollector::default(),
        })
    }

    /// Schema version the store currently conforms to; 0 when no record has
    /// ever been written.
    pub fn schema_version(&self) -> Result<u32> {
        Ok(self
            .store
            .get_value::<SchemaVersionRecord>(keys::SCHEMA_VERSION_KEY)?
            .map_or(0, |record| record.version))
    }

    /// Run pending migrations, if any.
    ///
    /// On first launch the store is stamped with the current schema version
    /// and nothing is rewritten; fresh installs already use current keys.
    pub fn migrate_if_needed(&self, is_first_launch: bool) -> Result<()> {
        if is_first_launch {
            self.write_version(CURRENT_SCHEMA_VERSION)?;
            self.store.flush()?;
            debug!(
                version = CURRENT_SCHEMA_VERSION,
                "fresh install, stamped current schema version"
            );
            return Ok(());
        }

        let stored = self.schema_version()?;
        if stored >= CURRENT_SCHEMA_VERSION {
            debug!(version = stored, "settings schema is current");
            return Ok(());
        }

        let timer = OperationTimer::new("settings_migration");
        let pass_start = std::time::Instant::now();

        for step in migration_steps() {
            if step.version <= stored {
                continue;
            }
            let ctx = MigrationContext {
                store: &self.store,
                settings: &self.settings,
                plugin: self.plugin.as_deref(),
            };
            let rewritten = (step.run)(&ctx)?;
            self.write_version(step.version)?;
            self.metrics.record_migration_step(step.name, rewritten);
            info!(
                step = step.name,
                version = step.version,
                rewritten,
                "applied settings migration"
            );
        }

        self.store.flush()?;
        self.metrics.record_migration_pass(pass_start.elapsed());
        timer.finish();
        Ok(())
    }

    fn write_version(&self, version: u32) -> Result<()> {
        self.store
            .set_value(keys::SCHEMA_VERSION_KEY, &SchemaVersionRecord::now(version))
    }
}

/// Schema v1: rename sensor widget identifiers and panel keys, in sync with
/// the sibling platform.
fn migrate_widget_ids_v1(ctx: &MigrationContext) -> Result<u64> {
    let settings = ctx.settings;
    let mut rewritten = 0;

    for mode in ApplicationMode::ALL {
        rewritten += update_panel_order(
            ctx,
            mode,
            &settings.top_widget_panel_order_old,
            Some(&settings.top_widget_panel_order),
        )?;
        rewritten += update_panel_order(
            ctx,
            mode,
            &settings.bottom_widget_panel_order_old,
            Some(&settings.bottom_widget_panel_order),
        )?;
        rewritten += update_panel_order(ctx, mode, &settings.left_widget_panel_order, None)?;
        rewritten += update_panel_order(ctx, mode, &settings.right_widget_panel_order, None)?;

        rewritten += update_custom_widget_keys(ctx, mode)?;
        rewritten += update_widget_visibility(ctx, mode)?;
        rewritten += rewrite_device_sentinels(ctx, mode)?;
    }

    Ok(rewritten)
}

/// Rewrite one panel order. Orders moving to a new key are written to the new
/// key whenever the old key holds pages; orders keeping their key are written
/// back only when an entry actually changed.
fn update_panel_order(
    ctx: &MigrationContext,
    mode: ApplicationMode,
    pref: &Preference<Vec<Vec<String>>>,
    new_pref: Option<&Preference<Vec<Vec<String>>>>,
) -> Result<u64> {
    let Some(pages) = pref.get_opt(ctx.store, mode)? else {
        return Ok(0);
    };

    if new_pref.is_none()
        && !pages
            .iter()
            .flatten()
            .any(|id| keys::renamed_widget_base(keys::base_widget_id(id)).is_some())
    {
        return Ok(0);
    }

    let new_pages: Vec<Vec<String>> = pages
        .iter()
        .map(|page| keys::rename_widget_list(page))
        .collect();

    let mut rewritten = 0;
    if new_pages != pages {
        pref.set(ctx.store, mode, &new_pages)?;
        rewritten += 1;
        debug!(key = pref.key(), mode = mode.key(), "renamed panel order entries");
    }
    if let Some(new_pref) = new_pref {
        new_pref.set(ctx.store, mode, &new_pages)?;
        rewritten += 1;
    }
    Ok(rewritten)
}

fn update_custom_widget_keys(ctx: &MigrationContext, mode: ApplicationMode) -> Result<u64> {
    let Some(custom_ids) = ctx.settings.custom_widget_keys.get_opt(ctx.store, mode)? else {
        return Ok(0);
    };
    if !custom_ids
        .iter()
        .any(|id| keys::renamed_widget_base(keys::base_widget_id(id)).is_some())
    {
        return Ok(0);
    }

    let new_ids = keys::rename_widget_list(&custom_ids);
    if new_ids == custom_ids {
        return Ok(0);
    }
    ctx.settings
        .custom_widget_keys
        .set(ctx.store, mode, &new_ids)?;
    debug!(mode = mode.key(), "renamed custom widget keys");
    Ok(1)
}

/// Rewrite the visibility string; when it changed, also move the auxiliary
/// per-widget preferences of every renamed entry to their new compound keys.
fn update_widget_visibility(ctx: &MigrationContext, mode: ApplicationMode) -> Result<u64> {
    let Some(visibility) = ctx.settings.map_info_controls.get_opt(ctx.store, mode)? else {
        return Ok(0);
    };

    let entries: Vec<String> = visibility
        .split(keys::widgets::VISIBILITY_SEPARATOR)
        .map(ToString::to_string)
        .collect();
    if !entries
        .iter()
        .any(|id| keys::renamed_widget_base(keys::base_widget_id(id)).is_some())
    {
        return Ok(0);
    }

    let new_entries = keys::rename_widget_list(&entries);
    if new_entries == entries {
        return Ok(0);
    }

    let joined = new_entries.join(&keys::widgets::VISIBILITY_SEPARATOR.to_string());
    ctx.settings
        .map_info_controls
        .set(ctx.store, mode, &joined)?;
    debug!(mode = mode.key(), "renamed visibility entries");

    Ok(1 + migrate_widget_aux_prefs(ctx, mode, &entries)?)
}

/// Move the icon-visibility, size-style, and device-selection preferences of
/// renamed widgets from old compound keys to new ones, copying a value only
/// when it differs from the default.
fn migrate_widget_aux_prefs(
    ctx: &MigrationContext,
    mode: ApplicationMode,
    old_ids: &[String],
) -> Result<u64> {
    let mut moved = 0;

    for old_id in old_ids {
        let base = keys::base_widget_id(old_id);
        let Some(new_base) = keys::renamed_widget_base(base) else {
            continue;
        };
        let mut new_id = String::with_capacity(new_base.len() + old_id.len() - base.len());
        new_id.push_str(new_base);
        new_id.push_str(&old_id[base.len()..]);

        let old_icon_key = aux_pref_key(old_id, keys::aux_prefs::SHOW_ICON, mode);
        if let Some(show_icon) = ctx.store.get_value::<bool>(&old_icon_key)? {
            if show_icon != keys::aux_prefs::DEFAULT_SHOW_ICON {
                let new_key = aux_pref_key(&new_id, keys::aux_prefs::SHOW_ICON, mode);
                ctx.store.set_value(&new_key, &show_icon)?;
                moved += 1;
            }
        }

        let old_style_key = aux_pref_key(old_id, keys::aux_prefs::SIZE_STYLE, mode);
        if let Some(style) = ctx.store.get_value::<WidgetSizeStyle>(&old_style_key)? {
            if style != WidgetSizeStyle::default() {
                let new_key = aux_pref_key(&new_id, keys::aux_prefs::SIZE_STYLE, mode);
                ctx.store.set_value(&new_key, &style)?;
                moved += 1;
            }
        }

        if let Some(plugin) = ctx.plugin {
            let old_device_key = aux_pref_key(old_id, keys::aux_prefs::DEVICE_ID, mode);
            if let Some(device) = ctx.store.get_value::<String>(&old_device_key)? {
                if let Some(field_type) = plugin.data_field_type(new_base) {
                    if device != plugin.any_connected_device_id() {
                        let new_key = format!("{field_type}_{new_id}_{}", mode.key());
                        ctx.store.set_value(&new_key, &device)?;
                        moved += 1;
                    }
                }
            }
        }
    }

    Ok(moved)
}

/// Replace old saved-device sentinels in the plugin's device-selection
/// preferences.
fn rewrite_device_sentinels(ctx: &MigrationContext, mode: ApplicationMode) -> Result<u64> {
    let Some(plugin) = ctx.plugin else {
        return Ok(0);
    };

    let mut rewritten = 0;
    for key in plugin.device_preference_keys() {
        let scoped = PreferenceStore::scoped_key(&key, mode);
        let Some(value) = ctx.store.get_value::<String>(&scoped)? else {
            continue;
        };
        if value == keys::devices::OLD_NONE {
            ctx.store.set_value(&scoped, &String::new())?;
            rewritten += 1;
        } else if value == keys::devices::OLD_ANY_CONNECTED {
            ctx.store
                .set_value(&scoped, &plugin.any_connected_device_id())?;
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

fn aux_pref_key(widget_id: &str, aux: &str, mode: ApplicationMode) -> String {
    format!("{widget_id}_{aux}_{}", mode.key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::MockSensorsPlugin;

    fn open_temp_store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_sentinel_rewrite_uses_plugin_device_id() {
        let (_dir, store) = open_temp_store();
        let none_key = PreferenceStore::scoped_key("sensor_device", ApplicationMode::Default);
        let any_key = PreferenceStore::scoped_key("sensor_device", ApplicationMode::Car);
        store
            .set_value(&none_key, &keys::devices::OLD_NONE.to_string())
            .unwrap();
        store
            .set_value(&any_key, &keys::devices::OLD_ANY_CONNECTED.to_string())
            .unwrap();

        let mut plugin = MockSensorsPlugin::new();
        plugin
            .expect_device_preference_keys()
            .return_const(vec!["sensor_device".to_string()]);
        plugin
            .expect_any_connected_device_id()
            .return_const("mock_any_device".to_string());

        let migrator = Migrator::with_plugin(store.clone(), Some(Box::new(plugin))).unwrap();
        migrator.migrate_if_needed(false).unwrap();

        assert_eq!(
            store.get_value::<String>(&none_key).unwrap().as_deref(),
            Some("")
        );
        assert_eq!(
            store.get_value::<String>(&any_key).unwrap().as_deref(),
            Some("mock_any_device")
        );
    }

    #[test]
    fn test_absent_plugin_leaves_sentinels_untouched() {
        let (_dir, store) = open_temp_store();
        let key = PreferenceStore::scoped_key("sensor_device", ApplicationMode::Default);
        store
            .set_value(&key, &keys::devices::OLD_NONE.to_string())
            .unwrap();

        let migrator = Migrator::with_plugin(store.clone(), None).unwrap();
        migrator.migrate_if_needed(false).unwrap();

        assert_eq!(
            store.get_value::<String>(&key).unwrap().as_deref(),
            Some(keys::devices::OLD_NONE)
        );
        assert_eq!(migrator.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_device_pref_move_uses_field_type_lookup() {
        let (_dir, store) = open_temp_store();
        let mode = ApplicationMode::Default;
        let settings = AppSettings::new().unwrap();
        settings
            .map_info_controls
            .set(&store, mode, &"heartRate".to_string())
            .unwrap();
        store
            .set_value(
                &aux_pref_key("heartRate", keys::aux_prefs::DEVICE_ID, mode),
                &"device-123".to_string(),
            )
            .unwrap();

        let mut plugin = MockSensorsPlugin::new();
        plugin.expect_device_preference_keys().return_const(vec![]);
        plugin
            .expect_any_connected_device_id()
            .return_const("mock_any_device".to_string());
        plugin
            .expect_data_field_type()
            .returning(|id| (id == "ant_heart_rate").then(|| "heart_rate_field_type".to_string()));

        let migrator = Migrator::with_plugin(store.clone(), Some(Box::new(plugin))).unwrap();
        migrator.migrate_if_needed(false).unwrap();

        assert_eq!(
            store
                .get_value::<String>(&format!("heart_rate_field_type_ant_heart_rate_{}", mode.key()))
                .unwrap()
                .as_deref(),
            Some("device-123")
        );
    }
}
