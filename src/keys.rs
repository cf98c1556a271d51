//! Preference key catalog and identifier rename tables
//!
//! Central location for persisted key names, delimiters, and the old-to-new
//! identifier mappings applied when upgrading from schema version 0. Widget
//! identifiers and key names are kept in sync with the sibling platform
//! implementation.

/// Widget panel order preferences
pub mod panels {
    /// Top panel order, schema v0 key
    pub const TOP_ORDER_OLD: &str = "top_widget_panel_order";
    /// Top panel order, current key
    pub const TOP_ORDER: &str = "widget_top_panel_order";
    /// Bottom panel order, schema v0 key
    pub const BOTTOM_ORDER_OLD: &str = "bottom_widget_panel_order";
    /// Bottom panel order, current key
    pub const BOTTOM_ORDER: &str = "widget_bottom_panel_order";
    /// Left panel order (unchanged across schemas)
    pub const LEFT_ORDER: &str = "left_widget_panel_order";
    /// Right panel order (unchanged across schemas)
    pub const RIGHT_ORDER: &str = "right_widget_panel_order";
}

/// Widget identity and visibility preferences
pub mod widgets {
    /// Custom widget instance id list
    pub const CUSTOM_KEYS: &str = "custom_widgets_keys";
    /// Widget visibility string, `;`-delimited
    pub const VISIBILITY: &str = "map_info_controls";
    /// Separator between a base widget id and its custom-instance suffix
    pub const CUSTOM_ID_DELIMITER: &str = "__";
    /// Separator between entries of the visibility string
    pub const VISIBILITY_SEPARATOR: char = ';';
}

/// Auxiliary per-widget preference name fragments
pub mod aux_prefs {
    /// Icon visibility flag for simple widgets
    pub const SHOW_ICON: &str = "show_icon";
    /// Size style for simple widgets
    pub const SIZE_STYLE: &str = "size_style";
    /// Saved sensor device selection
    pub const DEVICE_ID: &str = "device_id";
    /// Icon visibility default
    pub const DEFAULT_SHOW_ICON: bool = true;
}

/// Saved sensor device identifiers
pub mod devices {
    /// Schema v0 sentinel for "no device selected"
    pub const OLD_NONE: &str = "trackRecordingNone";
    /// Schema v0 sentinel for "use any connected device"
    pub const OLD_ANY_CONNECTED: &str = "trackRecordingAnyConnected";
    /// Current identifier for "use any connected device"
    pub const ANY_CONNECTED_DEVICE_ID: &str = "any_connected_device_write_sensor_data_to_track_key";
}

/// Reserved key holding the persisted schema version record
pub const SCHEMA_VERSION_KEY: &str = "settings_schema_version";

/// Widget identifier renames applied by schema v1
pub const WIDGET_ID_RENAMES: &[(&str, &str)] = &[
    ("heartRate", "ant_heart_rate"),
    ("bicycleCadence", "ant_bicycle_cadence"),
    ("bicycleDistance", "ant_bicycle_distance"),
    ("bicycleSpeed", "ant_bicycle_speed"),
    ("temperature", "temperature_sensor"),
];

/// Settings key renames applied by schema v1
pub const SETTING_KEY_RENAMES: &[(&str, &str)] = &[
    (panels::TOP_ORDER_OLD, panels::TOP_ORDER),
    (panels::BOTTOM_ORDER_OLD, panels::BOTTOM_ORDER),
];

/// Settings keys whose values are delimited lists of widget identifiers
pub const WIDGET_LIST_SETTING_KEYS: &[&str] = &[
    panels::LEFT_ORDER,
    panels::RIGHT_ORDER,
    panels::TOP_ORDER,
    panels::BOTTOM_ORDER,
    widgets::CUSTOM_KEYS,
    widgets::VISIBILITY,
];

/// Look up the new base identifier for a renamed widget, if any.
#[must_use]
pub fn renamed_widget_base(base: &str) -> Option<&'static str> {
    WIDGET_ID_RENAMES
        .iter()
        .find(|(old, _)| *old == base)
        .map(|(_, new)| *new)
}

/// Look up the new name for a renamed settings key, if any.
#[must_use]
pub fn renamed_setting_key(key: &str) -> Option<&'static str> {
    SETTING_KEY_RENAMES
        .iter()
        .find(|(old, _)| *old == key)
        .map(|(_, new)| *new)
}

/// Base identifier of a widget instance id: the part before the first
/// custom-instance delimiter.
#[must_use]
pub fn base_widget_id(id: &str) -> &str {
    match id.find(widgets::CUSTOM_ID_DELIMITER) {
        Some(pos) => &id[..pos],
        None => id,
    }
}

/// Rename a widget instance id, substituting the new base identifier and
/// preserving any custom-instance suffix. Returns `None` when the base is not
/// in the rename table.
#[must_use]
pub fn rename_widget_id(id: &str) -> Option<String> {
    let base = base_widget_id(id);
    renamed_widget_base(base).map(|new_base| {
        let mut renamed = String::with_capacity(new_base.len() + id.len() - base.len());
        renamed.push_str(new_base);
        renamed.push_str(&id[base.len()..]);
        renamed
    })
}

/// Rename every entry of a widget id list, leaving unknown entries untouched.
#[must_use]
pub fn rename_widget_list(ids: &[String]) -> Vec<String> {
    ids.iter()
        .map(|id| rename_widget_id(id).unwrap_or_else(|| id.clone()))
        .collect()
}
