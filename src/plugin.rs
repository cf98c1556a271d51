//! External sensors plugin interface
//!
//! The migration engine consumes the plugin through a narrow trait: the
//! resolved "any connected device" identifier, a data-field-type lookup by
//! widget identifier, and the set of device-selection preference keys the
//! plugin registers. The shipped implementation covers the ANT/BLE sensor
//! widgets.

use crate::keys;

/// Interface the settings subsystem needs from the external sensors plugin.
#[cfg_attr(test, mockall::automock)]
pub trait SensorsPlugin {
    /// Identifier that selects whichever sensor device is currently connected.
    fn any_connected_device_id(&self) -> String;

    /// Data field type for a sensor widget, by base widget identifier.
    /// `None` for widgets the plugin does not provide.
    fn data_field_type(&self, widget_id: &str) -> Option<String>;

    /// Logical keys of the per-mode device-selection preferences the plugin
    /// registers.
    fn device_preference_keys(&self) -> Vec<String>;
}

/// The ANT/BLE sensors plugin shipped with the app.
#[derive(Debug, Default, Clone, Copy)]
pub struct AntSensorsPlugin;

impl SensorsPlugin for AntSensorsPlugin {
    fn any_connected_device_id(&self) -> String {
        keys::devices::ANY_CONNECTED_DEVICE_ID.to_string()
    }

    fn data_field_type(&self, widget_id: &str) -> Option<String> {
        let field_type = match widget_id {
            "ant_heart_rate" => "heart_rate_field_type",
            "ant_bicycle_cadence" => "bicycle_cadence_field_type",
            "ant_bicycle_distance" => "bicycle_distance_field_type",
            "ant_bicycle_speed" => "bicycle_speed_field_type",
            "temperature_sensor" => "temperature_field_type",
            _ => return None,
        };
        Some(field_type.to_string())
    }

    fn device_preference_keys(&self) -> Vec<String> {
        [
            "heart_rate_write_to_track_device",
            "bicycle_cadence_write_to_track_device",
            "bicycle_distance_write_to_track_device",
            "bicycle_speed_write_to_track_device",
            "temperature_write_to_track_device",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_types_cover_renamed_sensor_widgets() {
        let plugin = AntSensorsPlugin;
        for (_, new_id) in crate::keys::WIDGET_ID_RENAMES {
            assert!(
                plugin.data_field_type(new_id).is_some(),
                "no field type for {new_id}"
            );
        }
        assert_eq!(plugin.data_field_type("speed"), None);
    }

    #[test]
    fn test_any_connected_device_id_is_stable() {
        assert_eq!(
            AntSensorsPlugin.any_connected_device_id(),
            "any_connected_device_write_sensor_data_to_track_key"
        );
    }
}
