//! Integration tests for the preference store and typed registry

use waymark_settings::models::ApplicationMode;
use waymark_settings::registry::{AppSettings, Preference};
use waymark_settings::store::PreferenceStore;

#[test]
fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = PreferenceStore::open(dir.path()).unwrap();
        store
            .set_value("visibility", &"speed;altitude".to_string())
            .unwrap();
        store.flush().unwrap();
    }

    let store = PreferenceStore::open(dir.path()).unwrap();
    assert_eq!(
        store.get_value::<String>("visibility").unwrap().as_deref(),
        Some("speed;altitude")
    );
}

#[test]
fn test_registry_preferences_are_mode_scoped() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::open(dir.path()).unwrap();
    let settings = AppSettings::new().unwrap();

    settings
        .custom_widget_keys
        .set(&store, ApplicationMode::Car, &vec!["speed".to_string()])
        .unwrap();

    assert_eq!(
        settings
            .custom_widget_keys
            .get_opt(&store, ApplicationMode::Car)
            .unwrap(),
        Some(vec!["speed".to_string()])
    );
    assert_eq!(
        settings
            .custom_widget_keys
            .get_opt(&store, ApplicationMode::Pedestrian)
            .unwrap(),
        None
    );
}

#[test]
fn test_preference_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::open(dir.path()).unwrap();
    let pref: Preference<String> = Preference::new("visibility", "speed".to_string());

    assert_eq!(
        pref.get(&store, ApplicationMode::Default).unwrap(),
        "speed"
    );
    assert_eq!(pref.get_opt(&store, ApplicationMode::Default).unwrap(), None);
}

#[test]
fn test_set_if_changed_avoids_redundant_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::open(dir.path()).unwrap();
    let pref: Preference<Vec<String>> = Preference::new("page_order", Vec::new());
    let mode = ApplicationMode::Default;

    let order = vec!["speed".to_string(), "altitude".to_string()];
    assert!(pref.set_if_changed(&store, mode, &order).unwrap());
    assert!(!pref.set_if_changed(&store, mode, &order).unwrap());

    let reordered = vec!["altitude".to_string(), "speed".to_string()];
    assert!(pref.set_if_changed(&store, mode, &reordered).unwrap());
}

#[test]
fn test_type_mismatch_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::open(dir.path()).unwrap();

    store.set_value("flag", &true).unwrap();
    assert_eq!(store.get_value::<String>("flag").unwrap(), None);
    // The stored value is still intact under its real type
    assert_eq!(store.get_value::<bool>("flag").unwrap(), Some(true));
}
