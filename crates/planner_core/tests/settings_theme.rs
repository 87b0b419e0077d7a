use planner_core::service::settings::BACKGROUND_KEY;
use planner_core::{BackgroundTheme, PlannerStore, SettingsService, StoreChange};

#[test]
fn unset_preference_loads_as_dark() {
    let store = PlannerStore::open_in_memory().unwrap();
    let settings = SettingsService::new(&store);
    assert_eq!(settings.background(), BackgroundTheme::Dark);
    assert!(settings.last_error().is_none());
}

#[test]
fn selected_theme_persists_for_next_service() {
    let store = PlannerStore::open_in_memory().unwrap();
    let changes = store.subscribe();

    let mut settings = SettingsService::new(&store);
    settings.set_background(BackgroundTheme::Purple);
    assert_eq!(changes.try_recv().unwrap(), StoreChange::SettingChanged);
    assert_eq!(store.setting_int(BACKGROUND_KEY).unwrap(), Some(2));

    let reloaded = SettingsService::new(&store);
    assert_eq!(reloaded.background(), BackgroundTheme::Purple);
}

#[test]
fn out_of_range_code_falls_back_to_dark() {
    let store = PlannerStore::open_in_memory().unwrap();
    store.set_setting_int(BACKGROUND_KEY, 42).unwrap();

    let settings = SettingsService::new(&store);
    assert_eq!(settings.background(), BackgroundTheme::Dark);
}

#[test]
fn preference_survives_reopening_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.sqlite3");
    {
        let store = PlannerStore::open(&path).unwrap();
        SettingsService::new(&store).set_background(BackgroundTheme::Navy);
    }

    let store = PlannerStore::open(&path).unwrap();
    assert_eq!(SettingsService::new(&store).background(), BackgroundTheme::Navy);
}

#[test]
fn theme_serializes_as_snake_case() {
    let json = serde_json::to_string(&BackgroundTheme::Navy).unwrap();
    assert_eq!(json, "\"navy\"");
    let parsed: BackgroundTheme = serde_json::from_str("\"blue\"").unwrap();
    assert_eq!(parsed, BackgroundTheme::Blue);
}

#[test]
fn failed_save_keeps_previous_theme() {
    let store = PlannerStore::open_in_memory().unwrap();
    let mut settings = SettingsService::new(&store);
    settings.set_background(BackgroundTheme::Purple);

    store
        .connection()
        .execute_batch("DROP TABLE settings;")
        .unwrap();
    settings.set_background(BackgroundTheme::Blue);

    assert_eq!(settings.background(), BackgroundTheme::Purple);
    assert!(settings.last_error().is_some());
}
