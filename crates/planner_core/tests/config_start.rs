use chrono::NaiveDate;
use planner_core::{
    logging_status, start, CoreConfig, LoggingError, Note, NoteQuery, StartupError,
};

// Logging is process-global, so every startup path runs in one test.
#[test]
fn start_brings_up_logging_and_store_once_per_process() {
    let data_dir = tempfile::tempdir().unwrap();
    let config = CoreConfig {
        data_dir: data_dir.path().to_path_buf(),
        log_level: "info".to_string(),
    };

    let store = start(&config).unwrap();
    assert!(config.db_path().exists());
    let (level, log_dir) = logging_status().unwrap();
    assert_eq!(level, "info");
    assert_eq!(log_dir, config.log_dir());

    let day = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    store.insert_note(&Note::new("boot", day)).unwrap();
    drop(store);

    let again = start(&config).unwrap();
    assert_eq!(again.count_notes(&NoteQuery::on_day(day)).unwrap(), 1);

    let other_dir = tempfile::tempdir().unwrap();
    let conflicting = CoreConfig::new(other_dir.path());
    match start(&conflicting) {
        Err(StartupError::Logging(LoggingError::Conflict { .. })) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("conflicting logging config was accepted"),
    }
    assert!(!conflicting.db_path().exists());
}
