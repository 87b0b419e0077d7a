use chrono::NaiveDate;
use planner_core::service::statistics::max_count_value;
use planner_core::{statistics_for, Note, PlannerStore, StatisticPeriod, StatisticsScreen};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_notes(store: &PlannerStore, day: NaiveDate, count: usize) {
    for index in 0..count {
        store.insert_note(&Note::new(format!("task {index}"), day)).unwrap();
    }
}

#[test]
fn week_counts_land_on_their_weekday() {
    let store = PlannerStore::open_in_memory().unwrap();
    add_notes(&store, date(2024, 5, 13), 2);
    add_notes(&store, date(2024, 5, 19), 1);
    add_notes(&store, date(2024, 5, 12), 4);
    add_notes(&store, date(2024, 5, 20), 4);

    let buckets = statistics_for(&store, StatisticPeriod::Week, date(2024, 5, 15)).unwrap();
    let counts: Vec<u32> = buckets.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, [2, 0, 0, 0, 0, 0, 1]);
    assert_eq!(buckets[0].start, date(2024, 5, 13));
    assert_eq!(max_count_value(&buckets), 2);
}

#[test]
fn month_buckets_cover_whole_month_without_overlap() {
    let store = PlannerStore::open_in_memory().unwrap();
    add_notes(&store, date(2024, 5, 1), 1);
    add_notes(&store, date(2024, 5, 28), 1);
    add_notes(&store, date(2024, 5, 31), 2);
    add_notes(&store, date(2024, 6, 1), 3);

    let buckets = statistics_for(&store, StatisticPeriod::Month, date(2024, 5, 15)).unwrap();
    assert_eq!(buckets.len(), 4);
    let counts: Vec<u32> = buckets.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, [1, 0, 0, 3]);
    assert_eq!(buckets.iter().map(|bucket| bucket.count).sum::<u32>(), 4);
}

#[test]
fn half_year_and_year_count_by_month() {
    let store = PlannerStore::open_in_memory().unwrap();
    add_notes(&store, date(2023, 8, 10), 1);
    add_notes(&store, date(2023, 7, 31), 5);
    add_notes(&store, date(2024, 1, 31), 2);

    let half = statistics_for(&store, StatisticPeriod::HalfYear, date(2024, 1, 20)).unwrap();
    let counts: Vec<u32> = half.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, [1, 0, 0, 0, 0, 2]);

    let year = statistics_for(&store, StatisticPeriod::Year, date(2023, 3, 1)).unwrap();
    assert_eq!(year.len(), 12);
    assert_eq!(year[6].count, 5);
    assert_eq!(year[7].count, 1);
}

#[test]
fn empty_store_has_zero_counts_and_unit_max() {
    let store = PlannerStore::open_in_memory().unwrap();
    let screen = StatisticsScreen::pinned_to(&store, date(2024, 5, 15));
    assert_eq!(screen.selected_period(), StatisticPeriod::Week);
    assert!(screen.buckets().iter().all(|bucket| bucket.count == 0));
    assert_eq!(screen.max_count_value(), 1);
}

#[test]
fn screen_recounts_on_period_switch_and_change_feed() {
    let store = PlannerStore::open_in_memory().unwrap();
    let mut screen = StatisticsScreen::pinned_to(&store, date(2024, 5, 15));

    add_notes(&store, date(2024, 5, 14), 3);
    assert!(screen.sync_changes());
    assert_eq!(screen.buckets()[1].count, 3);
    assert_eq!(screen.max_count_value(), 3);

    screen.select_period(StatisticPeriod::Year);
    assert_eq!(screen.buckets().len(), 12);
    assert_eq!(screen.buckets()[4].count, 3);
}

#[test]
fn failed_period_switch_keeps_previous_period_and_buckets() {
    let store = PlannerStore::open_in_memory().unwrap();
    add_notes(&store, date(2024, 5, 13), 1);
    let mut screen = StatisticsScreen::pinned_to(&store, date(2024, 5, 15));
    let before = screen.buckets().to_vec();

    store
        .connection()
        .execute_batch("DROP TABLE notes;")
        .unwrap();
    screen.select_period(StatisticPeriod::Month);

    assert!(screen.last_error().is_some());
    assert_eq!(screen.selected_period(), StatisticPeriod::Week);
    assert_eq!(screen.buckets(), before.as_slice());
    assert_eq!(screen.buckets()[0].label, "Mon");

    screen.refresh();
    assert!(screen.last_error().is_some());
    assert_eq!(screen.selected_period(), StatisticPeriod::Week);
    assert_eq!(screen.buckets(), before.as_slice());
}
