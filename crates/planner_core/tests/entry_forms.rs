use chrono::{NaiveDate, NaiveTime};
use planner_core::model::category::{palette_len, palette_pair};
use planner_core::{CategoryDraft, FormError, NoteQuery, PlannerStore, TaskDraft};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

#[test]
fn category_draft_creates_palette_colored_category() {
    let store = PlannerStore::open_in_memory().unwrap();
    let draft = CategoryDraft {
        name: "Garden".to_string(),
    };
    assert!(draft.can_submit());

    let id = draft.submit(&store).unwrap();
    let category = store.get_category(id).unwrap().unwrap();
    assert_eq!(category.name, "Garden");
    assert!(category.created_at.is_some());
    assert!((0..palette_len()).any(|index| {
        let pair = palette_pair(index);
        pair.background == category.background && pair.text == category.text
    }));
}

#[test]
fn empty_category_draft_is_refused() {
    let store = PlannerStore::open_in_memory().unwrap();
    let draft = CategoryDraft::default();
    assert!(!draft.can_submit());
    assert!(matches!(
        draft.submit(&store),
        Err(FormError::Incomplete { field: "name" })
    ));
    assert!(store.fetch_categories().unwrap().is_empty());
}

#[test]
fn task_draft_without_category_is_refused_before_store() {
    let store = PlannerStore::open_in_memory().unwrap();
    let changes = store.subscribe();
    let draft = TaskDraft {
        name: "water plants".to_string(),
        ..TaskDraft::default()
    };

    assert!(matches!(
        draft.submit(&store, day()),
        Err(FormError::Incomplete { field: "category" })
    ));
    assert_eq!(store.count_notes(&NoteQuery::default()).unwrap(), 0);
    assert!(changes.try_recv().is_err());
}

#[test]
fn task_draft_submits_note_on_selected_day() {
    let store = PlannerStore::open_in_memory().unwrap();
    let category_id = CategoryDraft {
        name: "Garden".to_string(),
    }
    .submit(&store)
    .unwrap();

    let mut draft = TaskDraft {
        name: "water plants".to_string(),
        description: "both balconies".to_string(),
        category_id: Some(category_id),
        time: NaiveTime::from_hms_opt(19, 0, 0),
        duration_hours: 0,
        duration_minutes: 20,
    };
    let id = draft.submit(&store, day()).unwrap();
    draft.reset();
    assert_eq!(draft, TaskDraft::default());

    let note = store.get_note(id).unwrap().unwrap();
    assert_eq!(note.day, day());
    assert_eq!(note.duration_minutes, 20);
    assert_eq!(note.description.as_deref(), Some("both balconies"));
    assert_eq!(note.category_id, Some(category_id));
    assert_eq!(note.time_range_label(), "19:00-19:20");
}
