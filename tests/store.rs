mod common;

use common::{date, make_entry};
use nutrilog::db::DiaryStore;
use nutrilog::error::DietError;
use nutrilog::models::entry::{EntryPatch, MealSlot};

#[test]
fn test_append_returns_positions_and_creates_day() {
    let (_dir, db) = common::setup_db();
    let d = date(2026, 3, 1);
    assert!(db.day_log(d).unwrap().is_none());

    let i0 = db.append_entry(d, MealSlot::Lunch, &make_entry("a", 100.0, 1.0, 100.0)).unwrap();
    let i1 = db.append_entry(d, MealSlot::Lunch, &make_entry("b", 100.0, 1.0, 100.0)).unwrap();
    let j0 = db.append_entry(d, MealSlot::Dinner, &make_entry("c", 100.0, 1.0, 100.0)).unwrap();
    assert_eq!((i0, i1, j0), (0, 1, 0));

    let day = db.day_log(d).unwrap().unwrap();
    assert_eq!(day.meals.lunch.len(), 2);
    assert_eq!(day.meals.dinner.len(), 1);
    assert_eq!(day.meals.lunch[1].name.as_deref(), Some("b"));
}

/// Scenario: Given three lunch entries, When the first is deleted,
/// Then the remaining entries move up one position.
#[test]
fn test_delete_shifts_later_indices() {
    let (_dir, db) = common::setup_db();
    let d = date(2026, 3, 2);
    for name in ["a", "b", "c"] {
        db.append_entry(d, MealSlot::Lunch, &make_entry(name, 50.0, 1.0, 100.0))
            .unwrap();
    }

    db.delete_entry(d, MealSlot::Lunch, 0).unwrap();
    let day = db.day_log(d).unwrap().unwrap();
    let names: Vec<_> = day.meals.lunch.iter().map(|e| e.name.clone().unwrap()).collect();
    assert_eq!(names, ["b", "c"]);

    // "c" now lives at index 1.
    db.update_entry(d, MealSlot::Lunch, 1, &EntryPatch::serving(250.0))
        .unwrap();
    let day = db.day_log(d).unwrap().unwrap();
    assert_eq!(day.meals.lunch[1].name.as_deref(), Some("c"));
    assert_eq!(day.meals.lunch[1].quantity_grams, Some(250.0));
}

#[test]
fn test_update_is_merge_patch() {
    let (_dir, db) = common::setup_db();
    let d = date(2026, 3, 3);
    db.append_entry(d, MealSlot::Breakfast, &make_entry("oats", 380.0, 13.0, 60.0))
        .unwrap();

    db.update_entry(
        d,
        MealSlot::Breakfast,
        0,
        &EntryPatch {
            fiber: Some(10.0),
            ..EntryPatch::default()
        },
    )
    .unwrap();

    let e = &db.day_log(d).unwrap().unwrap().meals.breakfast[0];
    assert_eq!(e.fiber, 10.0);
    assert_eq!(e.calories, 380.0);
    assert_eq!(e.protein, 13.0);
    assert_eq!(e.quantity_grams, Some(60.0));
}

#[test]
fn test_out_of_range_index_is_entry_not_found() {
    let (_dir, db) = common::setup_db();
    let d = date(2026, 3, 4);
    db.append_entry(d, MealSlot::Snack, &make_entry("bar", 400.0, 20.0, 50.0))
        .unwrap();

    let err = db.delete_entry(d, MealSlot::Snack, 3).unwrap_err();
    assert!(matches!(err, DietError::EntryNotFound { index: 3, .. }));
    let err = db
        .update_entry(d, MealSlot::Lunch, 0, &EntryPatch::serving(10.0))
        .unwrap_err();
    assert!(matches!(err, DietError::EntryNotFound { .. }));
    assert_eq!(err.code(), "entry_not_found");
}

#[test]
fn test_cleared_serving_round_trips_as_none() {
    let (_dir, db) = common::setup_db();
    let d = date(2026, 3, 5);
    let mut e = make_entry("mystery", 200.0, 5.0, 100.0);
    e.quantity_grams = None;
    db.append_entry(d, MealSlot::Dinner, &e).unwrap();
    let stored = &db.day_log(d).unwrap().unwrap().meals.dinner[0];
    assert_eq!(stored.quantity_grams, None);
}

#[test]
fn test_month_logs_only_returns_that_month() {
    let (_dir, db) = common::setup_db();
    for d in [date(2026, 1, 31), date(2026, 2, 1), date(2026, 2, 28), date(2026, 3, 1)] {
        db.append_entry(d, MealSlot::Lunch, &make_entry("x", 100.0, 1.0, 100.0))
            .unwrap();
    }
    let logs = db.month_logs(2026, 2).unwrap();
    let dates: Vec<_> = logs.iter().map(|l| l.date).collect();
    assert_eq!(dates, [date(2026, 2, 1), date(2026, 2, 28)]);
}

#[test]
fn test_reopen_preserves_entries() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("diary.db");
    let d = date(2026, 4, 1);
    {
        let db = nutrilog::db::Database::open(&path).unwrap();
        db.append_entry(d, MealSlot::Lunch, &make_entry("soup", 60.0, 3.0, 300.0))
            .unwrap();
    }
    let db = nutrilog::db::Database::open(&path).unwrap();
    let day = db.day_log(d).unwrap().unwrap();
    assert_eq!(day.meals.lunch[0].quantity_grams, Some(300.0));
}

#[cfg(unix)]
#[test]
fn test_database_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;
    let (dir, _db) = common::setup_db();
    let mode = std::fs::metadata(dir.path().join("test.db"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
