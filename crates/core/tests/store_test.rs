mod common;

use pretty_assertions::assert_eq;
use timetable_core::mock::MockSchedulingService;
use timetable_core::models::{Day, EntryId, Scope};
use timetable_core::{EntryStore, LoadOutcome, ScheduleError};

use common::{entry, scope};

#[tokio::test]
async fn test_load_replaces_working_set() {
    let mut service = MockSchedulingService::new();
    service
        .expect_timetable()
        .withf(|scope| scope.to_string() == "10-A")
        .times(1)
        .returning(|_| {
            Ok(vec![
                entry("e1", Day::Monday, "09:00", "10:00", "t-1"),
                entry("e2", Day::Tuesday, "09:00", "10:00", "t-2"),
            ])
        });

    let mut store = EntryStore::new();
    store.upsert(entry("old", Day::Friday, "08:00", "09:00", "t-1"));

    let outcome = store.load(&service, &scope()).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Applied(2));
    assert_eq!(store.scope(), Some(&scope()));
    assert!(store.get(&EntryId::from("old")).is_none());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_entries() {
    let mut service = MockSchedulingService::new();
    service
        .expect_timetable()
        .times(1)
        .returning(|_| Err(ScheduleError::Transport(eyre::eyre!("connection reset"))));

    let mut store = EntryStore::new();
    store.upsert(entry("e1", Day::Monday, "09:00", "10:00", "t-1"));

    let result = store.load(&service, &scope()).await;

    assert!(matches!(result, Err(ScheduleError::Transport(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_superseded_fetch_is_discarded() {
    let mut store = EntryStore::new();
    let first = store.begin_load(Scope::new("9", "B").unwrap());
    let second = store.begin_load(scope());

    let late = store.apply(&first, vec![entry("stale", Day::Monday, "09:00", "10:00", "t-1")]);
    assert_eq!(late, LoadOutcome::Stale);
    assert!(store.is_empty());
    assert_eq!(store.scope(), None);

    let current = store.apply(&second, vec![entry("fresh", Day::Monday, "09:00", "10:00", "t-1")]);
    assert_eq!(current, LoadOutcome::Applied(1));
    assert_eq!(store.scope(), Some(&scope()));
    assert_eq!(store.entries()[0].id.as_str(), "fresh");
}

#[test]
fn test_superseded_fetch_arriving_last_is_discarded() {
    let mut store = EntryStore::new();
    let first = store.begin_load(Scope::new("9", "B").unwrap());
    let second = store.begin_load(scope());

    store.apply(&second, vec![entry("fresh", Day::Monday, "09:00", "10:00", "t-1")]);
    let late = store.apply(&first, vec![]);

    assert_eq!(late, LoadOutcome::Stale);
    assert_eq!(store.len(), 1);
    assert_eq!(first.scope().to_string(), "9-B");
}

#[test]
fn test_upsert_and_remove() {
    let mut store = EntryStore::new();
    store.upsert(entry("e1", Day::Monday, "09:00", "10:00", "t-1"));

    let mut moved = entry("e1", Day::Thursday, "11:00", "12:00", "t-1");
    moved.subject_name = "Chemistry".to_string();
    store.upsert(moved.clone());

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&EntryId::from("e1")), Some(&moved));

    assert_eq!(store.remove(&EntryId::from("e1")), Some(moved));
    assert_eq!(store.remove(&EntryId::from("e1")), None);
    assert!(store.is_empty());
}

#[test]
fn test_clear_drops_scope_and_entries() {
    let mut store = EntryStore::new();
    let ticket = store.begin_load(scope());
    store.apply(&ticket, vec![entry("e1", Day::Monday, "09:00", "10:00", "t-1")]);

    store.clear();

    assert!(store.scope().is_none());
    assert!(store.is_empty());
}
