//! On-disk persistence round trips and the execute → patch → reload flow.

use keeper_core::command::{ArchiveCommand, CompleteCommand, CreateCommand};
use keeper_core::db::ListStore;
use keeper_core::model::{Item, Priority, Project, ProjectKind};
use keeper_core::registry::Registry;

fn checklist(name: &str) -> Project {
    Project::new(name, ProjectKind::Checklist)
}

#[test]
fn registry_survives_a_store_round_trip_on_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("keeper.sqlite3");

    let mut reg = Registry::new();
    let milk = Item::new("buy milk")
        .with_project(checklist("grocery"))
        .with_priority(Priority::new('A').expect("priority"))
        .with_recurring(true);
    let milk_id = milk.id();
    reg.execute(CreateCommand::new(milk)).expect("create");
    reg.execute(CompleteCommand::new(milk_id, true))
        .expect("complete");

    let mut store = ListStore::open(&path).expect("open");
    store.patch(&reg).expect("patch");
    store.close().expect("close");

    let store = ListStore::open(&path).expect("reopen");
    let loaded = store.load().expect("load");

    let original = reg.get(milk_id).expect("item");
    let restored = loaded.get(milk_id).expect("loaded item");
    assert_eq!(restored, original);
    // Bit-for-bit instants, not just the derived booleans.
    assert_eq!(restored.completed_at(), original.completed_at());
    assert_eq!(restored.created_at(), original.created_at());
}

#[test]
fn patch_after_each_command_keeps_the_store_current() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("keeper.sqlite3");
    let mut store = ListStore::open(&path).expect("open");

    let mut reg = Registry::new();
    let item = Item::new("task").with_project(checklist("chores"));
    let id = item.id();

    // The issuing pattern: execute, then patch, then broadcast (not
    // exercised here). The store is a full upsert each time.
    reg.execute(CreateCommand::new(item)).expect("create");
    store.patch(&reg).expect("patch create");

    reg.execute(CompleteCommand::new(id, true)).expect("complete");
    store.patch(&reg).expect("patch complete");

    reg.execute(ArchiveCommand::new(id, true)).expect("archive");
    store.patch(&reg).expect("patch archive");

    let loaded = store.load().expect("load");
    let restored = loaded.get(id).expect("item");
    assert!(restored.completed());
    assert!(restored.archived());
}

#[test]
fn undo_then_patch_unwinds_the_stored_state() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("keeper.sqlite3");
    let mut store = ListStore::open(&path).expect("open");

    let mut reg = Registry::new();
    let item = Item::new("task");
    let id = item.id();
    reg.add(item);
    reg.execute(CompleteCommand::new(id, true)).expect("complete");
    store.patch(&reg).expect("patch");

    reg.undo().expect("undo");
    store.patch(&reg).expect("patch after undo");

    let loaded = store.load().expect("load");
    assert!(!loaded.get(id).expect("item").completed());
}

#[test]
fn loaded_registry_starts_with_empty_history() {
    let mut reg = Registry::new();
    let item = Item::new("task");
    reg.execute(CreateCommand::new(item)).expect("create");

    let mut store = ListStore::in_memory().expect("open");
    store.patch(&reg).expect("patch");

    let mut loaded = store.load().expect("load");
    assert!(loaded.undo().is_err());
    assert!(loaded.undo_view().next_undo().is_none());
}
