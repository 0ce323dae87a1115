use student_records::commands::{
    delete_record, insert_record, submit_edit, Confirmation, EditSession,
};
use student_records::{Course, RecordError, RecordStore, RecordTable, RecordView, StudentDraft};
use tempfile::TempDir;

fn store() -> (TempDir, RecordStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("database.db")).unwrap();
    (dir, store)
}

#[test]
fn create_update_delete_scenario() {
    let (_dir, store) = store();

    let id = store.create("Bob", Course::Math, "555-1234").unwrap();
    assert_eq!(id, 1);
    let rows = store.read_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Bob");
    assert_eq!(rows[0].course, Course::Math);
    assert_eq!(rows[0].mobile, "555-1234");

    store.update(1, "Bob", Course::Physics, "555-1234").unwrap();
    assert_eq!(store.read_all().unwrap()[0].course, Course::Physics);

    store.delete(1).unwrap();
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn create_adds_exactly_one_row_with_fresh_id() {
    let (_dir, store) = store();
    let first = store.create("Ann", Course::Biology, "1").unwrap();
    let before = store.read_all().unwrap();

    let second = store.create("Cid", Course::Astronomy, "2").unwrap();
    let after = store.read_all().unwrap();

    assert_ne!(first, second);
    assert_eq!(after.len(), before.len() + 1);
    let added: Vec<_> = after.iter().filter(|r| r.id == second).collect();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].name, "Cid");
    assert_eq!(added[0].course, Course::Astronomy);
}

#[test]
fn update_touches_only_the_target_row() {
    let (_dir, store) = store();
    let a = store.create("Ann", Course::Biology, "1").unwrap();
    let b = store.create("Ben", Course::Math, "2").unwrap();

    store.update(b, "Benjamin", Course::Physics, "22").unwrap();

    let rows = store.read_all().unwrap();
    let ann = rows.iter().find(|r| r.id == a).unwrap();
    let ben = rows.iter().find(|r| r.id == b).unwrap();
    assert_eq!(
        (ann.name.as_str(), ann.course, ann.mobile.as_str()),
        ("Ann", Course::Biology, "1")
    );
    assert_eq!(
        (ben.name.as_str(), ben.course, ben.mobile.as_str()),
        ("Benjamin", Course::Physics, "22")
    );
}

#[test]
fn missing_ids_fail_update_and_delete() {
    let (_dir, store) = store();
    store.create("Ann", Course::Biology, "1").unwrap();

    assert!(matches!(
        store.update(9, "X", Course::Math, "0"),
        Err(RecordError::RecordNotFound { id: 9 })
    ));
    assert!(matches!(
        store.delete(9),
        Err(RecordError::RecordNotFound { id: 9 })
    ));
    assert_eq!(store.read_all().unwrap().len(), 1);
}

#[test]
fn read_by_name_is_exact() {
    let (_dir, store) = store();
    store.create("Alice", Course::Biology, "1").unwrap();
    store.create("Alice Smith", Course::Math, "2").unwrap();
    store.create("Alice", Course::Physics, "3").unwrap();

    let hits = store.read_by_name("Alice").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|r| r.name == "Alice"));

    assert!(store.read_by_name("Nobody").unwrap().is_empty());
}

#[test]
fn data_survives_reopening_the_file() {
    let (dir, store) = store();
    let id = store.create("Ann", Course::Biology, "1").unwrap();
    drop(store);

    let reopened = RecordStore::open(dir.path().join("database.db")).unwrap();
    assert_eq!(reopened.read_one(id).unwrap().unwrap().name, "Ann");
}

#[test]
fn table_tracks_store_through_handlers() {
    let (_dir, store) = store();
    let mut table = RecordTable::load(&store).unwrap();
    assert!(table.is_empty());

    let id = insert_record(&store, &mut table, &StudentDraft::new("Bob", Course::Math, "555"))
        .unwrap();
    assert_eq!(table.rows(), store.read_all().unwrap().as_slice());

    assert!(table.select_id(id));
    let session = EditSession {
        id,
        draft: StudentDraft::new("Bob", Course::Physics, "555"),
    };
    submit_edit(&store, &mut table, &session).unwrap();
    assert_eq!(table.selected().unwrap().course, Course::Physics);
    assert_eq!(table.record(id).unwrap().course, Course::Physics);

    delete_record(&store, &mut table, id, Confirmation::Yes).unwrap();
    assert!(table.is_empty());
    assert!(table.selected().is_none());
}

#[test]
fn stored_unknown_course_surfaces_as_unknown_course() {
    let (dir, store) = store();
    let conn = rusqlite::Connection::open(dir.path().join("database.db")).unwrap();
    conn.execute(
        "INSERT INTO students (name, course, mobile) VALUES ('Eve', 'Chemistry', '1')",
        [],
    )
    .unwrap();
    drop(conn);

    assert!(matches!(
        store.read_all(),
        Err(RecordError::UnknownCourse(text)) if text == "Chemistry"
    ));
    assert!(matches!(
        RecordTable::load(&store),
        Err(RecordError::UnknownCourse(_))
    ));
}
