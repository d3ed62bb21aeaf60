mod support;

use support::{people_schema, person, MockConnection, MockHandle};

use griddle::driver::{ColumnInfo, Rows, SqlValue};
use griddle::{Db, HookEvent, Record, Sqlite, Value};

use pretty_assertions::assert_eq;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Waker};

fn sqlite_db() -> (Db, MockHandle) {
    let (connection, handle) = MockConnection::new();
    let db = Db::new(
        Arc::new(people_schema()),
        Arc::new(Sqlite),
        Box::new(connection),
    );
    (db, handle)
}

// ---------------------------------------------------------------------------
// Recursive save: one transaction, root first, key propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nested_save_propagates_the_generated_key() {
    let (mut db, handle) = sqlite_db();

    let mut root = person("Ryan");
    let mut pet = Record::new("pets");
    pet.set("Name", "Rex");
    root.add_child("pets", pet);

    handle.push_exec(1, Some(1)); // people insert
    handle.push_exec(1, Some(5)); // pets insert

    let rows = db.save_graph(&mut root).await.unwrap();
    assert_eq!(rows, 2);

    assert_eq!(
        handle.statements(),
        vec![
            "BEGIN",
            "INSERT INTO people (Name) VALUES (?1)",
            "INSERT INTO pets (Name, PersonID) VALUES (?1, ?2)",
            "COMMIT",
        ]
    );

    // The child's foreign key equals the root's generated primary key
    let pet = &root.children["pets"][0];
    assert_eq!(pet.get("PersonID"), Some(&Value::I64(1)));
    assert_eq!(pet.get("PetID"), Some(&Value::I64(5)));
    assert!(pet.is_persisted());
}

#[tokio::test]
async fn nested_save_rolls_back_the_whole_tree_on_child_failure() {
    let (mut db, handle) = sqlite_db();

    let mut root = person("Ryan");
    let mut pet = Record::new("pets");
    pet.set("Name", "Rex");
    root.add_child("pets", pet);

    handle.push_exec(1, Some(1)); // people insert succeeds
    handle.push_exec_error("constraint violation"); // pets insert fails

    let err = db.save_graph(&mut root).await.unwrap_err();
    assert!(err.to_string().contains("nested save rolled back"));

    let statements = handle.statements();
    assert_eq!(statements.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK"));
    assert!(!statements.contains(&"COMMIT".to_string()));
}

#[tokio::test]
async fn panicking_hook_mid_save_defers_rollback_to_the_next_operation() {
    let (mut db, handle) = sqlite_db();

    db.hooks_mut()
        .register(HookEvent::AfterCreate, "people", |_schema, _record| {
            panic!("audit trigger exploded")
        });

    let mut root = person("Ryan");
    handle.push_exec(1, Some(1));

    {
        let mut save = Box::pin(db.save_graph(&mut root));
        let mut cx = Context::from_waker(Waker::noop());
        let unwound =
            std::panic::catch_unwind(AssertUnwindSafe(|| save.as_mut().poll(&mut cx)));
        assert!(unwound.is_err());
    }

    // The unwind dropped the transaction guard; the next operation on the
    // handle flushes the deferred rollback before running
    let _ = db.retrieve("people", &[("PersonID", Value::I64(1))]).await;

    assert_eq!(
        handle.statements(),
        vec![
            "BEGIN",
            "INSERT INTO people (Name) VALUES (?1)",
            "ROLLBACK",
            "SELECT PersonID, Name FROM people WHERE PersonID = ?1",
        ]
    );
}

#[tokio::test]
async fn dropped_save_future_defers_rollback_to_the_next_operation() {
    let (mut db, handle) = sqlite_db();

    let mut root = person("Ryan");
    // Park the INSERT inside the transaction, then drop the save there
    handle.pend_on_exec(2);

    {
        let mut save = Box::pin(db.save_graph(&mut root));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(save.as_mut().poll(&mut cx).is_pending());
    }

    let _ = db.retrieve("people", &[("PersonID", Value::I64(1))]).await;

    assert_eq!(
        handle.statements(),
        vec![
            "BEGIN",
            "ROLLBACK",
            "SELECT PersonID, Name FROM people WHERE PersonID = ?1",
        ]
    );
}

#[tokio::test]
async fn nested_save_updates_a_persisted_root() {
    let (mut db, handle) = sqlite_db();

    let mut root = person("Ryan");
    root.set("PersonID", 1);

    let rows = db.save_graph(&mut root).await.unwrap();
    assert_eq!(rows, 1);
    assert!(handle.statements()[1].starts_with("UPDATE people SET"));
}

// ---------------------------------------------------------------------------
// One-level relationship filling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fleshen_children_attaches_matching_rows() {
    let (mut db, handle) = sqlite_db();

    handle.push_query(Rows {
        columns: vec![
            ColumnInfo::new("PetID", "INTEGER", false),
            ColumnInfo::new("PersonID", "INTEGER", false),
            ColumnInfo::new("Name", "TEXT", true),
        ],
        rows: vec![
            vec![
                SqlValue::Integer(5),
                SqlValue::Integer(1),
                SqlValue::Text("Rex".into()),
            ],
            vec![
                SqlValue::Integer(6),
                SqlValue::Integer(1),
                SqlValue::Text("Lassie".into()),
            ],
        ],
    });

    let mut root = person("Ryan");
    root.set("PersonID", 1);
    db.fleshen_children(&mut root).await.unwrap();

    assert_eq!(
        handle.statements(),
        vec!["SELECT PetID, PersonID, Name FROM pets WHERE PersonID = ?1"]
    );
    let pets = &root.children["pets"];
    assert_eq!(pets.len(), 2);
    assert_eq!(pets[0].get("Name"), Some(&Value::from("Rex")));
    assert!(pets[1].is_persisted());
}

#[tokio::test]
async fn fleshen_children_without_a_key_is_a_configuration_error() {
    let (mut db, _handle) = sqlite_db();

    let mut root = person("Ryan");
    let err = db.fleshen_children(&mut root).await.unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn parents_via_child_returns_the_parent_row() {
    let (mut db, handle) = sqlite_db();

    handle.push_query(Rows {
        columns: vec![
            ColumnInfo::new("PersonID", "INTEGER", false),
            ColumnInfo::new("Name", "TEXT", true),
        ],
        rows: vec![vec![SqlValue::Integer(1), SqlValue::Text("Ryan".into())]],
    });

    let mut pet = Record::new("pets");
    pet.set("PetID", 5);
    pet.set("PersonID", 1);

    let parents = db.parents_via_child(&pet).await.unwrap();

    assert_eq!(
        handle.statements(),
        vec!["SELECT PersonID, Name FROM people WHERE PersonID = ?1"]
    );
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].get("Name"), Some(&Value::from("Ryan")));
}
