use super::Database;
use crate::core::common::{DbError, TransactionId};
use crate::core::types::{ColumnDef, DataType, Value};
use approx::assert_relative_eq;

fn db_with_parent_and_child() -> Database {
    let mut db = Database::new();
    db.create_table("Parent", vec![ColumnDef::primary_key("id", DataType::Integer)])
        .unwrap();
    db.insert_row("Parent", vec![Value::Integer(10)]).unwrap();
    db.create_table("Child", vec![ColumnDef::new("pid", DataType::Integer)])
        .unwrap();
    db.add_foreign_key("Child", "pid", "Parent", "id").unwrap();
    db
}

#[test]
fn pk_uniqueness_scenario() {
    let mut db = Database::new();
    db.create_table("U", vec![ColumnDef::primary_key("id", DataType::Integer)])
        .unwrap();
    db.insert_row("U", vec![Value::Integer(1)]).unwrap();
    assert!(matches!(
        db.insert_row("U", vec![Value::Integer(1)]),
        Err(DbError::PrimaryKeyViolation { .. })
    ));
    db.insert_row("U", vec![Value::Integer(2)]).unwrap();
    assert_eq!(db.table("U").unwrap().num_rows(), 2);
}

#[test]
fn pk_uniqueness_applies_to_text_columns() {
    let mut db = Database::new();
    db.create_table("U", vec![ColumnDef::primary_key("tag", DataType::Text)])
        .unwrap();
    db.insert_row("U", vec![Value::Text("a".to_string())]).unwrap();
    assert!(matches!(
        db.insert_row("U", vec![Value::Text("a".to_string())]),
        Err(DbError::PrimaryKeyViolation { .. })
    ));
}

#[test]
fn fk_checked_at_insert_time_inside_transaction() {
    let mut db = db_with_parent_and_child();
    db.begin_transaction().unwrap();
    db.insert_row("Child", vec![Value::Integer(10)]).unwrap();
    assert!(matches!(
        db.insert_row("Child", vec![Value::Integer(99)]),
        Err(DbError::ForeignKeyViolation { .. })
    ));
    db.commit_transaction().unwrap();
    assert_eq!(db.table("Child").unwrap().num_rows(), 1);
}

#[test]
fn rollback_restores_updated_string() {
    let mut db = Database::new();
    db.create_table("S", vec![ColumnDef::new("name", DataType::Text)])
        .unwrap();
    db.insert_row("S", vec![Value::Text("alice".to_string())]).unwrap();

    db.begin_transaction().unwrap();
    db.update_row("S", 0, 0, Value::Text("bob".to_string())).unwrap();
    assert_eq!(
        db.table("S").unwrap().rows()[0].values[0],
        Value::Text("bob".to_string())
    );
    db.rollback_transaction().unwrap();
    assert_eq!(
        db.table("S").unwrap().rows()[0].values[0],
        Value::Text("alice".to_string())
    );
}

#[test]
fn commit_recheck_rolls_back_on_lost_parent() {
    let mut db = db_with_parent_and_child();
    db.begin_transaction().unwrap();
    db.insert_row("Child", vec![Value::Integer(10)]).unwrap();

    // Pull the parent row out from under the transaction, bypassing locks
    // and the undo log.
    db.catalog_mut().table_mut("Parent").unwrap().remove_row(0).unwrap();

    assert!(matches!(
        db.commit_transaction(),
        Err(DbError::CommitForeignKeyViolation { .. })
    ));
    assert_eq!(db.table("Child").unwrap().num_rows(), 0);
    // The failed commit finished the transaction; a new one can start.
    db.begin_transaction().unwrap();
    db.rollback_transaction().unwrap();
}

#[test]
fn add_then_drop_column_scenario() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("a", DataType::Integer)])
        .unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();
    db.insert_row("T", vec![Value::Integer(2)]).unwrap();

    db.add_column("T", "b", DataType::Text, Value::Text("x".to_string()))
        .unwrap();
    {
        let table = db.table("T").unwrap();
        assert_eq!(table.rows()[0].values, vec![
            Value::Integer(1),
            Value::Text("x".to_string())
        ]);
        assert_eq!(table.rows()[1].values, vec![
            Value::Integer(2),
            Value::Text("x".to_string())
        ]);
    }

    db.drop_column("T", "a").unwrap();
    let table = db.table("T").unwrap();
    assert_eq!(table.num_columns(), 1);
    assert_eq!(table.rows()[0].values, vec![Value::Text("x".to_string())]);
    assert_eq!(table.rows()[1].values, vec![Value::Text("x".to_string())]);
}

#[test]
fn transform_with_type_change_scenario() {
    let mut db = Database::new();
    db.create_table(
        "T",
        vec![
            ColumnDef::new("a", DataType::Integer),
            ColumnDef::new("b", DataType::Text),
        ],
    )
    .unwrap();
    db.insert_row("T", vec![Value::Integer(1), Value::Text("hi".to_string())])
        .unwrap();

    let transformed = db
        .transform_table(
            "T",
            vec![
                ColumnDef::new("a", DataType::Text),
                ColumnDef::new("c", DataType::Integer),
            ],
        )
        .unwrap();
    assert_eq!(transformed.rows()[0].values, vec![
        Value::Text(String::new()),
        Value::Integer(0)
    ]);

    // Swap the result in under the same name.
    db.remove_table("T").unwrap();
    db.add_table(transformed).unwrap();
    assert_eq!(db.table("T").unwrap().num_columns(), 2);
}

#[test]
fn insert_rollback_round_trip_restores_table_exactly() {
    let mut db = db_with_parent_and_child();
    let before = db.table("Child").unwrap().clone();

    db.begin_transaction().unwrap();
    db.insert_row("Child", vec![Value::Integer(10)]).unwrap();
    db.rollback_transaction().unwrap();

    assert_eq!(db.table("Child").unwrap(), &before);
}

#[test]
fn update_rollback_round_trip_restores_pre_image() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Float)])
        .unwrap();
    db.insert_row("T", vec![Value::Float(1.25)]).unwrap();

    db.begin_transaction().unwrap();
    db.update_row("T", 0, 0, Value::Float(9.5)).unwrap();
    db.rollback_transaction().unwrap();

    match db.table("T").unwrap().rows()[0].values[0] {
        Value::Float(v) => assert_relative_eq!(v, 1.25),
        ref other => panic!("expected float cell, got {:?}", other),
    }
}

#[test]
fn delete_rollback_restores_row_at_original_position() {
    let mut db = Database::new();
    db.create_table(
        "T",
        vec![
            ColumnDef::new("id", DataType::Integer),
            ColumnDef::new("name", DataType::Text),
        ],
    )
    .unwrap();
    for (i, name) in ["a", "b", "c"].iter().enumerate() {
        db.insert_row("T", vec![
            Value::Integer(i as i64),
            Value::Text((*name).to_string()),
        ])
        .unwrap();
    }
    let before = db.table("T").unwrap().clone();

    db.begin_transaction().unwrap();
    db.delete_row("T", 0).unwrap();
    assert_eq!(db.table("T").unwrap().num_rows(), 2);
    db.rollback_transaction().unwrap();

    assert_eq!(db.table("T").unwrap(), &before);
}

#[test]
fn rollback_of_insert_mixed_with_earlier_delete_restores_exactly() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    db.insert_row("T", vec![Value::Integer(100)]).unwrap();
    db.insert_row("T", vec![Value::Integer(101)]).unwrap();
    let before = db.table("T").unwrap().clone();

    // The insert's recorded index (2) points past the delete's left-shift;
    // replay must still remove the inserted row, not the restored one.
    db.begin_transaction().unwrap();
    db.insert_row("T", vec![Value::Integer(200)]).unwrap();
    db.delete_row("T", 0).unwrap();
    db.rollback_transaction().unwrap();

    assert_eq!(db.table("T").unwrap(), &before);
}

#[test]
fn rollback_of_delete_then_update_of_shifted_row_restores_exactly() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    for i in 0..3 {
        db.insert_row("T", vec![Value::Integer(i)]).unwrap();
    }
    let before = db.table("T").unwrap().clone();

    db.begin_transaction().unwrap();
    db.delete_row("T", 0).unwrap();
    // Row 0 is now the row that held value 1; its undo record must be
    // applied before the delete's restore shifts it back.
    db.update_row("T", 0, 0, Value::Integer(42)).unwrap();
    db.rollback_transaction().unwrap();

    assert_eq!(db.table("T").unwrap(), &before);
}

#[test]
fn multi_operation_rollback_replays_in_reverse() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();
    let before = db.table("T").unwrap().rows().to_vec();

    db.begin_transaction().unwrap();
    db.update_row("T", 0, 0, Value::Integer(2)).unwrap();
    db.update_row("T", 0, 0, Value::Integer(3)).unwrap();
    db.insert_row("T", vec![Value::Integer(4)]).unwrap();
    db.rollback_transaction().unwrap();

    assert_eq!(db.table("T").unwrap().rows(), &before[..]);
}

#[test]
fn insert_into_empty_table_sets_num_rows_to_one() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();
    assert_eq!(db.table("T").unwrap().num_rows(), 1);
}

#[test]
fn capacity_doubles_exactly_once_past_the_initial_ten() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    for i in 0..10 {
        db.insert_row("T", vec![Value::Integer(i)]).unwrap();
    }
    assert_eq!(db.table("T").unwrap().row_capacity(), 10);
    db.insert_row("T", vec![Value::Integer(10)]).unwrap();
    assert_eq!(db.table("T").unwrap().row_capacity(), 20);
}

#[test]
fn insert_arity_and_type_are_checked() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    assert!(matches!(
        db.insert_row("T", vec![]),
        Err(DbError::InvalidArgument(_))
    ));
    assert!(matches!(
        db.insert_row("T", vec![Value::Text("x".to_string())]),
        Err(DbError::TypeMismatch { .. })
    ));
    assert_eq!(db.table("T").unwrap().num_rows(), 0);
}

#[test]
fn mutations_on_missing_table_fail() {
    let mut db = Database::new();
    assert_eq!(
        db.insert_row("nope", vec![Value::Integer(1)]),
        Err(DbError::TableNotFound("nope".to_string()))
    );
    assert_eq!(
        db.delete_row("nope", 0),
        Err(DbError::TableNotFound("nope".to_string()))
    );
}

#[test]
fn update_pk_to_existing_value_is_rejected() {
    let mut db = Database::new();
    db.create_table("U", vec![ColumnDef::primary_key("id", DataType::Integer)])
        .unwrap();
    db.insert_row("U", vec![Value::Integer(1)]).unwrap();
    db.insert_row("U", vec![Value::Integer(2)]).unwrap();
    assert!(matches!(
        db.update_row("U", 1, 0, Value::Integer(1)),
        Err(DbError::PrimaryKeyViolation { .. })
    ));
    // Writing a row's own current value back is not a duplicate.
    db.update_row("U", 1, 0, Value::Integer(2)).unwrap();
}

#[test]
fn update_fk_column_is_validated() {
    let mut db = db_with_parent_and_child();
    db.insert_row("Child", vec![Value::Integer(10)]).unwrap();
    assert!(matches!(
        db.update_row("Child", 0, 0, Value::Integer(77)),
        Err(DbError::ForeignKeyViolation { .. })
    ));
    assert_eq!(
        db.table("Child").unwrap().rows()[0].values[0],
        Value::Integer(10)
    );
}

#[test]
fn second_begin_is_rejected_and_commit_requires_one() {
    let mut db = Database::new();
    assert_eq!(db.commit_transaction(), Err(DbError::NoActiveTransaction));
    assert_eq!(db.rollback_transaction(), Err(DbError::NoActiveTransaction));
    let id = db.begin_transaction().unwrap();
    assert_eq!(db.begin_transaction(), Err(DbError::TransactionAlreadyActive(id)));
    db.commit_transaction().unwrap();
}

#[test]
fn locks_are_held_until_commit() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    let id = db.begin_transaction().unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();
    assert_eq!(db.lock_holder("T"), Some(id));
    db.commit_transaction().unwrap();
    assert_eq!(db.lock_holder("T"), None);
}

#[test]
fn failed_first_mutation_releases_its_lock() {
    let mut db = db_with_parent_and_child();
    db.begin_transaction().unwrap();
    assert!(db.insert_row("Child", vec![Value::Integer(99)]).is_err());
    assert_eq!(db.lock_holder("Child"), None);
    db.rollback_transaction().unwrap();
}

#[test]
fn failed_later_mutation_keeps_the_held_lock() {
    let mut db = db_with_parent_and_child();
    let id = db.begin_transaction().unwrap();
    db.insert_row("Child", vec![Value::Integer(10)]).unwrap();
    assert!(db.insert_row("Child", vec![Value::Integer(99)]).is_err());
    assert_eq!(db.lock_holder("Child"), Some(id));
    db.rollback_transaction().unwrap();
    assert_eq!(db.lock_holder("Child"), None);
}

#[test]
fn mutations_without_transaction_take_no_lock_and_stick() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();
    assert_eq!(db.lock_holder("T"), None);
    db.delete_row("T", 0).unwrap();
    assert_eq!(db.table("T").unwrap().num_rows(), 0);
}

#[test]
fn validate_foreign_keys_cross_checks_the_catalog() {
    let mut db = db_with_parent_and_child();
    db.insert_row("Child", vec![Value::Integer(10)]).unwrap();
    db.validate_foreign_keys("Child").unwrap();

    db.catalog_mut().table_mut("Parent").unwrap().remove_row(0).unwrap();
    assert!(matches!(
        db.validate_foreign_keys("Child"),
        Err(DbError::ForeignKeyViolation { .. })
    ));
}

#[test]
fn removing_a_foreign_key_lifts_the_constraint() {
    let mut db = db_with_parent_and_child();
    assert!(db.insert_row("Child", vec![Value::Integer(99)]).is_err());
    db.remove_foreign_key("Child", "pid").unwrap();
    db.insert_row("Child", vec![Value::Integer(99)]).unwrap();
    assert_eq!(db.table("Child").unwrap().num_rows(), 1);
}

#[test]
fn referenced_tables_via_engine() {
    let db = db_with_parent_and_child();
    assert_eq!(db.get_referenced_tables("Child").unwrap(), vec!["Parent"]);
    assert!(db.get_referenced_tables("Parent").unwrap().is_empty());
}

#[test]
fn duplicate_table_names_are_rejected() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    assert_eq!(
        db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)]),
        Err(DbError::DuplicateTable("T".to_string()))
    );
}

#[test]
fn engine_from_config_file_applies_capacities() {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "initial_table_capacity = 3").unwrap();
    let mut db = Database::new_from_config_file(file.path()).unwrap();
    assert_eq!(db.config().initial_table_capacity, 3);

    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    assert_eq!(db.table("T").unwrap().row_capacity(), 3);
    assert_eq!(db.catalog().len(), 1);
}

#[test]
fn transaction_ids_stay_monotonic_through_the_engine() {
    let mut db = Database::new();
    let a = db.begin_transaction().unwrap();
    db.commit_transaction().unwrap();
    let b = db.begin_transaction().unwrap();
    db.rollback_transaction().unwrap();
    let c = db.begin_transaction().unwrap();
    db.commit_transaction().unwrap();
    assert_eq!((a, b, c), (TransactionId(1), TransactionId(2), TransactionId(3)));
}

#[test]
fn teardown_rolls_back_an_abandoned_transaction() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("v", DataType::Integer)])
        .unwrap();
    db.begin_transaction().unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();
    db.delete_row("T", 0).unwrap();
    // Dropping mid-transaction replays the undo log; the abandoned
    // mutations must not survive into the catalog's final moments.
    drop(db);
}

#[test]
fn schema_changes_are_not_rolled_back() {
    let mut db = Database::new();
    db.create_table("T", vec![ColumnDef::new("a", DataType::Integer)])
        .unwrap();
    db.insert_row("T", vec![Value::Integer(1)]).unwrap();

    db.begin_transaction().unwrap();
    db.add_column("T", "b", DataType::Integer, Value::Integer(0)).unwrap();
    db.rollback_transaction().unwrap();

    // The column addition survives the rollback.
    assert_eq!(db.table("T").unwrap().num_columns(), 2);
}
