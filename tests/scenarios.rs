// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end `Engine::execute` scenarios, run against the whole pipeline
//! rather than any single module.

use reeddb::engine::{Engine, QueryResult};
use reeddb::value::Value;

fn seed_main(engine: &mut Engine) {
    engine
        .execute("CREATE TABLE main (id int PRIMARY KEY, cola int, colb varchar(8))")
        .unwrap();
    engine.execute("INSERT INTO main VALUES (1, 10, 'a1')").unwrap();
    engine.execute("INSERT INTO main VALUES (2, 9, 'a2')").unwrap();
    engine.execute("INSERT INTO main VALUES (3, 8, 'a3')").unwrap();
}

fn rows_of(result: QueryResult) -> Vec<Vec<Value>> {
    match result {
        QueryResult::Rows(set) => set.rows.into_iter().map(|row| row.values().to_vec()).collect(),
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn create_and_select_all() {
    let mut engine = Engine::default();
    seed_main(&mut engine);

    let rows = rows_of(engine.execute("SELECT main.id, main.cola, main.colb FROM main").unwrap());
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(1), Value::Integer(10), Value::String("a1".to_string())],
            vec![Value::Integer(2), Value::Integer(9), Value::String("a2".to_string())],
            vec![Value::Integer(3), Value::Integer(8), Value::String("a3".to_string())],
        ]
    );
}

#[test]
fn order_by_desc() {
    let mut engine = Engine::default();
    seed_main(&mut engine);

    let rows = rows_of(
        engine
            .execute("SELECT main.id, main.cola, main.colb FROM main ORDER BY main.id DESC")
            .unwrap(),
    );
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(3), Value::Integer(8), Value::String("a3".to_string())],
            vec![Value::Integer(2), Value::Integer(9), Value::String("a2".to_string())],
            vec![Value::Integer(1), Value::Integer(10), Value::String("a1".to_string())],
        ]
    );
}

#[test]
fn where_on_primary_key_pushes_down() {
    let mut engine = Engine::default();
    seed_main(&mut engine);

    let rows = rows_of(
        engine
            .execute("SELECT main.id, main.cola, main.colb FROM main WHERE main.id = 1")
            .unwrap(),
    );
    assert_eq!(
        rows,
        vec![vec![Value::Integer(1), Value::Integer(10), Value::String("a1".to_string())]]
    );
    assert_eq!(engine.stats().pushdown_hits, 1);
    assert_eq!(engine.stats().full_scans, 0);
}

fn seed_main_and_other(engine: &mut Engine) {
    seed_main(engine);
    engine
        .execute("CREATE TABLE other (id int PRIMARY KEY, data varchar(8))")
        .unwrap();
    engine.execute("INSERT INTO other VALUES (1, 'other1')").unwrap();
    engine.execute("INSERT INTO other VALUES (2, 'other2')").unwrap();
}

#[test]
fn inner_join_on_primary_key_is_orientation_independent() {
    let mut engine = Engine::default();
    seed_main_and_other(&mut engine);

    let expected = vec![
        vec![
            Value::Integer(1),
            Value::Integer(10),
            Value::String("a1".to_string()),
            Value::Integer(1),
            Value::String("other1".to_string()),
        ],
        vec![
            Value::Integer(2),
            Value::Integer(9),
            Value::String("a2".to_string()),
            Value::Integer(2),
            Value::String("other2".to_string()),
        ],
    ];

    let forward = rows_of(
        engine
            .execute(
                "SELECT main.id, main.cola, main.colb, other.id, other.data FROM main JOIN other ON main.id = other.id",
            )
            .unwrap(),
    );
    assert_eq!(forward, expected);

    let reversed = rows_of(
        engine
            .execute(
                "SELECT main.id, main.cola, main.colb, other.id, other.data FROM main JOIN other ON other.id = main.id",
            )
            .unwrap(),
    );
    assert_eq!(reversed, expected);
}

#[test]
fn cross_join_is_the_full_cartesian_product() {
    let mut engine = Engine::default();
    seed_main_and_other(&mut engine);

    let rows = rows_of(
        engine
            .execute("SELECT main.id, other.id FROM main JOIN other")
            .unwrap(),
    );
    assert_eq!(rows.len(), 6);
}

#[test]
fn update_by_primary_key() {
    let mut engine = Engine::default();
    seed_main(&mut engine);

    let affected = match engine.execute("UPDATE main SET main.cola = 1 WHERE main.id = 1").unwrap() {
        QueryResult::RowsAffected(count) => count,
        other => panic!("expected a row count, got {other:?}"),
    };
    assert_eq!(affected, 1);

    let rows = rows_of(engine.execute("SELECT main.cola FROM main").unwrap());
    assert_eq!(
        rows,
        vec![vec![Value::Integer(1)], vec![Value::Integer(9)], vec![Value::Integer(8)]]
    );
}

#[test]
fn left_join_keeps_unmatched_left_rows_with_null() {
    let mut engine = Engine::default();
    seed_main(&mut engine);
    engine
        .execute("CREATE TABLE other (id int PRIMARY KEY, data varchar(8))")
        .unwrap();
    engine.execute("INSERT INTO other VALUES (1, 'other1')").unwrap();
    engine.execute("INSERT INTO other VALUES (2, 'other2')").unwrap();

    let rows = rows_of(
        engine
            .execute("SELECT main.id, other.data FROM main LEFT JOIN other ON main.id = other.id")
            .unwrap(),
    );
    assert_eq!(
        rows,
        vec![
            vec![Value::Integer(1), Value::String("other1".to_string())],
            vec![Value::Integer(2), Value::String("other2".to_string())],
            vec![Value::Integer(3), Value::Null],
        ]
    );
}

#[test]
fn delete_parses_but_execution_is_unsupported() {
    let mut engine = Engine::default();
    seed_main(&mut engine);

    let err = engine.execute("DELETE FROM main WHERE main.id = 1").unwrap_err();
    assert!(matches!(err, reeddb::error::EngineError::Unsupported { .. }));
}

#[test]
fn pushdown_and_full_scan_agree_on_result_set() {
    let mut engine = Engine::default();
    seed_main(&mut engine);

    let pushdown = rows_of(
        engine
            .execute("SELECT main.id FROM main WHERE main.id >= 2")
            .unwrap(),
    );
    let full_scan = rows_of(engine.execute("SELECT main.id FROM main").unwrap())
        .into_iter()
        .filter(|row| row[0] != Value::Integer(1))
        .collect::<Vec<_>>();
    assert_eq!(pushdown, full_scan);
}
