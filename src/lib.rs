// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! reeddb - an embeddable, in-memory relational engine.
//!
//! A small SQL subset over B+-tree-indexed tables: `CREATE TABLE`, `INSERT`,
//! `SELECT` (with joins, `WHERE`, `ORDER BY`), and `UPDATE`. `DELETE` parses
//! but is not implemented — removing a key from the primary-key index is out
//! of scope for this engine.
//!
//! ```
//! use reeddb::engine::Engine;
//!
//! let mut engine = Engine::default();
//! engine.execute("CREATE TABLE users (id int PRIMARY KEY, name varchar(32))").unwrap();
//! engine.execute("INSERT INTO users VALUES (1, 'alice')").unwrap();
//! engine.execute("SELECT users.id, users.name FROM users WHERE users.id = 1").unwrap();
//! ```

pub mod ast;
pub mod btree;
pub mod engine;
pub mod error;
pub mod parser;
pub mod schema;
pub mod store;
pub mod table;
pub mod value;

pub use engine::{Engine, EngineConfig, QueryResult, StatementInput};
pub use error::{EngineError, EngineResult};
pub use value::Value;
