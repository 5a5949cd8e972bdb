// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The shapes `Engine::execute` hands back to callers.

use crate::ast::ColumnReference;
use crate::value::Value;

/// A single output row, addressable by position or by the display name of
/// the column that produced it (alias if one was given, else `table.column`).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    values: Vec<Value>,
    names: Vec<String>,
}

impl ResultRow {
    pub fn new(values: Vec<Value>, columns: &[ColumnReference]) -> Self {
        let names = columns.iter().map(ColumnReference::reference_name).collect();
        Self { values, names }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.names.iter().position(|n| n == name).and_then(|i| self.values.get(i))
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A row is equal to a raw ordered tuple of the same data: positional only,
/// column names play no part.
impl PartialEq<Vec<Value>> for ResultRow {
    fn eq(&self, other: &Vec<Value>) -> bool {
        self.values == *other
    }
}

impl PartialEq<[Value]> for ResultRow {
    fn eq(&self, other: &[Value]) -> bool {
        self.values == *other
    }
}

/// The output of a `SELECT`: the projected column names in order, and the
/// matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<ColumnReference>,
    pub rows: Vec<ResultRow>,
}

/// What `Engine::execute` returns for any statement kind.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(ResultSet),
    RowsAffected(usize),
    Created { table: String },
}
