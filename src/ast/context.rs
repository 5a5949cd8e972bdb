// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Evaluation context: a read-only view of a single row, keyed by the
//! columns that produced it.

use std::collections::HashMap;

use crate::ast::column::ColumnReference;
use crate::value::Value;

/// Binds each [`ColumnReference`] of a row to its value so that an [`crate::ast::expr::Expr`]
/// tree can be evaluated against it.
pub struct Context {
    values: HashMap<ColumnReference, Value>,
}

impl Context {
    pub fn new(columns: &[ColumnReference], row: &[Value]) -> Self {
        let values = columns.iter().cloned().zip(row.iter().cloned()).collect();
        Self { values }
    }

    pub fn get(&self, reference: &ColumnReference) -> Option<&Value> {
        self.values.get(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_by_table_and_column_ignoring_alias() {
        let columns = vec![ColumnReference::new("main", "id")];
        let row = vec![Value::Integer(7)];
        let ctx = Context::new(&columns, &row);
        let lookup = ColumnReference::with_alias("main", "id", "pk");
        assert_eq!(ctx.get(&lookup), Some(&Value::Integer(7)));
    }

    #[test]
    fn missing_column_is_none() {
        let ctx = Context::new(&[], &[]);
        assert_eq!(ctx.get(&ColumnReference::new("main", "id")), None);
    }
}
