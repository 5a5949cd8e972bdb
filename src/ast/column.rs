// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `ColumnReference`: a fully-qualified `table.column`, with an optional
//! display alias that is excluded from equality and hashing.

use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
    pub as_name: Option<String>,
}

impl ColumnReference {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            as_name: None,
        }
    }

    pub fn with_alias(table: impl Into<String>, column: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            as_name: Some(alias.into()),
        }
    }

    /// Display name used in result rows: the alias if set, else `table.column`.
    pub fn reference_name(&self) -> String {
        self.as_name.clone().unwrap_or_else(|| self.to_string())
    }
}

impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

// Equality and hashing deliberately ignore `as_name` — it is a presentation
// attribute, not part of identity.
impl PartialEq for ColumnReference {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table && self.column == other.column
    }
}

impl Eq for ColumnReference {}

impl Hash for ColumnReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.hash(state);
        self.column.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_alias() {
        let a = ColumnReference::with_alias("main", "id", "x");
        let b = ColumnReference::new("main", "id");
        assert_eq!(a, b);
    }

    #[test]
    fn different_table_or_column_is_unequal() {
        let a = ColumnReference::new("main", "id");
        let b = ColumnReference::new("other", "id");
        assert_ne!(a, b);
    }
}
