// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Column and table schema: declared at `CREATE TABLE` time, immutable after.

use crate::ast::ColumnReference;
use crate::error::EngineError;

/// The declared type of a column. `Varchar` carries an optional declared
/// size, matching the grammar's `varchar(n)` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Double,
    Varchar,
}

/// A single column definition, built with the same fluent style the host
/// codebase uses for its own column definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub col_type: ColumnType,
    pub varchar_size: Option<usize>,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
            varchar_size: None,
            primary_key: false,
            unique: false,
            not_null: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.unique = true;
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_max_length(mut self, size: usize) -> Self {
        self.varchar_size = Some(size);
        self
    }

    pub fn is_rowid(&self) -> bool {
        self.name == "rowid"
    }
}

/// Fixed column layout of a table. The primary key always sits at index 0.
#[derive(Debug, Clone)]
pub struct Schema {
    pub table: String,
    pub columns: Vec<ColumnDefinition>,
    pub auto_rowid: bool,
}

impl Schema {
    /// Builds a schema from the declared columns, applying the auto-rowid
    /// and `rowid`-collision rules.
    pub fn new(table: impl Into<String>, mut columns: Vec<ColumnDefinition>) -> Result<Self, EngineError> {
        let table = table.into();

        let pk_count = columns.iter().filter(|c| c.primary_key).count();
        if pk_count > 1 {
            return Err(EngineError::MultiplePrimaryKeys { table });
        }

        if columns.iter().any(|c| c.is_rowid() && !c.primary_key) {
            return Err(EngineError::ReservedRowidColumn { table });
        }

        let auto_rowid = pk_count == 0;
        if auto_rowid {
            columns.insert(0, ColumnDefinition::new("rowid", ColumnType::Int).primary_key());
        } else {
            let pk_pos = columns.iter().position(|c| c.primary_key).expect("pk_count == 1");
            if columns[pk_pos].col_type != ColumnType::Int {
                return Err(EngineError::PrimaryKeyNotInt {
                    table,
                    column: columns[pk_pos].name.clone(),
                });
            }
            let pk = columns.remove(pk_pos);
            columns.insert(0, pk);
        }

        Ok(Self {
            table,
            columns,
            auto_rowid,
        })
    }

    pub fn primary_key(&self) -> &ColumnDefinition {
        &self.columns[0]
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All columns as fully-qualified references against this table.
    pub fn column_references(&self) -> Vec<ColumnReference> {
        self.columns
            .iter()
            .map(|c| ColumnReference::new(self.table.clone(), c.name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_declared_pk_synthesizes_rowid() {
        let schema = Schema::new(
            "main",
            vec![ColumnDefinition::new("name", ColumnType::Varchar)],
        )
        .unwrap();
        assert!(schema.auto_rowid);
        assert_eq!(schema.primary_key().name, "rowid");
        assert_eq!(schema.column_count(), 2);
    }

    #[test]
    fn declared_pk_is_moved_to_position_zero() {
        let schema = Schema::new(
            "main",
            vec![
                ColumnDefinition::new("name", ColumnType::Varchar),
                ColumnDefinition::new("id", ColumnType::Int).primary_key(),
            ],
        )
        .unwrap();
        assert!(!schema.auto_rowid);
        assert_eq!(schema.primary_key().name, "id");
    }

    #[test]
    fn non_pk_column_named_rowid_is_rejected() {
        let err = Schema::new(
            "main",
            vec![ColumnDefinition::new("rowid", ColumnType::Int)],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::ReservedRowidColumn { .. }));
    }

    #[test]
    fn multiple_primary_keys_are_rejected() {
        let err = Schema::new(
            "main",
            vec![
                ColumnDefinition::new("a", ColumnType::Int).primary_key(),
                ColumnDefinition::new("b", ColumnType::Int).primary_key(),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::MultiplePrimaryKeys { .. }));
    }

    #[test]
    fn non_int_primary_key_is_rejected() {
        let err = Schema::new(
            "main",
            vec![ColumnDefinition::new("id", ColumnType::Varchar).primary_key()],
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::PrimaryKeyNotInt { .. }));
    }
}
