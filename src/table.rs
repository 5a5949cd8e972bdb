// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! A table: schema, primary-key index, and row store bound together.

use std::collections::HashMap;

use crate::ast::ColumnReference;
use crate::btree::{BPlusTree, Degree};
use crate::error::EngineError;
use crate::schema::Schema;
use crate::store::{RowStore, VecRowStore};
use crate::value::Value;

pub struct Table {
    schema: Schema,
    pk_index: BPlusTree<Value, usize>,
    store: VecRowStore,
}

impl Table {
    pub fn new(schema: Schema, degree: Degree) -> Self {
        Self {
            schema,
            pk_index: BPlusTree::new(degree),
            store: VecRowStore::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.table
    }

    pub fn primary_key_reference(&self) -> ColumnReference {
        ColumnReference::new(self.schema.table.clone(), self.schema.primary_key().name.clone())
    }

    pub fn column_references(&self) -> Vec<ColumnReference> {
        self.schema.column_references()
    }

    /// `INSERT`'s path: positional values, auto-rowid prepend, rejects a
    /// duplicate primary key.
    pub fn direct_insert(&mut self, mut values: Vec<Value>) -> Result<usize, EngineError> {
        if self.schema.auto_rowid {
            let new_pk = self.pk_index.len() as i64;
            values.insert(0, Value::Integer(new_pk));
        } else if values.len() != self.schema.column_count() {
            return Err(EngineError::InsertArityMismatch {
                table: self.schema.table.clone(),
                expected: self.schema.column_count(),
                actual: values.len(),
            });
        }

        let pk = values[0].clone();
        if self.pk_index.contains(&pk) {
            return Err(EngineError::DuplicatePrimaryKey {
                table: self.schema.table.clone(),
            });
        }
        let slot = self.store.append(values);
        self.pk_index.insert(pk, slot);
        Ok(slot)
    }

    /// `UPDATE`'s path: a mapping from column name to value. Overwrites the
    /// row in place if its primary key already exists, otherwise appends it.
    pub fn insert(&mut self, row: HashMap<String, Value>) -> Result<(), EngineError> {
        let mut row_data = Vec::with_capacity(self.schema.column_count());
        for column in &self.schema.columns {
            row_data.push(row.get(&column.name).cloned().unwrap_or(Value::Null));
        }
        let pk = row_data[0].clone();
        if let Some(slot) = self.pk_index.get(&pk) {
            self.store.write(slot, row_data);
        } else {
            let slot = self.store.append(row_data);
            self.pk_index.insert(pk, slot);
        }
        Ok(())
    }

    pub fn get_row_by_pk(&self, pk: &Value) -> Option<&[Value]> {
        self.pk_index.get(pk).map(|slot| self.store.read(slot))
    }

    /// Ordered scan of the primary-key index, half-open `[start, stop)`.
    pub fn scan(&self, start: Option<&Value>, stop: Option<&Value>) -> Result<Vec<&[Value]>, EngineError> {
        let slots = self.pk_index.range(start, stop)?;
        Ok(slots.into_iter().map(|(_, slot)| self.store.read(slot)).collect())
    }

    pub fn row_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, ColumnType};

    fn sample_schema() -> Schema {
        Schema::new(
            "main",
            vec![
                ColumnDefinition::new("id", ColumnType::Int).primary_key(),
                ColumnDefinition::new("name", ColumnType::Varchar),
            ],
        )
        .unwrap()
    }

    #[test]
    fn direct_insert_then_lookup_by_pk() {
        let mut table = Table::new(sample_schema(), Degree::default());
        table
            .direct_insert(vec![Value::Integer(1), Value::String("a".into())])
            .unwrap();
        let row = table.get_row_by_pk(&Value::Integer(1)).unwrap();
        assert_eq!(row, &[Value::Integer(1), Value::String("a".into())]);
    }

    #[test]
    fn direct_insert_rejects_duplicate_pk() {
        let mut table = Table::new(sample_schema(), Degree::default());
        table
            .direct_insert(vec![Value::Integer(1), Value::String("a".into())])
            .unwrap();
        let err = table
            .direct_insert(vec![Value::Integer(1), Value::String("b".into())])
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicatePrimaryKey { .. }));
    }

    #[test]
    fn auto_rowid_table_prepends_synthetic_pk() {
        let schema = Schema::new(
            "main",
            vec![ColumnDefinition::new("name", ColumnType::Varchar)],
        )
        .unwrap();
        let mut table = Table::new(schema, Degree::default());
        table.direct_insert(vec![Value::String("a".into())]).unwrap();
        table.direct_insert(vec![Value::String("b".into())]).unwrap();
        assert_eq!(
            table.get_row_by_pk(&Value::Integer(0)).unwrap(),
            &[Value::Integer(0), Value::String("a".into())]
        );
        assert_eq!(
            table.get_row_by_pk(&Value::Integer(1)).unwrap(),
            &[Value::Integer(1), Value::String("b".into())]
        );
    }

    #[test]
    fn insert_by_mapping_overwrites_existing_pk() {
        let mut table = Table::new(sample_schema(), Degree::default());
        table
            .direct_insert(vec![Value::Integer(1), Value::String("a".into())])
            .unwrap();
        let mut row = HashMap::new();
        row.insert("id".to_string(), Value::Integer(1));
        row.insert("name".to_string(), Value::String("updated".into()));
        table.insert(row).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.get_row_by_pk(&Value::Integer(1)).unwrap(),
            &[Value::Integer(1), Value::String("updated".into())]
        );
    }
}
