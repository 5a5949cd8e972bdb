// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Statement dispatch and the `SELECT` pipeline: scan, join, filter, sort,
//! project.
//!
//! Functions here take `&HashMap<String, Table>`/`&mut QueryStats` as
//! separate parameters rather than methods on `Engine`, so the borrow
//! checker doesn't force the whole engine to be borrowed just to update a
//! counter while a table is still in scope.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::ast::{ColumnReference, Context, FromClause, JoinKind, Select, Statement, Update};
use crate::btree::Degree;
use crate::engine::plan::{plan_for, ScanPlan};
use crate::engine::result::{QueryResult, ResultRow, ResultSet};
use crate::engine::stats::QueryStats;
use crate::error::EngineError;
use crate::schema::Schema;
use crate::table::Table;
use crate::value::Value;

pub(crate) fn execute(
    tables: &mut HashMap<String, Table>,
    stats: &mut QueryStats,
    degree: Degree,
    statement: Statement,
) -> Result<QueryResult, EngineError> {
    stats.statements_executed += 1;
    match statement {
        Statement::CreateTable(ct) => execute_create_table(tables, degree, ct),
        Statement::Insert(insert) => execute_insert(tables, insert),
        Statement::Select(select) => execute_select(tables, stats, select).map(QueryResult::Rows),
        Statement::Update(update) => execute_update(tables, stats, update).map(QueryResult::RowsAffected),
        Statement::Delete(_) => Err(EngineError::Unsupported {
            what: "DELETE (key removal from the primary-key index is not implemented)".to_string(),
        }),
    }
}

fn get_table<'a>(tables: &'a HashMap<String, Table>, name: &str) -> Result<&'a Table, EngineError> {
    tables.get(name).ok_or_else(|| EngineError::TableNotFound { name: name.to_string() })
}

#[instrument(skip(tables))]
fn execute_create_table(
    tables: &mut HashMap<String, Table>,
    degree: Degree,
    ct: crate::ast::CreateTable,
) -> Result<QueryResult, EngineError> {
    if tables.contains_key(&ct.table) {
        return Err(EngineError::TableAlreadyExists { name: ct.table });
    }
    let schema = Schema::new(ct.table.clone(), ct.columns)?;
    tables.insert(ct.table.clone(), Table::new(schema, degree));
    debug!(table = %ct.table, "created table");
    Ok(QueryResult::Created { table: ct.table })
}

#[instrument(skip(tables))]
fn execute_insert(tables: &mut HashMap<String, Table>, insert: crate::ast::Insert) -> Result<QueryResult, EngineError> {
    let table = tables
        .get_mut(&insert.table)
        .ok_or_else(|| EngineError::TableNotFound { name: insert.table.clone() })?;
    let empty = Context::new(&[], &[]);
    let values = insert
        .values
        .iter()
        .map(|value| value.eval_value(&empty))
        .collect::<Result<Vec<_>, _>>()?;
    table.direct_insert(values)?;
    debug!(table = %insert.table, "inserted row");
    Ok(QueryResult::RowsAffected(1))
}

/// Fetches the rows a scan plan selects. Pushdown plans still only narrow
/// the candidate set — the caller re-applies the full `WHERE` clause
/// afterwards, since `GreaterThan`/`LessThan` pushdown can over-fetch the
/// boundary row.
fn rows_for_plan(table: &Table, plan: &ScanPlan) -> Result<Vec<Vec<Value>>, EngineError> {
    match plan {
        ScanPlan::PrimaryKeyEquals(value) => {
            Ok(table.get_row_by_pk(value).map(|row| vec![row.to_vec()]).unwrap_or_default())
        }
        ScanPlan::PrimaryKeyIn(values) => Ok(values
            .iter()
            .filter_map(|value| table.get_row_by_pk(value))
            .map(|row| row.to_vec())
            .collect()),
        ScanPlan::PrimaryKeyFrom(value) => {
            Ok(table.scan(Some(value), None)?.into_iter().map(|row| row.to_vec()).collect())
        }
        ScanPlan::PrimaryKeyTo(value, inclusive) => {
            // `scan(None, Some(stop))` walks the leaf chain back to front, so
            // the half-open result comes back descending. Reverse it and
            // append the boundary row last to keep the whole result set in
            // ascending primary-key order, same as every other scan plan.
            let mut rows: Vec<Vec<Value>> =
                table.scan(None, Some(value))?.into_iter().map(|row| row.to_vec()).collect();
            rows.reverse();
            if *inclusive {
                if let Some(row) = table.get_row_by_pk(value) {
                    rows.push(row.to_vec());
                }
            }
            Ok(rows)
        }
        ScanPlan::FullScan => Ok(table.scan(None, None)?.into_iter().map(|row| row.to_vec()).collect()),
    }
}

/// Looks up the rows on the right side of a join for one left-hand value.
/// A join on the right table's primary key goes through the index; anything
/// else is a full scan filtered by equality.
fn join_rows(right_table: &Table, right_ref: &ColumnReference, left_value: &Value) -> Result<Vec<Vec<Value>>, EngineError> {
    if right_ref.column == right_table.schema().primary_key().name {
        return Ok(right_table.get_row_by_pk(left_value).map(|row| vec![row.to_vec()]).unwrap_or_default());
    }
    let position = right_table
        .schema()
        .position_of(&right_ref.column)
        .ok_or_else(|| EngineError::ValueNotAvailable { column: right_ref.to_string() })?;
    Ok(right_table
        .scan(None, None)?
        .into_iter()
        .filter(|row| &row[position] == left_value)
        .map(|row| row.to_vec())
        .collect())
}

/// Runs every join in `from.joins` left to right, growing `columns` to match.
/// `LEFT JOIN` pads unmatched left rows with one `Value::Null` per right-hand
/// column instead of dropping them.
fn apply_joins(
    tables: &HashMap<String, Table>,
    from: &FromClause,
    columns: &mut Vec<ColumnReference>,
    mut rows: Vec<Vec<Value>>,
) -> Result<Vec<Vec<Value>>, EngineError> {
    for join in &from.joins {
        let right_table = get_table(tables, &join.table)?;
        let right_columns = right_table.column_references();
        let left_index = join
            .left
            .as_ref()
            .and_then(|reference| columns.iter().position(|existing| existing == reference));

        let mut joined = Vec::new();
        for left_row in rows {
            let right_rows = match (left_index, &join.right) {
                (Some(index), Some(right_ref)) => join_rows(right_table, right_ref, &left_row[index])?,
                _ => right_table.scan(None, None)?.into_iter().map(|row| row.to_vec()).collect(),
            };
            if right_rows.is_empty() {
                if join.kind == JoinKind::Left {
                    let mut combined = left_row;
                    combined.extend(std::iter::repeat(Value::Null).take(right_columns.len()));
                    joined.push(combined);
                }
                continue;
            }
            for right_row in right_rows {
                let mut combined = left_row.clone();
                combined.extend(right_row);
                joined.push(combined);
            }
        }
        rows = joined;
        columns.extend(right_columns);
    }
    Ok(rows)
}

fn filter_rows(rows: Vec<Vec<Value>>, columns: &[ColumnReference], where_clause: &crate::ast::Expr) -> Result<Vec<Vec<Value>>, EngineError> {
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        let ctx = Context::new(columns, &row);
        if where_clause.eval_bool(&ctx)? {
            kept.push(row);
        }
    }
    Ok(kept)
}

fn sort_rows(rows: &mut [Vec<Value>], columns: &[ColumnReference], order_by: &crate::ast::OrderBy) -> Result<(), EngineError> {
    let indexes: Vec<usize> = order_by
        .columns
        .iter()
        .map(|reference| {
            columns
                .iter()
                .position(|existing| existing == reference)
                .ok_or_else(|| EngineError::ValueNotAvailable { column: reference.to_string() })
        })
        .collect::<Result<_, _>>()?;
    let mut error = None;
    rows.sort_by(|a, b| {
        if error.is_some() {
            return Ordering::Equal;
        }
        for &index in &indexes {
            match a[index].try_cmp(&b[index]) {
                Ok(Ordering::Equal) => continue,
                Ok(ordering) => return if order_by.descending { ordering.reverse() } else { ordering },
                Err(err) => {
                    error = Some(err);
                    return Ordering::Equal;
                }
            }
        }
        Ordering::Equal
    });
    match error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn project_rows(
    rows: Vec<Vec<Value>>,
    columns: &[ColumnReference],
    wanted: &[ColumnReference],
) -> Result<Vec<Vec<Value>>, EngineError> {
    let positions: Vec<usize> = wanted
        .iter()
        .map(|reference| {
            columns
                .iter()
                .position(|existing| existing == reference)
                .ok_or_else(|| EngineError::ValueNotAvailable { column: reference.to_string() })
        })
        .collect::<Result<_, _>>()?;
    Ok(rows
        .into_iter()
        .map(|row| positions.iter().map(|&index| row[index].clone()).collect())
        .collect())
}

#[instrument(skip(tables, stats, select), fields(table = %select.from.table))]
fn execute_select(tables: &HashMap<String, Table>, stats: &mut QueryStats, select: Select) -> Result<ResultSet, EngineError> {
    let main_table = get_table(tables, &select.from.table)?;
    let mut columns = main_table.column_references();
    let pk_ref = main_table.primary_key_reference();

    let plan = plan_for(select.where_clause.as_ref(), &pk_ref);
    debug!(?plan, "scan plan chosen");
    if matches!(plan, ScanPlan::FullScan) {
        stats.full_scans += 1;
    } else {
        stats.pushdown_hits += 1;
    }

    let mut rows = rows_for_plan(main_table, &plan)?;
    stats.rows_scanned += rows.len() as u64;

    rows = apply_joins(tables, &select.from, &mut columns, rows)?;

    if let Some(where_clause) = &select.where_clause {
        rows = filter_rows(rows, &columns, where_clause)?;
    }

    if let Some(order_by) = &select.order_by {
        sort_rows(&mut rows, &columns, order_by)?;
    }

    let projected = project_rows(rows, &columns, &select.columns)?;
    stats.rows_returned += projected.len() as u64;
    debug!(rows = projected.len(), "select completed");

    Ok(ResultSet {
        columns: select.columns.clone(),
        rows: projected.into_iter().map(|row| ResultRow::new(row, &select.columns)).collect(),
    })
}

#[instrument(skip(tables, stats, update), fields(table = %update.table))]
fn execute_update(tables: &mut HashMap<String, Table>, stats: &mut QueryStats, update: Update) -> Result<usize, EngineError> {
    let pk_ref = {
        let table = get_table(tables, &update.table)?;
        table.primary_key_reference()
    };
    let plan = plan_for(update.where_clause.as_ref(), &pk_ref);
    if matches!(plan, ScanPlan::FullScan) {
        stats.full_scans += 1;
    } else {
        stats.pushdown_hits += 1;
    }

    let (columns, candidates) = {
        let table = get_table(tables, &update.table)?;
        (table.column_references(), rows_for_plan(table, &plan)?)
    };
    stats.rows_scanned += candidates.len() as u64;

    let matching = match &update.where_clause {
        Some(where_clause) => filter_rows(candidates, &columns, where_clause)?,
        None => candidates,
    };

    let table = tables
        .get_mut(&update.table)
        .ok_or_else(|| EngineError::TableNotFound { name: update.table.clone() })?;
    let mut updated = 0;
    for row in matching {
        let ctx = Context::new(&columns, &row);
        let mut mapping: HashMap<String, Value> =
            columns.iter().zip(row.iter()).map(|(reference, value)| (reference.column.clone(), value.clone())).collect();
        for (column, expr) in &update.assignments {
            mapping.insert(column.column.clone(), expr.eval_value(&ctx)?);
        }
        table.insert(mapping)?;
        updated += 1;
    }
    stats.rows_returned += updated as u64;
    debug!(table = %update.table, updated, "updated rows");
    Ok(updated)
}
