// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Rule-based scan planning: decide whether a `WHERE` clause lets a `SELECT`
//! or `UPDATE` go straight at the primary-key index instead of a full scan.

use crate::ast::{ColumnReference, Context, Expr};
use crate::value::Value;

/// The access path chosen for a single table scan. Only a terminal
/// comparison directly on the primary key qualifies for anything but
/// [`ScanPlan::FullScan`] — this mirrors a fixed rule table, not a
/// cost-based optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPlan {
    PrimaryKeyEquals(Value),
    PrimaryKeyIn(Vec<Value>),
    PrimaryKeyFrom(Value),
    /// `inclusive` is true for `<=`, false for plain `<`.
    PrimaryKeyTo(Value, bool),
    FullScan,
}

fn literal(expr: &Expr) -> Option<Value> {
    let empty = Context::new(&[], &[]);
    match expr {
        Expr::Integer(_) | Expr::String(_) => expr.eval_value(&empty).ok(),
        _ => None,
    }
}

/// Chooses a scan plan for `where_clause` against `pk`. Only ever inspects
/// the top-level node: a primary-key comparison buried inside a larger
/// `AND`/`OR` tree does not qualify, matching the single-condition pushdown
/// the original executor performs.
pub fn plan_for(where_clause: Option<&Expr>, pk: &ColumnReference) -> ScanPlan {
    let Some(where_clause) = where_clause else {
        return ScanPlan::FullScan;
    };
    if !where_clause.is_terminal() || !where_clause.columns_used().contains(pk) {
        return ScanPlan::FullScan;
    }
    match where_clause {
        Expr::Equals(_, right) => match literal(right) {
            Some(value) => ScanPlan::PrimaryKeyEquals(value),
            None => ScanPlan::FullScan,
        },
        Expr::InFunc(_, values) => {
            let literals: Option<Vec<Value>> = values.iter().map(literal).collect();
            match literals {
                Some(values) => ScanPlan::PrimaryKeyIn(values),
                None => ScanPlan::FullScan,
            }
        }
        Expr::GreaterThan(_, right) | Expr::GreaterThanEquals(_, right) => match literal(right) {
            Some(value) => ScanPlan::PrimaryKeyFrom(value),
            None => ScanPlan::FullScan,
        },
        Expr::LessThan(_, right) => match literal(right) {
            Some(value) => ScanPlan::PrimaryKeyTo(value, false),
            None => ScanPlan::FullScan,
        },
        Expr::LessThanEquals(_, right) => match literal(right) {
            Some(value) => ScanPlan::PrimaryKeyTo(value, true),
            None => ScanPlan::FullScan,
        },
        _ => ScanPlan::FullScan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk() -> ColumnReference {
        ColumnReference::new("main", "id")
    }

    fn col() -> Expr {
        Expr::Column(pk())
    }

    #[test]
    fn equals_on_primary_key_pushes_down() {
        let where_clause = Expr::Equals(Box::new(col()), Box::new(Expr::Integer(5)));
        assert_eq!(plan_for(Some(&where_clause), &pk()), ScanPlan::PrimaryKeyEquals(Value::Integer(5)));
    }

    #[test]
    fn equals_on_other_column_is_full_scan() {
        let other = ColumnReference::new("main", "name");
        let where_clause = Expr::Equals(Box::new(Expr::Column(other)), Box::new(Expr::Integer(5)));
        assert_eq!(plan_for(Some(&where_clause), &pk()), ScanPlan::FullScan);
    }

    #[test]
    fn and_of_two_terminals_is_full_scan() {
        let where_clause = Expr::And(
            Box::new(Expr::Equals(Box::new(col()), Box::new(Expr::Integer(5)))),
            Box::new(Expr::True),
        );
        assert_eq!(plan_for(Some(&where_clause), &pk()), ScanPlan::FullScan);
    }

    #[test]
    fn less_than_equals_is_inclusive_to() {
        let where_clause = Expr::LessThanEquals(Box::new(col()), Box::new(Expr::Integer(9)));
        assert_eq!(
            plan_for(Some(&where_clause), &pk()),
            ScanPlan::PrimaryKeyTo(Value::Integer(9), true)
        );
    }

    #[test]
    fn no_where_clause_is_full_scan() {
        assert_eq!(plan_for(None, &pk()), ScanPlan::FullScan);
    }
}
