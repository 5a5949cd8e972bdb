// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The expression tree used for `WHERE` clauses, `SET` assignments and
//! join conditions.
//!
//! Modeled as one tagged enum rather than a trait-object hierarchy: every
//! node carries the same small capability set (evaluate, simplify, visit,
//! columns_used), so there is nothing for dynamic dispatch to buy us.

use std::cmp::Ordering;

use crate::ast::column::ColumnReference;
use crate::ast::context::Context;
use crate::error::EngineError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    True,
    False,

    Equals(Box<Expr>, Box<Expr>),
    NotEquals(Box<Expr>, Box<Expr>),
    LessThan(Box<Expr>, Box<Expr>),
    LessThanEquals(Box<Expr>, Box<Expr>),
    GreaterThan(Box<Expr>, Box<Expr>),
    GreaterThanEquals(Box<Expr>, Box<Expr>),
    InFunc(Box<Expr>, Vec<Expr>),

    Integer(i64),
    String(String),
    Column(ColumnReference),
}

fn is_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Integer(_) | Expr::String(_))
}

fn literal_value(expr: &Expr) -> Value {
    match expr {
        Expr::Integer(v) => Value::Integer(*v),
        Expr::String(s) => Value::String(s.clone()),
        _ => unreachable!("literal_value called on a non-literal expression"),
    }
}

/// Puts the non-literal operand on the left, matching the convention index
/// pushdown relies on. Only ever called once both-literal has already been
/// folded away.
fn flip_if_left_literal(left: Expr, right: Expr) -> (Expr, Expr) {
    if is_literal(&left) {
        (right, left)
    } else {
        (left, right)
    }
}

fn fold_order(left: &Expr, right: &Expr, holds: impl Fn(Ordering) -> bool) -> Option<bool> {
    if !is_literal(left) || !is_literal(right) {
        return None;
    }
    literal_value(left).try_cmp(&literal_value(right)).ok().map(holds)
}

fn operand_left(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Equals(l, _) => Some(l),
        Expr::InFunc(l, _) => Some(l),
        _ => None,
    }
}

fn collect_values(expr: &Expr) -> Option<Vec<Expr>> {
    match expr {
        Expr::Equals(_, r) => Some(vec![(**r).clone()]),
        Expr::InFunc(_, values) => Some(values.clone()),
        _ => None,
    }
}

/// Merges `col = a OR col = b` (and the `IN` equivalents) into a single
/// `col IN (a, b)`, the one cross-node simplification rule.
fn try_merge_or(left: &Expr, right: &Expr) -> Option<Expr> {
    let (left_col, right_col) = (operand_left(left)?, operand_left(right)?);
    match (left_col, right_col) {
        (Expr::Column(a), Expr::Column(b)) if a == b => {
            let mut values = collect_values(left)?;
            values.extend(collect_values(right)?);
            Some(Expr::InFunc(Box::new(Expr::Column(a.clone())), values))
        }
        _ => None,
    }
}

impl Expr {
    /// True for the comparison/membership nodes that sit at the leaves of
    /// the boolean tree and can drive index pushdown.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Expr::Equals(..)
                | Expr::NotEquals(..)
                | Expr::LessThan(..)
                | Expr::LessThanEquals(..)
                | Expr::GreaterThan(..)
                | Expr::GreaterThanEquals(..)
                | Expr::InFunc(..)
        )
    }

    /// Evaluates a literal or column node to a concrete value.
    pub fn eval_value(&self, ctx: &Context) -> Result<Value, EngineError> {
        match self {
            Expr::Integer(v) => Ok(Value::Integer(*v)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Column(reference) => ctx
                .get(reference)
                .cloned()
                .ok_or_else(|| EngineError::ValueNotAvailable {
                    column: reference.to_string(),
                }),
            other => panic!("eval_value called on non-value expression {other:?}"),
        }
    }

    /// Evaluates a boolean node (logical connective, comparison, or `IN`).
    pub fn eval_bool(&self, ctx: &Context) -> Result<bool, EngineError> {
        match self {
            Expr::True => Ok(true),
            Expr::False => Ok(false),
            Expr::And(l, r) => Ok(l.eval_bool(ctx)? && r.eval_bool(ctx)?),
            Expr::Or(l, r) => Ok(l.eval_bool(ctx)? || r.eval_bool(ctx)?),
            Expr::Not(e) => Ok(!e.eval_bool(ctx)?),
            Expr::Equals(l, r) => Ok(l.eval_value(ctx)? == r.eval_value(ctx)?),
            Expr::NotEquals(l, r) => Ok(l.eval_value(ctx)? != r.eval_value(ctx)?),
            Expr::LessThan(l, r) => {
                Ok(l.eval_value(ctx)?.try_cmp(&r.eval_value(ctx)?)? == Ordering::Less)
            }
            Expr::LessThanEquals(l, r) => {
                Ok(l.eval_value(ctx)?.try_cmp(&r.eval_value(ctx)?)? != Ordering::Greater)
            }
            Expr::GreaterThan(l, r) => {
                Ok(l.eval_value(ctx)?.try_cmp(&r.eval_value(ctx)?)? == Ordering::Greater)
            }
            Expr::GreaterThanEquals(l, r) => {
                Ok(l.eval_value(ctx)?.try_cmp(&r.eval_value(ctx)?)? != Ordering::Less)
            }
            Expr::InFunc(left, values) => {
                let needle = left.eval_value(ctx)?;
                for candidate in values {
                    if needle == candidate.eval_value(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            other => panic!("eval_bool called on non-boolean expression {other:?}"),
        }
    }

    /// Pre-order visit over the logical connectives. Comparison and literal
    /// nodes are leaves of this walk; they never recurse into their operands.
    pub fn visit<F: FnMut(&Expr)>(&self, consumer: &mut F) {
        consumer(self);
        match self {
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.visit(consumer);
                r.visit(consumer);
            }
            Expr::Not(e) => e.visit(consumer),
            _ => {}
        }
    }

    /// Column operands referenced directly by a comparison or `IN` node.
    /// Non-terminal nodes report none of their own; combine with [`Expr::visit`]
    /// to gather columns across an entire tree.
    pub fn columns_used(&self) -> Vec<ColumnReference> {
        let mut out = Vec::new();
        let mut push = |e: &Expr| {
            if let Expr::Column(c) = e {
                out.push(c.clone());
            }
        };
        match self {
            Expr::Equals(l, r)
            | Expr::NotEquals(l, r)
            | Expr::LessThan(l, r)
            | Expr::LessThanEquals(l, r)
            | Expr::GreaterThan(l, r)
            | Expr::GreaterThanEquals(l, r) => {
                push(l);
                push(r);
            }
            Expr::InFunc(left, values) => {
                push(left);
                for v in values {
                    push(v);
                }
            }
            _ => {}
        }
        out
    }

    /// Folds constant comparisons, normalizes literal-on-left operands, and
    /// merges `col = a OR col = b` chains into `col IN (...)`.
    pub fn simplify(self) -> Expr {
        match self {
            Expr::And(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if matches!(l, Expr::False) || matches!(r, Expr::False) {
                    Expr::False
                } else if matches!(l, Expr::True) && matches!(r, Expr::True) {
                    Expr::True
                } else if matches!(l, Expr::True) {
                    r
                } else if matches!(r, Expr::True) {
                    l
                } else {
                    Expr::And(Box::new(l), Box::new(r))
                }
            }
            Expr::Or(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if matches!(l, Expr::True) || matches!(r, Expr::True) {
                    Expr::True
                } else if matches!(l, Expr::False) && matches!(r, Expr::False) {
                    Expr::False
                } else if matches!(l, Expr::False) {
                    r
                } else if matches!(r, Expr::False) {
                    l
                } else if let Some(merged) = try_merge_or(&l, &r) {
                    merged
                } else {
                    Expr::Or(Box::new(l), Box::new(r))
                }
            }
            Expr::Not(e) => match e.simplify() {
                Expr::True => Expr::False,
                Expr::False => Expr::True,
                Expr::Equals(l, r) => Expr::NotEquals(l, r),
                Expr::NotEquals(l, r) => Expr::Equals(l, r),
                other => Expr::Not(Box::new(other)),
            },
            Expr::Equals(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if is_literal(&l) && is_literal(&r) {
                    return if literal_value(&l) == literal_value(&r) {
                        Expr::True
                    } else {
                        Expr::False
                    };
                }
                let (l, r) = flip_if_left_literal(l, r);
                Expr::Equals(Box::new(l), Box::new(r))
            }
            Expr::NotEquals(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if is_literal(&l) && is_literal(&r) {
                    return if literal_value(&l) != literal_value(&r) {
                        Expr::True
                    } else {
                        Expr::False
                    };
                }
                let (l, r) = flip_if_left_literal(l, r);
                Expr::NotEquals(Box::new(l), Box::new(r))
            }
            Expr::LessThan(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if let Some(holds) = fold_order(&l, &r, |o| o == Ordering::Less) {
                    return if holds { Expr::True } else { Expr::False };
                }
                let (l, r) = flip_if_left_literal(l, r);
                Expr::LessThan(Box::new(l), Box::new(r))
            }
            Expr::LessThanEquals(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if let Some(holds) = fold_order(&l, &r, |o| o != Ordering::Greater) {
                    return if holds { Expr::True } else { Expr::False };
                }
                let (l, r) = flip_if_left_literal(l, r);
                Expr::LessThanEquals(Box::new(l), Box::new(r))
            }
            Expr::GreaterThan(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if let Some(holds) = fold_order(&l, &r, |o| o == Ordering::Greater) {
                    return if holds { Expr::True } else { Expr::False };
                }
                let (l, r) = flip_if_left_literal(l, r);
                Expr::GreaterThan(Box::new(l), Box::new(r))
            }
            Expr::GreaterThanEquals(l, r) => {
                let l = l.simplify();
                let r = r.simplify();
                if let Some(holds) = fold_order(&l, &r, |o| o != Ordering::Less) {
                    return if holds { Expr::True } else { Expr::False };
                }
                let (l, r) = flip_if_left_literal(l, r);
                Expr::GreaterThanEquals(Box::new(l), Box::new(r))
            }
            // InFunc does not recurse into its operands, matching the source
            // it is grounded on. True/False/literals/columns are already
            // in simplest form.
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Expr {
        Expr::Column(ColumnReference::new("main", name))
    }

    #[test]
    fn and_folds_to_false_when_either_side_is_false() {
        let simplified = Expr::And(Box::new(Expr::False), Box::new(Expr::True)).simplify();
        assert_eq!(simplified, Expr::False);
    }

    #[test]
    fn or_merges_equals_into_in() {
        let e = Expr::Or(
            Box::new(Expr::Equals(Box::new(col("id")), Box::new(Expr::Integer(1)))),
            Box::new(Expr::Equals(Box::new(col("id")), Box::new(Expr::Integer(2)))),
        );
        let simplified = e.simplify();
        assert_eq!(
            simplified,
            Expr::InFunc(Box::new(col("id")), vec![Expr::Integer(1), Expr::Integer(2)])
        );
    }

    #[test]
    fn literal_on_left_is_flipped() {
        let e = Expr::Equals(Box::new(Expr::Integer(1)), Box::new(col("id")));
        let simplified = e.simplify();
        assert_eq!(
            simplified,
            Expr::Equals(Box::new(col("id")), Box::new(Expr::Integer(1)))
        );
    }

    #[test]
    fn both_literal_comparison_folds_to_constant() {
        let e = Expr::LessThan(Box::new(Expr::Integer(1)), Box::new(Expr::Integer(2)));
        assert_eq!(e.simplify(), Expr::True);
    }

    #[test]
    fn not_of_equals_becomes_not_equals() {
        let e = Expr::Not(Box::new(Expr::Equals(Box::new(col("id")), Box::new(Expr::Integer(1)))));
        assert_eq!(
            e.simplify(),
            Expr::NotEquals(Box::new(col("id")), Box::new(Expr::Integer(1)))
        );
    }

    #[test]
    fn eval_bool_in_func_matches_any_value() {
        let ctx = Context::new(&[ColumnReference::new("main", "id")], &[Value::Integer(2)]);
        let e = Expr::InFunc(Box::new(col("id")), vec![Expr::Integer(1), Expr::Integer(2)]);
        assert!(e.eval_bool(&ctx).unwrap());
    }

    #[test]
    fn columns_used_reports_both_operands() {
        let e = Expr::Equals(Box::new(col("id")), Box::new(col("other_id")));
        let used = e.columns_used();
        assert_eq!(used.len(), 2);
    }
}
