// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The five statement shapes the parser produces and the executor consumes.

use crate::ast::column::ColumnReference;
use crate::ast::expr::Expr;
use crate::schema::ColumnDefinition;

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),
}

#[derive(Debug, Clone)]
pub struct CreateTable {
    pub table: String,
    pub columns: Vec<ColumnDefinition>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub table: String,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct Select {
    pub columns: Vec<ColumnReference>,
    pub from: FromClause,
    pub where_clause: Option<Expr>,
    pub order_by: Option<OrderBy>,
}

#[derive(Debug, Clone)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(ColumnReference, Expr)>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct FromClause {
    pub table: String,
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// `left`/`right` are `None` together when the join has no `ON` clause
/// (a cross join); otherwise both are set, with `right` always referring
/// to the newly joined table.
#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub left: Option<ColumnReference>,
    pub right: Option<ColumnReference>,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub columns: Vec<ColumnReference>,
    pub descending: bool,
}
