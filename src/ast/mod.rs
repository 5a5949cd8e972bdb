// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Logic tree and statement AST shared by the parser and the executor.

pub mod column;
pub mod context;
pub mod expr;
pub mod statement;

pub use column::ColumnReference;
pub use context::Context;
pub use expr::Expr;
pub use statement::{CreateTable, Delete, FromClause, Insert, Join, JoinKind, OrderBy, Select, Statement, Update};
