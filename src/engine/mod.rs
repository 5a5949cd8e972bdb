// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The embeddable engine facade: parses SQL text and dispatches it against
//! a registry of in-memory tables.

mod executor;
pub mod plan;
pub mod result;
pub mod stats;

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::ast::Statement;
use crate::btree::Degree;
use crate::error::EngineError;
use crate::parser;
use crate::table::Table;

pub use plan::ScanPlan;
pub use result::{QueryResult, ResultRow, ResultSet};
pub use stats::QueryStats;

/// Engine-wide settings. Currently just the B+-tree fan-out every new
/// table's primary-key index is built with.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub btree_degree: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { btree_degree: Degree::default().value() }
    }
}

/// What [`Engine::execute`] accepts: either raw SQL text, parsed internally,
/// or a statement AST a caller already built (and may want to inspect or
/// rewrite before running it).
pub enum StatementInput {
    Sql(String),
    Statement(Statement),
}

impl From<&str> for StatementInput {
    fn from(sql: &str) -> Self {
        StatementInput::Sql(sql.to_string())
    }
}

impl From<String> for StatementInput {
    fn from(sql: String) -> Self {
        StatementInput::Sql(sql)
    }
}

impl From<Statement> for StatementInput {
    fn from(statement: Statement) -> Self {
        StatementInput::Statement(statement)
    }
}

/// A registry of tables plus the config they're created with. One `Engine`
/// is a single, unnamed database: there is no catalog of multiple databases.
pub struct Engine {
    tables: HashMap<String, Table>,
    degree: Degree,
    stats: QueryStats,
}

impl Engine {
    /// Fails if `config.btree_degree` is below the minimum fan-out a B+-tree
    /// needs to split (`Degree::new`).
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            tables: HashMap::new(),
            degree: Degree::new(config.btree_degree)?,
            stats: QueryStats::new(),
        })
    }

    /// Executes `stmt`, which is either raw SQL text (parsed internally) or
    /// an already-built statement AST.
    #[instrument(skip(self, stmt))]
    pub fn execute(&mut self, stmt: impl Into<StatementInput>) -> Result<QueryResult, EngineError> {
        let statement = match stmt.into() {
            StatementInput::Sql(sql) => {
                let parsed = parser::parse(&sql)?;
                info!(sql, "statement received");
                parsed
            }
            StatementInput::Statement(statement) => {
                info!("statement received (pre-built AST)");
                statement
            }
        };
        executor::execute(&mut self.tables, &mut self.stats, self.degree, statement)
    }

    pub fn stats(&self) -> QueryStats {
        self.stats
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

impl Default for Engine {
    fn default() -> Self {
        // The default degree (4) always passes `Degree::new`'s `>= 3` check.
        Self::new(EngineConfig::default()).expect("default engine config has a valid B+-tree degree")
    }
}
