// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for engine operations.
//!
//! Provides structured error handling with detailed context for debugging.

use std::fmt;

/// Standard Result type for all engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error types for engine operations.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Unexpected token while parsing SQL text.
    ParseError { reason: String, index: usize },

    /// Table already exists under this name.
    TableAlreadyExists { name: String },

    /// No table with this name is registered.
    TableNotFound { name: String },

    /// A user column is named `rowid` without carrying PRIMARY_KEY.
    ReservedRowidColumn { table: String },

    /// More than one column carries PRIMARY_KEY.
    MultiplePrimaryKeys { table: String },

    /// A column declares a type outside {int, double, varchar}.
    UnsupportedColumnType { table: String, column: String, declared: String },

    /// PRIMARY KEY declared on a non-int column.
    PrimaryKeyNotInt { table: String, column: String },

    /// Insert would create a second row with the same primary key.
    DuplicatePrimaryKey { table: String },

    /// A column reference could not be resolved against the current context.
    ValueNotAvailable { column: String },

    /// A comparison was attempted between incompatible `Value` tags.
    TypeMismatch { left: String, right: String },

    /// `direct_insert` received the wrong number of values for the schema.
    InsertArityMismatch { table: String, expected: usize, actual: usize },

    /// A range iterator was asked for a step other than 1.
    StepNotSupported,

    /// A statement kind this executor does not implement (e.g. DELETE, subqueries).
    Unsupported { what: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError { reason, index } => {
                write!(f, "parse error at byte {}: {}", index, reason)
            }
            Self::TableAlreadyExists { name } => {
                write!(f, "table '{}' already exists", name)
            }
            Self::TableNotFound { name } => {
                write!(f, "no table named '{}' found", name)
            }
            Self::ReservedRowidColumn { table } => {
                write!(
                    f,
                    "table '{}': a non-primary-key column cannot be named 'rowid'",
                    table
                )
            }
            Self::MultiplePrimaryKeys { table } => {
                write!(f, "table '{}': multiple primary keys not supported", table)
            }
            Self::UnsupportedColumnType { table, column, declared } => {
                write!(
                    f,
                    "table '{}', column '{}': unsupported type '{}'",
                    table, column, declared
                )
            }
            Self::PrimaryKeyNotInt { table, column } => {
                write!(
                    f,
                    "table '{}', column '{}': primary key must be int",
                    table, column
                )
            }
            Self::DuplicatePrimaryKey { table } => {
                write!(f, "table '{}': duplicate primary key on insert", table)
            }
            Self::ValueNotAvailable { column } => {
                write!(f, "value not available for column '{}'", column)
            }
            Self::TypeMismatch { left, right } => {
                write!(f, "type mismatch in comparison: {} vs {}", left, right)
            }
            Self::InsertArityMismatch { table, expected, actual } => {
                write!(
                    f,
                    "table '{}': expected {} values, got {}",
                    table, expected, actual
                )
            }
            Self::StepNotSupported => {
                write!(f, "range iteration with a step other than 1 is not supported")
            }
            Self::Unsupported { what } => {
                write!(f, "unsupported: {}", what)
            }
        }
    }
}

impl std::error::Error for EngineError {}
