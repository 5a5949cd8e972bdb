// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The runtime value type flowing through expressions, rows, and the index.

use crate::error::EngineError;
use std::cmp::Ordering;
use std::fmt;

/// A single cell's worth of data: a signed 64-bit integer, a UTF-8 string, or null.
///
/// Comparisons across tags fail with [`EngineError::TypeMismatch`]; null compares
/// unequal to everything, including another null.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    String(String),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::String(_) => "string",
            Value::Null => "null",
        }
    }

    /// Natural-order comparison within a tag; `Err` for cross-tag or null comparisons.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering, EngineError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            _ => Err(EngineError::TypeMismatch {
                left: self.type_name().to_string(),
                right: other.type_name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "'{}'", v),
            Value::Null => write!(f, "NULL"),
        }
    }
}

/// Null is unequal to everything, including itself; otherwise equality is
/// same-tag natural equality. Cross-tag equality (non-null) is simply false,
/// not an error — only ordering comparisons raise a type mismatch.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

/// Ordered by tag-then-value so `Value` can key a `BTreeMap`-like arena index.
/// This total order is an implementation convenience for the B+-tree's key
/// slot, not the SQL comparison semantics (those go through `try_cmp`).
impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Integer(_) => 1,
                Value::String(_) => 2,
            }
        }
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Null, Value::Null) => Ordering::Equal,
            _ => rank(self).cmp(&rank(other)),
        }
    }
}
