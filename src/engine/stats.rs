// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Counters accumulated across the lifetime of an [`Engine`](crate::engine::Engine).

/// Running totals updated after every statement `Engine::execute` processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStats {
    pub statements_executed: u64,
    pub rows_scanned: u64,
    pub rows_returned: u64,
    pub pushdown_hits: u64,
    pub full_scans: u64,
}

impl QueryStats {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let stats = QueryStats::new();
        assert_eq!(stats.statements_executed, 0);
        assert_eq!(stats.rows_scanned, 0);
    }
}
