// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Hand-written recursive-descent parser for the engine's SQL subset.
//!
//! NO external SQL parsing crate: the grammar is small and fixed, and a
//! hand-written parser keeps the statement/error model identical to the
//! rest of the engine.
//!
//! ```text
//! statement   := select | insert | create | update | delete
//! select      := SELECT col_list from_clause [WHERE expr] [ORDER BY col_list [DESC]]
//! insert      := INSERT INTO table VALUES '(' literal_list ')'
//! create      := CREATE TABLE table '(' coldef { ',' coldef } ')'
//! update      := UPDATE table SET assign { ',' assign } [WHERE expr]
//! delete      := DELETE FROM table [WHERE expr]
//! from_clause := FROM table { (JOIN | LEFT JOIN) table [ON column '=' column] }
//! expr        := or_expr
//! or_expr     := and_expr { OR and_expr }
//! and_expr    := cmp { AND cmp }
//! cmp         := NOT '(' expr ')' | '(' expr ')' | operand op operand | operand IN '(' literal_list ')'
//! operand     := integer | string | column
//! column      := name '.' name [AS name]
//! ```

use crate::ast::statement::{CreateTable, Delete, FromClause, Insert, Join, JoinKind, OrderBy, Select, Update};
use crate::ast::{ColumnReference, Expr, Statement};
use crate::error::EngineError;
use crate::schema::{ColumnDefinition, ColumnType};

/// Parses one SQL statement. Trailing input after the recognized clauses is
/// a parse error.
pub fn parse(sql: &str) -> Result<Statement, EngineError> {
    Parser::new(sql).parse_statement()
}

struct Parser<'a> {
    query: &'a str,
    pos: usize,
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Parser<'a> {
    fn new(query: &'a str) -> Self {
        Self { query, pos: 0 }
    }

    fn error(&self, reason: impl Into<String>, index: usize) -> EngineError {
        EngineError::ParseError {
            reason: reason.into(),
            index,
        }
    }

    fn skip_ws_from(&self, mut pos: usize) -> usize {
        let bytes = self.query.as_bytes();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        pos
    }

    fn word_at(&self, start: usize) -> &'a str {
        let bytes = self.query.as_bytes();
        let mut end = start;
        while end < bytes.len() && is_word_char(bytes[end]) {
            end += 1;
        }
        &self.query[start..end]
    }

    fn digits_at(&self, start: usize) -> &'a str {
        let bytes = self.query.as_bytes();
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        &self.query[start..end]
    }

    fn peek_word(&self) -> &'a str {
        self.word_at(self.skip_ws_from(self.pos))
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek_word().eq_ignore_ascii_case(keyword)
    }

    fn consume_word(&mut self) -> Result<&'a str, EngineError> {
        let start = self.skip_ws_from(self.pos);
        let word = self.word_at(start);
        if word.is_empty() {
            return Err(self.error("expected an identifier", start));
        }
        self.pos = start + word.len();
        Ok(word)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), EngineError> {
        let start = self.skip_ws_from(self.pos);
        let word = self.word_at(start);
        if word.eq_ignore_ascii_case(keyword) {
            self.pos = start + word.len();
            Ok(())
        } else {
            Err(self.error(format!("expected '{keyword}'"), start))
        }
    }

    fn peek_char_is(&self, ch: char) -> bool {
        let start = self.skip_ws_from(self.pos);
        self.query[start..].starts_with(ch)
    }

    fn expect_char(&mut self, ch: char) -> Result<(), EngineError> {
        let start = self.skip_ws_from(self.pos);
        if self.query[start..].starts_with(ch) {
            self.pos = start + ch.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{ch}'"), start))
        }
    }

    fn at_end(&self) -> bool {
        self.skip_ws_from(self.pos) >= self.query.len()
    }

    fn checkpoint(&self) -> usize {
        self.pos
    }

    fn restore(&mut self, checkpoint: usize) {
        self.pos = checkpoint;
    }

    fn parse_list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T, EngineError>) -> Result<Vec<T>, EngineError> {
        let mut out = vec![item(self)?];
        while self.peek_char_is(',') {
            self.expect_char(',')?;
            out.push(item(self)?);
        }
        Ok(out)
    }

    fn parse_column_reference(&mut self) -> Result<ColumnReference, EngineError> {
        let table = self.consume_word()?.to_string();
        self.expect_char('.')?;
        let column = self.consume_word()?.to_string();
        if self.peek_keyword("AS") {
            self.expect_keyword("AS")?;
            let alias = self.consume_word()?.to_string();
            Ok(ColumnReference::with_alias(table, column, alias))
        } else {
            Ok(ColumnReference::new(table, column))
        }
    }

    fn parse_integer_literal(&mut self) -> Result<Expr, EngineError> {
        let start = self.skip_ws_from(self.pos);
        let digits = self.digits_at(start);
        if digits.is_empty() {
            return Err(self.error("expected an integer literal", start));
        }
        self.pos = start + digits.len();
        let value: i64 = digits
            .parse()
            .map_err(|_| self.error("integer literal out of range", start))?;
        Ok(Expr::Integer(value))
    }

    /// `'...'`, with `''` as an escaped single quote inside the literal.
    fn parse_string_literal(&mut self) -> Result<Expr, EngineError> {
        let start = self.skip_ws_from(self.pos);
        let bytes = self.query.as_bytes();
        if start >= bytes.len() || bytes[start] != b'\'' {
            return Err(self.error("expected a string literal", start));
        }
        let mut pos = start + 1;
        let mut out = String::new();
        loop {
            if pos >= bytes.len() {
                return Err(self.error("unterminated string literal", start));
            }
            if bytes[pos] == b'\'' {
                if pos + 1 < bytes.len() && bytes[pos + 1] == b'\'' {
                    out.push('\'');
                    pos += 2;
                    continue;
                }
                pos += 1;
                break;
            }
            out.push(bytes[pos] as char);
            pos += 1;
        }
        self.pos = pos;
        Ok(Expr::String(out))
    }

    /// The three-way speculative alternation {integer, string, column}, with
    /// a single checkpoint shared across all three attempts.
    fn parse_operand(&mut self) -> Result<Expr, EngineError> {
        let checkpoint = self.checkpoint();
        if let Ok(v) = self.parse_integer_literal() {
            return Ok(v);
        }
        self.restore(checkpoint);
        if let Ok(v) = self.parse_string_literal() {
            return Ok(v);
        }
        self.restore(checkpoint);
        match self.parse_column_reference() {
            Ok(c) => Ok(Expr::Column(c)),
            Err(e) => {
                self.restore(checkpoint);
                Err(e)
            }
        }
    }

    fn parse_comparison_operator(&mut self) -> Result<&'static str, EngineError> {
        let start = self.skip_ws_from(self.pos);
        let rest = &self.query[start..];
        for two in ["!=", "<=", ">="] {
            if rest.starts_with(two) {
                self.pos = start + 2;
                return Ok(two);
            }
        }
        for one in ["=", "<", ">"] {
            if rest.starts_with(one) {
                self.pos = start + 1;
                return Ok(one);
            }
        }
        Err(self.error("expected a comparison operator", start))
    }

    fn parse_or_expr(&mut self) -> Result<Expr, EngineError> {
        let mut left = self.parse_and_expr()?;
        while self.peek_keyword("OR") {
            self.expect_keyword("OR")?;
            let right = self.parse_and_expr()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, EngineError> {
        let mut left = self.parse_cmp()?;
        while self.peek_keyword("AND") {
            self.expect_keyword("AND")?;
            let right = self.parse_cmp()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_cmp(&mut self) -> Result<Expr, EngineError> {
        if self.peek_keyword("NOT") {
            self.expect_keyword("NOT")?;
            self.expect_char('(')?;
            let inner = self.parse_or_expr()?;
            self.expect_char(')')?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if self.peek_char_is('(') {
            self.expect_char('(')?;
            let inner = self.parse_or_expr()?;
            self.expect_char(')')?;
            return Ok(inner);
        }

        let left = self.parse_operand()?;
        if self.peek_keyword("IN") {
            self.expect_keyword("IN")?;
            self.expect_char('(')?;
            let values = self.parse_list(|p| p.parse_operand())?;
            self.expect_char(')')?;
            return Ok(Expr::InFunc(Box::new(left), values));
        }

        let op = self.parse_comparison_operator()?;
        let right = self.parse_operand()?;
        Ok(match op {
            "=" => Expr::Equals(Box::new(left), Box::new(right)),
            "!=" => Expr::NotEquals(Box::new(left), Box::new(right)),
            "<" => Expr::LessThan(Box::new(left), Box::new(right)),
            "<=" => Expr::LessThanEquals(Box::new(left), Box::new(right)),
            ">" => Expr::GreaterThan(Box::new(left), Box::new(right)),
            ">=" => Expr::GreaterThanEquals(Box::new(left), Box::new(right)),
            _ => unreachable!("parse_comparison_operator only returns the six known operators"),
        })
    }

    fn parse_from_clause(&mut self) -> Result<FromClause, EngineError> {
        self.expect_keyword("FROM")?;
        let table = self.consume_word()?.to_string();
        let mut joins = Vec::new();
        loop {
            let kind = if self.peek_keyword("LEFT") {
                self.expect_keyword("LEFT")?;
                self.expect_keyword("JOIN")?;
                JoinKind::Left
            } else if self.peek_keyword("JOIN") {
                self.expect_keyword("JOIN")?;
                JoinKind::Inner
            } else {
                break;
            };
            let joined_table = self.consume_word()?.to_string();
            let (left, right) = if self.peek_keyword("ON") {
                self.expect_keyword("ON")?;
                let mut left = self.parse_column_reference()?;
                self.expect_char('=')?;
                let mut right = self.parse_column_reference()?;
                // Always order so the joining table is second.
                if right.table != joined_table {
                    std::mem::swap(&mut left, &mut right);
                }
                (Some(left), Some(right))
            } else {
                (None, None)
            };
            joins.push(Join {
                kind,
                table: joined_table,
                left,
                right,
            });
        }
        Ok(FromClause { table, joins })
    }

    fn parse_order_by(&mut self) -> Result<OrderBy, EngineError> {
        self.expect_keyword("ORDER")?;
        self.expect_keyword("BY")?;
        let columns = self.parse_list(|p| p.parse_column_reference())?;
        let descending = if self.peek_keyword("DESC") {
            self.expect_keyword("DESC")?;
            true
        } else {
            false
        };
        Ok(OrderBy { columns, descending })
    }

    fn parse_optional_where(&mut self) -> Result<Option<Expr>, EngineError> {
        if self.at_end() {
            return Ok(None);
        }
        if self.peek_keyword("WHERE") {
            self.expect_keyword("WHERE")?;
            Ok(Some(self.parse_or_expr()?.simplify()))
        } else {
            let start = self.skip_ws_from(self.pos);
            Err(self.error("expected 'WHERE' or end of statement", start))
        }
    }

    fn parse_select(&mut self) -> Result<Select, EngineError> {
        let columns = self.parse_list(|p| p.parse_column_reference())?;
        let from = self.parse_from_clause()?;

        let mut where_clause = None;
        let mut saw_where = false;
        if self.peek_keyword("WHERE") {
            self.expect_keyword("WHERE")?;
            where_clause = Some(self.parse_or_expr()?.simplify());
            saw_where = true;
        }

        let order_by = if self.peek_keyword("ORDER") {
            Some(self.parse_order_by()?)
        } else {
            None
        };

        if !self.at_end() {
            let start = self.skip_ws_from(self.pos);
            let expected = if saw_where { "ORDER BY" } else { "WHERE or ORDER BY" };
            return Err(self.error(format!("unexpected input, expected {expected}"), start));
        }

        Ok(Select {
            columns,
            from,
            where_clause,
            order_by,
        })
    }

    fn parse_insert(&mut self) -> Result<Insert, EngineError> {
        self.expect_keyword("INTO")?;
        let table = self.consume_word()?.to_string();
        self.expect_keyword("VALUES")?;
        self.expect_char('(')?;
        let values = self.parse_list(|p| p.parse_operand())?;
        self.expect_char(')')?;
        Ok(Insert { table, values })
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition, EngineError> {
        let name = self.consume_word()?.to_string();
        let type_start = self.skip_ws_from(self.pos);
        let type_word = self.consume_word()?;
        let col_type = match type_word.to_ascii_lowercase().as_str() {
            "int" => ColumnType::Int,
            "double" => ColumnType::Double,
            "varchar" => ColumnType::Varchar,
            other => return Err(self.error(format!("unknown column type '{other}'"), type_start)),
        };

        let mut def = ColumnDefinition::new(name, col_type);
        if col_type == ColumnType::Varchar && self.peek_char_is('(') {
            self.expect_char('(')?;
            let start = self.skip_ws_from(self.pos);
            let digits = self.digits_at(start);
            if digits.is_empty() {
                return Err(self.error("expected a varchar size", start));
            }
            self.pos = start + digits.len();
            let size: usize = digits
                .parse()
                .map_err(|_| self.error("varchar size out of range", start))?;
            self.expect_char(')')?;
            def = def.with_max_length(size);
        }

        loop {
            if self.peek_keyword("PRIMARY") {
                self.expect_keyword("PRIMARY")?;
                self.expect_keyword("KEY")?;
                def = def.primary_key();
            } else if self.peek_keyword("UNIQUE") {
                self.expect_keyword("UNIQUE")?;
                def = def.unique();
            } else if self.peek_keyword("NOT") {
                self.expect_keyword("NOT")?;
                self.expect_keyword("NULL")?;
                def = def.not_null();
            } else {
                break;
            }
        }
        Ok(def)
    }

    fn parse_create_table(&mut self) -> Result<CreateTable, EngineError> {
        self.expect_keyword("TABLE")?;
        let table = self.consume_word()?.to_string();
        self.expect_char('(')?;
        let columns = self.parse_list(|p| p.parse_column_definition())?;
        self.expect_char(')')?;
        Ok(CreateTable { table, columns })
    }

    fn parse_assignment(&mut self) -> Result<(ColumnReference, Expr), EngineError> {
        let column = self.parse_column_reference()?;
        self.expect_char('=')?;
        let value = self.parse_operand()?;
        Ok((column, value))
    }

    fn parse_update(&mut self) -> Result<Update, EngineError> {
        let table = self.consume_word()?.to_string();
        self.expect_keyword("SET")?;
        let assignments = self.parse_list(|p| p.parse_assignment())?;
        let where_clause = self.parse_optional_where()?;
        Ok(Update {
            table,
            assignments,
            where_clause,
        })
    }

    fn parse_delete(&mut self) -> Result<Delete, EngineError> {
        self.expect_keyword("FROM")?;
        let table = self.consume_word()?.to_string();
        let where_clause = self.parse_optional_where()?;
        Ok(Delete { table, where_clause })
    }

    fn parse_statement(&mut self) -> Result<Statement, EngineError> {
        let keyword = self.consume_word()?.to_ascii_lowercase();
        match keyword.as_str() {
            "select" => self.parse_select().map(Statement::Select),
            "insert" => self.parse_insert().map(Statement::Insert),
            "create" => self.parse_create_table().map(Statement::CreateTable),
            "update" => self.parse_update().map(Statement::Update),
            "delete" => self.parse_delete().map(Statement::Delete),
            other => Err(self.error(format!("unknown statement type '{other}'"), 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(table: &str, column: &str) -> ColumnReference {
        ColumnReference::new(table, column)
    }

    #[test]
    fn parses_select_with_where_equals() {
        let stmt = parse("select main.id, main.cola from main where main.id = 1").unwrap();
        match stmt {
            Statement::Select(select) => {
                assert_eq!(select.columns, vec![col("main", "id"), col("main", "cola")]);
                assert_eq!(select.from.table, "main");
                assert_eq!(
                    select.where_clause,
                    Some(Expr::Equals(Box::new(Expr::Column(col("main", "id"))), Box::new(Expr::Integer(1))))
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn parses_insert_values() {
        let stmt = parse("insert into main values(1, 'a1')").unwrap();
        match stmt {
            Statement::Insert(insert) => {
                assert_eq!(insert.table, "main");
                assert_eq!(insert.values, vec![Expr::Integer(1), Expr::String("a1".to_string())]);
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }

    #[test]
    fn parses_create_table_with_constraints() {
        let stmt = parse("create table main(id int primary key, cola varchar(10) unique)").unwrap();
        match stmt {
            Statement::CreateTable(create) => {
                assert_eq!(create.table, "main");
                assert_eq!(create.columns.len(), 2);
                assert!(create.columns[0].primary_key);
                assert!(create.columns[1].unique);
                assert_eq!(create.columns[1].varchar_size, Some(10));
            }
            other => panic!("expected CreateTable, got {other:?}"),
        }
    }

    #[test]
    fn join_condition_is_oriented_with_joined_table_second() {
        let stmt = parse("select main.id from main join other on other.id = main.other_id").unwrap();
        match stmt {
            Statement::Select(select) => {
                let join = &select.from.joins[0];
                assert_eq!(join.table, "other");
                assert_eq!(join.left.as_ref().unwrap(), &col("main", "other_id"));
                assert_eq!(join.right.as_ref().unwrap(), &col("other", "id"));
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn left_join_is_recognized() {
        let stmt = parse("select main.id from main left join other on main.id = other.id").unwrap();
        match stmt {
            Statement::Select(select) => {
                assert_eq!(select.from.joins[0].kind, JoinKind::Left);
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn where_or_of_equals_simplifies_to_in() {
        let stmt = parse("select main.id from main where main.id = 1 or main.id = 2").unwrap();
        match stmt {
            Statement::Select(select) => {
                assert_eq!(
                    select.where_clause,
                    Some(Expr::InFunc(
                        Box::new(Expr::Column(col("main", "id"))),
                        vec![Expr::Integer(1), Expr::Integer(2)]
                    ))
                );
            }
            other => panic!("expected Select, got {other:?}"),
        }
    }

    #[test]
    fn update_sets_and_filters_by_where() {
        let stmt = parse("update main set main.cola = 1 where main.rowid = 0").unwrap();
        match stmt {
            Statement::Update(update) => {
                assert_eq!(update.table, "main");
                assert_eq!(update.assignments, vec![(col("main", "cola"), Expr::Integer(1))]);
                assert!(update.where_clause.is_some());
            }
            other => panic!("expected Update, got {other:?}"),
        }
    }

    #[test]
    fn delete_without_where_is_allowed() {
        let stmt = parse("delete from main").unwrap();
        match stmt {
            Statement::Delete(delete) => {
                assert_eq!(delete.table, "main");
                assert!(delete.where_clause.is_none());
            }
            other => panic!("expected Delete, got {other:?}"),
        }
    }

    #[test]
    fn unqualified_column_is_a_parse_error() {
        let err = parse("select id from main").unwrap_err();
        assert!(matches!(err, EngineError::ParseError { .. }));
    }

    #[test]
    fn trailing_garbage_after_where_is_a_parse_error() {
        let err = parse("select main.id from main where main.id = 1 garbage").unwrap_err();
        assert!(matches!(err, EngineError::ParseError { .. }));
    }
}
