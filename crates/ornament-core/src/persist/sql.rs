//! Flat SQL statement shapes.
//!
//! Rendering only; statements carry positional `?` placeholders and their
//! parameters in placeholder order. Identifiers are taken from model
//! metadata and are not quoted.

use crate::value::Value;
use std::fmt::Write;

///
/// Statement
///

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

///
/// QueryOptions
/// ORDER / LIMIT / OFFSET of a flat query.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryOptions {
    pub order: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl QueryOptions {
    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Strip an ORDER BY clause down to word characters, commas, whitespace
/// and parentheses.
#[must_use]
pub fn sanitize_order(order: &str) -> String {
    order
        .chars()
        .filter(|c| {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | ',' | '(' | ')')
        })
        .collect()
}

// `a = ?` terms joined by `sep`, pushing parameters in order
fn assignments(pairs: &[(&str, Value)], sep: &str, params: &mut Vec<Value>) -> String {
    pairs
        .iter()
        .map(|(name, value)| {
            params.push(value.clone());
            format!("{name} = ?")
        })
        .collect::<Vec<_>>()
        .join(sep)
}

/// `SELECT * FROM t [WHERE ..] [ORDER BY ..] [LIMIT n] [OFFSET m]`
#[must_use]
pub fn select(table: &str, filter: &[(&str, Value)], options: &QueryOptions) -> Statement {
    let mut params = Vec::with_capacity(filter.len());
    let mut sql = format!("SELECT * FROM {table}");

    if !filter.is_empty() {
        let _ = write!(sql, " WHERE {}", assignments(filter, " AND ", &mut params));
    }
    if let Some(order) = &options.order {
        let _ = write!(sql, " ORDER BY {}", sanitize_order(order));
    }
    if let Some(limit) = options.limit {
        let _ = write!(sql, " LIMIT {limit}");
    }
    if let Some(offset) = options.offset {
        let _ = write!(sql, " OFFSET {offset}");
    }

    Statement { sql, params }
}

/// `INSERT INTO t (..) VALUES (?, ..)` over the fields holding a value.
#[must_use]
pub fn insert(table: &str, data: &[(&str, Value)]) -> Statement {
    let (names, params): (Vec<&str>, Vec<Value>) = data
        .iter()
        .filter(|(_, value)| !value.is_absent())
        .map(|(name, value)| (*name, value.clone()))
        .unzip();

    let placeholders = vec!["?"; names.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        names.join(", ")
    );

    Statement { sql, params }
}

/// `UPDATE t SET a = ?, .. WHERE pk = ? AND ..`
#[must_use]
pub fn update(table: &str, data: &[(&str, Value)], key: &[(&str, Value)]) -> Statement {
    let mut params = Vec::with_capacity(data.len() + key.len());
    let set = assignments(data, ", ", &mut params);
    let filter = assignments(key, " AND ", &mut params);

    Statement {
        sql: format!("UPDATE {table} SET {set} WHERE {filter}"),
        params,
    }
}

/// `DELETE FROM t WHERE pk = ? AND ..`
#[must_use]
pub fn delete(table: &str, key: &[(&str, Value)]) -> Statement {
    let mut params = Vec::with_capacity(key.len());
    let filter = assignments(key, " AND ", &mut params);

    Statement {
        sql: format!("DELETE FROM {table} WHERE {filter}"),
        params,
    }
}

///
/// TESTS
///
