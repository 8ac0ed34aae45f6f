//! Statement-level analysis: which tables a statement reads, and a per-statement
//! summary (normalized text, kind, root node).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, trace};

use crate::ast::{NodeKind, Statement};
use crate::error::{AstError, Result};
use crate::grammar::{parse_async, Grammar, PgGrammar};

/// A table referenced by a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl Table {
    /// Deduplication key: `schema.name`, or `name` when unqualified.
    pub fn key(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

/// One statement of a parsed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    /// The statement, normalized.
    pub query: String,
    /// Kind of the statement's root node.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// The root node's field record.
    pub node: Value,
}

fn non_empty_str<'a>(node: &'a Value, field: &str, kind: NodeKind) -> Result<&'a str> {
    node.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AstError::MalformedTree(format!("{kind} without {field}")))
}

/// Names of every CTE declared anywhere in the statement.
pub fn cte_names(stmt: &Statement) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for n in stmt.nodes().filter(|n| n.kind == NodeKind::CommonTableExpr) {
        names.insert(non_empty_str(n.node, "ctename", n.kind)?.to_string());
    }
    Ok(names)
}

/// Distinct tables read by one statement, in order of first appearance.
///
/// Unqualified references to a CTE of the same statement are not tables.
/// Tables are told apart by their exact, case-sensitive `schema.name` key.
pub fn tables_in_statement(stmt: &Statement) -> Result<Vec<Table>> {
    let ctes = cte_names(stmt)?;

    let mut tables = Vec::new();
    let mut seen = HashSet::new();
    for n in stmt.nodes().filter(|n| n.kind == NodeKind::RangeVar) {
        let name = non_empty_str(n.node, "relname", n.kind)?;
        let schema = n.node.get("schemaname").and_then(Value::as_str).filter(|s| !s.is_empty());
        if schema.is_none() && ctes.contains(name) {
            trace!(table = name, "Skipping CTE reference");
            continue;
        }
        let table = Table {
            name: name.to_string(),
            schema: schema.map(str::to_string),
        };
        if seen.insert(table.key()) {
            tables.push(table);
        }
    }
    Ok(tables)
}

fn tables_per_statement(stmts: &[Statement]) -> Result<Vec<Vec<Table>>> {
    stmts.iter().map(tables_in_statement).collect()
}

/// Tables read by each statement of `sql`: one list per statement.
///
/// ```no_run
/// let tables = pgtree::tables_queried("select * from ns.a; select * from b")?;
/// assert_eq!(tables[0][0].schema.as_deref(), Some("ns"));
/// assert_eq!(tables[1][0].name, "b");
/// # Ok::<(), pgtree::AstError>(())
/// ```
#[instrument(skip(sql), fields(sql_len = sql.len()))]
pub fn tables_queried(sql: &str) -> Result<Vec<Vec<Table>>> {
    tables_per_statement(&PgGrammar.parse(sql)?)
}

/// Async version of [`tables_queried`].
///
/// # Panics
///
/// Panics when called outside a Tokio runtime; parsing runs on the blocking
/// pool via `spawn_blocking`.
pub async fn tables_queried_async(sql: &str) -> Result<Vec<Vec<Table>>> {
    tables_per_statement(&parse_async(PgGrammar, sql).await?)
}

fn summarize<G: Grammar>(grammar: &G, stmt: Statement) -> Result<Stmt> {
    let kind = stmt.kind()?;
    let query = grammar.render_one(&stmt)?;
    let node = stmt.node()?.clone();
    Ok(Stmt { query, kind, node })
}

/// Break `sql` into normalized statements with their kind and root node.
#[instrument(skip(sql), fields(sql_len = sql.len()))]
pub fn to_stmts(sql: &str) -> Result<Vec<Stmt>> {
    PgGrammar
        .parse(sql)?
        .into_iter()
        .map(|stmt| summarize(&PgGrammar, stmt))
        .collect()
}

/// Async version of [`to_stmts`].
///
/// # Panics
///
/// Panics when called outside a Tokio runtime; parsing runs on the blocking
/// pool via `spawn_blocking`.
pub async fn to_stmts_async(sql: &str) -> Result<Vec<Stmt>> {
    parse_async(PgGrammar, sql)
        .await?
        .into_iter()
        .map(|stmt| summarize(&PgGrammar, stmt))
        .collect()
}
