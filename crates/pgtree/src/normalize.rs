//! Statement splitting and canonical rendering.
//!
//! A normalized query is stable under re-casing of keywords, whitespace
//! changes and comments, which makes it usable as a cache key.

use tracing::instrument;

use crate::ast::Statement;
use crate::error::Result;
use crate::grammar::{parse_async, Grammar, PgGrammar};

/// Parse `sql` into its statements, in source order.
pub fn split(sql: &str) -> Result<Vec<Statement>> {
    PgGrammar.parse(sql)
}

/// Async version of [`split`].
///
/// # Panics
///
/// Panics when called outside a Tokio runtime; parsing runs on the blocking
/// pool via `spawn_blocking`.
pub async fn split_async(sql: &str) -> Result<Vec<Statement>> {
    parse_async(PgGrammar, sql).await
}

/// Canonical text of `sql`: every statement rendered by the grammar, joined
/// with `"; "`.
///
/// ```no_run
/// let a = pgtree::normalize("SelEct * from a -- all of it")?;
/// let b = pgtree::normalize("select *\n  from a")?;
/// assert_eq!(a, b);
/// # Ok::<(), pgtree::AstError>(())
/// ```
#[instrument(skip(sql), fields(sql_len = sql.len()))]
pub fn normalize(sql: &str) -> Result<String> {
    PgGrammar.render(&split(sql)?)
}

/// Async version of [`normalize`].
///
/// # Panics
///
/// Panics when called outside a Tokio runtime; parsing runs on the blocking
/// pool via `spawn_blocking`.
pub async fn normalize_async(sql: &str) -> Result<String> {
    PgGrammar.render(&split_async(sql).await?)
}
