//! The SQL grammar: text to parse trees and back.
//!
//! Everything grammar-specific lives behind [`Grammar`]. [`PgGrammar`] is the
//! PostgreSQL grammar from `libpg_query` (via `pg_parse`); its JSON parse tree
//! is the encoding the rest of the crate works on.

mod utility;

use std::fmt::Write;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::ast::Statement;
use crate::error::{AstError, Result};

/// Separator between rendered statements.
pub const STATEMENT_SEPARATOR: &str = "; ";

/// Parser and renderer for one SQL dialect.
pub trait Grammar: Send + Sync {
    /// Split `sql` into statements, in source order. Syntax errors are returned
    /// as [`AstError::Syntax`].
    fn parse(&self, sql: &str) -> Result<Vec<Statement>>;

    /// Render statements back to canonical SQL text.
    fn render(&self, stmts: &[Statement]) -> Result<String>;

    /// Render a single statement.
    fn render_one(&self, stmt: &Statement) -> Result<String> {
        self.render(std::slice::from_ref(stmt))
    }
}

/// PostgreSQL grammar backed by `libpg_query`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgGrammar;

#[derive(Deserialize)]
struct ParseTree {
    #[serde(default)]
    stmts: Vec<Statement>,
}

impl Grammar for PgGrammar {
    #[instrument(skip(self, sql), fields(sql_len = sql.len()))]
    fn parse(&self, sql: &str) -> Result<Vec<Statement>> {
        if sql.contains('\0') {
            return Err(AstError::Syntax("input contains a NUL byte".to_string()));
        }
        let json = match pg_parse::parse_debug(sql) {
            Ok((_, json)) => json,
            Err(pg_parse::Error::ParseError(msg)) => return Err(AstError::Syntax(msg)),
            // Only the raw tree is read, so a typed-node mismatch is not fatal.
            Err(pg_parse::Error::InvalidAstWithDebug(reason, json)) => {
                debug!(%reason, "Typed parse tree unavailable, using raw tree");
                json
            }
            Err(e) => return Err(AstError::MalformedTree(e.to_string())),
        };
        let tree: ParseTree = serde_json::from_str(&json)?;
        debug!(statements = tree.stmts.len(), "Parsed SQL");
        Ok(tree.stmts)
    }

    fn render(&self, stmts: &[Statement]) -> Result<String> {
        let rendered = stmts.iter().map(render_stmt).collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(STATEMENT_SEPARATOR))
    }
}

/// Render one statement root. Statement kinds with no renderer are
/// [`AstError::Render`] errors.
fn render_stmt(stmt: &Statement) -> Result<String> {
    let kind = stmt.kind()?;
    if let Some(sql) = utility::render(kind, stmt.node()?) {
        return sql;
    }
    let root: pg_parse::ast::Node = serde_json::from_value(stmt.stmt.clone())
        .map_err(|e| AstError::Render(format!("renderer rejected {kind}: {e}")))?;
    let mut buf = String::new();
    write!(&mut buf, "{root}")
        .map_err(|_| AstError::Render(format!("{kind} cannot be rendered")))?;
    Ok(buf)
}

/// Run a grammar's blocking parser on the runtime's blocking pool.
///
/// Produces exactly what [`Grammar::parse`] produces for the same input.
///
/// # Panics
///
/// Must be called from within a Tokio runtime; the parse runs on its blocking
/// pool.
pub async fn parse_async<G>(grammar: G, sql: &str) -> Result<Vec<Statement>>
where
    G: Grammar + Clone + 'static,
{
    let sql = sql.to_owned();
    tokio::task::spawn_blocking(move || grammar.parse(&sql)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    #[test]
    fn test_parse_returns_one_statement_per_input_statement() {
        let stmts = PgGrammar.parse("select 1; select 2; select 3;").unwrap();
        assert_eq!(stmts.len(), 3);
        for stmt in &stmts {
            assert_eq!(stmt.kind().unwrap(), NodeKind::SelectStmt);
        }
    }

    #[test]
    fn test_parse_empty_input() {
        let stmts = PgGrammar.parse("").unwrap();
        assert!(stmts.is_empty());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let result = PgGrammar.parse("select from where");
        assert!(matches!(result, Err(AstError::Syntax(_))), "{:?}", result);
    }

    #[test]
    fn test_render_single_and_many() {
        let stmts = PgGrammar.parse("select 1; select 2").unwrap();
        let one = PgGrammar.render_one(&stmts[0]).unwrap();
        let all = PgGrammar.render(&stmts).unwrap();
        assert!(all.starts_with(&one));
        assert!(all.contains(STATEMENT_SEPARATOR));
    }

    #[test]
    fn test_nul_byte_is_syntax_error() {
        let result = PgGrammar.parse("select 1\0; select 2");
        assert!(matches!(result, Err(AstError::Syntax(_))), "{:?}", result);
    }

    #[test]
    fn test_render_rejects_non_node() {
        let bogus = Statement::new(serde_json::json!({"NotAKind": {}}));
        assert!(matches!(PgGrammar.render_one(&bogus), Err(AstError::InvalidNode(_))));
    }

    #[test]
    fn test_render_utility_statements() {
        for (sql, expected) in [
            ("checkpoint", "CHECKPOINT"),
            ("show all", "SHOW ALL"),
            ("truncate a, only s.b cascade", "TRUNCATE a, ONLY s.b CASCADE"),
            ("create role a with superuser login", "CREATE ROLE a WITH SUPERUSER LOGIN"),
        ] {
            let stmts = PgGrammar.parse(sql).unwrap();
            let rendered = PgGrammar.render(&stmts);
            assert!(rendered.is_ok(), "{sql}: {:?}", rendered.err());
            assert_eq!(rendered.unwrap(), expected);
        }
    }

    #[test]
    fn test_unrenderable_statement_is_render_error() {
        for sql in ["listen chan", "cluster a"] {
            let stmts = PgGrammar.parse(sql).unwrap();
            let result = PgGrammar.render(&stmts);
            assert!(matches!(result, Err(AstError::Render(_))), "{sql}: {:?}", result);
        }
    }

    #[tokio::test]
    async fn test_parse_async_matches_blocking() {
        let sql = "with c as (select 1) select * from c; update a set b = 1";
        let blocking = PgGrammar.parse(sql).unwrap();
        let non_blocking = parse_async(PgGrammar, sql).await.unwrap();
        assert_eq!(blocking, non_blocking);
    }
}
