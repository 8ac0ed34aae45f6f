//! PostgreSQL parse-tree analysis and rewriting.
//!
//! SQL is parsed with the PostgreSQL grammar into a loosely typed tree of
//! tagged nodes ([`ast`]). On top of that tree the crate offers:
//!
//! - analysis: tables read per statement ([`tables_queried`]) and per-statement
//!   summaries ([`to_stmts`]),
//! - normalization: canonical SQL text for cache keys ([`normalize`]),
//! - rewriting: CTE hoisting and row-count rewrites ([`transform`]).
//!
//! Parser-bound operations have `_async` variants that run the blocking parser
//! on tokio's blocking pool.

pub mod analyze;
pub mod ast;
pub mod error;
pub mod grammar;
pub mod normalize;
pub mod transform;

pub use analyze::{
    tables_in_statement, tables_queried, tables_queried_async, to_stmts, to_stmts_async, Stmt,
    Table,
};
pub use ast::{NodeKind, Statement};
pub use error::{AstError, Result};
pub use grammar::{Grammar, PgGrammar};
pub use normalize::{normalize, normalize_async, split, split_async};
pub use transform::{add_row_count_column, query_count_rows, DEFAULT_CTE_NAME};
