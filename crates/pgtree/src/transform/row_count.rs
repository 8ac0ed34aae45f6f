//! Row-count rewrites built on CTE hoisting.
//!
//! Both rewrites move the query into a CTE and select from it:
//! - [`RowCountColumnTransformer`] keeps every row and adds the total row count
//!   as an extra column (`*, count(*) OVER () AS col`), for paginated results
//!   that also need the total.
//! - [`CountRowsTransformer`] returns only the count (`count(*) AS col`).

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use super::hoist::{hoist_to_cte, set_target_list};
use super::pipeline::TransformPipeline;
use super::traits::AstTransformer;
use crate::ast::{column_star, count_star, res_target, window_over_all, Statement};
use crate::error::{AstError, Result};

/// CTE name used when the caller does not choose one.
pub const DEFAULT_CTE_NAME: &str = "__cte__";

/// Run after structural rewrites.
pub const ROW_COUNT_PRIORITY: i32 = 100;

fn check_column(column: &str) -> Result<()> {
    if column.is_empty() {
        return Err(AstError::Usage("count column name must not be empty".to_string()));
    }
    Ok(())
}

fn hoist_with_targets(stmt: &Statement, cte_name: &str, targets: Vec<Value>) -> Result<Statement> {
    let mut hoisted = hoist_to_cte(stmt, cte_name)?;
    set_target_list(&mut hoisted, targets)?;
    Ok(hoisted)
}

/// Adds a `count(*) OVER ()` column next to every column of the query.
#[derive(Debug, Clone)]
pub struct RowCountColumnTransformer {
    column: String,
    cte_name: String,
}

impl RowCountColumnTransformer {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            cte_name: DEFAULT_CTE_NAME.to_string(),
        }
    }

    pub fn with_cte_name(mut self, cte_name: impl Into<String>) -> Self {
        self.cte_name = cte_name.into();
        self
    }
}

impl AstTransformer for RowCountColumnTransformer {
    fn priority(&self) -> i32 {
        ROW_COUNT_PRIORITY
    }

    fn name(&self) -> &'static str {
        "RowCountColumnTransformer"
    }

    fn transform(&self, stmt: Statement) -> Result<Statement> {
        check_column(&self.column)?;
        let targets = vec![
            res_target(None, column_star()),
            res_target(Some(&self.column), count_star(Some(window_over_all()))),
        ];
        let out = hoist_with_targets(&stmt, &self.cte_name, targets)?;
        debug!(column = %self.column, cte = %self.cte_name, "Added row count column");
        Ok(out)
    }
}

/// Replaces the query with a single `count(*)` of its rows.
#[derive(Debug, Clone)]
pub struct CountRowsTransformer {
    column: String,
    cte_name: String,
}

impl CountRowsTransformer {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            cte_name: DEFAULT_CTE_NAME.to_string(),
        }
    }

    pub fn with_cte_name(mut self, cte_name: impl Into<String>) -> Self {
        self.cte_name = cte_name.into();
        self
    }
}

impl AstTransformer for CountRowsTransformer {
    fn priority(&self) -> i32 {
        ROW_COUNT_PRIORITY
    }

    fn name(&self) -> &'static str {
        "CountRowsTransformer"
    }

    fn transform(&self, stmt: Statement) -> Result<Statement> {
        check_column(&self.column)?;
        let targets = vec![res_target(Some(&self.column), count_star(None))];
        let out = hoist_with_targets(&stmt, &self.cte_name, targets)?;
        debug!(column = %self.column, cte = %self.cte_name, "Replaced query with row count");
        Ok(out)
    }
}

/// Rewrite every statement of `sql` to also return its total row count in
/// `column`. The query body moves into a CTE named `cte_name`
/// (default [`DEFAULT_CTE_NAME`]).
///
/// ```no_run
/// let sql = pgtree::add_row_count_column("select * from a limit 10", "total", None)?;
/// assert!(sql.contains("count(*) OVER ()"));
/// # Ok::<(), pgtree::AstError>(())
/// ```
#[instrument(skip(sql), fields(sql_len = sql.len()))]
pub fn add_row_count_column(sql: &str, column: &str, cte_name: Option<&str>) -> Result<String> {
    let transformer = RowCountColumnTransformer::new(column)
        .with_cte_name(cte_name.unwrap_or(DEFAULT_CTE_NAME));
    TransformPipeline::empty()
        .with_transformer(Arc::new(transformer))
        .rewrite(sql)
}

/// Rewrite every statement of `sql` into a count of the rows it returns.
#[instrument(skip(sql), fields(sql_len = sql.len()))]
pub fn query_count_rows(sql: &str, column: &str, cte_name: Option<&str>) -> Result<String> {
    let transformer =
        CountRowsTransformer::new(column).with_cte_name(cte_name.unwrap_or(DEFAULT_CTE_NAME));
    TransformPipeline::empty()
        .with_transformer(Arc::new(transformer))
        .rewrite(sql)
}
