//! Transform pipeline: parse, rewrite every statement, render

use std::sync::Arc;

use tracing::{debug, instrument};

use super::traits::AstTransformer;
use crate::ast::Statement;
use crate::error::Result;
use crate::grammar::{Grammar, PgGrammar};

/// Ordered set of transformers applied to each statement of a query.
///
/// Transformers are kept sorted by priority; ties keep insertion order.
pub struct TransformPipeline {
    transformers: Vec<Arc<dyn AstTransformer>>,
}

impl TransformPipeline {
    /// Create a pipeline with the given transformers, sorted by priority.
    pub fn new(mut transformers: Vec<Arc<dyn AstTransformer>>) -> Self {
        transformers.sort_by_key(|t| t.priority());
        Self { transformers }
    }

    /// Create an empty pipeline with no transformers.
    pub fn empty() -> Self {
        Self {
            transformers: Vec::new(),
        }
    }

    /// Add a transformer, keeping priority order.
    pub fn with_transformer(mut self, transformer: Arc<dyn AstTransformer>) -> Self {
        self.transformers.push(transformer);
        self.transformers.sort_by_key(|t| t.priority());
        self
    }

    /// Parse `sql` with the PostgreSQL grammar, rewrite every statement and
    /// render the result.
    pub fn rewrite(&self, sql: &str) -> Result<String> {
        self.rewrite_with(&PgGrammar, sql)
    }

    /// [`rewrite`](Self::rewrite) with an explicit grammar.
    ///
    /// The first failing statement aborts the whole rewrite.
    #[instrument(skip(self, grammar, sql), fields(sql_len = sql.len()))]
    pub fn rewrite_with<G: Grammar>(&self, grammar: &G, sql: &str) -> Result<String> {
        let stmts = grammar
            .parse(sql)?
            .into_iter()
            .map(|stmt| self.transform_statement(stmt))
            .collect::<Result<Vec<_>>>()?;
        grammar.render(&stmts)
    }

    /// Apply every transformer to one statement, in priority order.
    pub fn transform_statement(&self, mut stmt: Statement) -> Result<Statement> {
        for transformer in &self.transformers {
            debug!(
                transformer = transformer.name(),
                priority = transformer.priority(),
                "Applying transformer"
            );
            stmt = transformer.transform(stmt)?;
        }
        Ok(stmt)
    }

    /// Get the number of registered transformers.
    pub fn transformer_count(&self) -> usize {
        self.transformers.len()
    }
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::empty()
    }
}
