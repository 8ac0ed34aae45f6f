//! Core trait for statement rewriting

use crate::ast::Statement;
use crate::error::Result;

/// Default priority for transformers that do not care about ordering.
pub const DEFAULT_PRIORITY: i32 = 0;

/// A rewrite of one parsed statement.
///
/// Transformers run in ascending [`priority`](AstTransformer::priority)
/// order inside a [`TransformPipeline`](super::TransformPipeline). Each one
/// receives the output of the previous and must return a statement the
/// grammar can render.
///
/// # Example
///
/// ```rust
/// use pgtree::ast::Statement;
/// use pgtree::transform::AstTransformer;
///
/// struct Identity;
///
/// impl AstTransformer for Identity {
///     fn transform(&self, stmt: Statement) -> pgtree::Result<Statement> {
///         Ok(stmt)
///     }
/// }
/// ```
pub trait AstTransformer: Send + Sync {
    /// Lower values run first.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Rewrite one statement.
    fn transform(&self, stmt: Statement) -> Result<Statement>;
}
