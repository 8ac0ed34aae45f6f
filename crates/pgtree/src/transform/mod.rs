//! Statement rewriting on the parse tree.
//!
//! Rewrites are expressed as [`AstTransformer`]s and run by a
//! [`TransformPipeline`], which parses the query, applies every transformer to
//! every statement in priority order and renders the result. Working on the
//! tree instead of the SQL text means a rewrite never has to guess where a
//! clause starts or ends.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pgtree::transform::{CountRowsTransformer, TransformPipeline};
//!
//! let pipeline = TransformPipeline::new(vec![
//!     Arc::new(CountRowsTransformer::new("total").with_cte_name("q")),
//! ]);
//! let sql = pipeline.rewrite("select * from tasks where done")?;
//! # Ok::<(), pgtree::AstError>(())
//! ```

mod hoist;
mod pipeline;
mod row_count;
mod traits;

pub use hoist::{hoist_to_cte, set_target_list};
pub use pipeline::TransformPipeline;
pub use row_count::{
    add_row_count_column, query_count_rows, CountRowsTransformer, RowCountColumnTransformer,
    DEFAULT_CTE_NAME, ROW_COUNT_PRIORITY,
};
pub use traits::{AstTransformer, DEFAULT_PRIORITY};
