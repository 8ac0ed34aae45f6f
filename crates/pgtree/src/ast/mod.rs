//! Parse-tree model: node kinds, statements, traversal and construction.
//!
//! Trees are kept in the grammar's JSON encoding (`serde_json::Value` with
//! field order preserved). A node is a single-key object whose key is a
//! [`NodeKind`] tag; everything below the tag is loosely typed.

mod build;
mod node_kind;
mod statement;
mod traverse;

pub use build::{
    build_node, copy_node, count_star, column_star, range_var, res_target, string_value,
    window_over_all, FRAME_OPTIONS_DEFAULT,
};
pub use node_kind::{is_node_type, node_kind, NodeKind};
pub use statement::Statement;
pub use traverse::{traverse, walk_mut, Traverse, TraversedNode};
