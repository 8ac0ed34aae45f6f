use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node_kind::{node_kind, NodeKind};
use super::traverse::{traverse, walk_mut, Traverse};
use crate::error::{AstError, Result};

/// One parsed statement: the parser's raw-statement wrapper.
///
/// `stmt` holds exactly one tagged node of a statement kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub stmt: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stmt_location: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stmt_len: Option<i64>,
}

impl Statement {
    /// Wrap a root node. Location information is left unset.
    pub fn new(stmt: Value) -> Self {
        Self {
            stmt,
            stmt_location: None,
            stmt_len: None,
        }
    }

    /// Kind of the root node; fails on anything but a single statement-kind tag.
    pub fn kind(&self) -> Result<NodeKind> {
        let kind = node_kind(&self.stmt)
            .map_err(|e| AstError::InvalidNode(format!("invalid parser state: {e}")))?;
        if !kind.is_statement() {
            return Err(AstError::InvalidNode(format!(
                "invalid parser state: {kind} is not a statement"
            )));
        }
        Ok(kind)
    }

    /// The root node's field record.
    pub fn node(&self) -> Result<&Value> {
        let kind = self.kind()?;
        self.stmt
            .get(kind.as_str())
            .filter(|n| !n.is_null())
            .ok_or_else(|| {
                AstError::InvalidNode("invalid parser state: empty statement".to_string())
            })
    }

    /// Mutable access to the root node's field record.
    pub fn node_mut(&mut self) -> Result<&mut Value> {
        let kind = self.kind()?;
        self.stmt
            .get_mut(kind.as_str())
            .filter(|n| !n.is_null())
            .ok_or_else(|| {
                AstError::InvalidNode("invalid parser state: empty statement".to_string())
            })
    }

    /// Pre-order traversal starting at (and including) the root node.
    pub fn nodes(&self) -> Traverse<'_> {
        traverse(&self.stmt)
    }

    /// Mutable pre-order walk starting at the root node.
    pub fn walk_mut<F>(&mut self, visit: F)
    where
        F: FnMut(NodeKind, &mut Value),
    {
        walk_mut(&mut self.stmt, visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_select() {
        let stmt = Statement::new(json!({"SelectStmt": {"op": "SETOP_NONE"}}));
        assert_eq!(stmt.kind().unwrap(), NodeKind::SelectStmt);
        assert_eq!(stmt.node().unwrap()["op"], "SETOP_NONE");
    }

    #[test]
    fn test_kind_rejects_non_statement_roots() {
        let range = Statement::new(json!({"RangeVar": {"relname": "a"}}));
        assert!(matches!(range.kind(), Err(AstError::InvalidNode(_))));

        let two = Statement::new(json!({"SelectStmt": {}, "InsertStmt": {}}));
        assert!(matches!(two.kind(), Err(AstError::InvalidNode(_))));
    }

    #[test]
    fn test_null_root_is_invalid() {
        let stmt = Statement::new(json!({"SelectStmt": null}));
        assert!(matches!(stmt.node(), Err(AstError::InvalidNode(_))));
    }

    #[test]
    fn test_deserializes_parser_wrapper() {
        let stmt: Statement = serde_json::from_value(json!({
            "stmt": {"VariableShowStmt": {"name": "all"}},
            "stmt_len": 8
        }))
        .unwrap();
        assert_eq!(stmt.stmt_len, Some(8));
        assert_eq!(stmt.stmt_location, None);
        assert_eq!(stmt.kind().unwrap(), NodeKind::VariableShowStmt);
    }

    #[test]
    fn test_nodes_starts_at_root() {
        let stmt = Statement::new(json!({"SelectStmt": {
            "fromClause": [{"RangeVar": {"relname": "a"}}]
        }}));
        let kinds: Vec<_> = stmt.nodes().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NodeKind::SelectStmt, NodeKind::RangeVar]);
    }
}
