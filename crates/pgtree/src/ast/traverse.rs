//! Depth-first, pre-order traversal over parse trees.
//!
//! The walk is generic: it does not know any field schema. For each field of
//! the current value, in declared order:
//!
//! - a sequence is descended element by element,
//! - a field whose key is a registered kind and whose value is an object is
//!   yielded as a node and then descended,
//! - any other object (wrapper fields such as `stmt`, untagged records such as
//!   `withClause`) is descended without being yielded,
//! - nulls and scalars stop the descent.

use serde_json::map::{Iter as FieldIter, IterMut as FieldIterMut};
use serde_json::Value;

use super::node_kind::NodeKind;

/// A node reached during traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversedNode<'a> {
    pub kind: NodeKind,
    /// The node's field record (the value under its tag).
    pub node: &'a Value,
}

enum Frame<'a> {
    Fields(FieldIter<'a>),
    Items(std::slice::Iter<'a, Value>),
}

/// Lazy pre-order iterator returned by [`traverse`].
///
/// Nothing is visited until `next` is called, and the iterator is single
/// pass: call [`traverse`] again to restart.
pub struct Traverse<'a> {
    stack: Vec<Frame<'a>>,
}

/// Walk every node reachable from `root`.
///
/// A kind-named key whose value is not a record (null or a scalar) is skipped.
///
/// ```
/// use pgtree::ast::{traverse, NodeKind};
/// use serde_json::json;
///
/// let tree = json!({"SelectStmt": {"fromClause": [{"RangeVar": {"relname": "a"}}]}});
/// let kinds: Vec<_> = traverse(&tree).map(|n| n.kind).collect();
/// assert_eq!(kinds, vec![NodeKind::SelectStmt, NodeKind::RangeVar]);
/// ```
pub fn traverse(root: &Value) -> Traverse<'_> {
    let mut walker = Traverse { stack: Vec::new() };
    walker.descend(root);
    walker
}

impl<'a> Traverse<'a> {
    fn descend(&mut self, value: &'a Value) {
        match value {
            Value::Object(fields) => self.stack.push(Frame::Fields(fields.iter())),
            Value::Array(items) => self.stack.push(Frame::Items(items.iter())),
            _ => {}
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = TraversedNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match self.stack.last_mut()? {
                Frame::Fields(fields) => fields.next().map(|(key, value)| (Some(key), value)),
                Frame::Items(items) => items.next().map(|value| (None, value)),
            };
            let Some((key, value)) = step else {
                self.stack.pop();
                continue;
            };

            let kind = key.and_then(|k| NodeKind::from_tag(k));
            match (kind, value) {
                (Some(kind), Value::Object(_)) => {
                    self.descend(value);
                    return Some(TraversedNode { kind, node: value });
                }
                (_, Value::Object(_) | Value::Array(_)) => self.descend(value),
                _ => {}
            }
        }
    }
}

/// Pre-order walk over a tree the caller owns, handing out each node's field
/// record mutably.
///
/// Visiting order matches [`traverse`]. The visitor runs before the node's
/// fields are descended, so edits it makes to the record are what gets walked
/// next.
pub fn walk_mut<F>(root: &mut Value, mut visit: F)
where
    F: FnMut(NodeKind, &mut Value),
{
    walk_value_mut(root, &mut visit);
}

fn walk_value_mut<F>(value: &mut Value, visit: &mut F)
where
    F: FnMut(NodeKind, &mut Value),
{
    match value {
        Value::Object(fields) => walk_fields_mut(fields.iter_mut(), visit),
        Value::Array(items) => {
            for item in items {
                walk_value_mut(item, visit);
            }
        }
        _ => {}
    }
}

fn walk_fields_mut<F>(fields: FieldIterMut<'_>, visit: &mut F)
where
    F: FnMut(NodeKind, &mut Value),
{
    for (key, value) in fields {
        if let (Some(kind), true) = (NodeKind::from_tag(key), value.is_object()) {
            visit(kind, value);
        }
        walk_value_mut(value, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column_ref(name: &str) -> Value {
        json!({"ResTarget": {"val": {"ColumnRef": {"fields": [{"String": {"sval": name}}]}}}})
    }

    /// `select a, b from (select c from tab) sub`, shaped like the parser's output.
    fn nested_select() -> Value {
        json!({
            "SelectStmt": {
                "targetList": [column_ref("a"), column_ref("b")],
                "fromClause": [{
                    "RangeSubselect": {
                        "subquery": {"SelectStmt": {
                            "targetList": [column_ref("c")],
                            "fromClause": [{"RangeVar": {"relname": "tab", "inh": true}}],
                            "limitOption": "LIMIT_OPTION_DEFAULT",
                            "op": "SETOP_NONE"
                        }},
                        "alias": {"aliasname": "sub"}
                    }
                }],
                "limitOption": "LIMIT_OPTION_DEFAULT",
                "op": "SETOP_NONE"
            }
        })
    }

    fn column_names(tree: &Value) -> Vec<String> {
        traverse(tree)
            .filter(|n| n.kind == NodeKind::ColumnRef)
            .map(|n| n.node["fields"][0]["String"]["sval"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_pre_order_left_to_right() {
        assert_eq!(column_names(&nested_select()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parent_yielded_before_children() {
        let tree = nested_select();
        let kinds: Vec<_> = traverse(&tree).map(|n| n.kind).collect();
        assert_eq!(kinds[0], NodeKind::SelectStmt);
        let subselect = kinds.iter().position(|k| *k == NodeKind::RangeSubselect).unwrap();
        let inner_range = kinds.iter().position(|k| *k == NodeKind::RangeVar).unwrap();
        assert!(subselect < inner_range);
        assert_eq!(kinds.iter().filter(|k| **k == NodeKind::SelectStmt).count(), 2);
    }

    #[test]
    fn test_untagged_wrappers_are_descended_silently() {
        let tree = json!({
            "stmt": {"InsertStmt": {
                "relation": {"relname": "a", "inh": true},
                "withClause": {"ctes": [{"CommonTableExpr": {"ctename": "x"}}]}
            }},
            "stmt_len": 10
        });
        let kinds: Vec<_> = traverse(&tree).map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NodeKind::InsertStmt, NodeKind::CommonTableExpr]);
    }

    #[test]
    fn test_nulls_and_scalars_are_skipped() {
        let tree = json!({
            "SelectStmt": {
                "whereClause": null,
                "RangeVar": null,
                "ColumnRef": "a",
                "all": true,
                "limitOption": "LIMIT_OPTION_DEFAULT",
                "valuesLists": [[{"A_Const": {"ival": {"ival": 1}}}], "x", 3]
            }
        });
        let kinds: Vec<_> = traverse(&tree).map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NodeKind::SelectStmt, NodeKind::AConst]);
    }

    #[test]
    fn test_scalar_root_yields_nothing() {
        assert_eq!(traverse(&json!(42)).count(), 0);
        assert_eq!(traverse(&Value::Null).count(), 0);
    }

    #[test]
    fn test_iterator_is_lazy_and_restartable() {
        let tree = nested_select();
        let mut first = traverse(&tree);
        assert_eq!(first.next().map(|n| n.kind), Some(NodeKind::SelectStmt));
        let total = traverse(&tree).count();
        assert_eq!(first.count() + 1, total);
    }

    #[test]
    fn test_walk_mut_visits_in_traversal_order() {
        let mut tree = nested_select();
        let expected: Vec<_> = traverse(&tree).map(|n| n.kind).collect();
        let mut seen = Vec::new();
        walk_mut(&mut tree, |kind, _| seen.push(kind));
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_walk_mut_edits_nodes() {
        let mut tree = nested_select();
        walk_mut(&mut tree, |kind, node| {
            if kind == NodeKind::String && node["sval"] == "a" {
                node["sval"] = json!("z");
            }
        });
        assert_eq!(column_names(&tree), vec!["z", "b", "c"]);
    }
}
