//! Node construction and copying.
//!
//! Nodes are built in the parser's own encoding so the renderer accepts them
//! alongside parsed ones. Enum-typed fields the parser always writes
//! (`op`, `limitOption`, `funcformat`, ...) are filled in by the helpers below.

use serde_json::{json, Value};

use super::node_kind::NodeKind;

/// `FRAMEOPTION_DEFAULTS`: RANGE UNBOUNDED PRECEDING AND CURRENT ROW.
pub const FRAME_OPTIONS_DEFAULT: i64 = 0x0002 | 0x0020 | 0x0400;

/// Wrap a field record under its kind tag. The record is not checked against
/// the kind's fields.
pub fn build_node(kind: NodeKind, fields: Value) -> Value {
    let mut node = serde_json::Map::with_capacity(1);
    node.insert(kind.as_str().to_string(), fields);
    Value::Object(node)
}

/// Structurally independent deep copy of a node or subtree.
pub fn copy_node(node: &Value) -> Value {
    node.clone()
}

/// `String` value node.
pub fn string_value(s: &str) -> Value {
    build_node(NodeKind::String, json!({ "sval": s }))
}

/// Reference to a relation, optionally schema-qualified.
pub fn range_var(schema: Option<&str>, name: &str) -> Value {
    let mut fields = serde_json::Map::new();
    if let Some(schema) = schema {
        fields.insert("schemaname".to_string(), json!(schema));
    }
    fields.insert("relname".to_string(), json!(name));
    fields.insert("inh".to_string(), json!(true));
    fields.insert("relpersistence".to_string(), json!("p"));
    build_node(NodeKind::RangeVar, Value::Object(fields))
}

/// Bare `*` column reference.
pub fn column_star() -> Value {
    build_node(
        NodeKind::ColumnRef,
        json!({ "fields": [build_node(NodeKind::AStar, json!({}))] }),
    )
}

/// Target list entry, `val AS name` when a name is given.
pub fn res_target(name: Option<&str>, val: Value) -> Value {
    let mut fields = serde_json::Map::new();
    if let Some(name) = name {
        fields.insert("name".to_string(), json!(name));
    }
    fields.insert("val".to_string(), val);
    build_node(NodeKind::ResTarget, Value::Object(fields))
}

/// Empty window (`OVER ()`), as written inside `FuncCall.over`.
pub fn window_over_all() -> Value {
    json!({ "frameOptions": FRAME_OPTIONS_DEFAULT })
}

/// `count(*)`, optionally as a window aggregate.
pub fn count_star(over: Option<Value>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("funcname".to_string(), json!([string_value("count")]));
    fields.insert("agg_star".to_string(), json!(true));
    if let Some(over) = over {
        fields.insert("over".to_string(), over);
    }
    fields.insert("funcformat".to_string(), json!("COERCE_EXPLICIT_CALL"));
    build_node(NodeKind::FuncCall, Value::Object(fields))
}
