//! Rendering for utility statements the `pg_parse` renderer rejects.
//!
//! Output follows the same conventions as the main renderer (upper-case
//! keywords, identifiers quoted only when needed) so normalization stays
//! stable across both paths.

use serde_json::Value;

use crate::ast::NodeKind;
use crate::error::{AstError, Result};

/// Reserved keywords that must be quoted when used as identifiers.
const RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
    "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false",
    "fetch", "for", "foreign", "from", "grant", "group", "having", "in", "initially",
    "intersect", "into", "lateral", "leading", "limit", "localtime", "localtimestamp", "not",
    "null", "offset", "on", "only", "or", "order", "placing", "primary", "references",
    "returning", "select", "session_user", "some", "symmetric", "table", "then", "to",
    "trailing", "true", "union", "unique", "user", "using", "variadic", "when", "where",
    "window", "with",
];

/// Render `node` when `kind` is one of the statements handled here.
pub(super) fn render(kind: NodeKind, node: &Value) -> Option<Result<String>> {
    let sql = match kind {
        NodeKind::CheckPointStmt => Ok("CHECKPOINT".to_string()),
        NodeKind::VariableShowStmt => show(node),
        NodeKind::TruncateStmt => truncate(node),
        NodeKind::CreateRoleStmt => create_role(node),
        _ => return None,
    };
    Some(sql)
}

fn quote_ident(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$');
    if simple && !RESERVED.contains(&name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn str_field<'a>(node: &'a Value, field: &str, kind: NodeKind) -> Result<&'a str> {
    node.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AstError::MalformedTree(format!("{kind} without {field}")))
}

fn list<'a>(node: &'a Value, field: &str) -> &'a [Value] {
    node.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn show(node: &Value) -> Result<String> {
    let name = str_field(node, "name", NodeKind::VariableShowStmt)?;
    if name == "all" {
        return Ok("SHOW ALL".to_string());
    }
    Ok(format!("SHOW {}", quote_ident(name)))
}

/// `[ONLY] [catalog.][schema.]name` from a `RangeVar` node.
fn relation(range_var: &Value) -> Result<String> {
    let rel = range_var
        .get(NodeKind::RangeVar.as_str())
        .ok_or_else(|| AstError::MalformedTree(format!("expected a RangeVar, got {range_var}")))?;
    let mut out = String::new();
    // Omitted booleans are false: a missing `inh` means ONLY.
    if !rel.get("inh").and_then(Value::as_bool).unwrap_or(false) {
        out.push_str("ONLY ");
    }
    for qualifier in ["catalogname", "schemaname"] {
        if let Some(q) = rel.get(qualifier).and_then(Value::as_str).filter(|s| !s.is_empty()) {
            out.push_str(&quote_ident(q));
            out.push('.');
        }
    }
    out.push_str(&quote_ident(str_field(rel, "relname", NodeKind::RangeVar)?));
    Ok(out)
}

fn truncate(node: &Value) -> Result<String> {
    let relations = list(node, "relations")
        .iter()
        .map(relation)
        .collect::<Result<Vec<_>>>()?;
    if relations.is_empty() {
        return Err(AstError::MalformedTree("TruncateStmt without relations".to_string()));
    }
    let mut sql = format!("TRUNCATE {}", relations.join(", "));
    if node.get("restart_seqs").and_then(Value::as_bool).unwrap_or(false) {
        sql.push_str(" RESTART IDENTITY");
    }
    if node.get("behavior").and_then(Value::as_str) == Some("DROP_CASCADE") {
        sql.push_str(" CASCADE");
    }
    Ok(sql)
}

/// Boolean role flags arrive as `Boolean` nodes, older trees use `Integer`.
fn flag_arg(arg: Option<&Value>, defname: &str) -> Result<bool> {
    let arg = arg.unwrap_or(&Value::Null);
    if let Some(b) = arg.get("Boolean") {
        return Ok(b.get("boolval").and_then(Value::as_bool).unwrap_or(false));
    }
    if let Some(i) = arg.get("Integer") {
        return Ok(i.get("ival").and_then(Value::as_i64).unwrap_or(0) != 0);
    }
    Err(AstError::MalformedTree(format!("role option {defname} without a flag value")))
}

fn role_option(elem: &Value) -> Result<String> {
    let elem = elem
        .get(NodeKind::DefElem.as_str())
        .ok_or_else(|| AstError::MalformedTree(format!("expected a DefElem, got {elem}")))?;
    let defname = str_field(elem, "defname", NodeKind::DefElem)?;
    let arg = elem.get("arg");

    let flag = |on: &str, off: &str| -> Result<String> {
        Ok(if flag_arg(arg, defname)? { on } else { off }.to_string())
    };
    match defname {
        "superuser" => flag("SUPERUSER", "NOSUPERUSER"),
        "createdb" => flag("CREATEDB", "NOCREATEDB"),
        "createrole" => flag("CREATEROLE", "NOCREATEROLE"),
        "inherit" => flag("INHERIT", "NOINHERIT"),
        "canlogin" => flag("LOGIN", "NOLOGIN"),
        "isreplication" => flag("REPLICATION", "NOREPLICATION"),
        "bypassrls" => flag("BYPASSRLS", "NOBYPASSRLS"),
        "connectionlimit" => {
            let limit = arg
                .and_then(|a| a.get("Integer"))
                .map(|i| i.get("ival").and_then(Value::as_i64).unwrap_or(0))
                .ok_or_else(|| {
                    AstError::MalformedTree("connection limit without a number".to_string())
                })?;
            Ok(format!("CONNECTION LIMIT {limit}"))
        }
        "password" | "validUntil" => {
            let keyword = if defname == "password" { "PASSWORD" } else { "VALID UNTIL" };
            match arg.and_then(|a| a.get("String")) {
                Some(s) => {
                    let value = s.get("sval").and_then(Value::as_str).unwrap_or_default();
                    Ok(format!("{keyword} {}", quote_literal(value)))
                }
                None => Ok(format!("{keyword} NULL")),
            }
        }
        other => Err(AstError::Render(format!(
            "role option {other} cannot be rendered"
        ))),
    }
}

fn create_role(node: &Value) -> Result<String> {
    let role_type = match node.get("stmt_type").and_then(Value::as_str) {
        Some("ROLESTMT_USER") => "USER",
        Some("ROLESTMT_GROUP") => "GROUP",
        _ => "ROLE",
    };
    let role = str_field(node, "role", NodeKind::CreateRoleStmt)?;
    let mut sql = format!("CREATE {role_type} {}", quote_ident(role));

    let options = list(node, "options")
        .iter()
        .map(role_option)
        .collect::<Result<Vec<_>>>()?;
    if !options.is_empty() {
        sql.push_str(" WITH ");
        sql.push_str(&options.join(" "));
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_ok(kind: NodeKind, node: Value) -> String {
        render(kind, &node).expect("kind is handled").unwrap()
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("a"), "a");
        assert_eq!(quote_ident("a_1$"), "a_1$");
        assert_eq!(quote_ident("Mixed"), "\"Mixed\"");
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_ident("1a"), "\"1a\"");
    }

    #[test]
    fn test_quote_literal_escapes() {
        assert_eq!(quote_literal("it's"), "'it''s'");
    }

    #[test]
    fn test_checkpoint_and_show() {
        assert_eq!(render_ok(NodeKind::CheckPointStmt, json!({})), "CHECKPOINT");
        assert_eq!(render_ok(NodeKind::VariableShowStmt, json!({"name": "all"})), "SHOW ALL");
        assert_eq!(
            render_ok(NodeKind::VariableShowStmt, json!({"name": "search_path"})),
            "SHOW search_path"
        );
    }

    #[test]
    fn test_truncate_options() {
        let node = json!({
            "relations": [
                {"RangeVar": {"schemaname": "ns", "relname": "a", "inh": true}},
                {"RangeVar": {"relname": "B"}}
            ],
            "restart_seqs": true,
            "behavior": "DROP_CASCADE"
        });
        assert_eq!(
            render_ok(NodeKind::TruncateStmt, node),
            "TRUNCATE ns.a, ONLY \"B\" RESTART IDENTITY CASCADE"
        );
    }

    #[test]
    fn test_truncate_without_relations_is_malformed() {
        let result = render(NodeKind::TruncateStmt, &json!({})).unwrap();
        assert!(matches!(result, Err(AstError::MalformedTree(_))));
    }

    #[test]
    fn test_create_role_options() {
        let node = json!({
            "stmt_type": "ROLESTMT_ROLE",
            "role": "a",
            "options": [
                {"DefElem": {"defname": "superuser", "arg": {"Boolean": {"boolval": true}}}},
                {"DefElem": {"defname": "canlogin", "arg": {"Boolean": {}}}},
                {"DefElem": {"defname": "connectionlimit", "arg": {"Integer": {"ival": 3}}}},
                {"DefElem": {"defname": "password", "arg": {"String": {"sval": "p'w"}}}}
            ]
        });
        assert_eq!(
            render_ok(NodeKind::CreateRoleStmt, node),
            "CREATE ROLE a WITH SUPERUSER NOLOGIN CONNECTION LIMIT 3 PASSWORD 'p''w'"
        );
    }

    #[test]
    fn test_unknown_role_option_is_render_error() {
        let node = json!({
            "role": "a",
            "options": [{"DefElem": {"defname": "sysid", "arg": {"Integer": {"ival": 1}}}}]
        });
        let result = render(NodeKind::CreateRoleStmt, &node).unwrap();
        assert!(matches!(result, Err(AstError::Render(_))));
    }

    #[test]
    fn test_other_kinds_are_not_handled() {
        assert!(render(NodeKind::SelectStmt, &json!({})).is_none());
    }
}
