//! Hoisting a SELECT body into a trailing CTE.
//!
//! `with a as (..) select x from a where ..` becomes
//! `with a as (..), <name> as (select x from a where ..) select from <name>`,
//! leaving the new outer target list for the caller to fill in.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::ast::{build_node, copy_node, range_var, NodeKind, Statement};
use crate::error::{AstError, Result};

/// Split `key` out of `fields`, keeping the order of the rest.
fn take_field(fields: Map<String, Value>, key: &str) -> (Option<Value>, Map<String, Value>) {
    let mut taken = None;
    let mut rest = Map::with_capacity(fields.len());
    for (k, v) in fields {
        if k == key {
            taken = Some(v);
        } else {
            rest.insert(k, v);
        }
    }
    (taken, rest)
}

fn into_object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(AstError::MalformedTree(format!(
            "{what} is not a record: {other}"
        ))),
    }
}

/// Rewrite a SELECT statement so its body becomes the last CTE, `cte_name`,
/// of a new root that selects from it.
///
/// Existing CTEs stay in front of the new one, in order, along with the other
/// fields of the `WITH` clause. The input is not modified. The new root has an
/// empty target list; see [`set_target_list`].
pub fn hoist_to_cte(stmt: &Statement, cte_name: &str) -> Result<Statement> {
    if cte_name.is_empty() {
        return Err(AstError::Usage("CTE name must not be empty".to_string()));
    }
    let kind = stmt.kind()?;
    if kind != NodeKind::SelectStmt {
        return Err(AstError::Usage(format!(
            "only SELECT statements can be hoisted into a CTE, got {kind}"
        )));
    }

    let body = into_object(copy_node(stmt.node()?), "SelectStmt")?;
    let (with_clause, body) = take_field(body, "withClause");

    let (mut ctes, with_rest) = match with_clause {
        None => (Vec::new(), Map::new()),
        Some(with_clause) => {
            let (ctes, rest) = take_field(into_object(with_clause, "withClause")?, "ctes");
            match ctes {
                Some(Value::Array(ctes)) if !ctes.is_empty() => (ctes, rest),
                Some(Value::Array(_)) | None | Some(Value::Null) => {
                    return Err(AstError::Usage(
                        "statement has a WITH clause without any CTEs".to_string(),
                    ))
                }
                Some(other) => {
                    return Err(AstError::MalformedTree(format!(
                        "withClause.ctes is not a list: {other}"
                    )))
                }
            }
        }
    };
    let carried = ctes.len();

    ctes.push(build_node(
        NodeKind::CommonTableExpr,
        json!({
            "ctename": cte_name,
            "ctequery": build_node(NodeKind::SelectStmt, Value::Object(body)),
            "ctematerialized": "CTEMaterializeDefault",
        }),
    ));

    let mut with_fields = Map::with_capacity(with_rest.len() + 1);
    with_fields.insert("ctes".to_string(), Value::Array(ctes));
    with_fields.extend(with_rest);

    let root = json!({
        "targetList": [],
        "fromClause": [range_var(None, cte_name)],
        "limitOption": "LIMIT_OPTION_DEFAULT",
        "withClause": Value::Object(with_fields),
        "op": "SETOP_NONE",
    });

    debug!(cte = cte_name, carried_ctes = carried, "Hoisted SELECT body into CTE");

    Ok(Statement {
        stmt: build_node(NodeKind::SelectStmt, root),
        stmt_location: stmt.stmt_location,
        stmt_len: None,
    })
}

/// Replace the target list of a SELECT statement.
pub fn set_target_list(stmt: &mut Statement, targets: Vec<Value>) -> Result<()> {
    let kind = stmt.kind()?;
    if kind != NodeKind::SelectStmt {
        return Err(AstError::Usage(format!("{kind} has no target list")));
    }
    stmt.node_mut()?
        .as_object_mut()
        .ok_or_else(|| AstError::MalformedTree("SelectStmt is not a record".to_string()))?
        .insert("targetList".to_string(), Value::Array(targets));
    Ok(())
}
