//! Diagnostic JSON dump of an expression tree.
//!
//! Used by tooling and tests to inspect what the parser built; the running
//! print path never goes through here. The walk is read-only and leaves
//! reference counts and node state untouched.

use crate::datatype::Value;
use crate::node::{Node, ParamKind};
use serde_json::{json, Value as Json};

/// Serialize a tree into nested objects with two node kinds:
/// `{"expr": {"type": ..., "left": ..., "right": ...}}` and
/// `{"param": {"datatype": ..., "kind": ..., ...}}`.
pub fn dump(node: &Node) -> Json {
    match node {
        Node::Expr(expr) => {
            let mut body = json!({ "type": expr.op().as_str() });
            if let Some(left) = expr.left() {
                body["left"] = dump(left);
            }
            body["right"] = dump(expr.right());
            json!({ "expr": body })
        }
        Node::Param(param) => {
            let body = match param.kind() {
                ParamKind::Literal(value) => json!({
                    "datatype": param.datatype().as_str(),
                    "kind": "literal",
                    "value": value_json(value),
                }),
                ParamKind::Holder { column } => json!({
                    "datatype": param.datatype().as_str(),
                    "kind": "holder",
                    "column": column,
                }),
                ParamKind::Pattern { source, .. } => json!({
                    "datatype": param.datatype().as_str(),
                    "kind": "pattern",
                    "pattern": source,
                }),
            };
            json!({ "param": body })
        }
    }
}

fn value_json(value: &Value) -> Json {
    match value {
        Value::None => Json::Null,
        Value::Boolean(b) => json!(b),
        Value::Integer(n) => json!(n),
        Value::Float(x) => json!(x),
        Value::String(s) => json!(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use std::sync::Arc;

    #[test]
    fn test_dump_param_kinds() {
        let n = Node::literal(42i64);
        assert_eq!(
            dump(&n),
            json!({ "param": { "datatype": "integer", "kind": "literal", "value": 42 } })
        );

        let n = Node::holder("SIZE", DataType::Integer);
        assert_eq!(
            dump(&n),
            json!({ "param": { "datatype": "integer", "kind": "holder", "column": "SIZE" } })
        );

        let n = Node::pattern("^tty").unwrap();
        assert_eq!(
            dump(&n),
            json!({ "param": { "datatype": "string", "kind": "pattern", "pattern": "^tty" } })
        );
    }

    #[test]
    fn test_dump_expr_tree() {
        let expr = Node::and(
            Node::ge(Node::holder("SIZE", DataType::Integer), Node::literal(5.5)),
            Node::not(Node::literal(false)),
        );

        assert_eq!(
            dump(&expr),
            json!({
                "expr": {
                    "type": "AND",
                    "left": {
                        "expr": {
                            "type": "GE",
                            "left": { "param": {
                                "datatype": "integer", "kind": "holder", "column": "SIZE"
                            } },
                            "right": { "param": {
                                "datatype": "float", "kind": "literal", "value": 5.5
                            } },
                        }
                    },
                    "right": {
                        "expr": {
                            "type": "NOT",
                            "right": { "param": {
                                "datatype": "boolean", "kind": "literal", "value": false
                            } },
                        }
                    },
                }
            })
        );
    }

    #[test]
    fn test_dump_does_not_touch_counts() {
        let n = Node::or(Node::literal(true), Node::literal(false));
        let before = Arc::strong_count(&n);
        let _ = dump(&n);
        assert_eq!(Arc::strong_count(&n), before);
    }
}
