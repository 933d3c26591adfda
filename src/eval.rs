//! Recursive evaluation: short-circuit logic, type coercion, comparison.

use crate::datatype::{DataType, Value};
use crate::error::{FilterError, FilterResult};
use crate::node::{Expr, ExprOp, Node};
use crate::row::Row;
use log::debug;
use regex::Regex;
use std::cmp::Ordering;

/// Evaluate an expression tree against one row.
///
/// The tree is never mutated and can be reused for the next row; all
/// transient state (resolved holder values, cast results) is scoped to this
/// call. Any failure aborts the whole evaluation for the row and propagates
/// unchanged; it is never folded into a default match decision.
pub fn evaluate<R: Row + ?Sized>(node: &Node, row: &R) -> FilterResult<bool> {
    match node {
        Node::Param(param) => match param.cast(DataType::Boolean, row)? {
            Value::Boolean(b) => Ok(b),
            other => Err(FilterError::Cast {
                value: other,
                target: DataType::Boolean,
            }),
        },
        Node::Expr(expr) => eval_expr(expr, row),
    }
}

fn eval_expr<R: Row + ?Sized>(expr: &Expr, row: &R) -> FilterResult<bool> {
    let op = expr.op();
    match op {
        ExprOp::And => {
            if !evaluate(require_left(expr)?, row)? {
                return Ok(false);
            }
            evaluate(expr.right(), row)
        }
        ExprOp::Or => {
            if evaluate(require_left(expr)?, row)? {
                return Ok(true);
            }
            evaluate(expr.right(), row)
        }
        ExprOp::Not => Ok(!evaluate(expr.right(), row)?),
        _ => {
            let left = require_left(expr)?;
            let right = expr.right();

            let datatype = resolved_datatype(left, right);
            debug!("comparison `{}` resolved to {}", op, datatype);

            let l = cast_node(left, datatype, row)?;
            let r = cast_node(right, datatype, row)?;

            let pattern = match &**right {
                Node::Param(param) => param.pattern_regex(),
                Node::Expr(_) => None,
            };
            compare(op, &l, &r, pattern)
        }
    }
}

fn require_left(expr: &Expr) -> FilterResult<&Node> {
    expr.left()
        .map(|node| &**node)
        .ok_or(FilterError::InvalidOperand {
            op: expr.op(),
            detail: "missing left operand",
        })
}

/// Decide the common comparison type for a binary operator's children.
///
/// For an expression like `FOO > 5.5` the type defined by a real value wins
/// over the one defined by a holder, so the literal is not forced into the
/// column's native type. When both sides are holders, or both are concrete,
/// the left child's type wins; that default is asymmetric and is kept as-is.
pub(crate) fn resolved_datatype(left: &Node, right: &Node) -> DataType {
    let l = left.datatype();
    let r = right.datatype();
    if l == r {
        return l;
    }
    if left.is_holder() && !right.is_holder() {
        r
    } else {
        l
    }
}

/// Cast a child node to `target` for the current row.
///
/// An expression child is evaluated to its boolean result first and that
/// temporary boolean is cast onward; the temporary lives only within this
/// call.
fn cast_node<R: Row + ?Sized>(node: &Node, target: DataType, row: &R) -> FilterResult<Value> {
    match node {
        Node::Expr(expr) => Value::Boolean(eval_expr(expr, row)?).cast_to(target),
        Node::Param(param) => param.cast(target, row),
    }
}

/// Apply a relational, equality, or pattern operator to two coerced values.
///
/// `pattern` carries the right operand's pre-compiled regex when the parser
/// built one; otherwise the right value's string form is compiled here.
fn compare(
    op: ExprOp,
    left: &Value,
    right: &Value,
    pattern: Option<&Regex>,
) -> FilterResult<bool> {
    let compare_err = || FilterError::Compare {
        op,
        left: left.data_type(),
        right: right.data_type(),
    };

    match op {
        ExprOp::Eq | ExprOp::Ne => {
            let equal = match (left, right) {
                (Value::Boolean(a), Value::Boolean(b)) => a == b,
                (Value::Integer(a), Value::Integer(b)) => a == b,
                (Value::Float(a), Value::Float(b)) => a == b,
                (Value::String(a), Value::String(b)) => a == b,
                _ => return Err(compare_err()),
            };
            Ok(if op == ExprOp::Ne { !equal } else { equal })
        }

        ExprOp::Le | ExprOp::Lt | ExprOp::Ge | ExprOp::Gt => {
            // only equality is defined for booleans, ordering them fails
            let ordering = match (left, right) {
                (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
                (Value::Float(a), Value::Float(b)) => {
                    a.partial_cmp(b).ok_or_else(compare_err)?
                }
                (Value::String(a), Value::String(b)) => a.cmp(b),
                _ => return Err(compare_err()),
            };
            Ok(match op {
                ExprOp::Le => ordering != Ordering::Greater,
                ExprOp::Lt => ordering == Ordering::Less,
                ExprOp::Ge => ordering != Ordering::Less,
                ExprOp::Gt => ordering == Ordering::Greater,
                _ => unreachable!("guarded by the outer match"),
            })
        }

        ExprOp::Matches | ExprOp::NotMatches => match (left, right) {
            (Value::String(text), Value::String(source)) => {
                let matched = match pattern {
                    Some(regex) => regex.is_match(text),
                    None => Regex::new(source)
                        .map_err(|error| FilterError::Pattern {
                            source: source.clone(),
                            error,
                        })?
                        .is_match(text),
                };
                Ok(if op == ExprOp::NotMatches {
                    !matched
                } else {
                    matched
                })
            }
            _ => Err(compare_err()),
        },

        ExprOp::And | ExprOp::Or | ExprOp::Not => Err(FilterError::InvalidOperand {
            op,
            detail: "logical operator has no comparison semantics",
        }),
    }
}
