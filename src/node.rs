//! Expression-tree nodes and the build API used by the parser.
//!
//! Nodes are immutable once built and shared through `Arc`: cloning a handle
//! stands in for the reference-count acquire of the original model, dropping
//! it for the release. A subtree referenced from two trees survives the drop
//! of either and is freed exactly once, when the last handle goes away. The
//! atomic counts also keep sharing sound if one tree is ever evaluated from
//! several threads at once.

use crate::datatype::{DataType, Value};
use crate::error::{FilterError, FilterResult};
use crate::row::Row;
use log::trace;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Operators an expression node can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprOp {
    // Logical
    And,
    Or,
    Not,

    // Comparison
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,

    // Pattern
    Matches,
    NotMatches,
}

impl ExprOp {
    /// Get the display string for this operator (also used by the dump)
    pub fn as_str(&self) -> &'static str {
        match self {
            ExprOp::And => "AND",
            ExprOp::Or => "OR",
            ExprOp::Not => "NOT",
            ExprOp::Eq => "EQ",
            ExprOp::Ne => "NE",
            ExprOp::Le => "LE",
            ExprOp::Lt => "LT",
            ExprOp::Ge => "GE",
            ExprOp::Gt => "GT",
            ExprOp::Matches => "REG",
            ExprOp::NotMatches => "NREG",
        }
    }

    /// Logical operators evaluate their children as booleans directly and
    /// bypass type resolution
    pub fn is_logical(&self) -> bool {
        matches!(self, ExprOp::And | ExprOp::Or | ExprOp::Not)
    }
}

impl fmt::Display for ExprOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tree node: an interior operator or a leaf parameter
#[derive(Debug)]
pub enum Node {
    Expr(Expr),
    Param(Param),
}

/// Interior node: an operator plus its children
#[derive(Debug)]
pub struct Expr {
    op: ExprOp,
    /// `None` exactly for NOT; binary operators always have both children
    left: Option<Arc<Node>>,
    right: Arc<Node>,
}

impl Expr {
    pub fn op(&self) -> ExprOp {
        self.op
    }

    pub fn left(&self) -> Option<&Arc<Node>> {
        self.left.as_ref()
    }

    pub fn right(&self) -> &Arc<Node> {
        &self.right
    }
}

/// What a parameter leaf stands for
#[derive(Debug)]
pub enum ParamKind {
    /// Value fixed when the tree was built
    Literal(Value),
    /// Named column, resolved freshly against the row on every evaluation
    Holder { column: String },
    /// Pre-compiled pattern for MATCHES/NOT_MATCHES right-hand sides
    Pattern { source: String, regex: Regex },
}

/// Leaf node: a literal, a column holder, or a pattern
#[derive(Debug)]
pub struct Param {
    datatype: DataType,
    kind: ParamKind,
}

impl Param {
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    /// Holders carry a contextually ambiguous type; type resolution prefers
    /// the other side when only one operand is a holder
    pub fn is_holder(&self) -> bool {
        matches!(self.kind, ParamKind::Holder { .. })
    }

    /// The compiled regex, for pattern parameters only
    pub fn pattern_regex(&self) -> Option<&Regex> {
        match &self.kind {
            ParamKind::Pattern { regex, .. } => Some(regex),
            _ => None,
        }
    }

    /// Current value of this parameter for the given row
    pub fn resolve<R: Row + ?Sized>(&self, row: &R) -> FilterResult<Value> {
        match &self.kind {
            ParamKind::Literal(value) => Ok(value.clone()),
            ParamKind::Holder { column } => {
                let value = row.cell(column).ok_or_else(|| FilterError::MissingColumn {
                    column: column.clone(),
                })?;
                trace!("holder `{}` resolved to {:?}", column, value);
                Ok(value)
            }
            ParamKind::Pattern { source, .. } => Ok(Value::String(source.clone())),
        }
    }

    /// Resolve against the row, then convert to `target`
    pub fn cast<R: Row + ?Sized>(&self, target: DataType, row: &R) -> FilterResult<Value> {
        self.resolve(row)?.cast_to(target)
    }
}

impl Node {
    /// Create a literal parameter node; the type tag follows the value
    pub fn literal(value: impl Into<Value>) -> Arc<Node> {
        let value = value.into();
        Arc::new(Node::Param(Param {
            datatype: value.data_type(),
            kind: ParamKind::Literal(value),
        }))
    }

    /// Create a holder parameter node for a named column with the column's
    /// native type
    pub fn holder(column: impl Into<String>, datatype: DataType) -> Arc<Node> {
        Arc::new(Node::Param(Param {
            datatype,
            kind: ParamKind::Holder {
                column: column.into(),
            },
        }))
    }

    /// Compile a pattern parameter node for the right side of
    /// MATCHES/NOT_MATCHES
    pub fn pattern(source: impl Into<String>) -> FilterResult<Arc<Node>> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|error| FilterError::Pattern {
            source: source.clone(),
            error,
        })?;
        Ok(Arc::new(Node::Param(Param {
            datatype: DataType::String,
            kind: ParamKind::Pattern { source, regex },
        })))
    }

    /// Create an expression node. NOT keeps only the right child; every
    /// other operator takes both.
    pub fn expr(op: ExprOp, left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        let left = match op {
            ExprOp::Not => None,
            _ => Some(left),
        };
        Arc::new(Node::Expr(Expr { op, left, right }))
    }

    /// Create a NOT expression
    pub fn not(operand: Arc<Node>) -> Arc<Node> {
        Arc::new(Node::Expr(Expr {
            op: ExprOp::Not,
            left: None,
            right: operand,
        }))
    }

    /// Create an AND expression
    pub fn and(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::And, left, right)
    }

    /// Create an OR expression
    pub fn or(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Or, left, right)
    }

    /// Create an equality expression
    pub fn eq(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Eq, left, right)
    }

    /// Create a not-equal expression
    pub fn ne(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Ne, left, right)
    }

    /// Create a less-than-or-equal expression
    pub fn le(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Le, left, right)
    }

    /// Create a less-than expression
    pub fn lt(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Lt, left, right)
    }

    /// Create a greater-than-or-equal expression
    pub fn ge(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Ge, left, right)
    }

    /// Create a greater-than expression
    pub fn gt(left: Arc<Node>, right: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Gt, left, right)
    }

    /// Create a pattern-match expression
    pub fn matches(left: Arc<Node>, pattern: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::Matches, left, pattern)
    }

    /// Create a negated pattern-match expression
    pub fn not_matches(left: Arc<Node>, pattern: Arc<Node>) -> Arc<Node> {
        Self::expr(ExprOp::NotMatches, left, pattern)
    }

    /// Datatype this node contributes to type resolution: expressions are
    /// always boolean, parameters report their own tag
    pub fn datatype(&self) -> DataType {
        match self {
            Node::Expr(_) => DataType::Boolean,
            Node::Param(param) => param.datatype(),
        }
    }

    pub fn is_holder(&self) -> bool {
        match self {
            Node::Expr(_) => false,
            Node::Param(param) => param.is_holder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_takes_value_type() {
        let n = Node::literal(42i64);
        assert_eq!(n.datatype(), DataType::Integer);
        assert!(!n.is_holder());

        let n = Node::literal(5.5);
        assert_eq!(n.datatype(), DataType::Float);

        let n = Node::literal("char");
        assert_eq!(n.datatype(), DataType::String);
    }

    #[test]
    fn test_holder() {
        let n = Node::holder("SIZE", DataType::Integer);
        assert_eq!(n.datatype(), DataType::Integer);
        assert!(n.is_holder());

        let row = [("SIZE", Value::Integer(9))];
        let empty: [(&str, Value); 0] = [];
        match &*n {
            Node::Param(p) => {
                assert_eq!(p.resolve(&row[..]).unwrap(), Value::Integer(9));
                assert!(matches!(
                    p.resolve(&empty[..]),
                    Err(FilterError::MissingColumn { .. })
                ));
            }
            Node::Expr(_) => unreachable!(),
        }
    }

    #[test]
    fn test_pattern_compiles() {
        let n = Node::pattern("^tty[0-9]+$").unwrap();
        assert_eq!(n.datatype(), DataType::String);
        assert!(!n.is_holder());

        assert!(matches!(
            Node::pattern("tty["),
            Err(FilterError::Pattern { .. })
        ));
    }

    #[test]
    fn test_expressions_are_boolean() {
        let e = Node::eq(Node::literal(1i64), Node::literal(1i64));
        assert_eq!(e.datatype(), DataType::Boolean);
        assert!(!e.is_holder());
    }

    #[test]
    fn test_not_has_no_left_child() {
        let n = Node::not(Node::literal(true));
        match &*n {
            Node::Expr(e) => {
                assert_eq!(e.op(), ExprOp::Not);
                assert!(e.left().is_none());
            }
            Node::Param(_) => unreachable!(),
        }
    }

    #[test]
    fn test_binary_expr_keeps_both_children() {
        let n = Node::and(Node::literal(true), Node::literal(false));
        match &*n {
            Node::Expr(e) => {
                assert_eq!(e.op(), ExprOp::And);
                assert!(e.left().is_some());
            }
            Node::Param(_) => unreachable!(),
        }
    }

    #[test]
    fn test_shared_subtree_survives_partial_release() {
        let shared = Node::holder("NAME", DataType::String);
        let a = Node::eq(Arc::clone(&shared), Node::literal("vda"));
        let b = Node::ne(Arc::clone(&shared), Node::literal("vdb"));

        assert_eq!(Arc::strong_count(&shared), 3);
        drop(a);
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(b);
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
