//! Filter surface exposed to the row-printing loop.

use crate::error::FilterResult;
use crate::eval::evaluate;
use crate::node::Node;
use crate::row::Row;
use std::sync::Arc;

/// A compiled row filter.
///
/// Owns the root of an expression tree built by the parser collaborator and
/// applies it to rows one at a time. Cloning a filter shares the tree; the
/// tree is torn down when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct Filter {
    root: Arc<Node>,
}

impl Filter {
    pub fn new(root: Arc<Node>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Decide whether `row` passes the filter
    pub fn matches<R: Row + ?Sized>(&self, row: &R) -> FilterResult<bool> {
        evaluate(&self.root, row)
    }

    /// Diagnostic dump of the owned tree
    pub fn dump(&self) -> serde_json::Value {
        crate::dump::dump(&self.root)
    }
}
