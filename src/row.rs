//! Row collaborator boundary.

use crate::datatype::Value;
use std::collections::HashMap;

/// A single table row that holder parameters resolve against.
///
/// The table itself (column registration, cell storage, printing) lives
/// outside this crate; the engine only needs typed cell lookup. Returning
/// `None` for an absent or unset column surfaces as
/// [`FilterError::MissingColumn`](crate::FilterError::MissingColumn) during
/// evaluation.
pub trait Row {
    /// Typed value of the named column, or `None` when the row has no such
    /// cell
    fn cell(&self, column: &str) -> Option<Value>;
}

impl Row for HashMap<String, Value> {
    fn cell(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl<'a> Row for [(&'a str, Value)] {
    fn cell(&self, column: &str) -> Option<Value> {
        self.iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.clone())
    }
}
