//! Error types for filter evaluation.

use crate::datatype::{DataType, Value};
use crate::node::ExprOp;
use thiserror::Error;

/// Errors that can occur while evaluating a filter against a row.
///
/// Failures always propagate to the caller; the engine never converts an
/// error into a default match/no-match decision.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A holder parameter named a column the row does not carry
    #[error("no column `{column}` in row")]
    MissingColumn { column: String },

    /// A value could not be converted to the required comparison type
    #[error("cannot cast {value} to {target}")]
    Cast { value: Value, target: DataType },

    /// An operator was applied to incompatible coerced types
    #[error("cannot compare {left} and {right} with {op}")]
    Compare {
        op: ExprOp,
        left: DataType,
        right: DataType,
    },

    /// A node shape the operator does not accept (malformed tree)
    #[error("invalid operand for {op}: {detail}")]
    InvalidOperand { op: ExprOp, detail: &'static str },

    /// A pattern operand was not a valid regular expression
    #[error("invalid pattern `{source}`")]
    Pattern {
        source: String,
        #[source]
        error: regex::Error,
    },
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
