//! Predicate evaluation for the row-filtering feature shared by tabular CLI
//! introspection tools (device listers, mount listers, open-file listers).
//!
//! The parser collaborator builds an expression tree through the [`Node`]
//! API; the print loop asks [`evaluate`] (or a [`Filter`]) whether each row
//! matches. This crate provides:
//! - A shared, immutable expression-tree representation
//! - Runtime type resolution and value coercion between operands
//! - Short-circuit recursive evaluation against table rows
//! - A JSON diagnostic dump for tooling and tests

pub mod datatype;
pub mod dump;
pub mod error;
pub mod eval;
pub mod filter;
pub mod node;
pub mod row;

pub use datatype::{DataType, Value};
pub use dump::dump;
pub use error::{FilterError, FilterResult};
pub use eval::evaluate;
pub use filter::Filter;
pub use node::{Expr, ExprOp, Node, Param, ParamKind};
pub use row::Row;
