//! Runtime data types and values for filter operands.

use crate::error::{FilterError, FilterResult};
use std::fmt;

/// Data types a filter operand can take at evaluation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// No value; nothing inhabits this type, every cast involving it fails
    None,
    Boolean,
    String,
    Integer,
    Float,
}

impl DataType {
    /// Get the display string for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::None => "none",
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single operand value: a literal, a resolved cell, or a cast result
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::None => DataType::None,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
        }
    }

    /// Convert this value into `target`, producing a fresh value.
    ///
    /// The source is never mutated. A conversion that is not representable
    /// (e.g. a non-numeric string to a numeric type) fails with
    /// [`FilterError::Cast`] rather than substituting a default.
    pub fn cast_to(&self, target: DataType) -> FilterResult<Value> {
        if self.data_type() == target {
            return Ok(self.clone());
        }

        let cast_err = || FilterError::Cast {
            value: self.clone(),
            target,
        };

        match target {
            DataType::Boolean => match self {
                Value::Integer(n) => Ok(Value::Boolean(*n != 0)),
                Value::Float(x) => Ok(Value::Boolean(*x != 0.0)),
                Value::String(s) => Ok(Value::Boolean(!s.is_empty())),
                _ => Err(cast_err()),
            },

            DataType::String => match self {
                Value::None => Err(cast_err()),
                other => Ok(Value::String(other.to_string())),
            },

            DataType::Integer => match self {
                Value::Boolean(b) => Ok(Value::Integer(i64::from(*b))),
                // truncates toward zero; non-finite and out-of-range floats
                // are not representable
                Value::Float(x)
                    if x.is_finite() && *x >= i64::MIN as f64 && *x < i64::MAX as f64 =>
                {
                    Ok(Value::Integer(*x as i64))
                }
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| cast_err()),
                _ => Err(cast_err()),
            },

            DataType::Float => match self {
                Value::Boolean(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
                Value::Integer(n) => Ok(Value::Float(*n as f64)),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| cast_err()),
                _ => Err(cast_err()),
            },

            DataType::None => Err(cast_err()),
        }
    }
}

impl fmt::Display for Value {
    /// The string form used by string casts and error messages
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("(none)"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
