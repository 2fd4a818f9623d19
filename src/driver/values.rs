//! Statement parameter values
//!
//! A small, driver-neutral value model for statement parameters and result
//! rows, plus the named-to-positional conversion applied when a wrapped
//! driver does not understand named parameters.

use serde::{Deserialize, Serialize};

use crate::driver::error::{DriverError, DriverResult};

/// A driver-neutral scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

/// A statement parameter, optionally carrying a name
///
/// `ordinal` is the 1-based position of the parameter in the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: Option<String>,
    pub ordinal: usize,
    pub value: Value,
}

impl NamedValue {
    pub fn positional(ordinal: usize, value: Value) -> Self {
        Self {
            name: None,
            ordinal,
            value,
        }
    }

    pub fn named(name: impl Into<String>, ordinal: usize, value: Value) -> Self {
        Self {
            name: Some(name.into()),
            ordinal,
            value,
        }
    }
}

/// Rows returned by a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Converts named parameters to a positional argument list.
///
/// Fails with [`DriverError::NotSupported`] if any parameter carries a name;
/// the fallback path for drivers whose connections expose no
/// [`NamedValueChecker`](crate::driver::traits::NamedValueChecker) capability.
pub fn named_to_positional(args: &[NamedValue]) -> DriverResult<Vec<Value>> {
    let mut positional = Vec::with_capacity(args.len());
    for arg in args {
        if arg.name.is_some() {
            return Err(DriverError::not_supported(
                "driver does not support named parameters",
            ));
        }
        positional.push(arg.value.clone());
    }
    Ok(positional)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_conversion() {
        let args = vec![
            NamedValue::positional(1, Value::Int(42)),
            NamedValue::positional(2, Value::Text("x".into())),
        ];
        let converted = named_to_positional(&args).unwrap();
        assert_eq!(converted, vec![Value::Int(42), Value::Text("x".into())]);
    }

    #[test]
    fn test_named_parameter_rejected() {
        let args = vec![NamedValue::named("id", 1, Value::Int(7))];
        let err = named_to_positional(&args).unwrap_err();
        assert!(matches!(err, DriverError::NotSupported { .. }));
    }
}
