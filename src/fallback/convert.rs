//! Fallback object to row conversion.

use crate::datum::Value;
use crate::row::Row;

use super::error::ConversionError;
use super::interpreter::InterpreterGuard;
use super::object::{FallbackObject, FallbackValue};

/// Converts a fallback object into a row, consuming the object.
///
/// A tuple becomes one column per element; any other scalar becomes a
/// single-column row. The row's schema is inferred from the values.
///
/// The guard parameter ties the conversion to the interpreter lock; the
/// object is released before the caller's guard goes out of scope.
///
/// # Errors
///
/// Returns `ConversionError::Unsupported` for lists and nested tuples.
pub fn to_row(obj: FallbackObject, _guard: &InterpreterGuard) -> Result<Row, ConversionError> {
    let values = match obj.into_value() {
        FallbackValue::Tuple(elements) => elements
            .into_iter()
            .map(to_value)
            .collect::<Result<Vec<_>, _>>()?,
        scalar => vec![to_value(scalar)?],
    };
    Ok(Row::from_values(values))
}

fn to_value(value: FallbackValue) -> Result<Value, ConversionError> {
    match value {
        FallbackValue::None => Ok(Value::Null),
        FallbackValue::Bool(b) => Ok(Value::Boolean(b)),
        FallbackValue::Int(n) => Ok(Value::Int64(n)),
        FallbackValue::Float(n) => Ok(Value::Float64(n)),
        FallbackValue::Str(s) => Ok(Value::Text(s)),
        FallbackValue::Bytes(b) => Ok(Value::Bytea(b)),
        nested @ (FallbackValue::Tuple(_) | FallbackValue::List(_)) => Err(
            ConversionError::Unsupported(format!("nested {} as column", nested.type_name())),
        ),
    }
}
