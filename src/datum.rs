//! Column types and values.
//!
//! [`Type`] describes the physical layout of a single column and [`Value`]
//! holds one decoded column value. Both carry the per-value binary codec
//! that [`Row`](crate::row::Row) builds on.

use std::fmt;

use thiserror::Error;

/// Errors from data serialization/deserialization.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// Buffer too small for the operation.
    #[error("buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes required.
        required: usize,
        /// Bytes available.
        available: usize,
    },
    /// Value does not fit the declared column type.
    #[error("type mismatch in column {column}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Column index.
        column: usize,
        /// Column type declared by the schema.
        expected: Type,
        /// Type of the offending value.
        actual: Type,
    },
    /// Invalid data format.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Returns `SerializationError::BufferTooSmall` if the buffer is too small.
macro_rules! ensure_buf_len {
    ($buf:expr, $required:expr) => {
        if $buf.len() < $required {
            return Err($crate::datum::SerializationError::BufferTooSmall {
                required: $required,
                available: $buf.len(),
            });
        }
    };
}

/// Column data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Column that only ever holds NULL.
    Null,
    /// Boolean type.
    Bool,
    /// 2-byte integer.
    Int2,
    /// 4-byte integer.
    Int4,
    /// 8-byte integer.
    Int8,
    /// Single-precision floating-point.
    Float4,
    /// Double-precision floating-point.
    Float8,
    /// Variable-length UTF-8 string.
    Text,
    /// Variable-length binary string.
    Bytea,
}

impl Type {
    /// Returns the fixed byte size for fixed-length types, or `None` for variable-length types.
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Type::Null => Some(0),
            Type::Bool => Some(1),
            Type::Int2 => Some(2),
            Type::Int4 => Some(4),
            Type::Int8 => Some(8),
            Type::Float4 => Some(4),
            Type::Float8 => Some(8),
            Type::Text | Type::Bytea => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Null => "null",
            Type::Bool => "boolean",
            Type::Int2 => "smallint",
            Type::Int4 => "integer",
            Type::Int8 => "bigint",
            Type::Float4 => "real",
            Type::Float8 => "double precision",
            Type::Text => "text",
            Type::Bytea => "bytea",
        };
        write!(f, "{}", name)
    }
}

/// A typed column value.
///
/// Variable-length types (Text, Bytea) are heap-allocated.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    /// NULL (fits any column type).
    Null,
    /// Boolean (true/false).
    Boolean(bool),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// Variable-length text.
    Text(String),
    /// Variable-length binary.
    Bytea(Vec<u8>),
}

impl Value {
    /// Returns the data type for this value.
    pub fn data_type(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Boolean(_) => Type::Bool,
            Value::Int16(_) => Type::Int2,
            Value::Int32(_) => Type::Int4,
            Value::Int64(_) => Type::Int8,
            Value::Float32(_) => Type::Float4,
            Value::Float64(_) => Type::Float8,
            Value::Text(_) => Type::Text,
            Value::Bytea(_) => Type::Bytea,
        }
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value can be stored in a column of type `ty`.
    pub fn fits(&self, ty: Type) -> bool {
        self.is_null() || self.data_type() == ty
    }

    /// Returns the serialized size in bytes.
    ///
    /// For NULL, this returns 0 (NULL values are indicated by the null bitmap).
    /// For variable-length types, this includes the 4-byte length prefix.
    pub fn serialized_size(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Int16(_) => 2,
            Value::Int32(_) => 4,
            Value::Int64(_) => 8,
            Value::Float32(_) => 4,
            Value::Float64(_) => 8,
            Value::Text(s) => 4 + s.len(),
            Value::Bytea(b) => 4 + b.len(),
        }
    }

    /// Serializes this value to a buffer.
    ///
    /// Returns the number of bytes written. NULL writes 0 bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializationError> {
        match self {
            Value::Null => Ok(0),
            Value::Boolean(b) => {
                ensure_buf_len!(buf, 1);
                buf[0] = u8::from(*b);
                Ok(1)
            }
            Value::Int16(n) => {
                ensure_buf_len!(buf, 2);
                buf[0..2].copy_from_slice(&n.to_le_bytes());
                Ok(2)
            }
            Value::Int32(n) => {
                ensure_buf_len!(buf, 4);
                buf[0..4].copy_from_slice(&n.to_le_bytes());
                Ok(4)
            }
            Value::Int64(n) => {
                ensure_buf_len!(buf, 8);
                buf[0..8].copy_from_slice(&n.to_le_bytes());
                Ok(8)
            }
            Value::Float32(n) => {
                ensure_buf_len!(buf, 4);
                buf[0..4].copy_from_slice(&n.to_le_bytes());
                Ok(4)
            }
            Value::Float64(n) => {
                ensure_buf_len!(buf, 8);
                buf[0..8].copy_from_slice(&n.to_le_bytes());
                Ok(8)
            }
            Value::Text(s) => write_var_len(buf, s.as_bytes()),
            Value::Bytea(data) => write_var_len(buf, data),
        }
    }

    /// Deserializes a value from a buffer given its data type.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn deserialize(buf: &[u8], ty: Type) -> Result<(Self, usize), SerializationError> {
        if let Some(size) = ty.fixed_size() {
            ensure_buf_len!(buf, size);
        }

        match ty {
            Type::Null => Ok((Value::Null, 0)),
            Type::Bool => Ok((Value::Boolean(buf[0] != 0), 1)),
            Type::Int2 => Ok((Value::Int16(i16::from_le_bytes([buf[0], buf[1]])), 2)),
            Type::Int4 => {
                let n = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
                Ok((Value::Int32(n), 4))
            }
            Type::Int8 => Ok((Value::Int64(i64::from_le_bytes(array8(buf))), 8)),
            Type::Float4 => {
                let n = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
                Ok((Value::Float32(n), 4))
            }
            Type::Float8 => Ok((Value::Float64(f64::from_le_bytes(array8(buf))), 8)),
            Type::Text => {
                let (data, consumed) = read_var_len(buf)?;
                let s = String::from_utf8(data.to_vec())
                    .map_err(|e| SerializationError::InvalidFormat(e.to_string()))?;
                Ok((Value::Text(s), consumed))
            }
            Type::Bytea => {
                let (data, consumed) = read_var_len(buf)?;
                Ok((Value::Bytea(data.to_vec()), consumed))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int16(n) => write!(f, "{}", n),
            Value::Int32(n) => write!(f, "{}", n),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Float32(n) => write!(f, "{}", n),
            Value::Float64(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytea(b) => {
                write!(f, "\\x")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// Copies the first 8 bytes of `buf`. Callers check the length first.
fn array8(buf: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&buf[..8]);
    out
}

fn write_var_len(buf: &mut [u8], data: &[u8]) -> Result<usize, SerializationError> {
    let len = u32::try_from(data.len()).map_err(|_| {
        SerializationError::InvalidFormat(format!("value of {} bytes too long", data.len()))
    })?;
    let required = 4 + data.len();
    ensure_buf_len!(buf, required);
    buf[0..4].copy_from_slice(&len.to_le_bytes());
    buf[4..required].copy_from_slice(data);
    Ok(required)
}

fn read_var_len(buf: &[u8]) -> Result<(&[u8], usize), SerializationError> {
    ensure_buf_len!(buf, 4);
    let len = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    let required = 4 + len;
    ensure_buf_len!(buf, required);
    Ok((&buf[4..required], required))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_fixed_size() {
        assert_eq!(Type::Null.fixed_size(), Some(0));
        assert_eq!(Type::Bool.fixed_size(), Some(1));
        assert_eq!(Type::Int2.fixed_size(), Some(2));
        assert_eq!(Type::Int4.fixed_size(), Some(4));
        assert_eq!(Type::Int8.fixed_size(), Some(8));
        assert_eq!(Type::Float4.fixed_size(), Some(4));
        assert_eq!(Type::Float8.fixed_size(), Some(8));
        assert_eq!(Type::Text.fixed_size(), None);
        assert_eq!(Type::Bytea.fixed_size(), None);
    }

    #[test]
    fn test_type_display() {
        assert_eq!(Type::Bool.to_string(), "boolean");
        assert_eq!(Type::Int4.to_string(), "integer");
        assert_eq!(Type::Text.to_string(), "text");
        assert_eq!(Type::Float8.to_string(), "double precision");
    }

    #[test]
    fn test_value_fits() {
        assert!(Value::Null.fits(Type::Int4));
        assert!(Value::Int32(1).fits(Type::Int4));
        assert!(!Value::Int64(1).fits(Type::Int4));
        assert!(!Value::Text("x".into()).fits(Type::Bytea));
    }

    #[test]
    fn test_text_and_bytea() {
        let value = Value::Text("hello 日本語".into());
        let mut buf = vec![0u8; value.serialized_size()];
        let written = value.serialize(&mut buf).unwrap();
        assert_eq!(written, 4 + "hello 日本語".len());

        let (parsed, consumed) = Value::deserialize(&buf, Type::Text).unwrap();
        assert_eq!(parsed, value);
        assert_eq!(consumed, written);

        let (raw, _) = Value::deserialize(&buf, Type::Bytea).unwrap();
        assert_eq!(raw, Value::Bytea("hello 日本語".as_bytes().to_vec()));
    }

    #[test]
    fn test_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int32(0).is_null());
        assert_eq!(Value::Null.serialized_size(), 0);
        assert_eq!(Value::Null.serialize(&mut [0u8; 1]).unwrap(), 0);
        assert_eq!(Value::deserialize(&[], Type::Null).unwrap(), (Value::Null, 0));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 2];
        assert!(matches!(
            Value::Int32(42).serialize(&mut buf),
            Err(SerializationError::BufferTooSmall {
                required: 4,
                available: 2
            })
        ));
        assert!(matches!(
            Value::deserialize(&[5, 0, 0, 0, b'a'], Type::Text),
            Err(SerializationError::BufferTooSmall {
                required: 9,
                available: 5
            })
        ));
        assert!(matches!(
            Value::deserialize(&[1, 2, 3], Type::Int8),
            Err(SerializationError::BufferTooSmall {
                required: 8,
                available: 3
            })
        ));
        assert!(matches!(
            Value::deserialize(&[], Type::Bool),
            Err(SerializationError::BufferTooSmall {
                required: 1,
                available: 0
            })
        ));
        assert!(matches!(Value::deserialize(&[], Type::Null), Ok((Value::Null, 0))));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&3u32.to_le_bytes());
        buf[4..7].copy_from_slice(&[0xFF, 0xFE, 0xFF]);
        assert!(matches!(
            Value::deserialize(&buf, Type::Text),
            Err(SerializationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Int32(42).to_string(), "42");
        assert_eq!(Value::Text("hi".into()).to_string(), "\"hi\"");
        assert_eq!(Value::Bytea(vec![0xDE, 0xAD]).to_string(), "\\xdead");
    }
}
