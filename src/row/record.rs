//! Row representation and serialization.

use std::fmt;

use crate::datum::{SerializationError, Value};

use super::schema::Schema;

/// A decoded row: its values, the schema they were read with, and the
/// number of bytes the row occupies when serialized.
///
/// # Example
///
/// ```
/// use resultset::datum::{Type, Value};
/// use resultset::row::{Row, Schema};
///
/// let schema = Schema::new(vec![Type::Int4, Type::Text]);
/// let row = Row::new(schema.clone(), vec![Value::Int32(7), Value::Text("seven".into())]).unwrap();
///
/// let mut buf = vec![0u8; row.serialized_len()];
/// row.serialize(&mut buf).unwrap();
///
/// let parsed = Row::from_bytes(&schema, &buf).unwrap();
/// assert_eq!(parsed, row);
/// assert_eq!(parsed.serialized_len(), buf.len());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    schema: Schema,
    values: Vec<Value>,
    serialized_len: usize,
}

impl Row {
    /// Creates a row, checking every value against its column type.
    pub fn new(schema: Schema, values: Vec<Value>) -> Result<Self, SerializationError> {
        if values.len() != schema.len() {
            return Err(SerializationError::InvalidFormat(format!(
                "row has {} values but schema {} has {} columns",
                values.len(),
                schema,
                schema.len()
            )));
        }
        for (column, (value, &ty)) in values.iter().zip(schema.columns()).enumerate() {
            if !value.fits(ty) {
                return Err(SerializationError::TypeMismatch {
                    column,
                    expected: ty,
                    actual: value.data_type(),
                });
            }
        }
        let serialized_len = encoded_len(&schema, &values);
        Ok(Self {
            schema,
            values,
            serialized_len,
        })
    }

    /// Creates a row whose schema is inferred from the values.
    pub fn from_values(values: Vec<Value>) -> Self {
        let schema = Schema::infer(&values);
        let serialized_len = encoded_len(&schema, &values);
        Self {
            schema,
            values,
            serialized_len,
        }
    }

    /// Returns the schema this row conforms to.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the column values in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row, returning its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the serialized size of this row in bytes.
    pub fn serialized_len(&self) -> usize {
        self.serialized_len
    }

    /// Serializes this row to the front of `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializationError> {
        let required = self.serialized_len;
        if buf.len() < required {
            return Err(SerializationError::BufferTooSmall {
                required,
                available: buf.len(),
            });
        }

        let num_cols = self.values.len();
        let null_bitmap_bytes = self.schema.null_bitmap_len();

        // bit=1 means NOT NULL
        for (i, byte) in buf.iter_mut().take(null_bitmap_bytes).enumerate() {
            let mut b = 0u8;
            for bit in 0..8 {
                let col_idx = i * 8 + bit;
                if col_idx < num_cols && !self.values[col_idx].is_null() {
                    b |= 1 << bit;
                }
            }
            *byte = b;
        }

        let mut offset = null_bitmap_bytes;
        for value in &self.values {
            offset += value.serialize(&mut buf[offset..])?;
        }

        Ok(offset)
    }

    /// Decodes one row from the start of `buf`.
    ///
    /// `buf` may extend past the row; the number of bytes actually consumed
    /// is available afterwards through [`serialized_len`](Self::serialized_len).
    pub fn from_bytes(schema: &Schema, buf: &[u8]) -> Result<Self, SerializationError> {
        let null_bitmap_bytes = schema.null_bitmap_len();
        if buf.len() < null_bitmap_bytes {
            return Err(SerializationError::BufferTooSmall {
                required: null_bitmap_bytes,
                available: buf.len(),
            });
        }

        let mut offset = null_bitmap_bytes;
        let mut values = Vec::with_capacity(schema.len());

        for (i, &ty) in schema.columns().iter().enumerate() {
            let not_null = buf[i / 8] & (1 << (i % 8)) != 0;
            if not_null {
                let (value, bytes_read) = Value::deserialize(&buf[offset..], ty)?;
                values.push(value);
                offset += bytes_read;
            } else {
                values.push(Value::Null);
            }
        }

        Ok(Self {
            schema: schema.clone(),
            values,
            serialized_len: offset,
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

fn encoded_len(schema: &Schema, values: &[Value]) -> usize {
    schema.null_bitmap_len() + values.iter().map(Value::serialized_size).sum::<usize>()
}
