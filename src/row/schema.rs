//! Row schema.

use std::fmt;
use std::sync::Arc;

use crate::datum::{Type, Value};

/// Immutable description of a row's column layout.
///
/// Cloning is cheap (the column list is shared), so partitions, rows and
/// result sets each hold their own copy and compare them by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schema {
    columns: Arc<[Type]>,
}

impl Schema {
    /// Creates a schema from an ordered list of column types.
    pub fn new(columns: impl Into<Arc<[Type]>>) -> Self {
        Self {
            columns: columns.into(),
        }
    }

    /// Infers a schema from a list of values, one column per value.
    ///
    /// NULL values produce [`Type::Null`] columns.
    pub fn infer(values: &[Value]) -> Self {
        Self::new(values.iter().map(Value::data_type).collect::<Vec<_>>())
    }

    /// Returns the column types in order.
    pub fn columns(&self) -> &[Type] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the size of the null bitmap that prefixes every row.
    pub fn null_bitmap_len(&self) -> usize {
        self.columns.len().div_ceil(8)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, ty) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, ")")
    }
}
