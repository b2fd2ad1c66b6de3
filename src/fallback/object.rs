//! Fallback interpreter objects.

use std::fmt;

/// A dynamically typed value produced by the fallback interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackValue {
    /// Absent value.
    None,
    /// Boolean.
    Bool(bool),
    /// Integer (always 64-bit).
    Int(i64),
    /// Floating point (always 64-bit).
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Fixed-arity tuple; becomes one column per element.
    Tuple(Vec<FallbackValue>),
    /// Variable-length list.
    List(Vec<FallbackValue>),
}

impl FallbackValue {
    /// Returns the interpreter-side type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            FallbackValue::None => "none",
            FallbackValue::Bool(_) => "bool",
            FallbackValue::Int(_) => "int",
            FallbackValue::Float(_) => "float",
            FallbackValue::Str(_) => "str",
            FallbackValue::Bytes(_) => "bytes",
            FallbackValue::Tuple(_) => "tuple",
            FallbackValue::List(_) => "list",
        }
    }
}

/// Opaque handle to an object owned by the fallback interpreter.
///
/// The handle is move-only: whoever converts it takes ownership, and the
/// object is dropped while the interpreter lock is still held.
pub struct FallbackObject {
    value: Box<FallbackValue>,
}

impl FallbackObject {
    /// Wraps an interpreter value.
    pub fn new(value: FallbackValue) -> Self {
        Self {
            value: Box::new(value),
        }
    }

    /// Borrows the wrapped value.
    pub fn value(&self) -> &FallbackValue {
        &self.value
    }

    pub(super) fn into_value(self) -> FallbackValue {
        *self.value
    }
}

impl From<FallbackValue> for FallbackObject {
    fn from(value: FallbackValue) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for FallbackObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FallbackObject<{}>", self.value.type_name())
    }
}
