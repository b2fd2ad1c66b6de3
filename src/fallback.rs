//! Bridge to the fallback interpreter.
//!
//! Rows that the compiled path could not produce are computed by a slower
//! interpreter and arrive as opaque [`FallbackObject`]s tagged with the
//! index of the input row they came from. The interpreter's object space is
//! single-threaded, so every conversion runs under the process-wide
//! [`InterpreterGuard`].
//!
//! ```
//! use resultset::fallback::{self, FallbackObject, FallbackValue};
//!
//! let obj = FallbackObject::new(FallbackValue::Tuple(vec![
//!     FallbackValue::Int(1),
//!     FallbackValue::Str("one".into()),
//! ]));
//! let row = {
//!     let guard = fallback::acquire();
//!     fallback::to_row(obj, &guard).unwrap()
//! };
//! assert_eq!(row.len(), 2);
//! ```

mod convert;
mod error;
mod interpreter;
mod object;

pub use convert::to_row;
pub use error::ConversionError;
pub use interpreter::{InterpreterGuard, acquire, try_acquire};
pub use object::{FallbackObject, FallbackValue};
